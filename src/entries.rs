//! Pending members collected before a generation run.
//!
//! Four registries keyed by member name: virtual properties, virtual methods,
//! and declared properties/methods to physically add to the source. Every
//! registry is first-registration-wins: a repeated add with a known name is
//! silently ignored so independent contributors can request the same member
//! without coordinating. Method names share one case-insensitive namespace
//! across the virtual and declared registries.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::argument::{Argument, TypeRef};

/// Access level of a declared member.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Private => "private",
        };
        f.write_str(keyword)
    }
}

/// A property that exists at runtime but is only described by a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualProperty {
    pub name: String,
    pub ty: Option<String>,
    pub readable: bool,
    pub writable: bool,
    pub comment: String,
}

impl VirtualProperty {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: None,
            readable: false,
            writable: false,
            comment: String::new(),
        }
    }

    pub fn typed(mut self, ty: impl Into<TypeRef>) -> Self {
        self.ty = ty.into().normalize();
        self
    }

    pub fn readable(mut self, readable: bool) -> Self {
        self.readable = readable;
        self
    }

    pub fn writable(mut self, writable: bool) -> Self {
        self.writable = writable;
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }
}

/// A method that exists at runtime but is only described by a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualMethod {
    pub name: String,
    pub is_static: bool,
    pub arguments: Vec<Argument>,
    pub return_type: Option<String>,
    pub comment: String,
}

impl VirtualMethod {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_static: false,
            arguments: Vec::new(),
            return_type: None,
            comment: String::new(),
        }
    }

    pub fn arguments(mut self, arguments: Vec<Argument>) -> Self {
        self.arguments = arguments;
        self
    }

    pub fn returns(mut self, ty: impl Into<TypeRef>) -> Self {
        self.return_type = ty.into().normalize();
        self
    }

    pub fn set_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }
}

/// A property to physically declare in the class body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredProperty {
    pub name: String,
    pub ty: Option<String>,
    pub default_value: Option<String>,
    pub is_static: bool,
    pub comment: String,
    pub visibility: Visibility,
}

impl DeclaredProperty {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: None,
            default_value: None,
            is_static: false,
            comment: String::new(),
            visibility: Visibility::Public,
        }
    }

    pub fn typed(mut self, ty: impl Into<TypeRef>) -> Self {
        self.ty = ty.into().normalize();
        self
    }

    /// Raw default value source, e.g. `'users'` or `[]`.
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn set_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }
}

/// A method to physically declare in the class body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredMethod {
    pub name: String,
    pub is_static: bool,
    pub arguments: Vec<Argument>,
    pub return_type: Option<String>,
    pub comment: String,
    pub visibility: Visibility,
    pub body: String,
}

impl DeclaredMethod {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_static: false,
            arguments: Vec::new(),
            return_type: None,
            comment: String::new(),
            visibility: Visibility::Public,
            body: String::new(),
        }
    }

    pub fn arguments(mut self, arguments: Vec<Argument>) -> Self {
        self.arguments = arguments;
        self
    }

    pub fn returns(mut self, ty: impl Into<TypeRef>) -> Self {
        self.return_type = ty.into().normalize();
        self
    }

    pub fn set_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }
}

/// The four pending-member registries, in registration order.
#[derive(Debug, Clone, Default)]
pub struct Entries {
    virtual_properties: Vec<VirtualProperty>,
    virtual_methods: Vec<VirtualMethod>,
    declared_properties: Vec<DeclaredProperty>,
    declared_methods: Vec<DeclaredMethod>,
}

impl Entries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_virtual_property(&mut self, property: VirtualProperty) -> &mut Self {
        if self.virtual_property(&property.name).is_none() {
            self.virtual_properties.push(property);
        }
        self
    }

    pub fn add_virtual_method(&mut self, method: VirtualMethod) -> &mut Self {
        if !self.has_method(&method.name) {
            self.virtual_methods.push(method);
        }
        self
    }

    pub fn add_declared_property(&mut self, property: DeclaredProperty) -> &mut Self {
        if !self
            .declared_properties
            .iter()
            .any(|existing| existing.name == property.name)
        {
            self.declared_properties.push(property);
        }
        self
    }

    pub fn add_declared_method(&mut self, method: DeclaredMethod) -> &mut Self {
        if !self.has_method(&method.name) {
            self.declared_methods.push(method);
        }
        self
    }

    /// Whether a virtual or declared method with this name (any case) is pending.
    pub fn has_method(&self, name: &str) -> bool {
        self.virtual_methods
            .iter()
            .map(|m| m.name.as_str())
            .chain(self.declared_methods.iter().map(|m| m.name.as_str()))
            .any(|existing| existing.eq_ignore_ascii_case(name))
    }

    pub fn virtual_property(&self, name: &str) -> Option<&VirtualProperty> {
        self.virtual_properties.iter().find(|p| p.name == name)
    }

    pub fn virtual_method(&self, name: &str) -> Option<&VirtualMethod> {
        self.virtual_methods
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(name))
    }

    pub fn virtual_properties(&self) -> &[VirtualProperty] {
        &self.virtual_properties
    }

    pub fn virtual_methods(&self) -> &[VirtualMethod] {
        &self.virtual_methods
    }

    pub fn declared_properties(&self) -> &[DeclaredProperty] {
        &self.declared_properties
    }

    pub fn declared_methods(&self) -> &[DeclaredMethod] {
        &self.declared_methods
    }
}
