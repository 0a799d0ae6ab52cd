//! Formal parameters and union type references.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A type reference as callers supply it: one type, or a list of alternatives.
///
/// Lists are flattened once, at registration time, into a single `|`-joined
/// string with empty alternatives dropped. Nothing downstream re-interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum TypeRef {
    One(String),
    Union(Vec<String>),
}

impl TypeRef {
    /// Flatten to the canonical textual form. Returns `None` when nothing remains.
    pub fn normalize(&self) -> Option<String> {
        let joined = match self {
            TypeRef::One(ty) => ty.clone(),
            TypeRef::Union(types) => types
                .iter()
                .filter(|ty| !ty.is_empty())
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join("|"),
        };
        (!joined.is_empty()).then_some(joined)
    }
}

impl From<&str> for TypeRef {
    fn from(ty: &str) -> Self {
        TypeRef::One(ty.to_string())
    }
}

impl From<String> for TypeRef {
    fn from(ty: String) -> Self {
        TypeRef::One(ty)
    }
}

impl From<Vec<String>> for TypeRef {
    fn from(types: Vec<String>) -> Self {
        TypeRef::Union(types)
    }
}

impl From<Vec<&str>> for TypeRef {
    fn from(types: Vec<&str>) -> Self {
        TypeRef::Union(types.into_iter().map(String::from).collect())
    }
}

impl<const N: usize> From<[&str; N]> for TypeRef {
    fn from(types: [&str; N]) -> Self {
        TypeRef::Union(types.map(String::from).to_vec())
    }
}

/// One formal parameter of a method signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    name: String,
    ty: Option<String>,
    default: Option<String>,
}

impl Argument {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: None,
            default: None,
        }
    }

    /// Set the parameter type. Union lists are flattened immediately.
    pub fn typed(mut self, ty: impl Into<TypeRef>) -> Self {
        self.ty = ty.into().normalize();
        self
    }

    /// Set the raw default value text, e.g. `null` or `[]`.
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Render the signature fragment: `<type> $<name> = <default>`.
    pub fn build(&self) -> String {
        let mut out = String::new();
        if let Some(ty) = &self.ty {
            out.push_str(ty);
            out.push(' ');
        }
        out.push('$');
        out.push_str(&self.name);
        if let Some(default) = &self.default {
            out.push_str(" = ");
            out.push_str(default);
        }
        out
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.build())
    }
}

/// Render a parameter list without the surrounding parentheses.
pub fn join_arguments(arguments: &[Argument]) -> String {
    arguments
        .iter()
        .map(Argument::build)
        .collect::<Vec<_>>()
        .join(", ")
}
