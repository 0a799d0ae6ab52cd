//! Structural facts about a target class.
//!
//! The generator never inspects source on its own; it asks a [`Reflector`]
//! for a [`ClassSnapshot`] once per run and treats it as immutable.

mod scanner;
mod source;

use std::path::PathBuf;

use anyhow::Result;

pub use scanner::{ClassDecl, ClassKind, scan_class};
pub use source::SourceReflector;

/// Everything the generator needs to know about one class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSnapshot {
    /// Fully-qualified name with a leading `\`.
    pub name: String,
    /// False for abstract classes, interfaces, traits and enums.
    pub instantiable: bool,
    /// Declared property names, inherited ones included.
    pub properties: Vec<String>,
    /// Declared method names, inherited ones included.
    pub methods: Vec<String>,
    /// Raw text of the existing annotation block, exactly as in `source`.
    pub doc_comment: Option<String>,
    /// Full text of the document declaring the class.
    pub source: String,
    /// Document the class was read from and where updates are written.
    pub path: PathBuf,
}

impl ClassSnapshot {
    /// Unqualified class name.
    pub fn short_name(&self) -> &str {
        short_name(&self.name)
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.properties.iter().any(|p| p == name)
    }

    /// Method names compare case-insensitively.
    pub fn has_method(&self, name: &str) -> bool {
        self.methods.iter().any(|m| m.eq_ignore_ascii_case(name))
    }
}

/// Resolves a fully-qualified class name to a snapshot.
///
/// An unknown or unreadable class is an error; an abstract one is not.
pub trait Reflector {
    fn reflect(&self, class: &str) -> Result<ClassSnapshot>;
}

/// Ensure a class name carries exactly one leading `\`.
pub fn normalize_class_name(name: &str) -> String {
    format!("\\{}", name.trim().trim_start_matches('\\'))
}

/// Last segment of a namespaced name.
pub fn short_name(name: &str) -> &str {
    name.rsplit('\\').next().unwrap_or(name)
}

/// Namespace part of a fully-qualified name, without leading or trailing `\`.
pub fn namespace_of(name: &str) -> &str {
    let name = name.trim_start_matches('\\');
    name.rsplit_once('\\').map_or("", |(ns, _)| ns)
}
