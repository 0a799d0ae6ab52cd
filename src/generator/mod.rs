//! The generation pipeline for one class.
//!
//! ```text
//! reflect (snapshot, once)
//!     ↓
//! Handle::handle + listeners (populate entries)
//!     ↓
//! merge (annotation block) → splice (document text)
//!     ↓
//! write (only if the text changed)
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use vmdoc::entries::VirtualProperty;
//! use vmdoc::generator::Generator;
//! use vmdoc::reflect::SourceReflector;
//!
//! let reflector = SourceReflector::new().with_class("App\\User", "app/User.php");
//! let mut generator = Generator::new("App\\User", &reflector);
//! generator.add_virtual_property(VirtualProperty::new("name").typed("string").readable(true));
//! let outcome = generator.generate()?;
//! ```

mod merge;
mod render;
mod sort;
mod splice;

use std::{fs, path::PathBuf};

use anyhow::Result;

use crate::entries::{DeclaredMethod, DeclaredProperty, Entries, VirtualMethod, VirtualProperty};
use crate::reflect::{ClassSnapshot, Reflector, normalize_class_name};

pub use merge::merge_doc_block;
pub use render::{declared_method, declared_property, method_tag, property_tag, property_tag_name};
pub use sort::sort_tags;
pub use splice::{insert_methods, insert_properties, replace_doc_block, splice};

/// Receives progress notifications from a run.
pub trait Output {
    /// Work on a class is starting.
    fn comment(&self, message: &str);
    /// A document was written.
    fn info(&self, message: &str);
}

/// Class-specific population of entries, run after reflection.
pub trait Handle {
    /// Label used in progress messages.
    fn label(&self) -> &str {
        "class"
    }

    fn handle(&mut self, class: &ClassSnapshot, entries: &mut Entries);
}

/// Listener invoked after `Handle::handle` and before rendering.
pub type Listener<'a> = Box<dyn FnMut(&mut Entries, &ClassSnapshot) + 'a>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Discard every existing property/method tag.
    pub reset: bool,
    /// Let a pending entry replace an existing tag of the same name.
    pub overwrite: bool,
    /// Compute the new document but do not write it.
    pub dry_run: bool,
}

/// What a run did to the class document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The class cannot be instantiated; nothing was touched.
    Skipped,
    /// The document already matches.
    Unchanged { path: PathBuf },
    /// Dry run: the document would change to `contents`.
    Pending { path: PathBuf, contents: String },
    Written { path: PathBuf },
    WriteFailed { path: PathBuf, reason: String },
}

impl Outcome {
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Outcome::Skipped => None,
            Outcome::Unchanged { path }
            | Outcome::Pending { path, .. }
            | Outcome::Written { path }
            | Outcome::WriteFailed { path, .. } => Some(path),
        }
    }
}

pub struct Generator<'a> {
    class: String,
    options: GenerateOptions,
    entries: Entries,
    reflector: &'a dyn Reflector,
    handler: Option<Box<dyn Handle + 'a>>,
    listeners: Vec<Listener<'a>>,
    output: Option<&'a dyn Output>,
}

impl<'a> Generator<'a> {
    pub fn new(class: &str, reflector: &'a dyn Reflector) -> Self {
        Self {
            class: normalize_class_name(class),
            options: GenerateOptions::default(),
            entries: Entries::new(),
            reflector,
            handler: None,
            listeners: Vec::new(),
            output: None,
        }
    }

    pub fn with_options(mut self, options: GenerateOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_handler(mut self, handler: impl Handle + 'a) -> Self {
        self.handler = Some(Box::new(handler));
        self
    }

    pub fn with_output(mut self, output: &'a dyn Output) -> Self {
        self.output = Some(output);
        self
    }

    /// Register a listener that may add entries once the class is reflected.
    pub fn on_handled(
        &mut self,
        listener: impl FnMut(&mut Entries, &ClassSnapshot) + 'a,
    ) -> &mut Self {
        self.listeners.push(Box::new(listener));
        self
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn entries(&self) -> &Entries {
        &self.entries
    }

    pub fn add_virtual_property(&mut self, property: VirtualProperty) -> &mut Self {
        self.entries.add_virtual_property(property);
        self
    }

    pub fn add_virtual_method(&mut self, method: VirtualMethod) -> &mut Self {
        self.entries.add_virtual_method(method);
        self
    }

    pub fn add_declared_property(&mut self, property: DeclaredProperty) -> &mut Self {
        self.entries.add_declared_property(property);
        self
    }

    pub fn add_declared_method(&mut self, method: DeclaredMethod) -> &mut Self {
        self.entries.add_declared_method(method);
        self
    }

    /// Run the pipeline for this class.
    ///
    /// Fails only if the class cannot be reflected. Non-instantiable classes
    /// are skipped silently, and a failed write is reported as an outcome.
    pub fn generate(&mut self) -> Result<Outcome> {
        let snapshot = self.reflector.reflect(&self.class)?;
        if !snapshot.instantiable {
            return Ok(Outcome::Skipped);
        }

        let label = self.handler.as_ref().map_or("class", |h| h.label()).to_string();
        self.notify_comment(&format!("Loading {} '{}'", label, self.class));

        if let Some(handler) = self.handler.as_mut() {
            handler.handle(&snapshot, &mut self.entries);
        }
        for listener in &mut self.listeners {
            listener(&mut self.entries, &snapshot);
        }

        let doc_block = merge_doc_block(&snapshot, &self.entries, &self.options);
        let contents = splice(&snapshot, &self.entries, &doc_block);

        let path = snapshot.path;
        if contents == snapshot.source {
            return Ok(Outcome::Unchanged { path });
        }
        if self.options.dry_run {
            return Ok(Outcome::Pending { path, contents });
        }

        match fs::write(&path, &contents) {
            Ok(()) => {
                self.notify_info(&format!("Written new doc block to {}", path.display()));
                Ok(Outcome::Written { path })
            }
            Err(err) => Ok(Outcome::WriteFailed {
                path,
                reason: err.to_string(),
            }),
        }
    }

    fn notify_comment(&self, message: &str) {
        if let Some(output) = self.output {
            output.comment(message);
        }
    }

    fn notify_info(&self, message: &str) {
        if let Some(output) = self.output {
            output.info(message);
        }
    }
}
