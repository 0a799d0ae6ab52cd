use std::{
    collections::{HashMap, HashSet},
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use super::{ClassSnapshot, Reflector, normalize_class_name, scan_class};

/// Reflects classes by scanning the files a class map points at.
///
/// Parents named in `extends` contribute their members when they are in the
/// class map too; parents outside the map are ignored.
#[derive(Debug, Clone, Default)]
pub struct SourceReflector {
    classes: HashMap<String, PathBuf>,
}

impl SourceReflector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_class(mut self, class: &str, path: impl Into<PathBuf>) -> Self {
        self.insert(class, path);
        self
    }

    pub fn insert(&mut self, class: &str, path: impl Into<PathBuf>) {
        self.classes.insert(map_key(class), path.into());
    }

    pub fn path_of(&self, class: &str) -> Option<&Path> {
        self.classes.get(&map_key(class)).map(PathBuf::as_path)
    }

    fn read(&self, class: &str) -> Result<(PathBuf, String)> {
        let path = self
            .path_of(class)
            .with_context(|| format!("Class {} is not in the class map", class))?;
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        Ok((path.to_path_buf(), source))
    }

    fn inherit(
        &self,
        mut parent: Option<String>,
        properties: &mut Vec<String>,
        methods: &mut Vec<String>,
    ) -> Result<()> {
        let mut visited = HashSet::new();
        while let Some(class) = parent.take() {
            if !visited.insert(map_key(&class)) || self.path_of(&class).is_none() {
                break;
            }
            let (path, source) = self.read(&class)?;
            let decl = scan_class(&source, &class)
                .with_context(|| format!("Failed to scan {} in {}", class, path.display()))?;
            merge_names(properties, decl.properties);
            merge_names(methods, decl.methods);
            parent = decl.parent;
        }
        Ok(())
    }
}

impl Reflector for SourceReflector {
    fn reflect(&self, class: &str) -> Result<ClassSnapshot> {
        let name = normalize_class_name(class);
        let (path, source) = self.read(&name)?;
        let decl = scan_class(&source, &name)
            .with_context(|| format!("Failed to scan {} in {}", name, path.display()))?;

        let instantiable = decl.is_instantiable();
        let mut properties = decl.properties;
        let mut methods = decl.methods;
        self.inherit(decl.parent, &mut properties, &mut methods)?;

        Ok(ClassSnapshot {
            name,
            instantiable,
            properties,
            methods,
            doc_comment: decl.doc_comment,
            source,
            path,
        })
    }
}

fn map_key(class: &str) -> String {
    normalize_class_name(class).to_ascii_lowercase()
}

fn merge_names(names: &mut Vec<String>, inherited: Vec<String>) {
    for name in inherited {
        if !names.contains(&name) {
            names.push(name);
        }
    }
}
