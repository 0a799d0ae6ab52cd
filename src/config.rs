use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result, bail};
use serde::{Deserialize, Serialize};

use crate::argument::{Argument, TypeRef};
use crate::entries::{
    DeclaredMethod, DeclaredProperty, Entries, VirtualMethod, VirtualProperty, Visibility,
};
use crate::reflect::{SourceReflector, normalize_class_name};

pub const CONFIG_FILE_NAME: &str = ".vmdocrc.json";

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_source_root")]
    pub source_root: String,
    #[serde(default)]
    pub reset: bool,
    #[serde(default)]
    pub overwrite: bool,
    #[serde(default)]
    pub classes: Vec<ClassTarget>,
}

/// One class to annotate and the members to describe on it.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassTarget {
    pub class: String,
    pub file: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<PropertySpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<MethodSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub declared_properties: Vec<DeclaredPropertySpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub declared_methods: Vec<DeclaredMethodSpec>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ArgumentSpec {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<TypeRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PropertySpec {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<TypeRef>,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub write: bool,
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MethodSpec {
    pub name: String,
    #[serde(default)]
    pub arguments: Vec<ArgumentSpec>,
    #[serde(rename = "return", default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<TypeRef>,
    #[serde(rename = "static", default)]
    pub is_static: bool,
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DeclaredPropertySpec {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<TypeRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(rename = "static", default)]
    pub is_static: bool,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub visibility: Visibility,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DeclaredMethodSpec {
    pub name: String,
    #[serde(default)]
    pub arguments: Vec<ArgumentSpec>,
    #[serde(rename = "return", default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<TypeRef>,
    #[serde(rename = "static", default)]
    pub is_static: bool,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub body: String,
}

fn default_source_root() -> String {
    "./".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_root: default_source_root(),
            reset: false,
            overwrite: false,
            classes: Vec::new(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error if a target has no class name or file, or if two
    /// targets name the same class.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for (idx, target) in self.classes.iter().enumerate() {
            if target.class.trim().trim_start_matches('\\').is_empty() {
                bail!("Missing class name in 'classes[{}]'", idx);
            }
            if target.file.trim().is_empty() {
                bail!("Missing file for class \"{}\"", target.class);
            }
            let key = normalize_class_name(&target.class).to_ascii_lowercase();
            if !seen.insert(key) {
                bail!("Duplicate class in 'classes': \"{}\"", target.class);
            }
        }

        Ok(())
    }

    /// A reflector that knows every configured class, with files resolved
    /// against `base_dir` joined with `sourceRoot`.
    pub fn reflector(&self, base_dir: &Path) -> SourceReflector {
        let root = base_dir.join(&self.source_root);
        let mut reflector = SourceReflector::new();
        for target in &self.classes {
            // Drops `.` components so reported paths stay readable.
            let path: PathBuf = root.join(&target.file).components().collect();
            reflector.insert(&target.class, path);
        }
        reflector
    }
}

impl From<&ArgumentSpec> for Argument {
    fn from(spec: &ArgumentSpec) -> Self {
        let mut argument = Argument::new(&spec.name);
        if let Some(ty) = &spec.ty {
            argument = argument.typed(ty.clone());
        }
        if let Some(default) = &spec.default {
            argument = argument.with_default(default);
        }
        argument
    }
}

fn arguments(specs: &[ArgumentSpec]) -> Vec<Argument> {
    specs.iter().map(Argument::from).collect()
}

impl ClassTarget {
    /// Register every configured member with `entries`.
    pub fn register(&self, entries: &mut Entries) {
        for spec in &self.properties {
            let mut property = VirtualProperty::new(&spec.name)
                .readable(spec.read)
                .writable(spec.write)
                .comment(&spec.comment);
            if let Some(ty) = &spec.ty {
                property = property.typed(ty.clone());
            }
            entries.add_virtual_property(property);
        }

        for spec in &self.methods {
            let mut method = VirtualMethod::new(&spec.name)
                .arguments(arguments(&spec.arguments))
                .set_static(spec.is_static)
                .comment(&spec.comment);
            if let Some(ty) = &spec.return_type {
                method = method.returns(ty.clone());
            }
            entries.add_virtual_method(method);
        }

        for spec in &self.declared_properties {
            let mut property = DeclaredProperty::new(&spec.name)
                .set_static(spec.is_static)
                .comment(&spec.comment)
                .visibility(spec.visibility);
            if let Some(ty) = &spec.ty {
                property = property.typed(ty.clone());
            }
            if let Some(default) = &spec.default {
                property = property.default_value(default);
            }
            entries.add_declared_property(property);
        }

        for spec in &self.declared_methods {
            let mut method = DeclaredMethod::new(&spec.name)
                .arguments(arguments(&spec.arguments))
                .set_static(spec.is_static)
                .comment(&spec.comment)
                .visibility(spec.visibility)
                .body(&spec.body);
            if let Some(ty) = &spec.return_type {
                method = method.returns(ty.clone());
            }
            entries.add_declared_method(method);
        }
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// Path of the file the config was read from, if any.
    pub path: Option<PathBuf>,
}

impl ConfigLoadResult {
    /// Directory that relative paths in the config resolve against.
    pub fn base_dir(&self, fallback: &Path) -> PathBuf {
        self.path
            .as_deref()
            .and_then(Path::parent)
            .map_or_else(|| fallback.to_path_buf(), Path::to_path_buf)
    }
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                path: Some(path),
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            path: None,
        }),
    }
}
