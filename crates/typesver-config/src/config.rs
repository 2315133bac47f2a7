//! Compiler configuration (tsconfig.json)
//!
//! The configuration is kept as an order-preserving JSON object so fields this
//! crate does not know about survive a read/merge/write cycle untouched. Typed
//! accessors cover the handful of fields the build actually reasons about.

use crate::json_file::{self, Indent, StructuredFile};
use crate::{ConfigError, ConfigResult};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::Path;

pub const COMPILER_OPTIONS: &str = "compilerOptions";
pub const EXCLUDE: &str = "exclude";

/// Well-known `compilerOptions` keys
pub mod options {
    pub const OUT_DIR: &str = "outDir";
    pub const OUT_FILE: &str = "outFile";
    /// Pre-2.0 spelling of `outFile`, still honoured by the compiler
    pub const OUT: &str = "out";
    pub const DECLARATION: &str = "declaration";
    pub const DECLARATION_DIR: &str = "declarationDir";
    pub const DECLARATION_MAP: &str = "declarationMap";
    pub const EMIT_DECLARATION_ONLY: &str = "emitDeclarationOnly";
    pub const NO_EMIT: &str = "noEmit";
    pub const NO_EMIT_ON_ERROR: &str = "noEmitOnError";
}

/// A compiler configuration object
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct CompilerConfig {
    root: Map<String, Value>,
}

impl CompilerConfig {
    /// Empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a parsed JSON value; anything but an object is rejected
    pub fn from_value(value: Value) -> ConfigResult<Self> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            other => Err(ConfigError::InvalidConfig(format!(
                "compiler configuration must be a JSON object, found {}",
                json_kind(&other)
            ))),
        }
    }

    /// Read a tsconfig file; comments and trailing commas are accepted
    pub fn load(path: &Path) -> ConfigResult<Self> {
        Self::load_structured(path).map(|(config, _)| config)
    }

    /// Read a tsconfig file together with its formatting attributes
    pub fn load_structured(path: &Path) -> ConfigResult<(Self, Indent)> {
        let StructuredFile {
            contents, indent, ..
        } = json_file::read_relaxed(path)?;
        let config = Self::from_value(contents).map_err(|e| ConfigError::ParseError {
            file: path.to_path_buf(),
            error: e.to_string(),
        })?;
        Ok((config, indent))
    }

    /// Write this configuration as JSON
    pub fn save(&self, path: &Path, indent: Indent) -> ConfigResult<()> {
        json_file::write_structured(path, &self.to_value(), indent, true)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.root
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.root.clone())
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.root)
    }

    /// The `compilerOptions` object, if present
    pub fn compiler_options(&self) -> Option<&Map<String, Value>> {
        self.root.get(COMPILER_OPTIONS).and_then(Value::as_object)
    }

    /// Look up a single compiler option
    pub fn option(&self, key: &str) -> Option<&Value> {
        self.compiler_options().and_then(|opts| opts.get(key))
    }

    /// String-valued compiler option; non-string values read as absent
    pub fn option_str(&self, key: &str) -> Option<&str> {
        self.option(key).and_then(Value::as_str)
    }

    pub fn option_bool(&self, key: &str) -> Option<bool> {
        self.option(key).and_then(Value::as_bool)
    }

    /// Set a compiler option, creating `compilerOptions` on demand
    pub fn set_option(&mut self, key: &str, value: Value) {
        let entry = self
            .root
            .entry(COMPILER_OPTIONS.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        if let Value::Object(opts) = entry {
            opts.insert(key.to_string(), value);
        }
    }

    /// Remove a compiler option, returning its previous value
    pub fn remove_option(&mut self, key: &str) -> Option<Value> {
        self.root
            .get_mut(COMPILER_OPTIONS)
            .and_then(Value::as_object_mut)
            .and_then(|opts| opts.shift_remove(key))
    }

    /// Entries of the top-level `exclude` list that are strings
    pub fn exclude(&self) -> Vec<&str> {
        self.root
            .get(EXCLUDE)
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Value at a dotted path such as `compilerOptions.declarationMap`
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        segments.try_fold(self.root.get(first)?, |value, segment| {
            value.as_object()?.get(segment)
        })
    }

    /// Remove the value at a dotted path, returning it
    pub fn remove_path(&mut self, path: &str) -> Option<Value> {
        match path.rsplit_once('.') {
            None => self.root.shift_remove(path),
            Some((parent, leaf)) => {
                let mut segments = parent.split('.');
                let first = segments.next()?;
                let mut current = self.root.get_mut(first)?;
                for segment in segments {
                    current = current.as_object_mut()?.get_mut(segment)?;
                }
                current.as_object_mut()?.shift_remove(leaf)
            }
        }
    }
}

impl From<Map<String, Value>> for CompilerConfig {
    fn from(root: Map<String, Value>) -> Self {
        Self { root }
    }
}

impl TryFrom<Value> for CompilerConfig {
    type Error = ConfigError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> CompilerConfig {
        CompilerConfig::from_value(json!({
            "extends": "./base.json",
            "compilerOptions": {
                "outDir": "dist",
                "strict": true,
                "declarationMap": true
            },
            "exclude": ["node_modules", 3]
        }))
        .unwrap()
    }

    #[test]
    fn test_rejects_non_object() {
        let err = CompilerConfig::from_value(json!(["a"])).unwrap_err();
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn test_typed_accessors() {
        let config = sample();
        assert_eq!(config.option_str(options::OUT_DIR), Some("dist"));
        assert_eq!(config.option_bool("strict"), Some(true));
        assert_eq!(config.option_str(options::OUT_FILE), None);
        assert_eq!(config.exclude(), vec!["node_modules"]);
    }

    #[test]
    fn test_set_option_creates_options_bag() {
        let mut config = CompilerConfig::new();
        config.set_option(options::DECLARATION, json!(true));
        assert_eq!(config.option_bool(options::DECLARATION), Some(true));
    }

    #[test]
    fn test_path_access() {
        let mut config = sample();
        assert_eq!(
            config.get_path("compilerOptions.declarationMap"),
            Some(&json!(true))
        );
        assert_eq!(config.get_path("compilerOptions.missing"), None);
        assert_eq!(config.get_path("extends.nested"), None);

        assert_eq!(
            config.remove_path("compilerOptions.declarationMap"),
            Some(json!(true))
        );
        assert_eq!(config.remove_path("compilerOptions.declarationMap"), None);
        assert_eq!(config.remove_path("extends"), Some(json!("./base.json")));
    }

    #[test]
    fn test_unknown_fields_kept_in_order() {
        let config = sample();
        let keys: Vec<&String> = config.as_map().keys().collect();
        assert_eq!(keys, vec!["extends", "compilerOptions", "exclude"]);
    }
}
