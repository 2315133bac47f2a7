//! Package manifest (package.json)
//!
//! Only `main`, `types` and `typesVersions` are interpreted. Every other field
//! is carried through untouched, in its original position, and the file is
//! written back with the indentation it was read with.

use crate::types_versions::TypesVersionsSection;
use crate::{PackageError, PackageResult};
use serde_json::{Map, Value};
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;
use typesver_config::json_file::{read_structured, to_string_with_indent, Indent, StructuredFile};
use typesver_config::ConfigError;

pub const TYPES_VERSIONS: &str = "typesVersions";
pub const TYPES: &str = "types";
pub const MAIN: &str = "main";

/// Parsed `package.json`
#[derive(Debug, Clone, PartialEq)]
pub struct PackageManifest {
    root: Map<String, Value>,
    indent: Indent,
    trailing_newline: bool,
}

impl PackageManifest {
    /// Parse manifest text, remembering its formatting
    pub fn parse(text: &str, path: &Path) -> PackageResult<Self> {
        let file = StructuredFile::parse(text, path).map_err(|e| manifest_error(path, e))?;
        Self::from_structured(file, path)
    }

    /// Load manifest from file
    pub fn load(path: &Path) -> PackageResult<Self> {
        let file = read_structured(path).map_err(|e| manifest_error(path, e))?;
        Self::from_structured(file, path)
    }

    fn from_structured(file: StructuredFile, path: &Path) -> PackageResult<Self> {
        match file.contents {
            Value::Object(root) => Ok(Self {
                root,
                indent: file.indent,
                trailing_newline: file.trailing_newline,
            }),
            _ => Err(PackageError::ManifestNotObject(path.to_path_buf())),
        }
    }

    /// Render with the original formatting
    pub fn to_json_string(&self) -> serde_json::Result<String> {
        let mut text = to_string_with_indent(&self.root, self.indent)?;
        if self.trailing_newline {
            text.push('\n');
        }
        Ok(text)
    }

    /// Write manifest back to disk
    pub fn save(&self, path: &Path) -> PackageResult<()> {
        debug!(path = %path.display(), indent = %self.indent, "Writing package manifest");
        let write_error = |error: io::Error| PackageError::ManifestWrite {
            path: path.to_path_buf(),
            error,
        };
        let text = self.to_json_string().map_err(|e| write_error(e.into()))?;
        fs::write(path, text).map_err(write_error)
    }

    pub fn indent(&self) -> Indent {
        self.indent
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.root.get(key)
    }

    pub fn name(&self) -> Option<&str> {
        self.root.get("name").and_then(Value::as_str)
    }

    /// The `main` entry point, if it is a string
    pub fn main(&self) -> Option<&str> {
        self.root.get(MAIN).and_then(Value::as_str)
    }

    pub fn types(&self) -> Option<&str> {
        self.root.get(TYPES).and_then(Value::as_str)
    }

    pub fn types_versions(&self) -> Option<&Value> {
        self.root.get(TYPES_VERSIONS)
    }

    /// Install the version section and legacy types entry
    ///
    /// Existing keys are replaced where they stand; new keys are appended. An
    /// empty section removes `typesVersions` altogether.
    pub fn apply_types_versions(&mut self, section: &TypesVersionsSection, legacy: &str) {
        if section.is_empty() {
            self.root.shift_remove(TYPES_VERSIONS);
        } else {
            self.root
                .insert(TYPES_VERSIONS.to_string(), section.to_value());
        }
        self.root
            .insert(TYPES.to_string(), Value::String(legacy.to_string()));
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.root
    }
}

fn manifest_error(path: &Path, error: ConfigError) -> PackageError {
    let path = path.to_path_buf();
    match error {
        ConfigError::NotFound(_) => PackageError::ManifestRead {
            path,
            error: io::Error::from(io::ErrorKind::NotFound),
        },
        ConfigError::IoError { error, .. } => PackageError::ManifestRead { path, error },
        ConfigError::WriteError { error, .. } => PackageError::ManifestWrite { path, error },
        ConfigError::ParseError { error, .. } => PackageError::ManifestParse { path, error },
        other => PackageError::ManifestParse {
            path,
            error: other.to_string(),
        },
    }
}
