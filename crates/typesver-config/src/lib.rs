//! typesver configuration layer
//!
//! Provides the configuration model that every multi-version build starts from:
//! - Compiler versions and ordered version sets
//! - Compiler configuration (tsconfig.json) access
//! - Strategy-driven merging of generated overrides into the user's config
//! - Feature gates for fields older compilers do not understand
//! - Output directory and typings path resolution
//! - Structured JSON file reading/writing with indentation preservation
//!
//! # Example
//!
//! ```no_run
//! use typesver_config::{CompilerConfig, VersionSet};
//! use std::path::Path;
//!
//! let versions = VersionSet::from_list("3.1,3.0,2.9").unwrap();
//! let config = CompilerConfig::load(Path::new("tsconfig.json")).unwrap();
//! let out_dir = typesver_config::output::resolve_output_dir(&config);
//! ```

pub mod config;
pub mod features;
pub mod json_file;
pub mod merge;
pub mod output;
pub mod version;

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid compiler version '{0}': expected dotted numeric version such as 3.1")]
    InvalidVersionFormat(String),

    #[error("No compiler versions specified")]
    NoVersionsSpecified,

    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read {path}: {error}")]
    IoError {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("Invalid JSON in {file}: {error}")]
    ParseError { file: PathBuf, error: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to write {path}: {error}")]
    WriteError {
        path: PathBuf,
        error: std::io::Error,
    },
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

// Re-export main types
pub use config::CompilerConfig;
pub use features::{FeatureGate, FeatureGates};
pub use json_file::{Indent, StructuredFile};
pub use merge::{EmitMode, GeneratedOptions, MergeOverride, MergeStrategy};
pub use output::DEFAULT_TYPINGS_PREFIX;
pub use version::{CompilerVersion, VersionSet, DEFAULT_COMPILER_VERSIONS};
