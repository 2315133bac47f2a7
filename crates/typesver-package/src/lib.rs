//! typesver package manifest handling
//!
//! Builds the `typesVersions` section that lets consumers pick the
//! declaration set matching their compiler, and writes it (plus the legacy
//! `types` entry) into `package.json` without disturbing anything else.

pub mod manifest;
pub mod types_versions;

pub use manifest::PackageManifest;
pub use types_versions::{legacy_entry, minimum_manifest_version, SectionEntry, TypesVersionsSection};

use std::path::PathBuf;

/// Package manifest errors
#[derive(Debug, thiserror::Error)]
pub enum PackageError {
    #[error("Failed to read manifest {path}: {error}")]
    ManifestRead {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("Failed to parse manifest {path}: {error}")]
    ManifestParse { path: PathBuf, error: String },

    #[error("Manifest {0} must contain a JSON object")]
    ManifestNotObject(PathBuf),

    #[error("Failed to write manifest {path}: {error}")]
    ManifestWrite {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("Invalid version range: {0}")]
    InvalidRange(String),
}

pub type PackageResult<T> = std::result::Result<T, PackageError>;
