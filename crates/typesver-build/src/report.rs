//! Build results

use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use typesver_config::CompilerVersion;
use walkdir::WalkDir;

const DECLARATION_EXTENSIONS: [&str; 3] = [".d.ts", ".d.mts", ".d.cts"];

/// What happened to one requested version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionOutcome {
    /// Declarations emitted
    Built,
    /// Compiled in check-only mode
    Checked,
    /// Below the manifest minimum and not built
    Skipped,
}

impl VersionOutcome {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Built => "built",
            Self::Checked => "checked",
            Self::Skipped => "skipped",
        }
    }
}

/// Per-version result
#[derive(Debug, Clone, Serialize)]
pub struct VersionReport {
    pub version: CompilerVersion,
    pub outcome: VersionOutcome,
    pub typings_dir: String,
    /// Declaration files found in the typings directory afterwards
    pub declaration_files: usize,
    /// Listed in `typesVersions`
    pub advertised: bool,
    #[serde(rename = "elapsed_ms", serialize_with = "as_millis")]
    pub elapsed: Duration,
}

/// Result of a whole multi-version build
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub mode: String,
    pub output_dir: String,
    pub versions: Vec<VersionReport>,
    /// The computed `typesVersions` section
    pub types_versions: Value,
    /// The computed legacy `types` entry
    pub types: Option<String>,
    pub manifest_written: bool,
    #[serde(rename = "total_ms", serialize_with = "as_millis")]
    pub total_time: Duration,
}

impl BuildReport {
    pub fn built(&self) -> impl Iterator<Item = &VersionReport> {
        self.versions
            .iter()
            .filter(|v| v.outcome != VersionOutcome::Skipped)
    }

    pub fn skipped(&self) -> impl Iterator<Item = &VersionReport> {
        self.versions
            .iter()
            .filter(|v| v.outcome == VersionOutcome::Skipped)
    }

    pub fn total_declaration_files(&self) -> usize {
        self.versions.iter().map(|v| v.declaration_files).sum()
    }
}

fn as_millis<S: serde::Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_millis() as u64)
}

/// Count declaration files below `dir`; a missing directory counts zero
pub fn count_declaration_files(dir: &Path) -> usize {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            let name = entry.file_name().to_string_lossy();
            DECLARATION_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
        })
        .count()
}
