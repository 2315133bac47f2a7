//! The `typesVersions` manifest section
//!
//! Consumers walk the section's keys in order and take the first range their
//! compiler satisfies, so entries are always emitted highest version first.

use crate::{PackageError, PackageResult};
use serde_json::{json, Map, Value};
use typesver_config::output::{self, typings_dir_for};
use typesver_config::{CompilerVersion, VersionSet};

/// Lowest version advertised in `typesVersions`
pub fn minimum_manifest_version() -> CompilerVersion {
    CompilerVersion::from_parts(2, 9)
}

/// One advertised version and the directory its typings live in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionEntry {
    pub version: CompilerVersion,
    pub typings_dir: String,
}

impl SectionEntry {
    /// `>=3.1`
    pub fn range_key(&self) -> String {
        self.version.range_key()
    }

    /// `dist/ts-types-versions-3.1/*`
    pub fn path_pattern(&self) -> String {
        format!("{}/*", self.typings_dir)
    }
}

/// Ordered `typesVersions` section
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypesVersionsSection {
    entries: Vec<SectionEntry>,
}

impl TypesVersionsSection {
    /// Build the section for every version at or above `minimum`
    ///
    /// `VersionSet` is never empty and already free of duplicates, so an
    /// empty section only means every version is below `minimum`.
    pub fn build(
        versions: &VersionSet,
        prefix: &str,
        output_dir: &str,
        minimum: &CompilerVersion,
    ) -> Self {
        let entries = versions
            .filter_at_least(minimum)
            .into_iter()
            .map(|version| SectionEntry {
                typings_dir: typings_dir_for(&version, output_dir, prefix),
                version,
            })
            .collect();

        Self { entries }
    }

    pub fn entries(&self) -> &[SectionEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.iter().map(SectionEntry::range_key).collect()
    }

    /// Resolve the entry a consumer running `active` would pick
    pub fn select(&self, active: &CompilerVersion) -> PackageResult<Option<&SectionEntry>> {
        let active = active.to_semver();
        for entry in &self.entries {
            let key = entry.range_key();
            let req = semver::VersionReq::parse(&key)
                .map_err(|e| PackageError::InvalidRange(format!("{}: {}", key, e)))?;
            if req.matches(&active) {
                return Ok(Some(entry));
            }
        }
        Ok(None)
    }

    /// JSON form, keys in descending version order
    pub fn to_value(&self) -> Value {
        let section: Map<String, Value> = self
            .entries
            .iter()
            .map(|e| (e.range_key(), json!({ "*": [e.path_pattern()] })))
            .collect();
        Value::Object(section)
    }
}

/// Declaration file for consumers that ignore `typesVersions`
pub fn legacy_entry(
    main_entry: Option<&str>,
    lowest: &CompilerVersion,
    prefix: &str,
    output_dir: &str,
) -> String {
    output::legacy_types_path_for(main_entry, lowest, prefix, output_dir)
}
