//! Compiler versions and version sets
//!
//! Versions are compared numerically per component, so `3.10` sorts above
//! `3.9`. The original token is kept verbatim because it ends up in directory
//! names and manifest range keys.

use crate::{ConfigError, ConfigResult};
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Compiler versions built when the caller does not choose any
pub const DEFAULT_COMPILER_VERSIONS: [&str; 3] = ["3.1", "3.0", "2.9"];

/// A single compiler version token such as `3.1`
#[derive(Debug, Clone)]
pub struct CompilerVersion {
    token: String,
    version: semver::Version,
}

impl CompilerVersion {
    /// Parse a dotted numeric version with one to three components
    pub fn parse(token: &str) -> ConfigResult<Self> {
        let token = token.trim();
        let invalid = || ConfigError::InvalidVersionFormat(token.to_string());

        let parts: Vec<&str> = token.split('.').collect();
        if token.is_empty() || parts.len() > 3 {
            return Err(invalid());
        }

        let mut numbers = [0u64; 3];
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            // `3.01` would produce a range key semver refuses
            if part.len() > 1 && part.starts_with('0') {
                return Err(invalid());
            }
            *slot = part.parse().map_err(|_| invalid())?;
        }

        Ok(Self {
            token: token.to_string(),
            version: semver::Version::new(numbers[0], numbers[1], numbers[2]),
        })
    }

    /// Build a `major.minor` version without going through parsing
    pub fn from_parts(major: u64, minor: u64) -> Self {
        Self {
            token: format!("{}.{}", major, minor),
            version: semver::Version::new(major, minor, 0),
        }
    }

    /// The version exactly as the user wrote it
    pub fn as_str(&self) -> &str {
        &self.token
    }

    /// Zero-padded semver form, used for range matching
    pub fn to_semver(&self) -> semver::Version {
        self.version.clone()
    }

    /// Range key advertised in the manifest (`>=3.1`)
    pub fn range_key(&self) -> String {
        format!(">={}", self.token)
    }
}

impl PartialEq for CompilerVersion {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version
    }
}

impl Eq for CompilerVersion {}

impl PartialOrd for CompilerVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CompilerVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.version.cmp(&other.version)
    }
}

impl fmt::Display for CompilerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token)
    }
}

impl FromStr for CompilerVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for CompilerVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.token)
    }
}

/// Non-empty set of distinct compiler versions
///
/// Iteration follows the order the caller supplied, which is the order builds
/// run in. Anything range-sensitive must go through [`VersionSet::sorted_descending`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionSet {
    versions: Vec<CompilerVersion>,
}

impl VersionSet {
    /// Parse every token, failing on the first malformed one
    pub fn parse<I, S>(tokens: I) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let versions = tokens
            .into_iter()
            .map(|t| CompilerVersion::parse(t.as_ref()))
            .collect::<ConfigResult<Vec<_>>>()?;
        Self::new(versions)
    }

    /// Parse a comma separated list such as `3.1,3.0`
    pub fn from_list(list: &str) -> ConfigResult<Self> {
        Self::parse(list.split(',').map(str::trim).filter(|t| !t.is_empty()))
    }

    /// Build from already parsed versions, dropping duplicates
    pub fn new(versions: Vec<CompilerVersion>) -> ConfigResult<Self> {
        let mut distinct: Vec<CompilerVersion> = Vec::with_capacity(versions.len());
        for version in versions {
            if !distinct.contains(&version) {
                distinct.push(version);
            }
        }

        if distinct.is_empty() {
            return Err(ConfigError::NoVersionsSpecified);
        }

        Ok(Self { versions: distinct })
    }

    /// The built-in default versions
    pub fn defaults() -> Self {
        Self::parse(DEFAULT_COMPILER_VERSIONS)
            .unwrap_or_else(|_| unreachable!("default compiler versions are valid"))
    }

    /// Versions in caller order
    pub fn iter(&self) -> std::slice::Iter<'_, CompilerVersion> {
        self.versions.iter()
    }

    pub fn as_slice(&self) -> &[CompilerVersion] {
        &self.versions
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    /// Always false; kept for API symmetry with collections
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Highest first, as required for range-key resolution
    pub fn sorted_descending(&self) -> Vec<CompilerVersion> {
        let mut sorted = self.versions.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        sorted
    }

    pub fn lowest(&self) -> &CompilerVersion {
        // Non-empty by construction
        self.versions
            .iter()
            .min()
            .unwrap_or_else(|| unreachable!("version set is never empty"))
    }

    /// Versions at or above `threshold`, highest first
    pub fn filter_at_least(&self, threshold: &CompilerVersion) -> Vec<CompilerVersion> {
        self.sorted_descending()
            .into_iter()
            .filter(|v| v >= threshold)
            .collect()
    }
}

impl<'a> IntoIterator for &'a VersionSet {
    type Item = &'a CompilerVersion;
    type IntoIter = std::slice::Iter<'a, CompilerVersion>;

    fn into_iter(self) -> Self::IntoIter {
        self.versions.iter()
    }
}

impl fmt::Display for VersionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tokens: Vec<&str> = self.versions.iter().map(|v| v.as_str()).collect();
        f.write_str(&tokens.join(", "))
    }
}
