//! Build configuration
//!
//! [`BuildOptions`] is resolved once by the caller and handed to the
//! orchestrator; nothing in the build reads the environment on its own.

use std::fmt;
use std::path::{Path, PathBuf};
use typesver_config::{
    CompilerVersion, EmitMode, FeatureGates, VersionSet, DEFAULT_TYPINGS_PREFIX,
};
use typesver_package::minimum_manifest_version;

/// What to do with requested versions below the manifest minimum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BelowThresholdPolicy {
    /// Build the version but leave it out of `typesVersions`
    #[default]
    BuildUnadvertised,
    /// Do not build the version at all
    Skip,
}

impl BelowThresholdPolicy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::BuildUnadvertised => "build-unadvertised",
            Self::Skip => "skip",
        }
    }
}

impl fmt::Display for BelowThresholdPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything one multi-version build needs to know
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Project root; compilers are looked up under its `node_modules`
    pub project_dir: PathBuf,
    /// The user's compiler configuration
    pub tsconfig_path: PathBuf,
    /// The package manifest receiving `typesVersions`
    pub package_json_path: PathBuf,
    /// Versions to build, in build order
    pub versions: VersionSet,
    pub mode: EmitMode,
    /// Write the manifest after each version (ignored in check-only mode)
    pub write_manifest: bool,
    /// Keep `tsconfig.<version>.json` files for inspection
    pub preserve_temp_configs: bool,
    /// Typings directory prefix
    pub prefix: String,
    pub feature_gates: FeatureGates,
    /// Lowest version advertised in `typesVersions`
    pub manifest_minimum: CompilerVersion,
    pub below_threshold: BelowThresholdPolicy,
}

impl BuildOptions {
    /// Options for the project at `project_dir` using its `tsconfig.json`
    /// and `package.json`
    pub fn new(project_dir: impl Into<PathBuf>, versions: VersionSet) -> Self {
        let project_dir = project_dir.into();
        Self {
            tsconfig_path: project_dir.join("tsconfig.json"),
            package_json_path: project_dir.join("package.json"),
            project_dir,
            versions,
            mode: EmitMode::default(),
            write_manifest: true,
            preserve_temp_configs: false,
            prefix: DEFAULT_TYPINGS_PREFIX.to_string(),
            feature_gates: FeatureGates::default(),
            manifest_minimum: minimum_manifest_version(),
            below_threshold: BelowThresholdPolicy::default(),
        }
    }

    /// Relative paths resolve against the project directory
    pub fn with_tsconfig(mut self, path: impl Into<PathBuf>) -> Self {
        self.tsconfig_path = self.project_dir.join(path.into());
        self
    }

    /// Relative paths resolve against the project directory
    pub fn with_package_json(mut self, path: impl Into<PathBuf>) -> Self {
        self.package_json_path = self.project_dir.join(path.into());
        self
    }

    pub fn with_mode(mut self, mode: EmitMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_write_manifest(mut self, write_manifest: bool) -> Self {
        self.write_manifest = write_manifest;
        self
    }

    pub fn with_preserve_temp_configs(mut self, preserve: bool) -> Self {
        self.preserve_temp_configs = preserve;
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_feature_gates(mut self, gates: FeatureGates) -> Self {
        self.feature_gates = gates;
        self
    }

    pub fn with_manifest_minimum(mut self, minimum: CompilerVersion) -> Self {
        self.manifest_minimum = minimum;
        self
    }

    pub fn with_below_threshold(mut self, policy: BelowThresholdPolicy) -> Self {
        self.below_threshold = policy;
        self
    }

    /// Whether `package.json` is actually modified
    pub fn writes_manifest(&self) -> bool {
        self.write_manifest && !self.mode.is_check_only()
    }

    /// Directory holding the user's tsconfig; relative config paths resolve
    /// against it
    pub fn tsconfig_dir(&self) -> &Path {
        match self.tsconfig_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => &self.project_dir,
        }
    }

    /// `tsconfig.<version>.json` next to the user's tsconfig
    pub fn temp_config_path(&self, version: &CompilerVersion) -> PathBuf {
        self.tsconfig_dir()
            .join(format!("tsconfig.{}.json", version))
    }

    /// Split the requested versions into those to build and those skipped,
    /// both in caller order
    pub fn plan(&self) -> (Vec<CompilerVersion>, Vec<CompilerVersion>) {
        match self.below_threshold {
            BelowThresholdPolicy::BuildUnadvertised => (self.versions.as_slice().to_vec(), Vec::new()),
            BelowThresholdPolicy::Skip => self
                .versions
                .iter()
                .cloned()
                .partition(|v| v >= &self.manifest_minimum),
        }
    }
}
