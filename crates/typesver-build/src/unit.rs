//! Per-version build state
//!
//! A [`BuildUnit`] lives for exactly one version's pass and walks the phases
//!
//! ```text
//! Cleaning -> ConfigWritten -> Compiling -> ManifestUpdated -> Cleanup -> Done
//! ```
//!
//! `ManifestUpdated` is skipped when the manifest is not written. `Failed` can
//! be entered from any non-terminal phase.

use std::fmt;
use std::path::PathBuf;
use tracing::debug;
use typesver_config::CompilerVersion;

/// Phase of one version's build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildPhase {
    Cleaning,
    ConfigWritten,
    Compiling,
    ManifestUpdated,
    Cleanup,
    Done,
    Failed,
}

impl BuildPhase {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Cleaning => "cleaning",
            Self::ConfigWritten => "config-written",
            Self::Compiling => "compiling",
            Self::ManifestUpdated => "manifest-updated",
            Self::Cleanup => "cleanup",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Whether `next` may directly follow this phase
    pub fn can_transition_to(&self, next: BuildPhase) -> bool {
        use BuildPhase::*;

        if self.is_terminal() {
            return false;
        }
        matches!(
            (*self, next),
            (_, Failed)
                | (Cleaning, ConfigWritten)
                | (ConfigWritten, Compiling)
                | (Compiling, ManifestUpdated)
                | (Compiling, Cleanup)
                | (ManifestUpdated, Cleanup)
                | (Cleanup, Done)
        )
    }
}

impl fmt::Display for BuildPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// State of the version currently being built
#[derive(Debug, Clone)]
pub struct BuildUnit {
    pub version: CompilerVersion,
    /// Generated `tsconfig.<version>.json`
    pub temp_config_path: PathBuf,
    /// Output directory as written in the config (relative to it)
    pub output_dir: String,
    /// Typings directory as written in the config and manifest
    pub typings_dir: String,
    /// Typings directory on disk
    pub typings_path: PathBuf,
    phase: BuildPhase,
    history: Vec<BuildPhase>,
}

impl BuildUnit {
    pub fn new(
        version: CompilerVersion,
        temp_config_path: PathBuf,
        output_dir: String,
        typings_dir: String,
        typings_path: PathBuf,
    ) -> Self {
        Self {
            version,
            temp_config_path,
            output_dir,
            typings_dir,
            typings_path,
            phase: BuildPhase::Cleaning,
            history: vec![BuildPhase::Cleaning],
        }
    }

    pub fn phase(&self) -> BuildPhase {
        self.phase
    }

    /// Every phase entered so far, in order
    pub fn history(&self) -> &[BuildPhase] {
        &self.history
    }

    /// Move to the next phase
    pub fn advance(&mut self, next: BuildPhase) {
        debug_assert!(
            self.phase.can_transition_to(next),
            "invalid build phase transition {} -> {}",
            self.phase,
            next
        );
        debug!(version = %self.version, from = %self.phase, to = %next, "Build phase");
        self.phase = next;
        self.history.push(next);
    }

    /// Mark the unit failed unless it already finished
    pub fn fail(&mut self) {
        if !self.phase.is_terminal() {
            self.advance(BuildPhase::Failed);
        }
    }
}
