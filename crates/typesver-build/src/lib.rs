//! typesver build orchestration
//!
//! Runs one compiler per requested version against a merged, version-specific
//! copy of the project's tsconfig and publishes the results in `package.json`:
//! - Build options and below-threshold policy
//! - Per-version phase state machine
//! - Compiler location and process execution
//! - Build reports with per-version outcomes

pub mod builder;
pub mod compiler;
pub mod error;
pub mod options;
pub mod report;
pub mod runner;
pub mod unit;

// Re-export main types
pub use builder::BuildOrchestrator;
pub use compiler::{compiler_args, compiler_binary};
pub use error::{BuildError, BuildResult};
pub use options::{BelowThresholdPolicy, BuildOptions};
pub use report::{BuildReport, VersionOutcome, VersionReport};
pub use runner::{ProcessOutput, ProcessRunner, SystemRunner};
pub use unit::{BuildPhase, BuildUnit};

// Re-export config types callers need to assemble options
pub use typesver_config::{CompilerVersion, EmitMode, FeatureGates, VersionSet};
