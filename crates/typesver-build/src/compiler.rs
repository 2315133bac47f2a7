//! Locating and invoking a specific compiler version
//!
//! Each version is expected to be installed side by side under an aliased
//! package name, e.g. `npm install typescript-3.1@npm:typescript@3.1`.

use std::path::{Path, PathBuf};
use typesver_config::CompilerVersion;

/// Aliased package directory name for one compiler version
pub fn compiler_package_name(version: &CompilerVersion) -> String {
    format!("typescript-{}", version)
}

/// `<project>/node_modules/typescript-<version>/bin/tsc`
pub fn compiler_binary(project_dir: &Path, version: &CompilerVersion) -> PathBuf {
    project_dir
        .join("node_modules")
        .join(compiler_package_name(version))
        .join("bin")
        .join("tsc")
}

/// Arguments compiling the project described by `config_path`
pub fn compiler_args(config_path: &Path) -> Vec<String> {
    vec!["--project".to_string(), config_path.display().to_string()]
}
