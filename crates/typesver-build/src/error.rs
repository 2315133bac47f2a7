/// Build orchestration error types
use std::path::PathBuf;
use thiserror::Error;
use typesver_config::{CompilerVersion, ConfigError};
use typesver_package::PackageError;

pub type BuildResult<T> = Result<T, BuildError>;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Package(#[from] PackageError),

    #[error("Compilation failed for TypeScript {version} (exit code {exit_code})\n{diagnostics}")]
    CompileFailure {
        version: CompilerVersion,
        exit_code: i32,
        diagnostics: String,
    },

    #[error("Failed to launch compiler '{program}' for TypeScript {version}: {error}")]
    CompilerLaunch {
        version: CompilerVersion,
        program: String,
        error: std::io::Error,
    },

    #[error("I/O error at {path}: {error}")]
    Io {
        path: PathBuf,
        error: std::io::Error,
    },
}

impl BuildError {
    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, error: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            error,
        }
    }

    /// Create a compile failure from captured compiler output
    pub fn compile_failure(
        version: &CompilerVersion,
        exit_code: i32,
        diagnostics: impl Into<String>,
    ) -> Self {
        Self::CompileFailure {
            version: version.clone(),
            exit_code,
            diagnostics: diagnostics.into(),
        }
    }

    /// Create a compiler launch error
    pub fn compiler_launch(
        version: &CompilerVersion,
        program: impl Into<String>,
        error: std::io::Error,
    ) -> Self {
        Self::CompilerLaunch {
            version: version.clone(),
            program: program.into(),
            error,
        }
    }

    /// The compiler version that failed, when the error is version-specific
    pub fn version(&self) -> Option<&CompilerVersion> {
        match self {
            Self::CompileFailure { version, .. } | Self::CompilerLaunch { version, .. } => {
                Some(version)
            }
            _ => None,
        }
    }

    /// Compiler diagnostics, if any were captured
    pub fn diagnostics(&self) -> Option<&str> {
        match self {
            Self::CompileFailure { diagnostics, .. } => Some(diagnostics),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_accessor() {
        let v = CompilerVersion::parse("3.0").unwrap();
        let err = BuildError::compile_failure(&v, 2, "error TS2304");
        assert_eq!(err.version(), Some(&v));
        assert_eq!(err.diagnostics(), Some("error TS2304"));

        let err = BuildError::from(ConfigError::NoVersionsSpecified);
        assert_eq!(err.version(), None);
    }

    #[test]
    fn test_compile_failure_message() {
        let v = CompilerVersion::parse("2.9").unwrap();
        let err = BuildError::compile_failure(&v, 1, "src/index.ts(1,1): error");
        let message = err.to_string();
        assert!(message.contains("TypeScript 2.9"));
        assert!(message.contains("exit code 1"));
        assert!(message.contains("src/index.ts(1,1): error"));
    }
}
