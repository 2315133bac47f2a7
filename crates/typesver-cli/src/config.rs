//! CLI configuration via environment variables
//!
//! Build inputs come from flags (with clap `env` fallbacks); this covers the
//! remaining process-wide settings.

use std::env;

/// CLI configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Log level for typesver crates (TYPESVER_LOG), overridden by -v/-q
    pub log_level: Option<String>,
    /// Disable colored output (TYPESVER_NO_COLOR=1 or NO_COLOR=1)
    pub no_color: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            log_level: env::var("TYPESVER_LOG")
                .ok()
                .map(|v| v.trim().to_lowercase())
                .filter(|v| !v.is_empty()),
            no_color: env::var("TYPESVER_NO_COLOR").is_ok() || env::var("NO_COLOR").is_ok(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
