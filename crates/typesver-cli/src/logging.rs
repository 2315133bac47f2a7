//! Log output setup
//!
//! Logs go to stderr so stdout stays reserved for results. `RUST_LOG` takes
//! precedence; otherwise the level comes from -v/-q, then `TYPESVER_LOG`.

use crate::config::Config;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init(verbose: bool, quiet: bool, config: &Config) {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let level = resolve_level(verbose, quiet, config.log_level.as_deref());

        let mut filter = EnvFilter::from_default_env();
        if std::env::var("RUST_LOG").is_err() {
            // Prefix match covers every typesver_* crate
            if let Ok(directive) = format!("typesver={}", level).parse() {
                filter = filter.add_directive(directive);
            }
        }

        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(!config.no_color)
                    .with_writer(std::io::stderr),
            )
            .init();
    });
}

fn resolve_level(verbose: bool, quiet: bool, configured: Option<&str>) -> Level {
    if verbose {
        Level::DEBUG
    } else if quiet {
        Level::ERROR
    } else {
        configured.map(parse_level).unwrap_or(Level::INFO)
    }
}

fn parse_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_configured_level() {
        assert_eq!(resolve_level(true, false, Some("error")), Level::DEBUG);
        assert_eq!(resolve_level(false, true, Some("trace")), Level::ERROR);
        assert_eq!(resolve_level(false, false, Some("warn")), Level::WARN);
        assert_eq!(resolve_level(false, false, None), Level::INFO);
    }

    #[test]
    fn test_invalid_level_defaults_to_info() {
        assert_eq!(parse_level("loud"), Level::INFO);
        assert_eq!(parse_level("TRACE"), Level::TRACE);
    }
}
