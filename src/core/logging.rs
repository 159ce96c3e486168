//! Logging configuration and initialization
//!
//! Sets up the tracing subscriber used for the release run. Every external
//! command is logged before it runs, so the log doubles as a transcript of
//! what was done to each repository.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Levels accepted in `LOG_LEVEL`, including the aliases operators tend to use
const VALID_LEVELS: [&str; 7] = ["trace", "debug", "info", "warning", "warn", "error", "critical"];

/// Map a configured log level onto a filter directive
///
/// Only the first word is considered so trailing comments in `.env` files
/// are tolerated. Unknown levels fall back to "info".
pub fn normalize_level(log_level: &str) -> &'static str {
    let level = log_level
        .split_whitespace()
        .next()
        .unwrap_or("info")
        .to_lowercase();

    if !VALID_LEVELS.contains(&level.as_str()) {
        return "info";
    }

    match level.as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "warning" | "warn" => "warn",
        "error" | "critical" => "error",
        _ => "info",
    }
}

/// Initialize the logging system with the specified level
///
/// `RUST_LOG` takes precedence over the configured level when set.
pub fn init_logging(log_level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(normalize_level(log_level)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_aliases() {
        assert_eq!(normalize_level("warning"), "warn");
        assert_eq!(normalize_level("CRITICAL"), "error");
        assert_eq!(normalize_level("debug # verbose while testing"), "debug");
    }

    #[test]
    fn test_normalize_unknown_falls_back_to_info() {
        assert_eq!(normalize_level("loud"), "info");
        assert_eq!(normalize_level(""), "info");
    }
}
