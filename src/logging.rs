//! Logging setup: `tracing` events to stderr
//!
//! Level follows CLI verbosity unless `RUST_LOG` is set.

use std::sync::Once;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::cli::Verbosity;

static LOGGER_INIT: Once = Once::new();

/// Filter directive for a verbosity level
pub fn level_for(verbosity: Verbosity) -> &'static str {
    match verbosity {
        Verbosity::Quiet => "error",
        Verbosity::Normal => "warn",
        Verbosity::Verbose => "info",
        Verbosity::VeryVerbose => "debug",
    }
}

/// Install the global subscriber once; later calls are no-ops
pub fn init(verbosity: Verbosity, color: bool) {
    LOGGER_INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("surgassist={}", level_for(verbosity))));

        let stderr_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(color)
            .with_target(false)
            .compact();

        let _ = tracing_subscriber::registry()
            .with(stderr_layer.with_filter(filter))
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels() {
        assert_eq!(level_for(Verbosity::Quiet), "error");
        assert_eq!(level_for(Verbosity::Normal), "warn");
        assert_eq!(level_for(Verbosity::Verbose), "info");
        assert_eq!(level_for(Verbosity::VeryVerbose), "debug");
    }

    #[test]
    fn test_init_is_idempotent() {
        init(Verbosity::Quiet, false);
        init(Verbosity::VeryVerbose, false);
    }
}
