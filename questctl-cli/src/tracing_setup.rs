//! Tracing setup for the questctl CLI.
//!
//! Usage:
//!   questctl --debug ...              # Debug logging to console
//!   questctl --quiet ...              # Warnings and errors only
//!   RUST_LOG=questctl=debug questctl  # Fine-grained log control

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Tracing configuration options
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Enable debug logging (sets RUST_LOG=debug if not already set)
    pub debug: bool,
    /// Suppress info-level output (sets RUST_LOG=warn if not already set)
    pub quiet: bool,
}

/// Default filter directive when RUST_LOG is not set. Debug wins over
/// quiet when both flags are passed.
fn default_directive(config: &TracingConfig) -> &'static str {
    if config.debug {
        "debug"
    } else if config.quiet {
        "warn"
    } else {
        "info"
    }
}

/// Initialize tracing with console output
pub fn init_tracing(config: &TracingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(config)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.debug) // Show targets in debug mode
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_per_flag() {
        let base = TracingConfig::default();
        assert_eq!(default_directive(&base), "info");
        assert_eq!(
            default_directive(&TracingConfig { quiet: true, ..base.clone() }),
            "warn"
        );
        assert_eq!(
            default_directive(&TracingConfig { debug: true, ..base.clone() }),
            "debug"
        );
        // debug wins when both are set
        assert_eq!(
            default_directive(&TracingConfig { debug: true, quiet: true }),
            "debug"
        );
    }
}
