//! Logging initialization for deskreport.
//!
//! All log output goes to stderr so that stdout carries only report output.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

/// Resolve the filter directive: `RUST_LOG` wins, then `--debug`, then config
pub fn filter_directive(config: &Config, debug_override: bool, rust_log: Option<String>) -> String {
    rust_log.filter(|directive| !directive.trim().is_empty()).unwrap_or_else(|| {
        if debug_override {
            "debug".to_string()
        } else {
            config.logging.level.clone()
        }
    })
}

/// Initialize logging to stderr.
///
/// # Arguments
/// * `config` - Application configuration
/// * `debug_override` - If true, override log level to "debug" (from --debug flag)
pub fn init_logging(config: &Config, debug_override: bool) {
    let directive = filter_directive(config, debug_override, std::env::var("RUST_LOG").ok());
    let filter = EnvFilter::new(directive);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
