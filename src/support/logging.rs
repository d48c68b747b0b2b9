//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

/// Install the global subscriber. `RUST_LOG` overrides the configured level.
pub fn init_tracing(cfg: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.logging.level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = if cfg.logging.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    // A second init (tests, embedding applications) keeps the first subscriber
    if let Err(e) = result {
        tracing::debug!("Tracing already initialized: {}", e);
    }
}
