//! Tracing setup driven by the `logging` config section

use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

use crate::config::{LogFormat, LoggingConfig};

/// Install the global subscriber. `RUST_LOG` overrides the configured level.
pub fn init_logging(config: &LoggingConfig) {
    build_subscriber(config).init();

    tracing::debug!(level = %config.level, "Logging initialized");
}

fn build_subscriber(config: &LoggingConfig) -> impl tracing::Subscriber + Send + Sync {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    // Requests are short-lived; per-event lines are enough, no span events.
    let format_layer = match config.format {
        LogFormat::Json => fmt::layer().json().boxed(),
        LogFormat::Pretty => fmt::layer().pretty().with_target(true).boxed(),
    };

    Registry::default().with(filter).with(format_layer)
}
