//! Structured logging configuration.
//!
//! The subscriber is built as a value from [`LoggingConfig`]. The binary
//! installs it once at startup with [`init`]; tests can scope one with
//! `tracing::subscriber::with_default`. Library code only emits events.

use tracing::Subscriber;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

use crate::config::{ConfigError, LogFormat, LoggingConfig};

/// Boxed subscriber ready to be installed or scoped.
pub type BoxedSubscriber = Box<dyn Subscriber + Send + Sync + 'static>;

/// Build a subscriber from configuration.
pub fn build_subscriber(config: &LoggingConfig) -> Result<BoxedSubscriber, ConfigError> {
    let filter = EnvFilter::try_new(&config.level)
        .map_err(|e| ConfigError::invalid("logging.level", &config.level, e))?;
    let registry = tracing_subscriber::registry().with(filter);

    let subscriber: BoxedSubscriber = match config.format {
        LogFormat::Json => Box::new(
            registry.with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false),
            ),
        ),
        LogFormat::Pretty => Box::new(
            registry.with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true),
            ),
        ),
    };

    Ok(subscriber)
}

/// Build the subscriber and install it as the process default.
pub fn init(config: &LoggingConfig) -> Result<(), ConfigError> {
    let subscriber = build_subscriber(config)?;
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| ConfigError::Logging(e.to_string()))?;

    tracing::debug!(level = %config.level, format = ?config.format, "Logging initialized");
    Ok(())
}
