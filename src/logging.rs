//! Tracing setup. Everything goes to stderr so tool output on stdout stays
//! untouched.

use crate::settings::{DEFAULT_LOG_FILTER, LogFormat, Settings};

use std::sync::OnceLock;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Install the global subscriber. Later calls are no-ops.
pub fn init(settings: &Settings) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let (filter, bad_filter) = match EnvFilter::try_new(&settings.log_filter) {
            Ok(filter) => (filter, false),
            Err(_) => (EnvFilter::new(DEFAULT_LOG_FILTER), true),
        };

        let layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false);

        let installed = match settings.log_format {
            LogFormat::Text => tracing_subscriber::registry()
                .with(layer.with_filter(filter))
                .try_init(),
            LogFormat::Json => tracing_subscriber::registry()
                .with(layer.json().with_filter(filter))
                .try_init(),
        };

        if installed.is_err() {
            tracing::debug!("global tracing subscriber already initialized");
        }
        if bad_filter {
            tracing::warn!(filter = %settings.log_filter, "invalid log filter, using {}", DEFAULT_LOG_FILTER);
        }
    });
}
