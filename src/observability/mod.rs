//! Logging and in-process metrics

mod format;
mod metrics;

pub use format::{LOCATION_WIDTH, TortFormatter, location_column};
pub use metrics::{Metrics, MetricsSnapshot};

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global subscriber. `RUST_LOG` wins over `default_directive`.
pub fn init_tracing(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .event_format(TortFormatter),
        )
        .init();
}
