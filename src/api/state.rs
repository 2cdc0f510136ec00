use std::sync::Arc;

use crate::config::Config;
use crate::observability::Metrics;
use crate::processor::HashProcessor;

/// Shared, read-only handler state. Per-request values never live here.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub processor: Arc<dyn HashProcessor>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(config: Config, processor: Arc<dyn HashProcessor>) -> Self {
        Self {
            config: Arc::new(config),
            processor,
            metrics: Arc::new(Metrics::new()),
        }
    }
}
