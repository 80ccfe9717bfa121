use crate::config::Config;
use crate::observability::metrics::Metrics;
use crate::store::Store;

pub struct AppState {
    pub store: Store,
    pub metrics: Metrics,
    pub default_page_size: usize,
    pub max_page_size: usize,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            store: Store::new(),
            metrics: Metrics::new(),
            default_page_size: config.default_page_size,
            max_page_size: config.max_page_size,
        }
    }
}
