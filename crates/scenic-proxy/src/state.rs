//! Application state

use anyhow::Result;
use std::sync::Arc;

use crate::config::Config;
use crate::remote::ResourceApi;
use crate::vertex::HttpResourceApi;

/// Shared application state
pub struct AppState {
    /// Remote files/scenes API
    pub api: Arc<dyn ResourceApi>,
    /// Configuration
    pub config: Config,
}

impl AppState {
    /// Create state backed by the HTTP remote API
    pub fn new(config: Config) -> Result<Arc<Self>> {
        let api = Arc::new(HttpResourceApi::new(&config.vertex)?);
        Ok(Self::with_api(config, api))
    }

    pub fn with_api(config: Config, api: Arc<dyn ResourceApi>) -> Arc<Self> {
        Arc::new(Self { api, config })
    }
}
