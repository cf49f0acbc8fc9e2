// Application state module
// Shared per-request state: config, store handle, proxy HTTP client

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use super::types::Config;
use crate::store::{FaceStore, JsonFileStore};

/// Application state
pub struct AppState {
    pub config: Config,
    /// Face document store; the trait keeps handlers agnostic of the medium
    pub store: Arc<dyn FaceStore>,
    /// Shared upstream client for the proxy endpoint
    pub http_client: reqwest::Client,

    // Cached config value for fast access without locks
    pub cached_access_log: Arc<AtomicBool>,
}

impl AppState {
    /// Create `AppState` with the file-backed store from `config`
    pub fn new(config: &Config) -> Result<Self, String> {
        let store = Arc::new(JsonFileStore::new(&config.storage.data_file));
        Self::with_store(config, store)
    }

    /// Create `AppState` over an explicit store implementation
    pub fn with_store(config: &Config, store: Arc<dyn FaceStore>) -> Result<Self, String> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.proxy.timeout_secs))
            .build()
            .map_err(|e| format!("Failed to build proxy HTTP client: {e}"))?;

        Ok(Self {
            config: config.clone(),
            store,
            http_client,
            cached_access_log: Arc::new(AtomicBool::new(config.logging.access_log)),
        })
    }
}
