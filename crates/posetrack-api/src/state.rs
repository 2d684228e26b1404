//! Application state.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use posetrack_store::{StoreClient, StoreConfig};

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub store: Arc<StoreClient>,
    /// Video ids with an analysis currently running; at most one job per
    /// video is admitted at a time.
    pub in_flight: Arc<Mutex<HashSet<String>>>,
}

impl AppState {
    /// Create new application state, connecting to the document store.
    pub async fn new(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let store = StoreClient::connect(&StoreConfig::from_env()).await?;

        Ok(Self {
            config,
            store: Arc::new(store),
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        })
    }
}
