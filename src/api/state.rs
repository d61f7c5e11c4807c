use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::{AppConfig, StatsConfig};
use crate::storage::StorageConfig;

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<StorageConfig>,
    pub stats: Arc<StatsConfig>,
    pub cors_origin: Arc<str>,
    /// Held across read-modify-write of the record files
    pub write_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            storage: Arc::new(StorageConfig::new(config.data_dir.clone())),
            stats: Arc::new(config.stats.clone()),
            cors_origin: Arc::from(config.server.cors_origin.as_str()),
            write_lock: Arc::new(Mutex::new(())),
        }
    }
}
