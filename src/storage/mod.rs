//! Filesystem storage for recorded games and penalties.
//!
//! Records live under the data directory as JSON Lines files:
//! - `games.jsonl`: match records
//! - `penalties.jsonl`: penalty records

pub mod jsonl;

pub use jsonl::*;

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn path_for(&self, collection: Collection) -> PathBuf {
        self.data_dir.join(collection.filename())
    }

    pub fn games_path(&self) -> PathBuf {
        self.path_for(Collection::Games)
    }

    pub fn penalties_path(&self) -> PathBuf {
        self.path_for(Collection::Penalties)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}
