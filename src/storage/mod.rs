//! Filesystem storage for match payloads.
//!
//! The engine reads two upstream payloads from the data directory:
//! - the match history (JSON document or JSONL)
//! - the current live feed snapshot
//!
//! Normalized history can be written back as JSONL.

pub mod jsonl;
pub mod payload;

pub use jsonl::{JsonlReader, JsonlWriter};
pub use payload::{
    load_history, load_live_events, load_payload, modified_at, write_normalized_history,
};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),
}

/// Locations of the payload files.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub history_file: String,
    pub live_file: String,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            history_file: "history.json".to_string(),
            live_file: "live.json".to_string(),
        }
    }

    /// Builder method to override the payload file names.
    pub fn with_files(mut self, history_file: &str, live_file: &str) -> Self {
        self.history_file = history_file.to_string();
        self.live_file = live_file.to_string();
        self
    }

    pub fn history_path(&self) -> PathBuf {
        self.data_dir.join(&self.history_file)
    }

    pub fn live_path(&self) -> PathBuf {
        self.data_dir.join(&self.live_file)
    }

    pub fn normalized_dir(&self) -> PathBuf {
        self.data_dir.join("normalized")
    }

    pub fn normalized_history_path(&self) -> PathBuf {
        self.normalized_dir().join("history.jsonl")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}
