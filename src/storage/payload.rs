//! Loading upstream payload files.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, info};

use super::jsonl::{JsonlReader, JsonlWriter};
use super::{StorageConfig, StorageError};
use crate::models::{HistoryMatch, LiveEvent};
use crate::normalize::{dedup_matches, normalize_history, normalize_live_events};

/// Read a payload file as one JSON document, or as JSONL when it is not.
///
/// JSONL lines are gathered into an array so both forms share the
/// normalizer's envelope rules.
pub fn load_payload(path: &Path) -> Result<Value, StorageError> {
    if !path.exists() {
        return Err(StorageError::PathNotFound(path.to_path_buf()));
    }

    let contents = fs::read_to_string(path)?;
    if contents.trim().is_empty() {
        return Ok(Value::Array(Vec::new()));
    }

    match serde_json::from_str::<Value>(&contents) {
        Ok(value) => Ok(value),
        Err(document_err) => {
            let lines: Vec<Value> = JsonlReader::new(path.to_path_buf()).read_all()?;
            if lines.is_empty() {
                return Err(StorageError::Json(document_err));
            }
            debug!("Read {:?} as JSONL ({} lines)", path, lines.len());
            Ok(Value::Array(lines))
        }
    }
}

/// Modification time of a payload file, or now when the platform has none.
///
/// Serves as the kick-off time of records without one, so those records
/// keep the same time on every reload of an unchanged file.
pub fn modified_at(path: &Path) -> DateTime<Utc> {
    fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(|_| Utc::now())
}

/// Load, normalize and de-duplicate the history payload.
pub fn load_history(config: &StorageConfig) -> Result<Vec<HistoryMatch>, StorageError> {
    let path = config.history_path();
    let payload = load_payload(&path)?;
    let history = dedup_matches(normalize_history(&payload, modified_at(&path)));

    info!("Loaded {} history matches from {:?}", history.len(), path);
    Ok(history)
}

/// Load and normalize the live feed snapshot.
pub fn load_live_events(config: &StorageConfig) -> Result<Vec<LiveEvent>, StorageError> {
    let path = config.live_path();
    let payload = load_payload(&path)?;
    let events = normalize_live_events(&payload);

    debug!("Loaded {} live events from {:?}", events.len(), path);
    Ok(events)
}

/// Write normalized history as JSONL, replacing any previous output.
pub fn write_normalized_history(
    config: &StorageConfig,
    history: &[HistoryMatch],
) -> Result<usize, StorageError> {
    JsonlWriter::new(config.normalized_history_path()).write_all(history)
}
