//! Record file storage
//!
//! Each collection lives in a single JSON file holding a top-level array. Files are
//! read whole and overwritten whole; there is no locking and no migration format.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// File name of the to-do collection inside the data directory
pub const TODOS_FILE: &str = "todos.json";

/// File name of the blog post collection inside the data directory
pub const POSTS_FILE: &str = "posts.json";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("IO error on {path}: {message}")]
    Io { path: String, message: String },

    #[error("Invalid record file {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Failed to serialize records: {0}")]
    Serialize(String),
}

impl StoreError {
    fn io(path: &Path, err: std::io::Error) -> Self {
        StoreError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}

/// Load every record from `path`
///
/// A missing or blank file is an empty collection.
pub fn load_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    if !path.exists() {
        log::debug!("{} does not exist, starting empty", path.display());
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;

    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let records: Vec<T> = serde_json::from_str(&content).map_err(|e| StoreError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    log::debug!("loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Overwrite `path` with `records`, creating the parent directory if needed
pub fn save_records<T: Serialize>(path: &Path, records: &[T]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
    }

    let mut json = serde_json::to_string_pretty(records)
        .map_err(|e| StoreError::Serialize(e.to_string()))?;
    json.push('\n');

    fs::write(path, json).map_err(|e| StoreError::io(path, e))?;

    log::debug!("saved {} records to {}", records.len(), path.display());
    Ok(())
}
