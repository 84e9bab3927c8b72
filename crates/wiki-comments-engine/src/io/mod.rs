use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

use crate::store::CommentStore;

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Read and parse a JSON file, e.g. an anchor list or a diff
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path).map_err(IoError::Io)?;
    serde_json::from_str(&content).map_err(|source| IoError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Write a value as pretty JSON, creating parent directories as needed
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), IoError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(IoError::Io)?;
    }

    let content = serde_json::to_string_pretty(value).map_err(|source| IoError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, content).map_err(IoError::Io)
}

/// Load the comment store, or an empty one if the file doesn't exist yet
pub fn load_store(path: &Path) -> Result<CommentStore, IoError> {
    match read_json(path) {
        Err(IoError::NotFound(_)) => {
            log::info!("No store at {}, starting empty", path.display());
            Ok(CommentStore::new())
        }
        result => result,
    }
}

pub fn save_store(path: &Path, store: &CommentStore) -> Result<(), IoError> {
    write_json(path, store)
}
