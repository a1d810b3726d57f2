use std::fs;
use std::path::{Path, PathBuf};

use crate::models::Block;
use crate::persist::{PersistError, PersistedBlock, blocks_from_persisted, blocks_to_persisted};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid document {path}: {source}")]
    Persisted {
        path: PathBuf,
        #[source]
        source: PersistError,
    },
}

/// Read a stored document and return its validated blocks
pub fn read_document(path: &Path) -> Result<Vec<Block>, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    let json = fs::read_to_string(path)?;
    let stored: Vec<PersistedBlock> = serde_json::from_str(&json)?;
    let blocks = blocks_from_persisted(stored).map_err(|source| IoError::Persisted {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Read {} blocks from {}", blocks.len(), path.display());
    Ok(blocks)
}

/// Write blocks in the stored shape, creating parent directories as needed
pub fn write_document(path: &Path, blocks: &[Block]) -> Result<(), IoError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(&blocks_to_persisted(blocks))?;
    fs::write(path, json)?;
    log::info!("Wrote {} blocks to {}", blocks.len(), path.display());
    Ok(())
}
