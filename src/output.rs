use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Creates `dir` and any missing parents. Succeeds if it already exists.
pub async fn ensure_dir(dir: &Path) -> Result<(), OutputError> {
    fs::create_dir_all(dir)
        .await
        .map_err(|source| OutputError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })
}

/// Writes the whole document in one call, replacing any previous file.
pub async fn write_page(path: &Path, content: &str) -> Result<(), OutputError> {
    fs::write(path, content)
        .await
        .map_err(|source| OutputError::Write {
            path: path.to_path_buf(),
            source,
        })
}
