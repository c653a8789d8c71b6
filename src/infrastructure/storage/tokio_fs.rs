//! Local filesystem adapter using tokio::fs

use std::io::ErrorKind;
use std::path::Path;

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use crate::application::ports::{FileStore, FileStoreError};

/// File store backed by the local filesystem
pub struct TokioFileStore;

impl TokioFileStore {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TokioFileStore {
    fn default() -> Self {
        Self::new()
    }
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

#[async_trait]
impl FileStore for TokioFileStore {
    async fn ensure_directory(&self, path: &Path) -> Result<(), FileStoreError> {
        fs::create_dir_all(path)
            .await
            .map_err(|e| FileStoreError::CreateDir {
                path: display(path),
                message: e.to_string(),
            })
    }

    async fn move_file(&self, from: &Path, to: &Path) -> Result<(), FileStoreError> {
        let move_error = |e: std::io::Error| FileStoreError::Move {
            from: display(from),
            to: display(to),
            message: e.to_string(),
        };

        if fs::try_exists(to).await.unwrap_or(false) {
            return Err(move_error(std::io::Error::new(
                ErrorKind::AlreadyExists,
                "destination already exists",
            )));
        }

        match fs::rename(from, to).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(move_error(e)),
            Err(e) => {
                // Temp dir and document dir can live on different filesystems
                debug!(error = %e, "Rename failed, falling back to copy");
                fs::copy(from, to).await.map_err(move_error)?;
                fs::remove_file(from).await.map_err(move_error)?;
                Ok(())
            }
        }
    }

    async fn delete(&self, path: &Path) -> Result<(), FileStoreError> {
        fs::remove_file(path)
            .await
            .map_err(|e| FileStoreError::Delete {
                path: display(path),
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn ensure_directory_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = TokioFileStore::new();

        store.ensure_directory(&nested).await.unwrap();
        store.ensure_directory(&nested).await.unwrap();

        assert!(nested.is_dir());
    }

    #[tokio::test]
    async fn move_file_relocates_contents() {
        let dir = TempDir::new().unwrap();
        let from = dir.path().join("capture.flac");
        let to = dir.path().join("recording-1.flac");
        std::fs::write(&from, b"audio").unwrap();

        TokioFileStore::new().move_file(&from, &to).await.unwrap();

        assert!(!from.exists());
        assert_eq!(std::fs::read(&to).unwrap(), b"audio");
    }

    #[tokio::test]
    async fn move_file_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let from = dir.path().join("a");
        let to = dir.path().join("b");
        std::fs::write(&from, b"new").unwrap();
        std::fs::write(&to, b"old").unwrap();

        let result = TokioFileStore::new().move_file(&from, &to).await;

        assert!(matches!(result, Err(FileStoreError::Move { .. })));
        assert_eq!(std::fs::read(&to).unwrap(), b"old");
        assert!(from.exists());
    }

    #[tokio::test]
    async fn move_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let result = TokioFileStore::new()
            .move_file(&dir.path().join("missing"), &dir.path().join("dest"))
            .await;

        assert!(matches!(result, Err(FileStoreError::Move { .. })));
    }

    #[tokio::test]
    async fn delete_removes_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("recording-1.flac");
        std::fs::write(&path, b"audio").unwrap();

        TokioFileStore::new().delete(&path).await.unwrap();

        assert!(!path.exists());
    }

    #[tokio::test]
    async fn delete_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let result = TokioFileStore::new().delete(&dir.path().join("gone")).await;

        assert!(matches!(result, Err(FileStoreError::Delete { .. })));
    }
}
