//! Storage port interfaces
//!
//! `FileStore` and `ObjectStore` are the raw capabilities; a
//! `PersistenceBackend` turns a finalized capture into a durable
//! `LocationRef` on top of one of them.

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::library::ItemId;
use crate::domain::recording::{BackendKind, LocationRef, RecordingFileName};

use super::player::PlaybackError;

/// Local filesystem errors
#[derive(Debug, Clone, Error)]
pub enum FileStoreError {
    #[error("Failed to create directory {path}: {message}")]
    CreateDir { path: String, message: String },

    #[error("Failed to move {from} to {to}: {message}")]
    Move {
        from: String,
        to: String,
        message: String,
    },

    #[error("Failed to delete {path}: {message}")]
    Delete { path: String, message: String },
}

/// Remote object store errors
#[derive(Debug, Clone, Error)]
pub enum ObjectStoreError {
    #[error("Object store rejected credentials")]
    Unauthorized,

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Object store request failed: {0}")]
    RequestFailed(String),

    #[error("Failed to read upload source: {0}")]
    ReadFailed(String),

    #[error("Failed to parse object store response: {0}")]
    ParseError(String),

    #[error("Object store error: {0}")]
    ApiError(String),
}

/// Errors while saving a finalized recording
#[derive(Debug, Clone, Error)]
pub enum PersistenceError {
    #[error("Local storage failed: {0}")]
    FileStore(#[from] FileStoreError),

    #[error("Remote storage failed: {0}")]
    ObjectStore(#[from] ObjectStoreError),

    #[error("Failed to load saved recording: {0}")]
    Load(#[from] PlaybackError),

    #[error("Storage is not configured: {0}")]
    NotConfigured(String),
}

/// Errors while deleting a recorded item
#[derive(Debug, Clone, Error)]
pub enum DeleteError {
    #[error("No recording with id {0}")]
    ItemNotFound(ItemId),

    #[error("Recording {0} is already being deleted")]
    InProgress(ItemId),

    #[error("Failed to release playback: {0}")]
    Unload(#[from] PlaybackError),

    #[error("Failed to delete local file: {0}")]
    FileStore(#[from] FileStoreError),

    #[error("Failed to delete remote object: {0}")]
    ObjectStore(#[from] ObjectStoreError),

    #[error("Recording is stored in {actual} storage, but the {expected} backend is active")]
    BackendMismatch {
        expected: BackendKind,
        actual: BackendKind,
    },
}

/// Port for local filesystem operations
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Create a directory and any missing parents. Succeeds if it already exists.
    async fn ensure_directory(&self, path: &Path) -> Result<(), FileStoreError>;

    /// Move a file, replacing nothing at the destination
    async fn move_file(&self, from: &Path, to: &Path) -> Result<(), FileStoreError>;

    /// Delete a file
    async fn delete(&self, path: &Path) -> Result<(), FileStoreError>;
}

/// Port for remote object storage
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload a local file's bytes under `key`
    async fn upload(&self, local: &Path, key: &str) -> Result<(), ObjectStoreError>;

    /// Retrievable download URL for an uploaded object
    async fn download_url(&self, key: &str) -> Result<String, ObjectStoreError>;

    /// Delete an object
    async fn delete(&self, key: &str) -> Result<(), ObjectStoreError>;
}

/// Port for turning a finalized capture into a durable recording
#[async_trait]
pub trait PersistenceBackend: Send + Sync {
    /// Which backend this is
    fn kind(&self) -> BackendKind;

    /// Store the temporary capture file under `file_name`.
    ///
    /// # Returns
    /// The durable location of the recording
    async fn persist(
        &self,
        temp_file: &Path,
        file_name: &RecordingFileName,
    ) -> Result<LocationRef, PersistenceError>;

    /// Delete a stored recording.
    /// Fails with `BackendMismatch` if the location belongs to another backend.
    async fn remove(&self, location: &LocationRef) -> Result<(), DeleteError>;
}

/// Blanket implementation for boxed persistence backends
#[async_trait]
impl PersistenceBackend for Box<dyn PersistenceBackend> {
    fn kind(&self) -> BackendKind {
        self.as_ref().kind()
    }

    async fn persist(
        &self,
        temp_file: &Path,
        file_name: &RecordingFileName,
    ) -> Result<LocationRef, PersistenceError> {
        self.as_ref().persist(temp_file, file_name).await
    }

    async fn remove(&self, location: &LocationRef) -> Result<(), DeleteError> {
        self.as_ref().remove(location).await
    }
}
