//! Storage infrastructure module
//!
//! Local filesystem and remote object store adapters, plus the factory
//! picking the active persistence backend from configuration.

mod http_object_store;
mod tokio_fs;

pub use http_object_store::HttpObjectStore;
pub use tokio_fs::TokioFileStore;

use crate::application::ports::{PersistenceBackend, PersistenceError};
use crate::application::{LocalPersistence, RemotePersistence};
use crate::domain::config::AppConfig;
use crate::domain::recording::BackendKind;

/// Build the persistence backend selected by `config`
pub fn create_backend(config: &AppConfig) -> Result<Box<dyn PersistenceBackend>, PersistenceError> {
    match config.storage_or_default() {
        BackendKind::Local => Ok(Box::new(LocalPersistence::new(
            TokioFileStore::new(),
            config.document_dir_or_default(),
        ))),
        BackendKind::Remote => {
            let bucket = config.remote_bucket().ok_or_else(|| {
                PersistenceError::NotConfigured(
                    "remote storage needs remote.bucket to be set".to_string(),
                )
            })?;

            let mut store = HttpObjectStore::new(config.remote_endpoint_or_default(), bucket);
            if let Some(token) = config.remote_token() {
                store = store.with_token(token);
            }

            Ok(Box::new(RemotePersistence::new(store, TokioFileStore::new())))
        }
    }
}
