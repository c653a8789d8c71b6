//! Persistence backend variants
//!
//! Both variants share the same contract: take the temporary file of a
//! finalized capture and return a durable `LocationRef`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::domain::recording::{BackendKind, LocationRef, RecordingFileName, RECORDINGS_NAMESPACE};

use super::ports::{DeleteError, FileStore, ObjectStore, PersistenceBackend, PersistenceError};

/// Keeps recordings in `<document dir>/recordings/` on the local disk
pub struct LocalPersistence<F: FileStore> {
    store: F,
    document_dir: PathBuf,
}

impl<F: FileStore> LocalPersistence<F> {
    pub fn new(store: F, document_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            document_dir: document_dir.into(),
        }
    }

    /// Directory every recording is moved into
    pub fn recordings_dir(&self) -> PathBuf {
        self.document_dir.join(RECORDINGS_NAMESPACE)
    }

    /// Path a recording with this file name is stored at
    pub fn path_for(&self, file_name: &RecordingFileName) -> PathBuf {
        self.recordings_dir().join(file_name.as_str())
    }
}

#[async_trait]
impl<F: FileStore> PersistenceBackend for LocalPersistence<F> {
    fn kind(&self) -> BackendKind {
        BackendKind::Local
    }

    async fn persist(
        &self,
        temp_file: &Path,
        file_name: &RecordingFileName,
    ) -> Result<LocationRef, PersistenceError> {
        let dir = self.recordings_dir();
        self.store.ensure_directory(&dir).await?;

        let destination = self.path_for(file_name);
        self.store.move_file(temp_file, &destination).await?;

        info!(path = %destination.display(), "Saved recording");
        Ok(LocationRef::local(destination))
    }

    async fn remove(&self, location: &LocationRef) -> Result<(), DeleteError> {
        match location {
            LocationRef::Local { path } => {
                self.store.delete(path).await?;
                debug!(path = %path.display(), "Deleted recording file");
                Ok(())
            }
            LocationRef::Remote { .. } => Err(DeleteError::BackendMismatch {
                expected: BackendKind::Local,
                actual: BackendKind::Remote,
            }),
        }
    }
}

/// Uploads recordings to `recordings/<file name>` in a remote object store.
///
/// `files` removes the local temp copy once the upload went through.
pub struct RemotePersistence<O: ObjectStore, F: FileStore> {
    store: O,
    files: F,
}

impl<O: ObjectStore, F: FileStore> RemotePersistence<O, F> {
    pub fn new(store: O, files: F) -> Self {
        Self { store, files }
    }
}

#[async_trait]
impl<O: ObjectStore, F: FileStore> PersistenceBackend for RemotePersistence<O, F> {
    fn kind(&self) -> BackendKind {
        BackendKind::Remote
    }

    async fn persist(
        &self,
        temp_file: &Path,
        file_name: &RecordingFileName,
    ) -> Result<LocationRef, PersistenceError> {
        let key = file_name.object_key();
        self.store.upload(temp_file, &key).await?;
        let url = self.store.download_url(&key).await?;

        // Uploaded bytes are remote now; drop the local temp copy
        if let Err(e) = self.files.delete(temp_file).await {
            warn!(path = %temp_file.display(), error = %e, "Failed to remove uploaded temp file");
        }

        info!(%key, "Uploaded recording");
        Ok(LocationRef::remote(key, url))
    }

    async fn remove(&self, location: &LocationRef) -> Result<(), DeleteError> {
        match location {
            LocationRef::Remote { key, .. } => {
                self.store.delete(key).await?;
                debug!(%key, "Deleted remote recording");
                Ok(())
            }
            LocationRef::Local { .. } => Err(DeleteError::BackendMismatch {
                expected: BackendKind::Remote,
                actual: BackendKind::Local,
            }),
        }
    }
}
