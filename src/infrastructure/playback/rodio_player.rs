//! Rodio-based player adapter
//!
//! Loaded recordings are kept in memory as encoded bytes. Every replay
//! decodes them again on its own thread, so replays never interfere with
//! each other.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex, MutexGuard};

use async_trait::async_trait;
use rodio::{Decoder, OutputStream, Sink};
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::application::ports::{PlaybackError, Player};
use crate::domain::recording::{LocationRef, PlaybackHandle};

type AudioBytes = Arc<[u8]>;

/// Player implementation using rodio
pub struct RodioPlayer {
    loaded: StdMutex<HashMap<PlaybackHandle, AudioBytes>>,
    next_handle: AtomicU64,
    client: reqwest::Client,
}

impl RodioPlayer {
    pub fn new() -> Self {
        Self {
            loaded: StdMutex::new(HashMap::new()),
            next_handle: AtomicU64::new(1),
            client: reqwest::Client::new(),
        }
    }

    fn loaded(&self) -> MutexGuard<'_, HashMap<PlaybackHandle, AudioBytes>> {
        self.loaded.lock().unwrap_or_else(|e| e.into_inner())
    }

    async fn read_local(path: &Path) -> Result<Vec<u8>, PlaybackError> {
        tokio::fs::read(path)
            .await
            .map_err(|e| PlaybackError::LoadFailed(format!("{}: {}", path.display(), e)))
    }

    async fn fetch_remote(&self, url: &str) -> Result<Vec<u8>, PlaybackError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PlaybackError::LoadFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlaybackError::LoadFailed(format!("HTTP {} for {}", status, url)));
        }

        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| PlaybackError::LoadFailed(e.to_string()))
    }

    /// Check that the bytes decode as audio
    async fn probe(bytes: AudioBytes) -> Result<(), PlaybackError> {
        tokio::task::spawn_blocking(move || {
            Decoder::new(Cursor::new(bytes))
                .map(|_| ())
                .map_err(|e| PlaybackError::LoadFailed(format!("Unsupported audio: {}", e)))
        })
        .await
        .map_err(|e| PlaybackError::LoadFailed(format!("Task join error: {}", e)))?
    }
}

impl Default for RodioPlayer {
    fn default() -> Self {
        Self::new()
    }
}

/// Open the default output and queue the decoded bytes
fn open_sink(bytes: AudioBytes) -> Result<(OutputStream, Sink), PlaybackError> {
    let (stream, stream_handle) = OutputStream::try_default()
        .map_err(|e| PlaybackError::DeviceNotAvailable(e.to_string()))?;
    let sink =
        Sink::try_new(&stream_handle).map_err(|e| PlaybackError::ReplayFailed(e.to_string()))?;
    let source =
        Decoder::new(Cursor::new(bytes)).map_err(|e| PlaybackError::ReplayFailed(e.to_string()))?;
    sink.append(source);
    Ok((stream, sink))
}

/// Play bytes to the end on the current thread, reporting once playback has started
fn play_sync(bytes: AudioBytes, started: oneshot::Sender<Result<(), PlaybackError>>) {
    match open_sink(bytes) {
        Ok((_stream, sink)) => {
            let _ = started.send(Ok(()));
            sink.sleep_until_end();
        }
        Err(e) => {
            let _ = started.send(Err(e));
        }
    }
}

#[async_trait]
impl Player for RodioPlayer {
    async fn load(&self, location: &LocationRef) -> Result<PlaybackHandle, PlaybackError> {
        let bytes: AudioBytes = match location {
            LocationRef::Local { path } => Self::read_local(path).await?,
            LocationRef::Remote { url, .. } => self.fetch_remote(url).await?,
        }
        .into();

        Self::probe(bytes.clone()).await?;

        let handle = PlaybackHandle::new(self.next_handle.fetch_add(1, Ordering::SeqCst));
        self.loaded().insert(handle, bytes);
        debug!(%handle, %location, "Loaded recording");
        Ok(handle)
    }

    async fn replay(&self, handle: PlaybackHandle) -> Result<(), PlaybackError> {
        let bytes = self
            .loaded()
            .get(&handle)
            .cloned()
            .ok_or(PlaybackError::NotLoaded(handle))?;

        let (tx, rx) = oneshot::channel();
        std::thread::Builder::new()
            .name(format!("playback-{}", handle.raw()))
            .spawn(move || play_sync(bytes, tx))
            .map_err(|e| PlaybackError::ReplayFailed(format!("Failed to spawn thread: {}", e)))?;

        rx.await.unwrap_or_else(|_| {
            warn!(%handle, "Playback thread exited before starting");
            Err(PlaybackError::ReplayFailed("playback thread exited".into()))
        })
    }

    async fn unload(&self, handle: PlaybackHandle) -> Result<(), PlaybackError> {
        self.loaded()
            .remove(&handle)
            .map(|_| ())
            .ok_or(PlaybackError::NotLoaded(handle))
    }

    fn is_loaded(&self, handle: PlaybackHandle) -> bool {
        self.loaded().contains_key(&handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::capture::encode_to_flac;
    use tempfile::TempDir;

    fn write_flac(dir: &TempDir) -> std::path::PathBuf {
        let samples: Vec<i16> = (0..16_000)
            .map(|i| ((i as f32 * 0.05).sin() * 8000.0) as i16)
            .collect();
        let bytes = encode_to_flac(&samples, 16_000).unwrap();
        let path = dir.path().join("recording-1.flac");
        std::fs::write(&path, bytes).unwrap();
        path
    }

    #[tokio::test]
    async fn load_and_unload_local_recording() {
        let dir = TempDir::new().unwrap();
        let player = RodioPlayer::new();

        let handle = player.load(&LocationRef::local(write_flac(&dir))).await.unwrap();
        assert!(player.is_loaded(handle));

        player.unload(handle).await.unwrap();
        assert!(!player.is_loaded(handle));
    }

    #[tokio::test]
    async fn handles_are_distinct() {
        let dir = TempDir::new().unwrap();
        let player = RodioPlayer::new();
        let location = LocationRef::local(write_flac(&dir));

        let a = player.load(&location).await.unwrap();
        let b = player.load(&location).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn load_missing_file_fails() {
        let player = RodioPlayer::new();
        let result = player
            .load(&LocationRef::local("/nonexistent/recording-1.flac"))
            .await;
        assert!(matches!(result, Err(PlaybackError::LoadFailed(_))));
    }

    #[tokio::test]
    async fn load_non_audio_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("recording-1.flac");
        std::fs::write(&path, b"not audio at all").unwrap();

        let result = RodioPlayer::new().load(&LocationRef::local(path)).await;
        assert!(matches!(result, Err(PlaybackError::LoadFailed(_))));
    }

    #[tokio::test]
    async fn unknown_handle_is_not_loaded() {
        let player = RodioPlayer::new();
        let handle = PlaybackHandle::new(42);

        assert!(matches!(
            player.replay(handle).await,
            Err(PlaybackError::NotLoaded(_))
        ));
        assert!(matches!(
            player.unload(handle).await,
            Err(PlaybackError::NotLoaded(_))
        ));
    }

    #[tokio::test]
    #[ignore = "Requires audio hardware"]
    async fn can_replay_loaded_recording() {
        let dir = TempDir::new().unwrap();
        let player = RodioPlayer::new();
        let handle = player.load(&LocationRef::local(write_flac(&dir))).await.unwrap();

        assert!(player.replay(handle).await.is_ok());
        assert!(player.replay(handle).await.is_ok());
    }
}
