//! Local persistence integration tests on a real filesystem

use std::path::PathBuf;

use tempfile::TempDir;
use voice_memo::application::ports::{DeleteError, PersistenceBackend, PersistenceError, Player};
use voice_memo::application::LocalPersistence;
use voice_memo::domain::recording::{BackendKind, LocationRef, RecordingFileName};
use voice_memo::infrastructure::capture::{encode_to_flac, FLAC_EXTENSION};
use voice_memo::infrastructure::{RodioPlayer, TokioFileStore};

fn capture_file(dir: &TempDir, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join("capture.caf");
    std::fs::write(&path, bytes).unwrap();
    path
}

#[tokio::test]
async fn persist_moves_capture_into_recordings_dir() {
    let temp = TempDir::new().unwrap();
    let docs = TempDir::new().unwrap();
    let backend = LocalPersistence::new(TokioFileStore::new(), docs.path());
    let capture = capture_file(&temp, b"audio-bytes");

    let location = backend
        .persist(&capture, &RecordingFileName::new(1_700_000_000_000, "caf"))
        .await
        .unwrap();

    let expected = docs
        .path()
        .join("recordings")
        .join("recording-1700000000000.caf");
    assert_eq!(location, LocationRef::local(&expected));
    assert_eq!(std::fs::read(&expected).unwrap(), b"audio-bytes");
    assert!(!capture.exists());
}

#[tokio::test]
async fn persisted_recording_loads_for_playback() {
    let temp = TempDir::new().unwrap();
    let docs = TempDir::new().unwrap();
    let backend = LocalPersistence::new(TokioFileStore::new(), docs.path());

    // Quarter second of a 440Hz tone
    let samples: Vec<i16> = (0..4_000)
        .map(|i| ((i as f32 * 440.0 * std::f32::consts::TAU / 16_000.0).sin() * 8_000.0) as i16)
        .collect();
    let capture = capture_file(&temp, &encode_to_flac(&samples, 16_000).unwrap());
    let file_name = RecordingFileName::new(1_700_000_000_000, FLAC_EXTENSION);

    let location = backend.persist(&capture, &file_name).await.unwrap();
    assert_eq!(
        location.as_path().unwrap(),
        docs.path()
            .join("recordings")
            .join("recording-1700000000000.flac")
    );

    let player = RodioPlayer::new();
    let handle = player.load(&location).await.unwrap();
    assert!(player.is_loaded(handle));

    backend.remove(&location).await.unwrap();
    player.unload(handle).await.unwrap();
    assert!(!player.is_loaded(handle));
}

#[tokio::test]
async fn persist_creates_missing_document_dir() {
    let temp = TempDir::new().unwrap();
    let docs = TempDir::new().unwrap();
    let nested = docs.path().join("does").join("not").join("exist");
    let backend = LocalPersistence::new(TokioFileStore::new(), &nested);

    let location = backend
        .persist(&capture_file(&temp, b"x"), &RecordingFileName::new(1, "flac"))
        .await
        .unwrap();

    assert!(location.as_path().unwrap().exists());
}

#[tokio::test]
async fn persist_missing_capture_fails() {
    let docs = TempDir::new().unwrap();
    let backend = LocalPersistence::new(TokioFileStore::new(), docs.path());

    let result = backend
        .persist(
            &docs.path().join("missing.caf"),
            &RecordingFileName::new(1, "caf"),
        )
        .await;

    assert!(matches!(result, Err(PersistenceError::FileStore(_))));
}

#[tokio::test]
async fn remove_deletes_stored_file() {
    let temp = TempDir::new().unwrap();
    let docs = TempDir::new().unwrap();
    let backend = LocalPersistence::new(TokioFileStore::new(), docs.path());
    let location = backend
        .persist(&capture_file(&temp, b"x"), &RecordingFileName::new(5, "caf"))
        .await
        .unwrap();

    backend.remove(&location).await.unwrap();

    assert!(!location.as_path().unwrap().exists());
    assert!(docs.path().join("recordings").is_dir());
}

#[tokio::test]
async fn remove_twice_fails_the_second_time() {
    let temp = TempDir::new().unwrap();
    let docs = TempDir::new().unwrap();
    let backend = LocalPersistence::new(TokioFileStore::new(), docs.path());
    let location = backend
        .persist(&capture_file(&temp, b"x"), &RecordingFileName::new(6, "caf"))
        .await
        .unwrap();

    backend.remove(&location).await.unwrap();
    let result = backend.remove(&location).await;

    assert!(matches!(result, Err(DeleteError::FileStore(_))));
}

#[tokio::test]
async fn remote_location_is_rejected() {
    let docs = TempDir::new().unwrap();
    let backend = LocalPersistence::new(TokioFileStore::new(), docs.path());

    let result = backend
        .remove(&LocationRef::remote(
            "recordings/recording-1.caf",
            "https://example.com/recording-1.caf",
        ))
        .await;

    assert!(matches!(
        result,
        Err(DeleteError::BackendMismatch {
            expected: BackendKind::Local,
            actual: BackendKind::Remote,
        })
    ));
}
