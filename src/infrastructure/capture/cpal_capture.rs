//! Cross-platform microphone capture using cpal
//!
//! Each prepared handle owns its own sample buffer. A started handle runs
//! its input stream on a dedicated thread (cpal::Stream is not Send);
//! finalizing mixes to mono, resamples to the preset rate and writes a
//! FLAC file into the temp directory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex, MutexGuard};
use std::thread::JoinHandle;

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, SampleRate, StreamConfig};
use rubato::{FftFixedIn, Resampler};
use tokio::time::{sleep, Duration as TokioDuration};
use tracing::{debug, warn};

use super::flac_encoder::{encode_to_flac, FLAC_EXTENSION};
use crate::application::ports::{CaptureDevice, CaptureError, CapturePreset, SessionOptions};
use crate::domain::recording::CaptureHandle;

/// State of one prepared capture
struct CaptureSlot {
    preset: CapturePreset,
    /// Recorded audio samples (mono, i16, at device sample rate)
    buffer: Arc<StdMutex<Vec<i16>>>,
    /// Device sample rate (may differ from the preset rate)
    device_sample_rate: Arc<AtomicU32>,
    is_recording: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl CaptureSlot {
    fn new(preset: CapturePreset) -> Self {
        Self {
            preset,
            buffer: Arc::new(StdMutex::new(Vec::new())),
            device_sample_rate: Arc::new(AtomicU32::new(0)),
            is_recording: Arc::new(AtomicBool::new(false)),
            thread: None,
        }
    }

    /// Signal the stream thread to stop and wait for it
    async fn halt(&mut self) {
        self.is_recording.store(false, Ordering::SeqCst);
        if let Some(thread) = self.thread.take() {
            let joined = tokio::task::spawn_blocking(move || thread.join()).await;
            if !matches!(joined, Ok(Ok(()))) {
                warn!("Capture thread did not shut down cleanly");
            }
        }
    }
}

/// Microphone capture device backed by cpal
pub struct CpalCaptureDevice {
    slots: StdMutex<HashMap<CaptureHandle, CaptureSlot>>,
    next_handle: AtomicU64,
    temp_dir: PathBuf,
    session: StdMutex<SessionOptions>,
}

impl CpalCaptureDevice {
    /// Create a capture device writing finalized files to the system temp dir
    pub fn new() -> Self {
        Self::with_temp_dir(std::env::temp_dir())
    }

    /// Create a capture device writing finalized files to `temp_dir`
    pub fn with_temp_dir(temp_dir: impl Into<PathBuf>) -> Self {
        Self {
            slots: StdMutex::new(HashMap::new()),
            next_handle: AtomicU64::new(1),
            temp_dir: temp_dir.into(),
            session: StdMutex::new(SessionOptions::default()),
        }
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<CaptureHandle, CaptureSlot>> {
        self.slots.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Get the default input device
    fn get_input_device() -> Result<cpal::Device, CaptureError> {
        let host = cpal::default_host();
        host.default_input_device()
            .ok_or(CaptureError::NoAudioDevice)
    }

    /// Get a suitable input configuration, preferring mono and the target rate
    fn get_input_config(
        device: &cpal::Device,
        target_rate: u32,
    ) -> Result<(StreamConfig, SampleFormat), CaptureError> {
        let supported_configs = device
            .supported_input_configs()
            .map_err(|e| CaptureError::PrepareFailed(format!("Failed to get configs: {}", e)))?;

        let mut best_config: Option<cpal::SupportedStreamConfigRange> = None;

        for config in supported_configs {
            // Only consider i16 or f32 formats
            if config.sample_format() != SampleFormat::I16
                && config.sample_format() != SampleFormat::F32
            {
                continue;
            }

            let includes_target = config.min_sample_rate().0 <= target_rate
                && config.max_sample_rate().0 >= target_rate;

            let is_better = match &best_config {
                None => true,
                Some(current) => {
                    let fewer_channels = config.channels() < current.channels();
                    let better_rate =
                        includes_target && current.min_sample_rate().0 > target_rate;
                    fewer_channels || better_rate
                }
            };
            if is_better {
                best_config = Some(config);
            }
        }

        let config_range = best_config.ok_or(CaptureError::PrepareFailed(
            "No suitable config found".into(),
        ))?;

        // Use target sample rate if supported, otherwise the closest bound
        let sample_rate = if config_range.min_sample_rate().0 > target_rate {
            config_range.min_sample_rate()
        } else if config_range.max_sample_rate().0 < target_rate {
            config_range.max_sample_rate()
        } else {
            SampleRate(target_rate)
        };

        let sample_format = config_range.sample_format();
        let config = StreamConfig {
            channels: config_range.channels(),
            sample_rate,
            buffer_size: cpal::BufferSize::Default,
        };

        Ok((config, sample_format))
    }

    /// Resample mono audio between rates
    fn resample(samples: &[i16], source_rate: u32, target_rate: u32) -> Result<Vec<i16>, CaptureError> {
        if source_rate == target_rate {
            return Ok(samples.to_vec());
        }

        let samples_f32: Vec<f32> = samples.iter().map(|&s| s as f32 / 32768.0).collect();

        let ratio = target_rate as f64 / source_rate as f64;
        let output_len = (samples_f32.len() as f64 * ratio).ceil() as usize;

        let mut resampler = FftFixedIn::<f32>::new(
            source_rate as usize,
            target_rate as usize,
            1024, // Chunk size
            2,    // Sub-chunks
            1,    // Mono
        )
        .map_err(|e| CaptureError::FinalizeFailed(format!("Resampler init failed: {}", e)))?;

        let mut output = Vec::with_capacity(output_len);
        let mut input_pos = 0;

        while input_pos < samples_f32.len() {
            let frames_needed = resampler.input_frames_next();
            let end_pos = (input_pos + frames_needed).min(samples_f32.len());
            let mut frames = samples_f32[input_pos..end_pos].to_vec();
            // Zero-pad the final partial chunk
            frames.resize(frames_needed, 0.0);
            let chunk = vec![frames];

            let resampled = resampler.process(&chunk, None).map_err(|e| {
                CaptureError::FinalizeFailed(format!("Resampling failed: {}", e))
            })?;

            output.extend(resampled[0].iter().map(|&s| (s * 32767.0) as i16));
            input_pos = end_pos;
        }

        output.truncate(output_len);

        Ok(output)
    }

    /// Mix interleaved multi-channel audio to mono
    fn mix_to_mono(samples: &[i16], channels: u16) -> Vec<i16> {
        if channels <= 1 {
            return samples.to_vec();
        }

        samples
            .chunks(channels as usize)
            .map(|chunk| {
                let sum: i32 = chunk.iter().map(|&s| s as i32).sum();
                (sum / chunk.len() as i32) as i16
            })
            .collect()
    }

    /// Resample and encode captured samples for the preset
    fn encode(samples: &[i16], device_rate: u32, preset: CapturePreset) -> Result<Vec<u8>, CaptureError> {
        let target_rate = preset.sample_rate();
        let resampled = Self::resample(samples, device_rate, target_rate)?;
        encode_to_flac(&resampled, target_rate)
            .map_err(|e| CaptureError::FinalizeFailed(e.to_string()))
    }

    /// Open the input stream and keep it alive until `is_recording` drops.
    /// Runs on its own thread.
    fn run_stream(
        preset: CapturePreset,
        buffer: Arc<StdMutex<Vec<i16>>>,
        device_sample_rate: Arc<AtomicU32>,
        is_recording: Arc<AtomicBool>,
    ) {
        let stream = match Self::open_stream(preset, &buffer, &device_sample_rate, &is_recording) {
            Ok(stream) => stream,
            Err(e) => {
                warn!(error = %e, "Failed to open input stream");
                is_recording.store(false, Ordering::SeqCst);
                return;
            }
        };

        while is_recording.load(Ordering::SeqCst) {
            std::thread::sleep(std::time::Duration::from_millis(20));
        }

        drop(stream);
    }

    fn open_stream(
        preset: CapturePreset,
        buffer: &Arc<StdMutex<Vec<i16>>>,
        device_sample_rate: &Arc<AtomicU32>,
        is_recording: &Arc<AtomicBool>,
    ) -> Result<cpal::Stream, CaptureError> {
        let device = Self::get_input_device()?;
        let (config, sample_format) = Self::get_input_config(&device, preset.sample_rate())?;
        let channels = config.channels;
        device_sample_rate.store(config.sample_rate.0, Ordering::SeqCst);

        let on_error = |err: cpal::StreamError| warn!(error = %err, "Audio stream error");

        let stream = match sample_format {
            SampleFormat::I16 => {
                let buffer = Arc::clone(buffer);
                let is_recording = Arc::clone(is_recording);
                device.build_input_stream(
                    &config,
                    move |data: &[i16], _: &cpal::InputCallbackInfo| {
                        if is_recording.load(Ordering::SeqCst) {
                            let mono = Self::mix_to_mono(data, channels);
                            if let Ok(mut buffer) = buffer.lock() {
                                buffer.extend_from_slice(&mono);
                            }
                        }
                    },
                    on_error,
                    None,
                )
            }
            SampleFormat::F32 => {
                let buffer = Arc::clone(buffer);
                let is_recording = Arc::clone(is_recording);
                device.build_input_stream(
                    &config,
                    move |data: &[f32], _: &cpal::InputCallbackInfo| {
                        if is_recording.load(Ordering::SeqCst) {
                            let i16_data: Vec<i16> =
                                data.iter().map(|&s| (s * 32767.0) as i16).collect();
                            let mono = Self::mix_to_mono(&i16_data, channels);
                            if let Ok(mut buffer) = buffer.lock() {
                                buffer.extend_from_slice(&mono);
                            }
                        }
                    },
                    on_error,
                    None,
                )
            }
            _ => {
                return Err(CaptureError::StartFailed(
                    "Unsupported sample format".into(),
                ))
            }
        }
        .map_err(|e| CaptureError::StartFailed(e.to_string()))?;

        stream
            .play()
            .map_err(|e| CaptureError::StartFailed(e.to_string()))?;

        Ok(stream)
    }

    fn temp_path(&self, handle: CaptureHandle) -> PathBuf {
        self.temp_dir.join(format!(
            "voice-memo-capture-{}-{}.{}",
            std::process::id(),
            handle.raw(),
            FLAC_EXTENSION
        ))
    }
}

impl Default for CpalCaptureDevice {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CaptureDevice for CpalCaptureDevice {
    async fn configure_session(&self, options: SessionOptions) -> Result<(), CaptureError> {
        // Desktop hosts have no audio session; remember the request for diagnostics
        *self.session.lock().unwrap_or_else(|e| e.into_inner()) = options;
        debug!(
            allows_recording = options.allows_recording,
            plays_in_silent_mode = options.plays_in_silent_mode,
            "Audio session configured"
        );
        Ok(())
    }

    async fn prepare(&self, preset: CapturePreset) -> Result<CaptureHandle, CaptureError> {
        let available = tokio::task::spawn_blocking(|| Self::get_input_device().is_ok())
            .await
            .map_err(|e| CaptureError::PrepareFailed(format!("Task join error: {}", e)))?;
        if !available {
            return Err(CaptureError::NoAudioDevice);
        }

        let handle = CaptureHandle::new(self.next_handle.fetch_add(1, Ordering::SeqCst));
        self.slots().insert(handle, CaptureSlot::new(preset));
        debug!(%handle, ?preset, "Capture prepared");
        Ok(handle)
    }

    async fn start(&self, handle: CaptureHandle) -> Result<(), CaptureError> {
        let is_recording = {
            let mut slots = self.slots();
            let slot = slots
                .get_mut(&handle)
                .ok_or(CaptureError::UnknownHandle(handle))?;

            if slot.is_recording.load(Ordering::SeqCst) || slot.thread.is_some() {
                return Err(CaptureError::StartFailed(
                    "Capture already started".to_string(),
                ));
            }

            slot.is_recording.store(true, Ordering::SeqCst);
            let preset = slot.preset;
            let buffer = Arc::clone(&slot.buffer);
            let device_sample_rate = Arc::clone(&slot.device_sample_rate);
            let is_recording = Arc::clone(&slot.is_recording);
            slot.thread = Some(std::thread::spawn(move || {
                Self::run_stream(preset, buffer, device_sample_rate, is_recording)
            }));
            Arc::clone(&slot.is_recording)
        };

        // Give the thread a moment to open the stream
        sleep(TokioDuration::from_millis(50)).await;

        if !is_recording.load(Ordering::SeqCst) {
            return Err(CaptureError::StartFailed(
                "Input stream could not be opened".into(),
            ));
        }

        Ok(())
    }

    async fn stop_and_finalize(&self, handle: CaptureHandle) -> Result<PathBuf, CaptureError> {
        // The handle is released whatever happens next
        let mut slot = self
            .slots()
            .remove(&handle)
            .ok_or(CaptureError::UnknownHandle(handle))?;

        let was_running = slot.is_recording.load(Ordering::SeqCst);
        slot.halt().await;
        if !was_running {
            return Err(CaptureError::FinalizeFailed(
                "Capture was not running".to_string(),
            ));
        }

        let sample_rate = slot.device_sample_rate.load(Ordering::SeqCst);
        if sample_rate == 0 {
            return Err(CaptureError::FinalizeFailed("Sample rate not set".into()));
        }

        let samples = {
            let mut buffer = slot.buffer.lock().unwrap_or_else(|e| e.into_inner());
            std::mem::take(&mut *buffer)
        };
        if samples.is_empty() {
            return Err(CaptureError::FinalizeFailed(
                "No audio data captured".to_string(),
            ));
        }

        let preset = slot.preset;
        let encoded = tokio::task::spawn_blocking(move || Self::encode(&samples, sample_rate, preset))
            .await
            .map_err(|e| CaptureError::FinalizeFailed(format!("Encode task error: {}", e)))??;

        let path = self.temp_path(handle);
        tokio::fs::write(&path, encoded)
            .await
            .map_err(|e| CaptureError::FinalizeFailed(format!("{}: {}", path.display(), e)))?;

        debug!(%handle, path = %path.display(), "Capture finalized");
        Ok(path)
    }

    async fn discard(&self, handle: CaptureHandle) -> Result<(), CaptureError> {
        let mut slot = self
            .slots()
            .remove(&handle)
            .ok_or(CaptureError::UnknownHandle(handle))?;
        slot.halt().await;
        debug!(%handle, "Capture discarded");
        Ok(())
    }

    async fn discard_file(&self, path: &Path) -> Result<(), CaptureError> {
        tokio::fs::remove_file(path)
            .await
            .map_err(|e| CaptureError::CleanupFailed(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "Capture file removed");
        Ok(())
    }

    fn container_extension(&self) -> &str {
        FLAC_EXTENSION
    }
}
