//! Speech recognizer combining VAD and Whisper STT.
//!
//! Silero VAD cuts the microphone stream into utterances; each utterance is a single
//! pronunciation attempt and is transcribed by Whisper.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use parking_lot::Mutex;
use sherpa_rs::silero_vad::{SileroVad, SileroVadConfig};
use sherpa_rs::whisper::{WhisperConfig, WhisperRecognizer};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::Transcriber;
use crate::config::AppConfig;

/// Minimum speech duration in seconds to be considered an attempt.
const MIN_SPEECH_DURATION: f32 = 0.1;

/// Maximum speech duration in seconds (prevent runaway segments).
const MAX_SPEECH_DURATION: f32 = 30.0;

/// VAD window size in samples (512 samples = 32ms at 16kHz).
const VAD_WINDOW_SIZE: i32 = 512;

/// Buffer size in seconds for VAD (how much audio to accumulate).
const VAD_BUFFER_SIZE_SECONDS: f32 = 60.0;

/// Practice words are English only.
const STT_LANGUAGE: &str = "en";

/// VAD state touched from the audio callback thread.
struct VadState {
    vad: SileroVad,
    was_speaking: bool,
    speech_start: Option<Instant>,
}

/// Speech recognizer combining VAD and Whisper.
/// VAD and Whisper sit behind separate locks so a slow transcription never stalls audio.
pub struct Recognizer {
    vad_state: Arc<Mutex<VadState>>,
    whisper: Mutex<WhisperRecognizer>,
    segment_tx: mpsc::Sender<Vec<f32>>,
    sample_rate: u32,
}

impl Recognizer {
    /// Create a new speech recognizer with event-driven segment delivery.
    ///
    /// # Returns
    /// A tuple of (Recognizer, receiver of completed speech segments)
    ///
    /// # Errors
    /// Returns an error if Silero VAD or Whisper fail to initialize, typically because
    /// model files are missing or invalid.
    pub fn new(config: &AppConfig) -> Result<(Self, mpsc::Receiver<Vec<f32>>)> {
        let sample_rate = config.sample_rate;
        let provider = config.effective_provider();
        let threads = config.recognizer_threads();

        info!("Initializing speech recognizer with {} provider ({} threads)", provider, threads);

        let vad_config = SileroVadConfig {
            model: config.vad_model_path().to_string_lossy().to_string(),
            threshold: config.vad_threshold,
            sample_rate,
            min_silence_duration: config.vad_silence_duration,
            min_speech_duration: MIN_SPEECH_DURATION,
            max_speech_duration: MAX_SPEECH_DURATION,
            window_size: VAD_WINDOW_SIZE,
            provider: Some(provider.as_sherpa_provider().to_string()),
            num_threads: Some(1),
            debug: config.verbose,
        };

        let vad = SileroVad::new(vad_config, VAD_BUFFER_SIZE_SECONDS).map_err(|e| anyhow::anyhow!("Failed to initialize Silero VAD: {}", e))?;

        info!("VAD initialized successfully");

        let whisper_config = WhisperConfig {
            encoder: config.whisper_encoder_path().to_string_lossy().to_string(),
            decoder: config.whisper_decoder_path().to_string_lossy().to_string(),
            tokens: config.whisper_tokens_path().to_string_lossy().to_string(),
            language: STT_LANGUAGE.to_string(),
            provider: Some(provider.as_sherpa_provider().to_string()),
            num_threads: Some(threads.try_into().unwrap_or(2)),
            debug: config.verbose,
            ..Default::default()
        };

        let whisper = WhisperRecognizer::new(whisper_config).map_err(|e| anyhow::anyhow!("Failed to initialize Whisper: {}", e))?;

        info!("Whisper recognizer initialized successfully");

        // A handful of queued attempts is plenty; stale ones are drained per word
        let (segment_tx, segment_rx) = mpsc::channel(5);

        let recognizer = Self {
            vad_state: Arc::new(Mutex::new(VadState { vad, was_speaking: false, speech_start: None })),
            whisper: Mutex::new(whisper),
            segment_tx,
            sample_rate,
        };

        Ok((recognizer, segment_rx))
    }

    /// Feed microphone samples to the VAD and forward completed utterances.
    /// Called from the audio callback thread; never blocks on the segment channel.
    pub fn vad_accept_waveform(&self, samples: &[f32]) {
        let mut state = self.vad_state.lock();
        state.vad.accept_waveform(samples.to_vec());

        let is_speech = state.vad.is_speech();

        if is_speech && !state.was_speaking {
            state.speech_start = Some(Instant::now());
            debug!("Speech started");
        } else if !is_speech
            && state.was_speaking
            && let Some(start) = state.speech_start.take()
        {
            debug!("Speech ended ({:.1}s)", start.elapsed().as_secs_f32());
        }
        state.was_speaking = is_speech;

        if !state.vad.is_empty() {
            let segment = state.vad.front();
            state.vad.pop();
            drop(state);

            if !segment.samples.is_empty() {
                debug!("Attempt captured: {} samples", segment.samples.len());
                if let Err(e) = self.segment_tx.try_send(segment.samples) {
                    warn!("Dropped speech segment (channel full): {}", e);
                }
            }
        }
    }

    /// Discard buffered audio so the next attempt starts clean.
    pub fn reset(&self) {
        let mut state = self.vad_state.lock();
        state.vad.clear();
        state.was_speaking = false;
        state.speech_start = None;
    }
}

impl Transcriber for Recognizer {
    fn transcribe(&self, samples: &[f32]) -> Result<Vec<String>> {
        if samples.is_empty() {
            debug!("Empty speech segment");
            return Ok(Vec::new());
        }

        debug!("Transcribing {} samples", samples.len());

        let result = {
            let mut whisper = self.whisper.lock();
            whisper.transcribe(self.sample_rate, samples)
        };

        let text = result.text.trim().to_string();
        if is_non_speech(&text) {
            debug!("No speech in transcription: '{}'", text);
            return Ok(Vec::new());
        }

        info!("🗣️ Heard: {}", text);
        Ok(vec![text])
    }
}

/// Empty text or a bare annotation such as `[BLANK_AUDIO]` or `(coughs)`.
fn is_non_speech(text: &str) -> bool {
    text.is_empty() || (text.starts_with('[') && text.ends_with(']')) || (text.starts_with('(') && text.ends_with(')'))
}
