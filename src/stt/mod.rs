//! Speech-to-text module using sherpa-rs.
//!
//! Provides voice activity detection (VAD), Whisper-based transcription of the
//! learner's attempt, and selection of the recognized word among candidates.

mod candidate;
mod recognizer;

use anyhow::Result;

pub use candidate::select_candidate;
pub use recognizer::Recognizer;

/// Transcription of recorded speech into candidate texts.
pub trait Transcriber: Send + Sync {
    /// Candidate transcriptions of a speech segment, best first.
    /// Empty when nothing intelligible was heard.
    fn transcribe(&self, samples: &[f32]) -> Result<Vec<String>>;
}
