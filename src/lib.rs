//! Pronunciation Coach - syllable-level pronunciation practice.
//!
//! A target word is syllabified from its CMU dictionary transcription, the learner's
//! spoken attempt is transcribed by Whisper, and the recognized word is scored against
//! the expected one syllable by syllable, producing tiered feedback.

pub mod audio;
pub mod config;
pub mod dictionary;
pub mod engine;
pub mod session;
pub mod stt;
pub mod words;
