//! Microphone capture for pronunciation attempts.
//!
//! Cross-platform capture with cpal, down-mixed to mono and resampled with rubato
//! to the recognizer's sample rate.

mod capture;
pub mod resampler;
pub mod util;

pub use capture::Capturer;
