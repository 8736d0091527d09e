//! Pronouncing dictionary lookup.
//!
//! The engine only sees the [`PhonemeLookup`] capability; [`CmuDict`] is the production
//! implementation, loaded once at startup and shared read-only behind an `Arc`.

mod cmudict;

pub use cmudict::{CmuDict, DictionaryError};

/// One pronunciation variant: an ordered list of phoneme symbols, vowels carrying a stress digit.
pub type PhonemeTranscription = Vec<String>;

/// Lookup of phoneme transcriptions by lowercase word.
pub trait PhonemeLookup: Send + Sync {
    /// All pronunciation variants of `word`, canonical first. Empty when the word is unknown.
    fn transcriptions(&self, word: &str) -> &[PhonemeTranscription];

    /// The canonical (first) variant of `word`, if any.
    fn canonical(&self, word: &str) -> Option<&PhonemeTranscription> {
        self.transcriptions(word).first()
    }

    fn contains(&self, word: &str) -> bool {
        !self.transcriptions(word).is_empty()
    }
}
