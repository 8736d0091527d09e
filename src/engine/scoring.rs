//! Positional syllable alignment and scoring.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::syllable::Syllable;

/// A syllable counts as correct only when its score is strictly above this value.
pub const CORRECT_SYLLABLE_THRESHOLD: f64 = 0.8;

/// Errors that prevent an attempt from being scored.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoringError {
    /// The expected word has no dictionary entry.
    #[error("Word not found in pronunciation dictionary: '{word}'")]
    WordNotFound { word: String },

    /// The expected syllable sequence is empty.
    #[error("Expected word has no syllables to compare")]
    NoSyllables,
}

/// Strategy used to produce an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AnalysisKind {
    #[default]
    #[serde(rename = "Syllable-based analysis")]
    Syllable,
}

impl AnalysisKind {
    pub fn label(self) -> &'static str {
        match self {
            AnalysisKind::Syllable => "Syllable-based analysis",
        }
    }
}

/// Comparison result for one expected syllable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyllableScore {
    /// Expected syllable text (phonemes concatenated).
    pub syllable: String,
    pub expected_phonemes: Vec<String>,
    /// Empty when the recognized word has no syllable at this position.
    pub recognized_phonemes: Vec<String>,
    pub correct: bool,
    /// In [0, 1].
    pub score: f64,
}

/// Per-syllable scores plus their mean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PronunciationAnalysis {
    pub syllables: Vec<SyllableScore>,
    /// Mean of the per-syllable scores, in [0, 1].
    pub overall: f64,
    pub kind: AnalysisKind,
}

impl PronunciationAnalysis {
    /// Per-syllable scores in order.
    pub fn scores(&self) -> Vec<f64> {
        self.syllables.iter().map(|s| s.score).collect()
    }
}

/// Fraction of positions holding the same phoneme, over the longer of the two syllables.
pub fn syllable_similarity(expected: &[String], recognized: &[String]) -> f64 {
    let total = expected.len().max(recognized.len());
    if total == 0 {
        return 0.0;
    }
    let matches = expected.iter().zip(recognized).filter(|(e, r)| e == r).count();
    matches as f64 / total as f64
}

/// Score recognized syllables against expected ones, position by position.
///
/// Expected syllables with no recognized counterpart score zero. Recognized syllables
/// beyond the expected count are ignored.
///
/// # Errors
/// Returns [`ScoringError::NoSyllables`] if `expected` is empty.
pub fn score(expected: &[Syllable], recognized: &[Syllable]) -> Result<PronunciationAnalysis, ScoringError> {
    if expected.is_empty() {
        return Err(ScoringError::NoSyllables);
    }

    let syllables: Vec<SyllableScore> = expected
        .iter()
        .enumerate()
        .map(|(i, expected_syllable)| {
            let (recognized_phonemes, score) = match recognized.get(i) {
                Some(recognized_syllable) => {
                    (recognized_syllable.phonemes().to_vec(), syllable_similarity(expected_syllable.phonemes(), recognized_syllable.phonemes()))
                }
                None => (Vec::new(), 0.0),
            };

            debug!("Syllable {} '{}': score {:.2}", i + 1, expected_syllable.text(), score);

            SyllableScore {
                syllable: expected_syllable.text(),
                expected_phonemes: expected_syllable.phonemes().to_vec(),
                recognized_phonemes,
                correct: score > CORRECT_SYLLABLE_THRESHOLD,
                score,
            }
        })
        .collect();

    let overall = syllables.iter().map(|s| s.score).sum::<f64>() / syllables.len() as f64;

    Ok(PronunciationAnalysis { syllables, overall, kind: AnalysisKind::Syllable })
}
