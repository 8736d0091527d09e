//! Pronunciation scoring engine.
//!
//! Syllabifies dictionary transcriptions, scores a recognized word against the
//! expected one, and renders feedback. Every operation is a pure computation over the
//! shared, read-only dictionary.

pub mod feedback;
pub mod scoring;
pub mod syllable;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::dictionary::PhonemeLookup;

pub use scoring::{PronunciationAnalysis, ScoringError, SyllableScore};
pub use syllable::{Syllable, SyllableInfo, Timing, syllabify};

/// What the learner is shown before an attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticePrompt {
    pub word: String,
    pub display_text: String,
    pub syllables: Vec<Syllable>,
    pub timing: Vec<Timing>,
    /// Raw phonemes joined by ` - `.
    pub pronunciation_guide: String,
}

/// Result of scoring one attempt, ready for presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringReport {
    pub success: bool,
    /// Recognized word.
    pub text: String,
    pub expected_word: String,
    /// Overall score; absent when the attempt could not be scored.
    pub confidence: Option<f64>,
    pub feedback: String,
    pub analysis: Vec<SyllableScore>,
    pub syllable_scores: Vec<f64>,
    pub syllable_info: Option<SyllableInfo>,
    pub pronunciation_guide: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScoringReport {
    /// Report for an attempt whose expected word could not be analyzed.
    pub fn unavailable(expected_word: &str, recognized_word: &str, error: &ScoringError) -> Self {
        Self {
            success: false,
            text: recognized_word.to_string(),
            expected_word: expected_word.to_string(),
            confidence: None,
            feedback: format!(
                "Word not found in pronunciation dictionary.\n\nPronunciation analysis is unavailable for '{}'. Try a different word.",
                expected_word
            ),
            analysis: Vec::new(),
            syllable_scores: Vec::new(),
            syllable_info: None,
            pronunciation_guide: String::new(),
            error: Some(error.to_string()),
        }
    }

    /// First line of the feedback text.
    pub fn headline(&self) -> &str {
        self.feedback.lines().next().unwrap_or_default()
    }
}

/// Scoring engine over an injected pronouncing dictionary.
pub struct PronunciationEngine<D: ?Sized> {
    dictionary: Arc<D>,
}

impl<D: ?Sized> Clone for PronunciationEngine<D> {
    fn clone(&self) -> Self {
        Self { dictionary: self.dictionary.clone() }
    }
}

impl<D: PhonemeLookup + ?Sized> PronunciationEngine<D> {
    pub fn new(dictionary: Arc<D>) -> Self {
        Self { dictionary }
    }

    /// Syllable structure of `word` from its canonical transcription, or `None` if the
    /// dictionary has no usable entry.
    pub fn lookup(&self, word: &str) -> Option<SyllableInfo> {
        let word = word.trim().to_lowercase();
        let transcription = self.dictionary.canonical(&word)?;
        let info = syllabify(transcription.as_slice());
        if info.is_empty() { None } else { Some(info) }
    }

    /// Syllable structure of `word`, degrading to [`SyllableInfo::unknown`] when the
    /// word is not in the dictionary.
    pub fn syllable_info(&self, word: &str) -> SyllableInfo {
        self.lookup(word).unwrap_or_else(|| {
            debug!("'{}' not in dictionary, using single-syllable fallback", word);
            SyllableInfo::unknown(word.trim())
        })
    }

    /// Build the practice prompt for `word`.
    pub fn practice_prompt(&self, word: &str) -> PracticePrompt {
        let word = word.trim().to_lowercase();
        let info = self.syllable_info(&word);
        PracticePrompt {
            display_text: word.clone(),
            pronunciation_guide: info.pronunciation_guide(),
            syllables: info.syllables,
            timing: info.timing,
            word,
        }
    }

    /// Score `recognized` against `expected` syllable by syllable.
    ///
    /// # Errors
    /// Returns [`ScoringError::WordNotFound`] if `expected` has no dictionary entry.
    pub fn analyze(&self, expected: &str, recognized: &str) -> Result<PronunciationAnalysis, ScoringError> {
        let expected_info = self.lookup(expected).ok_or_else(|| ScoringError::WordNotFound { word: expected.trim().to_lowercase() })?;
        let recognized_info = self.syllable_info(&recognized.trim().to_lowercase());
        scoring::score(&expected_info.syllables, &recognized_info.syllables)
    }

    /// Score an attempt and render the full report.
    ///
    /// A missing expected word yields an unsuccessful report instead of an error.
    pub fn evaluate(&self, expected: &str, recognized: &str) -> ScoringReport {
        let expected = expected.trim().to_lowercase();
        let recognized = recognized.trim().to_lowercase();

        let analysis = match self.analyze(&expected, &recognized) {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!("Cannot score '{}': {}", expected, e);
                return ScoringReport::unavailable(&expected, &recognized, &e);
            }
        };

        debug!("'{}' vs '{}': overall {:.2} ({})", expected, recognized, analysis.overall, analysis.kind.label());

        let feedback = feedback::generate(analysis.overall, &analysis.syllables, &expected, &recognized);
        let syllable_info = self.lookup(&expected);
        let pronunciation_guide = syllable_info.as_ref().map(SyllableInfo::pronunciation_guide).unwrap_or_default();

        ScoringReport {
            success: true,
            text: recognized,
            expected_word: expected,
            confidence: Some(analysis.overall),
            feedback,
            syllable_scores: analysis.scores(),
            analysis: analysis.syllables,
            syllable_info,
            pronunciation_guide,
            error: None,
        }
    }
}
