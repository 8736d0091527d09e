//! Syllabification of CMU phoneme transcriptions.
//!
//! A syllable closes on every stress-bearing vowel. The stress digit decides how long
//! the learner should hold the syllable (its timing tag).

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Stress level carried by a vowel phoneme as a trailing digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stress {
    /// `1`
    Primary,
    /// `2`
    Secondary,
    /// `0`, or any other digit
    Unstressed,
}

impl Stress {
    /// Map a stress digit to its level.
    pub fn from_digit(digit: char) -> Self {
        match digit {
            '1' => Stress::Primary,
            '2' => Stress::Secondary,
            _ => Stress::Unstressed,
        }
    }

    /// Timing tag for a syllable closed by a vowel with this stress.
    pub fn timing(self) -> Timing {
        match self {
            Stress::Primary => Timing::Long,
            Stress::Secondary => Timing::Medium,
            Stress::Unstressed => Timing::Short,
        }
    }
}

/// Qualitative duration hint for a syllable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timing {
    Long,
    Medium,
    Short,
}

impl Timing {
    /// Practice hint shown next to the syllable, if any.
    pub fn hint(self) -> Option<&'static str> {
        match self {
            Timing::Long => Some("stretch longer"),
            Timing::Medium => None,
            Timing::Short => Some("quick"),
        }
    }
}

impl fmt::Display for Timing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Timing::Long => "long",
            Timing::Medium => "medium",
            Timing::Short => "short",
        })
    }
}

/// An ordered run of phonemes (stress digits stripped) ending in one vowel nucleus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Syllable(Vec<String>);

impl Syllable {
    pub fn new(phonemes: Vec<String>) -> Self {
        Self(phonemes)
    }

    pub fn phonemes(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Phoneme symbols concatenated, e.g. `LAH` for `[L, AH]`.
    pub fn text(&self) -> String {
        self.0.concat()
    }
}

/// Syllable structure of one word, derived fresh from its transcription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyllableInfo {
    pub syllables: Vec<Syllable>,
    /// One tag per syllable.
    pub timing: Vec<Timing>,
    /// Raw transcription, stress digits intact.
    pub phonemes: Vec<String>,
}

impl SyllableInfo {
    /// Fallback for a word missing from the dictionary: a single medium syllable whose
    /// only "phoneme" is the word itself in uppercase.
    pub fn unknown(word: &str) -> Self {
        let symbol = word.to_uppercase();
        Self {
            syllables: vec![Syllable::new(vec![symbol.clone()])],
            timing: vec![Timing::Medium],
            phonemes: vec![symbol],
        }
    }

    pub fn len(&self) -> usize {
        self.syllables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.syllables.is_empty()
    }

    /// Raw phonemes joined with ` - `, e.g. `K - AE1 - T`.
    pub fn pronunciation_guide(&self) -> String {
        self.phonemes.join(" - ")
    }
}

/// Split a raw phoneme into its bare symbol and the stress it carries, if any.
///
/// The first digit found decides the stress; every digit is removed from the symbol.
pub fn split_stress(phoneme: &str) -> (String, Option<Stress>) {
    let stress = phoneme.chars().find(char::is_ascii_digit).map(Stress::from_digit);
    let bare = phoneme.chars().filter(|c| !c.is_ascii_digit()).collect();
    (bare, stress)
}

/// Group a phoneme transcription into syllables.
///
/// Phonemes accumulate until a stress-bearing vowel closes the syllable. Consonants
/// trailing the last vowel form a final short syllable. A transcription without any
/// stress-bearing phoneme becomes a single medium syllable. An empty transcription
/// yields no syllables.
pub fn syllabify<S: AsRef<str>>(phonemes: &[S]) -> SyllableInfo {
    let raw: Vec<String> = phonemes.iter().map(|p| p.as_ref().to_string()).collect();

    let mut syllables = Vec::new();
    let mut timing = Vec::new();
    let mut current = Vec::new();

    for phoneme in &raw {
        match split_stress(phoneme) {
            (bare, Some(stress)) => {
                current.push(bare);
                syllables.push(Syllable::new(std::mem::take(&mut current)));
                timing.push(stress.timing());
            }
            (bare, None) => current.push(bare),
        }
    }

    if syllables.is_empty() {
        if !current.is_empty() {
            syllables.push(Syllable::new(current));
            timing.push(Timing::Medium);
        }
    } else if !current.is_empty() {
        syllables.push(Syllable::new(current));
        timing.push(Timing::Short);
    }

    debug!("Syllabified {:?} into {} syllable(s)", raw, syllables.len());

    SyllableInfo { syllables, timing, phonemes: raw }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(info: &SyllableInfo) -> Vec<String> {
        info.syllables.iter().map(Syllable::text).collect()
    }

    #[test]
    fn test_vowel_closes_syllable() {
        let info = syllabify(&["D", "AO1"]);
        assert_eq!(info.syllables, vec![Syllable::new(vec!["D".into(), "AO".into()])]);
        assert_eq!(info.timing, vec![Timing::Long]);
        assert_eq!(info.phonemes, vec!["D", "AO1"]);
    }

    #[test]
    fn test_trailing_consonants_form_short_syllable() {
        let info = syllabify(&["K", "AE1", "T"]);
        assert_eq!(texts(&info), vec!["KAE", "T"]);
        assert_eq!(info.timing, vec![Timing::Long, Timing::Short]);
    }

    #[test]
    fn test_multi_syllable_timing() {
        // elephant: EH1 L AH0 F AH0 N T
        let info = syllabify(&["EH1", "L", "AH0", "F", "AH0", "N", "T"]);
        assert_eq!(texts(&info), vec!["EH", "LAH", "FAH", "NT"]);
        assert_eq!(info.timing, vec![Timing::Long, Timing::Short, Timing::Short, Timing::Short]);
    }

    #[test]
    fn test_secondary_stress_is_medium() {
        // alligator: AE1 L AH0 G EY2 T ER0
        let info = syllabify(&["AE1", "L", "AH0", "G", "EY2", "T", "ER0"]);
        assert_eq!(texts(&info), vec!["AE", "LAH", "GEY", "TER"]);
        assert_eq!(info.timing, vec![Timing::Long, Timing::Short, Timing::Medium, Timing::Short]);
    }

    #[test]
    fn test_no_stress_collapses_to_one_medium_syllable() {
        let info = syllabify(&["HH", "M"]);
        assert_eq!(texts(&info), vec!["HHM"]);
        assert_eq!(info.timing, vec![Timing::Medium]);
    }

    #[test]
    fn test_empty_transcription() {
        let info = syllabify::<&str>(&[]);
        assert!(info.is_empty());
        assert!(info.timing.is_empty());
    }

    #[test]
    fn test_timing_count_matches_syllables() {
        let words: [&[&str]; 4] = [
            &["B", "AH1", "T", "ER0", "F", "L", "AY2"],
            &["S", "T", "R", "AO1", "B", "EH2", "R", "IY0"],
            &["D", "AO1", "G"],
            &["N", "G"],
        ];
        for phonemes in words {
            let info = syllabify(phonemes);
            assert_eq!(info.syllables.len(), info.timing.len(), "{:?}", phonemes);
        }
    }

    #[test]
    fn test_syllables_preserve_phoneme_order() {
        let raw = ["B", "AH1", "T", "ER0", "F", "L", "AY2"];
        let info = syllabify(&raw);
        let flattened: Vec<&str> = info.syllables.iter().flat_map(|s| s.phonemes()).map(String::as_str).collect();
        let stripped: Vec<String> = raw.iter().map(|p| split_stress(p).0).collect();
        assert_eq!(flattened, stripped);
    }

    #[test]
    fn test_unknown_word_fallback() {
        let info = SyllableInfo::unknown("zorp");
        assert_eq!(info.len(), 1);
        assert_eq!(info.timing, vec![Timing::Medium]);
        assert_eq!(info.syllables[0].text(), "ZORP");
        assert_eq!(info.pronunciation_guide(), "ZORP");
    }

    #[test]
    fn test_pronunciation_guide() {
        let info = syllabify(&["K", "AE1", "T"]);
        assert_eq!(info.pronunciation_guide(), "K - AE1 - T");
    }

    #[test]
    fn test_split_stress() {
        assert_eq!(split_stress("AE1"), ("AE".to_string(), Some(Stress::Primary)));
        assert_eq!(split_stress("EY2"), ("EY".to_string(), Some(Stress::Secondary)));
        assert_eq!(split_stress("AH0"), ("AH".to_string(), Some(Stress::Unstressed)));
        assert_eq!(split_stress("K"), ("K".to_string(), None));
    }

    #[test]
    fn test_timing_hints() {
        assert_eq!(Timing::Long.hint(), Some("stretch longer"));
        assert_eq!(Timing::Medium.hint(), None);
        assert_eq!(Timing::Short.hint(), Some("quick"));
    }
}
