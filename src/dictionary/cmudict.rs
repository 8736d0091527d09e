//! CMU Pronouncing Dictionary loader.
//!
//! Accepts the common distributions of the dictionary:
//! - `cmudict-0.7b`: `WORD  W ER1 D` with `;;;` comments and `WORD(1)` variants
//! - `cmudict.dict`: `word w er1 d` with `word(2)` variants and trailing `# comments`
//! - NLTK corpus: `word 1 W ER1 D` with the variant number as its own column

use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use tracing::{debug, info};

use super::{PhonemeLookup, PhonemeTranscription};

/// Headword with an optional `(n)` variant suffix.
static HEADWORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(?P<word>.+?)(?:\((?P<variant>\d+)\))?$").expect("valid headword regex"));

/// Errors raised while loading a pronouncing dictionary.
#[derive(Error, Debug)]
pub enum DictionaryError {
    #[error("Failed to read dictionary {path}: {source}")]
    Io { path: String, source: std::io::Error },

    #[error("Malformed dictionary entry on line {line}: '{content}'")]
    Malformed { line: usize, content: String },

    #[error("Dictionary contains no entries")]
    Empty,
}

/// Immutable in-memory CMU dictionary keyed by lowercase word.
#[derive(Debug, Default)]
pub struct CmuDict {
    entries: HashMap<String, Vec<PhonemeTranscription>>,
}

impl CmuDict {
    /// Load a dictionary file from disk.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, a line cannot be parsed, or the
    /// file holds no entries.
    pub fn load(path: &Path) -> Result<Self, DictionaryError> {
        info!("Loading pronouncing dictionary from {}", path.display());

        let bytes = std::fs::read(path).map_err(|source| DictionaryError::Io { path: path.display().to_string(), source })?;
        let dict = Self::parse(&decode(bytes))?;

        info!("Loaded {} words ({} pronunciations)", dict.len(), dict.pronunciation_count());
        Ok(dict)
    }

    /// Parse dictionary text. Variants are kept in file order.
    ///
    /// # Errors
    /// Returns an error on a headword with no phonemes, or when no entries are found.
    pub fn parse(content: &str) -> Result<Self, DictionaryError> {
        let mut entries: HashMap<String, Vec<PhonemeTranscription>> = HashMap::new();

        for (index, line) in content.lines().enumerate() {
            let line = line.split('#').next().unwrap_or_default().trim();
            if line.is_empty() || line.starts_with(";;;") {
                continue;
            }

            let malformed = || DictionaryError::Malformed { line: index + 1, content: line.to_string() };

            let mut tokens = line.split_whitespace().peekable();
            let headword = tokens.next().ok_or_else(malformed)?;
            let captures = HEADWORD.captures(headword).ok_or_else(malformed)?;
            let word = captures["word"].to_lowercase();

            // NLTK puts the variant number in its own column
            if tokens.peek().is_some_and(|t| t.chars().all(|c| c.is_ascii_digit())) {
                tokens.next();
            }

            let phonemes: PhonemeTranscription = tokens.map(str::to_uppercase).collect();
            if phonemes.is_empty() {
                return Err(malformed());
            }

            entries.entry(word).or_default().push(phonemes);
        }

        if entries.is_empty() {
            return Err(DictionaryError::Empty);
        }

        debug!("Parsed {} dictionary headwords", entries.len());
        Ok(Self { entries })
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of pronunciations across all words.
    pub fn pronunciation_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}

/// Decode dictionary bytes as UTF-8, or as Latin-1 (the encoding of `cmudict-0.7b`).
fn decode(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap_or_else(|e| {
        debug!("Dictionary is not UTF-8, decoding as Latin-1");
        e.into_bytes().into_iter().map(char::from).collect()
    })
}

impl PhonemeLookup for CmuDict {
    fn transcriptions(&self, word: &str) -> &[PhonemeTranscription] {
        self.entries.get(&word.to_lowercase()).map(Vec::as_slice).unwrap_or_default()
    }
}
