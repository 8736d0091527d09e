//! Practice word catalog grouped by difficulty.

use std::fmt;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Difficulty tier of the practice catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Short one-syllable words
    #[default]
    Basic,
    /// Common two-syllable words
    Intermediate,
    /// Longer words with secondary stress
    Advanced,
}

const BASIC: &[&str] = &[
    "cat", "dog", "book", "sun", "moon", "star", "tree", "fish", "bird", "hand", "foot", "eye", "nose", "mouth", "ear", "ball", "car", "house", "door",
    "chair",
];

const INTERMEDIATE: &[&str] = &[
    "apple", "orange", "banana", "purple", "yellow", "window", "pencil", "paper", "water", "table", "sister", "brother", "garden", "flower", "rabbit",
    "turtle", "monkey", "tiger",
];

const ADVANCED: &[&str] = &[
    "elephant",
    "butterfly",
    "beautiful",
    "computer",
    "umbrella",
    "chocolate",
    "strawberry",
    "basketball",
    "wonderful",
    "family",
    "telephone",
    "alligator",
    "octopus",
    "dinosaur",
    "unicorn",
];

impl Difficulty {
    /// Parse a tier key, case-insensitively.
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_lowercase().as_str() {
            "basic" => Some(Difficulty::Basic),
            "intermediate" => Some(Difficulty::Intermediate),
            "advanced" => Some(Difficulty::Advanced),
            _ => None,
        }
    }

    /// Resolve an optional tier key; absent or unknown keys fall back to [`Difficulty::Basic`].
    pub fn resolve(key: Option<&str>) -> Self {
        key.and_then(Self::from_key).unwrap_or_default()
    }

    /// The fixed word list of this tier.
    pub fn words(self) -> &'static [&'static str] {
        match self {
            Difficulty::Basic => BASIC,
            Difficulty::Intermediate => INTERMEDIATE,
            Difficulty::Advanced => ADVANCED,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Basic => write!(f, "basic"),
            Difficulty::Intermediate => write!(f, "intermediate"),
            Difficulty::Advanced => write!(f, "advanced"),
        }
    }
}

/// Pick a word uniformly at random from the tier named by `key`.
pub fn pick(key: Option<&str>) -> &'static str {
    pick_with(key, &mut rand::thread_rng())
}

/// Like [`pick`], drawing from the given random source.
pub fn pick_with<R: Rng + ?Sized>(key: Option<&str>, rng: &mut R) -> &'static str {
    let words = Difficulty::resolve(key).words();
    // Tier lists are non-empty constants
    words.choose(rng).copied().unwrap_or(BASIC[0])
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn test_unknown_tier_falls_back_to_basic() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            assert!(BASIC.contains(&pick_with(Some("expert"), &mut rng)));
        }
    }

    #[test]
    fn test_absent_tier_is_basic() {
        assert_eq!(Difficulty::resolve(None), Difficulty::Basic);
        assert!(BASIC.contains(&pick(None)));
    }

    #[test]
    fn test_picks_from_requested_tier() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            assert!(ADVANCED.contains(&pick_with(Some("advanced"), &mut rng)));
            assert!(INTERMEDIATE.contains(&pick_with(Some("Intermediate"), &mut rng)));
        }
    }

    #[test]
    fn test_selection_covers_tier() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..2000 {
            seen.insert(pick_with(Some("basic"), &mut rng));
        }
        assert_eq!(seen.len(), BASIC.len());
    }

    #[test]
    fn test_tier_keys() {
        assert_eq!(Difficulty::from_key(" ADVANCED "), Some(Difficulty::Advanced));
        assert_eq!(Difficulty::from_key(""), None);
        assert_eq!(Difficulty::Intermediate.to_string(), "intermediate");
    }
}
