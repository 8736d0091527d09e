//! Tiered, human-readable feedback for a scored attempt.
//!
//! Two sets of thresholds are in play and must stay separate:
//! - a syllable is listed for remediation when its raw score is below [`REMEDIATION_THRESHOLD`];
//! - severity tags bucket the truncated integer percentage at [`HIGH_SEVERITY_PERCENT`] and
//!   [`MEDIUM_SEVERITY_PERCENT`].
//!
//! Severity tags are embedded as `[score-high]...[/score-high]` markers so the
//! presentation layer can style them.

use std::fmt;

use super::scoring::SyllableScore;

/// Syllables scoring below this value are listed as needing work.
pub const REMEDIATION_THRESHOLD: f64 = 0.8;

/// Integer percentage at or above which a score is tagged `score-high`.
pub const HIGH_SEVERITY_PERCENT: u32 = 80;

/// Integer percentage at or above which a score is tagged `score-medium`.
pub const MEDIUM_SEVERITY_PERCENT: u32 = 60;

/// Overall scores below this value get the improvement tips appended.
pub const TIPS_THRESHOLD: f64 = 0.9;

const IMPROVEMENT_TIPS: [&str; 5] = [
    "- Listen carefully to the correct pronunciation",
    "- Break down the word into syllables and practice each part",
    "- Pay attention to the length of each syllable",
    "- Watch your mouth shape in a mirror while practicing",
    "- Feel the vibrations in your throat and chest",
];

/// Presentation class of a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    /// Bucket an integer percentage.
    pub fn from_percent(percent: u32) -> Self {
        if percent >= HIGH_SEVERITY_PERCENT {
            Severity::High
        } else if percent >= MEDIUM_SEVERITY_PERCENT {
            Severity::Medium
        } else {
            Severity::Low
        }
    }

    /// Class name used in the embedded tag.
    pub fn class(self) -> &'static str {
        match self {
            Severity::High => "score-high",
            Severity::Medium => "score-medium",
            Severity::Low => "score-low",
        }
    }

    /// Wrap `text` in this severity's tag.
    pub fn tag(self, text: &str) -> String {
        format!("[{0}]{1}[/{0}]", self.class(), text)
    }

    pub const ALL: [Severity; 3] = [Severity::High, Severity::Medium, Severity::Low];
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class())
    }
}

/// Truncated integer percentage of a score in [0, 1].
pub fn percent(score: f64) -> u32 {
    (score * 100.0).trunc().max(0.0) as u32
}

/// Ordinal label for a 1-based position: first, second, third, then `Nth`.
pub fn ordinal(position: usize) -> String {
    match position {
        1 => "first".to_string(),
        2 => "second".to_string(),
        3 => "third".to_string(),
        n => format!("{}th", n),
    }
}

/// Overall assessment sentence for a score.
fn assessment(score: f64) -> &'static str {
    if score >= 0.9 {
        "Excellent pronunciation!"
    } else if score >= 0.7 {
        "Good pronunciation, but there's room for improvement."
    } else if score >= 0.5 {
        "Your pronunciation needs some work."
    } else {
        "Let's focus on improving your pronunciation."
    }
}

/// Render the feedback report for an attempt.
///
/// Lines are joined with `\n`; section headers carry a leading blank line.
pub fn generate(overall_score: f64, syllable_scores: &[SyllableScore], expected_word: &str, recognized_word: &str) -> String {
    let mut feedback = Vec::new();

    if expected_word.to_lowercase() == recognized_word.to_lowercase() {
        feedback.push("Excellent! You pronounced the word correctly.".to_string());
    } else {
        feedback.push(format!("You said '{}' instead of '{}'.", recognized_word, expected_word));
    }

    let needs_work: Vec<(usize, &SyllableScore)> =
        syllable_scores.iter().enumerate().filter(|(_, s)| s.score < REMEDIATION_THRESHOLD).map(|(i, s)| (i + 1, s)).collect();

    if !needs_work.is_empty() {
        feedback.push("\nSyllables that need improvement:".to_string());
        for (position, syllable) in needs_work {
            let pct = percent(syllable.score);
            let score_tag = Severity::from_percent(pct).tag(&format!("Score: {}%", pct));
            feedback.push(format!("- The {} syllable '{}' needs work ({})", ordinal(position), syllable.syllable, score_tag));
        }
    }

    let overall_severity = Severity::from_percent(percent(overall_score));
    feedback.push(format!("\nOverall: {}", overall_severity.tag(assessment(overall_score))));

    if overall_score < TIPS_THRESHOLD {
        feedback.push("\nTips for improvement:".to_string());
        feedback.extend(IMPROVEMENT_TIPS.iter().map(|tip| tip.to_string()));
    }

    feedback.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn syllable_score(syllable: &str, score: f64) -> SyllableScore {
        SyllableScore {
            syllable: syllable.to_string(),
            expected_phonemes: vec![syllable.to_string()],
            recognized_phonemes: Vec::new(),
            correct: score > 0.8,
            score,
        }
    }

    #[test]
    fn test_perfect_attempt() {
        let scores = [syllable_score("KAE", 1.0), syllable_score("T", 1.0)];
        let feedback = generate(1.0, &scores, "cat", "CAT");
        assert_eq!(feedback, "Excellent! You pronounced the word correctly.\n\nOverall: [score-high]Excellent pronunciation![/score-high]");
    }

    #[test]
    fn test_full_report_with_remediation_and_tips() {
        let scores = [syllable_score("EH", 1.0), syllable_score("LAH", 0.5), syllable_score("FAH", 0.0), syllable_score("NT", 0.0)];
        let feedback = generate(0.375, &scores, "elephant", "element");
        let expected = "You said 'element' instead of 'elephant'.\n\
\n\
Syllables that need improvement:\n\
- The second syllable 'LAH' needs work ([score-low]Score: 50%[/score-low])\n\
- The third syllable 'FAH' needs work ([score-low]Score: 0%[/score-low])\n\
- The 4th syllable 'NT' needs work ([score-low]Score: 0%[/score-low])\n\
\n\
Overall: [score-low]Let's focus on improving your pronunciation.[/score-low]\n\
\n\
Tips for improvement:\n\
- Listen carefully to the correct pronunciation\n\
- Break down the word into syllables and practice each part\n\
- Pay attention to the length of each syllable\n\
- Watch your mouth shape in a mirror while practicing\n\
- Feel the vibrations in your throat and chest";
        assert_eq!(feedback, expected);
    }

    #[test]
    fn test_exactly_threshold_is_not_listed() {
        let scores = [syllable_score("STRAOB", 0.8)];
        let feedback = generate(0.8, &scores, "strob", "strop");
        assert!(!feedback.contains("needs work"));
        assert!(feedback.contains("Overall: [score-high]Good pronunciation, but there's room for improvement.[/score-high]"));
    }

    #[test]
    fn test_severity_uses_truncated_percentage() {
        // 0.7999 lists the syllable (below 0.8) but truncates to 79% -> medium
        let scores = [syllable_score("TAY", 0.7999)];
        let feedback = generate(0.7999, &scores, "tie", "tie");
        assert!(feedback.contains("- The first syllable 'TAY' needs work ([score-medium]Score: 79%[/score-medium])"));

        let scores = [syllable_score("TAY", 0.599)];
        let feedback = generate(0.599, &scores, "tie", "tie");
        assert!(feedback.contains("[score-low]Score: 59%[/score-low]"));
        assert!(feedback.contains("Overall: [score-low]Your pronunciation needs some work.[/score-low]"));
    }

    #[test]
    fn test_overall_buckets() {
        assert_eq!(assessment(0.9), "Excellent pronunciation!");
        assert_eq!(assessment(0.7), "Good pronunciation, but there's room for improvement.");
        assert_eq!(assessment(0.5), "Your pronunciation needs some work.");
        assert_eq!(assessment(0.49), "Let's focus on improving your pronunciation.");
    }

    #[test]
    fn test_tips_only_below_ninety() {
        assert!(!generate(0.9, &[], "cat", "cat").contains("Tips for improvement"));
        let feedback = generate(0.89, &[], "cat", "cat");
        assert_eq!(feedback.lines().filter(|l| l.starts_with("- ")).count(), IMPROVEMENT_TIPS.len());
    }

    #[test]
    fn test_ordinals() {
        assert_eq!(ordinal(1), "first");
        assert_eq!(ordinal(2), "second");
        assert_eq!(ordinal(3), "third");
        assert_eq!(ordinal(4), "4th");
        assert_eq!(ordinal(21), "21th");
    }

    #[test]
    fn test_severity_buckets() {
        assert_eq!(Severity::from_percent(80), Severity::High);
        assert_eq!(Severity::from_percent(79), Severity::Medium);
        assert_eq!(Severity::from_percent(60), Severity::Medium);
        assert_eq!(Severity::from_percent(59), Severity::Low);
        assert_eq!(Severity::Medium.tag("x"), "[score-medium]x[/score-medium]");
    }

    #[test]
    fn test_generate_is_deterministic() {
        let scores = [syllable_score("KAE", 0.66), syllable_score("T", 0.0)];
        assert_eq!(generate(0.33, &scores, "cat", "cap"), generate(0.33, &scores, "cat", "cap"));
    }
}
