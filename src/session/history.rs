//! Bounded log of recent attempts, most recent first.

use std::collections::VecDeque;

use serde::Serialize;

use crate::engine::ScoringReport;
use crate::engine::feedback::percent;

/// One scored attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub word: String,
    pub heard: String,
    /// Overall score as a percentage; absent when the word could not be scored.
    pub score_percent: Option<u32>,
    /// First line of the feedback.
    pub headline: String,
}

impl From<&ScoringReport> for HistoryEntry {
    fn from(report: &ScoringReport) -> Self {
        Self {
            word: report.expected_word.clone(),
            heard: report.text.clone(),
            score_percent: report.confidence.map(percent),
            headline: report.headline().to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PracticeHistory {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl PracticeHistory {
    pub fn new(capacity: usize) -> Self {
        Self { entries: VecDeque::with_capacity(capacity), capacity }
    }

    /// Record an attempt, evicting the oldest beyond capacity.
    pub fn record(&mut self, report: &ScoringReport) {
        if self.capacity == 0 {
            return;
        }
        self.entries.push_front(HistoryEntry::from(report));
        self.entries.truncate(self.capacity);
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Mean percentage over the scored attempts.
    pub fn average_percent(&self) -> Option<u32> {
        let scored: Vec<u32> = self.entries.iter().filter_map(|e| e.score_percent).collect();
        if scored.is_empty() {
            return None;
        }
        Some(scored.iter().sum::<u32>() / scored.len() as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(word: &str, confidence: Option<f64>) -> ScoringReport {
        ScoringReport {
            success: confidence.is_some(),
            text: word.to_string(),
            expected_word: word.to_string(),
            confidence,
            feedback: format!("Headline for {}\nmore", word),
            analysis: Vec::new(),
            syllable_scores: Vec::new(),
            syllable_info: None,
            pronunciation_guide: String::new(),
            error: None,
        }
    }

    #[test]
    fn test_most_recent_first_and_bounded() {
        let mut history = PracticeHistory::new(2);
        history.record(&report("cat", Some(1.0)));
        history.record(&report("dog", Some(0.5)));
        history.record(&report("sun", Some(0.25)));

        let words: Vec<&str> = history.entries().map(|e| e.word.as_str()).collect();
        assert_eq!(words, vec!["sun", "dog"]);
    }

    #[test]
    fn test_entry_fields() {
        let entry = HistoryEntry::from(&report("cat", Some(0.666)));
        assert_eq!(entry.score_percent, Some(66));
        assert_eq!(entry.headline, "Headline for cat");
    }

    #[test]
    fn test_average_skips_unscored() {
        let mut history = PracticeHistory::new(10);
        assert_eq!(history.average_percent(), None);
        history.record(&report("cat", Some(1.0)));
        history.record(&report("zorp", None));
        history.record(&report("dog", Some(0.5)));
        assert_eq!(history.average_percent(), Some(75));
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let mut history = PracticeHistory::new(0);
        history.record(&report("cat", Some(1.0)));
        assert!(history.is_empty());
    }
}
