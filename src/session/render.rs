//! Terminal rendering of prompts, reports and the session summary.

use std::sync::LazyLock;

use crossterm::style::{StyledContent, Stylize};
use regex::{Captures, Regex};

use crate::engine::feedback::{Severity, percent};
use crate::engine::{PracticePrompt, ScoringReport};

use super::history::PracticeHistory;

/// Matches `[score-x]text[/score-x]` for each severity class.
static SEVERITY_TAGS: LazyLock<Vec<(Severity, Regex)>> = LazyLock::new(|| {
    Severity::ALL
        .iter()
        .filter_map(|&severity| {
            let class = regex::escape(severity.class());
            Regex::new(&format!(r"\[{0}\](.*?)\[/{0}\]", class)).ok().map(|re| (severity, re))
        })
        .collect()
});

/// Guidance shown when nothing intelligible was recognized.
pub fn unintelligible_message(word: &str) -> String {
    format!(
        "I couldn't understand what you said. Here are some tips:\n\n\
         1. Speak clearly and at a normal pace\n\
         2. Make sure there's not too much background noise\n\
         3. Hold the microphone closer to your mouth\n\
         4. Try speaking a bit louder\n\n\
         The word to pronounce is: {}",
        word.to_uppercase()
    )
}

/// Guidance shown when the recognizer itself failed.
pub fn recognition_failed_message() -> &'static str {
    "There was a problem with the speech recognition.\n\nPlease try again."
}

fn paint(text: &str, severity: Severity) -> StyledContent<&str> {
    match severity {
        Severity::High => text.green(),
        Severity::Medium => text.yellow(),
        Severity::Low => text.red(),
    }
}

/// Replace severity tags with terminal colours.
pub fn colorize(feedback: &str) -> String {
    SEVERITY_TAGS.iter().fold(feedback.to_string(), |text, (severity, re)| {
        re.replace_all(&text, |caps: &Captures| paint(&caps[1], *severity).to_string()).into_owned()
    })
}

/// Remove severity tags, keeping the enclosed text.
pub fn strip_tags(feedback: &str) -> String {
    SEVERITY_TAGS
        .iter()
        .fold(feedback.to_string(), |text, (_, re)| re.replace_all(&text, "$1").into_owned())
}

/// Colour for an overall percentage: green, blue, yellow, then red.
pub fn score_label(percent: u32) -> String {
    let text = format!("{}%", percent);
    match percent {
        90.. => text.green().bold().to_string(),
        70..=89 => text.blue().bold().to_string(),
        50..=69 => text.yellow().bold().to_string(),
        _ => text.red().bold().to_string(),
    }
}

fn bold(text: &str, color: bool) -> String {
    if color { text.bold().to_string() } else { text.to_string() }
}

fn dim(text: &str, color: bool) -> String {
    if color { text.dim().to_string() } else { text.to_string() }
}

pub fn render_prompt(round: usize, prompt: &PracticePrompt, color: bool) -> String {
    let mut out = format!("\n{} Say: {}\n", dim(&format!("[{}]", round), color), bold(&prompt.display_text.to_uppercase(), color));

    for (syllable, timing) in prompt.syllables.iter().zip(&prompt.timing) {
        match timing.hint() {
            Some(hint) => out.push_str(&format!("  {:<8} {:<6} {}\n", syllable.text(), timing, dim(hint, color))),
            None => out.push_str(&format!("  {:<8} {}\n", syllable.text(), timing)),
        }
    }
    if !prompt.pronunciation_guide.is_empty() {
        out.push_str(&format!("  Guide: {}\n", prompt.pronunciation_guide));
    }
    out
}

pub fn render_report(report: &ScoringReport, color: bool) -> String {
    let mut out = String::new();
    if let Some(confidence) = report.confidence {
        let score = percent(confidence);
        let label = if color { score_label(score) } else { format!("{}%", score) };
        out.push_str(&format!("Heard \"{}\" - score {}\n", report.text, label));
    }

    let feedback = if color { colorize(&report.feedback) } else { strip_tags(&report.feedback) };
    out.push_str(&feedback);
    out.push('\n');
    out
}

pub fn render_summary(history: &PracticeHistory) -> String {
    if history.is_empty() {
        return "No attempts recorded.\n".to_string();
    }

    let mut out = String::from("\nRecent attempts:\n");
    for entry in history.entries() {
        let score = entry.score_percent.map(|p| format!("{:>3}%", p)).unwrap_or_else(|| "  - ".to_string());
        out.push_str(&format!("  {} {:<14} heard \"{}\"\n", score, entry.word, entry.heard));
    }
    if let Some(average) = history.average_percent() {
        out.push_str(&format!("Average: {}%\n", average));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Syllable, Timing};

    #[test]
    fn test_strip_tags() {
        let text = "Overall: [score-medium]Good effort![/score-medium]\n([score-low]Score: 40%[/score-low])";
        assert_eq!(strip_tags(text), "Overall: Good effort!\n(Score: 40%)");
    }

    #[test]
    fn test_colorize_removes_tags() {
        let text = "[score-high]Excellent pronunciation![/score-high]";
        let colored = colorize(text);
        assert!(!colored.contains("[score-"));
        assert!(colored.contains("Excellent pronunciation!"));
    }

    #[test]
    fn test_untagged_text_unchanged() {
        assert_eq!(colorize("plain text"), "plain text");
    }

    #[test]
    fn test_unintelligible_uppercases_word() {
        let message = unintelligible_message("dog");
        assert!(message.starts_with("I couldn't understand what you said."));
        assert!(message.ends_with("The word to pronounce is: DOG"));
    }

    #[test]
    fn test_score_label_buckets() {
        for (score, expected) in [(95, "95%"), (70, "70%"), (50, "50%"), (10, "10%")] {
            assert!(score_label(score).contains(expected));
        }
    }

    #[test]
    fn test_prompt_shows_timing_hints() {
        let prompt = PracticePrompt {
            word: "cat".to_string(),
            display_text: "cat".to_string(),
            syllables: vec![Syllable::new(vec!["K".into(), "AE".into()]), Syllable::new(vec!["T".into()])],
            timing: vec![Timing::Long, Timing::Short],
            pronunciation_guide: "K - AE1 - T".to_string(),
        };
        let rendered = render_prompt(1, &prompt, false);
        assert!(rendered.starts_with("\n[1] Say: CAT\n"));
        assert!(rendered.contains("KAE"));
        assert!(rendered.contains(Timing::Long.hint().unwrap_or_default()));
        assert!(rendered.contains(Timing::Short.hint().unwrap_or_default()));
        assert!(rendered.contains("Guide: K - AE1 - T"));
    }

    #[test]
    fn test_plain_report_has_no_escapes() {
        let report = ScoringReport {
            success: true,
            text: "element".to_string(),
            expected_word: "elephant".to_string(),
            confidence: Some(0.375),
            feedback: "You said 'element' instead of 'elephant'.\n\nOverall: [score-low]Let's focus on improving your pronunciation.[/score-low]".to_string(),
            analysis: Vec::new(),
            syllable_scores: Vec::new(),
            syllable_info: None,
            pronunciation_guide: String::new(),
            error: None,
        };

        let plain = render_report(&report, false);
        assert_eq!(
            plain,
            "Heard \"element\" - score 37%\nYou said 'element' instead of 'elephant'.\n\nOverall: Let's focus on improving your pronunciation.\n"
        );
        assert!(!plain.contains('\x1b'));
    }

    #[test]
    fn test_plain_prompt_has_no_escapes() {
        let prompt = PracticePrompt {
            word: "dog".to_string(),
            display_text: "dog".to_string(),
            syllables: vec![Syllable::new(vec!["D".into(), "AO".into()]), Syllable::new(vec!["G".into()])],
            timing: vec![Timing::Long, Timing::Short],
            pronunciation_guide: "D - AO1 - G".to_string(),
        };
        assert!(!render_prompt(2, &prompt, false).contains('\x1b'));
    }

    #[test]
    fn test_empty_summary() {
        assert_eq!(render_summary(&PracticeHistory::new(5)), "No attempts recorded.\n");
    }
}
