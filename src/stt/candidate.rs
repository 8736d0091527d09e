//! Choosing the recognized word among transcription candidates.

use tracing::debug;

/// Pick the recognized word for an attempt at `expected`.
///
/// Candidates are lowercased and trimmed. If any candidate mentions the expected word
/// (as a token, as a substring, or as a fragment of it) the expected word is used;
/// otherwise the first candidate. The first token of the choice that holds a word is returned.
/// Returns `None` when no candidate holds any text.
pub fn select_candidate<S: AsRef<str>>(candidates: &[S], expected: &str) -> Option<String> {
    let expected = expected.trim().to_lowercase();
    let candidates: Vec<String> = candidates.iter().map(|c| c.as_ref().trim().to_lowercase()).filter(|c| !c.is_empty()).collect();

    let lenient_match = !expected.is_empty()
        && candidates.iter().any(|transcript| {
            transcript.split_whitespace().any(|token| token == expected) || expected.contains(transcript.as_str()) || transcript.contains(&expected)
        });

    let chosen = if lenient_match { expected.as_str() } else { candidates.first()?.as_str() };
    debug!("Selected '{}' from {} candidate(s)", chosen, candidates.len());

    chosen.split_whitespace().map(normalize_token).find(|word| !word.is_empty())
}

/// Strip the punctuation Whisper attaches to words.
fn normalize_token(token: &str) -> String {
    token.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'').to_string()
}
