//! Interactive practice session.
//!
//! Each round picks a word, shows the prompt, listens for one attempt, transcribes it
//! and prints the scored feedback. Recent attempts are kept in a bounded history and
//! summarized when the session ends.

mod history;
mod render;

use std::io::IsTerminal;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::Result;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::audio::Capturer;
use crate::config::AppConfig;
use crate::dictionary::PhonemeLookup;
use crate::engine::{PracticePrompt, PronunciationEngine, ScoringReport};
use crate::stt::{Recognizer, Transcriber, select_candidate};
use crate::words;

pub use history::{HistoryEntry, PracticeHistory};
pub use render::{colorize, strip_tags};

/// Interval between shutdown checks while waiting for an attempt.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Microphone control around each attempt.
pub trait Microphone {
    /// Start listening for an attempt.
    fn listen(&self) -> Result<()>;
    /// Stop listening and forget any partial speech.
    fn mute(&self);
}

/// Live microphone feeding the recognizer's voice activity detector.
pub struct LiveMicrophone {
    capturer: Capturer,
    recognizer: Arc<Recognizer>,
}

impl LiveMicrophone {
    pub fn new(capturer: Capturer, recognizer: Arc<Recognizer>) -> Self {
        Self { capturer, recognizer }
    }

    pub fn shutdown(&mut self) {
        self.capturer.shutdown();
    }
}

impl Microphone for LiveMicrophone {
    fn listen(&self) -> Result<()> {
        self.recognizer.reset();
        self.capturer.resume()
    }

    fn mute(&self) {
        self.capturer.pause();
        self.recognizer.reset();
    }
}

/// Session settings taken from the command line.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub word: Option<String>,
    pub difficulty: Option<String>,
    /// Rounds to play; 0 means until interrupted.
    pub rounds: usize,
    pub attempt_timeout: Duration,
    pub history_size: usize,
    pub json: bool,
    /// Style terminal output with ANSI colours.
    pub color: bool,
}

impl From<&AppConfig> for SessionOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            word: config.word.clone(),
            difficulty: config.difficulty.clone(),
            rounds: config.rounds,
            attempt_timeout: Duration::from_secs(config.attempt_timeout),
            history_size: config.history_size,
            json: config.json,
            color: std::io::stdout().is_terminal(),
        }
    }
}

/// One line of `--json` output.
#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum SessionEvent<'a> {
    Prompt(&'a PracticePrompt),
    Report(&'a ScoringReport),
    Unintelligible { word: &'a str, message: String },
    RecognitionFailed { word: &'a str, message: &'a str },
    Timeout { word: &'a str },
    Summary { attempts: Vec<&'a HistoryEntry>, average_percent: Option<u32> },
}

pub struct PracticeSession<D: ?Sized> {
    engine: PronunciationEngine<D>,
    options: SessionOptions,
    history: PracticeHistory,
}

impl<D: PhonemeLookup + ?Sized> PracticeSession<D> {
    pub fn new(engine: PronunciationEngine<D>, options: SessionOptions) -> Self {
        let history = PracticeHistory::new(options.history_size);
        Self { engine, options, history }
    }

    pub fn history(&self) -> &PracticeHistory {
        &self.history
    }

    /// The fixed practice word, or a random one at the configured difficulty.
    pub fn next_word(&self) -> String {
        match &self.options.word {
            Some(word) => word.trim().to_lowercase(),
            None => words::pick(self.options.difficulty.as_deref()).to_string(),
        }
    }

    /// Show the practice prompt for `word`.
    pub fn present(&self, round: usize, word: &str) -> Result<PracticePrompt> {
        let prompt = self.engine.practice_prompt(word);
        if self.options.json {
            emit(&SessionEvent::Prompt(&prompt))?;
        } else {
            print!("{}", render::render_prompt(round, &prompt, self.options.color));
        }
        Ok(prompt)
    }

    /// Score the recognizer's candidates for `word`.
    ///
    /// Returns `None` when no candidate yields a usable word; the learner is shown
    /// guidance and nothing is recorded.
    pub fn score_attempt<S: AsRef<str>>(&mut self, word: &str, candidates: &[S]) -> Result<Option<ScoringReport>> {
        let Some(recognized) = select_candidate(candidates, word) else {
            info!("No usable transcription for '{}'", word);
            let message = render::unintelligible_message(word);
            if self.options.json {
                emit(&SessionEvent::Unintelligible { word, message })?;
            } else {
                println!("{}", message);
            }
            return Ok(None);
        };

        let report = self.engine.evaluate(word, &recognized);
        info!("📝 '{}' heard as '{}'", report.expected_word, report.text);

        if self.options.json {
            emit(&SessionEvent::Report(&report))?;
        } else {
            print!("{}", render::render_report(&report, self.options.color));
        }

        self.history.record(&report);
        Ok(Some(report))
    }

    /// Play rounds until the configured count is reached or `shutdown` is set.
    pub async fn run<M, T>(&mut self, microphone: &M, transcriber: Arc<T>, segments: &mut mpsc::Receiver<Vec<f32>>, shutdown: &AtomicBool) -> Result<()>
    where
        M: Microphone + ?Sized,
        T: Transcriber + ?Sized + 'static,
    {
        let mut round = 0;
        while !shutdown.load(Ordering::Relaxed) && (self.options.rounds == 0 || round < self.options.rounds) {
            round += 1;
            let word = self.next_word();
            self.present(round, &word)?;

            drain_segments(segments);
            microphone.listen()?;
            let attempt = wait_for_attempt(segments, self.options.attempt_timeout, shutdown).await;
            microphone.mute();

            let Some(samples) = attempt else {
                if shutdown.load(Ordering::Relaxed) {
                    break;
                }
                debug!("No attempt within {:?}", self.options.attempt_timeout);
                if self.options.json {
                    emit(&SessionEvent::Timeout { word: &word })?;
                } else {
                    println!("No speech heard. Moving on.");
                }
                continue;
            };

            let transcriber = transcriber.clone();
            let candidates = match tokio::task::spawn_blocking(move || transcriber.transcribe(&samples)).await {
                Ok(Ok(candidates)) => candidates,
                Ok(Err(e)) => {
                    error!("❌ Transcription error: {}", e);
                    self.recognition_failed(&word)?;
                    continue;
                }
                Err(e) => {
                    error!("❌ Transcription task failed: {}", e);
                    self.recognition_failed(&word)?;
                    continue;
                }
            };

            self.score_attempt(&word, &candidates)?;
        }
        Ok(())
    }

    /// Print the recent-attempts summary.
    pub fn summarize(&self) -> Result<()> {
        if self.options.json {
            emit(&SessionEvent::Summary { attempts: self.history.entries().collect(), average_percent: self.history.average_percent() })
        } else {
            print!("{}", render::render_summary(&self.history));
            Ok(())
        }
    }

    fn recognition_failed(&self, word: &str) -> Result<()> {
        let message = render::recognition_failed_message();
        if self.options.json {
            emit(&SessionEvent::RecognitionFailed { word, message })
        } else {
            println!("{}", message);
            Ok(())
        }
    }
}

fn emit(event: &SessionEvent<'_>) -> Result<()> {
    println!("{}", serde_json::to_string(event)?);
    Ok(())
}

/// Discard segments captured before the current prompt.
fn drain_segments(segments: &mut mpsc::Receiver<Vec<f32>>) {
    let mut discarded = 0;
    while segments.try_recv().is_ok() {
        discarded += 1;
    }
    if discarded > 0 {
        debug!("🗑️  Discarded {} stale speech segment(s)", discarded);
    }
}

/// Wait up to `timeout` for one speech segment, checking `shutdown` periodically.
async fn wait_for_attempt(segments: &mut mpsc::Receiver<Vec<f32>>, timeout: Duration, shutdown: &AtomicBool) -> Option<Vec<f32>> {
    let deadline = Instant::now() + timeout;
    loop {
        if shutdown.load(Ordering::Relaxed) {
            return None;
        }
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return None;
        }

        match tokio::time::timeout(remaining.min(POLL_INTERVAL), segments.recv()).await {
            Ok(Some(samples)) => return Some(samples),
            Ok(None) => {
                warn!("Speech segment channel closed");
                return None;
            }
            Err(_) => continue,
        }
    }
}
