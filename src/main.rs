//! Pronunciation Coach - word pronunciation practice with syllable-level feedback.
//!
//! Shows a word with its syllables and timing, listens for the learner's attempt
//! (Silero VAD + Whisper), and scores it against the CMU pronouncing dictionary.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::LocalTime;

use pronunciation_coach::audio::Capturer;
use pronunciation_coach::config::AppConfig;
use pronunciation_coach::dictionary::CmuDict;
use pronunciation_coach::engine::PronunciationEngine;
use pronunciation_coach::session::{LiveMicrophone, PracticeSession, SessionOptions};
use pronunciation_coach::stt::Recognizer;

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn wait_for_shutdown(shutdown: Arc<AtomicBool>) {
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("🛑 Received Ctrl+C, shutting down...");
        }
        _ = async {
            #[cfg(unix)]
            {
                match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                    Ok(mut sigterm) => { sigterm.recv().await; }
                    Err(e) => {
                        error!("Failed to register SIGTERM handler: {}", e);
                        std::future::pending::<()>().await;
                    }
                }
            }
            #[cfg(not(unix))]
            {
                std::future::pending::<()>().await;
            }
        } => {
            info!("🛑 Received SIGTERM, shutting down...");
        }
    }

    shutdown.store(true, Ordering::SeqCst);
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_args();

    // Respect RUST_LOG env var, fallback to verbose flag. Logs go to stderr so
    // --json output on stdout stays parseable.
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| if config.verbose { EnvFilter::try_new("debug") } else { EnvFilter::try_new("info") })
        .context("Invalid log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_timer(LocalTime::new(time::macros::format_description!("[hour]:[minute]:[second]")))
        .init();

    info!("🎤 Pronunciation Coach v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = config.validate() {
        error!("❌ Configuration error: {}", e);
        if config.needs_audio() {
            error!("Point --model-dir at the Whisper and Silero VAD models, or pass --attempt to score typed text.");
        }
        std::process::exit(1);
    }
    config.log_config();

    let dictionary = CmuDict::load(&config.dictionary).context("Failed to load pronouncing dictionary")?;

    let engine = PronunciationEngine::new(Arc::new(dictionary));
    let mut session = PracticeSession::new(engine, SessionOptions::from(&config));

    // Typed attempt: score once and exit
    if let Some(attempt) = &config.attempt {
        let word = session.next_word();
        session.present(1, &word)?;
        session.score_attempt(&word, std::slice::from_ref(attempt))?;
        return Ok(());
    }

    let (recognizer, mut segment_rx) = Recognizer::new(&config)?;
    let recognizer = Arc::new(recognizer);

    // VAD sends completed attempts through the segment channel
    let recognizer_for_audio = recognizer.clone();
    let capturer = Capturer::new(config.sample_rate, move |samples: &[f32]| {
        recognizer_for_audio.vad_accept_waveform(samples);
    })?;
    let mut microphone = LiveMicrophone::new(capturer, recognizer.clone());

    let shutdown = Arc::new(AtomicBool::new(false));
    tokio::spawn(wait_for_shutdown(shutdown.clone()));

    info!("✅ Ready. Press Ctrl+C to stop.");

    let result = session.run(&microphone, recognizer, &mut segment_rx, &shutdown).await;
    microphone.shutdown();
    session.summarize()?;

    result
}
