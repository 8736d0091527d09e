//! Application configuration and CLI argument parsing.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::words::Difficulty;

/// Hardware acceleration provider for ONNX models.
/// Auto-detected based on platform if not specified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// CPU inference (default fallback, always available)
    #[default]
    Cpu,
    /// NVIDIA CUDA acceleration (Linux only, requires CUDA toolkit)
    Cuda,
    /// Apple CoreML acceleration (macOS only, uses Neural Engine)
    #[value(name = "coreml")]
    CoreMl,
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_sherpa_provider())
    }
}

impl Provider {
    /// Convert to sherpa-rs provider string.
    pub fn as_sherpa_provider(&self) -> &'static str {
        match self {
            Provider::Cpu => "cpu",
            Provider::Cuda => "cuda",
            Provider::CoreMl => "coreml",
        }
    }
}

/// Pronunciation coach configuration.
#[derive(Parser, Debug, Clone, Serialize, Deserialize)]
#[command(name = "pronunciation-coach")]
#[command(author, version, about = "Practice word pronunciation with syllable-level feedback", long_about = None)]
pub struct AppConfig {
    /// CMU pronouncing dictionary file (cmudict-0.7b, cmudict.dict or NLTK format)
    #[arg(long, short = 'D', env = "PRONUNCIATION_DICT", default_value_os_t = default_data_dir().join("cmudict.dict"))]
    pub dictionary: PathBuf,

    /// Directory containing model files (Whisper, VAD)
    #[arg(long, short = 'd', env = "MODEL_DIR", default_value_os_t = default_data_dir().join("models"))]
    pub model_dir: PathBuf,

    /// Difficulty tier: basic, intermediate or advanced (unknown tiers fall back to basic)
    #[arg(long)]
    pub difficulty: Option<String>,

    /// Practice this word instead of picking one from the catalog
    #[arg(long, short = 'w')]
    pub word: Option<String>,

    /// Score this text as the spoken attempt and exit (no microphone needed)
    #[arg(long, short = 'a')]
    pub attempt: Option<String>,

    /// Number of words to practice (0 = until Ctrl+C)
    #[arg(long, short = 'n', default_value = "5")]
    pub rounds: usize,

    /// Seconds to wait for an attempt before moving on
    #[arg(long, default_value = "8")]
    pub attempt_timeout: u64,

    /// Number of attempts kept in the practice history
    #[arg(long, default_value = "10")]
    pub history_size: usize,

    /// Print prompts and reports as JSON lines
    #[arg(long)]
    pub json: bool,

    /// Audio sample rate for speech recognition
    #[arg(long, default_value = "16000")]
    pub sample_rate: u32,

    /// Voice activity detection threshold (0.0 - 1.0)
    #[arg(long, default_value = "0.5")]
    pub vad_threshold: f32,

    /// VAD silence duration in seconds (single words need only a short pause)
    #[arg(long, default_value = "0.5")]
    pub vad_silence_duration: f32,

    /// Hardware acceleration provider (auto-detected if not specified)
    #[arg(long, value_enum)]
    pub provider: Option<Provider>,

    /// Number of recognizer threads (0 = auto-detect based on CPU cores)
    #[arg(long, default_value = "0")]
    pub num_threads: usize,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

impl AppConfig {
    /// Parse configuration from command line arguments.
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Resolved difficulty tier.
    pub fn difficulty(&self) -> Difficulty {
        Difficulty::resolve(self.difficulty.as_deref())
    }

    /// Whether a microphone session is needed.
    pub fn needs_audio(&self) -> bool {
        self.attempt.is_none()
    }

    /// Get the effective acceleration provider.
    pub fn effective_provider(&self) -> Provider {
        self.provider.unwrap_or_else(detect_provider)
    }

    /// Thread count for Whisper.
    ///
    /// With CUDA the GPU handles parallelism, so a single thread avoids contention.
    /// On CPU, a third of the cores leaves headroom for audio capture.
    pub fn recognizer_threads(&self) -> usize {
        if self.num_threads > 0 {
            self.num_threads
        } else if self.effective_provider() == Provider::Cuda {
            1
        } else {
            (num_cpus::get() / 3).max(1)
        }
    }

    /// Get the path to the Whisper encoder model.
    pub fn whisper_encoder_path(&self) -> PathBuf {
        self.model_dir.join("whisper").join("whisper-small-encoder.int8.onnx")
    }

    /// Get the path to the Whisper decoder model.
    pub fn whisper_decoder_path(&self) -> PathBuf {
        self.model_dir.join("whisper").join("whisper-small-decoder.int8.onnx")
    }

    /// Get the path to the Whisper tokens file.
    pub fn whisper_tokens_path(&self) -> PathBuf {
        self.model_dir.join("whisper").join("whisper-small-tokens.txt")
    }

    /// Get the path to the VAD model.
    pub fn vad_model_path(&self) -> PathBuf {
        self.model_dir.join("silero_vad.onnx")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.dictionary.exists() {
            anyhow::bail!("Pronouncing dictionary not found: {}", self.dictionary.display());
        }

        if let Some(ref attempt) = self.attempt
            && attempt.trim().is_empty()
        {
            anyhow::bail!("Attempt text must not be empty");
        }

        if self.needs_audio() {
            if !self.model_dir.exists() {
                anyhow::bail!("Model directory does not exist: {}", self.model_dir.display());
            }

            let required_files = [self.whisper_encoder_path(), self.whisper_decoder_path(), self.whisper_tokens_path(), self.vad_model_path()];
            for path in &required_files {
                if !path.exists() {
                    anyhow::bail!("Required model file not found: {}", path.display());
                }
            }
        }

        if !(0.0..=1.0).contains(&self.vad_threshold) {
            anyhow::bail!("VAD threshold must be between 0.0 and 1.0");
        }

        if self.sample_rate == 0 {
            anyhow::bail!("Sample rate must be positive");
        }

        if self.attempt_timeout == 0 {
            anyhow::bail!("Attempt timeout must be at least one second");
        }

        Ok(())
    }

    /// Log the current configuration.
    pub fn log_config(&self) {
        info!("Configuration:");
        info!("  Dictionary: {}", self.dictionary.display());
        info!("  Difficulty: {}", self.difficulty());
        if let Some(ref word) = self.word {
            info!("  Fixed word: {}", word);
        }
        if self.needs_audio() {
            info!("  Model directory: {}", self.model_dir.display());
            info!("  Sample rate: {} Hz", self.sample_rate);
            info!("  VAD threshold: {}", self.vad_threshold);
            info!("  Provider: {} ({} threads)", self.effective_provider(), self.recognizer_threads());
            info!("  Attempt timeout: {}s", self.attempt_timeout);
            if self.rounds == 0 {
                info!("  Rounds: unlimited");
            } else {
                info!("  Rounds: {}", self.rounds);
            }
        }
    }
}

/// Get the default data directory (~/.pronunciation-coach).
fn default_data_dir() -> PathBuf {
    if let Some(home_dir) = dirs::home_dir() {
        home_dir.join(".pronunciation-coach")
    } else {
        PathBuf::from(".")
    }
}

/// Auto-detect the best hardware acceleration provider.
fn detect_provider() -> Provider {
    #[cfg(target_os = "macos")]
    {
        info!("Detected macOS, using CoreML provider");
        Provider::CoreMl
    }

    #[cfg(target_os = "linux")]
    {
        if has_nvidia_gpu() {
            info!("Detected NVIDIA GPU, using CUDA provider");
            Provider::Cuda
        } else {
            info!("No GPU detected, using CPU provider");
            Provider::Cpu
        }
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux")))]
    {
        info!("Using CPU provider");
        Provider::Cpu
    }
}

/// Check if an NVIDIA GPU is available (Linux only).
#[cfg(target_os = "linux")]
fn has_nvidia_gpu() -> bool {
    use std::path::Path;

    let nvidia_paths = ["/dev/nvidia0", "/dev/nvidiactl", "/dev/nvhost-ctrl-gpu", "/etc/nv_tegra_release"];
    nvidia_paths.iter().any(|path| Path::new(path).exists())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::try_parse_from(["pronunciation-coach"]).unwrap();
        assert_eq!(config.rounds, 5);
        assert_eq!(config.attempt_timeout, 8);
        assert_eq!(config.history_size, 10);
        assert_eq!(config.difficulty(), Difficulty::Basic);
        assert!(config.needs_audio());
        assert!(config.dictionary.ends_with("cmudict.dict"));
    }

    #[test]
    fn test_unknown_difficulty_falls_back() {
        let config = AppConfig::try_parse_from(["pronunciation-coach", "--difficulty", "expert"]).unwrap();
        assert_eq!(config.difficulty(), Difficulty::Basic);

        let config = AppConfig::try_parse_from(["pronunciation-coach", "--difficulty", "advanced"]).unwrap();
        assert_eq!(config.difficulty(), Difficulty::Advanced);
    }

    #[test]
    fn test_attempt_mode_skips_model_checks() {
        let dictionary = tempfile::NamedTempFile::new().unwrap();
        let config = AppConfig::try_parse_from([
            "pronunciation-coach",
            "--dictionary",
            dictionary.path().to_str().unwrap(),
            "--model-dir",
            "/nonexistent/models",
            "--word",
            "cat",
            "--attempt",
            "cat",
        ])
        .unwrap();
        assert!(!config.needs_audio());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let dictionary = tempfile::NamedTempFile::new().unwrap();
        let path = dictionary.path().to_str().unwrap();

        let config = AppConfig::try_parse_from(["pronunciation-coach", "-D", path, "-a", "cat", "--vad-threshold", "1.5"]).unwrap();
        assert!(config.validate().is_err());

        let config = AppConfig::try_parse_from(["pronunciation-coach", "-D", path, "-a", "   "]).unwrap();
        assert!(config.validate().is_err());

        let config = AppConfig::try_parse_from(["pronunciation-coach", "-D", "/nonexistent/cmudict.dict", "-a", "cat"]).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_explicit_threads_win() {
        let config = AppConfig::try_parse_from(["pronunciation-coach", "--num-threads", "3", "--provider", "cpu"]).unwrap();
        assert_eq!(config.recognizer_threads(), 3);
        assert_eq!(config.effective_provider(), Provider::Cpu);
    }
}
