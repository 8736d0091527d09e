//! Streaming resampler for microphone input, built on rubato's FFT resampler.

use anyhow::{Context, Result};
use audioadapter_buffers::direct::InterleavedSlice;
use rubato::{Fft, FixedSync, Resampler};
use tracing::warn;

/// Requested input frames per resampling pass (rubato may round it to fit the ratio).
const CHUNK_SIZE: usize = 1024;

/// Number of sub-chunks for FFT processing (higher = better quality but more CPU).
const SUB_CHUNKS: usize = 2;

/// Resampler state carried across audio callbacks.
///
/// Callback buffers arrive in arbitrary sizes, so input is accumulated until a full
/// chunk is available.
pub struct StreamResampler {
    resampler: Fft<f32>,
    pending: Vec<f32>,
    output: Vec<f32>,
}

impl StreamResampler {
    /// Create a mono resampler from `from_rate` to `to_rate`.
    ///
    /// # Errors
    /// Returns an error if rubato rejects the rate pair.
    pub fn new(from_rate: u32, to_rate: u32) -> Result<Self> {
        let resampler = Fft::<f32>::new(from_rate as usize, to_rate as usize, CHUNK_SIZE, SUB_CHUNKS, 1, FixedSync::Input).context("Failed to create resampler")?;
        let output = vec![0.0f32; resampler.output_frames_max()];

        Ok(Self { resampler, pending: Vec::with_capacity(CHUNK_SIZE * 2), output })
    }

    /// Append samples and resample every complete chunk.
    ///
    /// Returns the resampled audio, empty while less than a chunk is buffered.
    pub fn process(&mut self, samples: &[f32]) -> Vec<f32> {
        self.pending.extend_from_slice(samples);

        let mut resampled = Vec::new();
        loop {
            let needed = self.resampler.input_frames_next();
            if self.pending.len() < needed {
                break;
            }
            let chunk: Vec<f32> = self.pending.drain(..needed).collect();
            match self.process_chunk(&chunk) {
                Ok(frames) => resampled.extend_from_slice(&self.output[..frames]),
                Err(e) => warn!("Resampling failed, dropping chunk: {}", e),
            }
        }
        resampled
    }

    fn process_chunk(&mut self, chunk: &[f32]) -> Result<usize> {
        let output_frames_max = self.output.len();
        let input = InterleavedSlice::new(chunk, 1, chunk.len()).context("Failed to create input adapter")?;
        let mut output = InterleavedSlice::new_mut(&mut self.output, 1, output_frames_max).context("Failed to create output adapter")?;
        let (_, frames_written) = self.resampler.process_into_buffer(&input, &mut output, None).context("Resampling error")?;
        Ok(frames_written)
    }
}
