//! Device helpers for audio capture.

use anyhow::Result;
use cpal::traits::DeviceTrait;
use cpal::{Device, SampleFormat, SupportedStreamConfig, SupportedStreamConfigRange};

/// Human-readable device name, or "Unknown".
pub fn device_name(device: &Device) -> String {
    device.description().ok().map(|desc| desc.name().to_string()).unwrap_or_else(|| "Unknown".to_string())
}

/// Pick an input configuration for the recognizer.
///
/// Only mono or stereo F32 configurations qualify. The first one covering
/// `target_sample_rate` wins; otherwise the first candidate is clamped to the rate
/// closest to the target and the caller resamples.
///
/// # Errors
/// Returns an error if the device offers no mono/stereo F32 configuration.
pub fn find_input_config(configs: impl Iterator<Item = SupportedStreamConfigRange>, target_sample_rate: u32) -> Result<SupportedStreamConfig> {
    let candidates: Vec<SupportedStreamConfigRange> = configs.filter(|c| c.channels() <= 2 && c.sample_format() == SampleFormat::F32).collect();

    if let Some(exact) = candidates.iter().find(|c| (c.min_sample_rate()..=c.max_sample_rate()).contains(&target_sample_rate)) {
        return Ok(exact.with_sample_rate(target_sample_rate));
    }

    let Some(fallback) = candidates.first() else {
        anyhow::bail!("No mono or stereo F32 input configuration available");
    };

    let rate = target_sample_rate.clamp(fallback.min_sample_rate(), fallback.max_sample_rate());
    Ok(fallback.with_sample_rate(rate))
}

/// Average interleaved frames down to one channel.
pub fn downmix_to_mono(data: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return data.to_vec();
    }
    data.chunks(channels).map(|frame| frame.iter().sum::<f32>() / channels as f32).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stereo_downmix() {
        let data = vec![0.5f32, 1.0, -0.5, -1.0];
        let result = downmix_to_mono(&data, 2);
        assert_eq!(result, vec![0.75, -0.75]);
    }

    #[test]
    fn test_mono_passthrough() {
        let data = vec![0.1f32, 0.2, 0.3];
        assert_eq!(downmix_to_mono(&data, 1), data);
    }
}
