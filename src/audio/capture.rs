//! Microphone capture using cpal.
//!
//! The realtime callback only down-mixes, resamples and pushes into a lock-free ring
//! buffer. A dispatch thread pops from the ring and hands samples to the consumer, so
//! VAD work never runs on the audio thread.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

use anyhow::{Context, Result};
use cpal::Stream;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use ringbuf::HeapRb;
use ringbuf::traits::{Consumer, Observer, Producer, Split};
use tracing::{debug, error, info, warn};

use super::resampler::StreamResampler;
use super::util::{device_name, downmix_to_mono, find_input_config};

/// Ring buffer capacity in samples (~4 seconds at 16kHz).
const RING_CAPACITY: usize = 65536;

/// Samples handed to the consumer per dispatch.
const DISPATCH_CHUNK: usize = 2048;

/// Microphone capturer feeding a callback with mono samples at the requested rate.
pub struct Capturer {
    stream: Stream,
    running: Arc<AtomicBool>,
    shutdown: Arc<AtomicBool>,
    dispatch_handle: Option<JoinHandle<()>>,
}

impl Capturer {
    /// Open the default input device.
    ///
    /// Capture starts paused; call [`Capturer::resume`] when an attempt is expected.
    ///
    /// # Errors
    /// Returns an error if no input device is available or the stream cannot be built.
    pub fn new<F>(sample_rate: u32, callback: F) -> Result<Self>
    where
        F: Fn(&[f32]) + Send + 'static,
    {
        let host = cpal::default_host();
        let device = host.default_input_device().context("No input device available")?;

        info!("Using input device: {}", device_name(&device));

        let supported_configs = device.supported_input_configs().context("Failed to get supported input configs")?;
        let config = find_input_config(supported_configs, sample_rate)?;
        let device_sample_rate = config.sample_rate();
        let channels = config.channels() as usize;

        let mut resampler = if device_sample_rate != sample_rate {
            info!("Device sample rate {} Hz differs from target {} Hz - resampling will be applied", device_sample_rate, sample_rate);
            Some(StreamResampler::new(device_sample_rate, sample_rate)?)
        } else {
            None
        };

        let running = Arc::new(AtomicBool::new(false));
        let shutdown = Arc::new(AtomicBool::new(false));

        let (mut producer, mut consumer) = HeapRb::<f32>::new(RING_CAPACITY).split();
        let dropped = AtomicU64::new(0);
        let callback_running = running.clone();

        let stream = device.build_input_stream(
            &config.config(),
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                if !callback_running.load(Ordering::Relaxed) {
                    return;
                }

                let mono = downmix_to_mono(data, channels);
                let samples = match resampler.as_mut() {
                    Some(resampler) => resampler.process(&mono),
                    None => mono,
                };

                if producer.push_slice(&samples) < samples.len() {
                    let count = dropped.fetch_add(1, Ordering::Relaxed);
                    if count.is_multiple_of(100) {
                        warn!("Ring buffer full, dropped {} audio chunks", count + 1);
                    }
                }
            },
            |err| error!("Audio capture error: {}", err),
            None,
        )?;

        let dispatch_running = running.clone();
        let dispatch_shutdown = shutdown.clone();
        let dispatch_handle = std::thread::spawn(move || {
            let mut buffer = vec![0.0f32; DISPATCH_CHUNK];
            while !dispatch_shutdown.load(Ordering::Relaxed) {
                if !dispatch_running.load(Ordering::Relaxed) {
                    // Drop whatever arrived before the pause took effect
                    consumer.clear();
                    std::thread::sleep(Duration::from_millis(10));
                    continue;
                }

                if consumer.is_empty() {
                    std::thread::sleep(Duration::from_micros(200));
                    continue;
                }

                let read = consumer.pop_slice(&mut buffer);
                callback(&buffer[..read]);
            }
            debug!("Audio dispatch thread exiting");
        });

        info!("Audio capture configured: device {} Hz, {} channel(s) -> {} Hz mono", device_sample_rate, channels, sample_rate);

        Ok(Self { stream, running, shutdown, dispatch_handle: Some(dispatch_handle) })
    }

    /// Start (or continue) delivering microphone audio.
    pub fn resume(&self) -> Result<()> {
        self.stream.play().context("Failed to start audio stream")?;
        self.running.store(true, Ordering::SeqCst);
        debug!("Microphone listening");
        Ok(())
    }

    /// Stop delivering audio while an attempt is being scored.
    pub fn pause(&self) {
        self.running.store(false, Ordering::SeqCst);
        if let Err(e) = self.stream.pause() {
            warn!("Failed to pause audio stream: {}", e);
        }
        debug!("Microphone paused");
    }

    /// Permanently stop capture and join the dispatch thread.
    pub fn shutdown(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        self.running.store(false, Ordering::SeqCst);
        let _ = self.stream.pause();

        if let Some(handle) = self.dispatch_handle.take()
            && let Err(e) = handle.join()
        {
            warn!("Failed to join audio dispatch thread: {:?}", e);
        }

        info!("Audio capture stopped");
    }
}

impl Drop for Capturer {
    fn drop(&mut self) {
        if self.dispatch_handle.is_some() {
            self.shutdown();
        }
    }
}
