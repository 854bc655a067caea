//! Microphone input
//!
//! Samples are always stored as 16 kHz mono. Devices that only offer stereo
//! at that rate are opened in stereo and averaged down as they arrive.

use std::sync::{Arc, Mutex};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleRate, Stream, StreamConfig, SupportedStreamConfigRange};

use crate::{Error, Result};

/// Capture sample rate, the rate Whisper expects
pub const SAMPLE_RATE: u32 = 16000;

/// Channel layouts tried in order
const CHANNEL_PREFERENCE: [u16; 2] = [1, 2];

/// Records the default input device into a shared mono buffer
pub struct AudioCapture {
    device: Device,
    config: StreamConfig,
    buffer: Arc<Mutex<Vec<f32>>>,
    stream: Option<Stream>,
}

impl AudioCapture {
    /// Open the default input device
    ///
    /// # Errors
    ///
    /// Returns error if there is no input device, or it supports neither mono
    /// nor stereo at 16 kHz
    pub fn new() -> Result<Self> {
        let device = cpal::default_host()
            .default_input_device()
            .ok_or_else(|| Error::Audio("no input device available".to_string()))?;

        let ranges: Vec<SupportedStreamConfigRange> = device
            .supported_input_configs()
            .map_err(|e| Error::Audio(e.to_string()))?
            .collect();

        let config = pick_config(&ranges)
            .ok_or_else(|| {
                Error::Audio(format!(
                    "input device cannot record mono or stereo at {SAMPLE_RATE} Hz"
                ))
            })?
            .with_sample_rate(SampleRate(SAMPLE_RATE))
            .config();

        tracing::debug!(
            device = device.name().unwrap_or_default(),
            channels = config.channels,
            "microphone opened"
        );

        Ok(Self {
            device,
            config,
            buffer: Arc::new(Mutex::new(Vec::new())),
            stream: None,
        })
    }

    /// Start recording into an empty buffer
    ///
    /// # Errors
    ///
    /// Returns error if the input stream cannot be built or started
    pub fn start(&mut self) -> Result<()> {
        if self.stream.is_some() {
            return Ok(());
        }

        self.clear_buffer();
        let buffer = Arc::clone(&self.buffer);
        let channels = usize::from(self.config.channels);

        let stream = self
            .device
            .build_input_stream(
                &self.config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if let Ok(mut buf) = buffer.lock() {
                        push_mono(&mut buf, data, channels);
                    }
                },
                |err| tracing::error!(error = %err, "microphone stream error"),
                None,
            )
            .map_err(|e| Error::Audio(e.to_string()))?;

        stream.play().map_err(|e| Error::Audio(e.to_string()))?;
        self.stream = Some(stream);
        tracing::debug!("microphone recording");
        Ok(())
    }

    /// Stop recording; buffered samples are kept
    pub fn stop(&mut self) {
        if self.stream.take().is_some() {
            tracing::debug!("microphone stopped");
        }
    }

    /// Drain the samples recorded so far
    #[must_use]
    pub fn take_buffer(&self) -> Vec<f32> {
        self.buffer
            .lock()
            .map(|mut buf| std::mem::take(&mut *buf))
            .unwrap_or_default()
    }

    /// Discard buffered samples
    pub fn clear_buffer(&self) {
        if let Ok(mut buf) = self.buffer.lock() {
            buf.clear();
        }
    }
}

/// First supported range that records at 16 kHz, preferring fewer channels
fn pick_config(ranges: &[SupportedStreamConfigRange]) -> Option<SupportedStreamConfigRange> {
    let rate = SampleRate(SAMPLE_RATE);
    CHANNEL_PREFERENCE.iter().find_map(|&channels| {
        ranges
            .iter()
            .find(|r| {
                r.channels() == channels
                    && r.min_sample_rate() <= rate
                    && r.max_sample_rate() >= rate
            })
            .cloned()
    })
}

/// Append interleaved frames to `buf` as mono, averaging the channels
#[allow(clippy::cast_precision_loss)]
fn push_mono(buf: &mut Vec<f32>, data: &[f32], channels: usize) {
    if channels <= 1 {
        buf.extend_from_slice(data);
        return;
    }
    buf.extend(
        data.chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32),
    );
}

/// Encode mono samples as 16-bit PCM WAV
///
/// # Errors
///
/// Returns error if WAV encoding fails
pub fn samples_to_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let audio_err = |e: hound::Error| Error::Audio(e.to_string());
    let mut cursor = std::io::Cursor::new(Vec::new());
    let mut writer = hound::WavWriter::new(&mut cursor, spec).map_err(audio_err)?;

    for &sample in samples {
        #[allow(clippy::cast_possible_truncation)]
        let pcm = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
        writer.write_sample(pcm).map_err(audio_err)?;
    }
    writer.finalize().map_err(audio_err)?;

    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use cpal::{SampleFormat, SupportedBufferSize};

    use super::*;

    fn range(channels: u16, min: u32, max: u32) -> SupportedStreamConfigRange {
        SupportedStreamConfigRange::new(
            channels,
            SampleRate(min),
            SampleRate(max),
            SupportedBufferSize::Unknown,
            SampleFormat::F32,
        )
    }

    #[test]
    fn test_prefers_mono() {
        let ranges = [range(2, 8000, 48000), range(1, 8000, 48000)];
        assert_eq!(pick_config(&ranges).map(|r| r.channels()), Some(1));
    }

    #[test]
    fn test_falls_back_to_stereo() {
        let ranges = [range(1, 44100, 48000), range(2, 8000, 48000)];
        assert_eq!(pick_config(&ranges).map(|r| r.channels()), Some(2));
    }

    #[test]
    fn test_no_usable_config() {
        let ranges = [range(1, 44100, 48000), range(6, 8000, 48000)];
        assert!(pick_config(&ranges).is_none());
    }

    #[test]
    fn test_push_mono_averages_frames() {
        let mut buf = vec![0.25];
        push_mono(&mut buf, &[0.5, 0.1, -0.2, 0.2], 2);
        assert_eq!(buf.len(), 3);
        assert!((buf[1] - 0.3).abs() < 1e-6);
        assert!(buf[2].abs() < 1e-6);

        push_mono(&mut buf, &[0.9], 1);
        assert_eq!(buf.len(), 4);
    }

    #[test]
    fn test_samples_to_wav_header_and_length() {
        let samples = vec![0.0f32, 0.5, -0.5, 1.0];
        let wav = samples_to_wav(&samples, SAMPLE_RATE).unwrap();

        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        // 44-byte header + 2 bytes per sample
        assert_eq!(wav.len(), 44 + samples.len() * 2);
    }

    #[test]
    fn test_samples_to_wav_clamps() {
        let wav = samples_to_wav(&[2.0, -2.0], SAMPLE_RATE).unwrap();
        let mut reader = hound::WavReader::new(std::io::Cursor::new(wav)).unwrap();
        let decoded: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(decoded, vec![32767, -32768]);
    }
}
