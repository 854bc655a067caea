//! Utterance endpointing
//!
//! Decides from audio energy alone when a phrase starts and ends. The speech
//! threshold comes from a short ambient-noise calibration taken right before
//! listening.

use std::time::Duration;

use crate::config::ListenConfig;

use super::SAMPLE_RATE;

/// Lowest speech threshold, whatever the calibration says
const ENERGY_FLOOR: f32 = 0.02;

/// Speech must be this much louder than the ambient level
const AMBIENT_MULTIPLIER: f32 = 1.5;

/// Bursts shorter than this are treated as noise (0.3 seconds)
const MIN_SPEECH_SAMPLES: usize = 4800;

/// Result of feeding audio to the detector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Keep feeding audio
    Pending,
    /// A phrase is complete; take it with [`UtteranceDetector::take_utterance`]
    Complete,
    /// Nobody started speaking before the start timeout
    NoSpeech,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Waiting,
    Speaking,
}

/// Energy-based phrase detector
pub struct UtteranceDetector {
    threshold: f32,
    phase: Phase,
    utterance: Vec<f32>,
    waited: usize,
    silence: usize,
    start_timeout: usize,
    phrase_limit: usize,
    pause: usize,
}

impl UtteranceDetector {
    /// Create a detector with a calibrated `threshold` and the given limits
    #[must_use]
    pub fn new(threshold: f32, limits: &ListenConfig) -> Self {
        tracing::debug!(threshold, ?limits, "utterance detector initialized");

        Self {
            threshold,
            phase: Phase::Waiting,
            utterance: Vec::new(),
            waited: 0,
            silence: 0,
            start_timeout: samples_for(limits.start_timeout),
            phrase_limit: samples_for(limits.phrase_limit),
            pause: samples_for(limits.pause),
        }
    }

    /// Feed the next chunk of audio
    pub fn process(&mut self, samples: &[f32]) -> Endpoint {
        let energy = calculate_rms(samples);
        let is_speech = energy > self.threshold;

        match self.phase {
            Phase::Waiting => {
                if is_speech {
                    self.phase = Phase::Speaking;
                    self.utterance.clear();
                    self.utterance.extend_from_slice(samples);
                    self.silence = 0;
                    tracing::trace!(energy, "speech started");
                } else {
                    self.waited += samples.len();
                    if self.waited >= self.start_timeout {
                        tracing::debug!(waited = self.waited, "no speech before start timeout");
                        return Endpoint::NoSpeech;
                    }
                }
            }
            Phase::Speaking => {
                self.utterance.extend_from_slice(samples);

                if is_speech {
                    self.silence = 0;
                } else {
                    self.silence += samples.len();
                }

                tracing::trace!(
                    utterance = self.utterance.len(),
                    silence = self.silence,
                    energy,
                    "speaking"
                );

                if self.utterance.len() >= self.phrase_limit {
                    tracing::debug!(samples = self.utterance.len(), "phrase limit reached");
                    self.utterance.truncate(self.phrase_limit);
                    return Endpoint::Complete;
                }

                if self.silence >= self.pause {
                    let voiced = self.utterance.len().saturating_sub(self.silence);
                    if voiced >= MIN_SPEECH_SAMPLES {
                        tracing::debug!(samples = self.utterance.len(), "phrase complete");
                        return Endpoint::Complete;
                    }

                    // Too short to be speech; keep waiting
                    tracing::trace!(voiced, "discarding noise burst");
                    self.waited += self.utterance.len();
                    self.phase = Phase::Waiting;
                    self.utterance.clear();
                    self.silence = 0;
                    if self.waited >= self.start_timeout {
                        return Endpoint::NoSpeech;
                    }
                }
            }
        }

        Endpoint::Pending
    }

    /// Take the captured phrase, resetting the detector
    pub fn take_utterance(&mut self) -> Vec<f32> {
        self.phase = Phase::Waiting;
        self.waited = 0;
        self.silence = 0;
        std::mem::take(&mut self.utterance)
    }

    /// Whether speech has started
    #[must_use]
    pub fn is_speaking(&self) -> bool {
        self.phase == Phase::Speaking
    }
}

/// Speech threshold for a calibration recording of ambient noise
#[must_use]
pub fn ambient_threshold(ambient: &[f32]) -> f32 {
    (calculate_rms(ambient) * AMBIENT_MULTIPLIER).max(ENERGY_FLOOR)
}

/// Calculate RMS energy of audio samples
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn calculate_rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum_squares: f32 = samples.iter().map(|s| s * s).sum();
    (sum_squares / samples.len() as f32).sqrt()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn samples_for(duration: Duration) -> usize {
    (duration.as_secs_f64() * f64::from(SAMPLE_RATE)) as usize
}
