//! Speech capture adapter: microphone + endpointing + Whisper

use std::time::{Duration, Instant};

use async_trait::async_trait;
use secrecy::SecretString;

use super::{
    AudioCapture, Endpoint, SAMPLE_RATE, UtteranceDetector, WhisperTranscriber, ambient_threshold,
    samples_to_wav,
};
use crate::config::{ListenConfig, VoiceConfig};
use crate::input::{CaptureOutcome, SpeechCapture};
use crate::Result;

/// How often the capture buffer is drained
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Slack on top of the configured limits before the stream counts as stalled
const STALL_MARGIN: Duration = Duration::from_secs(2);

/// Listens on the default microphone and transcribes one phrase per call
pub struct MicrophoneListener {
    capture: AudioCapture,
    transcriber: WhisperTranscriber,
    limits: ListenConfig,
}

impl MicrophoneListener {
    /// Open the microphone and prepare the transcriber
    ///
    /// # Errors
    ///
    /// Returns error if the input device cannot be opened or the API key is
    /// unusable
    pub fn new(api_key: &SecretString, voice: &VoiceConfig, limits: ListenConfig) -> Result<Self> {
        Ok(Self {
            capture: AudioCapture::new()?,
            transcriber: WhisperTranscriber::new(api_key, voice.stt_model.clone())?,
            limits,
        })
    }

    /// Record until a phrase completes, the start timeout passes, or the
    /// device stalls
    async fn record_phrase(&mut self) -> Result<Option<Vec<f32>>> {
        self.capture.start()?;

        println!("\nListening... (speak now)");

        tokio::time::sleep(self.limits.calibration).await;
        let threshold = ambient_threshold(&self.capture.take_buffer());
        let mut detector = UtteranceDetector::new(threshold, &self.limits);

        let deadline = Instant::now()
            + self.limits.start_timeout
            + self.limits.phrase_limit
            + STALL_MARGIN;

        loop {
            tokio::time::sleep(POLL_INTERVAL).await;

            match detector.process(&self.capture.take_buffer()) {
                Endpoint::Pending => {}
                Endpoint::Complete => return Ok(Some(detector.take_utterance())),
                Endpoint::NoSpeech => return Ok(None),
            }

            if Instant::now() >= deadline {
                return Err(crate::Error::Audio("audio input stalled".to_string()));
            }
        }
    }
}

#[async_trait(?Send)]
impl SpeechCapture for MicrophoneListener {
    async fn capture(&mut self) -> CaptureOutcome {
        let recorded = self.record_phrase().await;
        self.capture.stop();

        let samples = match recorded {
            Ok(Some(samples)) => samples,
            Ok(None) => return CaptureOutcome::Timeout,
            Err(e) => {
                tracing::error!(error = %e, "microphone capture failed");
                return CaptureOutcome::DeviceError(e.to_string());
            }
        };

        tracing::debug!(samples = samples.len(), "phrase captured");

        let transcript = match samples_to_wav(&samples, SAMPLE_RATE) {
            Ok(wav) => self.transcriber.transcribe(&wav).await,
            Err(e) => Err(e),
        };

        match transcript {
            Ok(text) if text.trim().is_empty() => CaptureOutcome::Unrecognized,
            Ok(text) => CaptureOutcome::Transcript(text),
            Err(e) => {
                tracing::error!(error = %e, "transcription failed");
                CaptureOutcome::DeviceError(e.to_string())
            }
        }
    }
}
