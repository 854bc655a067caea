//! Output sink that speaks through `OpenAI` TTS and the default speaker

use async_trait::async_trait;
use secrecy::SecretString;

use super::{AudioPlayback, SpeechSynthesizer};
use crate::config::VoiceConfig;
use crate::output::OutputSink;
use crate::Result;

/// Speaks responses aloud, echoing them to the terminal
///
/// If synthesis or playback fails the text has still been printed, so the
/// user never loses a response.
pub struct VoiceOutput {
    synthesizer: SpeechSynthesizer,
    playback: AudioPlayback,
}

impl VoiceOutput {
    /// Open the speaker and prepare the synthesizer
    ///
    /// # Errors
    ///
    /// Returns error if the output device cannot be opened or the API key is
    /// unusable
    pub fn new(api_key: &SecretString, voice: &VoiceConfig) -> Result<Self> {
        Ok(Self {
            synthesizer: SpeechSynthesizer::new(api_key, voice)?,
            playback: AudioPlayback::new()?,
        })
    }

    async fn say(&self, text: &str) -> Result<()> {
        let mp3 = self.synthesizer.synthesize(text).await?;
        self.playback.play_mp3(&mp3)
    }
}

#[async_trait(?Send)]
impl OutputSink for VoiceOutput {
    async fn speak(&self, text: &str) {
        println!("Herald: {text}");
        tracing::debug!(text, "speaking");

        if let Err(e) = self.say(text).await {
            tracing::error!(error = %e, "failed to speak response");
        }
    }
}
