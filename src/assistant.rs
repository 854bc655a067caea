//! The interactive loop: greet, then resolve and dispatch until exit

use crate::config::Config;
use crate::dispatch::{Dispatcher, Flow, IntentTable};
use crate::handlers;
use crate::input::{ConsoleInput, InputResolver, SpeechCapture};
use crate::output::{ConsoleOutput, OutputSink};
use crate::services::Services;
use crate::voice::{MicrophoneListener, VoiceOutput};
use crate::{Error, Result};

/// A running assistant session
pub struct Assistant {
    io: InputResolver,
    dispatcher: Dispatcher,
}

impl Assistant {
    /// Assemble an assistant from already-built parts
    #[must_use]
    pub const fn new(io: InputResolver, dispatcher: Dispatcher) -> Self {
        Self { io, dispatcher }
    }

    /// Build the real assistant from configuration
    ///
    /// # Errors
    ///
    /// Returns error if voice is enabled without an `OpenAI` key, if the
    /// audio devices cannot be opened, or if a capability adapter cannot be
    /// built
    pub fn from_config(config: &Config) -> Result<Self> {
        let services = Services::from_config(config)?;
        let dispatcher = Dispatcher::new(IntentTable::standard(), services);

        let io = if config.voice.enabled {
            let api_key = config.api_keys.openai.as_ref().ok_or_else(|| {
                Error::Config(
                    "OPENAI_API_KEY required for voice mode (use --text-only to run without it)"
                        .to_string(),
                )
            })?;

            let capture: Box<dyn SpeechCapture> =
                Box::new(MicrophoneListener::new(api_key, &config.voice, config.listen)?);
            let output: Box<dyn OutputSink> = Box::new(VoiceOutput::new(api_key, &config.voice)?);
            InputResolver::new(Some(capture), Box::new(ConsoleInput), output)
        } else {
            InputResolver::new(None, Box::new(ConsoleInput), Box::new(ConsoleOutput))
        };

        tracing::info!(text_only = io.is_text_only(), "assistant ready");
        Ok(Self::new(io, dispatcher))
    }

    /// Speak the time-of-day greeting
    pub async fn greet(&self) {
        handlers::greet(&self.io, self.dispatcher.services().clock.as_ref()).await;
    }

    /// Resolve one command and dispatch it
    pub async fn step(&mut self) -> Flow {
        let command = self.io.resolve_input().await;
        self.dispatcher.dispatch(&command, &mut self.io).await
    }

    /// Greet, then loop until the exit intent
    pub async fn run(mut self) {
        self.greet().await;
        while self.step().await == Flow::Continue {}
        tracing::info!("exit requested, shutting down");
    }
}
