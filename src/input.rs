//! Input acquisition: speech capture with a typed-input fallback

use std::fmt;

use async_trait::async_trait;
use dialoguer::Input;

use crate::output::OutputSink;

/// A normalized (trimmed, lower-cased) user command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Command(String);

impl Command {
    /// Normalize raw transcript or typed text into a command
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    /// The normalized text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for empty or whitespace-only input
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Substring test against the normalized text
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.0.contains(needle)
    }

    /// Text following the first occurrence of `trigger`, trimmed
    ///
    /// Returns `None` when the trigger is absent or nothing follows it.
    #[must_use]
    pub fn after(&self, trigger: &str) -> Option<&str> {
        let (_, rest) = self.0.split_once(trigger)?;
        let rest = rest.trim();
        (!rest.is_empty()).then_some(rest)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of one attempt to capture a spoken utterance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// Recognized speech, not yet normalized
    Transcript(String),
    /// No speech started before the start timeout
    Timeout,
    /// Speech was heard but could not be recognized
    Unrecognized,
    /// The audio device or recognition service failed
    DeviceError(String),
}

impl CaptureOutcome {
    /// Spoken apology for a failed capture, `None` on success
    #[must_use]
    pub const fn apology(&self) -> Option<&'static str> {
        match self {
            Self::Transcript(_) => None,
            Self::Timeout => Some("I didn't hear you. Please type your command instead."),
            Self::Unrecognized => Some("I didn't understand. Please type your command."),
            Self::DeviceError(_) => Some("There was a technical issue. Please type your command."),
        }
    }
}

/// Source of spoken utterances
///
/// Implementations must never block indefinitely and never fail outward:
/// every failure is reported as a [`CaptureOutcome`] variant.
#[async_trait(?Send)]
pub trait SpeechCapture {
    /// Listen for one utterance
    async fn capture(&mut self) -> CaptureOutcome;
}

/// Source of typed text, used when speech capture fails
pub trait TypedInput {
    /// Prompt for one line of text
    ///
    /// Returns `None` if input is closed or cannot be read.
    fn read_line(&self, prompt: &str) -> Option<String>;
}

/// Typed input from the terminal
#[derive(Debug, Default)]
pub struct ConsoleInput;

impl TypedInput for ConsoleInput {
    fn read_line(&self, prompt: &str) -> Option<String> {
        match Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
        {
            Ok(line) => Some(line),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read typed input");
                None
            }
        }
    }
}

const TYPED_PROMPT: &str = "Type your command here";

/// Produces one [`Command`] per call, from voice when possible and from the
/// keyboard otherwise
///
/// Also owns the output sink, so apologies and handler prompts go through the
/// same voice the user is listening to.
pub struct InputResolver {
    capture: Option<Box<dyn SpeechCapture>>,
    keyboard: Box<dyn TypedInput>,
    output: Box<dyn OutputSink>,
}

impl InputResolver {
    /// Create a resolver
    ///
    /// With `capture` set to `None` every command is read from the keyboard.
    #[must_use]
    pub fn new(
        capture: Option<Box<dyn SpeechCapture>>,
        keyboard: Box<dyn TypedInput>,
        output: Box<dyn OutputSink>,
    ) -> Self {
        Self {
            capture,
            keyboard,
            output,
        }
    }

    /// Acquire the next command
    ///
    /// Never fails: capture failures are apologized for out loud and replaced
    /// by typed input. A closed keyboard yields an empty command.
    pub async fn resolve_input(&mut self) -> Command {
        self.resolve(TYPED_PROMPT).await
    }

    /// Speak a prompt, then acquire the answer
    ///
    /// A typed fallback repeats `prompt` so the user knows which answer is
    /// being asked for.
    pub async fn ask(&mut self, prompt: &str) -> Command {
        self.output.speak(prompt).await;
        self.resolve(prompt).await
    }

    async fn resolve(&mut self, typed_prompt: &str) -> Command {
        let Some(capture) = self.capture.as_mut() else {
            return self.read_typed(typed_prompt);
        };

        let outcome = capture.capture().await;
        match outcome {
            CaptureOutcome::Transcript(text) => {
                tracing::info!(transcript = %text, "detected speech");
                Command::new(&text)
            }
            failure => {
                match &failure {
                    CaptureOutcome::DeviceError(detail) => {
                        tracing::warn!(detail, "speech capture failed");
                    }
                    other => tracing::info!(outcome = ?other, "no usable speech"),
                }
                if let Some(apology) = failure.apology() {
                    self.output.speak(apology).await;
                }
                self.read_typed(typed_prompt)
            }
        }
    }

    /// Speak through the output sink
    pub async fn speak(&self, text: &str) {
        self.output.speak(text).await;
    }

    /// True when commands are read from the keyboard only
    #[must_use]
    pub const fn is_text_only(&self) -> bool {
        self.capture.is_none()
    }

    fn read_typed(&self, prompt: &str) -> Command {
        self.keyboard
            .read_line(prompt)
            .map_or_else(Command::default, |line| Command::new(&line))
    }
}
