//! Herald - voice-driven command dispatcher
//!
//! Herald listens for a spoken command (falling back to typed input when
//! speech capture fails), matches it against a fixed, ordered table of intents
//! and runs the bound handler, which may call one external service and always
//! answers out loud.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                    Assistant loop                     │
//! │        greet → resolve input → dispatch → repeat      │
//! └───────────────┬───────────────────────┬──────────────┘
//!                 │                       │
//! ┌───────────────▼──────────┐ ┌──────────▼──────────────┐
//! │      Input Resolver      │ │    Intent Dispatcher     │
//! │ mic capture │ typed input│ │ rule table │ handlers    │
//! │        output sink       │ │                          │
//! └───────────────┬──────────┘ └──────────┬──────────────┘
//!                 │                       │
//! ┌───────────────▼───────────────────────▼──────────────┐
//! │                     Capabilities                      │
//! │ Whisper │ TTS │ Wikipedia │ Weather │ Wolfram │ SMTP  │
//! └──────────────────────────────────────────────────────┘
//! ```

pub mod assistant;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod input;
pub mod output;
pub mod services;
pub mod voice;

pub use assistant::Assistant;
pub use config::Config;
pub use dispatch::{Dispatcher, Flow, Intent, IntentRule, IntentTable, Trigger};
pub use error::{Error, Result};
pub use input::{CaptureOutcome, Command, ConsoleInput, InputResolver, SpeechCapture, TypedInput};
pub use output::{ConsoleOutput, OutputSink};
pub use services::{CapabilityError, Services};
