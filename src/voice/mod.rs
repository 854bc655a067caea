//! Voice processing module
//!
//! Microphone capture and endpointing, Whisper transcription, and spoken
//! output through `OpenAI` TTS and the default speaker.

mod capture;
mod endpoint;
mod microphone;
mod playback;
mod speaker;
mod stt;
mod tts;

pub use capture::{AudioCapture, SAMPLE_RATE, samples_to_wav};
pub use endpoint::{Endpoint, UtteranceDetector, ambient_threshold, calculate_rms};
pub use microphone::MicrophoneListener;
pub use playback::AudioPlayback;
pub use speaker::VoiceOutput;
pub use stt::WhisperTranscriber;
pub use tts::SpeechSynthesizer;
