use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use herald::input::SpeechCapture;
use herald::output::OutputSink;
use herald::voice::{MicrophoneListener, VoiceOutput};
use herald::{Assistant, Config, ConsoleOutput};

/// Herald - voice-driven command dispatcher
#[derive(Parser)]
#[command(name = "herald", version, about)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Read commands from the keyboard and print responses (no audio)
    ///
    /// `HERALD_TEXT_ONLY=1` (or `true`) in the environment does the same.
    #[arg(long)]
    text_only: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Capture one utterance from the microphone and print the outcome
    Listen,
    /// Speak text through the configured output
    Say {
        /// Text to speak
        #[arg(default_value = "Hello! This is a test of the text to speech system.")]
        text: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "info,herald=info",
        1 => "info,herald=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e:#}");
            ExitCode::FAILURE
        }
    }
}

#[allow(clippy::future_not_send)]
async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.text_only);
    tracing::debug!(?config, "loaded configuration");

    match cli.command {
        Some(Command::Listen) => listen(&config).await,
        Some(Command::Say { text }) => say(&config, &text).await,
        None => {
            let assistant = Assistant::from_config(&config)?;
            assistant.run().await;
            Ok(())
        }
    }
}

/// Capture one utterance and print what came back
#[allow(clippy::future_not_send)]
async fn listen(config: &Config) -> anyhow::Result<()> {
    let api_key = config
        .api_keys
        .openai
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("OPENAI_API_KEY is required to listen"))?;

    let mut listener = MicrophoneListener::new(api_key, &config.voice, config.listen)?;
    let outcome = listener.capture().await;
    println!("{outcome:?}");
    Ok(())
}

/// Speak text through the voice output, or print it in text-only mode
#[allow(clippy::future_not_send)]
async fn say(config: &Config, text: &str) -> anyhow::Result<()> {
    if !config.voice.enabled {
        ConsoleOutput.speak(text).await;
        return Ok(());
    }

    let api_key = config
        .api_keys
        .openai
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("OPENAI_API_KEY is required to speak"))?;

    VoiceOutput::new(api_key, &config.voice)?.speak(text).await;
    Ok(())
}
