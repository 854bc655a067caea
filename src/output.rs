//! Output sink: where spoken responses go

use async_trait::async_trait;

/// Converts text to speech
///
/// Speaking is synchronous from the caller's point of view: `speak` returns
/// once the text has been delivered. It cannot fail; implementations log
/// their own errors.
#[async_trait(?Send)]
pub trait OutputSink {
    /// Deliver one response
    async fn speak(&self, text: &str);
}

/// Prints responses to the terminal
#[derive(Debug, Default)]
pub struct ConsoleOutput;

#[async_trait(?Send)]
impl OutputSink for ConsoleOutput {
    async fn speak(&self, text: &str) {
        println!("Herald: {text}");
    }
}
