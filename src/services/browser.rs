//! System web browser

use super::{Browser, CapabilityError};

/// Opens URLs in the user's default browser
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBrowser;

impl Browser for SystemBrowser {
    fn open(&self, url: &str) -> Result<(), CapabilityError> {
        tracing::debug!(url, "opening browser");
        webbrowser::open(url).map_err(|e| {
            tracing::error!(url, error = %e, "failed to open browser");
            CapabilityError::Unavailable(e.to_string())
        })
    }
}
