//! External capabilities consumed by the handlers
//!
//! Each capability is a narrow trait; the concrete adapters in the submodules
//! talk to real services. Optional capabilities (weather, computation, mail)
//! are only built when their credentials are configured.

mod browser;
mod clock;
mod jokes;
mod mail;
mod sites;
mod weather;
mod wikipedia;
mod wolfram;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local};
use thiserror::Error;

pub use browser::SystemBrowser;
pub use clock::SystemClock;
pub use jokes::BuiltinJokes;
pub use mail::{SmtpMailer, smtp_reason};
pub use sites::SiteTable;
pub use weather::OpenWeatherMap;
pub use wikipedia::{WikipediaClient, first_sentences};
pub use wolfram::WolframAlpha;

use crate::config::Config;

/// Timeout applied by every HTTP-backed capability
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(15);

/// Ways a capability call can fail
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapabilityError {
    /// Nothing matched the query
    #[error("not found")]
    NotFound,

    /// The query matched several distinct entries
    #[error("ambiguous query")]
    Ambiguous,

    /// The service could not be reached or refused the request
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// The service understood the query but had no answer
    #[error("no answer")]
    NoAnswer,

    /// Login to the service failed
    #[error("authentication failed")]
    AuthFailed,

    /// The mail server refused the recipient
    #[error("recipient rejected")]
    RecipientRejected,

    /// The mail server reported an error
    #[error("server error: {0}")]
    ServerError(String),

    /// Anything not covered above
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl From<reqwest::Error> for CapabilityError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Unexpected(e.to_string())
        } else {
            Self::Unavailable(e.to_string())
        }
    }
}

/// Current conditions reported by a weather provider
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    /// Short description, e.g. "light rain"
    pub description: String,
    /// Temperature in degrees Celsius
    pub temperature: f64,
    /// Relative humidity in percent
    pub humidity: u8,
}

/// A message ready to hand to a mail transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Encyclopedia lookups
#[async_trait(?Send)]
pub trait Encyclopedia {
    /// Summarize `topic` in at most `max_sentences` sentences
    ///
    /// # Errors
    ///
    /// `Ambiguous` for disambiguation pages, `NotFound` when no article
    /// matches, `Unavailable` when the service cannot be reached
    async fn summarize(&self, topic: &str, max_sentences: usize) -> Result<String, CapabilityError>;
}

/// Current weather by city
#[async_trait(?Send)]
pub trait WeatherProvider {
    /// # Errors
    ///
    /// `NotFound` for an unknown city, `Unavailable` when the service cannot
    /// be reached
    async fn current(&self, city: &str) -> Result<WeatherReport, CapabilityError>;
}

/// Computational knowledge queries
#[async_trait(?Send)]
pub trait KnowledgeEngine {
    /// Answer a question as short plain text
    ///
    /// # Errors
    ///
    /// `NoAnswer` when the engine has no short answer, `Unavailable` when the
    /// service cannot be reached
    async fn compute(&self, query: &str) -> Result<String, CapabilityError>;
}

/// Outgoing mail
///
/// The sender address belongs to the transport's account.
#[async_trait(?Send)]
pub trait MailTransport {
    /// # Errors
    ///
    /// `AuthFailed`, `RecipientRejected` or `Unavailable` as classified from
    /// the SMTP exchange
    async fn send(&self, email: &OutgoingEmail) -> Result<(), CapabilityError>;
}

/// Source of jokes
pub trait JokeSource {
    fn random(&self) -> String;
}

/// Opens URLs for the user
pub trait Browser {
    /// # Errors
    ///
    /// `Unavailable` if no browser could be launched
    fn open(&self, url: &str) -> Result<(), CapabilityError>;
}

/// Wall clock
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

/// Every capability the handlers may call
pub struct Services {
    pub clock: Box<dyn Clock>,
    pub encyclopedia: Box<dyn Encyclopedia>,
    pub weather: Option<Box<dyn WeatherProvider>>,
    pub knowledge: Option<Box<dyn KnowledgeEngine>>,
    pub mail: Option<Box<dyn MailTransport>>,
    pub jokes: Box<dyn JokeSource>,
    pub browser: Box<dyn Browser>,
    pub sites: SiteTable,
}

impl Services {
    /// Build the real adapters from configuration
    ///
    /// Missing credentials leave the dependent capability unset.
    ///
    /// # Errors
    ///
    /// Returns error if an HTTP client or the mail transport cannot be built
    pub fn from_config(config: &Config) -> crate::Result<Self> {
        let weather = match &config.api_keys.weather {
            Some(key) => Some(Box::new(OpenWeatherMap::new(key)?) as Box<dyn WeatherProvider>),
            None => None,
        };

        let knowledge = match &config.api_keys.wolfram {
            Some(app_id) => Some(Box::new(WolframAlpha::new(app_id)?) as Box<dyn KnowledgeEngine>),
            None => None,
        };

        let mail = match &config.mail {
            Some(mail) => Some(Box::new(SmtpMailer::new(mail)?) as Box<dyn MailTransport>),
            None => None,
        };

        Ok(Self {
            clock: Box::new(SystemClock),
            encyclopedia: Box::new(WikipediaClient::new()?),
            weather,
            knowledge,
            mail,
            jokes: Box::new(BuiltinJokes),
            browser: Box::new(SystemBrowser),
            sites: SiteTable::with_extra(&config.sites),
        })
    }
}

/// HTTP client shared by the capability adapters
pub(crate) fn http_client() -> crate::Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .user_agent(concat!("herald/", env!("CARGO_PKG_VERSION")))
        .build()?)
}
