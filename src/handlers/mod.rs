//! Intent handlers
//!
//! Every handler makes at most one capability call and finishes by speaking
//! exactly one outcome, success or failure. Capability errors stop here; the
//! dispatcher loop always continues afterwards.

pub mod email;

use chrono::{DateTime, Local, Timelike};

use crate::input::{Command, InputResolver};
use crate::services::{
    Browser, CapabilityError, Clock, Encyclopedia, JokeSource, KnowledgeEngine, SiteTable,
    WeatherProvider,
};

/// Spoken for any failure outside the known taxonomy
pub const UNEXPECTED: &str = "An unexpected error occurred";

/// Sentences requested from the encyclopedia
const SUMMARY_SENTENCES: usize = 2;

/// Log an unclassified failure and return the generic apology
pub(crate) fn unexpected(handler: &str, err: &CapabilityError) -> String {
    tracing::error!(handler, error = %err, "unhandled capability failure");
    UNEXPECTED.to_string()
}

/// Greeting for the hour of day (0-23)
#[must_use]
pub const fn greeting(hour: u32) -> &'static str {
    match hour {
        6..=11 => "Good morning! How can I assist you today?",
        12..=17 => "Good afternoon! What can I do for you?",
        _ => "Good evening! How may I help you?",
    }
}

/// Greet the user according to the time of day
pub async fn greet(io: &InputResolver, clock: &dyn Clock) {
    io.speak(greeting(clock.now().hour())).await;
}

/// Spoken time, 12-hour clock
#[must_use]
pub fn time_phrase(now: &DateTime<Local>) -> String {
    format!("It's {}", now.format("%I:%M %p"))
}

/// Spoken date
#[must_use]
pub fn date_phrase(now: &DateTime<Local>) -> String {
    format!("Today is {}", now.format("%A, %B %d, %Y"))
}

pub async fn tell_time(io: &InputResolver, clock: &dyn Clock) {
    io.speak(&time_phrase(&clock.now())).await;
}

pub async fn tell_date(io: &InputResolver, clock: &dyn Clock) {
    io.speak(&date_phrase(&clock.now())).await;
}

/// Look up the command's topic, with the word "wikipedia" removed
pub async fn search_encyclopedia(
    io: &InputResolver,
    encyclopedia: &dyn Encyclopedia,
    command: &Command,
) {
    io.speak("Searching Wikipedia...").await;

    let topic = command.as_str().replace("wikipedia", "");
    let topic = topic.trim();

    let result = if topic.is_empty() {
        Err(CapabilityError::NotFound)
    } else {
        encyclopedia.summarize(topic, SUMMARY_SENTENCES).await
    };

    let reply = match result {
        Ok(summary) => format!("According to Wikipedia: {summary}"),
        Err(CapabilityError::Ambiguous) => {
            "Multiple matches found. Please be more specific.".to_string()
        }
        Err(CapabilityError::NotFound) => "Sorry, I couldn't find that on Wikipedia.".to_string(),
        Err(CapabilityError::Unavailable(detail)) => {
            tracing::warn!(detail, "encyclopedia unavailable");
            "Wikipedia is unavailable right now".to_string()
        }
        Err(other) => unexpected("encyclopedia", &other),
    };
    io.speak(&reply).await;
}

/// Open the site named by the first word after "open "
pub async fn open_site(
    io: &InputResolver,
    browser: &dyn Browser,
    sites: &SiteTable,
    command: &Command,
) {
    let site = command
        .after("open ")
        .and_then(|rest| rest.split_whitespace().next());

    let Some((name, url)) = site.and_then(|name| sites.url(name).map(|url| (name, url))) else {
        let known: Vec<&str> = sites.names().collect();
        tracing::info!(site = ?site, ?known, "site not configured");
        io.speak("Website not configured").await;
        return;
    };

    let reply = match browser.open(url) {
        Ok(()) => format!("Opening {name}"),
        Err(CapabilityError::Unavailable(_)) => "I couldn't open the browser".to_string(),
        Err(other) => unexpected("open_site", &other),
    };
    io.speak(&reply).await;
}

/// Ask for a city and report its current weather
pub async fn report_weather(io: &mut InputResolver, provider: Option<&dyn WeatherProvider>) {
    let Some(provider) = provider else {
        io.speak("Weather service unavailable").await;
        return;
    };

    let city = io.ask("Which city?").await;
    if city.is_empty() {
        io.speak("No city given").await;
        return;
    }

    let reply = match provider.current(city.as_str()).await {
        Ok(report) => format!(
            "Weather in {city}: {}. Temperature: {}°C, Humidity: {}%",
            report.description, report.temperature, report.humidity
        ),
        Err(CapabilityError::NotFound) => "City not found".to_string(),
        Err(CapabilityError::Unavailable(detail)) => {
            tracing::warn!(detail, "weather service unavailable");
            "Weather service unavailable".to_string()
        }
        Err(other) => unexpected("weather", &other),
    };
    io.speak(&reply).await;
}

pub async fn tell_joke(io: &InputResolver, jokes: &dyn JokeSource) {
    io.speak(&jokes.random()).await;
}

/// Send the whole command to the knowledge engine
pub async fn compute(io: &InputResolver, engine: Option<&dyn KnowledgeEngine>, command: &Command) {
    let Some(engine) = engine else {
        io.speak("Computation service unavailable").await;
        return;
    };

    let reply = match engine.compute(command.as_str()).await {
        Ok(answer) => answer,
        Err(CapabilityError::NoAnswer) => "I couldn't compute that".to_string(),
        Err(CapabilityError::Unavailable(detail)) => {
            tracing::warn!(detail, "computation service unavailable");
            "Computation service unavailable".to_string()
        }
        Err(other) => unexpected("compute", &other),
    };
    io.speak(&reply).await;
}

pub async fn farewell(io: &InputResolver) {
    io.speak("Goodbye! Have a great day.").await;
}

pub async fn unrecognized(io: &InputResolver, command: &Command) {
    tracing::debug!(%command, "no intent matched");
    io.speak("Command not recognized").await;
}
