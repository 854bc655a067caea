//! Intent dispatch
//!
//! Commands are matched against an ordered table of keyword rules. Rules may
//! overlap; the first match wins, so the table order is the only precedence
//! mechanism. The table is built once and never changes afterwards.

use std::fmt;

use crate::handlers;
use crate::input::{Command, InputResolver};
use crate::services::Services;

/// What the main loop should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Halt,
}

/// A category of user request, bound to one handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Exit,
    Time,
    Date,
    Encyclopedia,
    OpenSite,
    Weather,
    Joke,
    Email,
    Compute,
    Unrecognized,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Exit => "exit",
            Self::Time => "time",
            Self::Date => "date",
            Self::Encyclopedia => "encyclopedia",
            Self::OpenSite => "open_site",
            Self::Weather => "weather",
            Self::Joke => "joke",
            Self::Email => "email",
            Self::Compute => "compute",
            Self::Unrecognized => "unrecognized",
        };
        f.write_str(name)
    }
}

/// Predicate over a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Matches when the command contains any of the keywords
    Any(&'static [&'static str]),
    /// Matches every command
    Always,
}

impl Trigger {
    /// Test a command; keywords are compared case-insensitively
    #[must_use]
    pub fn matches(&self, command: &Command) -> bool {
        match self {
            Self::Any(keywords) => keywords
                .iter()
                .any(|k| command.contains(&k.to_lowercase())),
            Self::Always => true,
        }
    }
}

/// One row of the routing table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntentRule {
    pub trigger: Trigger,
    pub intent: Intent,
}

impl IntentRule {
    #[must_use]
    pub const fn new(trigger: Trigger, intent: Intent) -> Self {
        Self { trigger, intent }
    }
}

/// Ordered routing table, always ending in a catch-all
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentTable {
    rules: Vec<IntentRule>,
}

impl Default for IntentTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl IntentTable {
    /// The stock table
    ///
    /// Exit comes first so a command containing an exit word always halts.
    /// Weather is ahead of Compute, so "what is the weather" asks for a city.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(vec![
            IntentRule::new(Trigger::Any(&["exit", "bye"]), Intent::Exit),
            IntentRule::new(Trigger::Any(&["time"]), Intent::Time),
            IntentRule::new(Trigger::Any(&["date"]), Intent::Date),
            IntentRule::new(Trigger::Any(&["wikipedia"]), Intent::Encyclopedia),
            IntentRule::new(Trigger::Any(&["open "]), Intent::OpenSite),
            IntentRule::new(Trigger::Any(&["weather"]), Intent::Weather),
            IntentRule::new(Trigger::Any(&["joke"]), Intent::Joke),
            IntentRule::new(Trigger::Any(&["email"]), Intent::Email),
            IntentRule::new(
                Trigger::Any(&["calculate", "what is", "who is"]),
                Intent::Compute,
            ),
        ])
    }

    /// Build a table from rules in priority order
    ///
    /// A catch-all `Unrecognized` rule is appended unless the last rule
    /// already matches everything.
    #[must_use]
    pub fn new(mut rules: Vec<IntentRule>) -> Self {
        if rules.last().is_none_or(|r| r.trigger != Trigger::Always) {
            rules.push(IntentRule::new(Trigger::Always, Intent::Unrecognized));
        }
        Self { rules }
    }

    /// Intent of the first rule matching `command`
    #[must_use]
    pub fn classify(&self, command: &Command) -> Intent {
        self.rules
            .iter()
            .find(|rule| rule.trigger.matches(command))
            .map_or(Intent::Unrecognized, |rule| rule.intent)
    }

    #[must_use]
    pub fn rules(&self) -> &[IntentRule] {
        &self.rules
    }
}

/// Routes commands to handlers
pub struct Dispatcher {
    table: IntentTable,
    services: Services,
}

impl Dispatcher {
    #[must_use]
    pub const fn new(table: IntentTable, services: Services) -> Self {
        Self { table, services }
    }

    #[must_use]
    pub const fn services(&self) -> &Services {
        &self.services
    }

    /// Run the handler for `command`
    ///
    /// Empty commands are ignored. Only the exit intent halts; handler and
    /// capability failures have already been spoken by the time this returns.
    pub async fn dispatch(&self, command: &Command, io: &mut InputResolver) -> Flow {
        if command.is_empty() {
            return Flow::Continue;
        }

        let intent = self.table.classify(command);
        tracing::info!(%intent, %command, "dispatching command");

        let services = &self.services;
        match intent {
            Intent::Exit => {
                handlers::farewell(io).await;
                return Flow::Halt;
            }
            Intent::Time => handlers::tell_time(io, services.clock.as_ref()).await,
            Intent::Date => handlers::tell_date(io, services.clock.as_ref()).await,
            Intent::Encyclopedia => {
                handlers::search_encyclopedia(io, services.encyclopedia.as_ref(), command).await;
            }
            Intent::OpenSite => {
                handlers::open_site(io, services.browser.as_ref(), &services.sites, command).await;
            }
            Intent::Weather => handlers::report_weather(io, services.weather.as_deref()).await,
            Intent::Joke => handlers::tell_joke(io, services.jokes.as_ref()).await,
            Intent::Email => {
                handlers::email::run(io, services.mail.as_deref()).await;
            }
            Intent::Compute => {
                handlers::compute(io, services.knowledge.as_deref(), command).await;
            }
            Intent::Unrecognized => handlers::unrecognized(io, command).await,
        }

        Flow::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(text: &str) -> Intent {
        IntentTable::standard().classify(&Command::new(text))
    }

    #[test]
    fn test_standard_table_routes() {
        assert_eq!(classify("what's the time"), Intent::Time);
        assert_eq!(classify("today's date please"), Intent::Date);
        assert_eq!(classify("wikipedia rust language"), Intent::Encyclopedia);
        assert_eq!(classify("open youtube"), Intent::OpenSite);
        assert_eq!(classify("tell me a joke"), Intent::Joke);
        assert_eq!(classify("send an email"), Intent::Email);
        assert_eq!(classify("calculate 2 plus 2"), Intent::Compute);
        assert_eq!(classify("who is ada lovelace"), Intent::Compute);
        assert_eq!(classify("sing a song"), Intent::Unrecognized);
    }

    #[test]
    fn test_exit_wins_anywhere() {
        assert_eq!(classify("EXIT"), Intent::Exit);
        assert_eq!(classify("what time is it before i exit"), Intent::Exit);
        assert_eq!(classify("ok bye"), Intent::Exit);
    }

    #[test]
    fn test_weather_precedes_compute() {
        assert_eq!(classify("what is the weather"), Intent::Weather);
    }

    #[test]
    fn test_order_decides_overlap() {
        let table = IntentTable::new(vec![
            IntentRule::new(Trigger::Any(&["what is"]), Intent::Compute),
            IntentRule::new(Trigger::Any(&["weather"]), Intent::Weather),
        ]);
        assert_eq!(table.classify(&Command::new("what is the weather")), Intent::Compute);
    }

    #[test]
    fn test_catch_all_appended_once() {
        let table = IntentTable::new(vec![IntentRule::new(Trigger::Any(&["joke"]), Intent::Joke)]);
        assert_eq!(table.rules().len(), 2);
        assert_eq!(table.rules()[1].intent, Intent::Unrecognized);

        let explicit = IntentTable::new(vec![IntentRule::new(Trigger::Always, Intent::Joke)]);
        assert_eq!(explicit.rules().len(), 1);
        assert_eq!(
            IntentTable::standard().rules().last().map(|r| r.intent),
            Some(Intent::Unrecognized)
        );
    }

    #[test]
    fn test_open_requires_trailing_space() {
        assert_eq!(classify("reopened"), Intent::Unrecognized);
    }
}
