//! Shared test doubles for integration tests

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone};

use herald::dispatch::{Dispatcher, IntentTable};
use herald::input::{CaptureOutcome, InputResolver, SpeechCapture, TypedInput};
use herald::output::OutputSink;
use herald::services::{
    Browser, CapabilityError, Clock, Encyclopedia, JokeSource, KnowledgeEngine, MailTransport,
    OutgoingEmail, Services, SiteTable, WeatherProvider, WeatherReport,
};

pub const JOKE: &str = "Why do programmers prefer dark mode? Because light attracts bugs.";

/// Shared view of everything the doubles observed
#[derive(Clone, Default)]
pub struct Journal {
    pub spoken: Rc<RefCell<Vec<String>>>,
    pub captures: Rc<Cell<usize>>,
    pub typed_prompts: Rc<Cell<usize>>,
    pub typed_labels: Rc<RefCell<Vec<String>>>,
    pub capability_calls: Rc<RefCell<Vec<&'static str>>>,
    pub opened: Rc<RefCell<Vec<String>>>,
    pub sent: Rc<RefCell<Vec<OutgoingEmail>>>,
}

impl Journal {
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.borrow().clone()
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.capability_calls.borrow().clone()
    }

    fn record(&self, name: &'static str) {
        self.capability_calls.borrow_mut().push(name);
    }
}

/// Replays capture outcomes; reports a timeout once exhausted
pub struct ScriptedCapture {
    outcomes: VecDeque<CaptureOutcome>,
    journal: Journal,
}

#[async_trait(?Send)]
impl SpeechCapture for ScriptedCapture {
    async fn capture(&mut self) -> CaptureOutcome {
        self.journal.captures.set(self.journal.captures.get() + 1);
        self.outcomes.pop_front().unwrap_or(CaptureOutcome::Timeout)
    }
}

/// Replays typed lines; reports closed input once exhausted
pub struct ScriptedKeyboard {
    lines: RefCell<VecDeque<String>>,
    journal: Journal,
}

impl TypedInput for ScriptedKeyboard {
    fn read_line(&self, prompt: &str) -> Option<String> {
        let journal = &self.journal;
        journal.typed_prompts.set(journal.typed_prompts.get() + 1);
        journal.typed_labels.borrow_mut().push(prompt.to_string());
        self.lines.borrow_mut().pop_front()
    }
}

pub struct RecordingSink {
    journal: Journal,
}

#[async_trait(?Send)]
impl OutputSink for RecordingSink {
    async fn speak(&self, text: &str) {
        self.journal.spoken.borrow_mut().push(text.to_string());
    }
}

pub struct FixedClock(pub DateTime<Local>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

struct FakeEncyclopedia {
    result: Result<String, CapabilityError>,
    journal: Journal,
}

#[async_trait(?Send)]
impl Encyclopedia for FakeEncyclopedia {
    async fn summarize(&self, _topic: &str, _max: usize) -> Result<String, CapabilityError> {
        self.journal.record("encyclopedia");
        self.result.clone()
    }
}

struct FakeWeather {
    result: Result<WeatherReport, CapabilityError>,
    journal: Journal,
}

#[async_trait(?Send)]
impl WeatherProvider for FakeWeather {
    async fn current(&self, _city: &str) -> Result<WeatherReport, CapabilityError> {
        self.journal.record("weather");
        self.result.clone()
    }
}

struct FakeKnowledge {
    result: Result<String, CapabilityError>,
    journal: Journal,
}

#[async_trait(?Send)]
impl KnowledgeEngine for FakeKnowledge {
    async fn compute(&self, _query: &str) -> Result<String, CapabilityError> {
        self.journal.record("knowledge");
        self.result.clone()
    }
}

struct FakeMail {
    result: Result<(), CapabilityError>,
    journal: Journal,
}

#[async_trait(?Send)]
impl MailTransport for FakeMail {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), CapabilityError> {
        self.journal.record("mail");
        self.journal.sent.borrow_mut().push(email.clone());
        self.result.clone()
    }
}

struct FakeJokes {
    journal: Journal,
}

impl JokeSource for FakeJokes {
    fn random(&self) -> String {
        self.journal.record("jokes");
        JOKE.to_string()
    }
}

struct FakeBrowser {
    result: Result<(), CapabilityError>,
    journal: Journal,
}

impl Browser for FakeBrowser {
    fn open(&self, url: &str) -> Result<(), CapabilityError> {
        self.journal.record("browser");
        self.journal.opened.borrow_mut().push(url.to_string());
        self.result.clone()
    }
}

/// Configuration for a set of doubles
pub struct Fakes {
    /// `None` runs the resolver in text-only mode
    pub capture: Option<Vec<CaptureOutcome>>,
    pub typed: Vec<&'static str>,
    pub clock: DateTime<Local>,
    pub encyclopedia: Result<String, CapabilityError>,
    pub weather: Option<Result<WeatherReport, CapabilityError>>,
    pub knowledge: Option<Result<String, CapabilityError>>,
    pub mail: Option<Result<(), CapabilityError>>,
    pub browser: Result<(), CapabilityError>,
    pub table: IntentTable,
}

impl Default for Fakes {
    fn default() -> Self {
        Self {
            capture: Some(Vec::new()),
            typed: Vec::new(),
            clock: Local.with_ymd_and_hms(2024, 3, 9, 15, 7, 0).unwrap(),
            encyclopedia: Ok("Rust is a programming language.".to_string()),
            weather: Some(Ok(WeatherReport {
                description: "clear sky".to_string(),
                temperature: 21.5,
                humidity: 40,
            })),
            knowledge: Some(Ok("4".to_string())),
            mail: Some(Ok(())),
            browser: Ok(()),
            table: IntentTable::standard(),
        }
    }
}

impl Fakes {
    /// Voice input that yields these transcripts in order
    pub fn hearing(transcripts: &[&str]) -> Self {
        Self {
            capture: Some(
                transcripts
                    .iter()
                    .map(|t| CaptureOutcome::Transcript((*t).to_string()))
                    .collect(),
            ),
            ..Self::default()
        }
    }

    pub fn build(self) -> Harness {
        let journal = Journal::default();

        let capture = self.capture.map(|outcomes| {
            Box::new(ScriptedCapture {
                outcomes: outcomes.into(),
                journal: journal.clone(),
            }) as Box<dyn SpeechCapture>
        });
        let keyboard = ScriptedKeyboard {
            lines: RefCell::new(self.typed.iter().map(|s| (*s).to_string()).collect()),
            journal: journal.clone(),
        };
        let sink = RecordingSink {
            journal: journal.clone(),
        };
        let io = InputResolver::new(capture, Box::new(keyboard), Box::new(sink));

        let services = Services {
            clock: Box::new(FixedClock(self.clock)),
            encyclopedia: Box::new(FakeEncyclopedia {
                result: self.encyclopedia,
                journal: journal.clone(),
            }),
            weather: self.weather.map(|result| {
                Box::new(FakeWeather {
                    result,
                    journal: journal.clone(),
                }) as Box<dyn WeatherProvider>
            }),
            knowledge: self.knowledge.map(|result| {
                Box::new(FakeKnowledge {
                    result,
                    journal: journal.clone(),
                }) as Box<dyn KnowledgeEngine>
            }),
            mail: self.mail.map(|result| {
                Box::new(FakeMail {
                    result,
                    journal: journal.clone(),
                }) as Box<dyn MailTransport>
            }),
            jokes: Box::new(FakeJokes {
                journal: journal.clone(),
            }),
            browser: Box::new(FakeBrowser {
                result: self.browser,
                journal: journal.clone(),
            }),
            sites: SiteTable::default(),
        };

        Harness {
            io,
            dispatcher: Dispatcher::new(self.table, services),
            journal,
        }
    }
}

/// Resolver and dispatcher wired to doubles
pub struct Harness {
    pub io: InputResolver,
    pub dispatcher: Dispatcher,
    pub journal: Journal,
}
