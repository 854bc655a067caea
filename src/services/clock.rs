//! System wall clock

use chrono::{DateTime, Local};

use super::Clock;

/// Reads the local system time
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}
