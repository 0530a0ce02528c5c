//! Departure monitor entries.

use chrono::{DateTime, Utc};

use super::mode::{Diva, Mode};

/// Where a departure leaves from, e.g. `Platform { name: "3", kind: "Railtrack" }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    pub name: String,
    pub kind: String,
}

/// One entry on a stop's departure monitor.
#[derive(Debug, Clone, PartialEq)]
pub struct Departure {
    pub id: String,
    pub line: String,
    pub direction: String,
    pub platform: Option<Platform>,
    /// Real-time prediction, or the scheduled time when there is none.
    pub arrival_time: DateTime<Utc>,
    pub scheduled_time: DateTime<Utc>,
    /// Minutes from the query instant until `arrival_time`.
    pub arrival_time_relative: i64,
    /// Minutes from the query instant until `scheduled_time`.
    pub scheduled_time_relative: i64,
    /// Minutes late (negative when early).
    pub delay_time: i64,
    /// Provider status such as `"InTime"` or `"Delayed"`.
    pub state: String,
    pub mode: Mode,
    pub diva: Option<Diva>,
}

impl Departure {
    pub fn is_delayed(&self) -> bool {
        self.delay_time > 0
    }
}
