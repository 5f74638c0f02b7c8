//! Event calendar types and time-based status classification.
//!
//! An event's status is never stored. It is derived from the event interval
//! and a freshly captured `now` every time the calendar is rendered, so the
//! displayed status follows the wall clock between polls.

mod timestamp;

pub use timestamp::parse_timestamp;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scheduled event as reported by `/api/calendar`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    #[serde(with = "timestamp::flexible")]
    pub start: DateTime<Utc>,
    #[serde(with = "timestamp::flexible")]
    pub end: DateTime<Utc>,
}

impl Event {
    /// Status of this event at `now`.
    pub fn status_at(&self, now: DateTime<Utc>) -> EventStatus {
        classify(self.start, self.end, now)
    }
}

/// Where an event sits relative to the current time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Future,
    InProgress,
    Over,
}

impl EventStatus {
    /// Label shown in the calendar table.
    pub fn label(&self) -> &'static str {
        match self {
            EventStatus::Future => "Future",
            EventStatus::InProgress => "Happening Now",
            EventStatus::Over => "Over",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify an interval against `now`.
///
/// The in-progress range is inclusive at both ends: an event that starts or
/// ends exactly at `now` is `InProgress`. If `end < start` the interval is
/// empty, so anything at or after `start` is `Over`.
pub fn classify(start: DateTime<Utc>, end: DateTime<Utc>, now: DateTime<Utc>) -> EventStatus {
    if now < start {
        EventStatus::Future
    } else if now <= end {
        EventStatus::InProgress
    } else {
        EventStatus::Over
    }
}
