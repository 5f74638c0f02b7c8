//! Polling interval configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Seconds between refreshes, per data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    pub calendar_seconds: u64,
    pub event_files_seconds: u64,
    pub logs_seconds: u64,
    pub status_seconds: u64,
    pub health_seconds: u64,
    /// Content of the selected event file or log
    pub selection_seconds: u64,
    /// Event result files in the backend's log directory
    pub winners_seconds: u64,
}

impl PollingConfig {
    pub fn calendar(&self) -> Duration {
        Duration::from_secs(self.calendar_seconds)
    }

    pub fn event_files(&self) -> Duration {
        Duration::from_secs(self.event_files_seconds)
    }

    pub fn logs(&self) -> Duration {
        Duration::from_secs(self.logs_seconds)
    }

    pub fn status(&self) -> Duration {
        Duration::from_secs(self.status_seconds)
    }

    pub fn health(&self) -> Duration {
        Duration::from_secs(self.health_seconds)
    }

    pub fn selection(&self) -> Duration {
        Duration::from_secs(self.selection_seconds)
    }

    pub fn winners(&self) -> Duration {
        Duration::from_secs(self.winners_seconds)
    }

    /// `(field name, seconds)` for every interval.
    pub(crate) fn entries(&self) -> [(&'static str, u64); 7] {
        [
            ("calendar_seconds", self.calendar_seconds),
            ("event_files_seconds", self.event_files_seconds),
            ("logs_seconds", self.logs_seconds),
            ("status_seconds", self.status_seconds),
            ("health_seconds", self.health_seconds),
            ("selection_seconds", self.selection_seconds),
            ("winners_seconds", self.winners_seconds),
        ]
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            calendar_seconds: 30,
            event_files_seconds: 30,
            logs_seconds: 30,
            status_seconds: 30,
            health_seconds: 60,
            selection_seconds: 5,
            winners_seconds: 5,
        }
    }
}
