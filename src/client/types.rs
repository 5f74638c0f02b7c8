//! Wire types returned by the backend.

use crate::calendar::parse_timestamp;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Event handler state as observed by the dashboard.
///
/// The backend owns the handler; the dashboard only reads this and requests
/// transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandlerState {
    Running,
    Stopped,
    /// Status could not be fetched
    Unknown,
}

impl HandlerState {
    /// Map the backend's status string. Anything but `Running` is stopped.
    pub fn from_reported(status: &str) -> Self {
        if status == "Running" {
            HandlerState::Running
        } else {
            HandlerState::Stopped
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HandlerState::Running => "Running",
            HandlerState::Stopped => "Stopped",
            HandlerState::Unknown => "Error",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            HandlerState::Running => "Actively processing events and monitoring schedules",
            HandlerState::Stopped => "Event handler is not running. Events will not be processed.",
            HandlerState::Unknown => "Unable to determine status",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            HandlerState::Running => "⚙",
            HandlerState::Stopped => "⏸",
            HandlerState::Unknown => "?",
        }
    }
}

impl fmt::Display for HandlerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// `/api/event_handler_status` response
#[derive(Debug, Deserialize)]
pub(crate) struct HandlerStatusResponse {
    pub status: String,
}

/// One row of `/api/logs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub log_level: String,
    pub message: String,
}

impl LogEntry {
    /// `"<local time>: [<level>] <message>"`, keeping the raw timestamp if it
    /// does not parse.
    pub fn display_line(&self) -> String {
        let when = parse_timestamp(&self.timestamp)
            .map(|ts| {
                ts.with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string()
            })
            .unwrap_or_else(|| self.timestamp.clone());
        format!("{}: [{}] {}", when, self.log_level, self.message)
    }
}

/// Render database log entries as one text block.
pub fn format_log_entries(entries: &[LogEntry]) -> String {
    if entries.is_empty() {
        return "No logs found".to_string();
    }
    entries
        .iter()
        .map(LogEntry::display_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// `/api/health/{dependency}` response
#[derive(Debug, Clone, Deserialize)]
pub struct HealthReport {
    pub healthy: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Result file written to the log directory when an event finishes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinnerRecord {
    #[serde(rename = "Event")]
    pub event: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Leaders")]
    pub leaders: Vec<String>,
    /// Number or text, depending on the event's scoring
    #[serde(rename = "FinalScore", default)]
    pub final_score: serde_json::Value,
}

impl WinnerRecord {
    pub fn leaders_line(&self) -> String {
        self.leaders.join(", ")
    }

    pub fn score_display(&self) -> String {
        match &self.final_score {
            serde_json::Value::Null => "-".to_string(),
            serde_json::Value::String(score) => score.clone(),
            other => other.to_string(),
        }
    }
}
