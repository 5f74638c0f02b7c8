//! Dashboard state: selection plus one panel per data source.

use crate::calendar::Event;
use crate::client::{HandlerState, LogEntry, WinnerRecord};
use crate::health::{HealthBoard, HealthResult};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// What a panel currently shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum PanelData<T> {
    Loading,
    Ready(T),
    /// Error message from the last tick, scoped to this panel
    Failed(String),
}

/// One view region bound to one data source.
///
/// Every tick calls [`begin`](Panel::begin) before fetching and
/// [`complete`](Panel::complete) afterwards. A completion is applied only if
/// no newer tick has begun in between, so a slow response can never
/// overwrite a fresher one.
#[derive(Debug, Clone, Serialize)]
pub struct Panel<T> {
    pub data: PanelData<T>,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    latest_tick: u64,
}

impl<T> Default for Panel<T> {
    fn default() -> Self {
        Self {
            data: PanelData::Loading,
            updated_at: None,
            latest_tick: 0,
        }
    }
}

impl<T> Panel<T> {
    /// Start a tick; returns its sequence number.
    pub fn begin(&mut self) -> u64 {
        self.latest_tick += 1;
        self.latest_tick
    }

    /// Apply the outcome of tick `tick`. Returns false if a newer tick has
    /// started since, in which case the outcome is dropped.
    pub fn complete(&mut self, tick: u64, data: PanelData<T>) -> bool {
        if tick != self.latest_tick {
            return false;
        }
        self.data = data;
        self.updated_at = Some(Utc::now());
        true
    }

    /// Back to `Loading`, invalidating any tick in flight.
    pub fn reset(&mut self) {
        self.latest_tick += 1;
        self.data = PanelData::Loading;
        self.updated_at = None;
    }

    pub fn value(&self) -> Option<&T> {
        match &self.data {
            PanelData::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.data {
            PanelData::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Log view source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum LogSource {
    /// Recent entries from `/api/logs`
    Database,
    /// Legacy log file from `/api/log_content/{name}`
    File(String),
}

impl LogSource {
    pub fn label(&self) -> &str {
        match self {
            LogSource::Database => "Database Logs (Recent)",
            LogSource::File(name) => name,
        }
    }
}

impl fmt::Display for LogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Items the operator has picked. Lives for the session only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub event_file: Option<String>,
    pub log: Option<LogSource>,
}

/// Everything the view renders.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardState {
    pub selection: Selection,
    pub calendar: Panel<Vec<Event>>,
    pub event_files: Panel<Vec<String>>,
    pub event_content: Panel<String>,
    /// Recent database log entries
    pub logs: Panel<Vec<LogEntry>>,
    pub log_content: Panel<String>,
    /// Event results; unreadable result files are left out
    pub winners: Panel<Vec<WinnerRecord>>,
    pub handler: Panel<HandlerState>,
    pub health: HealthBoard,
    #[serde(skip)]
    health_tick: u64,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a health tick; returns its sequence number.
    pub fn begin_health(&mut self) -> u64 {
        self.health_tick += 1;
        self.health_tick
    }

    /// Record all results of health tick `tick` at once, unless a newer
    /// health tick has started.
    pub fn complete_health(&mut self, tick: u64, results: Vec<HealthResult>) -> bool {
        if tick != self.health_tick {
            return false;
        }
        self.health.record_all(results);
        true
    }

    /// Handler state as displayed: a failed status fetch reads as unknown.
    pub fn handler_state(&self) -> Option<HandlerState> {
        match &self.handler.data {
            PanelData::Loading => None,
            PanelData::Ready(state) => Some(*state),
            PanelData::Failed(_) => Some(HandlerState::Unknown),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::Dependency;

    #[test]
    fn test_panel_starts_loading() {
        let panel: Panel<String> = Panel::default();
        assert_eq!(panel.data, PanelData::Loading);
        assert!(panel.updated_at.is_none());
    }

    #[test]
    fn test_panel_applies_latest_tick() {
        let mut panel = Panel::default();
        let tick = panel.begin();
        assert!(panel.complete(tick, PanelData::Ready(3)));
        assert_eq!(panel.value(), Some(&3));
        assert!(panel.updated_at.is_some());
    }

    #[test]
    fn test_panel_discards_superseded_tick() {
        let mut panel = Panel::default();
        let slow = panel.begin();
        let fast = panel.begin();

        assert!(panel.complete(fast, PanelData::Ready("new")));
        assert!(!panel.complete(slow, PanelData::Ready("old")));
        assert_eq!(panel.value(), Some(&"new"));
    }

    #[test]
    fn test_panel_reset_invalidates_in_flight() {
        let mut panel = Panel::default();
        let tick = panel.begin();
        panel.reset();
        assert!(!panel.complete(tick, PanelData::Ready(1)));
        assert_eq!(panel.data, PanelData::Loading);
    }

    #[test]
    fn test_panel_error() {
        let mut panel: Panel<u8> = Panel::default();
        let tick = panel.begin();
        panel.complete(tick, PanelData::Failed("HTTP error: 500".to_string()));
        assert_eq!(panel.error(), Some("HTTP error: 500"));
        assert!(panel.value().is_none());
    }

    #[test]
    fn test_handler_state_failed_reads_unknown() {
        let mut state = DashboardState::new();
        assert_eq!(state.handler_state(), None);

        let tick = state.handler.begin();
        state
            .handler
            .complete(tick, PanelData::Failed("connection failed".to_string()));
        assert_eq!(state.handler_state(), Some(HandlerState::Unknown));
    }

    #[test]
    fn test_health_tick_applies_both_results_together() {
        let mut state = DashboardState::new();
        let first = state.begin_health();
        state.complete_health(
            first,
            vec![
                HealthResult::healthy(Dependency::GameServer, 5),
                HealthResult::unhealthy(Dependency::RemoteConsole, 5, None),
            ],
        );
        let failing: Vec<_> = state.health.overall().failing.into_iter().collect();
        assert_eq!(failing, vec![Dependency::RemoteConsole]);

        let second = state.begin_health();
        state.complete_health(
            second,
            vec![
                HealthResult::healthy(Dependency::GameServer, 5),
                HealthResult::healthy(Dependency::RemoteConsole, 5),
            ],
        );
        assert!(state.health.overall().all_healthy);
    }

    #[test]
    fn test_stale_health_tick_dropped() {
        let mut state = DashboardState::new();
        let old = state.begin_health();
        let new = state.begin_health();
        assert!(state.complete_health(
            new,
            vec![HealthResult::healthy(Dependency::RemoteConsole, 5)]
        ));
        assert!(!state.complete_health(
            old,
            vec![HealthResult::unhealthy(Dependency::RemoteConsole, 5, None)]
        ));
        assert!(state.health.get(Dependency::RemoteConsole).unwrap().healthy);
    }

    #[test]
    fn test_log_source_labels() {
        assert_eq!(LogSource::Database.label(), "Database Logs (Recent)");
        assert_eq!(LogSource::File("server.log".to_string()).label(), "server.log");
    }
}
