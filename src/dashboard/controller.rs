//! Dashboard orchestration: refresh ticks, selection and handler actions.

use super::state::{DashboardState, LogSource, Panel, PanelData};
use crate::client::{format_log_entries, pretty_json, BackendClient, ClientError};
use crate::config::PollingConfig;
use crate::health::HealthProbe;
use crate::scheduler::{PollingScheduler, TaskHandle};
use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

/// Owns dashboard state and drives every panel refresh.
///
/// Cheap to clone; clones share the same state.
#[derive(Debug, Clone)]
pub struct DashboardController {
    client: BackendClient,
    probe: HealthProbe,
    polling: PollingConfig,
    state: Arc<RwLock<DashboardState>>,
}

impl DashboardController {
    pub fn new(client: BackendClient, polling: PollingConfig) -> Self {
        Self {
            probe: HealthProbe::new(client.clone()),
            client,
            polling,
            state: Arc::new(RwLock::new(DashboardState::new())),
        }
    }

    pub fn client(&self) -> &BackendClient {
        &self.client
    }

    /// Copy of the current state for rendering.
    pub fn snapshot(&self) -> DashboardState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn write(&self) -> RwLockWriteGuard<'_, DashboardState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply a tick outcome to the panel picked by `panel`.
    fn finish<T, F>(
        &self,
        source: &'static str,
        tick: u64,
        panel: F,
        outcome: Result<T, ClientError>,
    ) -> Result<(), ClientError>
    where
        F: FnOnce(&mut DashboardState) -> &mut Panel<T>,
    {
        let mut state = self.write();
        let panel = panel(&mut state);
        let (data, result) = match outcome {
            Ok(value) => (PanelData::Ready(value), Ok(())),
            Err(e) => (PanelData::Failed(e.to_string()), Err(e)),
        };
        if !panel.complete(tick, data) {
            tracing::debug!(source, tick, "Discarding superseded tick");
        }
        result
    }

    /// Refresh the event calendar.
    pub async fn refresh_calendar(&self) -> Result<(), ClientError> {
        let tick = self.write().calendar.begin();
        let outcome = self.client.calendar().await;
        self.finish("calendar", tick, |s| &mut s.calendar, outcome)
    }

    /// Refresh the list of event files.
    pub async fn refresh_event_files(&self) -> Result<(), ClientError> {
        let tick = self.write().event_files.begin();
        let outcome = self.client.event_files().await;
        self.finish("event_files", tick, |s| &mut s.event_files, outcome)
    }

    /// Refresh recent database log entries.
    pub async fn refresh_logs(&self) -> Result<(), ClientError> {
        let tick = self.write().logs.begin();
        let outcome = self.client.logs().await;
        self.finish("logs", tick, |s| &mut s.logs, outcome)
    }

    /// Refresh the event handler status.
    pub async fn refresh_status(&self) -> Result<(), ClientError> {
        let tick = self.write().handler.begin();
        let outcome = self.client.handler_status().await;
        self.finish("status", tick, |s| &mut s.handler, outcome)
    }

    /// Probe both dependencies and record the results together.
    ///
    /// Probes never fail, so neither does this.
    pub async fn refresh_health(&self) -> Result<(), ClientError> {
        let tick = self.write().begin_health();
        let results = self.probe.probe_all().await;
        if !self.write().complete_health(tick, results) {
            tracing::debug!(source = "health", tick, "Discarding superseded tick");
        }
        Ok(())
    }

    /// Reload event results from the log directory.
    pub async fn refresh_winners(&self) -> Result<(), ClientError> {
        let tick = self.write().winners.begin();
        let outcome = self.client.winners().await;
        self.finish("winners", tick, |s| &mut s.winners, outcome)
    }

    /// Reload the selected event file, if any.
    pub async fn refresh_selected_event(&self) -> Result<(), ClientError> {
        let (name, tick) = {
            let mut state = self.write();
            let Some(name) = state.selection.event_file.clone() else {
                return Ok(());
            };
            (name, state.event_content.begin())
        };
        let outcome = self
            .client
            .event_json_content(&name)
            .await
            .map(|raw| pretty_json(&raw));
        self.finish("event_content", tick, |s| &mut s.event_content, outcome)
    }

    /// Reload the selected log, if any.
    pub async fn refresh_selected_log(&self) -> Result<(), ClientError> {
        let (source, tick) = {
            let mut state = self.write();
            let Some(source) = state.selection.log.clone() else {
                return Ok(());
            };
            (source, state.log_content.begin())
        };
        let outcome = match &source {
            LogSource::Database => self
                .client
                .logs()
                .await
                .map(|entries| format_log_entries(&entries)),
            LogSource::File(name) => self.client.log_content(name).await,
        };
        self.finish("log_content", tick, |s| &mut s.log_content, outcome)
    }

    /// Select an event file and load it once right away. Later refreshes
    /// happen on the selection interval.
    pub async fn select_event_file(&self, name: impl Into<String>) -> Result<(), ClientError> {
        let name = name.into();
        {
            let mut state = self.write();
            state.selection.event_file = Some(name.clone());
            state.event_content.reset();
        }
        tracing::info!(file = %name, "Selected event file");
        self.refresh_selected_event().await
    }

    /// Select a log source and load it once right away.
    pub async fn select_log(&self, source: LogSource) -> Result<(), ClientError> {
        {
            let mut state = self.write();
            state.selection.log = Some(source.clone());
            state.log_content.reset();
        }
        tracing::info!(log = %source, "Selected log");
        self.refresh_selected_log().await
    }

    /// Drop both selections.
    pub fn clear_selection(&self) {
        let mut state = self.write();
        state.selection = Default::default();
        state.event_content.reset();
        state.log_content.reset();
    }

    /// Ask the backend to start the event handler, then re-read its status.
    ///
    /// A failed request is only logged; the status refresh shows whatever
    /// state the handler is really in.
    pub async fn start_handler(&self) -> Result<(), ClientError> {
        if let Err(e) = self.client.start_handler().await {
            tracing::warn!(error = %e, "Start request failed");
        }
        self.refresh_status().await
    }

    /// Ask the backend to stop the event handler, then re-read its status.
    pub async fn stop_handler(&self) -> Result<(), ClientError> {
        if let Err(e) = self.client.stop_handler().await {
            tracing::warn!(error = %e, "Stop request failed");
        }
        self.refresh_status().await
    }

    /// Schedule every panel on its configured interval.
    pub fn spawn_polling(&self, scheduler: &PollingScheduler) -> Vec<TaskHandle> {
        let polling = &self.polling;
        vec![
            self.poll(scheduler, "calendar", polling.calendar(), |c| async move {
                c.refresh_calendar().await
            }),
            self.poll(scheduler, "event_files", polling.event_files(), |c| async move {
                c.refresh_event_files().await
            }),
            self.poll(scheduler, "logs", polling.logs(), |c| async move {
                c.refresh_logs().await
            }),
            self.poll(scheduler, "status", polling.status(), |c| async move {
                c.refresh_status().await
            }),
            self.poll(scheduler, "health", polling.health(), |c| async move {
                c.refresh_health().await
            }),
            self.poll(scheduler, "event_content", polling.selection(), |c| async move {
                c.refresh_selected_event().await
            }),
            self.poll(scheduler, "log_content", polling.selection(), |c| async move {
                c.refresh_selected_log().await
            }),
            self.poll(scheduler, "winners", polling.winners(), |c| async move {
                c.refresh_winners().await
            }),
        ]
    }

    fn poll<F, Fut>(
        &self,
        scheduler: &PollingScheduler,
        name: &'static str,
        interval: std::time::Duration,
        refresh: F,
    ) -> TaskHandle
    where
        F: Fn(DashboardController) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<(), ClientError>> + Send + 'static,
    {
        let controller = self.clone();
        scheduler.schedule(name, interval, move || refresh(controller.clone()))
    }
}
