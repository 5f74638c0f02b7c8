//! Fixed-interval polling with per-task isolation.
//!
//! Each scheduled task runs its own interval loop. A tick runs as a separate
//! tokio task, so an error or panic in one tick is logged and forgotten: the
//! next tick still fires and other tasks never notice. A tick that is still
//! running when the next one is due causes that next tick to be skipped
//! instead of piling up concurrent requests against a slow backend.

use futures::FutureExt;
use std::fmt::Display;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

/// Smallest accepted interval; `tokio::time::interval` rejects zero.
const MIN_INTERVAL: Duration = Duration::from_millis(10);

/// Counters for one scheduled task.
#[derive(Debug, Default)]
struct TaskStats {
    started: AtomicU64,
    skipped: AtomicU64,
    failed: AtomicU64,
}

/// Point-in-time copy of a task's counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskStatsSnapshot {
    /// Ticks that actually ran
    pub started: u64,
    /// Ticks skipped because the previous one was still running
    pub skipped: u64,
    /// Ticks that returned an error or panicked
    pub failed: u64,
}

/// Handle to one scheduled task.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    name: Arc<str>,
    cancel: CancellationToken,
    stats: Arc<TaskStats>,
}

impl TaskHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stop future ticks. A tick already running is left to finish.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn stats(&self) -> TaskStatsSnapshot {
        TaskStatsSnapshot {
            started: self.stats.started.load(Ordering::Relaxed),
            skipped: self.stats.skipped.load(Ordering::Relaxed),
            failed: self.stats.failed.load(Ordering::Relaxed),
        }
    }
}

/// Clears the in-flight flag when a tick ends, however it ends.
struct InFlight(Arc<AtomicBool>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Runs refresh tasks on independent fixed intervals.
#[derive(Debug, Default)]
pub struct PollingScheduler {
    cancel: CancellationToken,
    tracker: TaskTracker,
}

impl PollingScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scheduler whose tasks also stop when `parent` is cancelled.
    pub fn with_cancellation(parent: &CancellationToken) -> Self {
        Self {
            cancel: parent.child_token(),
            tracker: TaskTracker::new(),
        }
    }

    /// Run `task` every `interval`, starting immediately.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F, Fut, E>(
        &self,
        name: impl Into<String>,
        interval: Duration,
        task: F,
    ) -> TaskHandle
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        let name: Arc<str> = Arc::from(name.into());
        let handle = TaskHandle {
            name: Arc::clone(&name),
            cancel: self.cancel.child_token(),
            stats: Arc::new(TaskStats::default()),
        };
        let interval = interval.max(MIN_INTERVAL);

        let task = Arc::new(task);
        let token = handle.cancel.clone();
        let stats = Arc::clone(&handle.stats);
        let tracker = self.tracker.clone();
        let in_flight = Arc::new(AtomicBool::new(false));

        self.tracker.spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            tracing::debug!(
                task = %name,
                interval_ms = interval.as_millis() as u64,
                "Polling task started"
            );

            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        tracing::debug!(task = %name, "Polling task cancelled");
                        break;
                    }
                    _ = ticker.tick() => {
                        if in_flight.swap(true, Ordering::AcqRel) {
                            stats.skipped.fetch_add(1, Ordering::Relaxed);
                            tracing::debug!(task = %name, "Previous tick still running, skipping");
                            continue;
                        }
                        let guard = InFlight(Arc::clone(&in_flight));
                        stats.started.fetch_add(1, Ordering::Relaxed);
                        metrics::counter!("craftwatch_poll_ticks_total", "task" => name.to_string())
                            .increment(1);

                        // Building the future runs inside the tick too, so a
                        // panic there is caught like any other.
                        let task = Arc::clone(&task);
                        let name = Arc::clone(&name);
                        let stats = Arc::clone(&stats);
                        tracker.spawn(async move {
                            let _guard = guard;
                            let tick = async move { (*task)().await };
                            let failure = match AssertUnwindSafe(tick).catch_unwind().await {
                                Ok(Ok(())) => None,
                                Ok(Err(e)) => Some(e.to_string()),
                                Err(_) => Some("tick panicked".to_string()),
                            };
                            if let Some(error) = failure {
                                stats.failed.fetch_add(1, Ordering::Relaxed);
                                metrics::counter!("craftwatch_poll_failures_total", "task" => name.to_string())
                                    .increment(1);
                                tracing::warn!(task = %name, error = %error, "Polling tick failed");
                            }
                        });
                    }
                }
            }
        });

        handle
    }

    /// Number of polling loops and in-flight ticks still alive.
    pub fn active_tasks(&self) -> usize {
        self.tracker.len()
    }

    /// Cancel every task scheduled here.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// Wait until every loop and in-flight tick has ended.
    /// Call after [`shutdown`](Self::shutdown).
    pub async fn wait(&self) {
        self.tracker.close();
        self.tracker.wait().await;
    }
}
