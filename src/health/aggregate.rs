//! Overall health verdict from the current per-dependency results.

use super::state::{Dependency, HealthResult};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Derived system verdict. Never stored; recomputed from a [`HealthBoard`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverallHealth {
    pub all_healthy: bool,
    /// Dependencies that are not confirmed healthy, including unknown ones
    pub failing: BTreeSet<Dependency>,
    /// Subset of `failing` with no result yet
    pub unknown: BTreeSet<Dependency>,
}

impl OverallHealth {
    pub fn summary(&self) -> String {
        if self.all_healthy {
            return "All Systems Operational".to_string();
        }
        let issues: Vec<&str> = self.failing.iter().map(|d| d.display_name()).collect();
        format!("Issues Detected: {}", issues.join(", "))
    }
}

/// Combine the latest result per dependency into one verdict.
///
/// Every dependency in [`Dependency::ALL`] is tracked; one without a result
/// counts as failing and is also listed as unknown.
pub fn aggregate(results: &BTreeMap<Dependency, HealthResult>) -> OverallHealth {
    let mut failing = BTreeSet::new();
    let mut unknown = BTreeSet::new();

    for dependency in Dependency::ALL {
        match results.get(&dependency) {
            Some(result) if result.healthy => {}
            Some(_) => {
                failing.insert(dependency);
            }
            None => {
                failing.insert(dependency);
                unknown.insert(dependency);
            }
        }
    }

    OverallHealth {
        all_healthy: failing.is_empty(),
        failing,
        unknown,
    }
}

/// Holds the current result for each dependency.
///
/// A new result supersedes the previous one for its dependency; results are
/// never merged or averaged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HealthBoard {
    results: BTreeMap<Dependency, HealthResult>,
}

impl HealthBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current result for the result's dependency.
    ///
    /// Returns false and keeps the current entry when `result` was checked
    /// before it.
    pub fn record(&mut self, result: HealthResult) -> bool {
        let dependency = result.dependency;
        if let Some(current) = self.results.get(&dependency) {
            if current.checked_at > result.checked_at {
                tracing::debug!(
                    dependency = %dependency,
                    "Discarding stale health result"
                );
                return false;
            }
            if current.healthy != result.healthy {
                tracing::info!(
                    dependency = %dependency,
                    healthy = result.healthy,
                    error = result.error.as_deref().unwrap_or(""),
                    "Dependency health changed"
                );
            }
        } else {
            tracing::info!(
                dependency = %dependency,
                healthy = result.healthy,
                "First health result"
            );
        }
        self.results.insert(dependency, result);
        true
    }

    /// Record several results in one step.
    pub fn record_all(&mut self, results: impl IntoIterator<Item = HealthResult>) {
        for result in results {
            self.record(result);
        }
    }

    pub fn get(&self, dependency: Dependency) -> Option<&HealthResult> {
        self.results.get(&dependency)
    }

    pub fn results(&self) -> &BTreeMap<Dependency, HealthResult> {
        &self.results
    }

    pub fn overall(&self) -> OverallHealth {
        aggregate(&self.results)
    }
}
