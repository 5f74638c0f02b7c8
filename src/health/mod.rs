//! Dependency health probing and aggregation.
//!
//! [`HealthProbe`] checks the game server and RCON health endpoints exposed
//! by the backend. Probes never fail: every transport, status or decode
//! problem becomes an unhealthy [`HealthResult`]. [`HealthBoard`] keeps the
//! current result per dependency and derives the [`OverallHealth`] verdict.

mod aggregate;
mod state;


pub use aggregate::*;
pub use state::*;

use crate::client::{BackendClient, ClientError, HealthReport};
use std::time::Instant;

/// Checks dependency health through the backend's health endpoints.
#[derive(Debug, Clone)]
pub struct HealthProbe {
    client: BackendClient,
}

impl HealthProbe {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    /// Check a single dependency.
    pub async fn probe(&self, dependency: Dependency) -> HealthResult {
        let url = self
            .client
            .endpoint(&["api", "health", dependency.endpoint_name()]);
        let start = Instant::now();

        let response = match self
            .client
            .http()
            .get(url)
            .timeout(self.client.timeout())
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                let error = self.client.classify_error(e);
                tracing::warn!(
                    dependency = %dependency,
                    error = %error,
                    "Health probe failed"
                );
                return HealthResult::failed(dependency, None, error);
            }
        };

        let latency_ms = start.elapsed().as_millis() as u64;
        metrics::histogram!("craftwatch_probe_latency_seconds",
            "dependency" => dependency.endpoint_name()
        )
        .record(latency_ms as f64 / 1000.0);

        if !response.status().is_success() {
            return HealthResult::failed(
                dependency,
                Some(latency_ms),
                ClientError::Http(response.status().as_u16()),
            );
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return HealthResult::failed(
                    dependency,
                    Some(latency_ms),
                    self.client.classify_error(e),
                )
            }
        };

        match serde_json::from_str::<HealthReport>(&body) {
            Ok(report) if report.healthy => HealthResult::healthy(dependency, latency_ms),
            Ok(report) => {
                tracing::debug!(
                    dependency = %dependency,
                    error = report.error.as_deref().unwrap_or(""),
                    "Dependency reported unhealthy"
                );
                HealthResult::unhealthy(dependency, latency_ms, report.error)
            }
            Err(e) => HealthResult::failed(
                dependency,
                Some(latency_ms),
                ClientError::Decode(e.to_string()),
            ),
        }
    }

    /// Check every tracked dependency concurrently.
    pub async fn probe_all(&self) -> Vec<HealthResult> {
        futures::future::join_all(Dependency::ALL.into_iter().map(|d| self.probe(d))).await
    }
}
