//! Backend connection configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Where the dashboard backend lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the backend, e.g. `http://localhost:5000`
    pub url: String,
    /// Upper bound for every request, including health probes
    pub request_timeout_seconds: u64,
}

impl BackendConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:5000".to_string(),
            request_timeout_seconds: 10,
        }
    }
}
