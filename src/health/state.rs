//! Per-dependency health results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// External service whose health the dashboard reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dependency {
    /// The Minecraft server process
    GameServer,
    /// The RCON connection used to drive the server
    RemoteConsole,
}

impl Dependency {
    /// Every dependency the dashboard tracks.
    pub const ALL: [Dependency; 2] = [Dependency::GameServer, Dependency::RemoteConsole];

    pub fn display_name(&self) -> &'static str {
        match self {
            Dependency::GameServer => "Minecraft Server",
            Dependency::RemoteConsole => "RCON",
        }
    }

    /// Path segment under `/api/health/`.
    pub fn endpoint_name(&self) -> &'static str {
        match self {
            Dependency::GameServer => "minecraft",
            Dependency::RemoteConsole => "rcon",
        }
    }

    /// Card label for a result of this dependency.
    pub fn status_label(&self, result: &HealthResult) -> &'static str {
        match (self, result.healthy, result.reachable) {
            (_, false, false) => "Error",
            (Dependency::GameServer, true, _) => "Online",
            (Dependency::GameServer, false, _) => "Offline",
            (Dependency::RemoteConsole, true, _) => "Connected",
            (Dependency::RemoteConsole, false, _) => "Failed",
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Outcome of one probe. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthResult {
    pub dependency: Dependency,
    pub healthy: bool,
    /// Whether the health endpoint answered with a readable report. A
    /// reachable endpoint may still report its dependency as down.
    pub reachable: bool,
    pub latency_ms: Option<u64>,
    pub error: Option<String>,
    pub checked_at: DateTime<Utc>,
}

impl HealthResult {
    pub fn healthy(dependency: Dependency, latency_ms: u64) -> Self {
        Self {
            dependency,
            healthy: true,
            reachable: true,
            latency_ms: Some(latency_ms),
            error: None,
            checked_at: Utc::now(),
        }
    }

    /// The endpoint answered and reported the dependency as down.
    pub fn unhealthy(dependency: Dependency, latency_ms: u64, error: Option<String>) -> Self {
        Self {
            dependency,
            healthy: false,
            reachable: true,
            latency_ms: Some(latency_ms),
            error: Some(
                error
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| "Connection failed".to_string()),
            ),
            checked_at: Utc::now(),
        }
    }

    /// The probe itself failed: transport, HTTP status or decode error.
    pub fn failed(dependency: Dependency, latency_ms: Option<u64>, error: impl fmt::Display) -> Self {
        let mut error = error.to_string();
        if error.is_empty() {
            error = "unknown error".to_string();
        }
        Self {
            dependency,
            healthy: false,
            reachable: false,
            latency_ms,
            error: Some(error),
            checked_at: Utc::now(),
        }
    }
}
