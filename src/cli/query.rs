//! One-shot read commands: calendar, status, health, winners, events, logs

use crate::cli::{connect, EventsArgs, LogsArgs, OutputArgs};
use crate::client::{format_log_entries, pretty_json, BackendClient, ClientError, HandlerState};
use crate::dashboard::view::{
    event_json, format_calendar_table, format_handler, format_health, format_winners_table,
};
use crate::health::{HealthBoard, HealthProbe};
use chrono::{DateTime, Utc};
use serde_json::json;

pub type CliResult = Result<String, Box<dyn std::error::Error>>;

fn to_json(value: &serde_json::Value) -> CliResult {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Calendar as a table or JSON, classified at `now`.
pub async fn calendar_output(
    client: &BackendClient,
    json: bool,
    now: DateTime<Utc>,
) -> CliResult {
    let events = client.calendar().await?;
    if json {
        let rows: Vec<_> = events.iter().map(|e| event_json(e, now)).collect();
        return to_json(&json!({ "events": rows }));
    }
    if events.is_empty() {
        return Ok("No events scheduled".to_string());
    }
    Ok(format_calendar_table(&events, now))
}

/// Handler status card. A failed fetch shows as the unknown state.
pub async fn status_output(client: &BackendClient, json: bool) -> CliResult {
    let (state, error) = match client.handler_status().await {
        Ok(state) => (state, None),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch event handler status");
            (HandlerState::Unknown, Some(e.to_string()))
        }
    };

    if json {
        return to_json(&json!({ "status": state, "error": error }));
    }
    let mut output = format_handler(state);
    if let Some(error) = error {
        output.push_str(&format!("\n  ({})", error));
    }
    Ok(output)
}

/// Probe both dependencies once.
pub async fn health_output(client: &BackendClient, json: bool) -> CliResult {
    let probe = HealthProbe::new(client.clone());
    let mut board = HealthBoard::new();
    board.record_all(probe.probe_all().await);

    if json {
        return to_json(&json!({
            "overall": board.overall(),
            "results": board.results(),
        }));
    }
    Ok(format_health(&board))
}

/// Event results table, skipping unreadable result files.
pub async fn winners_output(client: &BackendClient, json: bool) -> CliResult {
    let records = client.winners().await?;
    if json {
        return to_json(&json!({ "winners": records }));
    }
    if records.is_empty() {
        return Ok("No results yet".to_string());
    }
    Ok(format_winners_table(&records))
}

/// Event file list, or one file's content pretty-printed.
pub async fn events_output(
    client: &BackendClient,
    name: Option<&str>,
) -> Result<String, ClientError> {
    match name {
        Some(name) => Ok(pretty_json(&client.event_json_content(name).await?)),
        None => {
            let files = client.event_files().await?;
            if files.is_empty() {
                return Ok("No event files".to_string());
            }
            Ok(files.join("\n"))
        }
    }
}

/// Recent database logs, or a log file's raw content.
pub async fn logs_output(client: &BackendClient, name: Option<&str>) -> Result<String, ClientError> {
    match name {
        Some(name) => client.log_content(name).await,
        None => Ok(format_log_entries(&client.logs().await?)),
    }
}

/// Handle `craftwatch calendar`
pub async fn handle_calendar(args: &OutputArgs) -> CliResult {
    let (_, client) = connect(&args.connect)?;
    calendar_output(&client, args.json, Utc::now()).await
}

/// Handle `craftwatch status`
pub async fn handle_status(args: &OutputArgs) -> CliResult {
    let (_, client) = connect(&args.connect)?;
    status_output(&client, args.json).await
}

/// Handle `craftwatch health`
pub async fn handle_health(args: &OutputArgs) -> CliResult {
    let (_, client) = connect(&args.connect)?;
    health_output(&client, args.json).await
}

/// Handle `craftwatch winners`
pub async fn handle_winners(args: &OutputArgs) -> CliResult {
    let (_, client) = connect(&args.connect)?;
    winners_output(&client, args.json).await
}

/// Handle `craftwatch events`
pub async fn handle_events(args: &EventsArgs) -> CliResult {
    let (_, client) = connect(&args.connect)?;
    Ok(events_output(&client, args.name.as_deref()).await?)
}

/// Handle `craftwatch logs`
pub async fn handle_logs(args: &LogsArgs) -> CliResult {
    let (_, client) = connect(&args.connect)?;
    Ok(logs_output(&client, args.name.as_deref()).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn unreachable() -> BackendClient {
        BackendClient::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap()
    }

    #[test]
    fn test_to_json_pretty_prints() {
        let output = to_json(&json!({ "winners": [] })).unwrap();
        assert_eq!(output, "{\n  \"winners\": []\n}");
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_client_error_kind() {
        let err = calendar_output(&unreachable(), true, Utc::now())
            .await
            .unwrap_err();
        let client_error = err.downcast_ref::<ClientError>().unwrap();
        assert!(client_error.is_transport());
    }

    #[tokio::test]
    async fn test_status_failure_is_reported_not_raised() {
        let output = status_output(&unreachable(), true).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["status"], "unknown");
        assert!(value["error"].as_str().unwrap().starts_with("connection failed"));
    }
}
