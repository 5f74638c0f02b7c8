//! Terminal rendering of dashboard state.
//!
//! Rendering is a pure function of a [`DashboardState`] and the current
//! time. Event status is classified here, at render time, and never stored.

use super::state::{DashboardState, LogSource, Panel, PanelData};
use crate::calendar::{Event, EventStatus};
use crate::client::{HandlerState, WinnerRecord};
use crate::health::{Dependency, HealthBoard};
use chrono::{DateTime, Local, Utc};
use colored::{ColoredString, Colorize};
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde_json::json;
use std::fmt::Write;

fn local_time(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

fn colored_status(status: EventStatus) -> ColoredString {
    match status {
        EventStatus::Future => status.label().cyan(),
        EventStatus::InProgress => status.label().green().bold(),
        EventStatus::Over => status.label().dimmed(),
    }
}

fn section(output: &mut String, title: &str) {
    writeln!(output).unwrap();
    writeln!(output, "{}", title.bold().underline()).unwrap();
}

/// Placeholder text for a panel that has no value to show.
fn panel_notice<T>(panel: &Panel<T>, what: &str) -> Option<String> {
    match &panel.data {
        PanelData::Loading => Some("Loading...".dimmed().to_string()),
        PanelData::Failed(error) => {
            Some(format!("Error loading {}: {}", what, error).red().to_string())
        }
        PanelData::Ready(_) => None,
    }
}

/// Calendar table with each status classified against `now`.
pub fn format_calendar_table(events: &[Event], now: DateTime<Utc>) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Event", "Start", "End", "Status"]);

    for event in events {
        table.add_row(vec![
            Cell::new(&event.name),
            Cell::new(local_time(event.start)),
            Cell::new(local_time(event.end)),
            Cell::new(colored_status(event.status_at(now))),
        ]);
    }

    table.to_string()
}

/// Results table, one row per finished event.
pub fn format_winners_table(records: &[WinnerRecord]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Event", "Date", "Leaders", "Final Score"]);

    for record in records {
        table.add_row(vec![
            Cell::new(&record.event),
            Cell::new(&record.date),
            Cell::new(record.leaders_line()),
            Cell::new(record.score_display()),
        ]);
    }

    table.to_string()
}

/// Event handler status card.
pub fn format_handler(state: HandlerState) -> String {
    let label = match state {
        HandlerState::Running => state.label().green().bold(),
        HandlerState::Stopped => state.label().yellow().bold(),
        HandlerState::Unknown => state.label().red().bold(),
    };
    format!(
        "{} Event Handler: {}\n  {}",
        state.icon(),
        label,
        state.description()
    )
}

/// Overall verdict plus one row per dependency.
pub fn format_health(board: &HealthBoard) -> String {
    let mut output = String::new();
    let overall = board.overall();
    let summary = if overall.all_healthy {
        overall.summary().green().bold()
    } else {
        overall.summary().red().bold()
    };
    writeln!(output, "{}", summary).unwrap();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Dependency", "Status", "Response Time", "Last Check", "Error"]);

    for dependency in Dependency::ALL {
        let row = match board.get(dependency) {
            Some(result) => {
                let label = dependency.status_label(result);
                let status = if result.healthy {
                    format!("✓ {}", label).green()
                } else {
                    format!("✗ {}", label).red()
                };
                vec![
                    Cell::new(dependency.display_name()),
                    Cell::new(status),
                    Cell::new(
                        result
                            .latency_ms
                            .map(|ms| format!("{}ms", ms))
                            .unwrap_or_else(|| "-".to_string()),
                    ),
                    Cell::new(local_time(result.checked_at)),
                    Cell::new(result.error.as_deref().unwrap_or("")),
                ]
            }
            None => vec![
                Cell::new(dependency.display_name()),
                Cell::new("? Checking...".yellow()),
                Cell::new("-"),
                Cell::new("-"),
                Cell::new(""),
            ],
        };
        table.add_row(row);
    }

    write!(output, "{}", table).unwrap();
    output
}

fn format_file_list<'a>(
    names: impl IntoIterator<Item = &'a str>,
    selected: Option<&str>,
) -> String {
    let mut output = String::new();
    for name in names {
        if Some(name) == selected {
            writeln!(output, "  {} {}", "▶".green(), name.bold()).unwrap();
        } else {
            writeln!(output, "    {}", name).unwrap();
        }
    }
    output
}

/// Full dashboard frame.
pub fn render(state: &DashboardState, now: DateTime<Utc>) -> String {
    let mut output = String::new();
    writeln!(
        output,
        "{}  {}",
        "craftwatch".bold(),
        local_time(now).dimmed()
    )
    .unwrap();

    section(&mut output, "Event Handler");
    match state.handler_state() {
        Some(handler) => writeln!(output, "{}", format_handler(handler)).unwrap(),
        None => writeln!(output, "{}", "Loading...".dimmed()).unwrap(),
    }

    section(&mut output, "Health");
    writeln!(output, "{}", format_health(&state.health)).unwrap();

    section(&mut output, "Calendar");
    match (&state.calendar.data, panel_notice(&state.calendar, "calendar data")) {
        (PanelData::Ready(events), _) if events.is_empty() => {
            writeln!(output, "No events scheduled").unwrap()
        }
        (PanelData::Ready(events), _) => {
            writeln!(output, "{}", format_calendar_table(events, now)).unwrap()
        }
        (_, Some(notice)) => writeln!(output, "{}", notice).unwrap(),
        (_, None) => {}
    }

    section(&mut output, "Event Files");
    let selected_event = state.selection.event_file.as_deref();
    match state.event_files.value() {
        Some(files) => output.push_str(&format_file_list(
            files.iter().map(String::as_str),
            selected_event,
        )),
        None => {
            if let Some(notice) = panel_notice(&state.event_files, "event files") {
                writeln!(output, "{}", notice).unwrap();
            }
        }
    }
    if let Some(name) = selected_event {
        writeln!(output, "{}", format!("── {} ──", name).dimmed()).unwrap();
        match state.event_content.value() {
            Some(content) => writeln!(output, "{}", content).unwrap(),
            None => {
                if let Some(notice) = panel_notice(&state.event_content, "event JSON file") {
                    writeln!(output, "{}", notice).unwrap();
                }
            }
        }
    }

    section(&mut output, "Logs");
    let database = match &state.logs.data {
        PanelData::Ready(entries) => {
            format!("{} ({} entries)", LogSource::Database.label(), entries.len())
        }
        _ => LogSource::Database.label().to_string(),
    };
    let selected_log = state.selection.log.as_ref();
    let mut sources = vec![database.as_str()];
    if let Some(LogSource::File(name)) = selected_log {
        sources.push(name.as_str());
    }
    let selected_label = match selected_log {
        Some(LogSource::Database) => Some(database.as_str()),
        Some(LogSource::File(name)) => Some(name.as_str()),
        None => None,
    };
    output.push_str(&format_file_list(sources, selected_label));
    if let Some(error) = state.logs.error() {
        writeln!(output, "{}", format!("Error loading logs: {}", error).red()).unwrap();
    }
    if let Some(source) = selected_log {
        writeln!(output, "{}", format!("── {} ──", source).dimmed()).unwrap();
        match state.log_content.value() {
            Some(content) => writeln!(output, "{}", content).unwrap(),
            None => {
                if let Some(notice) = panel_notice(&state.log_content, "log") {
                    writeln!(output, "{}", notice).unwrap();
                }
            }
        }
    }

    section(&mut output, "Event Winners");
    match (&state.winners.data, panel_notice(&state.winners, "event results")) {
        (PanelData::Ready(records), _) if records.is_empty() => {
            writeln!(output, "No results yet").unwrap()
        }
        (PanelData::Ready(records), _) => {
            writeln!(output, "{}", format_winners_table(records)).unwrap()
        }
        (_, Some(notice)) => writeln!(output, "{}", notice).unwrap(),
        (_, None) => {}
    }

    output
}

/// One calendar event with its status at `now`.
pub fn event_json(event: &Event, now: DateTime<Utc>) -> serde_json::Value {
    json!({
        "name": event.name,
        "start": event.start,
        "end": event.end,
        "status": event.status_at(now),
    })
}

/// Machine-readable dashboard state with event status derived at `now`.
pub fn render_json(state: &DashboardState, now: DateTime<Utc>) -> serde_json::Value {
    let calendar = match &state.calendar.data {
        PanelData::Ready(events) => {
            let rows: Vec<_> = events.iter().map(|e| event_json(e, now)).collect();
            json!({ "state": "ready", "events": rows })
        }
        other => serde_json::to_value(other).unwrap_or_default(),
    };

    json!({
        "generated_at": now,
        "selection": state.selection,
        "handler": state.handler_state(),
        "health": {
            "overall": state.health.overall(),
            "results": state.health.results(),
        },
        "calendar": calendar,
        "event_files": state.event_files,
        "event_content": state.event_content,
        "logs": state.logs,
        "log_content": state.log_content,
        "winners": state.winners,
    })
}
