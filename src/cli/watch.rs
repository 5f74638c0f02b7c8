//! Watch command implementation
//!
//! Runs every panel on its polling interval, redraws the terminal on a fixed
//! cadence and reads one-word commands from stdin.

use crate::cli::{connect, WatchArgs};
use crate::dashboard::view::{render, render_json};
use crate::dashboard::{DashboardController, LogSource};
use crate::scheduler::PollingScheduler;
use chrono::Utc;
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

const CLEAR_SCREEN: &str = "\x1B[2J\x1B[H";

/// A line typed into the running dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchCommand {
    Start,
    Stop,
    Event(String),
    Log(String),
    DbLog,
    Clear,
    Quit,
}

/// Parse one stdin line. Unknown or incomplete input yields `None`.
pub fn parse_command(line: &str) -> Option<WatchCommand> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match (word.to_ascii_lowercase().as_str(), rest) {
        ("start", "") => Some(WatchCommand::Start),
        ("stop", "") => Some(WatchCommand::Stop),
        ("event", name) if !name.is_empty() => Some(WatchCommand::Event(name.to_string())),
        ("log", name) if !name.is_empty() => Some(WatchCommand::Log(name.to_string())),
        ("dblog", "") => Some(WatchCommand::DbLog),
        ("clear", "") => Some(WatchCommand::Clear),
        ("quit" | "q" | "exit", "") => Some(WatchCommand::Quit),
        _ => None,
    }
}

/// Run a command against the controller without blocking the input loop.
fn dispatch(controller: &DashboardController, command: WatchCommand) {
    let controller = controller.clone();
    tokio::spawn(async move {
        let result = match command {
            WatchCommand::Start => controller.start_handler().await,
            WatchCommand::Stop => controller.stop_handler().await,
            WatchCommand::Event(name) => controller.select_event_file(name).await,
            WatchCommand::Log(name) => controller.select_log(LogSource::File(name)).await,
            WatchCommand::DbLog => controller.select_log(LogSource::Database).await,
            WatchCommand::Clear => {
                controller.clear_selection();
                Ok(())
            }
            WatchCommand::Quit => Ok(()),
        };
        if let Err(e) = result {
            tracing::debug!(error = %e, "Command refresh failed");
        }
    });
}

/// Wait for SIGINT or SIGTERM, then cancel.
async fn shutdown_signal(cancel_token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install CTRL+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
        _ = cancel_token.cancelled() => {}
    }

    cancel_token.cancel();
}

fn draw(controller: &DashboardController, json: bool) -> std::io::Result<()> {
    let state = controller.snapshot();
    let mut stdout = std::io::stdout().lock();
    if json {
        writeln!(stdout, "{}", render_json(&state, Utc::now()))?;
        return stdout.flush();
    }
    write!(stdout, "{}{}", CLEAR_SCREEN, render(&state, Utc::now()))?;
    writeln!(
        stdout,
        "\ncommands: start | stop | event <file> | log <file> | dblog | clear | quit"
    )?;
    stdout.flush()
}

/// Main watch command handler
pub async fn run_watch(args: WatchArgs) -> Result<(), Box<dyn std::error::Error>> {
    // 1. Config, tracing, client
    let (config, client) = connect(&args.connect)?;
    tracing::info!(backend = %client.base_url(), "Starting craftwatch");

    // 2. Controller and polling
    let controller = DashboardController::new(client, config.polling.clone());
    let cancel_token = CancellationToken::new();
    let scheduler = PollingScheduler::with_cancellation(&cancel_token);
    let handles = controller.spawn_polling(&scheduler);
    tracing::debug!(tasks = handles.len(), "Polling started");

    // 3. Initial selection
    if let Some(name) = args.event_file {
        dispatch(&controller, WatchCommand::Event(name));
    }
    if let Some(name) = args.log {
        dispatch(&controller, WatchCommand::Log(name));
    } else if args.db_logs {
        dispatch(&controller, WatchCommand::DbLog);
    }

    tokio::spawn(shutdown_signal(cancel_token.clone()));

    // 4. Redraw and input loop
    let mut redraw = tokio::time::interval(Duration::from_millis(args.refresh_ms.max(50)));
    redraw.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            _ = cancel_token.cancelled() => break,
            _ = redraw.tick() => draw(&controller, args.json)?,
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) => match parse_command(&line) {
                    Some(WatchCommand::Quit) => break,
                    Some(command) => {
                        tracing::debug!(?command, "Command received");
                        dispatch(&controller, command);
                        draw(&controller, args.json)?;
                    }
                    None if line.trim().is_empty() => {}
                    None => tracing::warn!(input = %line.trim(), "Unknown command"),
                },
                Ok(None) => stdin_open = false,
                Err(e) => {
                    tracing::warn!(error = %e, "Stopped reading commands");
                    stdin_open = false;
                }
            },
        }
    }

    // 5. Cleanup
    tracing::info!("Waiting for in-flight refreshes to finish");
    scheduler.shutdown();
    scheduler.wait().await;
    tracing::info!("craftwatch stopped");
    Ok(())
}
