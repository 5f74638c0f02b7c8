//! Start/stop commands for the event handler

use crate::cli::query::{status_output, CliResult};
use crate::cli::{connect, ConnectArgs};
use crate::client::BackendClient;

/// Which transition to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerAction {
    Start,
    Stop,
}

/// Request the transition, then report the status the backend now shows.
///
/// A failed request is not an error here: the status that follows shows the
/// unchanged state.
pub async fn run_action(client: &BackendClient, action: HandlerAction) -> CliResult {
    let result = match action {
        HandlerAction::Start => client.start_handler().await,
        HandlerAction::Stop => client.stop_handler().await,
    };
    if let Err(e) = result {
        tracing::warn!(action = ?action, error = %e, "Event handler request failed");
    }
    status_output(client, false).await
}

/// Handle `craftwatch start` / `craftwatch stop`
pub async fn handle_action(args: &ConnectArgs, action: HandlerAction) -> CliResult {
    let (_, client) = connect(args)?;
    run_action(&client, action).await
}
