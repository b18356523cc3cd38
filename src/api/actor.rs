//! API actor: owns the background status poll and executes commands.

use tokio::sync::mpsc;
use tokio::time::{Duration, interval, MissedTickBehavior};

use crate::api::client::FlowPrintClient;
use crate::api::error::ApiError;
use crate::api::types::{ApiResponse, ReprintRequest, ServiceConfig, StatusSnapshot};
use crate::constants::STATUS_POLL_PERIOD_SECS;

/// Commands the application sends to the actor.
#[derive(Debug)]
pub enum ApiCommand {
    FetchStatus,
    FetchConfig,
    SaveConfig(Box<ServiceConfig>),
    ResetConfig,
    TestConnection(Box<ServiceConfig>),
    StartService,
    StopService,
    ManualCheck,
    Reprint(ReprintRequest),
    ClearCache,
    FetchLogs,
    DownloadLogs,
    Shutdown,
}

/// What a finished command produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    SaveConfig,
    ResetConfig,
    TestConnection,
    StartService,
    StopService,
    ManualCheck,
    Reprint,
    ClearCache,
}

impl ActionKind {
    pub fn label(self) -> &'static str {
        match self {
            ActionKind::SaveConfig => "Save settings",
            ActionKind::ResetConfig => "Reset settings",
            ActionKind::TestConnection => "Connection test",
            ActionKind::StartService => "Start service",
            ActionKind::StopService => "Stop service",
            ActionKind::ManualCheck => "Manual check",
            ActionKind::Reprint => "Reprint",
            ActionKind::ClearCache => "Clear cache",
        }
    }
}

/// Events the actor reports back to the event loop.
#[derive(Debug)]
pub enum ApiEvent {
    /// A status snapshot arrived from the poll channel.
    Status(StatusSnapshot),
    /// The background poll failed; previous state stays on screen.
    PollFailed(String),
    /// A server config document arrived.
    Config(Box<ServiceConfig>),
    /// A command endpoint succeeded.
    ActionDone(ActionKind, ApiResponse),
    /// A command endpoint failed; nothing on screen changes.
    ActionFailed(ActionKind, String),
    /// The recent log lines arrived.
    Logs(Vec<String>),
    /// The raw downloadable log text arrived.
    LogText(String),
    /// Fetching the config or logs failed.
    FetchFailed(String),
}

/// Handle to a running API actor.
pub struct ApiActorHandle {
    pub cmd_tx: mpsc::Sender<ApiCommand>,
    pub event_rx: mpsc::Receiver<ApiEvent>,
}

/// Spawn the API actor and return a handle to control it.
///
/// The actor polls `/api/status` every five seconds regardless of the
/// server's mail-check cadence, and serves commands in between.
pub fn spawn_api_actor(client: FlowPrintClient) -> ApiActorHandle {
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (event_tx, event_rx) = mpsc::channel(128);

    tokio::spawn(api_actor(client, cmd_rx, event_tx));

    ApiActorHandle { cmd_tx, event_rx }
}

async fn api_actor(
    client: FlowPrintClient,
    mut cmd_rx: mpsc::Receiver<ApiCommand>,
    event_tx: mpsc::Sender<ApiEvent>,
) {
    let mut poll = interval(Duration::from_secs(STATUS_POLL_PERIOD_SECS));
    poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = poll.tick() => {
                match client.fetch_status().await {
                    Ok(snapshot) => {
                        if event_tx.send(ApiEvent::Status(snapshot)).await.is_err() {
                            return;
                        }
                    }
                    Err(e) => {
                        tracing::debug!("status poll failed: {}", e);
                        if event_tx.send(ApiEvent::PollFailed(e.to_string())).await.is_err() {
                            return;
                        }
                    }
                }
            }
            cmd = cmd_rx.recv() => {
                let Some(cmd) = cmd else {
                    tracing::info!("command channel closed, api actor exiting");
                    return;
                };
                if matches!(cmd, ApiCommand::Shutdown) {
                    tracing::info!("api actor shutting down");
                    return;
                }
                if !handle_command(&client, cmd, &event_tx).await {
                    return;
                }
            }
        }
    }
}

/// Execute one command; false when the event channel is gone.
async fn handle_command(
    client: &FlowPrintClient,
    cmd: ApiCommand,
    event_tx: &mpsc::Sender<ApiEvent>,
) -> bool {
    let event = match cmd {
        ApiCommand::FetchStatus => match client.fetch_status().await {
            Ok(snapshot) => ApiEvent::Status(snapshot),
            Err(e) => ApiEvent::PollFailed(e.to_string()),
        },
        ApiCommand::FetchConfig => match client.fetch_config().await {
            Ok(config) => ApiEvent::Config(Box::new(config)),
            Err(e) => ApiEvent::FetchFailed(format!("loading settings failed: {}", e)),
        },
        ApiCommand::SaveConfig(config) => {
            action_event(ActionKind::SaveConfig, client.save_config(&config).await)
        }
        ApiCommand::ResetConfig => {
            action_event(ActionKind::ResetConfig, client.reset_config().await)
        }
        ApiCommand::TestConnection(config) => {
            action_event(ActionKind::TestConnection, client.test_connection(&config).await)
        }
        ApiCommand::StartService => {
            action_event(ActionKind::StartService, client.start_service().await)
        }
        ApiCommand::StopService => {
            action_event(ActionKind::StopService, client.stop_service().await)
        }
        ApiCommand::ManualCheck => {
            action_event(ActionKind::ManualCheck, client.manual_check().await)
        }
        ApiCommand::Reprint(request) => {
            action_event(ActionKind::Reprint, client.reprint(&request).await)
        }
        ApiCommand::ClearCache => {
            action_event(ActionKind::ClearCache, client.clear_cache().await)
        }
        ApiCommand::FetchLogs => match client.fetch_logs().await {
            Ok(logs) => ApiEvent::Logs(logs),
            Err(e) => ApiEvent::FetchFailed(format!("loading logs failed: {}", e)),
        },
        ApiCommand::DownloadLogs => match client.download_logs().await {
            Ok(text) => ApiEvent::LogText(text),
            Err(e) => ApiEvent::FetchFailed(format!("log download failed: {}", e)),
        },
        ApiCommand::Shutdown => return false,
    };

    event_tx.send(event).await.is_ok()
}

fn action_event(kind: ActionKind, result: Result<ApiResponse, ApiError>) -> ApiEvent {
    match result {
        Ok(response) => ApiEvent::ActionDone(kind, response),
        Err(e) => {
            tracing::warn!("{} failed: {}", kind.label(), e);
            ApiEvent::ActionFailed(kind, e.to_string())
        }
    }
}
