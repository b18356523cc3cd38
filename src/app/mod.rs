//! Application core: state, actors, coordination.

mod actions;
mod event_loop;
pub mod render_thread;
pub mod state;

use anyhow::Result;
use std::time::Instant;

use tokio::sync::mpsc;

use render_thread::RenderThread;

use crate::api::actor::{ApiActorHandle, ApiCommand, spawn_api_actor};
use crate::api::client::FlowPrintClient;
use crate::api::push::{PushEvent, spawn_push_channel};
use crate::config::Config;
use crate::credentials::CredentialStore;
use crate::input::KeyBindings;
use crate::status::countdown::CountdownEngine;
use crate::status::reconcile::Reconciler;
use state::AppState;

pub struct App {
    pub(crate) config: Config,
    pub(crate) state: AppState,
    pub(crate) bindings: KeyBindings,
    pub(crate) api: ApiActorHandle,
    pub(crate) push_rx: mpsc::Receiver<PushEvent>,
    pub(crate) reconciler: Reconciler,
    pub(crate) engine: CountdownEngine,
    pub(crate) credentials: CredentialStore,
    /// Last seen jobs_processed counter, for job-completed notifications.
    pub(crate) last_jobs_processed: Option<u64>,
    pub(crate) last_countdown_tick: Instant,
    /// When true, UI needs re-render. Skips renders when nothing changed.
    pub(crate) dirty: bool,
}

impl App {
    /// Wire up the API actor and push channel and queue the initial
    /// status and config fetches. Must run inside a tokio runtime.
    pub fn new(config: Config) -> Result<Self> {
        let client = FlowPrintClient::new(&config.server.url)?;
        let push_rx = spawn_push_channel(client.push_url());
        let api = spawn_api_actor(client);

        let bindings = KeyBindings::new(&config.ui.keybinding_mode);
        let mut state = AppState::default();
        state.help_entries = bindings.all_bindings();

        let mut app = Self {
            config,
            state,
            bindings,
            api,
            push_rx,
            reconciler: Reconciler::new(),
            engine: CountdownEngine::new(),
            credentials: CredentialStore::new(),
            last_jobs_processed: None,
            last_countdown_tick: Instant::now(),
            dirty: true,
        };
        app.send_api(ApiCommand::FetchStatus);
        app.send_api(ApiCommand::FetchConfig);
        Ok(app)
    }

    pub async fn run(&mut self) -> Result<()> {
        let render_thread = RenderThread::spawn()?;
        let result = self.event_loop(&render_thread).await;

        let _ = self.api.cmd_tx.send(ApiCommand::Shutdown).await;
        render_thread.shutdown();
        result
    }

    /// Queue a command without blocking the loop.
    pub(crate) fn send_api(&mut self, cmd: ApiCommand) {
        if let Err(e) = self.api.cmd_tx.try_send(cmd) {
            tracing::warn!("api command dropped: {}", e);
            self.state.notice.error("server busy, try again");
        }
    }
}
