//! Background render thread for non-blocking UI rendering.
//!
//! The render thread owns the Terminal and draws snapshots of AppState
//! sent from the event loop. The loop stays responsive to actor events,
//! push messages, and input while a frame is being drawn.

use std::io;
use std::sync::mpsc::{self, SyncSender, TrySendError};
use std::thread::{self, JoinHandle};

use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use super::state::AppState;

enum RenderCommand {
    Frame(Box<AppState>),
    Shutdown,
}

/// Handle to the background render thread.
pub struct RenderThread {
    cmd_tx: SyncSender<RenderCommand>,
    handle: Option<JoinHandle<()>>,
}

impl RenderThread {
    /// Spawn the render thread, which owns terminal setup and teardown.
    ///
    /// The frame channel has capacity 1: only the latest state matters,
    /// stale frames are dropped.
    pub fn spawn() -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::sync_channel::<RenderCommand>(1);

        let handle = thread::spawn(move || {
            if let Err(e) = enable_raw_mode() {
                tracing::error!("failed to enable raw mode: {}", e);
                return;
            }

            let mut stdout = io::stdout();
            if let Err(e) = execute!(stdout, EnterAlternateScreen) {
                tracing::error!("failed to enter alternate screen: {}", e);
                disable_raw_mode().ok();
                return;
            }

            let backend = CrosstermBackend::new(stdout);
            let mut terminal = match Terminal::new(backend) {
                Ok(t) => t,
                Err(e) => {
                    tracing::error!("failed to create terminal: {}", e);
                    disable_raw_mode().ok();
                    return;
                }
            };

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    RenderCommand::Frame(state) => {
                        if let Err(e) = terminal.draw(|f| crate::ui::render(f, &state)) {
                            tracing::error!("render error: {}", e);
                        }
                    }
                    RenderCommand::Shutdown => break,
                }
            }

            disable_raw_mode().ok();
            execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
        });

        Ok(Self {
            cmd_tx,
            handle: Some(handle),
        })
    }

    /// Queue a frame without blocking. If the thread is mid-draw the
    /// pending frame is simply skipped; the next call carries newer state.
    pub fn render(&self, state: AppState) {
        match self.cmd_tx.try_send(RenderCommand::Frame(Box::new(state))) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                tracing::trace!("render thread busy, skipping frame");
            }
            Err(TrySendError::Disconnected(_)) => {
                tracing::error!("render thread disconnected");
            }
        }
    }

    /// Shut down the render thread and wait for terminal teardown.
    pub fn shutdown(mut self) {
        let _ = self.cmd_tx.send(RenderCommand::Shutdown);
        if let Some(handle) = self.handle.take() {
            handle.join().ok();
        }
    }
}
