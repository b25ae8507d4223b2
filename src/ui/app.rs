//! Arena - wires the controls, the view, the store and the turn loops
//!
//! # Lifecycle
//!
//! 1. [`Arena::restore`] reads the store once at startup. A saved game is
//!    replayed and resumed after the resume delay; a corrupt one is cleared
//!    and the start prompt shown instead.
//! 2. `start` resets the board, clears the store and spawns a fresh loop.
//! 3. `new` resets and clears without starting; a loop still waiting on a
//!    reply finds itself stale when the reply arrives and exits.
//! 4. When a game ends in checkmate or a draw the start prompt comes back.
//!
//! End of input lets the current game play out; only `quit` cuts it short.
//!
//! In replay mode the same controls drive the scripted loop, and the store is
//! never read or written.

use std::future::Future;
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::core::config::TurnTiming;
use crate::core::session_persistence::GameStore;
use crate::game::ai::{Players, ScriptedProvider};
use crate::game::session::SharedSession;
use crate::game::turn_loop::{StopReason, TurnLoop};
use crate::ui::controls::{parse_command, Command, HELP};
use crate::ui::view::{Frame, GameView};

/// What the arena's loops play
#[derive(Debug, Clone)]
pub enum ArenaMode {
    /// Remote providers, with persistence
    Play,
    /// Fixed move list, no persistence
    Replay(ScriptedProvider),
}

/// Application state behind the controls
pub struct Arena {
    session: SharedSession,
    players: Arc<Players>,
    view: Arc<dyn GameView>,
    store: Arc<GameStore>,
    timing: TurnTiming,
    mode: ArenaMode,
    task: Option<JoinHandle<StopReason>>,
}

impl Arena {
    pub fn new(
        players: Players,
        view: Arc<dyn GameView>,
        store: GameStore,
        timing: TurnTiming,
        mode: ArenaMode,
    ) -> Self {
        Self {
            session: SharedSession::default(),
            players: Arc::new(players),
            view,
            store: Arc::new(store),
            timing,
            mode,
            task: None,
        }
    }

    pub fn session(&self) -> &SharedSession {
        &self.session
    }

    pub fn store(&self) -> &GameStore {
        &self.store
    }

    fn turn_loop(&self) -> TurnLoop {
        TurnLoop::new(
            self.session.clone(),
            self.players.clone(),
            self.view.clone(),
            self.store.clone(),
            self.timing.clone(),
        )
    }

    /// Spawn a loop; a game that finishes brings the start prompt back
    fn spawn_loop<F>(&self, turn_loop: F) -> JoinHandle<StopReason>
    where
        F: Future<Output = StopReason> + Send + 'static,
    {
        let view = self.view.clone();
        tokio::spawn(async move {
            let reason = turn_loop.await;
            if reason == StopReason::GameOver {
                view.show_start_prompt();
            }
            reason
        })
    }

    fn redraw(&self) {
        let frame = Frame::capture(&self.session.lock(), &self.players);
        self.view.show_frame(&frame);
    }

    /// Resume a saved game if there is one; returns true when resumed
    pub fn restore(&mut self) -> bool {
        if matches!(self.mode, ArenaMode::Replay(_)) {
            self.redraw();
            self.view.show_start_prompt();
            return false;
        }

        let Some(saved) = self.store.load() else {
            self.redraw();
            self.view.show_start_prompt();
            return false;
        };

        let resumed = self.session.lock().resume(&saved);
        match resumed {
            Ok(generation) => {
                info!(
                    "[ARENA] Resuming saved game (generation {}): {}",
                    generation, saved.pgn
                );
                self.redraw();
                let turn_loop = self.turn_loop();
                self.task = Some(self.spawn_loop(turn_loop.run_resumed()));
                true
            }
            Err(e) => {
                warn!("[ARENA] Saved game could not be restored: {}", e);
                self.store.clear();
                self.session.lock().reset();
                self.redraw();
                self.view.show_start_prompt();
                false
            }
        }
    }

    /// Fresh game with a new loop
    pub fn start(&mut self) {
        let generation = self.session.lock().start();
        self.view.hide_thinking();
        info!("[ARENA] Starting game (generation {})", generation);

        let turn_loop = self.turn_loop();
        let task = match &self.mode {
            ArenaMode::Play => {
                self.store.clear();
                self.redraw();
                self.spawn_loop(turn_loop.run())
            }
            ArenaMode::Replay(script) => {
                self.redraw();
                self.spawn_loop(turn_loop.run_scripted(script.clone()))
            }
        };
        self.task = Some(task);
    }

    /// Reset button: stop, clear and go back to the start prompt
    pub fn new_game(&mut self) {
        self.session.lock().reset();
        if matches!(self.mode, ArenaMode::Play) {
            self.store.clear();
        }
        self.view.hide_thinking();
        self.redraw();
        self.view.show_start_prompt();
    }

    /// Apply one command; returns false when the arena should exit
    pub fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::Start => self.start(),
            Command::New => self.new_game(),
            Command::Flip => self.view.flip_board(),
            Command::Resize(width) => self.view.resize_board(width),
            Command::Help => println!("{}", HELP),
            Command::Quit => return false,
        }
        true
    }

    /// Read commands until `quit` or end of input
    ///
    /// With `autostart`, a game is started unless one was resumed. `quit`
    /// stops the running game; end of input waits for it to finish.
    pub async fn run<R>(mut self, input: R, autostart: bool) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let resumed = self.restore();
        if autostart && !resumed {
            self.start();
        }

        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            match parse_command(&line) {
                None => continue,
                Some(Ok(command)) => {
                    if !self.handle(command) {
                        self.shutdown().await;
                        return Ok(());
                    }
                }
                Some(Err(e)) => self.view.show_error(&e.to_string()),
            }
        }

        if let Some(reason) = self.wait().await {
            info!("[ARENA] Input closed; game ended: {:?}", reason);
        }
        Ok(())
    }

    /// Stop the session and wait for the loop to notice
    pub async fn shutdown(&mut self) {
        self.session.lock().stop();
        if let Some(task) = self.task.take() {
            task.abort();
            match task.await {
                Ok(reason) => info!("[ARENA] Loop ended: {:?}", reason),
                Err(e) if e.is_cancelled() => info!("[ARENA] Loop cancelled"),
                Err(e) => warn!("[ARENA] Loop task failed: {}", e),
            }
        }
    }

    /// Wait for the current loop to end on its own
    pub async fn wait(&mut self) -> Option<StopReason> {
        let task = self.task.take()?;
        task.await.ok()
    }
}
