//! Turn loop
//!
//! Drives one game from the current position until it ends, is reset, or the
//! script runs out. One cycle ([`TurnLoop::advance`]) asks the provider whose
//! turn it is for a move, applies it through the rules engine, redraws,
//! saves, and reports how long to wait before the next cycle. [`TurnLoop::run`]
//! is a plain async loop around it, so there is never more than one request
//! in flight per loop.
//!
//! # Failure Policy
//!
//! Remote providers fail all the time. Any provider error, or a reply that
//! does not resolve to a legal move, leaves the game untouched and yields
//! [`Step::Retry`]; retries never give up. Scripted moves are the
//! opposite: a fixed list gives the same answer every time, so a move that
//! does not resolve, or a list that runs out, stops the loop for good. This
//! holds both for the replay and for a scripted side in a normal game.
//!
//! # Reset While Waiting
//!
//! The loop remembers the session generation it was started for. After every
//! await it re-checks [`GameSession::is_current`]; a reset or restart in the
//! meantime turns the pending result into a no-op and the loop exits with
//! [`StopReason::Stale`].

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use shakmaty::Color;
use tracing::{debug, error, info, warn};

use crate::core::config::TurnTiming;
use crate::core::session_persistence::GameStore;
use crate::game::ai::{Players, ProviderError, ScriptedProvider};
use crate::game::error::GameError;
use crate::game::resources::{final_banner, GameOverState};
use crate::game::session::{GameSession, SharedSession};
use crate::ui::view::{Frame, GameView};

/// Why a turn cycle did not produce a move
#[derive(Debug, thiserror::Error)]
pub enum TurnError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Move(#[from] GameError),
}

impl TurnError {
    /// Whether retrying can never help
    ///
    /// Every failure of a scripted provider is fatal; so is an exhausted
    /// script, whoever reports it.
    pub fn is_fatal(&self, scripted: bool) -> bool {
        scripted
            || matches!(
                self,
                TurnError::Provider(ProviderError::ScriptExhausted { .. })
            )
    }

    fn stop_reason(&self) -> StopReason {
        match self {
            TurnError::Provider(ProviderError::ScriptExhausted { .. }) => {
                StopReason::ScriptExhausted
            }
            _ => StopReason::ScriptFailed,
        }
    }
}

/// Why a loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The session was stopped
    NotRunning,
    /// Checkmate or draw
    GameOver,
    /// The session was reset or restarted under this loop
    Stale,
    /// The scripted replay reached the end of its list without a result
    ScriptExhausted,
    /// A scripted move did not resolve
    ScriptFailed,
}

/// Outcome of one cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A move was played; wait this long before the next cycle
    Next(Duration),
    /// Nothing changed; wait this long and try again
    Retry(Duration),
    Stopped(StopReason),
}

/// One game's turn loop
pub struct TurnLoop {
    session: SharedSession,
    players: Arc<Players>,
    view: Arc<dyn GameView>,
    store: Arc<GameStore>,
    timing: TurnTiming,
    generation: u64,
    /// Consecutive failures, for the retry backoff
    failures: u32,
}

impl TurnLoop {
    /// Loop bound to the session's current generation
    pub fn new(
        session: SharedSession,
        players: Arc<Players>,
        view: Arc<dyn GameView>,
        store: Arc<GameStore>,
        timing: TurnTiming,
    ) -> Self {
        let generation = session.lock().generation();
        Self {
            session,
            players,
            view,
            store,
            timing,
            generation,
            failures: 0,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Classify a session that may not be advanced, or `None` if it may
    fn check_stopped(&self, session: &mut GameSession) -> Option<StopReason> {
        if session.generation() != self.generation {
            return Some(StopReason::Stale);
        }
        if session.game().is_game_over() {
            session.stop();
            return Some(StopReason::GameOver);
        }
        if !session.is_running() {
            return Some(StopReason::NotRunning);
        }
        None
    }

    fn stop(&self, reason: StopReason) -> Step {
        // A stale loop no longer owns the view
        if reason != StopReason::Stale {
            self.view.hide_thinking();
        }
        Step::Stopped(reason)
    }

    /// One remote-provider cycle
    pub async fn advance(&mut self) -> Step {
        let request = {
            let mut session = self.session.lock();
            if let Some(reason) = self.check_stopped(&mut session) {
                drop(session);
                return self.stop(reason);
            }
            session.move_request()
        };

        let side = request.side;
        let provider = self.players.for_side(side);
        self.view.show_thinking(provider.name(), side);
        let reply = provider.get_move(&request).await;

        let scripted = provider.is_scripted();
        let outcome = {
            let mut session = self.session.lock();
            if !session.is_current(self.generation) {
                debug!("[TURN] Discarding result for a stale game");
                return Step::Stopped(StopReason::Stale);
            }
            let outcome = reply
                .map_err(TurnError::from)
                .and_then(|mv| session.apply(&mv).map_err(TurnError::from))
                .map(|record| {
                    (
                        record,
                        GameOverState::from_game(session.game()),
                        Frame::capture(&session, &self.players),
                        session.to_persisted(),
                    )
                });
            if matches!(&outcome, Err(e) if e.is_fatal(scripted)) {
                session.stop();
            }
            outcome
        };

        match outcome {
            Ok((record, state, frame, persisted)) => {
                self.failures = 0;
                info!("[TURN] {} played {}", provider.name(), record.san);
                self.store.save(&persisted);
                self.view.show_frame(&frame);
                if record.is_game_over() {
                    info!("[TURN] {} ({})", frame.status, state.message());
                    self.stop(StopReason::GameOver)
                } else {
                    Step::Next(self.timing.move_delay())
                }
            }
            Err(e) if e.is_fatal(scripted) => {
                error!("[TURN] {} cannot continue: {}", provider.name(), e);
                match e.stop_reason() {
                    StopReason::ScriptExhausted => {
                        self.announce_result(StopReason::ScriptExhausted)
                    }
                    reason => {
                        self.view.show_error("Error: Invalid move in script.");
                        self.stop(reason)
                    }
                }
            }
            Err(e) => {
                error!(
                    "[TURN] Error during {}'s turn. Retrying... {}",
                    provider.name(),
                    e
                );
                let delay = self.timing.retry.delay(self.failures);
                self.failures = self.failures.saturating_add(1);
                Step::Retry(delay)
            }
        }
    }

    /// Run remote-provider cycles until the game stops
    pub async fn run(mut self) -> StopReason {
        loop {
            match self.advance().await {
                Step::Next(delay) | Step::Retry(delay) => tokio::time::sleep(delay).await,
                Step::Stopped(reason) => {
                    info!("[TURN] Loop {} stopped: {:?}", self.generation, reason);
                    return reason;
                }
            }
        }
    }

    /// Wait the resume delay, then [`run`](Self::run)
    pub async fn run_resumed(self) -> StopReason {
        tokio::time::sleep(self.timing.resume_delay()).await;
        self.run().await
    }

    fn think_delay(&self) -> Duration {
        let (min, max) = self.timing.think_range_ms();
        Duration::from_millis(rand::rng().random_range(min..=max))
    }

    fn announce_result(&self, reason: StopReason) -> Step {
        let banner = {
            let session = self.session.lock();
            final_banner(session.game(), |side| self.players.name_for(side))
        };
        info!("[TURN] {}", banner);
        self.view.show_banner(&banner);
        self.stop(reason)
    }

    /// One scripted-replay cycle
    ///
    /// The side to move comes from the rules engine. A cursor whose parity
    /// disagrees with it means the script and the board are out of step,
    /// which is treated like an invalid scripted move.
    pub async fn advance_scripted(&mut self, script: &ScriptedProvider) -> Step {
        let (cursor, side) = {
            let mut session = self.session.lock();
            if let Some(reason) = self.check_stopped(&mut session) {
                drop(session);
                return match reason {
                    StopReason::GameOver => self.announce_result(reason),
                    other => self.stop(other),
                };
            }
            let cursor = session.script_cursor();
            if cursor >= script.len() {
                session.stop();
                drop(session);
                return self.announce_result(StopReason::ScriptExhausted);
            }
            let side = session.game().turn();
            let expected = if cursor % 2 == 0 {
                Color::White
            } else {
                Color::Black
            };
            if expected != side {
                session.stop();
                drop(session);
                return self.fail_script(GameError::ScriptDesync { index: cursor });
            }
            (cursor, side)
        };

        let name = self.players.name_for(side);
        self.view.show_thinking(&name, side);
        tokio::time::sleep(self.think_delay()).await;

        let text = script.move_at(cursor).unwrap_or_default();
        let outcome = {
            let mut session = self.session.lock();
            if !session.is_current(self.generation) {
                return Step::Stopped(StopReason::Stale);
            }
            let outcome = session.apply(text).map(|record| {
                session.advance_script_cursor();
                (record, Frame::capture(&session, &self.players))
            });
            if outcome.is_err() {
                session.stop();
            }
            outcome
        };

        match outcome {
            Ok((record, frame)) => {
                info!("[TURN] {} played {}", name, record.san);
                self.view.show_frame(&frame);
                if record.is_game_over() {
                    self.announce_result(StopReason::GameOver)
                } else {
                    Step::Next(Duration::ZERO)
                }
            }
            Err(e) => {
                warn!("[TURN] Scripted move '{}' rejected: {}", text, e);
                self.fail_script(GameError::InvalidScriptMove {
                    index: cursor,
                    text: text.to_string(),
                })
            }
        }
    }

    /// Report a scripted failure; the caller has already stopped the session
    fn fail_script(&self, err: GameError) -> Step {
        error!("[TURN] {}", err);
        self.view.show_error("Error: Invalid move in script.");
        self.stop(StopReason::ScriptFailed)
    }

    /// Replay `script` until it ends, fails, or the session is reset
    ///
    /// Nothing is written to the store.
    pub async fn run_scripted(mut self, script: ScriptedProvider) -> StopReason {
        loop {
            match self.advance_scripted(&script).await {
                Step::Next(delay) | Step::Retry(delay) => {
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
                Step::Stopped(reason) => {
                    info!("[TURN] Replay {} stopped: {:?}", self.generation, reason);
                    return reason;
                }
            }
        }
    }
}
