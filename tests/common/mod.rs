//! Shared fixtures for integration tests: a recording view and canned providers

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use shakmaty::Color;

use llmchess::core::{GameStore, MemoryStore, TurnTiming};
use llmchess::game::ai::{MoveProvider, MoveRequest, Players, ProviderError, ProviderResult};
use llmchess::game::{SharedSession, TurnLoop};
use llmchess::ui::{Frame, GameView};

/// Everything a view was asked to do, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    StartPrompt,
    Thinking(String, Color),
    HideThinking,
    Frame(String),
    Banner(String),
    Error(String),
    Flip,
    Resize(usize),
}

#[derive(Default)]
pub struct RecordingView {
    events: Mutex<Vec<ViewEvent>>,
}

impl RecordingView {
    pub fn events(&self) -> Vec<ViewEvent> {
        self.events.lock().clone()
    }

    pub fn banners(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ViewEvent::Banner(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ViewEvent::Error(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: ViewEvent) {
        self.events.lock().push(event);
    }
}

impl GameView for RecordingView {
    fn show_start_prompt(&self) {
        self.push(ViewEvent::StartPrompt);
    }

    fn show_thinking(&self, name: &str, side: Color) {
        self.push(ViewEvent::Thinking(name.to_string(), side));
    }

    fn hide_thinking(&self) {
        self.push(ViewEvent::HideThinking);
    }

    fn show_frame(&self, frame: &Frame) {
        self.push(ViewEvent::Frame(frame.status.clone()));
    }

    fn show_banner(&self, text: &str) {
        self.push(ViewEvent::Banner(text.to_string()));
    }

    fn show_error(&self, message: &str) {
        self.push(ViewEvent::Error(message.to_string()));
    }

    fn flip_board(&self) {
        self.push(ViewEvent::Flip);
    }

    fn resize_board(&self, square_width: usize) {
        self.push(ViewEvent::Resize(square_width));
    }
}

/// Provider answering from a queue of canned replies
///
/// `Ok` entries are returned as the move; `Err` entries become a 500 status.
pub struct QueueProvider {
    name: String,
    replies: Mutex<VecDeque<Result<String, u16>>>,
    calls: Arc<AtomicUsize>,
}

impl QueueProvider {
    pub fn new(name: &str, replies: Vec<Result<&str, u16>>) -> Self {
        Self {
            name: name.to_string(),
            replies: Mutex::new(
                replies
                    .into_iter()
                    .map(|r| r.map(str::to_string))
                    .collect(),
            ),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

#[async_trait]
impl MoveProvider for QueueProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get_move(&self, _request: &MoveRequest) -> ProviderResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.replies.lock().pop_front();
        match reply {
            Some(Ok(mv)) => Ok(mv),
            Some(Err(status)) => Err(ProviderError::Status {
                status,
                body: String::from("server error"),
            }),
            None => Err(ProviderError::EmptyReply {
                provider: self.name.clone(),
            }),
        }
    }
}

/// Provider that waits on a notification before answering
pub struct GatedProvider {
    name: String,
    mv: String,
    pub gate: Arc<tokio::sync::Notify>,
}

impl GatedProvider {
    pub fn new(name: &str, mv: &str) -> Self {
        Self {
            name: name.to_string(),
            mv: mv.to_string(),
            gate: Arc::new(tokio::sync::Notify::new()),
        }
    }
}

#[async_trait]
impl MoveProvider for GatedProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get_move(&self, _request: &MoveRequest) -> ProviderResult<String> {
        self.gate.notified().await;
        Ok(self.mv.clone())
    }
}

/// Fixture bundling a turn loop with the pieces tests inspect
pub struct Harness {
    pub session: SharedSession,
    pub view: Arc<RecordingView>,
    pub store: Arc<GameStore>,
    pub players: Arc<Players>,
}

impl Harness {
    pub fn new(white: impl MoveProvider + 'static, black: impl MoveProvider + 'static) -> Self {
        Self {
            session: SharedSession::default(),
            view: Arc::new(RecordingView::default()),
            store: Arc::new(GameStore::new(MemoryStore::new())),
            players: Arc::new(Players::new(Box::new(white), Box::new(black))),
        }
    }

    /// Start a fresh game and build its loop
    pub fn start(&self) -> TurnLoop {
        self.session.lock().start();
        self.turn_loop()
    }

    pub fn turn_loop(&self) -> TurnLoop {
        TurnLoop::new(
            self.session.clone(),
            self.players.clone(),
            self.view.clone(),
            self.store.clone(),
            TurnTiming::default(),
        )
    }
}
