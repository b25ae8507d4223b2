//! Scripted provider and the built-in historical game
//!
//! [`SCRIPTED_MOVES`] is Donald Byrne vs Bobby Fischer, New York 1956
//! ("The Game of the Century"), ending in 41...Rc2#.

use async_trait::async_trait;

use crate::game::ai::error::{ProviderError, ProviderResult};
use crate::game::ai::provider::{MoveProvider, MoveRequest};

/// Byrne vs Fischer, 1956, one entry per ply
pub const SCRIPTED_MOVES: &[&str] = &[
    "Nf3", "Nf6", "c4", "g6", "Nc3", "Bg7", "d4", "O-O", "Bf4", "d5", "Qb3", "dxc4", "Qxc4", "c6",
    "e4", "Nbd7", "Rd1", "Nb6", "Qc5", "Bg4", "Bg5", "Na4", "Qa3", "Nxc3", "bxc3", "Nxe4", "Bxe7",
    "Qb6", "Bc4", "Nxc3", "Bc5", "Rfe8+", "Kf1", "Be6", "Bxb6", "Bxc4+", "Kg1", "Ne2+", "Kf1",
    "Nxd4+", "Kg1", "Ne2+", "Kf1", "Nc3+", "Kg1", "axb6", "Qb4", "Ra4", "Qxb6", "Nxd1", "h3",
    "Rxa2", "Kh2", "Nxf2", "Re1", "Rxe1", "Qd8+", "Bf8", "Nxe1", "Bd5", "Nf3", "Ne4", "Qb8", "b5",
    "h4", "h5", "Ne5", "Kg7", "Kg1", "Bc5+", "Kf1", "Ng3+", "Ke1", "Bb4+", "Kd1", "Bb3+", "Kc1",
    "Ne2+", "Kb1", "Nc3+", "Kc1", "Rc2#",
];

/// Plays the move at index `ply` of a fixed list
#[derive(Debug, Clone)]
pub struct ScriptedProvider {
    name: String,
    moves: Vec<String>,
}

impl ScriptedProvider {
    pub fn new(name: impl Into<String>, moves: &[&str]) -> Self {
        Self {
            name: name.into(),
            moves: moves.iter().map(|m| m.to_string()).collect(),
        }
    }

    /// The built-in historical game
    pub fn byrne_fischer(name: impl Into<String>) -> Self {
        Self::new(name, SCRIPTED_MOVES)
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Move at `index`, if the script is that long
    pub fn move_at(&self, index: usize) -> Option<&str> {
        self.moves.get(index).map(String::as_str)
    }
}

#[async_trait]
impl MoveProvider for ScriptedProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get_move(&self, request: &MoveRequest) -> ProviderResult<String> {
        self.move_at(request.ply)
            .map(str::to_string)
            .ok_or(ProviderError::ScriptExhausted { ply: request.ply })
    }

    fn is_scripted(&self) -> bool {
        true
    }
}
