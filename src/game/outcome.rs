//! Game result.

use serde::{Deserialize, Serialize};

use crate::core::PlayerId;

/// How a finished game ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    /// Single winner.
    Winner(PlayerId),
    /// Every hero fell.
    Draw,
    /// Several heroes survived the elimination of another.
    Winners(Vec<PlayerId>),
}

impl GameResult {
    /// Build a result from the surviving players.
    pub fn from_survivors(mut survivors: Vec<PlayerId>) -> Self {
        match survivors.len() {
            0 => GameResult::Draw,
            1 => GameResult::Winner(survivors.remove(0)),
            _ => GameResult::Winners(survivors),
        }
    }

    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        match self {
            GameResult::Winner(p) => *p == player,
            GameResult::Winners(ps) => ps.contains(&player),
            GameResult::Draw => false,
        }
    }
}
