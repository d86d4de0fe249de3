//! Error types for the rules engine.
//!
//! Three classes of failure, matching how callers must react:
//! - `PhaseGate`: the action is not admissible right now. Retry once the
//!   game has moved on.
//! - `Domain`: the action is admissible but breaks a game rule. Fix the
//!   payload and retry.
//! - `Invariant`: internal state is inconsistent. The game instance must not
//!   be used further.

use thiserror::Error;

use super::action::Action;
use super::entity::CardId;
use super::player::PlayerId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RulesError {
    #[error("{action} is not admissible for {player:?} in the current phase")]
    PhaseGate {
        action: Action,
        player: Option<PlayerId>,
    },

    #[error("rule violation: {0}")]
    Domain(#[from] DomainError),

    #[error("invariant violated: {0}")]
    Invariant(String),
}

impl RulesError {
    /// Returns true if the game instance is corrupted and must be discarded.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, RulesError::Invariant(_))
    }

    pub(crate) fn invariant(message: impl Into<String>) -> Self {
        let message = message.into();
        tracing::error!(%message, "invariant violated");
        RulesError::Invariant(message)
    }
}

/// A structurally legal action that breaks a game rule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("hand holds at most {max} cards")]
    HandFull { max: usize },

    #[error("battlefield holds at most {max} cards")]
    BattlefieldFull { max: usize },

    #[error("{card} is not in the hand of {player}")]
    CardNotInHand { player: PlayerId, card: CardId },

    #[error("{card} is not fielded by {player}")]
    CardNotFielded { player: PlayerId, card: CardId },

    #[error("{0} cannot take part in combat")]
    NotCombatCapable(CardId),

    #[error("{item} cannot be attached to {target}")]
    InvalidAttachment { item: CardId, target: CardId },

    #[error("{0} must be attached to a hero or unit")]
    MissingBearer(CardId),

    #[error("not enough cards left in the {0}")]
    PileExhausted(&'static str),

    #[error("only one card may be laid on the center")]
    MultipleCenterCards,

    #[error("{0} is listed more than once")]
    DuplicateCard(CardId),

    #[error("{0} is not a valid target")]
    InvalidTarget(CardId),

    #[error("no die at index {0}")]
    InvalidDiceIndex(usize),

    #[error("die {0} is already assigned to another card")]
    DiceAlreadyAssigned(usize),

    #[error("{0} requires a different element")]
    ElementMismatch(CardId),

    #[error("{0} has no dice assigned")]
    DiceNotAssigned(CardId),

    #[error("{card} has no skill at index {index}")]
    InvalidSkillIndex { card: CardId, index: usize },

    #[error("{given} cards exceed the playable limit of {max}")]
    DeckTooLarge { given: usize, max: usize },

    #[error("a game needs at least two players")]
    NotEnoughPlayers,
}

pub type Result<T> = std::result::Result<T, RulesError>;
