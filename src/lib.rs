//! # trinica-rules
//!
//! Authoritative rules engine for a round-based multiplayer card game.
//!
//! ## Design Principles
//!
//! 1. **Gate, Mutate, Commit**: every action is first checked against the
//!    `ActionController`, then applied to the game, and only then recorded as
//!    done. A rejected action changes nothing.
//!
//! 2. **Deterministic**: all randomness (shuffles, draws, dice, speed
//!    tie-breaks, forced targets) comes from the game's seeded `GameRng`.
//!
//! 3. **Closed Card Model**: cards are a tagged union; capabilities are
//!    answered by pattern matching, effects are pure folds over a `Move`.
//!
//! ## Architecture
//!
//! - **Action Controller**: generic phase/turn state machine over opaque
//!   action and player ids.
//!
//! - **Combat Pipeline**: a speed-ordered battle sequence resolved one card
//!   per `PerformMove`, with attacker and defender hooks around each move.
//!
//! - **Persistent Data Structures**: card piles are `im` vectors, so whole
//!   game snapshots clone cheaply.
//!
//! ## Modules
//!
//! - `core`: ids, actions, RNG, configuration, errors
//! - `control`: the action controller
//! - `cards`: card variants, statistics, dice
//! - `effects`: moves, effect hooks, round settings
//! - `zones`: card piles
//! - `game`: the match, commands, views, persistence
//!
//! ## Example
//!
//! ```
//! use trinica_rules::{Card, CharacterCard, Command, Game, GameId, Player, PlayerId, RulesConfig, StatisticPointGroup, CardId};
//!
//! let players = (0..2u8)
//!     .map(|seat| {
//!         let base = u32::from(seat) * 10;
//!         let hero = CharacterCard::new(CardId(base), "Hero", StatisticPointGroup::new(1, 20, 2, 1));
//!         let deck = (1..=4).map(|i| {
//!             Card::Unit(CharacterCard::new(CardId(base + i), "Unit", StatisticPointGroup::new(2, 5, 1, 1)))
//!         });
//!         Player::new(PlayerId(seat), hero, deck)
//!     })
//!     .collect();
//!
//! let mut game = Game::new(GameId::new("demo"), players, RulesConfig::default(), 7).unwrap();
//! game.advance_system().unwrap();
//! game.execute(Some(PlayerId(0)), Command::TakeCardsToHand { sources: vec![] }).unwrap();
//! assert!(!game.is_game_over());
//! ```

pub mod core;
pub mod control;
pub mod cards;
pub mod effects;
pub mod zones;
pub mod game;

// Re-export commonly used types
pub use crate::core::{Action, CardId, DomainError, GameId, GameRng, PlayerId, Result, RulesConfig, RulesError};

pub use crate::control::{ActionController, ActionKind, ActionRepeat, Advance};

pub use crate::cards::{
    Card, CardKind, CharacterCard, DiceOutcome, Element, ItemCard, Skill, SkillCard, SpellCard,
    StatisticPointGroup,
};

pub use crate::effects::{Effect, EffectHooks, EffectKind, Move, MoveType, RoundSettings};

pub use crate::zones::FieldDeck;

pub use crate::game::{
    CardSource, CardToLay, Command, Game, GameRepository, GameResult, GameService, GameView,
    InMemoryRepository, Player,
};
