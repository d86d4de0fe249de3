//! Core engine types: identifiers, action ids, RNG, configuration, errors.
//!
//! Everything here is independent of the card model and the phase wiring.

pub mod entity;
pub mod player;
pub mod rng;
pub mod config;
pub mod action;
pub mod error;

pub use entity::{CardId, GameId};
pub use player::PlayerId;
pub use rng::{GameRng, GameRngState};
pub use config::RulesConfig;
pub use action::Action;
pub use error::{DomainError, Result, RulesError};
