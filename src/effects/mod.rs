//! Effect system for combat.
//!
//! - `moves`: the `Move` record and the views handed to hooks
//! - `effect`: effect kinds, the `EffectHooks` trait and ordered folds
//! - `settings`: round-scoped targeting rules written by round-start hooks

pub mod effect;
pub mod moves;
pub mod settings;

pub use effect::{Effect, EffectHooks, EffectKind, RoundFinish};
pub use moves::{CasterView, Move, MoveContext, MoveType, ReceiveContext};
pub use settings::RoundSettings;
