//! Phase gating.
//!
//! The `ActionController` decides which action may run and who may run it.

pub mod controller;

pub use controller::{ActionController, ActionKind, ActionRepeat, Advance, ControllerError};
