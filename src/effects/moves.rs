//! The move record shared across one card's hook invocations.

use serde::{Deserialize, Serialize};

use crate::cards::StatisticPointGroup;
use crate::core::CardId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveType {
    Attack,
    Skill,
}

/// One resolving action: damage, type and independent gates.
///
/// Hooks veto parts of the resolution by clearing a gate instead of aborting
/// the pipeline, so every later hook still sees the move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub damage: i32,
    pub kind: MoveType,
    pub move_enabled: bool,
    pub attack_enabled: bool,
    pub skills_enabled: bool,
    pub items_enabled: bool,
    pub effects_enabled: bool,
}

impl Move {
    /// A move with every gate open.
    #[must_use]
    pub fn new(damage: i32, kind: MoveType) -> Self {
        Self {
            damage,
            kind,
            move_enabled: true,
            attack_enabled: true,
            skills_enabled: true,
            items_enabled: true,
            effects_enabled: true,
        }
    }
}

/// Read-only view of the card owning the hook.
#[derive(Clone, Copy, Debug)]
pub struct CasterView<'a> {
    pub id: CardId,
    pub statistics: &'a StatisticPointGroup,
}

/// Context of an outgoing move.
#[derive(Clone, Copy, Debug)]
pub struct MoveContext<'a> {
    pub targets: &'a [CardId],
    pub enemies: &'a [CardId],
}

/// Context of an incoming move.
#[derive(Clone, Copy, Debug)]
pub struct ReceiveContext<'a> {
    pub attacker: CardId,
    /// Fielded cards hostile to the attacker.
    pub enemies: &'a [CardId],
}
