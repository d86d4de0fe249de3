//! Per-card choices for the current round.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::DiceOutcome;
use crate::core::CardId;

/// A die placed on a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignedDice {
    /// Index into the owner's rolled dice.
    pub index: usize,
    pub outcome: DiceOutcome,
}

/// What a combat card will do this round.
///
/// Created empty when dice are rolled, filled during the dice and target
/// phases, read by combat, dropped at round end.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardAssignment {
    pub dice: Option<AssignedDice>,
    pub skill_index: Option<usize>,
    targets: SmallVec<[CardId; 4]>,
}

impl CardAssignment {
    #[must_use]
    pub fn outcome(&self) -> Option<DiceOutcome> {
        self.dice.map(|d| d.outcome)
    }

    #[must_use]
    pub fn targets(&self) -> &[CardId] {
        &self.targets
    }

    /// Add a target; assigning the same target twice is a no-op.
    pub fn add_target(&mut self, target: CardId) {
        if !self.targets.contains(&target) {
            self.targets.push(target);
        }
    }

    /// Returns false if `target` was not assigned.
    pub fn remove_target(&mut self, target: CardId) -> bool {
        let before = self.targets.len();
        self.targets.retain(|t| *t != target);
        self.targets.len() != before
    }
}
