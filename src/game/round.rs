//! Round-scoped combat state.
//!
//! The battle sequence is fixed at StartRound and walked by a cursor, one
//! card per PerformMove. It lives only while a round is in progress; the
//! game drops it at FinishRound and keeps the round's move log.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::CardId;
use crate::effects::MoveType;

/// The battle sequence and how far it has been resolved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundState {
    sequence: Vec<CardId>,
    cursor: usize,
    log: Vec<MoveRecord>,
}

impl RoundState {
    pub fn new(sequence: Vec<CardId>) -> Self {
        Self {
            sequence,
            cursor: 0,
            log: Vec::new(),
        }
    }

    #[must_use]
    pub fn sequence(&self) -> &[CardId] {
        &self.sequence
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The card whose move resolves next.
    #[must_use]
    pub fn current(&self) -> Option<CardId> {
        self.sequence.get(self.cursor).copied()
    }

    pub fn advance(&mut self) {
        if self.cursor < self.sequence.len() {
            self.cursor += 1;
        }
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.sequence.len()
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.sequence.len().saturating_sub(self.cursor)
    }

    pub fn record(&mut self, record: MoveRecord) {
        self.log.push(record);
    }

    pub fn into_log(self) -> Vec<MoveRecord> {
        self.log
    }
}

/// One resolved move.
///
/// `applied` holds the damage actually inflicted per target. The after-move
/// hooks see a move recomputed from the attacker's statistics once the move
/// had landed: `reported_damage` is what `after_move_at_all` returned and
/// `reported` what each target's `after_receive` returned. Applied and
/// reported values may differ. Both reported fields stay empty (and the
/// damage is the pre-hit value) when the move felled a hero.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub attacker: CardId,
    pub kind: MoveType,
    pub targets: SmallVec<[CardId; 4]>,
    pub applied: Vec<(CardId, i32)>,
    pub reported_damage: i32,
    pub reported: Vec<(CardId, i32)>,
    pub move_enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_walk() {
        let mut round = RoundState::new(vec![CardId(3), CardId(1)]);
        assert_eq!(round.current(), Some(CardId(3)));
        assert_eq!(round.remaining(), 2);

        round.advance();
        assert_eq!(round.current(), Some(CardId(1)));
        round.advance();
        round.advance();

        assert!(round.is_exhausted());
        assert_eq!(round.current(), None);
        assert_eq!(round.cursor(), 2);
    }

    #[test]
    fn test_empty_sequence_is_exhausted() {
        assert!(RoundState::new(Vec::new()).is_exhausted());
    }
}
