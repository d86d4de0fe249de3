//! Round-scoped targeting rules written by round-start hooks.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::core::CardId;

/// Targeting overrides valid for the current round only.
///
/// - The priority list forces attackers onto specific cards (taunt).
/// - The exclusion list protects cards from being targeted (stealth).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSettings {
    prioritized_targets: Vec<CardId>,
    excluded_targets: BTreeSet<CardId>,
}

impl RoundSettings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Force attackers onto `card`.
    pub fn prioritize(&mut self, card: CardId) {
        if !self.prioritized_targets.contains(&card) {
            self.prioritized_targets.push(card);
        }
    }

    /// Protect `card` from being targeted.
    pub fn exclude(&mut self, card: CardId) {
        self.excluded_targets.insert(card);
    }

    #[must_use]
    pub fn prioritized_targets(&self) -> &[CardId] {
        &self.prioritized_targets
    }

    #[must_use]
    pub fn is_excluded(&self, card: CardId) -> bool {
        self.excluded_targets.contains(&card)
    }

    pub fn clear(&mut self) {
        self.prioritized_targets.clear();
        self.excluded_targets.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prioritize_dedupes() {
        let mut settings = RoundSettings::new();
        settings.prioritize(CardId(1));
        settings.prioritize(CardId(1));
        settings.prioritize(CardId(2));
        assert_eq!(settings.prioritized_targets(), &[CardId(1), CardId(2)]);
    }

    #[test]
    fn test_exclude_and_clear() {
        let mut settings = RoundSettings::new();
        settings.exclude(CardId(5));
        assert!(settings.is_excluded(CardId(5)));
        assert!(!settings.is_excluded(CardId(6)));

        settings.clear();
        assert!(!settings.is_excluded(CardId(5)));
        assert!(settings.prioritized_targets().is_empty());
    }
}
