//! Per-card numeric attributes with tagged modifiers.
//!
//! Each statistic keeps its printed (original) value untouched and a map of
//! modifiers keyed by their source. The calculated value is always
//! `original + sum(modifiers)`, so anything added under a source can be taken
//! back exactly by removing that source.
//!
//! Sources:
//! - `ModifierSource::Card(id)`: an equipped item (or any other card) lending
//!   its values. Re-applying the same source replaces the previous values.
//! - `ModifierSource::Damage`: accumulated damage on HP.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::CardId;

/// Tag identifying who contributed a modifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModifierSource {
    Card(CardId),
    Damage,
}

/// The four tracked statistics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatKind {
    Attack,
    Hp,
    Speed,
    Power,
}

impl StatKind {
    pub const ALL: [StatKind; 4] = [StatKind::Attack, StatKind::Hp, StatKind::Speed, StatKind::Power];
}

/// A single statistic: original value plus tagged deltas.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticPoint {
    original: i32,
    modifiers: FxHashMap<ModifierSource, i32>,
}

impl StatisticPoint {
    #[must_use]
    pub fn new(original: i32) -> Self {
        Self {
            original,
            modifiers: FxHashMap::default(),
        }
    }

    #[must_use]
    pub fn original(&self) -> i32 {
        self.original
    }

    /// Original value plus every active modifier.
    #[must_use]
    pub fn calculated(&self) -> i32 {
        self.original + self.modifiers.values().sum::<i32>()
    }

    /// Current delta contributed by `source`, if any.
    #[must_use]
    pub fn modifier(&self, source: ModifierSource) -> Option<i32> {
        self.modifiers.get(&source).copied()
    }

    /// Set the delta of `source`, replacing any previous one.
    pub fn set_modifier(&mut self, source: ModifierSource, delta: i32) {
        if delta == 0 {
            self.modifiers.remove(&source);
        } else {
            self.modifiers.insert(source, delta);
        }
    }

    /// Add `delta` on top of whatever `source` already contributes.
    pub fn add_modifier(&mut self, source: ModifierSource, delta: i32) {
        let current = self.modifier(source).unwrap_or(0);
        self.set_modifier(source, current + delta);
    }

    /// Remove the modifier of `source`, returning its delta.
    pub fn remove(&mut self, source: ModifierSource) -> Option<i32> {
        self.modifiers.remove(&source)
    }
}

/// Attack, HP, Speed and Power of a card.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticPointGroup {
    pub attack: StatisticPoint,
    pub hp: StatisticPoint,
    pub speed: StatisticPoint,
    pub power: StatisticPoint,
}

impl StatisticPointGroup {
    #[must_use]
    pub fn new(attack: i32, hp: i32, speed: i32, power: i32) -> Self {
        Self {
            attack: StatisticPoint::new(attack),
            hp: StatisticPoint::new(hp),
            speed: StatisticPoint::new(speed),
            power: StatisticPoint::new(power),
        }
    }

    #[must_use]
    pub fn get(&self, kind: StatKind) -> &StatisticPoint {
        match kind {
            StatKind::Attack => &self.attack,
            StatKind::Hp => &self.hp,
            StatKind::Speed => &self.speed,
            StatKind::Power => &self.power,
        }
    }

    pub fn get_mut(&mut self, kind: StatKind) -> &mut StatisticPoint {
        match kind {
            StatKind::Attack => &mut self.attack,
            StatKind::Hp => &mut self.hp,
            StatKind::Speed => &mut self.speed,
            StatKind::Power => &mut self.power,
        }
    }

    /// Merge the calculated values of `other` into this group as modifiers
    /// tagged with `source`.
    pub fn modify(&mut self, other: &StatisticPointGroup, source: ModifierSource) {
        for kind in StatKind::ALL {
            let delta = other.get(kind).calculated();
            self.get_mut(kind).set_modifier(source, delta);
        }
    }

    /// Strip every modifier tagged with `source` from all four statistics.
    pub fn remove_all(&mut self, source: ModifierSource) {
        for kind in StatKind::ALL {
            self.get_mut(kind).remove(source);
        }
    }

    /// Record `amount` points of damage against HP.
    pub fn inflict_damage(&mut self, amount: i32) {
        self.hp.add_modifier(ModifierSource::Damage, -amount);
    }

    #[must_use]
    pub fn is_depleted(&self) -> bool {
        self.hp.calculated() <= 0
    }
}
