//! Card model: variants, statistics, dice.
//!
//! ## Key Types
//!
//! - `Card`: closed union of Hero, Unit, Skill, Item and Spell
//! - `StatisticPointGroup`: Attack/HP/Speed/Power with tagged modifiers
//! - `DiceOutcome`: a rolled die face

pub mod card;
pub mod dice;
pub mod statistics;

pub use card::{Card, CardKind, CardMeta, CharacterCard, ItemCard, Skill, SkillCard, SpellCard};
pub use dice::{DiceOutcome, Element};
pub use statistics::{ModifierSource, StatKind, StatisticPoint, StatisticPointGroup};
