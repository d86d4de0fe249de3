//! Card variants and their capabilities.
//!
//! `Card` is a closed union of the five variants. Capabilities are answered
//! by matching on the variant:
//!
//! | Variant | combat-capable | item-bearing | element-gated |
//! |---|---|---|---|
//! | Hero  | yes | yes | no  |
//! | Unit  | yes | yes | no  |
//! | Skill | yes | no  | yes |
//! | Item  | no  | no  | no  |
//! | Spell | yes | no  | yes |
//!
//! ## Example
//!
//! ```
//! use trinica_rules::cards::{Card, CharacterCard, Skill, StatisticPointGroup};
//! use trinica_rules::core::CardId;
//!
//! let hero = Card::Hero(
//!     CharacterCard::new(CardId::new(1), "Aria", StatisticPointGroup::new(3, 20, 4, 2))
//!         .with_skill(Skill::new("Flare", true)),
//! );
//!
//! assert!(hero.is_combat_capable());
//! assert!(hero.does_power_damage(Some(0)));
//! ```

use serde::{Deserialize, Serialize};

use super::dice::{DiceOutcome, Element};
use super::statistics::{ModifierSource, StatisticPointGroup};
use crate::core::CardId;
use crate::effects::Effect;

/// Display metadata shared by every variant.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardMeta {
    pub name: String,
    pub race: String,
    pub class: String,
    pub faction: String,
}

impl CardMeta {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A skill a card can use on an elemental dice outcome.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    /// The skill hits for the caster's Power.
    pub power_damage: bool,
    /// Effects attached to each target the skill lands on.
    pub effects: Vec<Effect>,
}

impl Skill {
    pub fn new(name: impl Into<String>, power_damage: bool) -> Self {
        Self {
            name: name.into(),
            power_damage,
            effects: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Hero and unit cards: fight with stats, carry items, own skills.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterCard {
    pub id: CardId,
    pub meta: CardMeta,
    pub statistics: StatisticPointGroup,
    pub effects: Vec<Effect>,
    pub skills: Vec<Skill>,
    pub items: Vec<ItemCard>,
}

impl CharacterCard {
    pub fn new(id: CardId, name: impl Into<String>, statistics: StatisticPointGroup) -> Self {
        Self {
            id,
            meta: CardMeta::named(name),
            statistics,
            effects: Vec::new(),
            skills: Vec::new(),
            items: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_skill(mut self, skill: Skill) -> Self {
        self.skills.push(skill);
        self
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    #[must_use]
    pub fn with_item(mut self, item: ItemCard) -> Self {
        self.items.push(item);
        self
    }

    #[must_use]
    pub fn with_meta(mut self, meta: CardMeta) -> Self {
        self.meta = meta;
        self
    }
}

/// A reusable skill fielded as its own card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillCard {
    pub id: CardId,
    pub meta: CardMeta,
    pub statistics: StatisticPointGroup,
    pub effects: Vec<Effect>,
    pub skill: Skill,
    pub required_elements: Vec<Element>,
}

impl SkillCard {
    pub fn new(id: CardId, statistics: StatisticPointGroup, skill: Skill, required_elements: Vec<Element>) -> Self {
        Self {
            id,
            meta: CardMeta::named(skill.name.clone()),
            statistics,
            effects: Vec::new(),
            skill,
            required_elements,
        }
    }
}

/// Equipment lending its statistics to the card carrying it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCard {
    pub id: CardId,
    pub meta: CardMeta,
    pub statistics: StatisticPointGroup,
}

impl ItemCard {
    pub fn new(id: CardId, name: impl Into<String>, statistics: StatisticPointGroup) -> Self {
        Self {
            id,
            meta: CardMeta::named(name),
            statistics,
        }
    }
}

/// A single-use card with fixed damage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellCard {
    pub id: CardId,
    pub meta: CardMeta,
    pub statistics: StatisticPointGroup,
    pub effects: Vec<Effect>,
    /// Effects attached to the targets the spell lands on.
    pub applied_effects: Vec<Effect>,
    pub required_elements: Vec<Element>,
    pub damage: i32,
}

impl SpellCard {
    pub fn new(id: CardId, name: impl Into<String>, damage: i32, required_elements: Vec<Element>) -> Self {
        Self {
            id,
            meta: CardMeta::named(name),
            statistics: StatisticPointGroup::default(),
            effects: Vec::new(),
            applied_effects: Vec::new(),
            required_elements,
            damage,
        }
    }

    #[must_use]
    pub fn with_statistics(mut self, statistics: StatisticPointGroup) -> Self {
        self.statistics = statistics;
        self
    }

    #[must_use]
    pub fn with_applied_effect(mut self, effect: Effect) -> Self {
        self.applied_effects.push(effect);
        self
    }
}

/// Variant tag, used for display and quick checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardKind {
    Hero,
    Unit,
    Skill,
    Item,
    Spell,
}

impl CardKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            CardKind::Hero => "hero",
            CardKind::Unit => "unit",
            CardKind::Skill => "skill",
            CardKind::Item => "item",
            CardKind::Spell => "spell",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Card {
    Hero(CharacterCard),
    Unit(CharacterCard),
    Skill(SkillCard),
    Item(ItemCard),
    Spell(SpellCard),
}

impl Card {
    #[must_use]
    pub fn id(&self) -> CardId {
        match self {
            Card::Hero(c) | Card::Unit(c) => c.id,
            Card::Skill(c) => c.id,
            Card::Item(c) => c.id,
            Card::Spell(c) => c.id,
        }
    }

    #[must_use]
    pub fn meta(&self) -> &CardMeta {
        match self {
            Card::Hero(c) | Card::Unit(c) => &c.meta,
            Card::Skill(c) => &c.meta,
            Card::Item(c) => &c.meta,
            Card::Spell(c) => &c.meta,
        }
    }

    #[must_use]
    pub fn kind(&self) -> CardKind {
        match self {
            Card::Hero(_) => CardKind::Hero,
            Card::Unit(_) => CardKind::Unit,
            Card::Skill(_) => CardKind::Skill,
            Card::Item(_) => CardKind::Item,
            Card::Spell(_) => CardKind::Spell,
        }
    }

    /// Every variant carries statistics; only combat-capable ones fight
    /// with them.
    #[must_use]
    pub fn statistics(&self) -> &StatisticPointGroup {
        match self {
            Card::Hero(c) | Card::Unit(c) => &c.statistics,
            Card::Skill(c) => &c.statistics,
            Card::Item(c) => &c.statistics,
            Card::Spell(c) => &c.statistics,
        }
    }

    pub fn statistics_mut(&mut self) -> &mut StatisticPointGroup {
        match self {
            Card::Hero(c) | Card::Unit(c) => &mut c.statistics,
            Card::Skill(c) => &mut c.statistics,
            Card::Item(c) => &mut c.statistics,
            Card::Spell(c) => &mut c.statistics,
        }
    }

    #[must_use]
    pub fn is_combat_capable(&self) -> bool {
        !matches!(self, Card::Item(_))
    }

    #[must_use]
    pub fn is_item_bearing(&self) -> bool {
        matches!(self, Card::Hero(_) | Card::Unit(_))
    }

    /// Active effects of a combat-capable card; empty otherwise.
    #[must_use]
    pub fn effects(&self) -> &[Effect] {
        match self {
            Card::Hero(c) | Card::Unit(c) => &c.effects,
            Card::Skill(c) => &c.effects,
            Card::Spell(c) => &c.effects,
            Card::Item(_) => &[],
        }
    }

    pub fn effects_mut(&mut self) -> Option<&mut Vec<Effect>> {
        match self {
            Card::Hero(c) | Card::Unit(c) => Some(&mut c.effects),
            Card::Skill(c) => Some(&mut c.effects),
            Card::Spell(c) => Some(&mut c.effects),
            Card::Item(_) => None,
        }
    }

    /// Equipped items; empty for cards that cannot bear items.
    #[must_use]
    pub fn items(&self) -> &[ItemCard] {
        match self {
            Card::Hero(c) | Card::Unit(c) => &c.items,
            _ => &[],
        }
    }

    pub fn items_mut(&mut self) -> Option<&mut Vec<ItemCard>> {
        match self {
            Card::Hero(c) | Card::Unit(c) => Some(&mut c.items),
            _ => None,
        }
    }

    /// Lend every equipped item's statistics to the card, each tagged by
    /// the item's id. Returns whether any item was applied.
    pub fn equip_items(&mut self) -> bool {
        let (Card::Hero(c) | Card::Unit(c)) = self else {
            return false;
        };
        for item in &c.items {
            c.statistics.modify(&item.statistics, ModifierSource::Card(item.id));
        }
        !c.items.is_empty()
    }

    /// Strip the modifiers added by `equip_items`. Idempotent.
    pub fn unequip_items(&mut self) {
        if let Card::Hero(c) | Card::Unit(c) = self {
            for item in &c.items {
                c.statistics.remove_all(ModifierSource::Card(item.id));
            }
        }
    }

    /// Elements this card needs to activate, if it is element-gated.
    #[must_use]
    pub fn required_elements(&self) -> Option<&[Element]> {
        match self {
            Card::Skill(c) => Some(&c.required_elements),
            Card::Spell(c) => Some(&c.required_elements),
            _ => None,
        }
    }

    /// Whether `outcome` may be assigned to this card.
    ///
    /// Element-gated cards only take one of their required elements.
    #[must_use]
    pub fn accepts_outcome(&self, outcome: DiceOutcome) -> bool {
        match self.required_elements() {
            Some(required) => outcome.element().is_some_and(|e| required.contains(&e)),
            None => self.is_combat_capable(),
        }
    }

    /// Number of selectable skill indices.
    #[must_use]
    pub fn skill_count(&self) -> usize {
        match self {
            Card::Hero(c) | Card::Unit(c) => c.skills.len(),
            Card::Skill(_) | Card::Spell(_) => 1,
            Card::Item(_) => 0,
        }
    }

    /// Whether the skill at `skill_index` (default 0) deals power damage.
    #[must_use]
    pub fn does_power_damage(&self, skill_index: Option<usize>) -> bool {
        match self {
            Card::Hero(c) | Card::Unit(c) => c
                .skills
                .get(skill_index.unwrap_or(0))
                .is_some_and(|s| s.power_damage),
            Card::Skill(c) => c.skill.power_damage,
            Card::Spell(c) => c.damage > 0,
            Card::Item(_) => false,
        }
    }

    /// Effects the skill at `skill_index` (default 0) attaches to targets.
    #[must_use]
    pub fn skill_effects(&self, skill_index: Option<usize>) -> &[Effect] {
        match self {
            Card::Hero(c) | Card::Unit(c) => c
                .skills
                .get(skill_index.unwrap_or(0))
                .map_or(&[], |s| s.effects.as_slice()),
            Card::Skill(c) => &c.skill.effects,
            Card::Spell(c) => &c.applied_effects,
            Card::Item(_) => &[],
        }
    }

    /// Fixed damage of a spell card.
    #[must_use]
    pub fn spell_damage(&self) -> Option<i32> {
        match self {
            Card::Spell(c) => Some(c.damage),
            _ => None,
        }
    }
}
