//! Dice faces and elements.
//!
//! A rolled die decides what a card does this round: an elemental face lets
//! it use a skill, the attack face makes it attack.

use serde::{Deserialize, Serialize};

use crate::core::GameRng;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    Fire,
    Water,
    Earth,
    Air,
}

/// One face of a die.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiceOutcome {
    Attack,
    Element(Element),
}

impl DiceOutcome {
    /// The six faces of a die. Attack appears twice.
    pub const FACES: [DiceOutcome; 6] = [
        DiceOutcome::Attack,
        DiceOutcome::Attack,
        DiceOutcome::Element(Element::Fire),
        DiceOutcome::Element(Element::Water),
        DiceOutcome::Element(Element::Earth),
        DiceOutcome::Element(Element::Air),
    ];

    /// Roll one die.
    pub fn roll(rng: &mut GameRng) -> Self {
        Self::FACES[rng.gen_range_usize(0..Self::FACES.len())]
    }

    #[must_use]
    pub fn element(self) -> Option<Element> {
        match self {
            DiceOutcome::Element(element) => Some(element),
            DiceOutcome::Attack => None,
        }
    }

    #[must_use]
    pub fn is_element(self) -> bool {
        self.element().is_some()
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            DiceOutcome::Attack => "attack",
            DiceOutcome::Element(Element::Fire) => "fire",
            DiceOutcome::Element(Element::Water) => "water",
            DiceOutcome::Element(Element::Earth) => "earth",
            DiceOutcome::Element(Element::Air) => "air",
        }
    }
}
