//! A participant: hero, four card piles, dice and card assignments.
//!
//! ## Piles
//!
//! - `idle`: cards not drawn yet
//! - `hand`: drawn, not laid
//! - `battling`: laid on the battlefield
//! - `dead`: eliminated or consumed
//!
//! The hero never sits in a pile; it is always on the battlefield. Together
//! with the combat-capable battling cards it forms the player's *fielded*
//! cards. Items attached to a card travel with it and are not in any pile.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::assignment::{AssignedDice, CardAssignment};
use crate::cards::{Card, CharacterCard, DiceOutcome};
use crate::core::{CardId, DomainError, GameRng, PlayerId};
use crate::zones::FieldDeck;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    id: PlayerId,
    hero: Card,
    idle: FieldDeck,
    hand: FieldDeck,
    battling: FieldDeck,
    dead: FieldDeck,
    dice: Vec<DiceOutcome>,
    assignments: BTreeMap<CardId, CardAssignment>,
}

impl Player {
    /// Create a player with a hero and an idle deck.
    pub fn new(id: PlayerId, hero: CharacterCard, deck: impl IntoIterator<Item = Card>) -> Self {
        Self {
            id,
            hero: Card::Hero(hero),
            idle: FieldDeck::from_cards(deck),
            hand: FieldDeck::new(),
            battling: FieldDeck::new(),
            dead: FieldDeck::new(),
            dice: Vec::new(),
            assignments: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> PlayerId {
        self.id
    }

    #[must_use]
    pub fn hero(&self) -> &Card {
        &self.hero
    }

    #[must_use]
    pub fn idle(&self) -> &FieldDeck {
        &self.idle
    }

    #[must_use]
    pub fn hand(&self) -> &FieldDeck {
        &self.hand
    }

    #[must_use]
    pub fn battling(&self) -> &FieldDeck {
        &self.battling
    }

    #[must_use]
    pub fn dead(&self) -> &FieldDeck {
        &self.dead
    }

    #[must_use]
    pub fn dice(&self) -> &[DiceOutcome] {
        &self.dice
    }

    #[must_use]
    pub fn assignments(&self) -> &BTreeMap<CardId, CardAssignment> {
        &self.assignments
    }

    #[must_use]
    pub fn assignment(&self, card: CardId) -> Option<&CardAssignment> {
        self.assignments.get(&card)
    }

    #[must_use]
    pub fn hero_speed(&self) -> i32 {
        self.hero.statistics().speed.calculated()
    }

    #[must_use]
    pub fn is_hero_eliminated(&self) -> bool {
        self.hero.statistics().is_depleted()
    }

    // === Lookup ===

    /// Hero plus every combat-capable battling card, hero first.
    pub fn fielded(&self) -> impl Iterator<Item = &Card> {
        std::iter::once(&self.hero).chain(self.battling.iter().filter(|c| c.is_combat_capable()))
    }

    pub fn fielded_ids(&self) -> impl Iterator<Item = CardId> + '_ {
        self.fielded().map(Card::id)
    }

    #[must_use]
    pub fn is_fielded(&self, card: CardId) -> bool {
        self.fielded_card(card).is_some()
    }

    #[must_use]
    pub fn fielded_card(&self, card: CardId) -> Option<&Card> {
        if self.hero.id() == card {
            return Some(&self.hero);
        }
        self.battling.get(card).filter(|c| c.is_combat_capable())
    }

    /// Find a card on the battlefield (hero, battling) or in the dead pile.
    #[must_use]
    pub fn card_in_play(&self, card: CardId) -> Option<&Card> {
        if self.hero.id() == card {
            return Some(&self.hero);
        }
        self.battling.get(card).or_else(|| self.dead.get(card))
    }

    pub fn card_in_play_mut(&mut self, card: CardId) -> Option<&mut Card> {
        if self.hero.id() == card {
            return Some(&mut self.hero);
        }
        if self.battling.contains(card) {
            return self.battling.get_mut(card);
        }
        self.dead.get_mut(card)
    }

    /// Every card the player owns, attached items included.
    pub fn card_ids(&self) -> impl Iterator<Item = CardId> + '_ {
        let piles = [&self.idle, &self.hand, &self.battling, &self.dead];
        std::iter::once(&self.hero)
            .chain(piles.into_iter().flat_map(FieldDeck::iter))
            .flat_map(|card| std::iter::once(card.id()).chain(card.items().iter().map(|i| i.id)))
    }

    // === Card movement ===

    /// Shuffle the idle deck and give away half of it.
    pub fn shuffle_and_take_half(&mut self, rng: &mut GameRng) -> FieldDeck {
        self.idle.shuffle(rng);
        let half = self.idle.len() / 2;
        (0..half).filter_map(|_| self.idle.draw()).collect()
    }

    /// Draw a random card from the idle deck into the hand.
    pub fn take_card_to_hand(&mut self, rng: &mut GameRng) -> Result<CardId, DomainError> {
        let card = self
            .idle
            .take_random(rng)
            .ok_or(DomainError::PileExhausted("idle deck"))?;
        let id = card.id();
        self.hand.push(card);
        Ok(id)
    }

    pub fn add_card_to_hand(&mut self, card: Card) {
        self.hand.push(card);
    }

    pub fn take_card_from_hand(&mut self, card: CardId) -> Result<Card, DomainError> {
        self.hand.take(card).ok_or(DomainError::CardNotInHand {
            player: self.id,
            card,
        })
    }

    pub fn lay_card_to_battle(&mut self, card: Card) {
        self.battling.push(card);
    }

    /// Attach an item to the hero or a battling hero/unit.
    pub fn attach_item(&mut self, bearer: CardId, item: Card) -> Result<(), DomainError> {
        let item_id = item.id();
        let Card::Item(item) = item else {
            return Err(DomainError::InvalidAttachment {
                item: item_id,
                target: bearer,
            });
        };

        let target = if self.hero.id() == bearer {
            Some(&mut self.hero)
        } else {
            self.battling.get_mut(bearer)
        };

        match target.and_then(Card::items_mut) {
            Some(items) => {
                items.push(item);
                Ok(())
            }
            None => Err(DomainError::InvalidAttachment {
                item: item_id,
                target: bearer,
            }),
        }
    }

    /// Move a battling card to the dead pile, its items along with it.
    pub fn kill_card(&mut self, card: CardId) -> bool {
        let Some(mut card) = self.battling.take(card) else {
            return false;
        };
        if let Some(items) = card.items_mut() {
            for item in items.drain(..) {
                self.dead.push(Card::Item(item));
            }
        }
        self.dead.push(card);
        true
    }

    // === Damage ===

    pub fn inflict_damage(&mut self, card: CardId, amount: i32) -> Result<(), DomainError> {
        let player = self.id;
        let target = if self.hero.id() == card {
            Some(&mut self.hero)
        } else {
            self.battling.get_mut(card)
        };
        let target = target.ok_or(DomainError::CardNotFielded { player, card })?;
        target.statistics_mut().inflict_damage(amount);
        Ok(())
    }

    /// Whether `card` is out of the fight: a hero with no HP left, or any
    /// other card that has reached the dead pile.
    #[must_use]
    pub fn is_card_dead(&self, card: CardId) -> bool {
        if self.hero.id() == card {
            return self.hero.statistics().is_depleted();
        }
        self.dead.contains(card)
    }

    /// Move `card` to the dead pile if its HP is depleted.
    ///
    /// Heroes are never moved; check `is_hero_eliminated` for them.
    pub fn bury_if_depleted(&mut self, card: CardId) -> bool {
        let depleted = self
            .battling
            .get(card)
            .is_some_and(|c| c.statistics().is_depleted());
        depleted && self.kill_card(card)
    }

    // === Dice ===

    /// Roll one die per fielded card and open empty assignments for them.
    pub fn play_dices(&mut self, rng: &mut GameRng) {
        let fielded: Vec<CardId> = self.fielded_ids().collect();
        self.dice = fielded.iter().map(|_| DiceOutcome::roll(rng)).collect();
        self.assignments = fielded
            .into_iter()
            .map(|id| (id, CardAssignment::default()))
            .collect();
    }

    /// Re-roll the dice at the given indices.
    pub fn replay_dices(&mut self, indices: &[usize], rng: &mut GameRng) -> Result<(), DomainError> {
        if let Some(&bad) = indices.iter().find(|&&i| i >= self.dice.len()) {
            return Err(DomainError::InvalidDiceIndex(bad));
        }
        for &index in indices {
            self.dice[index] = DiceOutcome::roll(rng);
        }
        Ok(())
    }

    fn assignment_mut(&mut self, card: CardId) -> Result<&mut CardAssignment, DomainError> {
        let player = self.id;
        self.assignments
            .get_mut(&card)
            .ok_or(DomainError::CardNotFielded { player, card })
    }

    /// Put die `dice_index` on `card`, replacing the card's previous die.
    pub fn assign_dice(&mut self, dice_index: usize, card: CardId) -> Result<(), DomainError> {
        let outcome = *self
            .dice
            .get(dice_index)
            .ok_or(DomainError::InvalidDiceIndex(dice_index))?;

        let used_elsewhere = self
            .assignments
            .iter()
            .any(|(id, a)| *id != card && a.dice.is_some_and(|d| d.index == dice_index));
        if used_elsewhere {
            return Err(DomainError::DiceAlreadyAssigned(dice_index));
        }

        let fielded = self.fielded_card(card).ok_or(DomainError::CardNotFielded {
            player: self.id,
            card,
        })?;
        if !fielded.accepts_outcome(outcome) {
            return Err(DomainError::ElementMismatch(card));
        }

        self.assignment_mut(card)?.dice = Some(AssignedDice {
            index: dice_index,
            outcome,
        });
        Ok(())
    }

    pub fn remove_dice(&mut self, card: CardId) -> Result<(), DomainError> {
        self.assignment_mut(card)?.dice = None;
        Ok(())
    }

    pub fn choose_skill(&mut self, card: CardId, skill_index: usize) -> Result<(), DomainError> {
        let count = self
            .fielded_card(card)
            .map(Card::skill_count)
            .ok_or(DomainError::CardNotFielded { player: self.id, card })?;
        if skill_index >= count {
            return Err(DomainError::InvalidSkillIndex {
                card,
                index: skill_index,
            });
        }
        self.assignment_mut(card)?.skill_index = Some(skill_index);
        Ok(())
    }

    /// Aim `card` at `target`. The card must already hold a die.
    pub fn assign_target(&mut self, card: CardId, target: CardId) -> Result<(), DomainError> {
        let assignment = self.assignment_mut(card)?;
        if assignment.dice.is_none() {
            return Err(DomainError::DiceNotAssigned(card));
        }
        assignment.add_target(target);
        Ok(())
    }

    pub fn remove_target(&mut self, card: CardId, target: CardId) -> Result<(), DomainError> {
        if self.assignment_mut(card)?.remove_target(target) {
            Ok(())
        } else {
            Err(DomainError::InvalidTarget(target))
        }
    }

    /// Drop dice and assignments at round end.
    pub fn clear_round(&mut self) {
        self.dice.clear();
        self.assignments.clear();
    }
}
