//! Ordered card container.
//!
//! A `FieldDeck` backs every card pile of the game: a player's idle, hand,
//! battling and dead decks, and the shared common pool. Backed by
//! `im::Vector`, so cloning a whole game for a snapshot stays cheap.
//!
//! ## Usage
//!
//! ```
//! use trinica_rules::zones::FieldDeck;
//! use trinica_rules::cards::{Card, ItemCard, StatisticPointGroup};
//! use trinica_rules::core::{CardId, GameRng};
//!
//! let mut deck = FieldDeck::from_cards((0..4).map(|i| {
//!     Card::Item(ItemCard::new(CardId::new(i), "Gem", StatisticPointGroup::default()))
//! }));
//!
//! let mut rng = GameRng::new(7);
//! let drawn = deck.take_random(&mut rng).unwrap();
//! assert_eq!(deck.len(), 3);
//! assert!(!deck.contains(drawn.id()));
//! ```

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::core::{CardId, GameRng};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDeck {
    cards: Vector<Card>,
}

impl FieldDeck {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        Self {
            cards: cards.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.position(id).is_some()
    }

    fn position(&self, id: CardId) -> Option<usize> {
        self.cards.iter().position(|c| c.id() == id)
    }

    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.cards.iter().find(|c| c.id() == id)
    }

    pub fn get_mut(&mut self, id: CardId) -> Option<&mut Card> {
        let index = self.position(id)?;
        self.cards.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = CardId> + '_ {
        self.cards.iter().map(Card::id)
    }

    /// Put a card on top.
    pub fn push(&mut self, card: Card) {
        self.cards.push_back(card);
    }

    /// Move every card of `other` on top of this deck.
    pub fn append(&mut self, other: FieldDeck) {
        self.cards.append(other.cards);
    }

    /// Randomize the order of the deck.
    pub fn shuffle(&mut self, rng: &mut GameRng) {
        let mut cards: Vec<Card> = self.cards.iter().cloned().collect();
        rng.shuffle(&mut cards);
        self.cards = cards.into_iter().collect();
    }

    /// Take the top card.
    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop_back()
    }

    /// Take a card at a random position.
    pub fn take_random(&mut self, rng: &mut GameRng) -> Option<Card> {
        if self.cards.is_empty() {
            return None;
        }
        let index = rng.gen_range_usize(0..self.cards.len());
        Some(self.cards.remove(index))
    }

    /// Take the card with the given id.
    pub fn take(&mut self, id: CardId) -> Option<Card> {
        let index = self.position(id)?;
        Some(self.cards.remove(index))
    }
}

impl FromIterator<Card> for FieldDeck {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        Self::from_cards(iter)
    }
}
