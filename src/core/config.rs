//! Rules configuration.
//!
//! Numeric limits of the rules live here instead of being scattered as
//! literals, so they can be calibrated per match (tests use small decks and
//! short center-card thresholds).

use serde::{Deserialize, Serialize};

/// Tunable limits of the rules.
///
/// ```
/// use trinica_rules::core::RulesConfig;
///
/// let config = RulesConfig::default().with_center_card_rounds_to_win(3);
/// assert_eq!(config.center_card_rounds_to_win, 3);
/// assert_eq!(config.max_hand_cards, 6);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Consecutive rounds a center card must survive to win the game.
    pub center_card_rounds_to_win: u32,

    /// Maximum cards a player may hold in hand.
    pub max_hand_cards: usize,

    /// Maximum cards a player may have in the battling deck.
    pub max_battling_cards: usize,

    /// Maximum cards a player may bring into a match (hero excluded).
    pub playable_cards_per_player: usize,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            center_card_rounds_to_win: 6,
            max_hand_cards: 6,
            max_battling_cards: 6,
            playable_cards_per_player: 30,
        }
    }
}

impl RulesConfig {
    /// Parse a config from JSON. Missing fields take their default value.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn with_center_card_rounds_to_win(mut self, rounds: u32) -> Self {
        self.center_card_rounds_to_win = rounds;
        self
    }

    #[must_use]
    pub fn with_max_hand_cards(mut self, max: usize) -> Self {
        self.max_hand_cards = max;
        self
    }

    #[must_use]
    pub fn with_max_battling_cards(mut self, max: usize) -> Self {
        self.max_battling_cards = max;
        self
    }

    #[must_use]
    pub fn with_playable_cards_per_player(mut self, max: usize) -> Self {
        self.playable_cards_per_player = max;
        self
    }
}
