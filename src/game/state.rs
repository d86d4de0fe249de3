//! The match aggregate.
//!
//! A `Game` owns its players, the common pool, the center card, the round
//! state and exactly one `ActionController`. Every operation follows the same
//! shape:
//!
//! 1. ask the controller whether the action is admissible,
//! 2. validate and mutate domain state,
//! 3. commit the transition on the controller.
//!
//! A rejected action leaves the game untouched. Player actions live in
//! `phases`, the combat pipeline in `combat`.

use std::cmp::Reverse;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::outcome::GameResult;
use super::player::Player;
use super::round::{MoveRecord, RoundState};
use crate::cards::Card;
use crate::control::{ActionController, Advance};
use crate::core::{Action, CardId, DomainError, GameId, GameRng, PlayerId, Result, RulesConfig, RulesError};
use crate::effects::RoundSettings;
use crate::zones::FieldDeck;

/// The contested center slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CenterCard {
    pub card: CardId,
    pub owner: PlayerId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub(super) id: GameId,
    /// Optimistic concurrency counter, bumped by the repository on save.
    pub(super) version: u64,
    pub(super) config: RulesConfig,
    /// Players in seat order.
    pub(super) players: Vec<Player>,
    pub(super) common_pool: FieldDeck,
    pub(super) center: Option<CenterCard>,
    pub(super) center_rounds_alive: u32,
    pub(super) round_settings: RoundSettings,
    pub(super) controller: ActionController<Action, PlayerId>,
    pub(super) lay_down_order: Vec<PlayerId>,
    /// Cards laid during the current lay phase.
    pub(super) fresh_laid: BTreeSet<CardId>,
    /// Present only while a round is being resolved.
    pub(super) round: Option<RoundState>,
    pub(super) last_round_log: Vec<MoveRecord>,
    pub(super) rng: GameRng,
    pub(super) result: Option<GameResult>,
}

impl Game {
    /// Create a game waiting for StartGame.
    ///
    /// Rejects fewer than two players, decks above the playable limit and
    /// card ids used more than once.
    pub fn new(id: GameId, players: Vec<Player>, config: RulesConfig, seed: u64) -> Result<Self> {
        if players.len() < 2 {
            return Err(DomainError::NotEnoughPlayers.into());
        }

        let mut seats = BTreeSet::new();
        let mut cards = BTreeSet::new();
        for player in &players {
            if !seats.insert(player.id()) {
                return Err(RulesError::invariant(format!("{} is seated twice", player.id())));
            }
            let given = player.idle().len();
            if given > config.playable_cards_per_player {
                return Err(DomainError::DeckTooLarge {
                    given,
                    max: config.playable_cards_per_player,
                }
                .into());
            }
            if let Some(duplicate) = player.card_ids().find(|card| !cards.insert(*card)) {
                return Err(DomainError::DuplicateCard(duplicate).into());
            }
        }

        Ok(Self {
            id,
            version: 0,
            config,
            players,
            common_pool: FieldDeck::new(),
            center: None,
            center_rounds_alive: 0,
            round_settings: RoundSettings::new(),
            controller: ActionController::system([Action::StartGame]),
            lay_down_order: Vec::new(),
            fresh_laid: BTreeSet::new(),
            round: None,
            last_round_log: Vec::new(),
            rng: GameRng::new(seed),
            result: None,
        })
    }

    // === Accessors ===

    #[must_use]
    pub fn id(&self) -> &GameId {
        &self.id
    }

    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Used by repositories to stamp the stored version.
    pub fn set_version(&mut self, version: u64) {
        self.version = version;
    }

    #[must_use]
    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id() == id)
    }

    #[must_use]
    pub fn common_pool(&self) -> &FieldDeck {
        &self.common_pool
    }

    #[must_use]
    pub fn center(&self) -> Option<CenterCard> {
        self.center
    }

    /// Consecutive rounds the current center card has survived.
    #[must_use]
    pub fn center_rounds_alive(&self) -> u32 {
        self.center_rounds_alive
    }

    #[must_use]
    pub fn round_settings(&self) -> &RoundSettings {
        &self.round_settings
    }

    #[must_use]
    pub fn controller(&self) -> &ActionController<Action, PlayerId> {
        &self.controller
    }

    #[must_use]
    pub fn lay_down_order(&self) -> &[PlayerId] {
        &self.lay_down_order
    }

    #[must_use]
    pub fn fresh_laid(&self) -> &BTreeSet<CardId> {
        &self.fresh_laid
    }

    #[must_use]
    pub fn round(&self) -> Option<&RoundState> {
        self.round.as_ref()
    }

    /// Moves resolved in the last finished round.
    #[must_use]
    pub fn last_round_log(&self) -> &[MoveRecord] {
        &self.last_round_log
    }

    #[must_use]
    pub fn result(&self) -> Option<&GameResult> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn can_do(&self, action: Action, player: Option<PlayerId>) -> bool {
        self.controller.can_do(action, player.as_ref())
    }

    /// A hero has fallen or the center card held long enough.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.is_game_over_by_hero_elimination() || self.is_game_over_by_center_occupied()
    }

    #[must_use]
    pub fn is_game_over_by_hero_elimination(&self) -> bool {
        self.players.iter().any(Player::is_hero_eliminated)
    }

    #[must_use]
    pub fn is_game_over_by_center_occupied(&self) -> bool {
        self.center.is_some() && self.center_rounds_alive >= self.config.center_card_rounds_to_win
    }

    /// Game over and FinishGame has run.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.controller.is_terminal()
    }

    // === Card lookup ===

    pub(super) fn player_index(&self, id: PlayerId) -> Result<usize> {
        self.players
            .iter()
            .position(|p| p.id() == id)
            .ok_or_else(|| RulesError::invariant(format!("{id} is not seated in this game")))
    }

    /// Index of the player fielding `card`.
    pub(super) fn fielded_owner(&self, card: CardId) -> Option<usize> {
        self.players.iter().position(|p| p.is_fielded(card))
    }

    pub(super) fn card_in_play(&self, card: CardId) -> Option<&Card> {
        self.players.iter().find_map(|p| p.card_in_play(card))
    }

    pub(super) fn card_in_play_mut(&mut self, card: CardId) -> Option<&mut Card> {
        self.players.iter_mut().find_map(|p| p.card_in_play_mut(card))
    }

    /// Fielded cards of every player except the one at `owner`.
    pub(super) fn enemy_fielded(&self, owner: usize) -> Vec<CardId> {
        self.players
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != owner)
            .flat_map(|(_, p)| p.fielded_ids())
            .collect()
    }

    /// All fielded cards, shuffled, then stably sorted by speed descending.
    pub(super) fn battle_sequence(&mut self) -> Vec<CardId> {
        let mut cards: Vec<(CardId, i32)> = self
            .players
            .iter()
            .flat_map(Player::fielded)
            .map(|card| (card.id(), card.statistics().speed.calculated()))
            .collect();
        self.rng.shuffle(&mut cards);
        cards.sort_by_key(|(_, speed)| Reverse(*speed));
        cards.into_iter().map(|(id, _)| id).collect()
    }

    // === Controller plumbing ===

    pub(super) fn gate(&self, action: Action, player: Option<PlayerId>) -> Result<()> {
        if self.controller.can_do(action, player.as_ref()) {
            Ok(())
        } else {
            Err(RulesError::PhaseGate { action, player })
        }
    }

    pub(super) fn all_players(&self) -> Vec<PlayerId> {
        self.players.iter().map(Player::id).collect()
    }

    /// Install a system step.
    pub(super) fn next_system(&mut self, actions: &[Action]) {
        self.controller
            .set_next_expected_action(actions.iter().copied(), std::iter::empty(), false);
    }

    /// Commit `action` for `player`. Once every player completed the phase,
    /// open `next` for all players.
    pub(super) fn player_done(&mut self, action: Action, player: PlayerId, next: &[Action]) -> Result<Advance> {
        let players = self.all_players();
        self.player_done_towards(action, player, next, players)
    }

    pub(super) fn player_done_towards(
        &mut self,
        action: Action,
        player: PlayerId,
        next: &[Action],
        next_players: Vec<PlayerId>,
    ) -> Result<Advance> {
        self.controller
            .set_player_done_or_next_expected_action(action, &player, next.iter().copied(), next_players, false)
            .map_err(|e| RulesError::invariant(format!("{player} completing {action}: {e}")))
    }

    /// The system step to run next, if the game is waiting on one.
    ///
    /// When both PerformRound and PerformMove are open, the whole round is
    /// resolved.
    #[must_use]
    pub fn pending_system_action(&self) -> Option<Action> {
        if !self.controller.expected_players().is_empty() {
            return None;
        }
        let actions = self.controller.actions();
        if actions.contains(&Action::PerformRound) {
            return Some(Action::PerformRound);
        }
        actions.first().copied()
    }

    /// Run system steps until a player has to act or the game is finished.
    ///
    /// Returns the number of steps run.
    pub fn advance_system(&mut self) -> Result<usize> {
        let mut steps = 0;
        while let Some(action) = self.pending_system_action() {
            self.run_system_action(action)?;
            steps += 1;
        }
        Ok(steps)
    }

    pub(super) fn run_system_action(&mut self, action: Action) -> Result<()> {
        match action {
            Action::StartGame => self.start_game(),
            Action::TakeCardsToCommonPool => self.take_cards_to_common_pool(),
            Action::CalculateLayDownOrder => self.calculate_lay_down_order(),
            Action::StartRound => self.start_round(),
            Action::PerformRound => self.perform_round(),
            Action::PerformMove => self.perform_move(),
            Action::FinishRound => self.finish_round(),
            Action::FinishGame => self.finish_game(),
            other => Err(RulesError::PhaseGate {
                action: other,
                player: None,
            }),
        }
    }
}
