//! Phase operations up to StartRound.
//!
//! | Action | Gate | Next |
//! |---|---|---|
//! | StartGame | system | TakeCardsToCommonPool |
//! | TakeCardsToCommonPool | system | TakeCardsToHand (barrier) |
//! | TakeCardsToHand | every player | CalculateLayDownOrder |
//! | CalculateLayDownOrder | system | LayCardsToBattle (ordered) |
//! | LayCardsToBattle | every player, in order | PlayDices (barrier) |
//! | PlayDices | every player | ReplayDices / PassReplayDices |
//! | ReplayDices, PassReplayDices | every player | dice menu |
//! | AssignDiceToCard, RemoveDiceFromCard | repeatable | - |
//! | ConfirmAssignDicesToCards | every player | target menu |
//! | ChooseCardSkill, AssignCardTarget, RemoveCardTarget | repeatable | - |
//! | ConfirmCardTargets | every player | StartRound |

use std::cmp::Reverse;
use std::collections::BTreeSet;

use tracing::{debug, info};

use super::command::{CardSource, CardToLay};
use super::state::{CenterCard, Game};
use crate::cards::Card;
use crate::control::Advance;
use crate::core::{Action, CardId, DomainError, PlayerId, Result};

const DICE_MENU: [Action; 3] = [
    Action::AssignDiceToCard,
    Action::RemoveDiceFromCard,
    Action::ConfirmAssignDicesToCards,
];

const TARGET_MENU: [Action; 4] = [
    Action::ChooseCardSkill,
    Action::AssignCardTarget,
    Action::RemoveCardTarget,
    Action::ConfirmCardTargets,
];

impl Game {
    pub fn start_game(&mut self) -> Result<()> {
        self.gate(Action::StartGame, None)?;
        info!(game = %self.id, players = self.players.len(), "game started");
        self.next_system(&[Action::TakeCardsToCommonPool]);
        Ok(())
    }

    /// Shuffle every idle deck and move half of each into the common pool.
    pub fn take_cards_to_common_pool(&mut self) -> Result<()> {
        self.gate(Action::TakeCardsToCommonPool, None)?;

        for player in &mut self.players {
            let half = player.shuffle_and_take_half(&mut self.rng);
            self.common_pool.append(half);
        }
        debug!(pool = self.common_pool.len(), "common pool filled");

        let players = self.all_players();
        self.controller
            .set_next_expected_action([Action::TakeCardsToHand], players, false);
        Ok(())
    }

    /// Draw one card per entry of `sources`, each at random from the named pile.
    pub fn take_cards_to_hand(&mut self, player: PlayerId, sources: &[CardSource]) -> Result<()> {
        self.gate(Action::TakeCardsToHand, Some(player))?;
        let index = self.player_index(player)?;

        let max = self.config.max_hand_cards;
        if self.players[index].hand().len() + sources.len() > max {
            return Err(DomainError::HandFull { max }.into());
        }
        let from_pool = sources.iter().filter(|s| **s == CardSource::CommonPool).count();
        if from_pool > self.common_pool.len() {
            return Err(DomainError::PileExhausted("common pool").into());
        }
        if sources.len() - from_pool > self.players[index].idle().len() {
            return Err(DomainError::PileExhausted("idle deck").into());
        }

        for source in sources {
            match source {
                CardSource::CommonPool => {
                    let card = self
                        .common_pool
                        .take_random(&mut self.rng)
                        .ok_or(DomainError::PileExhausted("common pool"))?;
                    self.players[index].add_card_to_hand(card);
                }
                CardSource::Own => {
                    self.players[index].take_card_to_hand(&mut self.rng)?;
                }
            }
        }
        debug!(%player, drawn = sources.len(), "cards taken to hand");

        self.player_done_towards(Action::TakeCardsToHand, player, &[Action::CalculateLayDownOrder], Vec::new())?;
        Ok(())
    }

    /// Order players by hero speed, fastest first; ties keep seat order.
    pub fn calculate_lay_down_order(&mut self) -> Result<()> {
        self.gate(Action::CalculateLayDownOrder, None)?;

        let mut order: Vec<(PlayerId, i32)> = self
            .players
            .iter()
            .map(|p| (p.id(), p.hero_speed()))
            .collect();
        order.sort_by_key(|(_, speed)| Reverse(*speed));
        self.lay_down_order = order.into_iter().map(|(id, _)| id).collect();
        self.fresh_laid.clear();
        debug!(order = ?self.lay_down_order, "lay down order");

        self.controller.set_next_expected_action(
            [Action::LayCardsToBattle],
            self.lay_down_order.clone(),
            true,
        );
        Ok(())
    }

    /// Lay cards from hand onto the battlefield.
    ///
    /// Items attach to a bearer named by `target`: the hero, a hero or unit
    /// already battling, or one laid earlier in the same call. At most one
    /// card may claim the center slot.
    pub fn lay_cards_to_battle(&mut self, player: PlayerId, cards: &[CardToLay]) -> Result<()> {
        self.gate(Action::LayCardsToBattle, Some(player))?;
        let index = self.player_index(player)?;
        self.validate_lay(index, cards)?;

        let owner = &mut self.players[index];
        for lay in cards {
            let card = owner.take_card_from_hand(lay.card)?;
            match (card, lay.target) {
                (item @ Card::Item(_), Some(bearer)) => owner.attach_item(bearer, item)?,
                (card, _) => {
                    owner.lay_card_to_battle(card);
                    self.fresh_laid.insert(lay.card);
                }
            }
            if lay.to_center {
                if let Some(previous) = self.center {
                    debug!(card = %previous.card, owner = %previous.owner, "center card displaced");
                }
                self.center = Some(CenterCard {
                    card: lay.card,
                    owner: player,
                });
                self.center_rounds_alive = 0;
            }
        }
        debug!(%player, laid = cards.len(), "cards laid to battle");

        self.player_done(Action::LayCardsToBattle, player, &[Action::PlayDices])?;
        Ok(())
    }

    fn validate_lay(&self, index: usize, cards: &[CardToLay]) -> Result<()> {
        let player = &self.players[index];
        let mut seen = BTreeSet::new();
        let mut laid_bearers: Vec<CardId> = Vec::new();
        let mut fielding = 0;
        let mut to_center = false;

        for lay in cards {
            if !seen.insert(lay.card) {
                return Err(DomainError::DuplicateCard(lay.card).into());
            }
            let card = player.hand().get(lay.card).ok_or(DomainError::CardNotInHand {
                player: player.id(),
                card: lay.card,
            })?;

            if let Card::Item(_) = card {
                if lay.to_center {
                    return Err(DomainError::NotCombatCapable(lay.card).into());
                }
                let bearer = lay.target.ok_or(DomainError::MissingBearer(lay.card))?;
                let valid = bearer == player.hero().id()
                    || laid_bearers.contains(&bearer)
                    || player.battling().get(bearer).is_some_and(Card::is_item_bearing);
                if !valid {
                    return Err(DomainError::InvalidAttachment {
                        item: lay.card,
                        target: bearer,
                    }
                    .into());
                }
                continue;
            }

            if let Some(target) = lay.target {
                return Err(DomainError::InvalidTarget(target).into());
            }
            if lay.to_center {
                if to_center {
                    return Err(DomainError::MultipleCenterCards.into());
                }
                to_center = true;
            }
            if card.is_item_bearing() {
                laid_bearers.push(lay.card);
            }
            fielding += 1;
        }

        let max = self.config.max_battling_cards;
        if player.battling().len() + fielding > max {
            return Err(DomainError::BattlefieldFull { max }.into());
        }
        Ok(())
    }

    /// Roll one die per fielded card.
    pub fn play_dices(&mut self, player: PlayerId) -> Result<()> {
        self.gate(Action::PlayDices, Some(player))?;
        let index = self.player_index(player)?;

        self.players[index].play_dices(&mut self.rng);
        debug!(%player, dice = ?self.players[index].dice(), "dice rolled");

        self.player_done(Action::PlayDices, player, &[Action::ReplayDices, Action::PassReplayDices])?;
        Ok(())
    }

    /// Re-roll the dice at `indices` once.
    pub fn replay_dices(&mut self, player: PlayerId, indices: &[usize]) -> Result<()> {
        self.gate(Action::ReplayDices, Some(player))?;
        let index = self.player_index(player)?;

        self.players[index].replay_dices(indices, &mut self.rng)?;
        debug!(%player, dice = ?self.players[index].dice(), "dice replayed");

        self.player_done(Action::ReplayDices, player, &DICE_MENU)?;
        Ok(())
    }

    pub fn pass_replay_dices(&mut self, player: PlayerId) -> Result<()> {
        self.gate(Action::PassReplayDices, Some(player))?;
        self.player_done(Action::PassReplayDices, player, &DICE_MENU)?;
        Ok(())
    }

    pub fn assign_dice_to_card(&mut self, player: PlayerId, dice_index: usize, card: CardId) -> Result<()> {
        self.gate(Action::AssignDiceToCard, Some(player))?;
        let index = self.player_index(player)?;
        self.players[index].assign_dice(dice_index, card)?;
        self.player_done(Action::AssignDiceToCard, player, &DICE_MENU)?;
        Ok(())
    }

    pub fn remove_dice_from_card(&mut self, player: PlayerId, card: CardId) -> Result<()> {
        self.gate(Action::RemoveDiceFromCard, Some(player))?;
        let index = self.player_index(player)?;
        self.players[index].remove_dice(card)?;
        self.player_done(Action::RemoveDiceFromCard, player, &DICE_MENU)?;
        Ok(())
    }

    pub fn confirm_assign_dices_to_cards(&mut self, player: PlayerId) -> Result<()> {
        self.gate(Action::ConfirmAssignDicesToCards, Some(player))?;
        self.player_done(Action::ConfirmAssignDicesToCards, player, &TARGET_MENU)?;
        Ok(())
    }

    pub fn choose_card_skill(&mut self, player: PlayerId, card: CardId, skill_index: usize) -> Result<()> {
        self.gate(Action::ChooseCardSkill, Some(player))?;
        let index = self.player_index(player)?;
        self.players[index].choose_skill(card, skill_index)?;
        self.player_done(Action::ChooseCardSkill, player, &TARGET_MENU)?;
        Ok(())
    }

    /// Aim `card` at an enemy's fielded card.
    pub fn assign_card_target(&mut self, player: PlayerId, card: CardId, target: CardId) -> Result<()> {
        self.gate(Action::AssignCardTarget, Some(player))?;
        let index = self.player_index(player)?;

        if !self.enemy_fielded(index).contains(&target) {
            return Err(DomainError::InvalidTarget(target).into());
        }
        self.players[index].assign_target(card, target)?;
        self.player_done(Action::AssignCardTarget, player, &TARGET_MENU)?;
        Ok(())
    }

    pub fn remove_card_target(&mut self, player: PlayerId, card: CardId, target: CardId) -> Result<()> {
        self.gate(Action::RemoveCardTarget, Some(player))?;
        let index = self.player_index(player)?;
        self.players[index].remove_target(card, target)?;
        self.player_done(Action::RemoveCardTarget, player, &TARGET_MENU)?;
        Ok(())
    }

    pub fn confirm_card_targets(&mut self, player: PlayerId) -> Result<()> {
        self.gate(Action::ConfirmCardTargets, Some(player))?;
        if self.player_done_towards(Action::ConfirmCardTargets, player, &[Action::StartRound], Vec::new())? == Advance::Advanced {
            debug!("all targets confirmed");
        }
        Ok(())
    }
}
