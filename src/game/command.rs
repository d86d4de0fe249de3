//! Command surface.
//!
//! One `Command` variant per action, carrying its payload. `Game::execute`
//! dispatches a command on behalf of a player (or the system) and reports
//! the same errors as the typed methods.

use serde::{Deserialize, Serialize};

use super::state::Game;
use crate::core::{Action, CardId, PlayerId, Result, RulesError};

/// Pile a card is drawn from in TakeCardsToHand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardSource {
    CommonPool,
    Own,
}

/// One card laid in LayCardsToBattle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardToLay {
    pub card: CardId,
    /// Bearer of an item card.
    pub target: Option<CardId>,
    /// Claim the center slot with this card.
    pub to_center: bool,
}

impl CardToLay {
    #[must_use]
    pub fn new(card: CardId) -> Self {
        Self {
            card,
            target: None,
            to_center: false,
        }
    }

    #[must_use]
    pub fn attached_to(mut self, bearer: CardId) -> Self {
        self.target = Some(bearer);
        self
    }

    #[must_use]
    pub fn to_center(mut self) -> Self {
        self.to_center = true;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    StartGame,
    TakeCardsToCommonPool,
    TakeCardsToHand { sources: Vec<CardSource> },
    CalculateLayDownOrder,
    LayCardsToBattle { cards: Vec<CardToLay> },
    PlayDices,
    ReplayDices { indices: Vec<usize> },
    PassReplayDices,
    AssignDiceToCard { dice_index: usize, card: CardId },
    RemoveDiceFromCard { card: CardId },
    ConfirmAssignDicesToCards,
    ChooseCardSkill { card: CardId, skill_index: usize },
    AssignCardTarget { card: CardId, target: CardId },
    RemoveCardTarget { card: CardId, target: CardId },
    ConfirmCardTargets,
    StartRound,
    PerformRound,
    PerformMove,
    FinishRound,
    FinishGame,
}

impl Command {
    #[must_use]
    pub fn action(&self) -> Action {
        match self {
            Command::StartGame => Action::StartGame,
            Command::TakeCardsToCommonPool => Action::TakeCardsToCommonPool,
            Command::TakeCardsToHand { .. } => Action::TakeCardsToHand,
            Command::CalculateLayDownOrder => Action::CalculateLayDownOrder,
            Command::LayCardsToBattle { .. } => Action::LayCardsToBattle,
            Command::PlayDices => Action::PlayDices,
            Command::ReplayDices { .. } => Action::ReplayDices,
            Command::PassReplayDices => Action::PassReplayDices,
            Command::AssignDiceToCard { .. } => Action::AssignDiceToCard,
            Command::RemoveDiceFromCard { .. } => Action::RemoveDiceFromCard,
            Command::ConfirmAssignDicesToCards => Action::ConfirmAssignDicesToCards,
            Command::ChooseCardSkill { .. } => Action::ChooseCardSkill,
            Command::AssignCardTarget { .. } => Action::AssignCardTarget,
            Command::RemoveCardTarget { .. } => Action::RemoveCardTarget,
            Command::ConfirmCardTargets => Action::ConfirmCardTargets,
            Command::StartRound => Action::StartRound,
            Command::PerformRound => Action::PerformRound,
            Command::PerformMove => Action::PerformMove,
            Command::FinishRound => Action::FinishRound,
            Command::FinishGame => Action::FinishGame,
        }
    }

    /// Steps driven by the game itself rather than a player.
    #[must_use]
    pub fn is_system(&self) -> bool {
        matches!(
            self.action(),
            Action::StartGame
                | Action::TakeCardsToCommonPool
                | Action::CalculateLayDownOrder
                | Action::StartRound
                | Action::PerformRound
                | Action::PerformMove
                | Action::FinishRound
                | Action::FinishGame
        )
    }
}

impl Game {
    /// Run `command` for `player`, or for the system when `player` is `None`.
    ///
    /// Player commands without a player and system commands with one are
    /// rejected at the gate.
    pub fn execute(&mut self, player: Option<PlayerId>, command: Command) -> Result<()> {
        let action = command.action();
        let acting = match (command.is_system(), player) {
            (true, None) => return self.run_system_action(action),
            (false, Some(player)) => player,
            _ => return Err(RulesError::PhaseGate { action, player }),
        };

        match command {
            Command::TakeCardsToHand { sources } => self.take_cards_to_hand(acting, &sources),
            Command::LayCardsToBattle { cards } => self.lay_cards_to_battle(acting, &cards),
            Command::PlayDices => self.play_dices(acting),
            Command::ReplayDices { indices } => self.replay_dices(acting, &indices),
            Command::PassReplayDices => self.pass_replay_dices(acting),
            Command::AssignDiceToCard { dice_index, card } => self.assign_dice_to_card(acting, dice_index, card),
            Command::RemoveDiceFromCard { card } => self.remove_dice_from_card(acting, card),
            Command::ConfirmAssignDicesToCards => self.confirm_assign_dices_to_cards(acting),
            Command::ChooseCardSkill { card, skill_index } => self.choose_card_skill(acting, card, skill_index),
            Command::AssignCardTarget { card, target } => self.assign_card_target(acting, card, target),
            Command::RemoveCardTarget { card, target } => self.remove_card_target(acting, card, target),
            Command::ConfirmCardTargets => self.confirm_card_targets(acting),
            _ => Err(RulesError::invariant(format!("{action} dispatched as a player command"))),
        }
    }
}
