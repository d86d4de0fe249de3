//! Action identifiers of the game.
//!
//! Each phase of a match exposes one or more named actions. The identifiers
//! are opaque to the `ActionController`; the only thing it asks of them is
//! their repeat policy.

use serde::{Deserialize, Serialize};

use crate::control::{ActionKind, ActionRepeat};

/// Every operation a player or the system may invoke on a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    StartGame,
    TakeCardsToCommonPool,
    TakeCardsToHand,
    CalculateLayDownOrder,
    LayCardsToBattle,
    PlayDices,
    ReplayDices,
    PassReplayDices,
    AssignDiceToCard,
    RemoveDiceFromCard,
    ConfirmAssignDicesToCards,
    ChooseCardSkill,
    AssignCardTarget,
    RemoveCardTarget,
    ConfirmCardTargets,
    StartRound,
    PerformRound,
    PerformMove,
    FinishRound,
    FinishGame,
}

impl Action {
    /// Stable name used by the view model.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Action::StartGame => "StartGame",
            Action::TakeCardsToCommonPool => "TakeCardsToCommonPool",
            Action::TakeCardsToHand => "TakeCardsToHand",
            Action::CalculateLayDownOrder => "CalculateLayDownOrder",
            Action::LayCardsToBattle => "LayCardsToBattle",
            Action::PlayDices => "PlayDices",
            Action::ReplayDices => "ReplayDices",
            Action::PassReplayDices => "PassReplayDices",
            Action::AssignDiceToCard => "AssignDiceToCard",
            Action::RemoveDiceFromCard => "RemoveDiceFromCard",
            Action::ConfirmAssignDicesToCards => "ConfirmAssignDicesToCards",
            Action::ChooseCardSkill => "ChooseCardSkill",
            Action::AssignCardTarget => "AssignCardTarget",
            Action::RemoveCardTarget => "RemoveCardTarget",
            Action::ConfirmCardTargets => "ConfirmCardTargets",
            Action::StartRound => "StartRound",
            Action::PerformRound => "PerformRound",
            Action::PerformMove => "PerformMove",
            Action::FinishRound => "FinishRound",
            Action::FinishGame => "FinishGame",
        }
    }
}

impl ActionKind for Action {
    fn repeat(self) -> ActionRepeat {
        match self {
            // Free-form sub-actions of the menu phases.
            Action::AssignDiceToCard
            | Action::RemoveDiceFromCard
            | Action::ChooseCardSkill
            | Action::AssignCardTarget
            | Action::RemoveCardTarget => ActionRepeat::Repeat,
            _ => ActionRepeat::Single,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_sub_actions_repeat() {
        assert_eq!(Action::AssignCardTarget.repeat(), ActionRepeat::Repeat);
        assert_eq!(Action::RemoveDiceFromCard.repeat(), ActionRepeat::Repeat);
        assert_eq!(Action::ConfirmCardTargets.repeat(), ActionRepeat::Single);
        assert_eq!(Action::PlayDices.repeat(), ActionRepeat::Single);
    }

    #[test]
    fn test_display_matches_name() {
        assert_eq!(format!("{}", Action::LayCardsToBattle), "LayCardsToBattle");
    }
}
