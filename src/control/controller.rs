//! Turn-admission state machine.
//!
//! The controller knows nothing about cards. It holds:
//! - the set of actions permitted right now,
//! - the players expected to act (empty for system steps),
//! - the subset of those players already done,
//! - whether the players must act in their listed order.
//!
//! ## Usage
//!
//! Callers first ask `can_do`, then mutate their own state, and only then
//! commit with `set_player_done_or_next_expected_action` (player phases) or
//! `set_next_expected_action` (system transitions). A failed mutation thus
//! never leaves a half-applied transition behind.
//!
//! ```
//! use trinica_rules::control::{ActionController, ActionKind, Advance};
//!
//! #[derive(Clone, Copy, Debug, PartialEq, Eq)]
//! enum Step { Draw, Play }
//! impl ActionKind for Step {}
//!
//! let mut controller = ActionController::new([Step::Draw], ["ann", "bob"], false);
//! assert!(controller.can_do(Step::Draw, Some(&"ann")));
//! assert!(!controller.can_do(Step::Play, Some(&"ann")));
//!
//! let advance = controller
//!     .set_player_done_or_next_expected_action(Step::Draw, &"ann", [Step::Play], ["ann", "bob"], false)
//!     .unwrap();
//! assert_eq!(advance, Advance::Waiting);
//! assert!(!controller.can_do(Step::Draw, Some(&"ann")));
//! assert!(controller.can_do(Step::Draw, Some(&"bob")));
//! ```

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

/// How often a player may invoke an action before being marked done.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionRepeat {
    /// Completing the action marks the player done for the phase.
    Single,
    /// Invocable any number of times; never marks the player done.
    Repeat,
}

/// An opaque action identifier.
///
/// The default repeat policy is `Single`; menu sub-actions override it.
pub trait ActionKind: Copy + Eq + std::fmt::Debug {
    fn repeat(self) -> ActionRepeat {
        ActionRepeat::Single
    }
}

/// Outcome of marking a player done.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    /// Other expected players still have to act; the phase is unchanged.
    Waiting,
    /// Everyone was done; the next state is installed.
    Advanced,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControllerError {
    #[error("action is not permitted in the current state")]
    ActionNotPermitted,

    #[error("player is not part of the current quorum")]
    PlayerNotExpected,

    #[error("player has already completed the current phase")]
    AlreadyDone,
}

/// Phase/turn state machine, generic over action ids `A` and player ids `P`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionController<A, P> {
    /// Actions permitted right now. Empty once the game is over.
    actions: SmallVec<[A; 4]>,

    /// Players expected to act, in turn order. Empty for system steps.
    expected_players: Vec<P>,

    /// Expected players that completed the current state.
    done_players: Vec<P>,

    /// Players must act strictly in `expected_players` order.
    must_obey_order: bool,
}

impl<A: ActionKind, P: Clone + PartialEq + std::fmt::Debug> ActionController<A, P> {
    /// Create a controller in the given initial state.
    pub fn new(
        actions: impl IntoIterator<Item = A>,
        players: impl IntoIterator<Item = P>,
        must_obey_order: bool,
    ) -> Self {
        let mut controller = Self {
            actions: SmallVec::new(),
            expected_players: Vec::new(),
            done_players: Vec::new(),
            must_obey_order: false,
        };
        controller.set_next_expected_action(actions, players, must_obey_order);
        controller
    }

    /// Create a controller whose first step is system-driven.
    pub fn system(actions: impl IntoIterator<Item = A>) -> Self {
        Self::new(actions, std::iter::empty(), false)
    }

    /// Check whether `action` may be performed now.
    ///
    /// `player = None` denotes a system step and is only gated by the
    /// permitted action set. A player must be expected, not yet done, and,
    /// when order is enforced, the first undone player in sequence.
    #[must_use]
    pub fn can_do(&self, action: A, player: Option<&P>) -> bool {
        if !self.actions.contains(&action) {
            return false;
        }

        let Some(player) = player else {
            return true;
        };

        if !self.expected_players.contains(player) || self.done_players.contains(player) {
            return false;
        }

        if self.must_obey_order {
            return self.next_player() == Some(player);
        }

        true
    }

    /// The first expected player that has not completed the current state.
    #[must_use]
    pub fn next_player(&self) -> Option<&P> {
        self.expected_players
            .iter()
            .find(|p| !self.done_players.contains(p))
    }

    /// Unconditionally replace the state.
    ///
    /// An empty `actions` set makes the controller terminal.
    pub fn set_next_expected_action(
        &mut self,
        actions: impl IntoIterator<Item = A>,
        players: impl IntoIterator<Item = P>,
        must_obey_order: bool,
    ) {
        self.actions.clear();
        for action in actions {
            if !self.actions.contains(&action) {
                self.actions.push(action);
            }
        }

        self.expected_players = players.into_iter().collect();
        self.done_players.clear();
        self.must_obey_order = must_obey_order;

        tracing::debug!(
            actions = ?self.actions,
            players = ?self.expected_players,
            must_obey_order,
            "next expected actions"
        );
    }

    /// Record that `player` completed `action`.
    ///
    /// A `Repeat` action leaves the player open and reports `Waiting`. A
    /// `Single` action marks the player done; once every expected player is
    /// done, the next state is installed.
    pub fn set_player_done_or_next_expected_action(
        &mut self,
        action: A,
        player: &P,
        next_actions: impl IntoIterator<Item = A>,
        next_players: impl IntoIterator<Item = P>,
        must_obey_order: bool,
    ) -> Result<Advance, ControllerError> {
        if !self.actions.contains(&action) {
            return Err(ControllerError::ActionNotPermitted);
        }
        if !self.expected_players.contains(player) {
            return Err(ControllerError::PlayerNotExpected);
        }
        if self.done_players.contains(player) {
            return Err(ControllerError::AlreadyDone);
        }
        if action.repeat() == ActionRepeat::Repeat {
            tracing::debug!(?player, ?action, "repeatable action, player stays open");
            return Ok(Advance::Waiting);
        }

        self.done_players.push(player.clone());

        if self.done_players.len() < self.expected_players.len() {
            tracing::debug!(?player, "player done, waiting for others");
            return Ok(Advance::Waiting);
        }

        self.set_next_expected_action(next_actions, next_players, must_obey_order);
        Ok(Advance::Advanced)
    }

    /// Actions permitted right now.
    #[must_use]
    pub fn actions(&self) -> &[A] {
        &self.actions
    }

    #[must_use]
    pub fn expected_players(&self) -> &[P] {
        &self.expected_players
    }

    /// Expected players that already completed the current state.
    #[must_use]
    pub fn done_players(&self) -> &[P] {
        &self.done_players
    }

    #[must_use]
    pub fn must_obey_order(&self) -> bool {
        self.must_obey_order
    }

    /// No action is permitted any more.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.actions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    enum Step {
        Roll,
        Pick,
        Confirm,
        Resolve,
    }

    impl ActionKind for Step {
        fn repeat(self) -> ActionRepeat {
            match self {
                Step::Pick => ActionRepeat::Repeat,
                _ => ActionRepeat::Single,
            }
        }
    }

    const A: u8 = 0;
    const B: u8 = 1;
    const C: u8 = 2;

    #[test]
    fn test_system_step_has_no_player_gate() {
        let controller: ActionController<Step, u8> = ActionController::system([Step::Resolve]);

        assert!(controller.can_do(Step::Resolve, None));
        assert!(!controller.can_do(Step::Roll, None));
        assert!(!controller.can_do(Step::Resolve, Some(&A)));
    }

    #[test]
    fn test_rejects_unexpected_player() {
        let controller = ActionController::new([Step::Roll], [A, B], false);

        assert!(controller.can_do(Step::Roll, Some(&A)));
        assert!(!controller.can_do(Step::Roll, Some(&C)));
    }

    #[test]
    fn test_barrier_waits_for_everyone() {
        let mut controller = ActionController::new([Step::Roll], [A, B], false);

        let advance = controller
            .set_player_done_or_next_expected_action(Step::Roll, &A, [Step::Resolve], [], false)
            .unwrap();
        assert_eq!(advance, Advance::Waiting);
        assert_eq!(controller.actions(), &[Step::Roll]);
        assert!(!controller.can_do(Step::Roll, Some(&A)));
        assert!(controller.can_do(Step::Roll, Some(&B)));

        let advance = controller
            .set_player_done_or_next_expected_action(Step::Roll, &B, [Step::Resolve], [], false)
            .unwrap();
        assert_eq!(advance, Advance::Advanced);
        assert!(controller.can_do(Step::Resolve, None));
        assert!(controller.done_players().is_empty());
    }

    #[test]
    fn test_order_enforced() {
        let mut controller = ActionController::new([Step::Roll], [A, B, C], true);

        assert!(!controller.can_do(Step::Roll, Some(&B)));
        assert!(!controller.can_do(Step::Roll, Some(&C)));
        assert!(controller.can_do(Step::Roll, Some(&A)));

        controller
            .set_player_done_or_next_expected_action(Step::Roll, &A, [Step::Resolve], [], false)
            .unwrap();

        assert!(controller.can_do(Step::Roll, Some(&B)));
        assert!(!controller.can_do(Step::Roll, Some(&C)));
        assert_eq!(controller.next_player(), Some(&B));
    }

    #[test]
    fn test_repeat_action_leaves_player_open() {
        let mut controller = ActionController::new([Step::Pick, Step::Confirm], [A, B], false);

        for _ in 0..3 {
            let advance = controller
                .set_player_done_or_next_expected_action(Step::Pick, &A, [Step::Resolve], [], false)
                .unwrap();
            assert_eq!(advance, Advance::Waiting);
            assert!(controller.done_players().is_empty());
            assert!(controller.can_do(Step::Pick, Some(&A)));
        }

        controller
            .set_player_done_or_next_expected_action(Step::Confirm, &A, [Step::Resolve], [], false)
            .unwrap();
        assert_eq!(controller.done_players(), &[A]);
        assert!(!controller.can_do(Step::Pick, Some(&A)));
        assert!(controller.can_do(Step::Pick, Some(&B)));

        // Even the last open player cannot advance the phase by repeating.
        controller
            .set_player_done_or_next_expected_action(Step::Pick, &B, [Step::Resolve], [], false)
            .unwrap();
        assert_eq!(controller.actions(), &[Step::Pick, Step::Confirm]);
    }

    #[test]
    fn test_completing_unpermitted_action() {
        let mut controller = ActionController::new([Step::Roll], [A, B], false);
        assert_eq!(
            controller.set_player_done_or_next_expected_action(Step::Confirm, &A, [Step::Resolve], [], false),
            Err(ControllerError::ActionNotPermitted)
        );
        assert!(controller.done_players().is_empty());
    }

    #[test]
    fn test_done_errors() {
        let mut controller = ActionController::new([Step::Roll], [A, B], false);

        assert_eq!(
            controller.set_player_done_or_next_expected_action(Step::Roll, &C, [Step::Resolve], [], false),
            Err(ControllerError::PlayerNotExpected)
        );

        controller
            .set_player_done_or_next_expected_action(Step::Roll, &A, [Step::Resolve], [], false)
            .unwrap();
        assert_eq!(
            controller.set_player_done_or_next_expected_action(Step::Roll, &A, [Step::Resolve], [], false),
            Err(ControllerError::AlreadyDone)
        );
    }

    #[test]
    fn test_terminal_state() {
        let mut controller: ActionController<Step, u8> = ActionController::system([Step::Resolve]);
        controller.set_next_expected_action([], [], false);

        assert!(controller.is_terminal());
        assert!(!controller.can_do(Step::Resolve, None));
    }

    #[test]
    fn test_duplicate_actions_collapse() {
        let controller: ActionController<Step, u8> =
            ActionController::system([Step::Resolve, Step::Resolve]);
        assert_eq!(controller.actions().len(), 1);
    }

    #[test]
    fn test_serialization() {
        let controller = ActionController::new([Step::Pick, Step::Confirm], [A, B], true);
        let json = serde_json::to_string(&controller).unwrap();
        let restored: ActionController<Step, u8> = serde_json::from_str(&json).unwrap();
        assert_eq!(controller, restored);
    }
}
