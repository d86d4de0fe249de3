//! Effect hooks attached to combat-capable cards.
//!
//! Every hook is a pure function of the caster, its context and the incoming
//! value, returning the new value. The combat pipeline folds a card's
//! effects over the move in list order, so the outcome of a sequence of
//! hooks depends only on that order and can be tested without a game.
//!
//! ## Hook points
//!
//! | Hook | Caller |
//! |---|---|
//! | `on_round_start` | every card in the battle sequence, at StartRound |
//! | `on_round_finish` | every card in the battle sequence, at FinishRound |
//! | `before_move_at_all` / `after_move_at_all` | attacker, once per move |
//! | `before_move_at_single_target` / `after_move_at_single_target` | attacker, per target |
//! | `before_receive` / `after_receive` | each target |

use serde::{Deserialize, Serialize};

use super::moves::{CasterView, Move, MoveContext, MoveType, ReceiveContext};
use super::settings::RoundSettings;
use crate::core::CardId;

/// Lifecycle callbacks of an effect. All default to the identity.
pub trait EffectHooks {
    fn on_round_start(&self, _caster: &CasterView<'_>, settings: RoundSettings) -> RoundSettings {
        settings
    }

    /// Damage the effect deals to its own card as the round finishes.
    fn on_round_finish(&self, _caster: &CasterView<'_>) -> i32 {
        0
    }

    /// The effect as it carries into the next round; `None` once expired.
    fn next_round(&self) -> Option<Self>
    where
        Self: Clone,
    {
        Some(self.clone())
    }

    fn before_move_at_all(&self, _caster: &CasterView<'_>, _ctx: &MoveContext<'_>, mv: Move) -> Move {
        mv
    }

    fn after_move_at_all(&self, _caster: &CasterView<'_>, _ctx: &MoveContext<'_>, mv: Move) -> Move {
        mv
    }

    fn before_move_at_single_target(&self, _caster: &CasterView<'_>, _target: CardId, mv: Move) -> Move {
        mv
    }

    fn after_move_at_single_target(&self, _caster: &CasterView<'_>, _target: CardId, mv: Move) -> Move {
        mv
    }

    fn before_receive(&self, _caster: &CasterView<'_>, _ctx: &ReceiveContext<'_>, mv: Move) -> Move {
        mv
    }

    fn after_receive(&self, _caster: &CasterView<'_>, _ctx: &ReceiveContext<'_>, mv: Move) -> Move {
        mv
    }
}

/// Round-finish fold over a card's effects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundFinish<E = Effect> {
    /// Damage the effects deal to their own card.
    pub self_damage: i32,
    /// Effects still active next round, in list order.
    pub remaining: Vec<E>,
}

/// Built-in effect behaviours.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    /// Outgoing moves deal `bonus` more damage.
    Empower { bonus: i32 },
    /// Each single-target move deals `bonus` more damage.
    Focus { bonus: i32 },
    /// Incoming moves deal `reduction` less damage, never below zero.
    Shield { reduction: i32 },
    /// The card cannot move.
    Stun,
    /// The card cannot use its items.
    Disarm,
    /// The card cannot use skills.
    Silence,
    /// Incoming skills neither hurt nor attach effects.
    SpellWard,
    /// Enemies must attack this card.
    Taunt,
    /// The card cannot be targeted.
    Stealth,
    /// The card loses `damage` HP at the end of every round.
    Poison { damage: i32 },
}

/// An effect instance: behaviour plus remaining duration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Effect {
    pub kind: EffectKind,
    /// Rounds left including the current one; `None` never expires.
    pub rounds: Option<u32>,
}

impl Effect {
    #[must_use]
    pub const fn permanent(kind: EffectKind) -> Self {
        Self { kind, rounds: None }
    }

    #[must_use]
    pub const fn lasting(kind: EffectKind, rounds: u32) -> Self {
        Self {
            kind,
            rounds: Some(rounds),
        }
    }
}

impl EffectHooks for Effect {
    fn on_round_start(&self, caster: &CasterView<'_>, mut settings: RoundSettings) -> RoundSettings {
        match self.kind {
            EffectKind::Taunt => settings.prioritize(caster.id),
            EffectKind::Stealth => settings.exclude(caster.id),
            _ => {}
        }
        settings
    }

    fn on_round_finish(&self, _caster: &CasterView<'_>) -> i32 {
        match self.kind {
            EffectKind::Poison { damage } => damage,
            _ => 0,
        }
    }

    fn next_round(&self) -> Option<Self> {
        match self.rounds {
            None => Some(*self),
            Some(rounds) if rounds > 1 => Some(Effect::lasting(self.kind, rounds - 1)),
            Some(_) => None,
        }
    }

    fn before_move_at_all(&self, _caster: &CasterView<'_>, _ctx: &MoveContext<'_>, mut mv: Move) -> Move {
        match self.kind {
            EffectKind::Empower { bonus } => mv.damage += bonus,
            EffectKind::Stun => mv.move_enabled = false,
            EffectKind::Disarm => mv.items_enabled = false,
            EffectKind::Silence => mv.skills_enabled = false,
            _ => {}
        }
        mv
    }

    fn before_move_at_single_target(&self, _caster: &CasterView<'_>, _target: CardId, mut mv: Move) -> Move {
        if let EffectKind::Focus { bonus } = self.kind {
            mv.damage += bonus;
        }
        mv
    }

    fn before_receive(&self, _caster: &CasterView<'_>, _ctx: &ReceiveContext<'_>, mut mv: Move) -> Move {
        match self.kind {
            EffectKind::Shield { reduction } => mv.damage = (mv.damage - reduction).max(0),
            EffectKind::SpellWard if mv.kind == MoveType::Skill => {
                mv.skills_enabled = false;
                mv.effects_enabled = false;
            }
            _ => {}
        }
        mv
    }
}

/// Fold `before_move_at_all` of every effect over `mv`, in list order.
pub fn before_move_at_all<E: EffectHooks>(effects: &[E], caster: &CasterView<'_>, ctx: &MoveContext<'_>, mv: Move) -> Move {
    effects.iter().fold(mv, |mv, e| e.before_move_at_all(caster, ctx, mv))
}

pub fn after_move_at_all<E: EffectHooks>(effects: &[E], caster: &CasterView<'_>, ctx: &MoveContext<'_>, mv: Move) -> Move {
    effects.iter().fold(mv, |mv, e| e.after_move_at_all(caster, ctx, mv))
}

pub fn before_move_at_single_target<E: EffectHooks>(effects: &[E], caster: &CasterView<'_>, target: CardId, mv: Move) -> Move {
    effects
        .iter()
        .fold(mv, |mv, e| e.before_move_at_single_target(caster, target, mv))
}

pub fn after_move_at_single_target<E: EffectHooks>(effects: &[E], caster: &CasterView<'_>, target: CardId, mv: Move) -> Move {
    effects
        .iter()
        .fold(mv, |mv, e| e.after_move_at_single_target(caster, target, mv))
}

pub fn before_receive<E: EffectHooks>(effects: &[E], caster: &CasterView<'_>, ctx: &ReceiveContext<'_>, mv: Move) -> Move {
    effects.iter().fold(mv, |mv, e| e.before_receive(caster, ctx, mv))
}

pub fn after_receive<E: EffectHooks>(effects: &[E], caster: &CasterView<'_>, ctx: &ReceiveContext<'_>, mv: Move) -> Move {
    effects.iter().fold(mv, |mv, e| e.after_receive(caster, ctx, mv))
}

pub fn on_round_start<E: EffectHooks>(effects: &[E], caster: &CasterView<'_>, settings: RoundSettings) -> RoundSettings {
    effects
        .iter()
        .fold(settings, |settings, e| e.on_round_start(caster, settings))
}

/// Sum the round-finish damage of `effects` and age each one by a round.
pub fn on_round_finish<E: EffectHooks + Clone>(effects: &[E], caster: &CasterView<'_>) -> RoundFinish<E> {
    effects.iter().fold(
        RoundFinish {
            self_damage: 0,
            remaining: Vec::with_capacity(effects.len()),
        },
        |mut finish, e| {
            finish.self_damage += e.on_round_finish(caster);
            finish.remaining.extend(e.next_round());
            finish
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::StatisticPointGroup;

    fn caster(stats: &StatisticPointGroup) -> CasterView<'_> {
        CasterView {
            id: CardId(1),
            statistics: stats,
        }
    }

    #[test]
    fn test_empower_and_stun() {
        let stats = StatisticPointGroup::new(3, 10, 1, 1);
        let ctx = MoveContext {
            targets: &[CardId(9)],
            enemies: &[CardId(9)],
        };
        let effects = [
            Effect::permanent(EffectKind::Empower { bonus: 2 }),
            Effect::permanent(EffectKind::Stun),
        ];

        let mv = before_move_at_all(&effects, &caster(&stats), &ctx, Move::new(3, MoveType::Attack));

        assert_eq!(mv.damage, 5);
        assert!(!mv.move_enabled);
        assert!(mv.attack_enabled);
    }

    #[test]
    fn test_shield_floors_at_zero() {
        let stats = StatisticPointGroup::new(0, 10, 0, 0);
        let ctx = ReceiveContext {
            attacker: CardId(2),
            enemies: &[],
        };
        let shield = [Effect::permanent(EffectKind::Shield { reduction: 5 })];

        let mv = before_receive(&shield, &caster(&stats), &ctx, Move::new(3, MoveType::Attack));
        assert_eq!(mv.damage, 0);
    }

    #[test]
    fn test_hook_order_matters() {
        // Empower then shield: (1 + 3) - 5 floors at 0.
        let stats = StatisticPointGroup::new(1, 10, 1, 1);
        let out_ctx = MoveContext {
            targets: &[],
            enemies: &[],
        };
        let in_ctx = ReceiveContext {
            attacker: CardId(1),
            enemies: &[],
        };
        let attacker = [Effect::permanent(EffectKind::Empower { bonus: 3 })];
        let defender = [Effect::permanent(EffectKind::Shield { reduction: 5 })];

        let mv = Move::new(1, MoveType::Attack);
        let mv = before_move_at_all(&attacker, &caster(&stats), &out_ctx, mv);
        let mv = before_receive(&defender, &caster(&stats), &in_ctx, mv);
        assert_eq!(mv.damage, 0);

        // The reverse order would have left 3 damage.
        let mv = Move::new(1, MoveType::Attack);
        let mv = before_receive(&defender, &caster(&stats), &in_ctx, mv);
        let mv = before_move_at_all(&attacker, &caster(&stats), &out_ctx, mv);
        assert_eq!(mv.damage, 3);
    }

    #[test]
    fn test_spell_ward_only_blocks_skills() {
        let stats = StatisticPointGroup::new(0, 10, 0, 0);
        let ctx = ReceiveContext {
            attacker: CardId(2),
            enemies: &[],
        };
        let ward = [Effect::permanent(EffectKind::SpellWard)];

        let attack = before_receive(&ward, &caster(&stats), &ctx, Move::new(2, MoveType::Attack));
        assert!(attack.skills_enabled);

        let skill = before_receive(&ward, &caster(&stats), &ctx, Move::new(2, MoveType::Skill));
        assert!(!skill.skills_enabled);
        assert!(!skill.effects_enabled);
    }

    #[test]
    fn test_hooks_are_idempotent_on_input() {
        let stats = StatisticPointGroup::new(1, 10, 1, 1);
        let ctx = MoveContext {
            targets: &[],
            enemies: &[],
        };
        let effects = [Effect::permanent(EffectKind::Disarm)];
        let mv = Move::new(2, MoveType::Attack);

        let first = before_move_at_all(&effects, &caster(&stats), &ctx, mv);
        let second = before_move_at_all(&effects, &caster(&stats), &ctx, mv);
        assert_eq!(first, second);
        assert!(!first.items_enabled);
    }

    #[test]
    fn test_round_start_writes_settings() {
        let stats = StatisticPointGroup::new(1, 10, 1, 1);
        let effects = [
            Effect::permanent(EffectKind::Taunt),
            Effect::permanent(EffectKind::Stealth),
        ];

        let settings = on_round_start(&effects, &caster(&stats), RoundSettings::new());
        assert_eq!(settings.prioritized_targets(), &[CardId(1)]);
        assert!(settings.is_excluded(CardId(1)));
    }

    #[test]
    fn test_round_finish_duration() {
        let stats = StatisticPointGroup::new(1, 10, 1, 1);
        let taunt = Effect::permanent(EffectKind::Taunt);
        let effects = [Effect::lasting(EffectKind::Poison { damage: 2 }, 2), taunt];

        let first = on_round_finish(&effects, &caster(&stats));
        assert_eq!(first.self_damage, 2);
        assert_eq!(
            first.remaining,
            vec![Effect::lasting(EffectKind::Poison { damage: 2 }, 1), taunt]
        );

        let second = on_round_finish(&first.remaining, &caster(&stats));
        assert_eq!(second.self_damage, 2);
        assert_eq!(second.remaining, vec![taunt]);
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    struct Marker;

    impl EffectHooks for Marker {}

    #[test]
    fn test_default_hooks_are_identity() {
        let stats = StatisticPointGroup::new(1, 10, 1, 1);
        let ctx = MoveContext {
            targets: &[],
            enemies: &[],
        };
        let mv = Move::new(4, MoveType::Attack);

        assert_eq!(before_move_at_all(&[Marker], &caster(&stats), &ctx, mv), mv);
        let finish = on_round_finish(&[Marker, Marker], &caster(&stats));
        assert_eq!(finish.self_damage, 0);
        assert_eq!(finish.remaining, vec![Marker, Marker]);
    }
}
