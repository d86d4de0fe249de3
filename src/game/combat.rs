//! Combat resolution.
//!
//! StartRound fixes the battle sequence. Every PerformMove resolves the card
//! under the cursor:
//!
//! 1. Collect its targets: assigned, still fielded, not excluded.
//! 2. Derive the move type from its die.
//! 3. Apply a taunt override from the round settings.
//! 4. Equip items on the attacker and on targets.
//! 5. Fold the before-hooks over the move.
//! 6. Drop the attacker's items, and their bonus to the hit, if a hook
//!    disabled them.
//! 7. Apply damage and skill effects; bury the dead.
//! 8. Fold the after-hooks over a freshly computed move.
//! 9. Check for game over.
//! 10. Unequip every item applied in step 4.
//! 11. Continue with the next card or finish the round.
//!
//! A fallen hero ends the game on the spot, even with cards left in the
//! sequence.

use smallvec::SmallVec;
use tracing::{debug, info};

use super::outcome::GameResult;
use super::round::{MoveRecord, RoundState};
use super::state::Game;
use crate::cards::Card;
use crate::core::{Action, CardId, Result, RulesError};
use crate::effects::effect as hooks;
use crate::effects::{CasterView, Move, MoveContext, MoveType, ReceiveContext, RoundFinish};

/// Damage an attacker deals with a move of `kind`.
///
/// A spell resolving a skill deals its fixed damage. Otherwise skills hit
/// for the current Power and attacks for the current Attack. The defender
/// does not mitigate.
#[must_use]
pub fn calculate_damage(attacker: &Card, _defender: Option<&Card>, kind: MoveType, _skill_index: Option<usize>) -> i32 {
    if let (Some(damage), MoveType::Skill) = (attacker.spell_damage(), kind) {
        return damage;
    }
    match kind {
        MoveType::Skill => attacker.statistics().power.calculated(),
        MoveType::Attack => attacker.statistics().attack.calculated(),
    }
}

enum Casualty {
    None,
    Card,
    Hero,
}

impl Game {
    /// Open a round: count the center card's survival, fix the battle
    /// sequence and run the round-start hooks.
    pub fn start_round(&mut self) -> Result<()> {
        self.gate(Action::StartRound, None)?;

        if let Some(center) = self.center {
            self.center_rounds_alive += 1;
            debug!(card = %center.card, rounds = self.center_rounds_alive, "center card survives");
            if self.is_game_over_by_center_occupied() {
                self.next_system(&[Action::FinishGame]);
                return Ok(());
            }
        }

        let sequence = self.battle_sequence();

        let mut settings = std::mem::take(&mut self.round_settings);
        settings.clear();
        for &id in &sequence {
            if let Some(card) = self.card_in_play(id) {
                let caster = CasterView {
                    id,
                    statistics: card.statistics(),
                };
                settings = hooks::on_round_start(card.effects(), &caster, settings);
            }
        }
        self.round_settings = settings;

        debug!(sequence = ?sequence, "round started");
        self.round = Some(RoundState::new(sequence));
        self.next_system(&[Action::PerformRound, Action::PerformMove]);
        Ok(())
    }

    /// Resolve the remaining battle sequence in one call.
    pub fn perform_round(&mut self) -> Result<()> {
        self.gate(Action::PerformRound, None)?;
        while self.controller.can_do(Action::PerformMove, None) {
            self.resolve_next_move()?;
        }
        Ok(())
    }

    /// Resolve the card under the cursor.
    pub fn perform_move(&mut self) -> Result<()> {
        self.gate(Action::PerformMove, None)?;
        self.resolve_next_move()
    }

    fn resolve_next_move(&mut self) -> Result<()> {
        let round = self
            .round
            .as_mut()
            .ok_or_else(|| RulesError::invariant("move resolved outside a round"))?;
        let attacker = round.current();
        round.advance();

        let hero_fell = match attacker {
            Some(attacker) => self.resolve_card(attacker)?,
            None => false,
        };

        let exhausted = self.round.as_ref().map_or(true, RoundState::is_exhausted);
        if hero_fell || self.is_game_over() {
            self.next_system(&[Action::FinishGame]);
        } else if exhausted {
            self.next_system(&[Action::FinishRound]);
        } else {
            self.next_system(&[Action::PerformMove]);
        }
        Ok(())
    }

    /// Resolve one card. Returns whether a hero fell.
    fn resolve_card(&mut self, attacker_id: CardId) -> Result<bool> {
        // A card killed earlier this round no longer acts.
        let Some(owner) = self.fielded_owner(attacker_id) else {
            return Ok(false);
        };
        let Some(assignment) = self.players[owner].assignment(attacker_id).cloned() else {
            return Ok(false);
        };

        let mut targets: SmallVec<[CardId; 4]> = assignment
            .targets()
            .iter()
            .copied()
            .filter(|t| self.fielded_owner(*t).is_some() && !self.round_settings.is_excluded(*t))
            .collect();
        if targets.is_empty() {
            return Ok(false);
        }

        let outcome = assignment
            .outcome()
            .ok_or_else(|| RulesError::invariant(format!("{attacker_id} entered combat without a die")))?;
        let kind = if outcome.is_element() {
            MoveType::Skill
        } else {
            MoveType::Attack
        };

        let enemies = self.enemy_fielded(owner);
        let taunting: Vec<CardId> = self
            .round_settings
            .prioritized_targets()
            .iter()
            .copied()
            .filter(|id| enemies.contains(id) && !self.round_settings.is_excluded(*id))
            .collect();
        if let Some(&forced) = self.rng.choose(&taunting) {
            debug!(attacker = %attacker_id, target = %forced, "target forced");
            targets = SmallVec::from_elem(forced, 1);
        }

        // Items.
        let items_applied = self.players[owner]
            .card_in_play_mut(attacker_id)
            .is_some_and(Card::equip_items);
        for &target in &targets {
            if let Some(card) = self.card_in_play_mut(target) {
                card.equip_items();
            }
        }

        // Before hooks.
        let skill_index = assignment.skill_index;
        let (mut at_all, mut moves, equipped_damage) = {
            let attacker = self.players[owner]
                .card_in_play(attacker_id)
                .ok_or_else(|| RulesError::invariant(format!("{attacker_id} vanished mid-move")))?;
            let caster = CasterView {
                id: attacker_id,
                statistics: attacker.statistics(),
            };
            let ctx = MoveContext {
                targets: &targets,
                enemies: &enemies,
            };
            let equipped_damage = calculate_damage(attacker, None, kind, skill_index);
            let provisional = Move::new(equipped_damage, kind);
            let at_all = hooks::before_move_at_all(attacker.effects(), &caster, &ctx, provisional);

            let mut moves: SmallVec<[(CardId, Move); 4]> = SmallVec::new();
            for &target in &targets {
                let mv = hooks::before_move_at_single_target(attacker.effects(), &caster, target, at_all);
                moves.push((target, mv));
            }
            let receive = ReceiveContext {
                attacker: attacker_id,
                enemies: &enemies,
            };
            for (target, mv) in &mut moves {
                if let Some(card) = self.card_in_play(*target) {
                    let defender = CasterView {
                        id: *target,
                        statistics: card.statistics(),
                    };
                    *mv = hooks::before_receive(card.effects(), &defender, &receive, *mv);
                }
            }
            (at_all, moves, equipped_damage)
        };

        if items_applied && !at_all.items_enabled {
            if let Some(card) = self.players[owner].card_in_play_mut(attacker_id) {
                card.unequip_items();
                let bonus = equipped_damage - calculate_damage(card, None, kind, skill_index);
                debug!(attacker = %attacker_id, bonus, "items disabled");
                at_all.damage = (at_all.damage - bonus).max(0);
                for (_, mv) in &mut moves {
                    mv.damage = (mv.damage - bonus).max(0);
                }
            }
        }

        // Perform.
        let mut applied = Vec::new();
        let mut hero_fell = false;
        if at_all.move_enabled {
            hero_fell = match kind {
                MoveType::Attack => self.apply_attack(owner, attacker_id, at_all, &moves, &mut applied)?,
                MoveType::Skill => self.apply_skill(owner, attacker_id, at_all, &moves, skill_index, &mut applied)?,
            };
        }

        let (reported_damage, reported) = if hero_fell {
            (at_all.damage, Vec::new())
        } else {
            self.run_after_hooks(attacker_id, kind, skill_index, &targets, &enemies)
        };

        self.unequip(attacker_id, &targets);

        debug!(
            attacker = %attacker_id,
            ?kind,
            targets = ?targets,
            applied = ?applied,
            reported_damage,
            reported = ?reported,
            "move resolved"
        );
        if let Some(round) = self.round.as_mut() {
            round.record(MoveRecord {
                attacker: attacker_id,
                kind,
                targets,
                applied,
                reported_damage,
                reported,
                move_enabled: at_all.move_enabled,
            });
        }

        Ok(hero_fell)
    }

    fn apply_attack(
        &mut self,
        owner: usize,
        attacker_id: CardId,
        at_all: Move,
        moves: &[(CardId, Move)],
        applied: &mut Vec<(CardId, i32)>,
    ) -> Result<bool> {
        let can_attack = self.players[owner]
            .fielded_card(attacker_id)
            .is_some_and(Card::is_item_bearing);
        if !at_all.attack_enabled || !can_attack {
            return Ok(false);
        }

        for &(target, mv) in moves {
            let Some(target_owner) = self.fielded_owner(target) else {
                continue;
            };
            self.players[target_owner].inflict_damage(target, mv.damage)?;
            applied.push((target, mv.damage));
            if let Casualty::Hero = self.settle_casualty(target_owner, target) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn apply_skill(
        &mut self,
        owner: usize,
        attacker_id: CardId,
        at_all: Move,
        moves: &[(CardId, Move)],
        skill_index: Option<usize>,
        applied: &mut Vec<(CardId, i32)>,
    ) -> Result<bool> {
        if !at_all.skills_enabled {
            return Ok(false);
        }
        let Some(attacker) = self.players[owner].fielded_card(attacker_id) else {
            return Ok(false);
        };
        let power_damage = attacker.does_power_damage(skill_index);
        let is_spell = matches!(attacker, Card::Spell(_));
        let skill_effects = attacker.skill_effects(skill_index).to_vec();

        for &(target, mv) in moves {
            if !mv.skills_enabled {
                continue;
            }
            let Some(target_owner) = self.fielded_owner(target) else {
                continue;
            };

            if power_damage {
                self.players[target_owner].inflict_damage(target, mv.damage)?;
                applied.push((target, mv.damage));
            }
            if is_spell && self.players[owner].kill_card(attacker_id) {
                debug!(spell = %attacker_id, "spell consumed");
                self.vacate_center(attacker_id);
            }
            match self.settle_casualty(target_owner, target) {
                Casualty::Hero => return Ok(true),
                Casualty::Card => continue,
                Casualty::None => {}
            }

            if mv.effects_enabled && !skill_effects.is_empty() {
                if let Some(effects) = self.players[target_owner]
                    .card_in_play_mut(target)
                    .and_then(Card::effects_mut)
                {
                    effects.extend(skill_effects.iter().copied());
                }
            }
        }
        Ok(false)
    }

    /// Bury `target` if it died. A dead center card vacates the slot.
    fn settle_casualty(&mut self, owner: usize, target: CardId) -> Casualty {
        let player = &mut self.players[owner];
        if player.hero().id() == target {
            if !player.is_card_dead(target) {
                return Casualty::None;
            }
            info!(hero = %target, player = %player.id(), "hero eliminated");
            return Casualty::Hero;
        }
        if !player.bury_if_depleted(target) {
            return Casualty::None;
        }

        debug!(card = %target, "card eliminated");
        self.vacate_center(target);
        Casualty::Card
    }

    /// Free the center slot if `card` holds it.
    fn vacate_center(&mut self, card: CardId) {
        if self.center.is_some_and(|c| c.card == card) {
            debug!(%card, "center slot vacated");
            self.center = None;
            self.center_rounds_alive = 0;
        }
    }

    /// Fold the after-hooks over a move recomputed from current statistics.
    /// Returns the damage reported by the move as a whole and per target.
    fn run_after_hooks(
        &self,
        attacker_id: CardId,
        kind: MoveType,
        skill_index: Option<usize>,
        targets: &[CardId],
        enemies: &[CardId],
    ) -> (i32, Vec<(CardId, i32)>) {
        let Some(attacker) = self.card_in_play(attacker_id) else {
            return (0, Vec::new());
        };
        let caster = CasterView {
            id: attacker_id,
            statistics: attacker.statistics(),
        };
        let ctx = MoveContext { targets, enemies };
        let fresh = Move::new(calculate_damage(attacker, None, kind, skill_index), kind);
        let at_all = hooks::after_move_at_all(attacker.effects(), &caster, &ctx, fresh);

        let receive = ReceiveContext {
            attacker: attacker_id,
            enemies,
        };
        let mut reported = Vec::with_capacity(targets.len());
        for &target in targets {
            let Some(defender) = self.card_in_play(target) else {
                continue;
            };
            let fresh = Move::new(calculate_damage(attacker, Some(defender), kind, skill_index), kind);
            let mv = hooks::after_move_at_single_target(attacker.effects(), &caster, target, fresh);

            let view = CasterView {
                id: target,
                statistics: defender.statistics(),
            };
            let mv = hooks::after_receive(defender.effects(), &view, &receive, mv);
            reported.push((target, mv.damage));
        }
        (at_all.damage, reported)
    }

    fn unequip(&mut self, attacker_id: CardId, targets: &[CardId]) {
        for &id in std::iter::once(&attacker_id).chain(targets) {
            if let Some(card) = self.card_in_play_mut(id) {
                card.unequip_items();
            }
        }
    }

    /// Close the round: round-finish hooks, effect expiry, dice cleanup.
    pub fn finish_round(&mut self) -> Result<()> {
        self.gate(Action::FinishRound, None)?;
        let round = self
            .round
            .take()
            .ok_or_else(|| RulesError::invariant("round finished before it started"))?;

        for &id in round.sequence() {
            let Some(owner) = self.fielded_owner(id) else {
                continue;
            };
            let player = &mut self.players[owner];
            let Some(card) = player.card_in_play_mut(id) else {
                continue;
            };

            let caster = CasterView {
                id,
                statistics: card.statistics(),
            };
            let RoundFinish { self_damage, remaining } = hooks::on_round_finish(card.effects(), &caster);
            if let Some(effects) = card.effects_mut() {
                *effects = remaining;
            }

            if self_damage != 0 {
                player.inflict_damage(id, self_damage)?;
                debug!(card = %id, self_damage, "round-finish damage");
                self.settle_casualty(owner, id);
            }
        }

        for player in &mut self.players {
            player.clear_round();
        }
        self.round_settings.clear();
        self.last_round_log = round.into_log();

        if self.is_game_over() {
            self.next_system(&[Action::FinishGame]);
        } else {
            let players = self.all_players();
            self.controller
                .set_next_expected_action([Action::TakeCardsToHand], players, false);
        }
        Ok(())
    }

    /// Decide the result and make the controller terminal.
    pub fn finish_game(&mut self) -> Result<()> {
        self.gate(Action::FinishGame, None)?;

        if let Some(round) = self.round.take() {
            self.last_round_log = round.into_log();
        }

        let result = if self.is_game_over_by_hero_elimination() {
            GameResult::from_survivors(
                self.players
                    .iter()
                    .filter(|p| !p.is_hero_eliminated())
                    .map(|p| p.id())
                    .collect(),
            )
        } else if let Some(center) = self.center.filter(|_| self.is_game_over_by_center_occupied()) {
            GameResult::Winner(center.owner)
        } else {
            GameResult::Draw
        };

        info!(game = %self.id, ?result, "game over");
        self.result = Some(result);
        self.next_system(&[]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CharacterCard, Element, SpellCard, StatisticPointGroup};
    use crate::core::{GameId, PlayerId, RulesConfig};
    use crate::game::{CardToLay, Player};

    fn unit(attack: i32, power: i32) -> Card {
        Card::Unit(CharacterCard::new(CardId(1), "Unit", StatisticPointGroup::new(attack, 10, 1, power)))
    }

    #[test]
    fn test_attack_uses_attack() {
        assert_eq!(calculate_damage(&unit(5, 2), None, MoveType::Attack, None), 5);
    }

    #[test]
    fn test_skill_uses_power() {
        assert_eq!(calculate_damage(&unit(5, 2), None, MoveType::Skill, Some(0)), 2);
    }

    #[test]
    fn test_spell_skill_uses_fixed_damage() {
        let spell = Card::Spell(
            SpellCard::new(CardId(2), "Bolt", 5, vec![Element::Fire])
                .with_statistics(StatisticPointGroup::new(1, 1, 1, 9)),
        );
        assert_eq!(calculate_damage(&spell, None, MoveType::Skill, None), 5);
        assert_eq!(calculate_damage(&spell, None, MoveType::Attack, None), 1);
    }

    #[test]
    fn test_defender_is_ignored() {
        let defender = unit(0, 0);
        assert_eq!(
            calculate_damage(&unit(5, 2), Some(&defender), MoveType::Attack, None),
            calculate_damage(&unit(5, 2), None, MoveType::Attack, None)
        );
    }

    /// Both players hold one unit each; P0's unit is aimed at the enemy hero
    /// and every player confirmed targets.
    fn aimed_game() -> Game {
        let players = (0..2u8)
            .map(|seat| {
                let base = u32::from(seat) * 100;
                let hero = CharacterCard::new(CardId(base), "Hero", StatisticPointGroup::new(1, 20, 1, 1));
                let mut player = Player::new(PlayerId(seat), hero, Vec::new());
                player.add_card_to_hand(Card::Unit(CharacterCard::new(
                    CardId(base + 1),
                    "Unit",
                    StatisticPointGroup::new(3, 5, 2, 1),
                )));
                player
            })
            .collect();
        let mut game = Game::new(GameId::new("combat"), players, RulesConfig::default(), 9).unwrap();
        game.advance_system().unwrap();

        let seats = [PlayerId(0), PlayerId(1)];
        for seat in seats {
            game.take_cards_to_hand(seat, &[]).unwrap();
        }
        game.advance_system().unwrap();
        for seat in game.lay_down_order().to_vec() {
            let card = CardId(u32::from(seat.0) * 100 + 1);
            game.lay_cards_to_battle(seat, &[CardToLay::new(card)]).unwrap();
        }
        for seat in seats {
            game.play_dices(seat).unwrap();
            game.pass_replay_dices(seat).unwrap();
        }
        game.assign_dice_to_card(PlayerId(0), 0, CardId(1)).unwrap();
        for seat in seats {
            game.confirm_assign_dices_to_cards(seat).unwrap();
        }
        game.assign_card_target(PlayerId(0), CardId(1), CardId(100)).unwrap();
        for seat in seats {
            game.confirm_card_targets(seat).unwrap();
        }
        game
    }

    #[test]
    fn test_aimed_card_resolves() {
        let mut game = aimed_game();
        game.advance_system().unwrap();

        let record = game.last_round_log().iter().find(|r| r.attacker == CardId(1)).unwrap();
        assert_eq!(record.targets.as_slice(), &[CardId(100)]);
        assert!(game.round().is_none());
    }

    #[test]
    fn test_targets_without_die_is_fatal() {
        let mut game = aimed_game();
        // Only reachable by bypassing the dice menu.
        game.players[0].remove_dice(CardId(1)).unwrap();
        game.start_round().unwrap();

        let err = game.perform_round().unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("without a die"));
    }
}
