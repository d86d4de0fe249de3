//! Center card tests: survival counter, threshold, contest and loss.

mod common;

use common::*;
use trinica_rules::cards::{Card, DiceOutcome, Element, SpellCard, StatisticPointGroup};
use trinica_rules::core::{Action, CardId, PlayerId, RulesConfig};
use trinica_rules::game::{CardToLay, CenterCard, Game, GameResult};

const P0: PlayerId = PlayerId(0);
const P1: PlayerId = PlayerId(1);

/// P0 lays its unit onto the center in the first round; nobody attacks.
fn claimed(config: RulesConfig) -> Game {
    let mut game = new_game(
        4,
        config,
        vec![
            (hero(0, 20, 1), vec![Card::Unit(unit(1, 1, 5, 1))]),
            (hero(100, 20, 2), vec![Card::Unit(unit(101, 1, 5, 1))]),
        ],
    );
    draw_idle(&mut game);
    lay_in_order(&mut game, |player| {
        if player == P0 {
            vec![CardToLay::new(CardId(1)).to_center()]
        } else {
            vec![CardToLay::new(CardId(101))]
        }
    });
    roll_and_keep(&mut game);
    confirm_dice(&mut game);
    confirm_targets_and_fight(&mut game);
    game
}

/// Surviving five rounds is not enough.
#[test]
fn test_five_rounds_do_not_win() {
    let mut game = claimed(RulesConfig::default());
    assert_eq!(game.center(), Some(CenterCard { card: CardId(1), owner: P0 }));
    assert_eq!(game.center_rounds_alive(), 1);

    for _ in 0..4 {
        idle_round(&mut game);
    }
    assert_eq!(game.center_rounds_alive(), 5);
    assert!(!game.is_game_over());
    assert_eq!(waiting_for(&game), vec![Action::TakeCardsToHand]);
}

/// The sixth round start hands the game to the center's holder.
#[test]
fn test_sixth_round_wins() {
    let mut game = claimed(RulesConfig::default());
    for _ in 0..5 {
        idle_round(&mut game);
    }

    assert_eq!(game.center_rounds_alive(), 6);
    assert!(game.is_finished());
    assert_eq!(game.result(), Some(&GameResult::Winner(P0)));
}

/// The threshold is configuration.
#[test]
fn test_threshold_is_configurable() {
    let mut game = claimed(RulesConfig::default().with_center_card_rounds_to_win(2));
    assert!(!game.is_game_over());
    idle_round(&mut game);
    assert_eq!(game.result(), Some(&GameResult::Winner(P0)));
}

/// Laying onto an occupied center replaces the holder and resets the count.
#[test]
fn test_contesting_the_center() {
    let mut game = new_game(
        4,
        RulesConfig::default(),
        vec![
            (hero(0, 20, 1), vec![Card::Unit(unit(1, 1, 5, 1))]),
            (hero(100, 20, 2), vec![Card::Unit(unit(101, 1, 5, 1))]),
        ],
    );
    draw_idle(&mut game);
    // P1 lays first and keeps its unit in hand.
    lay_in_order(&mut game, |player| {
        if player == P0 {
            vec![CardToLay::new(CardId(1)).to_center()]
        } else {
            Vec::new()
        }
    });
    roll_and_keep(&mut game);
    confirm_dice(&mut game);
    confirm_targets_and_fight(&mut game);
    idle_round(&mut game);
    assert_eq!(game.center_rounds_alive(), 2);

    for player in [P0, P1] {
        game.take_cards_to_hand(player, &[]).unwrap();
    }
    game.advance_system().unwrap();
    lay_in_order(&mut game, |player| {
        if player == P1 {
            vec![CardToLay::new(CardId(101)).to_center()]
        } else {
            Vec::new()
        }
    });

    assert_eq!(game.center(), Some(CenterCard { card: CardId(101), owner: P1 }));
    assert_eq!(game.center_rounds_alive(), 0);
    assert!(game.player(P0).unwrap().is_fielded(CardId(1)));
}

/// Killing the center card vacates the slot.
#[test]
fn test_center_card_death_resets() {
    let mut game = find_seed(|seed| {
        let mut game = new_game(
            seed,
            RulesConfig::default(),
            vec![
                (hero(0, 20, 1), vec![Card::Unit(unit(1, 1, 5, 1))]),
                (hero(100, 20, 2), vec![Card::Unit(unit(101, 5, 5, 9))]),
            ],
        );
        draw_idle(&mut game);
        lay_in_order(&mut game, |player| {
            if player == P0 {
                vec![CardToLay::new(CardId(1)).to_center()]
            } else {
                vec![CardToLay::new(CardId(101))]
            }
        });
        roll_and_keep(&mut game);
        let index = die(&game, P1, |d| d == DiceOutcome::Attack)?;
        game.assign_dice_to_card(P1, index, CardId(101)).unwrap();
        confirm_dice(&mut game);
        game.assign_card_target(P1, CardId(101), CardId(1)).unwrap();
        Some(game)
    });
    confirm_targets_and_fight(&mut game);

    assert_eq!(game.center(), None);
    assert_eq!(game.center_rounds_alive(), 0);
    assert!(game.player(P0).unwrap().dead().contains(CardId(1)));
    assert!(!game.is_game_over());
}

/// A spell holding the center is consumed when cast and gives up the slot,
/// so it cannot go on to win by survival.
#[test]
fn test_consumed_spell_vacates_center() {
    let spell = SpellCard::new(CardId(1), "Bolt", 5, vec![Element::Fire])
        .with_statistics(StatisticPointGroup::new(0, 1, 10, 99));

    let mut game = find_seed(|seed| {
        let mut game = new_game(
            seed,
            RulesConfig::default(),
            vec![
                (hero(0, 20, 1), vec![Card::Spell(spell.clone())]),
                (hero(100, 20, 2), vec![Card::Unit(unit(101, 1, 5, 1))]),
            ],
        );
        draw_idle(&mut game);
        lay_in_order(&mut game, |player| {
            if player == P0 {
                vec![CardToLay::new(CardId(1)).to_center()]
            } else {
                vec![CardToLay::new(CardId(101))]
            }
        });
        roll_and_keep(&mut game);
        let index = die(&game, P0, |d| d == DiceOutcome::Element(Element::Fire))?;
        game.assign_dice_to_card(P0, index, CardId(1)).unwrap();
        confirm_dice(&mut game);
        game.assign_card_target(P0, CardId(1), CardId(100)).unwrap();
        Some(game)
    });
    assert_eq!(game.center(), Some(CenterCard { card: CardId(1), owner: P0 }));
    confirm_targets_and_fight(&mut game);

    assert_eq!(hp(&game, P1, CardId(100)), 15);
    assert!(game.player(P0).unwrap().dead().contains(CardId(1)));
    assert_eq!(game.center(), None);
    assert_eq!(game.center_rounds_alive(), 0);

    for _ in 0..5 {
        idle_round(&mut game);
    }
    assert_eq!(game.result(), None);
    assert!(!game.is_game_over());
}
