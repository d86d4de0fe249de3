//! Helpers that drive games through their phases.

#![allow(dead_code)]

use trinica_rules::cards::{Card, CharacterCard, DiceOutcome, StatisticPointGroup};
use trinica_rules::core::{Action, CardId, GameId, PlayerId, RulesConfig};
use trinica_rules::game::{CardSource, CardToLay, Game, Player};

pub fn hero(id: u32, hp: i32, speed: i32) -> CharacterCard {
    CharacterCard::new(CardId(id), "Hero", StatisticPointGroup::new(1, hp, speed, 1))
}

pub fn unit(id: u32, attack: i32, hp: i32, speed: i32) -> CharacterCard {
    CharacterCard::new(CardId(id), "Unit", StatisticPointGroup::new(attack, hp, speed, 1))
}

/// A started game waiting for players to take cards to hand.
pub fn new_game(seed: u64, config: RulesConfig, seats: Vec<(CharacterCard, Vec<Card>)>) -> Game {
    let players = seats
        .into_iter()
        .enumerate()
        .map(|(seat, (hero, deck))| Player::new(PlayerId(seat as u8), hero, deck))
        .collect();
    let mut game = Game::new(GameId::new(format!("game-{seed}")), players, config, seed).unwrap();
    game.advance_system().unwrap();
    game
}

fn seats(game: &Game) -> Vec<PlayerId> {
    game.players().iter().map(Player::id).collect()
}

/// Every player draws its whole idle deck.
pub fn draw_idle(game: &mut Game) {
    for player in seats(game) {
        let count = game.player(player).unwrap().idle().len();
        game.take_cards_to_hand(player, &vec![CardSource::Own; count]).unwrap();
    }
    game.advance_system().unwrap();
}

/// Players lay in the computed order.
pub fn lay_in_order(game: &mut Game, lays: impl Fn(PlayerId) -> Vec<CardToLay>) {
    for player in game.lay_down_order().to_vec() {
        game.lay_cards_to_battle(player, &lays(player)).unwrap();
    }
}

/// Every player lays its whole hand.
pub fn lay_hand(game: &mut Game) {
    let hands: Vec<(PlayerId, Vec<CardId>)> = game
        .players()
        .iter()
        .map(|p| (p.id(), p.hand().ids().collect()))
        .collect();
    lay_in_order(game, |player| {
        hands
            .iter()
            .find(|(id, _)| *id == player)
            .map(|(_, cards)| cards.iter().copied().map(CardToLay::new).collect())
            .unwrap_or_default()
    });
}

/// Every player rolls and keeps its dice.
pub fn roll_and_keep(game: &mut Game) {
    for player in seats(game) {
        game.play_dices(player).unwrap();
    }
    for player in seats(game) {
        game.pass_replay_dices(player).unwrap();
    }
}

pub fn confirm_dice(game: &mut Game) {
    for player in seats(game) {
        game.confirm_assign_dices_to_cards(player).unwrap();
    }
}

/// Confirm targets and run the round through the system steps.
pub fn confirm_targets_and_fight(game: &mut Game) {
    for player in seats(game) {
        game.confirm_card_targets(player).unwrap();
    }
    game.advance_system().unwrap();
}

/// Index of the first die of `player` matching `wanted`.
pub fn die(game: &Game, player: PlayerId, wanted: impl Fn(DiceOutcome) -> bool) -> Option<usize> {
    game.player(player)?.dice().iter().position(|d| wanted(*d))
}

/// A round in which nobody acts.
pub fn idle_round(game: &mut Game) {
    for player in seats(game) {
        game.take_cards_to_hand(player, &[]).unwrap();
    }
    game.advance_system().unwrap();
    lay_in_order(game, |_| Vec::new());
    roll_and_keep(game);
    confirm_dice(game);
    confirm_targets_and_fight(game);
}

/// Try seeds until `ready` returns a game, typically one whose dice fit.
pub fn find_seed(ready: impl Fn(u64) -> Option<Game>) -> Game {
    (0..512)
        .find_map(ready)
        .expect("no seed produced the wanted dice")
}

pub fn hp(game: &Game, player: PlayerId, card: CardId) -> i32 {
    let player = game.player(player).unwrap();
    let card = if player.hero().id() == card {
        player.hero()
    } else {
        player
            .battling()
            .get(card)
            .or_else(|| player.dead().get(card))
            .unwrap()
    };
    card.statistics().hp.calculated()
}

pub fn waiting_for(game: &Game) -> Vec<Action> {
    game.controller().actions().to_vec()
}
