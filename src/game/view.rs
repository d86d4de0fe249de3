//! Read-only projection of a game for one viewer.
//!
//! Enemy hands are always face down. While the lay phase is open, cards an
//! enemy laid in that phase are face down too; they are revealed once every
//! player has laid. Dice and assignments are only shown to their owner.

use serde::{Deserialize, Serialize};

use super::outcome::GameResult;
use super::player::Player;
use super::state::Game;
use crate::cards::{Card, DiceOutcome, StatisticPoint, StatisticPointGroup};
use crate::core::{Action, CardId, PlayerId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameView {
    pub game_id: String,
    pub version: u64,
    pub controller: ControllerView,
    pub viewer: PlayerView,
    pub enemies: Vec<PlayerView>,
    pub common_pool_size: usize,
    pub center: Option<CenterView>,
    pub result: Option<GameResult>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerView {
    pub expected_actions: Vec<String>,
    pub expected_players: Vec<PlayerId>,
    pub done_players: Vec<PlayerId>,
    pub must_obey_order: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub player_id: PlayerId,
    pub hero: CardView,
    pub battling: Vec<CardView>,
    pub hand: Vec<CardView>,
    pub has_idle_cards: bool,
    pub dead_count: usize,
    pub dice: Vec<DiceOutcome>,
    pub assignments: Vec<AssignmentView>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentView {
    pub card: CardId,
    pub dice_index: Option<usize>,
    pub outcome: Option<DiceOutcome>,
    pub skill_index: Option<usize>,
    pub targets: Vec<CardId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CenterView {
    pub card: CardId,
    pub owner: PlayerId,
    pub rounds_alive: u32,
}

/// A card summary. Face-down cards reveal nothing but their presence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardView {
    pub id: Option<CardId>,
    pub is_reversed: bool,
    pub name: String,
    pub race: String,
    pub class: String,
    pub faction: String,
    pub kind: String,
    pub statistics: Option<StatisticsView>,
    pub items: Vec<CardView>,
    pub effects: usize,
}

impl CardView {
    fn face_down() -> Self {
        Self {
            id: None,
            is_reversed: true,
            name: String::new(),
            race: String::new(),
            class: String::new(),
            faction: String::new(),
            kind: String::new(),
            statistics: None,
            items: Vec::new(),
            effects: 0,
        }
    }

    fn face_up(card: &Card) -> Self {
        let meta = card.meta();
        Self {
            id: Some(card.id()),
            is_reversed: false,
            name: meta.name.clone(),
            race: meta.race.clone(),
            class: meta.class.clone(),
            faction: meta.faction.clone(),
            kind: card.kind().name().to_owned(),
            statistics: Some(StatisticsView::from(card.statistics())),
            items: card
                .items()
                .iter()
                .map(|item| CardView::face_up(&Card::Item(item.clone())))
                .collect(),
            effects: card.effects().len(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatView {
    pub original: i32,
    pub current: i32,
}

impl From<&StatisticPoint> for StatView {
    fn from(point: &StatisticPoint) -> Self {
        Self {
            original: point.original(),
            current: point.calculated(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsView {
    pub attack: StatView,
    pub hp: StatView,
    pub speed: StatView,
    pub power: StatView,
}

impl From<&StatisticPointGroup> for StatisticsView {
    fn from(group: &StatisticPointGroup) -> Self {
        Self {
            attack: (&group.attack).into(),
            hp: (&group.hp).into(),
            speed: (&group.speed).into(),
            power: (&group.power).into(),
        }
    }
}

impl GameView {
    /// Project `game` as seen by `viewer`. Returns `None` for a stranger.
    #[must_use]
    pub fn project(game: &Game, viewer: PlayerId) -> Option<Self> {
        let me = game.player(viewer)?;
        let controller = game.controller();
        let lay_phase_open = controller.actions().contains(&Action::LayCardsToBattle);

        Some(Self {
            game_id: game.id().as_str().to_owned(),
            version: game.version(),
            controller: ControllerView {
                expected_actions: controller.actions().iter().map(|a| a.name().to_owned()).collect(),
                expected_players: controller.expected_players().to_vec(),
                done_players: controller.done_players().to_vec(),
                must_obey_order: controller.must_obey_order(),
            },
            viewer: PlayerView::own(me),
            enemies: game
                .players()
                .iter()
                .filter(|p| p.id() != viewer)
                .map(|p| PlayerView::enemy(p, game, lay_phase_open))
                .collect(),
            common_pool_size: game.common_pool().len(),
            center: game.center().map(|c| CenterView {
                card: c.card,
                owner: c.owner,
                rounds_alive: game.center_rounds_alive(),
            }),
            result: game.result().cloned(),
        })
    }

    /// Render as JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl PlayerView {
    fn own(player: &Player) -> Self {
        Self {
            player_id: player.id(),
            hero: CardView::face_up(player.hero()),
            battling: player.battling().iter().map(CardView::face_up).collect(),
            hand: player.hand().iter().map(CardView::face_up).collect(),
            has_idle_cards: !player.idle().is_empty(),
            dead_count: player.dead().len(),
            dice: player.dice().to_vec(),
            assignments: player
                .assignments()
                .iter()
                .map(|(card, a)| AssignmentView {
                    card: *card,
                    dice_index: a.dice.map(|d| d.index),
                    outcome: a.outcome(),
                    skill_index: a.skill_index,
                    targets: a.targets().to_vec(),
                })
                .collect(),
        }
    }

    fn enemy(player: &Player, game: &Game, lay_phase_open: bool) -> Self {
        let hidden = |card: &Card| lay_phase_open && game.fresh_laid().contains(&card.id());
        Self {
            player_id: player.id(),
            hero: CardView::face_up(player.hero()),
            battling: player
                .battling()
                .iter()
                .map(|card| {
                    if hidden(card) {
                        CardView::face_down()
                    } else {
                        CardView::face_up(card)
                    }
                })
                .collect(),
            hand: player.hand().iter().map(|_| CardView::face_down()).collect(),
            has_idle_cards: !player.idle().is_empty(),
            dead_count: player.dead().len(),
            dice: Vec::new(),
            assignments: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardMeta, CharacterCard};
    use crate::core::{GameId, RulesConfig};
    use crate::game::CardToLay;

    fn game() -> Game {
        let players = (0..2u8)
            .map(|seat| {
                let base = u32::from(seat) * 100;
                let hero = CharacterCard::new(CardId(base), "Hero", StatisticPointGroup::new(1, 20, 2 - i32::from(seat), 1));
                let mut player = Player::new(PlayerId(seat), hero, Vec::new());
                player.add_card_to_hand(Card::Unit(
                    CharacterCard::new(CardId(base + 1), "Squire", StatisticPointGroup::new(2, 3, 1, 1)).with_meta(
                        CardMeta {
                            name: "Squire".into(),
                            race: "Human".into(),
                            class: "Knight".into(),
                            faction: "Dawn".into(),
                        },
                    ),
                ));
                player
            })
            .collect();
        let mut game = Game::new(GameId::new("view"), players, RulesConfig::default(), 9).unwrap();
        game.advance_system().unwrap();
        game.take_cards_to_hand(PlayerId(0), &[]).unwrap();
        game.take_cards_to_hand(PlayerId(1), &[]).unwrap();
        game.advance_system().unwrap();
        game
    }

    #[test]
    fn test_stranger_gets_nothing() {
        assert!(GameView::project(&game(), PlayerId(7)).is_none());
    }

    #[test]
    fn test_enemy_hand_is_face_down() {
        let view = GameView::project(&game(), PlayerId(0)).unwrap();

        assert_eq!(view.viewer.hand[0].id, Some(CardId(1)));
        assert_eq!(view.enemies.len(), 1);
        assert!(view.enemies[0].hand[0].is_reversed);
        assert_eq!(view.enemies[0].hand[0].id, None);
        assert_eq!(view.enemies[0].hero.id, Some(CardId(100)));
    }

    #[test]
    fn test_fresh_cards_revealed_after_lay_phase() {
        let mut game = game();
        game.lay_cards_to_battle(PlayerId(0), &[CardToLay::new(CardId(1))]).unwrap();

        let during = GameView::project(&game, PlayerId(1)).unwrap();
        assert!(during.enemies[0].battling[0].is_reversed);
        let own = GameView::project(&game, PlayerId(0)).unwrap();
        assert!(!own.viewer.battling[0].is_reversed);

        game.lay_cards_to_battle(PlayerId(1), &[]).unwrap();
        let after = GameView::project(&game, PlayerId(1)).unwrap();
        assert_eq!(after.enemies[0].battling[0].id, Some(CardId(1)));
        assert_eq!(after.controller.expected_actions, vec!["PlayDices".to_owned()]);
    }

    #[test]
    fn test_metadata_follows_visibility() {
        let view = GameView::project(&game(), PlayerId(0)).unwrap();

        let own = &view.viewer.hand[0];
        assert_eq!((own.race.as_str(), own.class.as_str(), own.faction.as_str()), ("Human", "Knight", "Dawn"));
        assert_eq!(own.kind, "unit");

        let hidden = &view.enemies[0].hand[0];
        assert!(hidden.race.is_empty() && hidden.name.is_empty());
        assert_eq!(hidden.statistics, None);
    }

    #[test]
    fn test_statistics_show_original_and_current() {
        let mut game = game();
        game.players[0].inflict_damage(CardId(0), 4).unwrap();

        let view = GameView::project(&game, PlayerId(0)).unwrap();
        let hp = view.viewer.hero.statistics.unwrap().hp;
        assert_eq!(hp, StatView { original: 20, current: 16 });
    }
}
