//! Load, execute, save.

use thiserror::Error;
use tracing::{info, warn};

use super::command::Command;
use super::player::Player;
use super::repository::{GameRepository, RepositoryError};
use super::state::Game;
use super::view::GameView;
use crate::core::{GameId, PlayerId, RulesConfig, RulesError};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error(transparent)]
    Rules(#[from] RulesError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("{player} does not play in game {game}")]
    UnknownViewer { game: GameId, player: PlayerId },
}

/// Runs commands against stored games.
///
/// After every accepted player command the pending system steps are run,
/// so the stored game always waits on a player or is finished.
#[derive(Debug, Default)]
pub struct GameService<R> {
    repository: R,
}

impl<R: GameRepository> GameService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Create, start and store a game.
    pub fn create(
        &mut self,
        id: GameId,
        players: Vec<Player>,
        config: RulesConfig,
        seed: u64,
    ) -> Result<Game, ServiceError> {
        let mut game = Game::new(id, players, config, seed)?;
        game.advance_system()?;
        self.repository.insert(&game)?;
        info!(game = %game.id(), "game created");
        Ok(game)
    }

    /// Run one command and persist the result.
    ///
    /// A rejected command leaves the stored game untouched.
    pub fn execute(&mut self, id: &GameId, player: Option<PlayerId>, command: Command) -> Result<Game, ServiceError> {
        let mut game = self.repository.load(id)?;
        let action = command.action();

        if let Err(err) = game.execute(player, command) {
            warn!(game = %id, ?player, %action, error = %err, "command rejected");
            return Err(err.into());
        }
        game.advance_system()?;

        self.repository.save(&mut game)?;
        if let Some(result) = game.result() {
            info!(game = %id, ?result, "game finished");
        }
        Ok(game)
    }

    /// The game as seen by `viewer`.
    pub fn query(&self, id: &GameId, viewer: PlayerId) -> Result<GameView, ServiceError> {
        let game = self.repository.load(id)?;
        GameView::project(&game, viewer).ok_or_else(|| ServiceError::UnknownViewer {
            game: id.clone(),
            player: viewer,
        })
    }
}
