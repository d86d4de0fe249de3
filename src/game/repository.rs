//! Persistence seam.
//!
//! A repository stores games by id and enforces optimistic versioning: a
//! save succeeds only if the stored version still matches the version the
//! game was loaded with, and then bumps it. Callers that lose the race get
//! `VersionConflict` and must reload and retry.

use rustc_hash::FxHashMap;
use thiserror::Error;

use super::state::Game;
use crate::core::GameId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("game {0} not found")]
    NotFound(GameId),

    #[error("game {0} already exists")]
    AlreadyExists(GameId),

    #[error("version conflict: expected {expected}, found {found}")]
    VersionConflict { expected: u64, found: u64 },

    #[error("snapshot codec failed: {0}")]
    Codec(String),
}

impl From<bincode::Error> for RepositoryError {
    fn from(err: bincode::Error) -> Self {
        RepositoryError::Codec(err.to_string())
    }
}

pub trait GameRepository {
    /// Store a new game.
    fn insert(&mut self, game: &Game) -> Result<(), RepositoryError>;

    fn load(&self, id: &GameId) -> Result<Game, RepositoryError>;

    /// Store `game` and bump its version.
    fn save(&mut self, game: &mut Game) -> Result<(), RepositoryError>;
}

#[derive(Debug)]
struct Snapshot {
    version: u64,
    bytes: Vec<u8>,
}

/// Keeps `bincode` snapshots in memory.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    games: FxHashMap<GameId, Snapshot>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.games.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Stored version of a game.
    #[must_use]
    pub fn version(&self, id: &GameId) -> Option<u64> {
        self.games.get(id).map(|s| s.version)
    }
}

impl GameRepository for InMemoryRepository {
    fn insert(&mut self, game: &Game) -> Result<(), RepositoryError> {
        if self.games.contains_key(game.id()) {
            return Err(RepositoryError::AlreadyExists(game.id().clone()));
        }
        let bytes = bincode::serialize(game)?;
        self.games.insert(
            game.id().clone(),
            Snapshot {
                version: game.version(),
                bytes,
            },
        );
        Ok(())
    }

    fn load(&self, id: &GameId) -> Result<Game, RepositoryError> {
        let snapshot = self
            .games
            .get(id)
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))?;
        Ok(bincode::deserialize(&snapshot.bytes)?)
    }

    fn save(&mut self, game: &mut Game) -> Result<(), RepositoryError> {
        let snapshot = self
            .games
            .get_mut(game.id())
            .ok_or_else(|| RepositoryError::NotFound(game.id().clone()))?;
        if snapshot.version != game.version() {
            return Err(RepositoryError::VersionConflict {
                expected: game.version(),
                found: snapshot.version,
            });
        }

        let next = game.version() + 1;
        game.set_version(next);
        match bincode::serialize(game) {
            Ok(bytes) => {
                *snapshot = Snapshot { version: next, bytes };
                Ok(())
            }
            Err(err) => {
                game.set_version(next - 1);
                Err(err.into())
            }
        }
    }
}
