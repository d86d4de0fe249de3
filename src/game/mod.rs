//! The match: players, phases, combat and the seams around them.
//!
//! ## Key Types
//!
//! - `Game`: the aggregate; every action goes through it
//! - `Player`: hero, piles, dice and card assignments
//! - `Command`: one variant per action, dispatched by `Game::execute`
//! - `GameView`: read-only projection for one viewer
//! - `GameRepository`: persistence with optimistic versioning
//! - `GameService`: load, execute, save

pub mod assignment;
pub mod combat;
pub mod command;
pub mod outcome;
pub mod phases;
pub mod player;
pub mod repository;
pub mod round;
pub mod service;
pub mod state;
pub mod view;

pub use assignment::{AssignedDice, CardAssignment};
pub use combat::calculate_damage;
pub use command::{CardSource, CardToLay, Command};
pub use outcome::GameResult;
pub use player::Player;
pub use repository::{GameRepository, InMemoryRepository, RepositoryError};
pub use round::{MoveRecord, RoundState};
pub use service::{GameService, ServiceError};
pub use state::{CenterCard, Game};
pub use view::{AssignmentView, CardView, CenterView, ControllerView, GameView, PlayerView, StatView, StatisticsView};
