pub mod difficulty;
pub mod engine;
pub mod error;
pub mod events;
pub mod game;
pub mod geometry;
pub mod hud;
pub mod logging;
pub mod timer;
pub mod tui;

pub use difficulty::{Difficulty, Preset};
pub use engine::{Board, Cell, FlagOutcome, GameState, RevealOutcome};
pub use error::{GameError, Result};
pub use events::{GameEvent, NullPresenter, Presenter, VisualState};
pub use game::Game;
pub use geometry::Pos;
pub use hud::{Face, Hud};
