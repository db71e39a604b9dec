//! Notifications from the board engine to whatever draws it.

use crate::difficulty::Difficulty;
use crate::geometry::Pos;

/// What a single cell should look like on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisualState {
    Hidden,
    Flagged,
    RevealedEmpty,
    /// 1..=8 adjacent mines.
    RevealedNumber(u8),
    RevealedMine,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    /// A fresh board was created; everything drawn so far is stale.
    Reset { difficulty: Difficulty, rows: usize, cols: usize },
    CellChanged { pos: Pos, visual: VisualState },
    TimerStarted,
    Lost,
    Won,
    Hud { remaining_mines: isize, progress_percent: u8 },
}

pub trait Presenter {
    fn notify(&mut self, event: GameEvent);
}

/// Discards everything. Handy for driving a game headlessly.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn notify(&mut self, _event: GameEvent) {}
}

impl Presenter for Vec<GameEvent> {
    fn notify(&mut self, event: GameEvent) {
        self.push(event);
    }
}
