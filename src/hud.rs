use std::time::Instant;

use crate::difficulty::Difficulty;
use crate::events::{GameEvent, Presenter};
use crate::timer::GameTimer;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Face {
    #[default]
    Smile,
    Dead,
    Cool,
}

impl Face {
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Smile => ":)",
            Self::Dead => "X(",
            Self::Cool => "B)",
        }
    }
}

/// Presentation-side model fed by game events: face, counters, clock and
/// the win popup. Front ends draw from this plus the board itself.
#[derive(Clone, Debug, Default)]
pub struct Hud {
    pub difficulty: Difficulty,
    pub face: Face,
    pub remaining_mines: isize,
    pub progress_percent: u8,
    pub timer: GameTimer,
    pub show_win_modal: bool,
    /// Cells redrawn since the last `take_dirty`; front ends that redraw
    /// everything can ignore it.
    dirty: usize,
}

impl Hud {
    pub fn new() -> Self {
        Self::default()
    }

    /// Three-digit mine counter; negatives keep their sign.
    pub fn mine_counter(&self) -> String {
        if self.remaining_mines < 0 {
            format!("-{:02}", self.remaining_mines.unsigned_abs().min(99))
        } else {
            format!("{:03}", self.remaining_mines)
        }
    }

    pub fn progress(&self) -> String {
        format!("{}%", self.progress_percent)
    }

    pub fn clock(&self, now: Instant) -> String {
        self.timer.display(now)
    }

    pub fn dismiss_modal(&mut self) {
        self.show_win_modal = false;
    }

    pub fn take_dirty(&mut self) -> usize {
        std::mem::take(&mut self.dirty)
    }
}

impl Presenter for Hud {
    fn notify(&mut self, event: GameEvent) {
        match event {
            GameEvent::Reset { difficulty, .. } => {
                self.difficulty = difficulty;
                self.face = Face::Smile;
                self.timer.reset();
                self.show_win_modal = false;
                self.dirty = 0;
            }
            GameEvent::CellChanged { .. } => self.dirty += 1,
            GameEvent::TimerStarted => self.timer.start(Instant::now()),
            GameEvent::Lost => {
                self.face = Face::Dead;
                self.timer.stop(Instant::now());
            }
            GameEvent::Won => {
                self.face = Face::Cool;
                self.timer.stop(Instant::now());
                self.show_win_modal = true;
            }
            GameEvent::Hud { remaining_mines, progress_percent } => {
                self.remaining_mines = remaining_mines;
                self.progress_percent = progress_percent;
            }
        }
        log::trace!("hud event {:?}", event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::VisualState;
    use crate::geometry::Pos;

    #[test]
    fn counter_formatting() {
        let mut hud = Hud::new();
        hud.remaining_mines = 7;
        assert_eq!(hud.mine_counter(), "007");
        hud.remaining_mines = -3;
        assert_eq!(hud.mine_counter(), "-03");
        hud.progress_percent = 42;
        assert_eq!(hud.progress(), "42%");
    }

    #[test]
    fn win_sets_face_modal_and_stops_clock() {
        let mut hud = Hud::new();
        hud.notify(GameEvent::TimerStarted);
        assert!(hud.timer.is_running());
        hud.notify(GameEvent::CellChanged { pos: Pos::new(0, 0), visual: VisualState::Flagged });
        hud.notify(GameEvent::Won);
        assert_eq!(hud.face, Face::Cool);
        assert!(hud.show_win_modal);
        assert!(!hud.timer.is_running());
        assert_eq!(hud.take_dirty(), 1);
        hud.dismiss_modal();
        assert!(!hud.show_win_modal);
    }

    #[test]
    fn loss_never_shows_modal() {
        let mut hud = Hud::new();
        hud.notify(GameEvent::Lost);
        assert_eq!(hud.face, Face::Dead);
        assert!(!hud.show_win_modal);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut hud = Hud::new();
        hud.notify(GameEvent::TimerStarted);
        hud.notify(GameEvent::Lost);
        hud.notify(GameEvent::Reset { difficulty: Difficulty::Hard, rows: 16, cols: 30 });
        assert_eq!(hud.face, Face::Smile);
        assert_eq!(hud.difficulty, Difficulty::Hard);
        assert_eq!(hud.clock(Instant::now()), "000");
    }
}
