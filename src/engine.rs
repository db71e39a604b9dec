use std::fmt::{self, Write as _};
use std::time::Instant;

use rand::Rng;

use crate::difficulty::Difficulty;
use crate::error::{GameError, Result};
use crate::events::{GameEvent, VisualState};
use crate::geometry::{idx, in_bounds, neighbors, Pos};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GameState {
    #[default]
    Playing,
    Won,
    Lost,
}

impl GameState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoOp,
    Revealed,
    Won,
    Lost,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlagOutcome {
    NoOp,
    Flagged,
    Unflagged,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    is_mine: bool,
    revealed: bool,
    flagged: bool,
    // left at 0 for mines
    neighbor_mines: u8,
}

impl Cell {
    pub fn is_mine(&self) -> bool { self.is_mine }
    pub fn revealed(&self) -> bool { self.revealed }
    pub fn flagged(&self) -> bool { self.flagged }
    pub fn neighbor_mines(&self) -> u8 { self.neighbor_mines }

    pub fn visual(&self) -> VisualState {
        if self.flagged {
            VisualState::Flagged
        } else if !self.revealed {
            VisualState::Hidden
        } else if self.is_mine {
            VisualState::RevealedMine
        } else if self.neighbor_mines == 0 {
            VisualState::RevealedEmpty
        } else {
            VisualState::RevealedNumber(self.neighbor_mines)
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Board {
    rows: usize,
    cols: usize,
    total_mines: usize,
    cells: Vec<Cell>,
    revealed_count: usize,
    flagged_count: usize,
    state: GameState,
    started_at: Option<Instant>,
    // only filled while `recording`; drained by `take_events`
    events: Vec<GameEvent>,
    recording: bool,
}

impl Board {
    /// Empty board for a preset: no mines yet, nothing revealed.
    pub fn new(difficulty: Difficulty) -> Self {
        let p = difficulty.preset();
        Self::blank(p.rows, p.cols, p.mines)
    }

    pub fn with_dimensions(rows: usize, cols: usize, mines: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(GameError::EmptyBoard);
        }
        let cells = rows * cols;
        if mines >= cells {
            return Err(GameError::TooManyMines { mines, cells });
        }
        Ok(Self::blank(rows, cols, mines))
    }

    /// Fresh preset board with mines placed and counts computed.
    pub fn generate<R: Rng + ?Sized>(difficulty: Difficulty, rng: &mut R) -> Self {
        let mut board = Self::new(difficulty);
        board.place_mines(rng);
        board.compute_neighbor_counts();
        log::info!(
            "new {} game: {}x{} with {} mines",
            difficulty,
            board.rows,
            board.cols,
            board.total_mines
        );
        board
    }

    /// Board with mines at exactly `mines`; duplicates count once.
    pub fn from_mines(rows: usize, cols: usize, mines: &[Pos]) -> Result<Self> {
        let mut board = Self::with_dimensions(rows, cols, 0)?;
        for &pos in mines {
            let i = board.index_of(pos)?;
            board.cells[i].is_mine = true;
        }
        let total = board.cells.iter().filter(|c| c.is_mine).count();
        if total >= rows * cols {
            return Err(GameError::TooManyMines { mines: total, cells: rows * cols });
        }
        board.total_mines = total;
        board.compute_neighbor_counts();
        Ok(board)
    }

    fn blank(rows: usize, cols: usize, mines: usize) -> Self {
        Self {
            rows,
            cols,
            total_mines: mines,
            cells: vec![Cell::default(); rows * cols],
            revealed_count: 0,
            flagged_count: 0,
            state: GameState::Playing,
            started_at: None,
            events: Vec::new(),
            recording: false,
        }
    }

    /// Rejection sampling: draw a cell, retry if it already holds a mine.
    /// Tops the board up to `total_mines`; mines already placed count.
    pub fn place_mines<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut placed = self.mine_count();
        while placed < self.total_mines {
            let pos = Pos::new(rng.gen_range(0..self.rows), rng.gen_range(0..self.cols));
            let cell = &mut self.cells[idx(self.cols, pos)];
            if !cell.is_mine {
                cell.is_mine = true;
                placed += 1;
            }
        }
    }

    pub fn compute_neighbor_counts(&mut self) {
        for row in 0..self.rows {
            for col in 0..self.cols {
                let pos = Pos::new(row, col);
                let i = idx(self.cols, pos);
                if self.cells[i].is_mine {
                    continue;
                }
                let count = neighbors(self.rows, self.cols, pos)
                    .filter(|&n| self.cells[idx(self.cols, n)].is_mine)
                    .count();
                self.cells[i].neighbor_mines = count as u8;
            }
        }
    }

    pub fn reveal(&mut self, pos: Pos) -> Result<RevealOutcome> {
        let i = self.index_of(pos)?;
        if self.state.is_finished() || self.cells[i].revealed || self.cells[i].flagged {
            return Ok(RevealOutcome::NoOp);
        }
        log::debug!("reveal {:?}", pos);

        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
            self.emit(GameEvent::TimerStarted);
        }

        // Explicit worklist; each popped cell goes through the same checks as the target.
        let mut stack = vec![pos];
        while let Some(cur) = stack.pop() {
            let i = idx(self.cols, cur);
            if self.state.is_finished() || self.cells[i].revealed || self.cells[i].flagged {
                continue;
            }
            self.cells[i].revealed = true;
            self.revealed_count += 1;

            if self.cells[i].is_mine {
                self.lose(cur);
                return Ok(RevealOutcome::Lost);
            }
            self.emit_cell(cur);

            if self.cells[i].neighbor_mines == 0 {
                log::trace!("flood from {:?}", cur);
                stack.extend(neighbors(self.rows, self.cols, cur));
            }
        }

        Ok(if self.check_win() { RevealOutcome::Won } else { RevealOutcome::Revealed })
    }

    pub fn toggle_flag(&mut self, pos: Pos) -> Result<FlagOutcome> {
        let i = self.index_of(pos)?;
        if self.state.is_finished() || self.cells[i].revealed {
            return Ok(FlagOutcome::NoOp);
        }
        let cell = &mut self.cells[i];
        cell.flagged = !cell.flagged;
        let outcome = if cell.flagged {
            self.flagged_count += 1;
            FlagOutcome::Flagged
        } else {
            self.flagged_count -= 1;
            FlagOutcome::Unflagged
        };
        log::debug!("flag {:?}: {:?}", pos, outcome);
        self.emit_cell(pos);
        Ok(outcome)
    }

    /// Transitions to `Won` once every safe cell is revealed, flagging the remaining mines.
    pub fn check_win(&mut self) -> bool {
        if self.state != GameState::Playing || self.revealed_count != self.safe_cell_count() {
            return false;
        }
        self.state = GameState::Won;
        for i in 0..self.cells.len() {
            if self.cells[i].is_mine && !self.cells[i].flagged {
                self.cells[i].flagged = true;
                self.flagged_count += 1;
                self.emit_cell(self.pos_of(i));
            }
        }
        log::info!("game won after {} reveals", self.revealed_count);
        self.emit(GameEvent::Won);
        true
    }

    fn lose(&mut self, triggered: Pos) {
        self.state = GameState::Lost;
        self.emit_cell(triggered);
        for i in 0..self.cells.len() {
            let cell = &mut self.cells[i];
            if cell.is_mine && !cell.flagged && !cell.revealed {
                cell.revealed = true;
                self.revealed_count += 1;
                self.emit_cell(self.pos_of(i));
            }
        }
        log::info!("game lost at {:?}", triggered);
        self.emit(GameEvent::Lost);
    }

    pub fn remaining_mine_count(&self) -> isize {
        self.total_mines as isize - self.flagged_count as isize
    }

    /// Share of safe cells revealed, rounded. Capped at 100: after a loss the
    /// exposed mines are in `revealed_count` too.
    pub fn progress_percent(&self) -> u8 {
        let safe = self.safe_cell_count();
        let pct = (100.0 * self.revealed_count as f64 / safe as f64).round();
        pct.min(100.0) as u8
    }

    pub fn hud_event(&self) -> GameEvent {
        GameEvent::Hud {
            remaining_mines: self.remaining_mine_count(),
            progress_percent: self.progress_percent(),
        }
    }

    /// Starts or stops queueing events. Off by default; whoever turns it on
    /// must drain the queue with `take_events`. Turning it off drops the queue.
    pub fn record_events(&mut self, on: bool) {
        self.recording = on;
        if !on {
            self.events.clear();
        }
    }

    /// Hands over everything that changed since the last call.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn emit(&mut self, event: GameEvent) {
        if self.recording {
            self.events.push(event);
        }
    }

    fn emit_cell(&mut self, pos: Pos) {
        let visual = self.cells[idx(self.cols, pos)].visual();
        self.emit(GameEvent::CellChanged { pos, visual });
    }

    fn index_of(&self, pos: Pos) -> Result<usize> {
        if in_bounds(self.rows, self.cols, pos) {
            Ok(idx(self.cols, pos))
        } else {
            Err(GameError::InvalidCoords { row: pos.row, col: pos.col, rows: self.rows, cols: self.cols })
        }
    }

    fn pos_of(&self, i: usize) -> Pos {
        Pos::new(i / self.cols, i % self.cols)
    }

    pub fn render(&self, one_based: bool) -> String {
        let mut s = String::new();
        s.push_str("    ");
        for col in 0..self.cols {
            let label = if one_based { col + 1 } else { col };
            let _ = write!(s, "{:>2} ", label);
        }
        s.push('\n');
        s.push_str("   ");
        s.push_str(&"-".repeat(self.cols * 3 + 1));
        s.push('\n');

        for row in 0..self.rows {
            let label = if one_based { row + 1 } else { row };
            let _ = write!(s, "{:>2} | ", label);
            for col in 0..self.cols {
                let ch = match self.cells[idx(self.cols, Pos::new(row, col))].visual() {
                    VisualState::Hidden => '.',
                    VisualState::Flagged => 'F',
                    VisualState::RevealedEmpty => ' ',
                    VisualState::RevealedNumber(n) => char::from(b'0' + n),
                    VisualState::RevealedMine => '*',
                };
                let _ = write!(s, "{}  ", ch);
            }
            s.push('\n');
        }
        s
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(true))
    }
}

// Public getters for encapsulation
impl Board {
    pub fn rows(&self) -> usize { self.rows }
    pub fn cols(&self) -> usize { self.cols }
    pub fn total_mines(&self) -> usize { self.total_mines }
    pub fn revealed_count(&self) -> usize { self.revealed_count }
    pub fn flagged_count(&self) -> usize { self.flagged_count }
    pub fn state(&self) -> GameState { self.state }
    pub fn started_at(&self) -> Option<Instant> { self.started_at }
    pub fn safe_cell_count(&self) -> usize { self.rows * self.cols - self.total_mines }
    pub fn cell(&self, pos: Pos) -> Option<&Cell> {
        if in_bounds(self.rows, self.cols, pos) { Some(&self.cells[idx(self.cols, pos)]) } else { None }
    }
    pub fn mine_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_mine).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn p(row: usize, col: usize) -> Pos {
        Pos::new(row, col)
    }

    #[test]
    fn reveal_number_does_not_cascade() {
        let mut b = Board::from_mines(3, 3, &[p(0, 0)]).unwrap();
        assert_eq!(b.reveal(p(1, 1)).unwrap(), RevealOutcome::Revealed);
        assert_eq!(b.revealed_count(), 1);
        assert_eq!(b.cell(p(1, 1)).unwrap().visual(), VisualState::RevealedNumber(1));
    }

    #[test]
    fn first_reveal_starts_timer_once() {
        let mut b = Board::from_mines(3, 3, &[p(0, 0)]).unwrap();
        b.record_events(true);
        assert!(b.started_at().is_none());
        b.reveal(p(2, 2)).unwrap();
        let started = b.started_at();
        assert!(started.is_some());
        let events = b.take_events();
        assert_eq!(events.iter().filter(|e| **e == GameEvent::TimerStarted).count(), 1);
        assert_eq!(events[0], GameEvent::TimerStarted);
    }

    #[test]
    fn loss_emits_cell_events_then_lost() {
        let mut b = Board::from_mines(2, 2, &[p(0, 0), p(1, 1)]).unwrap();
        b.record_events(true);
        assert_eq!(b.reveal(p(0, 0)).unwrap(), RevealOutcome::Lost);
        let events = b.take_events();
        assert_eq!(events.last(), Some(&GameEvent::Lost));
        assert!(events.contains(&GameEvent::CellChanged { pos: p(1, 1), visual: VisualState::RevealedMine }));
        assert_eq!(b.revealed_count(), 2);
    }

    #[test]
    fn events_stay_empty_unless_recording() {
        let mut b = Board::from_mines(3, 3, &[p(0, 0)]).unwrap();
        b.toggle_flag(p(0, 0)).unwrap();
        b.reveal(p(2, 2)).unwrap();
        assert!(b.take_events().is_empty());

        b.record_events(true);
        b.toggle_flag(p(0, 0)).unwrap();
        assert_eq!(b.take_events().len(), 1);
        assert!(b.take_events().is_empty());

        b.toggle_flag(p(0, 0)).unwrap();
        b.record_events(false);
        assert!(b.take_events().is_empty());
    }

    #[test]
    fn place_mines_twice_keeps_total() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut b = Board::generate(Difficulty::Easy, &mut rng);
        b.place_mines(&mut rng);
        assert_eq!(b.mine_count(), b.total_mines());
        assert_eq!(b.safe_cell_count(), 71);

        // 4 free cells left after the first pass; a second pass must not spin
        let mut dense = Board::with_dimensions(3, 3, 5).unwrap();
        dense.place_mines(&mut rng);
        dense.place_mines(&mut rng);
        assert_eq!(dense.mine_count(), 5);
    }

    #[test]
    fn flag_on_revealed_cell_is_noop() {
        let mut b = Board::from_mines(2, 2, &[p(0, 0)]).unwrap();
        b.reveal(p(1, 1)).unwrap();
        assert_eq!(b.toggle_flag(p(1, 1)).unwrap(), FlagOutcome::NoOp);
        assert_eq!(b.flagged_count(), 0);
    }

    #[test]
    fn out_of_range_fails_fast() {
        let mut b = Board::new(Difficulty::Easy);
        assert_eq!(
            b.reveal(p(9, 0)),
            Err(GameError::InvalidCoords { row: 9, col: 0, rows: 9, cols: 9 })
        );
        assert!(b.toggle_flag(p(0, 9)).is_err());
    }

    #[test]
    fn render_marks_flags_and_numbers() {
        let mut b = Board::from_mines(1, 3, &[p(0, 0)]).unwrap();
        b.reveal(p(0, 1)).unwrap();
        b.toggle_flag(p(0, 0)).unwrap();
        let out = b.render(true);
        let last = out.lines().last().unwrap();
        assert_eq!(last, " 1 | F  1  .  ");
    }
}
