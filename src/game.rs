use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::difficulty::Difficulty;
use crate::engine::{Board, FlagOutcome, RevealOutcome};
use crate::error::Result;
use crate::events::{GameEvent, Presenter};
use crate::geometry::Pos;

/// Owns the board for one session; all player input goes through it.
pub struct Game<P: Presenter> {
    board: Board,
    difficulty: Difficulty,
    presenter: P,
    rng: StdRng,
}

impl<P: Presenter> Game<P> {
    /// Seed 0 draws from OS entropy.
    pub fn new(difficulty: Difficulty, seed: u64, presenter: P) -> Self {
        let rng = if seed == 0 { StdRng::from_entropy() } else { StdRng::seed_from_u64(seed) };
        let board = Board::new(difficulty);
        let mut game = Self { board, difficulty, presenter, rng };
        game.restart(difficulty);
        game
    }

    /// Reveal.
    pub fn primary_action(&mut self, pos: Pos) -> Result<RevealOutcome> {
        let outcome = self.board.reveal(pos)?;
        if outcome != RevealOutcome::NoOp {
            self.flush();
        }
        Ok(outcome)
    }

    /// Toggle flag.
    pub fn secondary_action(&mut self, pos: Pos) -> Result<FlagOutcome> {
        let outcome = self.board.toggle_flag(pos)?;
        if outcome != FlagOutcome::NoOp {
            self.flush();
        }
        Ok(outcome)
    }

    /// Throws the current board away and deals a new one.
    pub fn restart(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.board = Board::generate(difficulty, &mut self.rng);
        self.board.record_events(true);
        self.presenter.notify(GameEvent::Reset {
            difficulty,
            rows: self.board.rows(),
            cols: self.board.cols(),
        });
        self.flush();
    }

    fn flush(&mut self) {
        for event in self.board.take_events() {
            self.presenter.notify(event);
        }
        self.presenter.notify(self.board.hud_event());
    }

    pub fn board(&self) -> &Board { &self.board }
    pub fn difficulty(&self) -> Difficulty { self.difficulty }
    pub fn presenter(&self) -> &P { &self.presenter }
    pub fn presenter_mut(&mut self) -> &mut P { &mut self.presenter }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::GameState;

    #[test]
    fn restart_notifies_reset_and_hud() {
        let game = Game::new(Difficulty::Medium, 7, Vec::new());
        assert_eq!(
            game.presenter().as_slice(),
            &[
                GameEvent::Reset { difficulty: Difficulty::Medium, rows: 16, cols: 16 },
                GameEvent::Hud { remaining_mines: 40, progress_percent: 0 },
            ]
        );
        assert_eq!(game.board().mine_count(), 40);
    }

    #[test]
    fn flag_updates_hud() {
        let mut game = Game::new(Difficulty::Easy, 3, Vec::new());
        game.presenter_mut().clear();
        assert_eq!(game.secondary_action(Pos::new(4, 4)).unwrap(), FlagOutcome::Flagged);
        assert_eq!(
            game.presenter().last(),
            Some(&GameEvent::Hud { remaining_mines: 9, progress_percent: 0 })
        );
    }

    #[test]
    fn board_events_reach_presenter() {
        let mut game = Game::new(Difficulty::Easy, 3, Vec::new());
        game.presenter_mut().clear();
        game.secondary_action(Pos::new(2, 2)).unwrap();
        assert_eq!(
            game.presenter().first(),
            Some(&GameEvent::CellChanged { pos: Pos::new(2, 2), visual: crate::events::VisualState::Flagged })
        );
        game.secondary_action(Pos::new(2, 2)).unwrap();
        assert_eq!(game.presenter().len(), 4);
    }

    #[test]
    fn noop_sends_nothing() {
        let mut game = Game::new(Difficulty::Easy, 3, Vec::new());
        game.secondary_action(Pos::new(0, 0)).unwrap();
        game.presenter_mut().clear();
        assert_eq!(game.primary_action(Pos::new(0, 0)).unwrap(), RevealOutcome::NoOp);
        assert!(game.presenter().is_empty());
    }

    #[test]
    fn restart_after_loss_resets_everything() {
        let mut game = Game::new(Difficulty::Easy, 11, Vec::new());
        let mine = (0..9)
            .flat_map(|r| (0..9).map(move |c| Pos::new(r, c)))
            .find(|&p| game.board().cell(p).unwrap().is_mine())
            .unwrap();
        assert_eq!(game.primary_action(mine).unwrap(), RevealOutcome::Lost);
        assert_eq!(game.board().state(), GameState::Lost);

        game.restart(Difficulty::Hard);
        let b = game.board();
        assert_eq!(b.state(), GameState::Playing);
        assert_eq!((b.rows(), b.cols(), b.total_mines()), (16, 30, 99));
        assert_eq!(b.revealed_count(), 0);
        assert_eq!(b.flagged_count(), 0);
        assert!(b.started_at().is_none());
        assert_eq!(game.difficulty(), Difficulty::Hard);
    }

    #[test]
    fn out_of_range_is_an_error() {
        let mut game = Game::new(Difficulty::Easy, 1, crate::events::NullPresenter);
        assert!(game.primary_action(Pos::new(0, 9)).is_err());
        assert!(game.secondary_action(Pos::new(9, 0)).is_err());
    }
}
