//! The game engine: sole owner of one [`GameSnapshot`].
//!
//! Callers never get a reference into the engine's state. Every accessor
//! hands back a clone, and every mutation builds a new snapshot first and
//! swaps it in only once validation has passed. A failed call therefore
//! leaves the engine exactly as it was.

use crate::config::MIN_BOARD_SIZE;
use crate::{
    Cell, EngineConfig, EngineError, Evaluator, GameSnapshot, GameStatus,
    Mark, Move, Outcome,
};

/// A deterministic N×N tic-tac-toe engine.
#[derive(Debug, Clone)]
pub struct Engine {
    evaluator: Evaluator,
    snapshot: GameSnapshot,
}

impl Engine {
    /// Creates an engine for a `size × size` board with X to move.
    ///
    /// # Errors
    /// Returns [`EngineError::InvalidBoardSize`] if `size < 3`.
    pub fn new(size: usize) -> Result<Self, EngineError> {
        Self::with_config(EngineConfig {
            board_size: size,
            ..EngineConfig::default()
        })
    }

    /// Creates an engine from a full [`EngineConfig`].
    ///
    /// # Errors
    /// Returns [`EngineError::InvalidBoardSize`] if the board is smaller
    /// than 3×3.
    pub fn with_config(config: EngineConfig) -> Result<Self, EngineError> {
        if config.board_size < MIN_BOARD_SIZE {
            return Err(EngineError::InvalidBoardSize(config.board_size));
        }
        Ok(Self::from_valid(config))
    }

    /// Builds the engine; `config` must already be validated.
    fn from_valid(config: EngineConfig) -> Self {
        Self {
            evaluator: Evaluator::new(config.board_size),
            snapshot: GameSnapshot::empty(
                config.board_size,
                config.first_player,
            ),
        }
    }

    /// Side length of the board.
    pub fn size(&self) -> usize {
        self.evaluator.size()
    }

    fn cells(&self) -> usize {
        self.size() * self.size()
    }

    /// Starts a fresh game with `first_player` to move.
    pub fn reset(&mut self, first_player: Mark) -> GameSnapshot {
        self.snapshot = GameSnapshot::empty(self.size(), first_player);
        tracing::debug!(size = self.size(), %first_player, "engine reset");
        self.snapshot.clone()
    }

    /// Replaces local state with a snapshot produced elsewhere.
    ///
    /// The foreign snapshot wins unconditionally; nothing is merged.
    ///
    /// # Errors
    /// - [`EngineError::SizeMismatch`]: the board is not `size²` cells long
    /// - [`EngineError::InconsistentSnapshot`]: `move_count`, the history
    ///   length, and the number of occupied cells are not all equal
    pub fn load_snapshot(
        &mut self,
        external: &GameSnapshot,
    ) -> Result<GameSnapshot, EngineError> {
        if external.board.len() != self.cells() {
            return Err(EngineError::SizeMismatch {
                expected: self.cells(),
                actual: external.board.len(),
            });
        }
        let occupied = external.board.iter().filter(|c| !c.is_empty()).count();
        if external.move_count != occupied || external.history.len() != occupied
        {
            return Err(EngineError::InconsistentSnapshot {
                move_count: external.move_count,
                history: external.history.len(),
                occupied,
            });
        }
        self.snapshot = external.clone();
        tracing::debug!(
            move_count = self.snapshot.move_count,
            status = %self.snapshot.status,
            "snapshot loaded"
        );
        Ok(self.snapshot.clone())
    }

    /// Places the current player's mark on `cell_index`.
    ///
    /// The turn passes to the other player only while the game stays in
    /// progress; after a win or draw `current_player` is left as is.
    ///
    /// # Errors
    /// - [`EngineError::GameNotInProgress`]: the game is won or drawn
    /// - [`EngineError::IndexOutOfRange`]: `cell_index >= size²`
    /// - [`EngineError::CellOccupied`]: the cell already holds a mark
    pub fn play_move(
        &mut self,
        cell_index: usize,
    ) -> Result<GameSnapshot, EngineError> {
        self.check_playable(cell_index)?;

        let mut next = self.snapshot.clone();
        let player = next.current_player;
        next.board[cell_index] = Cell::from(player);
        next.history.push(Move { cell_index, player });
        next.move_count += 1;

        match self.evaluator.evaluate(&next.board) {
            Outcome::InProgress => {
                next.current_player = player.opponent();
            }
            Outcome::Won { winner, line } => {
                next.status = GameStatus::Won;
                next.winner = Some(winner);
                next.winning_line = Some(line);
                tracing::info!(%winner, "game won");
            }
            Outcome::Draw => {
                next.status = GameStatus::Draw;
                tracing::info!("game drawn");
            }
        }

        self.snapshot = next;
        Ok(self.snapshot.clone())
    }

    /// Plays the lowest-indexed empty cell.
    ///
    /// # Errors
    /// Returns [`EngineError::NoMovesAvailable`] when there is nothing left
    /// to play, including after the game has ended.
    pub fn auto_play(&mut self) -> Result<GameSnapshot, EngineError> {
        let index = self
            .available_moves()
            .first()
            .copied()
            .ok_or(EngineError::NoMovesAvailable)?;
        self.play_move(index)
    }

    /// Returns a copy of the current snapshot.
    pub fn snapshot(&self) -> GameSnapshot {
        self.snapshot.clone()
    }

    /// Empty cell indices in ascending order. Empty once the game is over.
    pub fn available_moves(&self) -> Vec<usize> {
        if self.snapshot.status.is_finished() {
            return Vec::new();
        }
        self.snapshot
            .board
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_empty())
            .map(|(i, _)| i)
            .collect()
    }

    /// `true` iff `cell_index` is in range, empty, and the game is live.
    pub fn can_play(&self, cell_index: usize) -> bool {
        self.check_playable(cell_index).is_ok()
    }

    fn check_playable(&self, cell_index: usize) -> Result<(), EngineError> {
        if self.snapshot.status != GameStatus::InProgress {
            return Err(EngineError::GameNotInProgress);
        }
        if cell_index >= self.cells() {
            return Err(EngineError::IndexOutOfRange {
                index: cell_index,
                cells: self.cells(),
            });
        }
        if !self.snapshot.board[cell_index].is_empty() {
            return Err(EngineError::CellOccupied(cell_index));
        }
        Ok(())
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::from_valid(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play_all(engine: &mut Engine, moves: &[usize]) -> GameSnapshot {
        let mut last = engine.snapshot();
        for &m in moves {
            last = engine.play_move(m).expect("legal move");
        }
        last
    }

    // =====================================================================
    // construction
    // =====================================================================

    #[test]
    fn test_new_rejects_board_smaller_than_three() {
        assert_eq!(Engine::new(2).unwrap_err(), EngineError::InvalidBoardSize(2));
        assert_eq!(Engine::new(0).unwrap_err(), EngineError::InvalidBoardSize(0));
    }

    #[test]
    fn test_new_builds_empty_board() {
        let engine = Engine::new(5).unwrap();
        let snap = engine.snapshot();
        assert_eq!(snap.board.len(), 25);
        assert_eq!(snap.status, GameStatus::InProgress);
        assert_eq!(snap.current_player, Mark::X);
        assert_eq!(snap.move_count, 0);
    }

    #[test]
    fn test_with_config_honours_first_player() {
        let engine = Engine::with_config(EngineConfig {
            board_size: 3,
            first_player: Mark::O,
        })
        .unwrap();
        assert_eq!(engine.snapshot().current_player, Mark::O);
    }

    // =====================================================================
    // play_move()
    // =====================================================================

    #[test]
    fn test_play_move_places_mark_and_toggles_turn() {
        let mut engine = Engine::default();
        let snap = engine.play_move(0).unwrap();

        assert_eq!(snap.board[0], Cell::X);
        assert_eq!(snap.current_player, Mark::O);
        assert_eq!(snap.status, GameStatus::InProgress);
        assert_eq!(snap.history, vec![Move { cell_index: 0, player: Mark::X }]);
    }

    #[test]
    fn test_play_move_occupied_cell_leaves_snapshot_untouched() {
        let mut engine = Engine::default();
        engine.play_move(4).unwrap();
        let before = engine.snapshot();

        let err = engine.play_move(4).unwrap_err();

        assert_eq!(err, EngineError::CellOccupied(4));
        assert_eq!(engine.snapshot(), before);
    }

    #[test]
    fn test_play_move_out_of_range_leaves_snapshot_untouched() {
        let mut engine = Engine::default();
        let before = engine.snapshot();

        let err = engine.play_move(9).unwrap_err();

        assert_eq!(err, EngineError::IndexOutOfRange { index: 9, cells: 9 });
        assert_eq!(engine.snapshot(), before);
    }

    #[test]
    fn test_play_move_after_win_keeps_current_player() {
        let mut engine = Engine::default();
        let snap = play_all(&mut engine, &[0, 1, 3, 4, 6]);

        assert_eq!(snap.status, GameStatus::Won);
        // X made the winning move and stays the "current" player.
        assert_eq!(snap.current_player, Mark::X);
        assert_eq!(engine.play_move(8).unwrap_err(), EngineError::GameNotInProgress);
    }

    // =====================================================================
    // reset() / load_snapshot()
    // =====================================================================

    #[test]
    fn test_reset_clears_board_and_history() {
        let mut engine = Engine::default();
        play_all(&mut engine, &[0, 1, 2]);

        let snap = engine.reset(Mark::O);

        assert!(snap.board.iter().all(|c| c.is_empty()));
        assert!(snap.history.is_empty());
        assert_eq!(snap.move_count, 0);
        assert_eq!(snap.current_player, Mark::O);
    }

    #[test]
    fn test_load_snapshot_size_mismatch() {
        let mut engine = Engine::default();
        let foreign = Engine::new(4).unwrap().snapshot();

        let err = engine.load_snapshot(&foreign).unwrap_err();

        assert_eq!(err, EngineError::SizeMismatch { expected: 9, actual: 16 });
    }

    #[test]
    fn test_load_snapshot_rejects_move_count_out_of_step_with_board() {
        let mut engine = Engine::default();
        engine.play_move(0).unwrap();
        let before = engine.snapshot();
        let mut foreign = Engine::default().snapshot();
        foreign.move_count = usize::MAX;

        let err = engine.load_snapshot(&foreign).unwrap_err();

        assert_eq!(
            err,
            EngineError::InconsistentSnapshot {
                move_count: usize::MAX,
                history: 0,
                occupied: 0,
            }
        );
        assert_eq!(engine.snapshot(), before);
    }

    #[test]
    fn test_load_snapshot_rejects_history_out_of_step_with_board() {
        let mut engine = Engine::default();
        let mut foreign = Engine::default();
        let mut snap = foreign.play_move(4).unwrap();
        snap.history.clear();

        let err = engine.load_snapshot(&snap).unwrap_err();

        assert!(matches!(err, EngineError::InconsistentSnapshot { history: 0, .. }));
    }

    #[test]
    fn test_default_matches_default_config() {
        let engine = Engine::default();
        let configured = Engine::with_config(EngineConfig::default()).unwrap();
        assert_eq!(engine.size(), 3);
        assert_eq!(engine.snapshot(), configured.snapshot());
    }

    #[test]
    fn test_load_snapshot_overwrites_local_state() {
        let mut host = Engine::default();
        play_all(&mut host, &[4, 0]);
        let mut joiner = Engine::default();
        joiner.play_move(8).unwrap();

        joiner.load_snapshot(&host.snapshot()).unwrap();

        assert_eq!(joiner.snapshot(), host.snapshot());
    }

    // =====================================================================
    // inspection
    // =====================================================================

    #[test]
    fn test_available_moves_ascending() {
        let mut engine = Engine::default();
        play_all(&mut engine, &[4, 0, 8]);
        assert_eq!(engine.available_moves(), vec![1, 2, 3, 5, 6, 7]);
    }

    #[test]
    fn test_can_play() {
        let mut engine = Engine::default();
        engine.play_move(0).unwrap();
        assert!(!engine.can_play(0));
        assert!(engine.can_play(1));
        assert!(!engine.can_play(42));
    }

    #[test]
    fn test_auto_play_takes_lowest_empty_cell() {
        let mut engine = Engine::default();
        engine.play_move(0).unwrap();
        let snap = engine.auto_play().unwrap();
        assert_eq!(snap.board[1], Cell::O);
    }

    #[test]
    fn test_auto_play_fails_when_game_over() {
        let mut engine = Engine::default();
        play_all(&mut engine, &[0, 1, 3, 4, 6]);
        assert_eq!(engine.auto_play().unwrap_err(), EngineError::NoMovesAvailable);
    }
}
