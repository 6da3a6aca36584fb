//! Error types for the engine layer.

/// Contract violations raised synchronously by [`Engine`](crate::Engine)
/// calls.
///
/// None of these leave the engine in a modified state: a failed call
/// returns before the new snapshot is swapped in.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The requested board is smaller than 3×3.
    #[error("invalid board size {0}: must be at least 3")]
    InvalidBoardSize(usize),

    /// A loaded snapshot's board doesn't match this engine's size.
    #[error("snapshot has {actual} cells, expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },

    /// A loaded snapshot's move count, history, and board disagree.
    #[error(
        "inconsistent snapshot: move count {move_count}, {history} moves in \
         history, {occupied} occupied cells"
    )]
    InconsistentSnapshot {
        move_count: usize,
        history: usize,
        occupied: usize,
    },

    /// The cell index is outside `[0, size²)`.
    #[error("cell {index} out of range (board has {cells} cells)")]
    IndexOutOfRange { index: usize, cells: usize },

    /// The target cell already holds a mark.
    #[error("cell {0} is occupied")]
    CellOccupied(usize),

    /// The game is already won or drawn.
    #[error("game is not in progress")]
    GameNotInProgress,

    /// `auto_play` found no empty cell to play.
    #[error("no moves available")]
    NoMovesAvailable,
}
