//! Core game types: marks, cells, moves, and the game snapshot.
//!
//! Everything here is plain data that derives `Serialize`/`Deserialize`,
//! because a [`GameSnapshot`] travels inside the `host-ready` wire message.
//! The serde attributes pin the JSON shape both peers agree on:
//!
//! ```text
//! {
//!   "board": ["X", null, "O", ...],
//!   "status": "in-progress",
//!   "currentPlayer": "X",
//!   "winner": null,
//!   "winningLine": null,
//!   "moveCount": 2,
//!   "history": [{ "cellIndex": 0, "player": "X" }, ...]
//! }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Mark
// ---------------------------------------------------------------------------

/// One of the two player symbols.
///
/// The domain is exactly two values regardless of board size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    /// Returns the other mark.
    pub fn opponent(self) -> Self {
        match self {
            Self::X => Self::O,
            Self::O => Self::X,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "X"),
            Self::O => write!(f, "O"),
        }
    }
}

// ---------------------------------------------------------------------------
// Cell / Board
// ---------------------------------------------------------------------------

/// The content of a single board cell.
///
/// Serialized through `Option<Mark>`, so an empty cell is `null` on the
/// wire and an occupied one is `"X"` or `"O"`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(from = "Option<Mark>", into = "Option<Mark>")]
pub enum Cell {
    #[default]
    Empty,
    X,
    O,
}

impl Cell {
    /// Returns the mark occupying this cell, if any.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Self::Empty => None,
            Self::X => Some(Mark::X),
            Self::O => Some(Mark::O),
        }
    }

    pub fn is_empty(self) -> bool {
        self == Self::Empty
    }
}

impl From<Mark> for Cell {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::X => Self::X,
            Mark::O => Self::O,
        }
    }
}

impl From<Option<Mark>> for Cell {
    fn from(mark: Option<Mark>) -> Self {
        mark.map_or(Self::Empty, Self::from)
    }
}

impl From<Cell> for Option<Mark> {
    fn from(cell: Cell) -> Self {
        cell.mark()
    }
}

/// Row-major board. Index `i` is row `i / size`, column `i % size`.
pub type Board = Vec<Cell>;

// ---------------------------------------------------------------------------
// Move
// ---------------------------------------------------------------------------

/// A recorded move. Never changed once it is in a snapshot's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Move {
    pub cell_index: usize,
    pub player: Mark,
}

// ---------------------------------------------------------------------------
// GameStatus
// ---------------------------------------------------------------------------

/// Lifecycle of one game.
///
/// ```text
/// InProgress ──(winning move)──→ Won
///     │
///     └──(board filled, no win)──→ Draw
/// ```
///
/// `Won` and `Draw` are terminal until the engine is reset or a snapshot
/// is loaded.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum GameStatus {
    #[default]
    InProgress,
    Won,
    Draw,
}

impl GameStatus {
    /// Returns `true` for `Won` and `Draw`.
    pub fn is_finished(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InProgress => write!(f, "InProgress"),
            Self::Won => write!(f, "Won"),
            Self::Draw => write!(f, "Draw"),
        }
    }
}

// ---------------------------------------------------------------------------
// GameSnapshot
// ---------------------------------------------------------------------------

/// The complete state of a game at one instant.
///
/// Invariants the [`Engine`](crate::Engine) maintains:
///
/// - `move_count == history.len()` == number of non-empty cells
/// - `status == Won` ⇒ `winner` and `winning_line` are present and every
///   cell on the line holds `winner`
/// - `status == Draw` ⇒ every cell is occupied and no line is won
/// - `status == InProgress` ⇒ no winner, no line, at least one empty cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub board: Board,
    pub status: GameStatus,
    pub current_player: Mark,
    pub winner: Option<Mark>,
    pub winning_line: Option<Vec<usize>>,
    pub move_count: usize,
    pub history: Vec<Move>,
}

impl GameSnapshot {
    /// An empty board of `size × size` cells, waiting for `first_player`.
    pub fn empty(size: usize, first_player: Mark) -> Self {
        Self {
            board: vec![Cell::Empty; size * size],
            status: GameStatus::InProgress,
            current_player: first_player,
            winner: None,
            winning_line: None,
            move_count: 0,
            history: Vec::new(),
        }
    }

    /// Number of occupied cells on the board.
    pub fn occupied(&self) -> usize {
        self.board.iter().filter(|c| !c.is_empty()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_opponent_toggles() {
        assert_eq!(Mark::X.opponent(), Mark::O);
        assert_eq!(Mark::O.opponent(), Mark::X);
    }

    #[test]
    fn test_cell_serializes_as_nullable_mark() {
        let json = serde_json::to_string(&vec![Cell::X, Cell::Empty, Cell::O])
            .unwrap();
        assert_eq!(json, r#"["X",null,"O"]"#);

        let cells: Vec<Cell> = serde_json::from_str(&json).unwrap();
        assert_eq!(cells, vec![Cell::X, Cell::Empty, Cell::O]);
    }

    #[test]
    fn test_status_serializes_as_kebab_case() {
        let json = serde_json::to_string(&GameStatus::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");
    }

    #[test]
    fn test_snapshot_json_uses_camel_case_fields() {
        let snapshot = GameSnapshot::empty(3, Mark::X);
        let json = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(json["currentPlayer"], "X");
        assert_eq!(json["moveCount"], 0);
        assert!(json["winningLine"].is_null());
        assert_eq!(json["board"].as_array().unwrap().len(), 9);
    }

    #[test]
    fn test_empty_snapshot_has_no_occupied_cells() {
        let snapshot = GameSnapshot::empty(4, Mark::O);
        assert_eq!(snapshot.board.len(), 16);
        assert_eq!(snapshot.occupied(), 0);
        assert_eq!(snapshot.current_player, Mark::O);
    }
}
