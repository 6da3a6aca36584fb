//! Board evaluation: has anyone won, is it a draw, or is play ongoing?
//!
//! The winning lines of an `n × n` board depend only on `n`, so they are
//! computed once per size and kept by the [`Evaluator`]. Evaluation scans
//! them in a fixed order (rows, then columns, then the main diagonal, then
//! the anti-diagonal) and reports the first completed one. Since it runs
//! after every single placement, at most one new line can complete per
//! call; the fixed order just keeps results deterministic.

use crate::{Cell, Mark};

/// Result of evaluating a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    InProgress,
    Won { winner: Mark, line: Vec<usize> },
    Draw,
}

/// Builds every winning line of an `n × n` board, in scan order.
///
/// Each line is an ordered list of `n` cell indices.
pub fn winning_lines(n: usize) -> Vec<Vec<usize>> {
    let mut lines = Vec::with_capacity(2 * n + 2);

    // rows
    for row in 0..n {
        lines.push((0..n).map(|col| row * n + col).collect());
    }
    // columns
    for col in 0..n {
        lines.push((0..n).map(|row| row * n + col).collect());
    }
    // main diagonal, anti-diagonal
    lines.push((0..n).map(|i| i * n + i).collect());
    lines.push((0..n).map(|i| i * n + (n - 1 - i)).collect());

    lines
}

/// Evaluates boards of one fixed size.
#[derive(Debug, Clone)]
pub struct Evaluator {
    size: usize,
    lines: Vec<Vec<usize>>,
}

impl Evaluator {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            lines: winning_lines(size),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Classifies `board`, which must hold `size²` cells.
    pub fn evaluate(&self, board: &[Cell]) -> Outcome {
        debug_assert_eq!(board.len(), self.size * self.size);

        for line in &self.lines {
            let Some(first) = board[line[0]].mark() else {
                continue;
            };
            if line.iter().all(|&i| board[i].mark() == Some(first)) {
                return Outcome::Won {
                    winner: first,
                    line: line.clone(),
                };
            }
        }

        if board.iter().all(|c| !c.is_empty()) {
            Outcome::Draw
        } else {
            Outcome::InProgress
        }
    }
}
