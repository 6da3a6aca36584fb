//! Game engine for duelgrid.
//!
//! A pure, I/O-free N×N tic-tac-toe state machine. Nothing in this crate
//! knows about peers or channels; the session layer drives it.
//!
//! # Key types
//!
//! - [`Engine`]: owns one [`GameSnapshot`] and applies moves to it
//! - [`Evaluator`]: scans the winning lines of a board
//! - [`EngineConfig`]: board size and first player
//! - [`EngineError`]: contract violations raised by engine calls

mod config;
mod engine;
mod error;
mod evaluator;
mod types;

pub use config::EngineConfig;
pub use engine::Engine;
pub use error::EngineError;
pub use evaluator::{Evaluator, Outcome, winning_lines};
pub use types::{Board, Cell, GameSnapshot, GameStatus, Mark, Move};
