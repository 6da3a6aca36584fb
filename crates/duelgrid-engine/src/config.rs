//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::Mark;

/// Smallest board the engine accepts.
pub(crate) const MIN_BOARD_SIZE: usize = 3;

/// Configuration for an [`Engine`](crate::Engine) instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Side length of the square board. Must be at least 3.
    pub board_size: usize,

    /// Who moves first after construction.
    pub first_player: Mark,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            board_size: MIN_BOARD_SIZE,
            first_player: Mark::X,
        }
    }
}
