//! Error types for the session layer.

use duelgrid_engine::EngineError;

/// Local validation errors, reported back to whoever issued the intent.
///
/// None of these change session state. Transport failures are not
/// errors here: they arrive as [`SessionEvent`](crate::SessionEvent)s and
/// turn into notices and state transitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// Hosting or joining needs a non-blank username.
    #[error("username must not be empty")]
    EmptyUsername,

    /// Joining needs a non-blank remote identifier.
    #[error("peer id must not be empty")]
    EmptyPeerId,

    /// Chat lines must contain something besides whitespace.
    #[error("message must not be empty")]
    EmptyMessage,

    /// The intent needs an open channel to a peer.
    #[error("not connected to a peer")]
    NotConnected,

    /// The local player tried to move on the opponent's turn.
    #[error("not your turn")]
    NotYourTurn,

    /// The engine rejected the move.
    #[error(transparent)]
    Engine(#[from] EngineError),
}
