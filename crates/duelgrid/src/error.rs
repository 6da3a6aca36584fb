//! Unified error type for duelgrid.

use duelgrid_session::SessionError;

/// Errors returned by [`PeerHandle`](crate::PeerHandle) calls.
///
/// Transport and wire failures never come back this way: the runtime
/// reports them as [`Notice`](duelgrid_session::Notice)s, because they
/// happen after the call that caused them has already returned.
#[derive(Debug, thiserror::Error)]
pub enum PeerError {
    /// The session rejected a local intent. Engine rule violations arrive
    /// here as [`SessionError::Engine`].
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The peer runtime task has stopped.
    #[error("peer runtime is not running")]
    Unavailable,
}
