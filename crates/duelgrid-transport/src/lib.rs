//! Byte channels between two duelgrid peers.
//!
//! A peer either listens ([`Transport::accept`]) or dials
//! ([`Transport::connect`]); both paths end in a [`Connection`] that
//! delivers whole frames reliably and in order. Nothing above this crate
//! sequences or retries anything, so implementations must not reorder or
//! drop frames.
//!
//! # Feature Flags
//!
//! - `websocket` (default): [`WebSocketTransport`] over `tokio-tungstenite`

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::{
    PendingConnection, WebSocketConnection, WebSocketTransport,
};

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Names one channel for the lifetime of the process.
///
/// Inbound and outbound channels draw from the same counter, so an id
/// seen in a late event can always be told apart from the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Wraps a raw value. Mostly useful in tests; real channels use
    /// [`ConnectionId::next`].
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn next() -> Self {
        Self(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// A listening endpoint that can also open channels to other endpoints.
pub trait Transport: Send + Sync + 'static {
    type Connection: Connection;
    type Error: std::error::Error + Send + Sync;

    /// What a remote peer passes to [`connect`](Self::connect) to reach
    /// this endpoint.
    fn local_id(&self) -> String;

    /// Waits for the next inbound channel. Each accepted channel gets a
    /// fresh [`ConnectionId`].
    async fn accept(&mut self) -> Result<Self::Connection, Self::Error>;

    /// Dials `remote` and resolves once the channel is open. The channel
    /// keeps the caller's `id` so events raised while dialing can be
    /// matched to it.
    async fn connect(
        remote: &str,
        id: ConnectionId,
    ) -> Result<Self::Connection, Self::Error>;
}

/// One open channel.
///
/// `send` and `recv` may run concurrently from different tasks.
pub trait Connection: Send + Sync + 'static {
    type Error: std::error::Error + Send + Sync;

    async fn send(&self, data: &[u8]) -> Result<(), Self::Error>;

    /// The next frame, or `Ok(None)` once the remote side closed cleanly.
    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Closes the channel. Calling it again, or on a channel that already
    /// failed, is `Ok(())`.
    async fn close(&self) -> Result<(), Self::Error>;

    /// `false` after a close, a clean remote close, or any I/O failure.
    fn is_open(&self) -> bool;

    fn id(&self) -> ConnectionId;
}
