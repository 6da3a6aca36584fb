//! What goes into the session (events) and what comes out (effects).
//!
//! ```text
//!             local intent ──┐
//!                            ▼
//!  SessionEvent ──→ Session ──→ Vec<Effect> ──→ runtime
//!       ▲                                         │
//!       └──────────── transport callbacks ◀───────┘
//! ```

use duelgrid_engine::{GameSnapshot, Mark};
use duelgrid_protocol::WireMessage;
use duelgrid_transport::ConnectionId;

use crate::{ChatMessage, SessionState};

/// A transport callback, reported by the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The listening endpoint is up and reachable at `id`.
    EndpointOpened { id: String },

    /// The listening endpoint could not be opened or died.
    EndpointFailed { reason: String },

    /// A remote peer dialed our endpoint.
    IncomingConnection(ConnectionId),

    /// The channel reached "open".
    ChannelOpened(ConnectionId),

    /// A decoded message arrived on the channel.
    ChannelMessage(ConnectionId, WireMessage),

    /// The channel closed cleanly.
    ChannelClosed(ConnectionId),

    /// The channel failed (connect refused, reset, send failure, ...).
    ChannelFailed(ConnectionId, String),
}

/// An instruction from the session to the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Start listening on `bind_addr`; report back with
    /// [`SessionEvent::EndpointOpened`] or [`SessionEvent::EndpointFailed`].
    OpenEndpoint { bind_addr: String },

    /// Dial `remote`, tagging the channel `id`.
    Connect { id: ConnectionId, remote: String },

    /// Write `message` to channel `id`. Fire-and-forget.
    Send { id: ConnectionId, message: WireMessage },

    /// Tear down channel `id` (or abort the dial for it). Never fails.
    CloseChannel(ConnectionId),

    /// Tear down the listening endpoint. Never fails.
    CloseEndpoint,

    /// Publish something to the user.
    Notify(Notice),
}

/// A user-visible outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// The session moved to a new state.
    StateChanged(SessionState),

    /// The hosting endpoint is reachable; share `id` out of band.
    EndpointReady { id: String },

    /// The channel is open and the local mark is bound.
    Connected { mark: Mark },

    /// The opponent announced their name.
    OpponentJoined { username: String },

    /// The local game snapshot changed.
    SnapshotUpdated(GameSnapshot),

    /// A line was added to the chat log.
    ChatAppended(ChatMessage),

    /// A connection attempt failed before the channel opened.
    ConnectionFailed { reason: String },

    /// An open channel went away and the session returned to Idle.
    Disconnected { reason: String },
}
