//! Peer session management for duelgrid.
//!
//! This crate owns everything that happens between "the user clicked
//! Host/Join" and "the channel went away":
//!
//! 1. **Lifecycle**: the [`Session`] state machine
//!    (Idle → Hosting/Joining → Connected → Idle)
//! 2. **Sync**: turning the five [`WireMessage`](duelgrid_protocol::WireMessage)
//!    kinds into engine and chat updates, and back
//! 3. **Chat**: the append-only [`ChatLog`]
//!
//! The session performs no I/O. Every local intent and every transport
//! event is a method call that returns a list of [`Effect`]s; the runtime
//! above executes them (open the endpoint, dial, send, close) and feeds
//! the resulting transport events back in.
//!
//! # How it fits in the stack
//!
//! ```text
//! Runtime (above)   ← executes effects, owns sockets and tasks
//!     ↕
//! Session (this crate)  ← state machine, game sync, chat
//!     ↕
//! Protocol + Engine (below)  ← WireMessage, GameSnapshot
//! ```

mod chat;
mod config;
mod effect;
mod error;
mod session;
mod sync;

pub use chat::{ChatLog, ChatMessage, Origin};
pub use config::SessionConfig;
pub use effect::{Effect, Notice, SessionEvent};
pub use error::SessionError;
pub use session::{Session, SessionInfo, SessionState};
