//! # Duelgrid
//!
//! Two-player tic-tac-toe between peers, with chat.
//!
//! One peer hosts and shares its endpoint address out of band; the other
//! joins it. Each side runs its own game engine, and the two stay in
//! step by exchanging moves over a single WebSocket channel.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use duelgrid::prelude::*;
//!
//! # async fn run() -> Result<(), PeerError> {
//! let (peer, mut notices) = Peer::spawn();
//! peer.host("Al", SessionConfig::default()).await?;
//!
//! while let Some(notice) = notices.recv().await {
//!     if let Notice::EndpointReady { id } = notice {
//!         println!("share this with your opponent: {id}");
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod peer;

pub use error::PeerError;
pub use peer::{Peer, PeerHandle};

pub mod prelude {
    pub use crate::{Peer, PeerError, PeerHandle};
    pub use duelgrid_engine::{
        Board, Cell, Engine, EngineError, GameSnapshot, GameStatus, Mark,
    };
    pub use duelgrid_protocol::{Codec, JsonCodec, WireMessage};
    pub use duelgrid_session::{
        ChatMessage, Notice, Origin, SessionConfig, SessionError, SessionInfo,
        SessionState,
    };
}
