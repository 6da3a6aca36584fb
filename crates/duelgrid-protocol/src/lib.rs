//! Wire protocol for duelgrid.
//!
//! This crate defines what two peers say to each other:
//!
//! - **Types** ([`WireMessage`]): the five message kinds that travel on
//!   the data channel.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those messages are
//!   converted to/from bytes.
//! - **Errors** ([`ProtocolError`]): what can go wrong during
//!   encoding/decoding.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw bytes) and session
//! (connection lifecycle + game sync). It doesn't know about connections;
//! it only knows how to serialize and deserialize messages.
//!
//! ```text
//! Transport (bytes) → Protocol (WireMessage) → Session (engine + chat)
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::WireMessage;
