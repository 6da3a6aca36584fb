//! The chat log: an append-only list of lines from both players.
//!
//! Order is whatever order lines were appended in. Local lines are
//! appended when submitted, remote lines when their `chat` message is
//! dispatched, and the channel delivers in order, so nothing here sorts,
//! dedups, or reorders.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Who wrote a chat line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Origin {
    /// Typed by the local user.
    Local,
    /// Received from the connected peer.
    Peer,
}

/// One chat line. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// 32-character hex id, unique per line.
    pub id: String,
    pub origin: Origin,
    pub username: String,
    pub text: String,
    /// Unix milliseconds. Local lines use the local clock; peer lines keep
    /// the sender's timestamp.
    pub timestamp: u64,
}

impl ChatMessage {
    /// Builds a line stamped with a fresh id.
    pub fn new(
        origin: Origin,
        username: impl Into<String>,
        text: impl Into<String>,
        timestamp: u64,
    ) -> Self {
        Self {
            id: generate_id(),
            origin,
            username: username.into(),
            text: text.into(),
            timestamp,
        }
    }
}

/// Append-only, ordered, unbounded within one session.
#[derive(Debug, Clone, Default)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Drops every line. Called on session start and on disconnect.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Milliseconds since the Unix epoch, or 0 if the clock is before it.
pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// 128 random bits as 32 lowercase hex characters.
fn generate_id() -> String {
    let bytes: [u8; 16] = rand::rng().random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
