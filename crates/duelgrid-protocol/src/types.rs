//! The messages two peers exchange over the data channel.
//!
//! `WireMessage` is a closed enum: the session layer dispatches on it with
//! a single exhaustive `match`, so adding a message kind without handling
//! it is a compile error rather than a silently ignored tag.
//!
//! `#[serde(tag = "type", rename_all = "kebab-case")]` produces internally
//! tagged JSON with kebab-case tags, and `rename_all_fields = "camelCase"`
//! keeps field names the way the other peer expects them:
//!
//! ```text
//! { "type": "host-ready", "username": "Al", "youAre": "O", "snapshot": {...} }
//! { "type": "move", "cellIndex": 4 }
//! ```

use duelgrid_engine::{GameSnapshot, Mark};
use serde::{Deserialize, Serialize};

/// One message on the wire.
///
/// Built just before it is sent and dropped after dispatch; receivers
/// reconstruct their own state from it and never keep the message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum WireMessage {
    /// Joiner → host, once the channel opens: "this is who I am, send me
    /// the game".
    Join { username: String },

    /// Host → joiner, in reply to `Join`: assigns the joiner's mark and
    /// hands over the authoritative snapshot.
    HostReady {
        username: String,
        you_are: Mark,
        snapshot: GameSnapshot,
    },

    /// Either direction, after a locally accepted move.
    Move { cell_index: usize },

    /// Either direction, after a local reset while connected.
    Reset,

    /// Either direction, on chat submit. `timestamp` is Unix millis.
    Chat {
        message: String,
        username: String,
        timestamp: u64,
    },
}

impl WireMessage {
    /// The wire tag, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Join { .. } => "join",
            Self::HostReady { .. } => "host-ready",
            Self::Move { .. } => "move",
            Self::Reset => "reset",
            Self::Chat { .. } => "chat",
        }
    }
}

#[cfg(test)]
mod tests {
    //! These tests pin the JSON shapes, because a mismatch means the other
    //! peer can't parse what we send.

    use super::*;

    fn to_json(msg: &WireMessage) -> serde_json::Value {
        serde_json::to_value(msg).unwrap()
    }

    #[test]
    fn test_join_json_format() {
        let json = to_json(&WireMessage::Join {
            username: "Bo".into(),
        });
        assert_eq!(json, serde_json::json!({ "type": "join", "username": "Bo" }));
    }

    #[test]
    fn test_host_ready_json_format() {
        let json = to_json(&WireMessage::HostReady {
            username: "Al".into(),
            you_are: Mark::O,
            snapshot: GameSnapshot::empty(3, Mark::X),
        });

        assert_eq!(json["type"], "host-ready");
        assert_eq!(json["username"], "Al");
        assert_eq!(json["youAre"], "O");
        assert_eq!(json["snapshot"]["currentPlayer"], "X");
        assert_eq!(json["snapshot"]["status"], "in-progress");
    }

    #[test]
    fn test_move_json_format() {
        let json = to_json(&WireMessage::Move { cell_index: 7 });
        assert_eq!(json, serde_json::json!({ "type": "move", "cellIndex": 7 }));
    }

    #[test]
    fn test_reset_json_format() {
        let json = to_json(&WireMessage::Reset);
        assert_eq!(json, serde_json::json!({ "type": "reset" }));
    }

    #[test]
    fn test_chat_json_format() {
        let json = to_json(&WireMessage::Chat {
            message: "gg".into(),
            username: "Al".into(),
            timestamp: 1_700_000_000_000,
        });
        assert_eq!(json["type"], "chat");
        assert_eq!(json["message"], "gg");
        assert_eq!(json["timestamp"], 1_700_000_000_000u64);
    }

    #[test]
    fn test_host_ready_round_trip_keeps_snapshot() {
        let mut snapshot = GameSnapshot::empty(4, Mark::X);
        snapshot.board[5] = Mark::X.into();
        snapshot.move_count = 1;
        snapshot.history.push(duelgrid_engine::Move {
            cell_index: 5,
            player: Mark::X,
        });
        snapshot.current_player = Mark::O;

        let msg = WireMessage::HostReady {
            username: "Al".into(),
            you_are: Mark::O,
            snapshot,
        };
        let bytes = serde_json::to_vec(&msg).unwrap();
        let decoded: WireMessage = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(msg, decoded);
    }

    #[test]
    fn test_decode_unknown_type_returns_error() {
        let result: Result<WireMessage, _> =
            serde_json::from_str(r#"{"type": "fly-to-moon"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_negative_cell_index_returns_error() {
        let result: Result<WireMessage, _> =
            serde_json::from_str(r#"{"type": "move", "cellIndex": -1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_fractional_cell_index_returns_error() {
        let result: Result<WireMessage, _> =
            serde_json::from_str(r#"{"type": "move", "cellIndex": 1.5}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_kind_matches_serialized_tag() {
        let msgs = [
            WireMessage::Join { username: "a".into() },
            WireMessage::Move { cell_index: 0 },
            WireMessage::Reset,
            WireMessage::Chat {
                message: "m".into(),
                username: "a".into(),
                timestamp: 0,
            },
        ];
        for msg in msgs {
            assert_eq!(to_json(&msg)["type"], msg.kind());
        }
    }
}
