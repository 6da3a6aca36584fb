//! Game and chat sync over the open channel.
//!
//! Outbound: local intents are validated, applied locally, then broadcast.
//! Inbound: every [`WireMessage`] is applied to the local engine or chat
//! log. Peers never echo what they receive, so a message crosses the wire
//! exactly once.
//!
//! Trust model: turn order is only enforced on the sending side. A remote
//! `move` is handed straight to the engine, which still rejects occupied,
//! out-of-range, or post-game cells.

use duelgrid_engine::{EngineError, Mark};
use duelgrid_protocol::WireMessage;
use duelgrid_transport::ConnectionId;

use crate::chat::now_millis;
use crate::{ChatMessage, Effect, Notice, Origin, Session, SessionError};

impl Session {
    // -- Outbound ----------------------------------------------------------

    /// Plays the local mark at `cell_index` and broadcasts the move.
    ///
    /// # Errors
    /// - [`SessionError::NotConnected`]: no open channel
    /// - [`SessionError::NotYourTurn`]: the opponent is to move
    /// - [`SessionError::Engine`]: the engine rejected the cell
    pub fn play_cell(
        &mut self,
        cell_index: usize,
    ) -> Result<Vec<Effect>, SessionError> {
        let id = self.open_channel().ok_or(SessionError::NotConnected)?;
        let mark = self.local_mark.ok_or(SessionError::NotConnected)?;

        let current = self.engine.snapshot();
        if !current.status.is_finished() && current.current_player != mark {
            return Err(SessionError::NotYourTurn);
        }
        let snapshot = self.engine.play_move(cell_index)?;

        tracing::debug!(%id, cell_index, %mark, "local move");
        Ok(vec![
            Effect::Send {
                id,
                message: WireMessage::Move { cell_index },
            },
            Effect::Notify(Notice::SnapshotUpdated(snapshot)),
        ])
    }

    /// Appends a local chat line and broadcasts it.
    ///
    /// # Errors
    /// - [`SessionError::EmptyMessage`]: `text` is blank
    /// - [`SessionError::NotConnected`]: no open channel
    pub fn send_chat(&mut self, text: &str) -> Result<Vec<Effect>, SessionError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SessionError::EmptyMessage);
        }
        let id = self.open_channel().ok_or(SessionError::NotConnected)?;
        let username = self.username.clone().unwrap_or_default();

        let line = ChatMessage::new(Origin::Local, username, text, now_millis());
        self.chat.append(line.clone());

        Ok(vec![
            Effect::Notify(Notice::ChatAppended(line.clone())),
            Effect::Send {
                id,
                message: WireMessage::Chat {
                    message: line.text,
                    username: line.username,
                    timestamp: line.timestamp,
                },
            },
        ])
    }

    /// Starts a fresh game with X to move. Broadcast only when connected;
    /// offline it just clears the local board.
    pub fn reset(&mut self) -> Vec<Effect> {
        let snapshot = self.engine.reset(Mark::X);
        let mut effects = vec![Effect::Notify(Notice::SnapshotUpdated(snapshot))];
        if let Some(id) = self.open_channel() {
            tracing::debug!(%id, "local reset");
            effects.push(Effect::Send {
                id,
                message: WireMessage::Reset,
            });
        }
        effects
    }

    // -- Inbound -----------------------------------------------------------

    /// Applies one message received on the open channel `id`.
    pub(crate) fn dispatch(
        &mut self,
        id: ConnectionId,
        message: WireMessage,
    ) -> Vec<Effect> {
        tracing::trace!(%id, kind = message.kind(), "dispatch");

        match message {
            WireMessage::Join { username } => {
                tracing::info!(%id, opponent = %username, "opponent joined");
                self.opponent = Some(username.clone());
                vec![
                    Effect::Notify(Notice::OpponentJoined { username }),
                    Effect::Send {
                        id,
                        message: WireMessage::HostReady {
                            username: self.username.clone().unwrap_or_default(),
                            you_are: Mark::O,
                            snapshot: self.engine.snapshot(),
                        },
                    },
                ]
            }

            WireMessage::HostReady {
                username,
                you_are,
                snapshot,
            } => {
                tracing::info!(%id, opponent = %username, %you_are, "host ready");
                self.opponent = Some(username.clone());
                self.local_mark = Some(you_are);

                let mut effects =
                    vec![Effect::Notify(Notice::OpponentJoined { username })];
                match self.engine.load_snapshot(&snapshot) {
                    Ok(loaded) => {
                        effects.push(Effect::Notify(Notice::SnapshotUpdated(loaded)));
                    }
                    Err(EngineError::SizeMismatch { expected, actual }) => {
                        tracing::warn!(
                            %id,
                            expected,
                            actual,
                            "host board size differs, keeping local board"
                        );
                    }
                    Err(e) => {
                        tracing::warn!(%id, error = %e, "rejected host snapshot");
                    }
                }
                effects
            }

            WireMessage::Move { cell_index } => {
                match self.engine.play_move(cell_index) {
                    Ok(snapshot) => {
                        vec![Effect::Notify(Notice::SnapshotUpdated(snapshot))]
                    }
                    Err(e) => {
                        tracing::warn!(%id, cell_index, error = %e, "ignoring remote move");
                        Vec::new()
                    }
                }
            }

            WireMessage::Reset => {
                let snapshot = self.engine.reset(Mark::X);
                vec![Effect::Notify(Notice::SnapshotUpdated(snapshot))]
            }

            WireMessage::Chat {
                message,
                username,
                timestamp,
            } => {
                let line = ChatMessage::new(Origin::Peer, username, message, timestamp);
                self.chat.append(line.clone());
                vec![Effect::Notify(Notice::ChatAppended(line))]
            }
        }
    }
}
