//! The session state machine: connection lifecycle for one peer.
//!
//! ```text
//!          start_hosting                 ChannelOpened
//!   Idle ────────────────→ Hosting ─────────────────────→ Connected
//!    │ ▲                     │  ▲                            │
//!    │ │  cancel / endpoint  │  └─ pre-open close/error      │
//!    │ └──── failure ────────┘     (stays Hosting)           │
//!    │ ▲                                                     │
//!    │ └──── cancel / close / error after open ──────────────┘
//!    │ ▲
//!    │ └──── cancel / pre-open close/error ──┐
//!    │ start_joining                         │
//!    └──────────────→ Joining ───────────────┘──(ChannelOpened)──→ Connected
//! ```
//!
//! A host tolerates a bad connection attempt and keeps listening; a
//! joiner's one outbound attempt failing ends the session.
//!
//! Starting a new session always tears down whatever the previous one
//! left behind first.

use std::fmt;

use duelgrid_engine::{Engine, GameSnapshot, Mark};
use duelgrid_protocol::WireMessage;
use duelgrid_transport::ConnectionId;
use serde::{Deserialize, Serialize};

use crate::{
    ChatLog, ChatMessage, Effect, Notice, SessionConfig, SessionError,
    SessionEvent,
};

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// Lifecycle state of the local peer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
pub enum SessionState {
    /// No session. A new one can always be started from here.
    #[default]
    Idle,
    /// Listening endpoint requested or open; waiting for a peer.
    Hosting,
    /// Outbound connection attempt in flight.
    Joining,
    /// Channel open; the game is live.
    Connected,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Hosting => write!(f, "Hosting"),
            Self::Joining => write!(f, "Joining"),
            Self::Connected => write!(f, "Connected"),
        }
    }
}

/// A snapshot of session metadata (not the game itself).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub state: SessionState,
    pub username: Option<String>,
    pub local_mark: Option<Mark>,
    pub opponent: Option<String>,
    /// The hosting endpoint's shareable identifier, once it is open.
    pub endpoint_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One peer's session: lifecycle, game engine, and chat log.
///
/// Not thread-safe by itself; the runtime owns it from a single task and
/// feeds it one event at a time.
#[derive(Debug)]
pub struct Session {
    pub(crate) state: SessionState,
    pub(crate) username: Option<String>,
    pub(crate) local_mark: Option<Mark>,
    pub(crate) opponent: Option<String>,
    pub(crate) endpoint_id: Option<String>,
    /// An endpoint was requested and not yet torn down.
    pub(crate) listening: bool,
    /// The one channel this session cares about; events for any other id
    /// are stale.
    pub(crate) active: Option<ConnectionId>,
    pub(crate) channel_open: bool,
    pub(crate) engine: Engine,
    pub(crate) chat: ChatLog,
}

impl Session {
    /// An idle session with a default 3×3 game.
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            username: None,
            local_mark: None,
            opponent: None,
            endpoint_id: None,
            listening: false,
            active: None,
            channel_open: false,
            engine: Engine::default(),
            chat: ChatLog::new(),
        }
    }

    // -- Accessors ---------------------------------------------------------

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn local_mark(&self) -> Option<Mark> {
        self.local_mark
    }

    pub fn opponent(&self) -> Option<&str> {
        self.opponent.as_deref()
    }

    pub fn endpoint_id(&self) -> Option<&str> {
        self.endpoint_id.as_deref()
    }

    /// The channel currently owned by this session, open or not.
    pub fn active_connection(&self) -> Option<ConnectionId> {
        self.active
    }

    /// A copy of the engine's current snapshot.
    pub fn snapshot(&self) -> GameSnapshot {
        self.engine.snapshot()
    }

    /// Read-only access to the engine for inspection calls.
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn chat(&self) -> &[ChatMessage] {
        self.chat.messages()
    }

    pub fn info(&self) -> SessionInfo {
        SessionInfo {
            state: self.state,
            username: self.username.clone(),
            local_mark: self.local_mark,
            opponent: self.opponent.clone(),
            endpoint_id: self.endpoint_id.clone(),
        }
    }

    /// The open channel, if the session is Connected.
    pub(crate) fn open_channel(&self) -> Option<ConnectionId> {
        match self.state {
            SessionState::Connected if self.channel_open => self.active,
            _ => None,
        }
    }

    // -- Local intents -----------------------------------------------------

    /// Idle → Hosting. Requests a listening endpoint.
    ///
    /// # Errors
    /// - [`SessionError::EmptyUsername`]: `username` is blank
    /// - [`SessionError::Engine`]: `config.board_size` is invalid
    pub fn start_hosting(
        &mut self,
        username: &str,
        config: &SessionConfig,
    ) -> Result<Vec<Effect>, SessionError> {
        let username = validate_username(username)?;
        let engine = Engine::new(config.board_size)?;

        let mut effects = self.go_idle();
        self.begin(username, engine);
        self.listening = true;
        self.state = SessionState::Hosting;

        tracing::info!(bind_addr = %config.bind_addr, "hosting session");
        effects.push(Effect::OpenEndpoint {
            bind_addr: config.bind_addr.clone(),
        });
        effects.push(Effect::Notify(Notice::StateChanged(self.state)));
        effects.push(Effect::Notify(Notice::SnapshotUpdated(self.snapshot())));
        Ok(effects)
    }

    /// Idle → Joining. Dials `remote`.
    ///
    /// # Errors
    /// - [`SessionError::EmptyUsername`]: `username` is blank
    /// - [`SessionError::EmptyPeerId`]: `remote` is blank
    /// - [`SessionError::Engine`]: `config.board_size` is invalid
    pub fn start_joining(
        &mut self,
        username: &str,
        remote: &str,
        config: &SessionConfig,
    ) -> Result<Vec<Effect>, SessionError> {
        let username = validate_username(username)?;
        let remote = remote.trim();
        if remote.is_empty() {
            return Err(SessionError::EmptyPeerId);
        }
        let engine = Engine::new(config.board_size)?;

        let mut effects = self.go_idle();
        self.begin(username, engine);
        let id = ConnectionId::next();
        self.active = Some(id);
        self.state = SessionState::Joining;

        tracing::info!(%id, remote, "joining session");
        effects.push(Effect::Connect {
            id,
            remote: remote.to_string(),
        });
        effects.push(Effect::Notify(Notice::StateChanged(self.state)));
        effects.push(Effect::Notify(Notice::SnapshotUpdated(self.snapshot())));
        Ok(effects)
    }

    /// Any → Idle, tearing down every resource the session holds.
    pub fn cancel(&mut self) -> Vec<Effect> {
        if self.state != SessionState::Idle {
            tracing::info!(state = %self.state, "session cancelled");
        }
        self.go_idle()
    }

    // -- Transport events --------------------------------------------------

    /// Applies one transport event. Each call runs to completion before
    /// the next one is fed in.
    pub fn handle(&mut self, event: SessionEvent) -> Vec<Effect> {
        match event {
            SessionEvent::EndpointOpened { id } => self.on_endpoint_opened(id),
            SessionEvent::EndpointFailed { reason } => {
                self.on_endpoint_failed(reason)
            }
            SessionEvent::IncomingConnection(id) => self.on_incoming(id),
            SessionEvent::ChannelOpened(id) => self.on_channel_opened(id),
            SessionEvent::ChannelMessage(id, message) => {
                if !self.is_open_channel(id) {
                    tracing::debug!(%id, kind = message.kind(), "message on stale channel");
                    return Vec::new();
                }
                self.dispatch(id, message)
            }
            SessionEvent::ChannelClosed(id) => {
                self.on_channel_down(id, "peer closed the connection".into())
            }
            SessionEvent::ChannelFailed(id, reason) => {
                self.on_channel_down(id, reason)
            }
        }
    }

    fn on_endpoint_opened(&mut self, id: String) -> Vec<Effect> {
        if !self.listening {
            tracing::debug!(endpoint = %id, "endpoint opened after teardown");
            return Vec::new();
        }
        tracing::info!(endpoint = %id, "endpoint ready");
        self.endpoint_id = Some(id.clone());
        vec![Effect::Notify(Notice::EndpointReady { id })]
    }

    fn on_endpoint_failed(&mut self, reason: String) -> Vec<Effect> {
        if !self.listening {
            return Vec::new();
        }
        if self.channel_open {
            // The data channel carries the game; losing the listener only
            // means no further peers can dial in.
            tracing::warn!(%reason, "endpoint failed while connected");
            self.listening = false;
            self.endpoint_id = None;
            return vec![Effect::CloseEndpoint];
        }
        tracing::warn!(%reason, "endpoint failed");
        let mut effects = self.go_idle();
        effects.push(Effect::Notify(Notice::ConnectionFailed { reason }));
        effects
    }

    fn on_incoming(&mut self, id: ConnectionId) -> Vec<Effect> {
        if self.state == SessionState::Hosting && self.active.is_none() {
            tracing::info!(%id, "peer connecting");
            self.active = Some(id);
            return Vec::new();
        }
        tracing::info!(%id, state = %self.state, "rejecting extra connection");
        vec![Effect::CloseChannel(id)]
    }

    fn on_channel_opened(&mut self, id: ConnectionId) -> Vec<Effect> {
        if self.active != Some(id) || self.channel_open {
            tracing::debug!(%id, "open event for stale channel");
            return Vec::new();
        }
        let mark = match self.state {
            SessionState::Hosting => Mark::X,
            SessionState::Joining => Mark::O,
            SessionState::Idle | SessionState::Connected => return Vec::new(),
        };
        let was_joining = self.state == SessionState::Joining;

        self.channel_open = true;
        self.local_mark = Some(mark);
        self.state = SessionState::Connected;
        tracing::info!(%id, %mark, "channel open");

        let mut effects = vec![
            Effect::Notify(Notice::StateChanged(self.state)),
            Effect::Notify(Notice::Connected { mark }),
        ];
        if was_joining {
            effects.push(Effect::Send {
                id,
                message: WireMessage::Join {
                    username: self.username.clone().unwrap_or_default(),
                },
            });
        }
        effects
    }

    fn on_channel_down(
        &mut self,
        id: ConnectionId,
        reason: String,
    ) -> Vec<Effect> {
        if self.active != Some(id) {
            tracing::debug!(%id, "close event for stale channel");
            return Vec::new();
        }

        if self.channel_open {
            tracing::info!(%id, %reason, "peer disconnected");
            let mut effects = self.go_idle();
            effects.push(Effect::Notify(Notice::Disconnected { reason }));
            return effects;
        }

        match self.state {
            SessionState::Hosting => {
                // Keep listening so a different peer can still connect.
                tracing::info!(%id, %reason, "inbound attempt failed, still hosting");
                self.active = None;
                vec![
                    Effect::CloseChannel(id),
                    Effect::Notify(Notice::ConnectionFailed { reason }),
                ]
            }
            _ => {
                tracing::info!(%id, %reason, "connection attempt failed");
                let mut effects = self.go_idle();
                effects.push(Effect::Notify(Notice::ConnectionFailed { reason }));
                effects
            }
        }
    }

    // -- Helpers -----------------------------------------------------------

    fn is_open_channel(&self, id: ConnectionId) -> bool {
        self.channel_open && self.active == Some(id)
    }

    /// Fresh per-session state. Resources must already be released.
    fn begin(&mut self, username: String, engine: Engine) {
        self.username = Some(username);
        self.engine = engine;
        self.chat.clear();
    }

    /// Releases every resource and clears per-session state. Emits a state
    /// change only if the session wasn't already Idle.
    fn go_idle(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if let Some(id) = self.active.take() {
            effects.push(Effect::CloseChannel(id));
        }
        if std::mem::take(&mut self.listening) {
            effects.push(Effect::CloseEndpoint);
        }
        self.channel_open = false;
        self.local_mark = None;
        self.opponent = None;
        self.endpoint_id = None;
        self.username = None;
        self.chat.clear();

        if self.state != SessionState::Idle {
            self.state = SessionState::Idle;
            effects.push(Effect::Notify(Notice::StateChanged(self.state)));
        }
        effects
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_username(username: &str) -> Result<String, SessionError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(SessionError::EmptyUsername);
    }
    Ok(username.to_string())
}

#[cfg(test)]
mod tests {
    //! Unit tests for lifecycle transitions. Message dispatch is covered in
    //! `sync.rs`; two sessions talking to each other in `tests/`.

    use super::*;

    fn config() -> SessionConfig {
        SessionConfig::default()
    }

    fn hosting() -> Session {
        let mut s = Session::new();
        s.start_hosting("Al", &config()).unwrap();
        s
    }

    /// Returns a joining session and the id of its outbound channel.
    fn joining() -> (Session, ConnectionId) {
        let mut s = Session::new();
        s.start_joining("Bo", "127.0.0.1:9000", &config()).unwrap();
        let id = s.active_connection().unwrap();
        (s, id)
    }

    fn has_notice(effects: &[Effect], pred: impl Fn(&Notice) -> bool) -> bool {
        effects
            .iter()
            .any(|e| matches!(e, Effect::Notify(n) if pred(n)))
    }

    // =====================================================================
    // start_hosting()
    // =====================================================================

    #[test]
    fn test_start_hosting_empty_username_stays_idle() {
        let mut s = Session::new();

        let result = s.start_hosting("   ", &config());

        assert_eq!(result, Err(SessionError::EmptyUsername));
        assert_eq!(s.state(), SessionState::Idle);
    }

    #[test]
    fn test_start_hosting_enters_hosting_and_opens_endpoint() {
        let mut s = Session::new();

        let effects = s.start_hosting("Al", &config()).unwrap();

        assert_eq!(s.state(), SessionState::Hosting);
        assert!(effects.contains(&Effect::OpenEndpoint {
            bind_addr: "127.0.0.1:0".into()
        }));
        assert!(has_notice(&effects, |n| *n == Notice::StateChanged(SessionState::Hosting)));
    }

    #[test]
    fn test_start_hosting_invalid_board_size_stays_idle() {
        let mut s = Session::new();
        let cfg = SessionConfig {
            board_size: 2,
            ..config()
        };

        let result = s.start_hosting("Al", &cfg);

        assert!(matches!(result, Err(SessionError::Engine(_))));
        assert_eq!(s.state(), SessionState::Idle);
    }

    #[test]
    fn test_start_hosting_uses_configured_board_size() {
        let mut s = Session::new();
        let cfg = SessionConfig {
            board_size: 5,
            ..config()
        };
        s.start_hosting("Al", &cfg).unwrap();
        assert_eq!(s.snapshot().board.len(), 25);
    }

    #[test]
    fn test_endpoint_opened_publishes_id() {
        let mut s = hosting();

        let effects = s.handle(SessionEvent::EndpointOpened {
            id: "127.0.0.1:4000".into(),
        });

        assert_eq!(s.endpoint_id(), Some("127.0.0.1:4000"));
        assert_eq!(
            effects,
            vec![Effect::Notify(Notice::EndpointReady {
                id: "127.0.0.1:4000".into()
            })]
        );
    }

    #[test]
    fn test_endpoint_failed_while_hosting_returns_to_idle() {
        let mut s = hosting();

        let effects = s.handle(SessionEvent::EndpointFailed {
            reason: "address in use".into(),
        });

        assert_eq!(s.state(), SessionState::Idle);
        assert!(effects.contains(&Effect::CloseEndpoint));
        assert!(has_notice(&effects, |n| matches!(n, Notice::ConnectionFailed { .. })));
    }

    #[test]
    fn test_endpoint_failed_while_connected_keeps_game() {
        let mut s = hosting();
        s.handle(SessionEvent::EndpointOpened { id: "h:1".into() });
        let id = ConnectionId::next();
        s.handle(SessionEvent::IncomingConnection(id));
        s.handle(SessionEvent::ChannelOpened(id));

        let effects = s.handle(SessionEvent::EndpointFailed {
            reason: "listener died".into(),
        });

        assert_eq!(effects, vec![Effect::CloseEndpoint]);
        assert_eq!(s.state(), SessionState::Connected);
        assert_eq!(s.endpoint_id(), None);
        assert_eq!(s.active_connection(), Some(id));
        assert_eq!(s.local_mark(), Some(Mark::X));

        // The listener is already gone; a later disconnect doesn't close it twice.
        let effects = s.handle(SessionEvent::ChannelClosed(id));
        assert!(!effects.contains(&Effect::CloseEndpoint));
        assert_eq!(s.state(), SessionState::Idle);
    }

    // =====================================================================
    // start_joining()
    // =====================================================================

    #[test]
    fn test_start_joining_empty_peer_id_stays_idle() {
        let mut s = Session::new();

        let result = s.start_joining("Bo", "  ", &config());

        assert_eq!(result, Err(SessionError::EmptyPeerId));
        assert_eq!(s.state(), SessionState::Idle);
        assert!(s.active_connection().is_none());
    }

    #[test]
    fn test_start_joining_empty_username_stays_idle() {
        let mut s = Session::new();
        let result = s.start_joining("", "127.0.0.1:1", &config());
        assert_eq!(result, Err(SessionError::EmptyUsername));
    }

    #[test]
    fn test_start_joining_dials_remote() {
        let mut s = Session::new();

        let effects = s.start_joining("Bo", " 10.0.0.2:7000 ", &config()).unwrap();

        assert_eq!(s.state(), SessionState::Joining);
        let id = s.active_connection().unwrap();
        assert!(effects.contains(&Effect::Connect {
            id,
            remote: "10.0.0.2:7000".into()
        }));
    }

    // =====================================================================
    // ChannelOpened
    // =====================================================================

    #[test]
    fn test_host_channel_open_binds_x() {
        let mut s = hosting();
        let id = ConnectionId::next();
        s.handle(SessionEvent::IncomingConnection(id));

        let effects = s.handle(SessionEvent::ChannelOpened(id));

        assert_eq!(s.state(), SessionState::Connected);
        assert_eq!(s.local_mark(), Some(Mark::X));
        assert_eq!(s.opponent(), None);
        assert!(has_notice(&effects, |n| *n == Notice::Connected { mark: Mark::X }));
        assert!(!effects.iter().any(|e| matches!(e, Effect::Send { .. })));
    }

    #[test]
    fn test_joiner_channel_open_binds_o_and_sends_join() {
        let (mut s, id) = joining();

        let effects = s.handle(SessionEvent::ChannelOpened(id));

        assert_eq!(s.state(), SessionState::Connected);
        assert_eq!(s.local_mark(), Some(Mark::O));
        assert!(effects.contains(&Effect::Send {
            id,
            message: WireMessage::Join {
                username: "Bo".into()
            }
        }));
    }

    #[test]
    fn test_channel_open_for_unknown_id_is_ignored() {
        let mut s = hosting();

        let effects = s.handle(SessionEvent::ChannelOpened(ConnectionId::next()));

        assert!(effects.is_empty());
        assert_eq!(s.state(), SessionState::Hosting);
    }

    // =====================================================================
    // Second inbound connection
    // =====================================================================

    #[test]
    fn test_second_incoming_while_pending_is_rejected() {
        let mut s = hosting();
        let first = ConnectionId::next();
        let second = ConnectionId::next();
        s.handle(SessionEvent::IncomingConnection(first));

        let effects = s.handle(SessionEvent::IncomingConnection(second));

        assert_eq!(effects, vec![Effect::CloseChannel(second)]);
        assert_eq!(s.active_connection(), Some(first));
    }

    #[test]
    fn test_incoming_while_connected_is_rejected() {
        let mut s = hosting();
        let first = ConnectionId::next();
        s.handle(SessionEvent::IncomingConnection(first));
        s.handle(SessionEvent::ChannelOpened(first));
        let intruder = ConnectionId::next();

        let effects = s.handle(SessionEvent::IncomingConnection(intruder));

        assert_eq!(effects, vec![Effect::CloseChannel(intruder)]);
        assert_eq!(s.state(), SessionState::Connected);
        assert_eq!(s.active_connection(), Some(first));
    }

    #[test]
    fn test_rejected_channel_close_does_not_disturb_session() {
        let mut s = hosting();
        let first = ConnectionId::next();
        s.handle(SessionEvent::IncomingConnection(first));
        s.handle(SessionEvent::ChannelOpened(first));
        let intruder = ConnectionId::next();
        s.handle(SessionEvent::IncomingConnection(intruder));

        let effects = s.handle(SessionEvent::ChannelClosed(intruder));

        assert!(effects.is_empty());
        assert_eq!(s.state(), SessionState::Connected);
    }

    // =====================================================================
    // Pre-open failures
    // =====================================================================

    #[test]
    fn test_host_pre_open_failure_keeps_hosting() {
        let mut s = hosting();
        s.handle(SessionEvent::EndpointOpened { id: "h:1".into() });
        let id = ConnectionId::next();
        s.handle(SessionEvent::IncomingConnection(id));

        let effects = s.handle(SessionEvent::ChannelFailed(id, "handshake".into()));

        assert_eq!(s.state(), SessionState::Hosting);
        assert_eq!(s.endpoint_id(), Some("h:1"));
        assert!(s.active_connection().is_none());
        assert!(!effects.contains(&Effect::CloseEndpoint));
        assert!(has_notice(&effects, |n| matches!(n, Notice::ConnectionFailed { .. })));

        // A different peer can now connect.
        let next = ConnectionId::next();
        assert!(s.handle(SessionEvent::IncomingConnection(next)).is_empty());
        s.handle(SessionEvent::ChannelOpened(next));
        assert_eq!(s.state(), SessionState::Connected);
    }

    #[test]
    fn test_joiner_pre_open_failure_returns_to_idle() {
        let (mut s, id) = joining();

        let effects = s.handle(SessionEvent::ChannelFailed(id, "refused".into()));

        assert_eq!(s.state(), SessionState::Idle);
        assert!(effects.contains(&Effect::CloseChannel(id)));
        assert!(has_notice(&effects, |n| *n == Notice::ConnectionFailed {
            reason: "refused".into()
        }));
    }

    // =====================================================================
    // Post-open disconnects / cancel
    // =====================================================================

    #[test]
    fn test_host_disconnect_after_open_tears_everything_down() {
        let mut s = hosting();
        s.handle(SessionEvent::EndpointOpened { id: "h:1".into() });
        let id = ConnectionId::next();
        s.handle(SessionEvent::IncomingConnection(id));
        s.handle(SessionEvent::ChannelOpened(id));
        s.send_chat("hello").unwrap();

        let effects = s.handle(SessionEvent::ChannelClosed(id));

        assert_eq!(s.state(), SessionState::Idle);
        assert_eq!(s.local_mark(), None);
        assert_eq!(s.endpoint_id(), None);
        assert!(s.chat().is_empty());
        assert!(effects.contains(&Effect::CloseChannel(id)));
        assert!(effects.contains(&Effect::CloseEndpoint));
        assert!(has_notice(&effects, |n| matches!(n, Notice::Disconnected { .. })));
    }

    #[test]
    fn test_cancel_while_joining_aborts_dial() {
        let (mut s, id) = joining();

        let effects = s.cancel();

        assert_eq!(s.state(), SessionState::Idle);
        assert_eq!(
            effects,
            vec![
                Effect::CloseChannel(id),
                Effect::Notify(Notice::StateChanged(SessionState::Idle)),
            ]
        );
    }

    #[test]
    fn test_cancel_while_idle_is_a_no_op() {
        let mut s = Session::new();
        assert!(s.cancel().is_empty());
    }

    #[test]
    fn test_new_session_tears_down_previous_one() {
        let mut s = hosting();
        let id = ConnectionId::next();
        s.handle(SessionEvent::IncomingConnection(id));
        s.handle(SessionEvent::ChannelOpened(id));

        let effects = s.start_joining("Al", "10.0.0.9:1", &config()).unwrap();

        assert!(effects.contains(&Effect::CloseChannel(id)));
        assert!(effects.contains(&Effect::CloseEndpoint));
        assert_eq!(s.state(), SessionState::Joining);
        assert_ne!(s.active_connection(), Some(id));
    }

    #[test]
    fn test_late_events_after_cancel_are_ignored() {
        let (mut s, id) = joining();
        s.cancel();

        assert!(s.handle(SessionEvent::ChannelOpened(id)).is_empty());
        assert!(s.handle(SessionEvent::ChannelFailed(id, "x".into())).is_empty());
        assert_eq!(s.state(), SessionState::Idle);
    }

    #[test]
    fn test_session_state_display() {
        assert_eq!(SessionState::Hosting.to_string(), "Hosting");
        assert_eq!(SessionState::Connected.to_string(), "Connected");
    }
}
