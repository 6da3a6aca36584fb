//! Peer runtime: an actor task that owns one [`Session`] and its sockets.
//!
//! The session is pure: it turns intents and transport events into
//! [`Effect`]s. This module is the other half. It executes those effects
//! against real WebSocket endpoints and feeds what happens back in.
//!
//! ```text
//!  PeerHandle ──cmd──┐                         ┌──→ endpoint task (accept loop)
//!                    ▼                         ├──→ handshake / dial tasks
//!               PeerActor ── Effect ──execute──┤
//!                 ▲  │                         └──→ reader / writer per channel
//!                 │  └── Notice ──→ caller            │
//!                 └──────────── RuntimeEvent ─────────┘
//! ```
//!
//! Everything funnels into one `select!` loop, so a command or event is
//! fully handled (session transition plus effects) before the next one is
//! looked at.
//!
//! The accept loop only takes TCP streams. Each WebSocket upgrade runs in
//! its own task, and the session hears about an inbound channel once its
//! upgrade has resolved either way. A client that connects and then goes
//! quiet never holds up anyone else.

use std::collections::HashMap;
use std::sync::Arc;

use duelgrid_engine::GameSnapshot;
use duelgrid_protocol::{Codec, JsonCodec, WireMessage};
use duelgrid_session::{
    ChatMessage, Effect, Notice, Session, SessionConfig, SessionError,
    SessionEvent, SessionInfo,
};
use duelgrid_transport::{
    Connection, ConnectionId, PendingConnection, Transport, TransportError,
    WebSocketConnection, WebSocketTransport,
};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::PeerError;

/// Capacity of the command channel between handles and the actor.
const COMMAND_CHANNEL_SIZE: usize = 64;

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// Commands sent to the peer actor through its channel.
enum PeerCommand {
    Host {
        username: String,
        config: SessionConfig,
        reply: oneshot::Sender<Result<(), SessionError>>,
    },
    Join {
        username: String,
        remote: String,
        config: SessionConfig,
        reply: oneshot::Sender<Result<(), SessionError>>,
    },
    Cancel,
    Play {
        cell_index: usize,
        reply: oneshot::Sender<Result<(), SessionError>>,
    },
    Chat {
        text: String,
        reply: oneshot::Sender<Result<(), SessionError>>,
    },
    Reset,
    Info {
        reply: oneshot::Sender<SessionInfo>,
    },
    Snapshot {
        reply: oneshot::Sender<GameSnapshot>,
    },
    ChatLog {
        reply: oneshot::Sender<Vec<ChatMessage>>,
    },
    Shutdown,
}

/// Handle to a running peer actor.
///
/// Cheap to clone; every clone talks to the same actor. Once the actor
/// stops, every call returns [`PeerError::Unavailable`].
#[derive(Clone)]
pub struct PeerHandle {
    sender: mpsc::Sender<PeerCommand>,
}

impl PeerHandle {
    /// Starts hosting. The endpoint address arrives later as
    /// [`Notice::EndpointReady`].
    pub async fn host(
        &self,
        username: &str,
        config: SessionConfig,
    ) -> Result<(), PeerError> {
        let (reply, rx) = oneshot::channel();
        self.request(
            PeerCommand::Host {
                username: username.to_string(),
                config,
                reply,
            },
            rx,
        )
        .await?
        .map_err(PeerError::from)
    }

    /// Starts joining the host at `remote` (`host:port` or a `ws://` URL).
    pub async fn join(
        &self,
        username: &str,
        remote: &str,
        config: SessionConfig,
    ) -> Result<(), PeerError> {
        let (reply, rx) = oneshot::channel();
        self.request(
            PeerCommand::Join {
                username: username.to_string(),
                remote: remote.to_string(),
                config,
                reply,
            },
            rx,
        )
        .await?
        .map_err(PeerError::from)
    }

    /// Ends the current session, whatever state it is in.
    pub async fn cancel(&self) -> Result<(), PeerError> {
        self.send(PeerCommand::Cancel).await
    }

    /// Plays the local mark at `cell_index`.
    pub async fn play(&self, cell_index: usize) -> Result<(), PeerError> {
        let (reply, rx) = oneshot::channel();
        self.request(PeerCommand::Play { cell_index, reply }, rx)
            .await?
            .map_err(PeerError::from)
    }

    /// Sends a chat line to the opponent.
    pub async fn chat(&self, text: &str) -> Result<(), PeerError> {
        let (reply, rx) = oneshot::channel();
        self.request(
            PeerCommand::Chat {
                text: text.to_string(),
                reply,
            },
            rx,
        )
        .await?
        .map_err(PeerError::from)
    }

    /// Starts a new game. Propagated to the opponent when connected.
    pub async fn reset(&self) -> Result<(), PeerError> {
        self.send(PeerCommand::Reset).await
    }

    pub async fn info(&self) -> Result<SessionInfo, PeerError> {
        let (reply, rx) = oneshot::channel();
        self.request(PeerCommand::Info { reply }, rx).await
    }

    pub async fn snapshot(&self) -> Result<GameSnapshot, PeerError> {
        let (reply, rx) = oneshot::channel();
        self.request(PeerCommand::Snapshot { reply }, rx).await
    }

    /// The chat log for the current session, oldest first.
    pub async fn chat_log(&self) -> Result<Vec<ChatMessage>, PeerError> {
        let (reply, rx) = oneshot::channel();
        self.request(PeerCommand::ChatLog { reply }, rx).await
    }

    /// Tears down the session and stops the actor.
    pub async fn shutdown(&self) -> Result<(), PeerError> {
        self.send(PeerCommand::Shutdown).await
    }

    async fn send(&self, cmd: PeerCommand) -> Result<(), PeerError> {
        self.sender
            .send(cmd)
            .await
            .map_err(|_| PeerError::Unavailable)
    }

    async fn request<T>(
        &self,
        cmd: PeerCommand,
        reply: oneshot::Receiver<T>,
    ) -> Result<T, PeerError> {
        self.send(cmd).await?;
        reply.await.map_err(|_| PeerError::Unavailable)
    }
}

// ---------------------------------------------------------------------------
// Runtime events
// ---------------------------------------------------------------------------

/// Something a background task observed.
enum RuntimeEvent {
    /// The endpoint from `generation` bound successfully.
    EndpointOpened { generation: u64, id: String },
    /// The endpoint from `generation` could not bind.
    EndpointFailed { generation: u64, reason: String },
    /// The endpoint from `generation` accepted a TCP stream.
    Accepted {
        generation: u64,
        pending: PendingConnection,
    },
    /// The upgrade of an inbound stream finished.
    Upgraded {
        generation: u64,
        id: ConnectionId,
        result: Result<WebSocketConnection, TransportError>,
    },
    /// A dial for `id` finished.
    Dialed {
        id: ConnectionId,
        result: Result<WebSocketConnection, TransportError>,
    },
    Data(ConnectionId, Vec<u8>),
    Closed(ConnectionId),
    Failed(ConnectionId, String),
}

type EventSender = mpsc::UnboundedSender<RuntimeEvent>;

/// The tasks serving one attached channel.
struct ChannelTasks {
    outbox: mpsc::UnboundedSender<Vec<u8>>,
    reader: JoinHandle<()>,
}

// ---------------------------------------------------------------------------
// Actor
// ---------------------------------------------------------------------------

/// Entry point for starting a peer.
pub struct Peer;

impl Peer {
    /// Spawns the peer actor on the current Tokio runtime.
    ///
    /// Returns a handle for issuing intents and the stream of
    /// user-visible notices. Dropping every handle stops the actor.
    pub fn spawn() -> (PeerHandle, mpsc::UnboundedReceiver<Notice>) {
        let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_CHANNEL_SIZE);
        let (notice_tx, notice_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let actor = PeerActor {
            session: Session::new(),
            codec: JsonCodec,
            commands: cmd_rx,
            events: event_rx,
            event_tx,
            notices: notice_tx,
            endpoint: None,
            generation: 0,
            handshakes: HashMap::new(),
            dials: HashMap::new(),
            channels: HashMap::new(),
        };
        tokio::spawn(actor.run());

        (PeerHandle { sender: cmd_tx }, notice_rx)
    }
}

struct PeerActor {
    session: Session,
    codec: JsonCodec,
    commands: mpsc::Receiver<PeerCommand>,
    events: mpsc::UnboundedReceiver<RuntimeEvent>,
    /// Cloned into every background task.
    event_tx: EventSender,
    notices: mpsc::UnboundedSender<Notice>,
    /// The running accept loop, if any.
    endpoint: Option<JoinHandle<()>>,
    /// Bumped whenever an endpoint is opened or closed; events tagged with
    /// an older generation are from a torn-down endpoint.
    generation: u64,
    /// Inbound upgrades in flight; they belong to the current endpoint.
    handshakes: HashMap<ConnectionId, JoinHandle<()>>,
    dials: HashMap<ConnectionId, JoinHandle<()>>,
    channels: HashMap<ConnectionId, ChannelTasks>,
}

impl PeerActor {
    async fn run(mut self) {
        tracing::debug!("peer actor started");

        loop {
            tokio::select! {
                cmd = self.commands.recv() => match cmd {
                    Some(PeerCommand::Shutdown) | None => break,
                    Some(cmd) => self.handle_command(cmd),
                },
                Some(event) = self.events.recv() => self.handle_event(event),
            }
        }

        let effects = self.session.cancel();
        self.execute(effects);
        tracing::debug!("peer actor stopped");
    }

    fn handle_command(&mut self, cmd: PeerCommand) {
        match cmd {
            PeerCommand::Host {
                username,
                config,
                reply,
            } => {
                let result = self.session.start_hosting(&username, &config);
                let _ = reply.send(self.apply(result));
            }
            PeerCommand::Join {
                username,
                remote,
                config,
                reply,
            } => {
                let result =
                    self.session.start_joining(&username, &remote, &config);
                let _ = reply.send(self.apply(result));
            }
            PeerCommand::Cancel => {
                let effects = self.session.cancel();
                self.execute(effects);
            }
            PeerCommand::Play { cell_index, reply } => {
                let result = self.session.play_cell(cell_index);
                let _ = reply.send(self.apply(result));
            }
            PeerCommand::Chat { text, reply } => {
                let result = self.session.send_chat(&text);
                let _ = reply.send(self.apply(result));
            }
            PeerCommand::Reset => {
                let effects = self.session.reset();
                self.execute(effects);
            }
            PeerCommand::Info { reply } => {
                let _ = reply.send(self.session.info());
            }
            PeerCommand::Snapshot { reply } => {
                let _ = reply.send(self.session.snapshot());
            }
            PeerCommand::ChatLog { reply } => {
                let _ = reply.send(self.session.chat().to_vec());
            }
            // Handled by the run loop.
            PeerCommand::Shutdown => {}
        }
    }

    /// Executes the effects of a successful intent and passes the outcome
    /// back for the reply.
    fn apply(
        &mut self,
        result: Result<Vec<Effect>, SessionError>,
    ) -> Result<(), SessionError> {
        let effects = result?;
        self.execute(effects);
        Ok(())
    }

    fn feed(&mut self, event: SessionEvent) {
        let effects = self.session.handle(event);
        self.execute(effects);
    }

    fn handle_event(&mut self, event: RuntimeEvent) {
        match event {
            RuntimeEvent::EndpointOpened { generation, id } => {
                if generation == self.generation {
                    self.feed(SessionEvent::EndpointOpened { id });
                }
            }
            RuntimeEvent::EndpointFailed { generation, reason } => {
                if generation == self.generation {
                    self.endpoint = None;
                    self.feed(SessionEvent::EndpointFailed { reason });
                }
            }
            RuntimeEvent::Accepted {
                generation,
                pending,
            } => {
                if generation != self.generation {
                    tracing::debug!(id = %pending.id(), "stream from old endpoint");
                    return;
                }
                self.upgrade(generation, pending);
            }
            RuntimeEvent::Upgraded {
                generation,
                id,
                result,
            } => {
                self.handshakes.remove(&id);
                if generation != self.generation {
                    tracing::debug!(%id, "upgrade for old endpoint");
                    if let Ok(conn) = result {
                        discard(conn);
                    }
                    return;
                }
                match result {
                    Ok(conn) => {
                        // Attach first so a rejection's CloseChannel finds it.
                        self.attach(conn);
                        self.feed(SessionEvent::IncomingConnection(id));
                        if self.session.active_connection() == Some(id) {
                            self.feed(SessionEvent::ChannelOpened(id));
                        }
                    }
                    Err(e) => {
                        tracing::debug!(%id, error = %e, "inbound upgrade failed");
                        self.feed(SessionEvent::IncomingConnection(id));
                        if self.session.active_connection() == Some(id) {
                            self.feed(SessionEvent::ChannelFailed(id, e.to_string()));
                        }
                    }
                }
            }
            RuntimeEvent::Dialed { id, result } => {
                self.dials.remove(&id);
                if self.session.active_connection() != Some(id) {
                    if let Ok(conn) = result {
                        discard(conn);
                    }
                    return;
                }
                match result {
                    Ok(conn) => {
                        self.attach(conn);
                        self.feed(SessionEvent::ChannelOpened(id));
                    }
                    Err(e) => {
                        self.feed(SessionEvent::ChannelFailed(id, e.to_string()));
                    }
                }
            }
            RuntimeEvent::Data(id, data) => {
                let message: WireMessage = match self.codec.decode(&data) {
                    Ok(msg) => msg,
                    Err(e) => {
                        tracing::debug!(%id, error = %e, "dropping undecodable frame");
                        return;
                    }
                };
                self.feed(SessionEvent::ChannelMessage(id, message));
            }
            RuntimeEvent::Closed(id) => {
                self.detach(id);
                self.feed(SessionEvent::ChannelClosed(id));
            }
            RuntimeEvent::Failed(id, reason) => {
                self.detach(id);
                self.feed(SessionEvent::ChannelFailed(id, reason));
            }
        }
    }

    // -- Effects -----------------------------------------------------------

    fn execute(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::OpenEndpoint { bind_addr } => self.open_endpoint(bind_addr),
                Effect::Connect { id, remote } => self.dial(id, remote),
                Effect::Send { id, message } => self.send(id, &message),
                Effect::CloseChannel(id) => {
                    if let Some(dial) = self.dials.remove(&id) {
                        tracing::debug!(%id, "aborting dial");
                        dial.abort();
                    }
                    self.detach(id);
                }
                Effect::CloseEndpoint => self.close_endpoint(),
                Effect::Notify(notice) => {
                    let _ = self.notices.send(notice);
                }
            }
        }
    }

    fn open_endpoint(&mut self, bind_addr: String) {
        self.close_endpoint();
        let generation = self.generation;
        let events = self.event_tx.clone();
        self.endpoint = Some(tokio::spawn(run_endpoint(
            generation, bind_addr, events,
        )));
    }

    fn close_endpoint(&mut self) {
        self.generation += 1;
        if let Some(endpoint) = self.endpoint.take() {
            tracing::debug!("closing endpoint");
            endpoint.abort();
        }
        for (id, handshake) in self.handshakes.drain() {
            tracing::debug!(%id, "aborting upgrade");
            handshake.abort();
        }
    }

    /// Runs the WebSocket upgrade for an accepted stream off the actor.
    fn upgrade(&mut self, generation: u64, pending: PendingConnection) {
        let id = pending.id();
        let events = self.event_tx.clone();
        let task = tokio::spawn(async move {
            let result = pending.handshake().await;
            let _ = events.send(RuntimeEvent::Upgraded {
                generation,
                id,
                result,
            });
        });
        self.handshakes.insert(id, task);
    }

    fn dial(&mut self, id: ConnectionId, remote: String) {
        let events = self.event_tx.clone();
        let task = tokio::spawn(async move {
            let result = WebSocketTransport::connect(&remote, id).await;
            let _ = events.send(RuntimeEvent::Dialed { id, result });
        });
        self.dials.insert(id, task);
    }

    fn send(&self, id: ConnectionId, message: &WireMessage) {
        let Some(channel) = self.channels.get(&id) else {
            tracing::debug!(%id, kind = message.kind(), "send on detached channel");
            return;
        };
        match self.codec.encode(message) {
            Ok(bytes) => {
                let _ = channel.outbox.send(bytes);
            }
            Err(e) => {
                tracing::warn!(%id, error = %e, "failed to encode message");
            }
        }
    }

    /// Starts the reader and writer tasks for `conn`.
    fn attach(&mut self, conn: WebSocketConnection) {
        let id = conn.id();
        let conn = Arc::new(conn);
        let (outbox, rx) = mpsc::unbounded_channel();

        let reader = tokio::spawn(run_reader(
            Arc::clone(&conn),
            self.event_tx.clone(),
        ));
        tokio::spawn(run_writer(conn, rx, self.event_tx.clone()));

        self.channels.insert(id, ChannelTasks { outbox, reader });
    }

    /// Stops reading from `id`. Dropping the outbox lets the writer flush
    /// what is queued, then close the connection.
    fn detach(&mut self, id: ConnectionId) {
        if let Some(channel) = self.channels.remove(&id) {
            tracing::debug!(%id, "detaching channel");
            channel.reader.abort();
        }
    }
}

// ---------------------------------------------------------------------------
// Background tasks
// ---------------------------------------------------------------------------

/// Binds the listener and forwards accepted TCP streams until aborted.
async fn run_endpoint(generation: u64, bind_addr: String, events: EventSender) {
    let mut transport = match WebSocketTransport::bind(&bind_addr).await {
        Ok(t) => t,
        Err(e) => {
            let _ = events.send(RuntimeEvent::EndpointFailed {
                generation,
                reason: e.to_string(),
            });
            return;
        }
    };
    let _ = events.send(RuntimeEvent::EndpointOpened {
        generation,
        id: transport.local_id(),
    });

    loop {
        match transport.accept_pending().await {
            Ok(pending) => {
                if events
                    .send(RuntimeEvent::Accepted {
                        generation,
                        pending,
                    })
                    .is_err()
                {
                    break;
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "accept failed");
            }
        }
    }
}

async fn run_reader(conn: Arc<WebSocketConnection>, events: EventSender) {
    let id = conn.id();
    loop {
        match conn.recv().await {
            Ok(Some(data)) => {
                if events.send(RuntimeEvent::Data(id, data)).is_err() {
                    break;
                }
            }
            Ok(None) => {
                let _ = events.send(RuntimeEvent::Closed(id));
                break;
            }
            Err(e) => {
                let _ = events.send(RuntimeEvent::Failed(id, e.to_string()));
                break;
            }
        }
    }
}

/// Drains the outbox in order, then closes the connection.
async fn run_writer(
    conn: Arc<WebSocketConnection>,
    mut outbox: mpsc::UnboundedReceiver<Vec<u8>>,
    events: EventSender,
) {
    let id = conn.id();
    while let Some(bytes) = outbox.recv().await {
        if let Err(e) = conn.send(&bytes).await {
            let _ = events.send(RuntimeEvent::Failed(id, e.to_string()));
            break;
        }
    }
    if let Err(e) = conn.close().await {
        tracing::debug!(%id, error = %e, "close failed");
    }
}

/// Closes a connection nobody is going to use.
fn discard(conn: WebSocketConnection) {
    tokio::spawn(async move {
        let _ = conn.close().await;
    });
}
