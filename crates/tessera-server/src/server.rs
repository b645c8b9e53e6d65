//! WebSocket server and connection handling.
//!
//! Each connection owns one game session. Sessions are single-threaded, so
//! connections run as local tasks on the server's `LocalSet`.

use crate::protocol::{ClientMessage, ServerMessage, SessionInfo};
use crate::session::HostedSession;
use dashmap::DashMap;
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tessera_core::SessionConfig;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Server state shared across all connections.
pub struct ServerState {
    /// Summary of every live session
    pub sessions: DashMap<Uuid, SessionInfo>,
    /// Mapping from session ID to its client's message sender
    pub senders: DashMap<Uuid, mpsc::UnboundedSender<ServerMessage>>,
    /// Config applied to new sessions
    pub config: SessionConfig,
}

impl ServerState {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            sessions: DashMap::new(),
            senders: DashMap::new(),
            config,
        }
    }

    /// Send a message to a session's client.
    pub fn send_to_session(&self, session_id: Uuid, msg: ServerMessage) {
        if let Some(sender) = self.senders.get(&session_id) {
            let _ = sender.send(msg);
        }
    }

    /// Get list of live sessions.
    pub fn list_sessions(&self) -> Vec<SessionInfo> {
        self.sessions.iter().map(|s| s.value().clone()).collect()
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

/// Run the WebSocket server. Must be polled inside a `LocalSet`.
pub async fn run_server(addr: SocketAddr, state: Arc<ServerState>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Tessera server listening on {}", addr);

    while let Ok((stream, peer_addr)) = listener.accept().await {
        let state = Arc::clone(&state);
        tokio::task::spawn_local(async move {
            if let Err(e) = handle_connection(stream, peer_addr, state).await {
                error!("Connection error from {}: {}", peer_addr, e);
            }
        });
    }

    Ok(())
}

/// Handle a single WebSocket connection.
async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    state: Arc<ServerState>,
) -> anyhow::Result<()> {
    let ws_stream = accept_async(stream).await?;
    info!("New WebSocket connection from {}", addr);

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    let session_id = Uuid::new_v4();
    let mut session = HostedSession::new(session_id, state.config)?;

    // Create channel for outgoing messages
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();
    state.senders.insert(session_id, tx);
    state.sessions.insert(session_id, session.to_info());

    for msg in session.welcome() {
        state.send_to_session(session_id, msg);
    }

    // Spawn task to forward messages from channel to WebSocket
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Ok(text) = serde_json::to_string(&msg) {
                if ws_sender.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
            }
        }
    });

    // Handle incoming messages
    while let Some(msg) = ws_receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                if let Ok(client_msg) = serde_json::from_str::<ClientMessage>(&text) {
                    handle_message(&mut session, client_msg, &state);
                } else {
                    warn!("Invalid message from {}: {}", session_id, text);
                    state.send_to_session(
                        session_id,
                        ServerMessage::Error {
                            message: "Invalid message".to_string(),
                        },
                    );
                }
            }
            Ok(Message::Close(_)) => {
                info!("Client {} closing connection", session_id);
                break;
            }
            Ok(Message::Ping(_)) => {
                state.send_to_session(session_id, ServerMessage::Pong);
            }
            Err(e) => {
                error!("WebSocket error from {}: {}", session_id, e);
                break;
            }
            _ => {}
        }
    }

    // Clean up on disconnect
    session.close();
    state.sessions.remove(&session_id);
    state.senders.remove(&session_id);
    send_task.abort();

    info!("Connection closed for {}", session_id);
    Ok(())
}

/// Handle a client message.
fn handle_message(session: &mut HostedSession, msg: ClientMessage, state: &ServerState) {
    let session_id = session.id;
    match msg {
        ClientMessage::ListSessions => {
            let sessions = state.list_sessions();
            state.send_to_session(session_id, ServerMessage::SessionList { sessions });
        }

        ClientMessage::Ping => {
            state.send_to_session(session_id, ServerMessage::Pong);
        }

        msg => match session.handle(msg) {
            Ok(replies) => {
                debug!(session = %session_id, replies = replies.len(), "handled message");
                for reply in replies {
                    state.send_to_session(session_id, reply);
                }
                state.sessions.insert(session_id, session.to_info());
            }
            Err(e) => {
                state.send_to_session(
                    session_id,
                    ServerMessage::Error {
                        message: e.to_string(),
                    },
                );
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_reach_session_sender() {
        let state = ServerState::default();
        let mut session = HostedSession::new(Uuid::new_v4(), state.config).unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        state.senders.insert(session.id, tx);
        state.sessions.insert(session.id, session.to_info());

        handle_message(&mut session, ClientMessage::Ping, &state);
        assert!(matches!(rx.try_recv(), Ok(ServerMessage::Pong)));

        handle_message(&mut session, ClientMessage::ListSessions, &state);
        match rx.try_recv() {
            Ok(ServerMessage::SessionList { sessions }) => assert_eq!(sessions.len(), 1),
            other => panic!("expected session list, got {:?}", other),
        }
    }

    #[test]
    fn test_registry_tracks_placements() {
        let state = ServerState::default();
        let mut session = HostedSession::new(Uuid::new_v4(), state.config).unwrap();
        let (tx, _rx) = mpsc::unbounded_channel();
        state.senders.insert(session.id, tx);

        handle_message(&mut session, ClientMessage::PlaceTile { q: 1, r: 0 }, &state);
        let tiles = state.sessions.get(&session.id).map(|info| info.tiles);
        assert_eq!(tiles, Some(2));
    }

    #[test]
    fn test_errors_are_reported() {
        let state = ServerState::default();
        let mut session = HostedSession::new(Uuid::new_v4(), state.config).unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        state.senders.insert(session.id, tx);

        handle_message(
            &mut session,
            ClientMessage::EnterMode {
                mode: "Nowhere".to_string(),
            },
            &state,
        );
        assert!(matches!(rx.try_recv(), Ok(ServerMessage::Error { .. })));
    }
}
