//! WebSocket protocol messages for Tessera sessions.

use serde::{Deserialize, Serialize};
use tessera_core::{GameMode, HexCoord, SessionConfig};
use uuid::Uuid;

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ClientMessage {
    /// One frame of pointer input, in board-plane coordinates
    Pointer {
        touch: bool,
        alt_touch: bool,
        x: f64,
        y: f64,
    },

    /// Advance the session by one frame
    Update { delta_time: f64 },

    /// Switch game mode by name
    EnterMode { mode: String },

    /// Place a tile directly
    PlaceTile { q: i32, r: i32 },

    /// Ask whether a cell holds a tile
    QueryTile { q: i32, r: i32 },

    /// Report where the client's camera currently is
    SetCamera { x: f64, y: f64 },

    /// Request the list of live sessions
    ListSessions,

    /// Ping for keepalive
    Ping,
}

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ServerMessage {
    /// Session created for this connection
    Welcome {
        session_id: Uuid,
        config: SessionConfig,
    },

    /// Cells that became active, in activation order
    CellsActivated { cells: Vec<HexCoord> },

    /// Whether a cell holds a tile
    TileState { q: i32, r: i32, placed: bool },

    /// Game mode changed
    ModeChanged { mode: Option<GameMode> },

    /// New camera target
    Camera { x: f64, y: f64 },

    /// Camera bounds changed
    BoundsChanged {
        center: (f64, f64),
        size: (f64, f64),
    },

    /// Live sessions
    SessionList { sessions: Vec<SessionInfo> },

    /// Error occurred
    Error { message: String },

    /// Pong response
    Pong,
}

/// Session summary for clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub id: Uuid,
    pub tiles: usize,
    pub active_cells: usize,
    pub mode: Option<GameMode>,
}
