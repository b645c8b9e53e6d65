//! Per-connection game session hosting.

use tessera_core::modes::UnknownMode;
use tessera_core::{
    Bounds, ConfigError, GameMode, GameSession, HexCoord, PlanePicker, PointerSample,
    SessionConfig,
};
use thiserror::Error;
use uuid::Uuid;

use crate::protocol::{ClientMessage, ServerMessage, SessionInfo};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    UnknownMode(#[from] UnknownMode),

    #[error("Invalid delta time: {0}")]
    InvalidDeltaTime(f64),

    #[error("Message not handled by a session")]
    NotSessionMessage,
}

/// A game session driven by one client.
///
/// Remembers what the client last saw so replies only carry changes.
pub struct HostedSession {
    pub id: Uuid,
    session: GameSession,
    seen_mode: Option<GameMode>,
    seen_camera: (f64, f64),
    seen_bounds: Bounds,
}

impl HostedSession {
    pub fn new(id: Uuid, config: SessionConfig) -> Result<Self, SessionError> {
        let mut session = GameSession::new(config, PlanePicker)?;
        session.start();
        Ok(Self {
            id,
            session,
            seen_mode: None,
            seen_camera: (0.0, 0.0),
            seen_bounds: Bounds::default(),
        })
    }

    /// Initial messages for a new client
    pub fn welcome(&mut self) -> Vec<ServerMessage> {
        let mut out = vec![ServerMessage::Welcome {
            session_id: self.id,
            config: *self.session.config(),
        }];
        out.extend(self.collect_changes());
        out
    }

    pub fn handle(&mut self, msg: ClientMessage) -> Result<Vec<ServerMessage>, SessionError> {
        match msg {
            ClientMessage::Pointer {
                touch,
                alt_touch,
                x,
                y,
            } => {
                self.session.apply_pointer(PointerSample {
                    touch,
                    alt_touch,
                    position: (x, y),
                });
            }
            ClientMessage::Update { delta_time } => {
                if !delta_time.is_finite() || delta_time < 0.0 {
                    return Err(SessionError::InvalidDeltaTime(delta_time));
                }
                self.session.update(delta_time);
            }
            ClientMessage::EnterMode { mode } => {
                let mode: GameMode = mode.parse()?;
                self.session.enter_mode(mode);
            }
            ClientMessage::PlaceTile { q, r } => {
                self.session.place_tile(HexCoord::new(q, r));
                let mut out = self.collect_changes();
                out.push(self.tile_state(q, r));
                return Ok(out);
            }
            ClientMessage::QueryTile { q, r } => return Ok(vec![self.tile_state(q, r)]),
            ClientMessage::SetCamera { x, y } => self.session.set_camera_position((x, y)),
            ClientMessage::ListSessions | ClientMessage::Ping => {
                return Err(SessionError::NotSessionMessage)
            }
        }
        Ok(self.collect_changes())
    }

    fn tile_state(&self, q: i32, r: i32) -> ServerMessage {
        ServerMessage::TileState {
            q,
            r,
            placed: self.session.is_tile_placed(HexCoord::new(q, r)),
        }
    }

    /// Everything that changed since the client was last told
    fn collect_changes(&mut self) -> Vec<ServerMessage> {
        let mut out = Vec::new();

        let cells = self.session.drain_activations();
        if !cells.is_empty() {
            out.push(ServerMessage::CellsActivated { cells });
        }

        let mode = self.session.mode();
        if mode != self.seen_mode {
            self.seen_mode = mode;
            out.push(ServerMessage::ModeChanged { mode });
        }

        let bounds = self.session.bounds();
        if bounds != self.seen_bounds {
            self.seen_bounds = bounds;
            out.push(ServerMessage::BoundsChanged {
                center: bounds.center,
                size: bounds.size,
            });
        }

        let camera = self.session.camera_target();
        if camera != self.seen_camera {
            self.seen_camera = camera;
            out.push(ServerMessage::Camera {
                x: camera.0,
                y: camera.1,
            });
        }

        out
    }

    pub fn to_info(&self) -> SessionInfo {
        let board = self.session.board();
        SessionInfo {
            id: self.id,
            tiles: board.tile_count(),
            active_cells: board.active_count(),
            mode: self.session.mode(),
        }
    }

    pub fn close(&mut self) {
        self.session.teardown();
    }
}
