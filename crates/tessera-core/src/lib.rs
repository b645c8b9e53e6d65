//! Tessera - a hex tile-placement builder
//!
//! This crate provides the core game logic for Tessera, including:
//! - Axial hex coordinates and their conversion to the board plane
//! - Tile id encoding and the active-cell grid
//! - The game board and its placement rule
//! - A typed message bus and a single-active-state machine
//! - Pointer input tracking and the input modes built on top of them
//!
//! # Architecture
//!
//! Everything runs on one logical thread driven by a host frame loop. The
//! host feeds input into a [`GameSession`], which publishes it on the
//! session's [`MessageBus`]; the active input state reacts, and placement
//! requests reach the [`GameBoard`] through the bus as well.
//!
//! # Modules
//!
//! - [`hex`]: Coordinate system and cartesian conversion
//! - [`encoder`]: Coordinate to tile id packing
//! - [`grid`]: Active cell set
//! - [`board`]: Game board
//! - [`bounds`]: Camera bounds over the active cells
//! - [`messenger`]: Publish/subscribe bus
//! - [`state`]: State machine
//! - [`input`]: Pointer input tracking
//! - [`modes`]: Game modes and input states
//! - [`session`]: Session wiring
//! - [`config`]: Session configuration

pub mod board;
pub mod bounds;
pub mod config;
pub mod encoder;
pub mod grid;
pub mod hex;
pub mod input;
pub mod messenger;
pub mod modes;
pub mod session;
pub mod state;
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use board::GameBoard;
pub use bounds::Bounds;
pub use config::{ConfigError, SessionConfig};
pub use encoder::{encode, TileId};
pub use grid::HexGrid;
pub use hex::{from_cartesian, neighbor_offsets, to_cartesian, HexCoord, Orientation, NEIGHBOR_OFFSETS};
pub use input::{InputMessage, InputTracker, PointerSample};
pub use messenger::{MessageBus, MessageReceiver};
pub use modes::{
    EnterGameStateMessage, GameInput, GameMode, InputState, InputStateKind, PlaceTileMessage,
    PlanePicker, WorldPicker,
};
pub use session::{BoardController, GameSession, TilePlacedMessage};
pub use state::{State, StateMachine};
