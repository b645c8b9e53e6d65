//! Game modes and the input states that serve them.
//!
//! [`GameInput`] listens for mode changes and raw input on the bus and routes
//! input to whichever [`InputState`] is active:
//! - `Drag` pans the camera target by dragging the board plane
//! - `Placement` turns a tap on a cell into a [`PlaceTileMessage`]
//!
//! Menu modes leave no input state active, so input is ignored.

use crate::bounds::Bounds;
use crate::hex::{from_cartesian, HexCoord, Orientation};
use crate::input::InputMessage;
use crate::messenger::{MessageBus, MessageReceiver};
use crate::state::{State, StateMachine};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, trace};

/// Top-level mode of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    /// Free camera panning
    GameplayDefault,
    /// Tapping a cell places a tile
    GameplayPlacement,
    MainMenu,
    PauseMenu,
}

impl GameMode {
    pub const ALL: [GameMode; 4] = [
        GameMode::GameplayDefault,
        GameMode::GameplayPlacement,
        GameMode::MainMenu,
        GameMode::PauseMenu,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            GameMode::GameplayDefault => "GameplayDefault",
            GameMode::GameplayPlacement => "GameplayPlacement",
            GameMode::MainMenu => "MainMenu",
            GameMode::PauseMenu => "PauseMenu",
        }
    }

    /// Input state serving this mode, if any
    pub fn input_state(&self) -> Option<InputStateKind> {
        match self {
            GameMode::GameplayDefault => Some(InputStateKind::Drag),
            GameMode::GameplayPlacement => Some(InputStateKind::Placement),
            GameMode::MainMenu | GameMode::PauseMenu => None,
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown game mode: {0}")]
pub struct UnknownMode(pub String);

impl FromStr for GameMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GameMode::ALL
            .into_iter()
            .find(|mode| mode.name() == s)
            .ok_or_else(|| UnknownMode(s.to_string()))
    }
}

/// Request to switch the game into another mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnterGameStateMessage {
    pub mode: GameMode,
}

/// Request to place a tile on a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceTileMessage {
    pub coord: HexCoord,
}

/// Maps a screen position onto the board plane.
pub trait WorldPicker {
    /// The board-plane point under `screen`, or `None` on a miss
    fn pick(&self, screen: (f64, f64)) -> Option<(f64, f64)>;
}

/// Picker for hosts that already send board-plane positions.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanePicker;

impl WorldPicker for PlanePicker {
    fn pick(&self, screen: (f64, f64)) -> Option<(f64, f64)> {
        Some(screen)
    }
}

/// Everything the input states read and write
pub struct InputContext {
    pub bus: Rc<MessageBus>,
    pub picker: Box<dyn WorldPicker>,
    /// Where the camera is now, as reported by the host
    pub camera_position: (f64, f64),
    /// Where the camera should go; hosts ease toward it
    pub camera_target: (f64, f64),
    /// Camera limits, shared with the board controller
    pub bounds: Rc<Cell<Bounds>>,
    pub orientation: Orientation,
    pub hex_radius: f64,
}

impl fmt::Debug for InputContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputContext")
            .field("camera_position", &self.camera_position)
            .field("camera_target", &self.camera_target)
            .field("bounds", &self.bounds.get())
            .field("orientation", &self.orientation)
            .field("hex_radius", &self.hex_radius)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputStateKind {
    Drag,
    Placement,
}

/// Camera drag in progress
#[derive(Debug, Clone, Default)]
pub struct DragState {
    /// Board point grabbed when the drag started
    drag_anchor: Option<(f64, f64)>,
}

/// Tap-to-place tracking
#[derive(Debug, Clone, Default)]
pub struct PlacementState {
    /// Where the current press went down
    press: Option<(f64, f64)>,
    /// Whether the current press turned into a drag
    moved: bool,
}

#[derive(Debug, Clone)]
pub enum InputState {
    Drag(DragState),
    Placement(PlacementState),
}

impl InputState {
    /// Handle one input message
    pub fn on_input(&mut self, context: &mut InputContext, message: InputMessage) {
        match self {
            InputState::Drag(drag) => drag.on_input(context, message),
            InputState::Placement(placement) => placement.on_input(context, message),
        }
    }
}

impl State for InputState {
    type Context = InputContext;
    type Kind = InputStateKind;

    fn create(kind: InputStateKind) -> Self {
        match kind {
            InputStateKind::Drag => InputState::Drag(DragState::default()),
            InputStateKind::Placement => InputState::Placement(PlacementState::default()),
        }
    }

    fn kind(&self) -> InputStateKind {
        match self {
            InputState::Drag(_) => InputStateKind::Drag,
            InputState::Placement(_) => InputStateKind::Placement,
        }
    }

    fn enter(&mut self, context: &mut InputContext) {
        if let InputState::Drag(_) = self {
            context.camera_target = context.camera_position;
        }
    }

    fn exit(&mut self, _context: &mut InputContext) {
        match self {
            InputState::Drag(drag) => drag.drag_anchor = None,
            InputState::Placement(placement) => *placement = PlacementState::default(),
        }
    }
}

impl DragState {
    pub fn drag_anchor(&self) -> Option<(f64, f64)> {
        self.drag_anchor
    }

    fn on_input(&mut self, context: &mut InputContext, message: InputMessage) {
        if !message.is_moving {
            self.drag_anchor = None;
            return;
        }

        let Some(world) = message.move_position.and_then(|p| context.picker.pick(p)) else {
            return;
        };

        let anchor = *self.drag_anchor.get_or_insert_with(|| {
            context.camera_target = context.camera_position;
            world
        });

        let target = (
            context.camera_position.0 + anchor.0 - world.0,
            context.camera_position.1 + anchor.1 - world.1,
        );
        context.camera_target = context.bounds.get().clamp(target);
        trace!(x = context.camera_target.0, y = context.camera_target.1, "camera target");
    }
}

impl PlacementState {
    fn on_input(&mut self, context: &mut InputContext, message: InputMessage) {
        if message.is_pressed() {
            if self.press.is_none() {
                self.press = message.down_position;
            }
            self.moved |= message.is_moving;
            return;
        }

        let press = self.press.take();
        let moved = std::mem::take(&mut self.moved);
        if moved {
            return;
        }

        let Some(world) = press.and_then(|p| context.picker.pick(p)) else {
            return;
        };
        let coord = from_cartesian(world.0, world.1, context.hex_radius, context.orientation);
        debug!(q = coord.q, r = coord.r, "placement requested");
        context.bus.publish(PlaceTileMessage { coord });
    }
}

/// Routes mode changes and input to the active input state.
#[derive(Debug)]
pub struct GameInput {
    machine: StateMachine<InputState>,
    context: InputContext,
    mode: Option<GameMode>,
}

impl GameInput {
    pub fn new(context: InputContext) -> Self {
        Self {
            machine: StateMachine::new(),
            context,
            mode: None,
        }
    }

    /// Last mode entered
    pub fn mode(&self) -> Option<GameMode> {
        self.mode
    }

    pub fn state(&self) -> Option<&InputState> {
        self.machine.current()
    }

    pub fn state_kind(&self) -> Option<InputStateKind> {
        self.machine.current_kind()
    }

    pub fn context(&self) -> &InputContext {
        &self.context
    }

    pub fn camera_target(&self) -> (f64, f64) {
        self.context.camera_target
    }

    pub fn set_camera_position(&mut self, position: (f64, f64)) {
        self.context.camera_position = position;
    }

    pub fn enter_mode(&mut self, mode: GameMode) {
        self.mode = Some(mode);
        match mode.input_state() {
            Some(kind) => {
                self.machine.enter_state(kind, &mut self.context);
            }
            None => {
                self.machine.exit_state(&mut self.context);
            }
        }
    }

    pub fn update(&mut self, delta_time: f64) {
        self.machine.update(&mut self.context, delta_time);
    }

    /// Leave any active state
    pub fn shutdown(&mut self) {
        self.machine.exit_state(&mut self.context);
    }
}

impl MessageReceiver<EnterGameStateMessage> for GameInput {
    fn on_message_received(&mut self, message: EnterGameStateMessage) {
        self.enter_mode(message.mode);
    }
}

impl MessageReceiver<InputMessage> for GameInput {
    fn on_message_received(&mut self, message: InputMessage) {
        if let Some(state) = self.machine.current_mut() {
            state.on_input(&mut self.context, message);
        }
    }
}
