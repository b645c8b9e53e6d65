//! One game session: the board, the bus and the input pipeline wired together.
//!
//! The host owns the frame loop and calls into the session:
//! - `start()` once, to seed the board and enter the default mode
//! - `apply_pointer()` and `update()` every frame
//! - `drain_activations()` to mirror newly active cells into its view
//! - `teardown()` (or drop) when the session ends

use crate::board::GameBoard;
use crate::bounds::Bounds;
use crate::config::{ConfigError, SessionConfig};
use crate::hex::HexCoord;
use crate::input::{InputMessage, InputTracker, PointerSample};
use crate::messenger::{MessageBus, MessageReceiver};
use crate::modes::{
    EnterGameStateMessage, GameInput, GameMode, InputContext, InputStateKind, PlaceTileMessage,
    WorldPicker,
};
use serde::{Deserialize, Serialize};
use std::cell::{Cell, Ref, RefCell};
use std::mem;
use std::rc::Rc;
use tracing::{debug, info};

/// Published after a tile lands on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilePlacedMessage {
    pub coord: HexCoord,
}

/// Owns the board and applies placement requests from the bus.
#[derive(Debug)]
pub struct BoardController {
    board: GameBoard,
    bus: Rc<MessageBus>,
    bounds: Rc<Cell<Bounds>>,
}

impl BoardController {
    pub fn new(board: GameBoard, bus: Rc<MessageBus>, bounds: Rc<Cell<Bounds>>) -> Self {
        Self { board, bus, bounds }
    }

    pub fn board(&self) -> &GameBoard {
        &self.board
    }

    pub fn activate_cell(&mut self, coord: HexCoord) -> bool {
        self.board.activate_cell(coord)
    }

    /// Place a tile, then refresh the camera bounds and announce it
    pub fn place_tile(&mut self, coord: HexCoord) -> bool {
        if !self.board.place_tile(coord) {
            return false;
        }
        self.adjust_bounds();
        self.bus.publish(TilePlacedMessage { coord });
        true
    }

    /// Recompute the camera bounds from the active cells
    pub fn adjust_bounds(&mut self) {
        let bounds = Bounds::from_grid(
            self.board.grid(),
            self.board.hex_radius(),
            self.board.orientation(),
        );
        self.bounds.set(bounds);
    }
}

impl MessageReceiver<PlaceTileMessage> for BoardController {
    fn on_message_received(&mut self, message: PlaceTileMessage) {
        self.place_tile(message.coord);
    }
}

/// A running game
#[derive(Debug)]
pub struct GameSession {
    config: SessionConfig,
    bus: Rc<MessageBus>,
    tracker: InputTracker,
    controller: Rc<RefCell<BoardController>>,
    input: Rc<RefCell<GameInput>>,
    activations: Rc<RefCell<Vec<HexCoord>>>,
    bounds: Rc<Cell<Bounds>>,
    attached: bool,
}

impl GameSession {
    /// Build a session and attach its components to a fresh bus.
    ///
    /// The config is validated first; no board is built from a bad one.
    pub fn new<P>(config: SessionConfig, picker: P) -> Result<Self, ConfigError>
    where
        P: WorldPicker + 'static,
    {
        config.validate()?;

        let bus = Rc::new(MessageBus::new());
        let bounds = Rc::new(Cell::new(Bounds::default()));
        let activations = Rc::new(RefCell::new(Vec::new()));

        let mut board = GameBoard::new(config.orientation, config.hex_radius);
        let sink = Rc::clone(&activations);
        board.set_activation_hook(move |coord, active| {
            if active {
                sink.borrow_mut().push(coord);
            }
        });

        let controller = Rc::new(RefCell::new(BoardController::new(
            board,
            Rc::clone(&bus),
            Rc::clone(&bounds),
        )));
        let input = Rc::new(RefCell::new(GameInput::new(InputContext {
            bus: Rc::clone(&bus),
            picker: Box::new(picker),
            camera_position: (0.0, 0.0),
            camera_target: (0.0, 0.0),
            bounds: Rc::clone(&bounds),
            orientation: config.orientation,
            hex_radius: config.hex_radius,
        })));

        let mut session = Self {
            config,
            bus,
            tracker: InputTracker::new(config.move_threshold),
            controller,
            input,
            activations,
            bounds,
            attached: false,
        };
        session.attach();
        Ok(session)
    }

    fn attach(&mut self) {
        if self.attached {
            return;
        }
        self.bus.subscribe::<PlaceTileMessage, _>(&self.controller);
        self.bus.subscribe::<EnterGameStateMessage, _>(&self.input);
        self.bus.subscribe::<InputMessage, _>(&self.input);
        self.attached = true;
    }

    /// Seed the board with the origin tile and enter the default mode
    pub fn start(&mut self) {
        {
            let mut controller = self.controller.borrow_mut();
            controller.activate_cell(HexCoord::ORIGIN);
            controller.place_tile(HexCoord::ORIGIN);
        }
        self.bus.publish(EnterGameStateMessage {
            mode: GameMode::GameplayDefault,
        });
        info!(
            active = self.controller.borrow().board().active_count(),
            "session started"
        );
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The session's bus, for hosts that want to listen in
    pub fn bus(&self) -> &Rc<MessageBus> {
        &self.bus
    }

    pub fn board(&self) -> Ref<'_, GameBoard> {
        Ref::map(self.controller.borrow(), BoardController::board)
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds.get()
    }

    pub fn mode(&self) -> Option<GameMode> {
        self.input.borrow().mode()
    }

    pub fn input_state(&self) -> Option<InputStateKind> {
        self.input.borrow().state_kind()
    }

    pub fn camera_target(&self) -> (f64, f64) {
        self.input.borrow().camera_target()
    }

    pub fn set_camera_position(&mut self, position: (f64, f64)) {
        self.input.borrow_mut().set_camera_position(position);
    }

    /// Feed one frame of pointer input
    pub fn apply_pointer(&mut self, sample: PointerSample) -> Option<InputMessage> {
        self.tracker.update(sample, &self.bus)
    }

    pub fn enter_mode(&mut self, mode: GameMode) {
        self.bus.publish(EnterGameStateMessage { mode });
    }

    /// Place a tile directly, bypassing input
    pub fn place_tile(&mut self, coord: HexCoord) -> bool {
        self.controller.borrow_mut().place_tile(coord)
    }

    pub fn is_tile_placed(&self, coord: HexCoord) -> bool {
        self.controller.borrow().board().is_tile_placed(coord)
    }

    pub fn update(&mut self, delta_time: f64) {
        self.input.borrow_mut().update(delta_time);
    }

    /// Cells activated since the last call, in activation order
    pub fn drain_activations(&mut self) -> Vec<HexCoord> {
        mem::take(&mut *self.activations.borrow_mut())
    }

    /// Detach every component from the bus and leave the active input state
    pub fn teardown(&mut self) {
        if !self.attached {
            return;
        }
        self.bus.unsubscribe::<PlaceTileMessage, _>(&self.controller);
        self.bus.unsubscribe::<EnterGameStateMessage, _>(&self.input);
        self.bus.unsubscribe::<InputMessage, _>(&self.input);
        self.input.borrow_mut().shutdown();
        self.attached = false;
        debug!("session torn down");
    }
}

impl Drop for GameSession {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modes::PlanePicker;
    use pretty_assertions::assert_eq;

    fn started() -> GameSession {
        let mut session = GameSession::new(SessionConfig::default(), PlanePicker).unwrap();
        session.start();
        session
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = SessionConfig {
            hex_radius: f64::NAN,
            ..SessionConfig::default()
        };
        assert!(matches!(
            GameSession::new(config, PlanePicker),
            Err(ConfigError::InvalidRadius(_))
        ));

        let config = SessionConfig {
            move_threshold: -1.0,
            ..SessionConfig::default()
        };
        assert!(matches!(
            GameSession::new(config, PlanePicker),
            Err(ConfigError::InvalidThreshold(_))
        ));
    }

    #[test]
    fn test_start_seeds_origin() {
        let mut session = started();
        assert!(session.is_tile_placed(HexCoord::ORIGIN));
        assert_eq!(session.board().active_count(), 7);
        assert_eq!(session.mode(), Some(GameMode::GameplayDefault));
        assert_eq!(session.input_state(), Some(InputStateKind::Drag));

        let mut expected = vec![HexCoord::ORIGIN];
        expected.extend(HexCoord::ORIGIN.neighbors());
        assert_eq!(session.drain_activations(), expected);
        assert!(session.drain_activations().is_empty());
    }

    #[test]
    fn test_bounds_follow_placement() {
        let mut session = started();
        let before = session.bounds();
        assert!(session.place_tile(HexCoord::new(1, 0)));
        let after = session.bounds();
        assert!(after.size.0 > before.size.0);
    }

    #[test]
    fn test_tap_places_tile_in_placement_mode() {
        let mut session = started();
        session.enter_mode(GameMode::GameplayPlacement);

        let target = HexCoord::new(0, 1);
        let (x, y) = target.to_cartesian(1.0, session.config().orientation);
        session.apply_pointer(PointerSample::pressed(x, y));
        session.apply_pointer(PointerSample::released(x, y));

        assert!(session.is_tile_placed(target));
        assert_eq!(session.board().tile_count(), 2);
    }

    #[test]
    fn test_tap_on_inactive_cell_is_ignored() {
        let mut session = started();
        session.enter_mode(GameMode::GameplayPlacement);

        let far = HexCoord::new(5, 5);
        let (x, y) = far.to_cartesian(1.0, session.config().orientation);
        session.apply_pointer(PointerSample::pressed(x, y));
        session.apply_pointer(PointerSample::released(x, y));

        assert!(!session.is_tile_placed(far));
        assert_eq!(session.board().tile_count(), 1);
    }

    #[test]
    fn test_teardown_empties_bus() {
        let mut session = started();
        let bus = Rc::clone(session.bus());
        assert_eq!(bus.message_type_count(), 3);

        session.teardown();
        assert_eq!(bus.message_type_count(), 0);
        assert_eq!(session.input_state(), None);
    }
}
