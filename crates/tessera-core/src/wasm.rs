//! WebAssembly bindings for the Tessera game session.
//!
//! This module exposes a session to JavaScript through wasm-bindgen. Browser
//! clients pick board-plane points themselves, so the session uses
//! [`PlanePicker`].

use wasm_bindgen::prelude::*;

use crate::config::SessionConfig;
use crate::hex::HexCoord;
use crate::input::PointerSample;
use crate::modes::{GameMode, PlanePicker};
use crate::session::GameSession;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// WASM-exposed session wrapper
#[wasm_bindgen]
pub struct WasmSession {
    session: GameSession,
}

#[wasm_bindgen]
impl WasmSession {
    /// Create and start a session from a JSON config (`"{}"` for defaults)
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<WasmSession, JsValue> {
        let config = SessionConfig::from_json(config_json)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let mut session = GameSession::new(config, PlanePicker)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        session.start();
        Ok(WasmSession { session })
    }

    /// Feed one frame of pointer input
    #[wasm_bindgen(js_name = pointer)]
    pub fn pointer(&mut self, touch: bool, alt_touch: bool, x: f64, y: f64) {
        self.session.apply_pointer(PointerSample {
            touch,
            alt_touch,
            position: (x, y),
        });
    }

    #[wasm_bindgen(js_name = update)]
    pub fn update(&mut self, delta_time: f64) {
        self.session.update(delta_time);
    }

    /// Switch mode by name, e.g. "GameplayPlacement"
    #[wasm_bindgen(js_name = enterMode)]
    pub fn enter_mode(&mut self, mode: &str) -> Result<(), JsValue> {
        let mode: GameMode = mode.parse().map_err(|e| JsValue::from_str(&format!("{}", e)))?;
        self.session.enter_mode(mode);
        Ok(())
    }

    #[wasm_bindgen(js_name = placeTile)]
    pub fn place_tile(&mut self, q: i32, r: i32) -> bool {
        self.session.place_tile(HexCoord::new(q, r))
    }

    #[wasm_bindgen(js_name = isTilePlaced)]
    pub fn is_tile_placed(&self, q: i32, r: i32) -> bool {
        self.session.is_tile_placed(HexCoord::new(q, r))
    }

    /// Cells activated since the last call, as a JSON array of {q, r}
    #[wasm_bindgen(js_name = drainActivations)]
    pub fn drain_activations(&mut self) -> String {
        let cells = self.session.drain_activations();
        serde_json::to_string(&cells).unwrap_or_else(|_| "[]".to_string())
    }

    /// All active cells as JSON
    #[wasm_bindgen(js_name = getActiveCells)]
    pub fn get_active_cells(&self) -> String {
        let cells: Vec<HexCoord> = self.session.board().grid().iter().collect();
        serde_json::to_string(&cells).unwrap_or_else(|_| "[]".to_string())
    }

    /// Camera target as [x, y]
    #[wasm_bindgen(js_name = getCameraTarget)]
    pub fn get_camera_target(&self) -> Vec<f64> {
        let (x, y) = self.session.camera_target();
        vec![x, y]
    }

    #[wasm_bindgen(js_name = setCameraPosition)]
    pub fn set_camera_position(&mut self, x: f64, y: f64) {
        self.session.set_camera_position((x, y));
    }

    /// Current bounds as JSON
    #[wasm_bindgen(js_name = getBounds)]
    pub fn get_bounds(&self) -> String {
        serde_json::to_string(&self.session.bounds()).unwrap_or_else(|_| "{}".to_string())
    }

    /// Current mode name, or null before start
    #[wasm_bindgen(js_name = getMode)]
    pub fn get_mode(&self) -> Option<String> {
        self.session.mode().map(|m| m.name().to_string())
    }
}
