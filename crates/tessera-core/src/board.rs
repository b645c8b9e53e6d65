//! Game board: active cells, placed tiles and the placement rule.
//!
//! A cell goes through two stages:
//! - *active*: present in the grid, shown as a spot the player may build on
//! - *placed*: holds a tile; its encoded id is in the tile set
//!
//! Placement is only accepted on active cells, and placing a tile activates
//! all six neighbors, so the playable area grows outward from the first tile
//! without gaps.

use crate::encoder::{encode, TileId};
use crate::grid::HexGrid;
use crate::hex::{to_cartesian, HexCoord, Orientation};
use std::collections::HashSet;
use std::fmt;
use tracing::trace;

/// Callback fired for every cell whose active flag changes.
pub type ActivationHook = Box<dyn FnMut(HexCoord, bool)>;

/// The board for one game session
pub struct GameBoard {
    /// Cells eligible for interaction
    grid: HexGrid,
    /// Encoded ids of cells holding a tile
    tiles: HashSet<TileId>,
    orientation: Orientation,
    hex_radius: f64,
    /// Renderer-facing activation notifications
    on_activate: Option<ActivationHook>,
}

impl GameBoard {
    /// Create an empty board
    pub fn new(orientation: Orientation, hex_radius: f64) -> Self {
        Self {
            grid: HexGrid::new(),
            tiles: HashSet::new(),
            orientation,
            hex_radius,
            on_activate: None,
        }
    }

    /// Install the hook a view uses to mirror cell activation
    pub fn set_activation_hook<F>(&mut self, hook: F)
    where
        F: FnMut(HexCoord, bool) + 'static,
    {
        self.on_activate = Some(Box::new(hook));
    }

    /// Remove the activation hook, if any
    pub fn clear_activation_hook(&mut self) {
        self.on_activate = None;
    }

    /// The active cells
    pub fn grid(&self) -> &HexGrid {
        &self.grid
    }

    /// Encoded ids of every placed tile
    pub fn tiles(&self) -> &HashSet<TileId> {
        &self.tiles
    }

    /// Layout of the cells on the board plane
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Center-to-corner size of a cell
    pub fn hex_radius(&self) -> f64 {
        self.hex_radius
    }

    /// Number of placed tiles
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Number of active cells
    pub fn active_count(&self) -> usize {
        self.grid.len()
    }

    /// Center of a cell on the board plane, using this board's layout
    pub fn to_cartesian(&self, coord: HexCoord) -> (f64, f64) {
        to_cartesian(coord, self.hex_radius, self.orientation)
    }

    /// Whether a tile has been placed on the cell
    pub fn is_tile_placed(&self, coord: HexCoord) -> bool {
        self.tiles.contains(&encode(coord))
    }

    /// Whether the cell is active
    pub fn is_active(&self, coord: HexCoord) -> bool {
        self.grid.contains(coord)
    }

    /// Make a cell active. No-op if it already is.
    ///
    /// Returns `true` if the cell was newly activated.
    pub fn activate_cell(&mut self, coord: HexCoord) -> bool {
        if !self.grid.add_hexagon(coord) {
            return false;
        }

        trace!(q = coord.q, r = coord.r, "cell activated");
        if let Some(hook) = self.on_activate.as_mut() {
            hook(coord, true);
        }
        true
    }

    /// Place a tile on an active cell and activate its neighbors.
    ///
    /// Inactive cells and cells that already hold a tile are left untouched.
    /// Returns `true` if a tile was placed.
    ///
    /// # Panics
    ///
    /// Panics if the tile sits on the edge of the `i32` coordinate range, where
    /// some neighbor cannot be represented. The board is left unchanged.
    pub fn place_tile(&mut self, coord: HexCoord) -> bool {
        if !self.grid.contains(coord) || self.tiles.contains(&encode(coord)) {
            return false;
        }

        let Some(neighbors) = coord.checked_neighbors() else {
            panic!("board outgrew the supported coordinate range placing a tile at {coord:?}");
        };

        self.tiles.insert(encode(coord));
        trace!(q = coord.q, r = coord.r, "tile placed");
        for neighbor in neighbors {
            self.activate_cell(neighbor);
        }
        true
    }
}

impl fmt::Debug for GameBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameBoard")
            .field("grid", &self.grid)
            .field("tiles", &self.tiles)
            .field("orientation", &self.orientation)
            .field("hex_radius", &self.hex_radius)
            .field("on_activate", &self.on_activate.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex::NEIGHBOR_OFFSETS;
    use std::cell::RefCell;
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::rc::Rc;

    fn board() -> GameBoard {
        GameBoard::new(Orientation::PointyTop, 1.0)
    }

    #[test]
    fn test_activation_is_idempotent() {
        let mut board = board();
        assert!(board.activate_cell(HexCoord::new(2, 3)));
        assert!(!board.activate_cell(HexCoord::new(2, 3)));
        assert_eq!(board.active_count(), 1);
    }

    #[test]
    fn test_place_on_inactive_cell_is_rejected() {
        let mut board = board();
        assert!(!board.place_tile(HexCoord::ORIGIN));
        assert_eq!(board.tile_count(), 0);
        assert_eq!(board.active_count(), 0);
        assert!(!board.is_tile_placed(HexCoord::ORIGIN));
    }

    #[test]
    fn test_place_activates_all_neighbors() {
        let mut board = board();
        let c = HexCoord::new(-5, 8);
        board.activate_cell(c);
        assert!(board.place_tile(c));

        for (dq, dr) in NEIGHBOR_OFFSETS {
            assert!(board.is_active(c.offset(dq, dr)));
        }
        assert_eq!(board.active_count(), 7);
    }

    #[test]
    fn test_place_next_to_axis_edge() {
        let mut board = board();
        let coord = HexCoord::new(i32::MAX - 1, 0);
        board.activate_cell(coord);
        assert!(board.place_tile(coord));
        assert!(board.is_active(HexCoord::new(i32::MAX, 0)));
        assert!(board.is_active(HexCoord::new(i32::MAX, -1)));
        assert!(!board.is_active(HexCoord::new(i32::MIN, 0)));
    }

    #[test]
    fn test_place_on_axis_edge_fails_fast() {
        let mut board = board();
        let edge = HexCoord::new(i32::MAX, 0);
        board.activate_cell(edge);

        let result = catch_unwind(AssertUnwindSafe(|| board.place_tile(edge)));
        assert!(result.is_err());

        // Nothing wrapped around to the far side of the board
        assert!(!board.is_tile_placed(edge));
        assert_eq!(board.active_count(), 1);
        assert!(!board.is_active(HexCoord::new(i32::MIN, 0)));
    }

    #[test]
    fn test_placement_is_idempotent() {
        let mut board = board();
        board.activate_cell(HexCoord::ORIGIN);
        assert!(board.place_tile(HexCoord::ORIGIN));
        let tiles = board.tiles().clone();
        assert!(!board.place_tile(HexCoord::ORIGIN));
        assert_eq!(board.tiles(), &tiles);
        assert!(board.is_tile_placed(HexCoord::ORIGIN));
    }

    #[test]
    fn test_adjacent_placements_share_neighbors() {
        let mut board = board();
        board.activate_cell(HexCoord::ORIGIN);
        board.place_tile(HexCoord::ORIGIN);
        board.place_tile(HexCoord::new(1, 0));

        // (1,0) adds 3 cells not already around the origin
        assert_eq!(board.active_count(), 10);
        assert_eq!(board.tile_count(), 2);
    }

    #[test]
    fn test_hook_fires_once_per_new_cell() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut board = board();
        let sink = Rc::clone(&seen);
        board.set_activation_hook(move |coord, active| sink.borrow_mut().push((coord, active)));

        board.activate_cell(HexCoord::ORIGIN);
        board.activate_cell(HexCoord::ORIGIN);
        board.place_tile(HexCoord::ORIGIN);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 7);
        assert_eq!(seen[0], (HexCoord::ORIGIN, true));
        assert!(seen.iter().all(|(_, active)| *active));
        assert_eq!(
            seen[1..].iter().map(|(c, _)| *c).collect::<Vec<_>>(),
            HexCoord::ORIGIN.neighbors().to_vec()
        );
    }

    #[test]
    fn test_to_cartesian_uses_board_layout() {
        let board = GameBoard::new(Orientation::FlatTop, 2.0);
        let c = HexCoord::new(2, 0);
        assert_eq!(board.to_cartesian(c), to_cartesian(c, 2.0, Orientation::FlatTop));
        assert_eq!(board.to_cartesian(c).0, 6.0);
    }
}
