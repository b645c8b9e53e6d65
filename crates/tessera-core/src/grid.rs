//! The set of active cells on the board.

use crate::hex::HexCoord;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Cells eligible to host a tile or be drawn as placeable.
///
/// Enumeration order is unspecified.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HexGrid {
    cells: HashSet<HexCoord>,
}

impl HexGrid {
    /// Create an empty grid
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a cell, returning it if it is active
    pub fn try_get_hexagon(&self, coord: HexCoord) -> Option<HexCoord> {
        self.cells.get(&coord).copied()
    }

    /// Whether a cell is active
    pub fn contains(&self, coord: HexCoord) -> bool {
        self.cells.contains(&coord)
    }

    /// Mark a cell active. Returns `false` if it already was.
    pub fn add_hexagon(&mut self, coord: HexCoord) -> bool {
        self.cells.insert(coord)
    }

    /// Visit every active cell until the visitor returns `false`.
    ///
    /// Returns `true` if every cell was visited.
    pub fn for_each<F>(&self, mut visitor: F) -> bool
    where
        F: FnMut(HexCoord) -> bool,
    {
        for coord in &self.cells {
            if !visitor(*coord) {
                return false;
            }
        }
        true
    }

    /// Iterate over the active cells
    pub fn iter(&self) -> impl Iterator<Item = HexCoord> + '_ {
        self.cells.iter().copied()
    }

    /// Number of active cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether no cell is active
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl FromIterator<HexCoord> for HexGrid {
    fn from_iter<I: IntoIterator<Item = HexCoord>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}
