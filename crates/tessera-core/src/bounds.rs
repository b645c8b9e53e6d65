//! Axis-aligned envelope of the active cells on the board plane.

use crate::grid::HexGrid;
use crate::hex::{to_cartesian, Orientation};
use serde::{Deserialize, Serialize};

/// A rectangle on the board plane, stored as center and full size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Bounds {
    pub center: (f64, f64),
    pub size: (f64, f64),
}

impl Bounds {
    pub fn new(center: (f64, f64), size: (f64, f64)) -> Self {
        Self { center, size }
    }

    /// Envelope of the centers of every active cell.
    ///
    /// An empty grid gives a zero-sized bounds at the origin.
    pub fn from_grid(grid: &HexGrid, radius: f64, orientation: Orientation) -> Self {
        if grid.is_empty() {
            return Self::default();
        }

        let mut min = (f64::MAX, f64::MAX);
        let mut max = (f64::MIN, f64::MIN);
        grid.for_each(|coord| {
            let (x, y) = to_cartesian(coord, radius, orientation);
            min = (min.0.min(x), min.1.min(y));
            max = (max.0.max(x), max.1.max(y));
            true
        });

        Self {
            center: ((min.0 + max.0) / 2.0, (min.1 + max.1) / 2.0),
            size: (max.0 - min.0, max.1 - min.1),
        }
    }

    pub fn half_size(&self) -> (f64, f64) {
        (self.size.0 / 2.0, self.size.1 / 2.0)
    }

    pub fn min(&self) -> (f64, f64) {
        let (hx, hy) = self.half_size();
        (self.center.0 - hx, self.center.1 - hy)
    }

    pub fn max(&self) -> (f64, f64) {
        let (hx, hy) = self.half_size();
        (self.center.0 + hx, self.center.1 + hy)
    }

    pub fn contains(&self, point: (f64, f64)) -> bool {
        let (lo, hi) = (self.min(), self.max());
        (lo.0..=hi.0).contains(&point.0) && (lo.1..=hi.1).contains(&point.1)
    }

    /// Closest point inside the bounds; points already inside are returned unchanged.
    pub fn clamp(&self, point: (f64, f64)) -> (f64, f64) {
        let (lo, hi) = (self.min(), self.max());
        (point.0.clamp(lo.0, hi.0), point.1.clamp(lo.1, hi.1))
    }
}
