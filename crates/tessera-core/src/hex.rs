//! Hex coordinate system using axial coordinates (q, r).
//!
//! This module provides the foundational coordinate types for the hex board:
//! - `HexCoord`: Identifies individual hex cells
//! - `Orientation`: Pointy-top or flat-top layout of the cells
//! - Conversion between axial coordinates and the 2D board plane
//!
//! `to_cartesian` is the only place the axial-to-plane formula lives; anything
//! that needs a world position for a cell goes through it.

use serde::{Deserialize, Serialize};

const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// Axial offsets of the six neighbors, in the canonical enumeration order.
///
/// East, NorthEast, NorthWest, West, SouthWest, SouthEast.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 6] = [
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, 0),
    (-1, 1),
    (0, 1),
];

/// Which way the hexagons are laid out on the board plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Orientation {
    /// A vertex points up; rows are offset horizontally
    #[default]
    PointyTop,
    /// An edge faces up; columns are offset vertically
    FlatTop,
}

/// Axial coordinate for hex grid.
///
/// In axial coordinates:
/// - `q` increases going east (right)
/// - `r` increases going southeast
/// - The third coordinate `s` (not stored) satisfies: q + r + s = 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct HexCoord {
    /// Column (increases going east)
    pub q: i32,
    /// Row (increases going southeast)
    pub r: i32,
}

impl HexCoord {
    /// The origin cell
    pub const ORIGIN: HexCoord = HexCoord::new(0, 0);

    /// Create a new hex coordinate
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// The implicit third coordinate (s = -q - r), widened so it never overflows
    pub const fn s(&self) -> i64 {
        -(self.q as i64) - self.r as i64
    }

    /// Offset this coordinate by an axial delta.
    ///
    /// # Panics
    ///
    /// Panics if the result does not fit in `i32` on either axis.
    pub const fn offset(&self, dq: i32, dr: i32) -> Self {
        match self.checked_offset(dq, dr) {
            Some(coord) => coord,
            None => panic!("hex coordinate offset leaves the i32 range"),
        }
    }

    /// Offset this coordinate, or `None` if either axis would overflow
    pub const fn checked_offset(&self, dq: i32, dr: i32) -> Option<Self> {
        match (self.q.checked_add(dq), self.r.checked_add(dr)) {
            (Some(q), Some(r)) => Some(Self::new(q, r)),
            _ => None,
        }
    }

    /// The six neighboring hexes in `NEIGHBOR_OFFSETS` order
    pub fn neighbors(&self) -> [HexCoord; 6] {
        NEIGHBOR_OFFSETS.map(|(dq, dr)| self.offset(dq, dr))
    }

    /// The six neighbors, or `None` if any of them is not representable
    pub fn checked_neighbors(&self) -> Option<[HexCoord; 6]> {
        let mut out = [*self; 6];
        for (slot, (dq, dr)) in out.iter_mut().zip(NEIGHBOR_OFFSETS) {
            *slot = self.checked_offset(dq, dr)?;
        }
        Some(out)
    }

    /// Distance to another hex (in hex steps)
    pub fn distance_to(&self, other: &HexCoord) -> u64 {
        let dq = (i64::from(self.q) - i64::from(other.q)).unsigned_abs();
        let dr = (i64::from(self.r) - i64::from(other.r)).unsigned_abs();
        let ds = (self.s() - other.s()).unsigned_abs();
        (dq + dr + ds) / 2
    }

    /// Convert to board-plane coordinates (center of hex)
    pub fn to_cartesian(&self, radius: f64, orientation: Orientation) -> (f64, f64) {
        to_cartesian(*self, radius, orientation)
    }
}

impl From<(i32, i32)> for HexCoord {
    fn from((q, r): (i32, i32)) -> Self {
        Self::new(q, r)
    }
}

/// The canonical neighbor offsets, as a slice.
pub fn neighbor_offsets() -> &'static [(i32, i32); 6] {
    &NEIGHBOR_OFFSETS
}

/// Convert an axial coordinate to the center of its cell on the board plane.
///
/// `radius` is the distance from a cell's center to any of its corners.
pub fn to_cartesian(coord: HexCoord, radius: f64, orientation: Orientation) -> (f64, f64) {
    let q = coord.q as f64;
    let r = coord.r as f64;
    match orientation {
        Orientation::PointyTop => {
            let x = radius * (SQRT_3 * q + SQRT_3 / 2.0 * r);
            let y = radius * (3.0 / 2.0 * r);
            (x, y)
        }
        Orientation::FlatTop => {
            let x = radius * (3.0 / 2.0 * q);
            let y = radius * (SQRT_3 / 2.0 * q + SQRT_3 * r);
            (x, y)
        }
    }
}

/// Convert a point on the board plane to the cell containing it.
pub fn from_cartesian(x: f64, y: f64, radius: f64, orientation: Orientation) -> HexCoord {
    let (q, r) = match orientation {
        Orientation::PointyTop => (
            (SQRT_3 / 3.0 * x - 1.0 / 3.0 * y) / radius,
            (2.0 / 3.0 * y) / radius,
        ),
        Orientation::FlatTop => (
            (2.0 / 3.0 * x) / radius,
            (-1.0 / 3.0 * x + SQRT_3 / 3.0 * y) / radius,
        ),
    };
    axial_round(q, r)
}

/// Round fractional axial coordinates to nearest hex
fn axial_round(q: f64, r: f64) -> HexCoord {
    let s = -q - r;

    let mut rq = q.round();
    let mut rr = r.round();
    let rs = s.round();

    let q_diff = (rq - q).abs();
    let r_diff = (rr - r).abs();
    let s_diff = (rs - s).abs();

    if q_diff > r_diff && q_diff > s_diff {
        rq = -rr - rs;
    } else if r_diff > s_diff {
        rr = -rq - rs;
    }

    HexCoord::new(rq as i32, rr as i32)
}
