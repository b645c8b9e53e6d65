//! Packing of hex coordinates into single 64-bit tile ids.
//!
//! Each axis is shifted from signed into unsigned space and the two halves are
//! stored in disjoint 32-bit ranges: `q` high, `r` low. Every `i32` pair maps
//! to a distinct id, so the board can use ids as set keys for any coordinate
//! it can represent.

use crate::hex::HexCoord;

/// Encoded identifier of a cell
pub type TileId = u64;

/// Shift a signed axis value into `0..=u32::MAX`, preserving order.
const fn to_unsigned(v: i32) -> u64 {
    (v as i64 - i32::MIN as i64) as u64
}

/// Encode a coordinate into its tile id.
pub const fn encode(coord: HexCoord) -> TileId {
    (to_unsigned(coord.q) << 32) | to_unsigned(coord.r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn test_origin_sits_mid_range() {
        assert_eq!(encode(HexCoord::ORIGIN), (1u64 << 63) | (1u64 << 31));
    }

    #[test]
    fn test_extremes_do_not_collide() {
        let corners = [
            HexCoord::new(i32::MIN, i32::MIN),
            HexCoord::new(i32::MIN, i32::MAX),
            HexCoord::new(i32::MAX, i32::MIN),
            HexCoord::new(i32::MAX, i32::MAX),
        ];
        let ids: HashSet<_> = corners.iter().map(|c| encode(*c)).collect();
        assert_eq!(ids.len(), 4);
        assert_eq!(encode(HexCoord::new(i32::MIN, i32::MIN)), 0);
        assert_eq!(encode(HexCoord::new(i32::MAX, i32::MAX)), u64::MAX);
    }

    #[test]
    fn test_neighborhood_is_collision_free() {
        let mut ids = HashSet::new();
        for q in -20..=20 {
            for r in -20..=20 {
                assert!(ids.insert(encode(HexCoord::new(q, r))));
            }
        }
    }

    #[test]
    fn test_swapped_axes_differ() {
        assert_ne!(encode(HexCoord::new(1, 2)), encode(HexCoord::new(2, 1)));
        assert_ne!(encode(HexCoord::new(-1, 0)), encode(HexCoord::new(0, -1)));
    }

    const RANGE: i32 = 1 << 20;

    proptest! {
        #[test]
        fn encoding_is_injective(
            q1 in -RANGE..=RANGE, r1 in -RANGE..=RANGE,
            q2 in -RANGE..=RANGE, r2 in -RANGE..=RANGE,
        ) {
            let a = HexCoord::new(q1, r1);
            let b = HexCoord::new(q2, r2);
            prop_assert_eq!(a == b, encode(a) == encode(b));
        }
    }
}
