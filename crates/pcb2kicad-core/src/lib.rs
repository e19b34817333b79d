//! Board model shared by the geometry, connectivity and export crates.

pub mod board;
pub mod groups;
pub mod load;
pub mod object;

pub use board::{
    Arc, Board, Element, Layer, LayerKind, Line, NetDef, Netlist, Pad, Pin, PinShape, Point,
    Polygon, SavedVisibility, Side, Text, Via, FIXED_ROTATION_ATTR,
};
pub use groups::{GroupParseError, LayerGroups};
pub use load::BoardError;
pub use object::{copper_objects, ObjectRef};

/// Board coordinate in nanometres.
pub type Coord = i64;

pub const NM_PER_MM: f64 = 1_000_000.0;

/// 1 mil in board units.
pub const MIL: Coord = 25_400;

#[must_use]
pub fn coord_to_mm(c: Coord) -> f64 {
    c as f64 / NM_PER_MM
}

#[must_use]
pub fn mm_to_coord(mm: f64) -> Coord {
    (mm * NM_PER_MM).round() as Coord
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mm_conversion_round_trips_whole_microns() {
        assert_eq!(mm_to_coord(2.54), 2_540_000);
        assert_eq!(coord_to_mm(2_540_000), 2.54);
        assert_eq!(coord_to_mm(MIL * 100), 2.54);
    }
}
