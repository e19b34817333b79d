//! Bounding boxes and derived geometry for board primitives.
//!
//! All functions are pure: they read board data and return values, never
//! touching flags on the objects themselves.

pub mod bbox;
pub mod element;
pub mod extents;
pub mod primitives;
pub mod text;

pub use bbox::BoundingBox;
pub use element::{element_bounding_box, element_extents, ElementExtents};
pub use extents::{board_bounding_box, object_bounding_box};
pub use primitives::{
    arc_bounding_box, arc_ends, arc_point, line_bounding_box, pad_bounding_box,
    pin_bounding_box, polygon_bounding_box, via_bounding_box,
};
pub use text::{rotate_box, rotate_point, text_bounding_box, Font, Glyph};
