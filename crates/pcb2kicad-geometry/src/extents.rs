use pcb2kicad_core::{Board, ObjectRef};

use crate::bbox::BoundingBox;
use crate::element::element_bounding_box;
use crate::primitives::{
    arc_bounding_box, line_bounding_box, pad_bounding_box, pin_bounding_box,
    polygon_bounding_box, via_bounding_box,
};
use crate::text::{text_bounding_box, Font};

/// Extents of everything on the board, or `None` when the board holds no
/// objects.
#[must_use]
pub fn board_bounding_box(board: &Board, font: &Font) -> Option<BoundingBox> {
    if board.is_empty() {
        return None;
    }
    let mut b = BoundingBox::empty();
    for via in &board.vias {
        b = b.union(&via_bounding_box(via));
    }
    for element in &board.elements {
        b = b.union(&element_bounding_box(element, font));
    }
    for layer in &board.layers {
        for line in &layer.lines {
            b = b.union(&line_bounding_box(line));
        }
        for arc in &layer.arcs {
            b = b.union(&arc_bounding_box(arc));
        }
        for text in &layer.texts {
            b = b.union(&text_bounding_box(font, text));
        }
        for polygon in &layer.polygons {
            b = b.union(&polygon_bounding_box(polygon));
        }
    }
    Some(b)
}

/// Box of a single copper object. Stale references yield an empty box.
#[must_use]
pub fn object_bounding_box(board: &Board, obj: ObjectRef) -> BoundingBox {
    let found = match obj {
        ObjectRef::Pin { element, index } => board
            .elements
            .get(element)
            .and_then(|e| e.pins.get(index))
            .map(pin_bounding_box),
        ObjectRef::Pad { element, index } => board
            .elements
            .get(element)
            .and_then(|e| e.pads.get(index))
            .map(pad_bounding_box),
        ObjectRef::Via(index) => board.vias.get(index).map(via_bounding_box),
        ObjectRef::Line { layer, index } => board
            .layers
            .get(layer)
            .and_then(|l| l.lines.get(index))
            .map(line_bounding_box),
        ObjectRef::Arc { layer, index } => board
            .layers
            .get(layer)
            .and_then(|l| l.arcs.get(index))
            .map(arc_bounding_box),
        ObjectRef::Polygon { layer, index } => board
            .layers
            .get(layer)
            .and_then(|l| l.polygons.get(index))
            .map(polygon_bounding_box),
    };
    found.unwrap_or_else(BoundingBox::empty)
}
