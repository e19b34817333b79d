use pcb2kicad_core::Element;

use crate::bbox::BoundingBox;
use crate::primitives::arc_bounding_box;
use crate::text::{text_bounding_box, Font};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementExtents {
    /// Union of lines, pins, pads, arcs and the reference designator text.
    pub bbox: BoundingBox,
    /// Per pad: whether its second endpoint lies closer to the outer edge of
    /// the footprint than its first endpoint.
    pub pad_far_edge: Vec<bool>,
    /// Footprint body is wider than tall.
    pub pins_horizontal: bool,
}

/// Extents of an element. An element with neither pins nor pads is malformed
/// and gets an empty box.
#[must_use]
pub fn element_extents(element: &Element, font: &Font) -> ElementExtents {
    if element.pins.is_empty() && element.pads.is_empty() {
        return ElementExtents {
            bbox: BoundingBox::empty(),
            pad_far_edge: Vec::new(),
            pins_horizontal: false,
        };
    }

    let mut body = BoundingBox::empty();
    for line in &element.lines {
        let half = line.thickness / 2;
        body = body.union(
            &BoundingBox::from_corners(line.p1.x, line.p1.y, line.p2.x, line.p2.y).expand(half),
        );
    }
    for pin in &element.pins {
        body = body.union(&BoundingBox::new(pin.x, pin.y, pin.x, pin.y).expand(pin.thickness / 2));
    }
    for arc in &element.arcs {
        body = body.union(&arc_bounding_box(arc));
    }
    for pad in &element.pads {
        body = body.union(
            &BoundingBox::from_corners(pad.p1.x, pad.p1.y, pad.p2.x, pad.p2.y)
                .expand(pad.thickness / 2),
        );
    }

    let pad_far_edge = element
        .pads
        .iter()
        .map(|pad| {
            if pad.p1.y == pad.p2.y {
                body.x2 - pad.p2.x < pad.p1.x - body.x1
            } else {
                body.y2 - pad.p2.y < pad.p1.y - body.y1
            }
        })
        .collect();
    let pins_horizontal = body.width() > body.height();

    ElementExtents {
        bbox: body.union(&text_bounding_box(font, &element.refdes)),
        pad_far_edge,
        pins_horizontal,
    }
}

#[must_use]
pub fn element_bounding_box(element: &Element, font: &Font) -> BoundingBox {
    element_extents(element, font).bbox
}
