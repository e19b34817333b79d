use pcb2kicad_core::{Arc, Coord, Line, Pad, Pin, Point, Polygon, Via};

use crate::bbox::BoundingBox;

#[must_use]
pub fn line_bounding_box(line: &Line) -> BoundingBox {
    BoundingBox::from_corners(line.p1.x, line.p1.y, line.p2.x, line.p2.y).expand(line.thickness / 2)
}

#[must_use]
pub fn via_bounding_box(via: &Via) -> BoundingBox {
    BoundingBox::new(via.x, via.y, via.x, via.y).expand(via.thickness / 2)
}

#[must_use]
pub fn pin_bounding_box(pin: &Pin) -> BoundingBox {
    BoundingBox::new(pin.x, pin.y, pin.x, pin.y).expand(pin.thickness / 2)
}

/// Stand-alone pad box, padded by the full thickness on each side.
#[must_use]
pub fn pad_bounding_box(pad: &Pad) -> BoundingBox {
    BoundingBox::from_corners(pad.p1.x, pad.p1.y, pad.p2.x, pad.p2.y).expand(pad.thickness)
}

/// Box of every polygon point, hole contours included.
#[must_use]
pub fn polygon_bounding_box(polygon: &Polygon) -> BoundingBox {
    let mut b = BoundingBox::empty();
    for p in &polygon.points {
        b.include_point(p.x, p.y);
    }
    b
}

/// Start and end angle of the sweep with a non-negative delta of at most 360°.
fn sweep(arc: &Arc) -> (f64, f64) {
    let delta = arc.delta.clamp(-360.0, 360.0);
    if delta < 0.0 {
        (arc.start_angle + delta, arc.start_angle)
    } else {
        (arc.start_angle, arc.start_angle + delta)
    }
}

/// Point on the arc at `angle_deg`.
#[must_use]
pub fn arc_point(arc: &Arc, angle_deg: f64) -> (f64, f64) {
    let (s, c) = angle_deg.to_radians().sin_cos();
    (
        arc.x as f64 - arc.width as f64 * c,
        arc.y as f64 + arc.height as f64 * s,
    )
}

fn round_point((x, y): (f64, f64)) -> Point {
    Point::new(x.round() as Coord, y.round() as Coord)
}

/// Start and end points of the arc.
#[must_use]
pub fn arc_ends(arc: &Arc) -> (Point, Point) {
    (
        round_point(arc_point(arc, arc.start_angle)),
        round_point(arc_point(arc, arc.start_angle + arc.delta)),
    )
}

/// Unit-circle (cos, sin) for `quadrant * 90°`, exact.
fn quadrant_unit(quadrant: i64) -> (Coord, Coord) {
    match quadrant.rem_euclid(4) {
        0 => (1, 0),
        1 => (0, 1),
        2 => (-1, 0),
        _ => (0, -1),
    }
}

/// Box of the stroked arc: both endpoints plus every axis crossing strictly
/// inside the sweep, padded by half the stroke thickness.
#[must_use]
pub fn arc_bounding_box(arc: &Arc) -> BoundingBox {
    let mut b = BoundingBox::empty();
    let (first, last) = arc_ends(arc);
    b.include_point(first.x, first.y);
    b.include_point(last.x, last.y);

    let (start, end) = sweep(arc);
    let span = end - start;
    let start = start.rem_euclid(360.0);
    let end = start + span;
    let mut quadrant = (start / 90.0).floor() as i64 + 1;
    while (quadrant as f64) * 90.0 < end {
        let (c, s) = quadrant_unit(quadrant);
        b.include_point(arc.x - arc.width * c, arc.y + arc.height * s);
        quadrant += 1;
    }
    b.expand(arc.thickness / 2)
}
