use std::collections::{HashSet, VecDeque};

use pcb2kicad_core::{copper_objects, Board, ObjectRef, Side};
use pcb2kicad_geometry::{arc_point, object_bounding_box};
use rstar::primitives::{GeomWithData, Rectangle};
use rstar::{RTree, RTreeObject, AABB};

/// Objects reached by one connectivity search.
pub type FoundSet = HashSet<ObjectRef>;

/// Connectivity search over the copper of a board.
pub trait ConnectionLookup {
    /// Every object galvanically reachable from `seed`, `seed` included.
    fn find_connections(&self, board: &Board, seed: ObjectRef) -> FoundSet;
}

/// Flattening step for arcs, in degrees.
const ARC_STEP_DEG: f64 = 15.0;

type Pt = (f64, f64);

/// Indexed box of one node; `data` is the node's position in the node list.
type NodeBox = GeomWithData<Rectangle<[f64; 2]>, usize>;

/// Flood fill over touching copper shapes, with candidates drawn from an
/// R-tree of object boxes.
///
/// Pins and vias are discs on every copper group, pads are capsules on the
/// group of their side, lines and arcs are capsules on their layer's group and
/// polygons are their outer boundary. A pin or via only joins a clearing
/// polygon through a thermal on that polygon's layer; pads never join one.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeometricLookup;

enum Shape {
    Stroke { path: Vec<Pt>, radius: f64 },
    Area(Vec<Pt>),
}

struct Node<'a> {
    obj: ObjectRef,
    groups: Vec<usize>,
    shape: Shape,
    /// Layer and clearing flag, for polygons.
    polygon: Option<(usize, bool)>,
    /// Thermal styles, for pins and vias.
    thermals: Option<&'a [u8]>,
    is_pad: bool,
}

fn pt(x: i64, y: i64) -> Pt {
    (x as f64, y as f64)
}

fn copper_groups(board: &Board) -> Vec<usize> {
    let mut groups: Vec<usize> = board
        .copper_layer_indices()
        .map(|l| board.group_of_layer(l))
        .collect();
    groups.sort_unstable();
    groups.dedup();
    groups
}

fn node<'a>(board: &'a Board, obj: ObjectRef, all_copper: &[usize]) -> Option<Node<'a>> {
    let n = match obj {
        ObjectRef::Pin { element, index } => {
            let pin = board.elements.get(element)?.pins.get(index)?;
            Node {
                obj,
                // Unplated holes carry no copper.
                groups: if pin.hole { Vec::new() } else { all_copper.to_vec() },
                shape: Shape::Stroke {
                    path: vec![pt(pin.x, pin.y)],
                    radius: pin.thickness as f64 / 2.0,
                },
                polygon: None,
                thermals: Some(pin.thermals.as_slice()),
                is_pad: false,
            }
        }
        ObjectRef::Pad { element, index } => {
            let pad = board.elements.get(element)?.pads.get(index)?;
            let side = if pad.on_solder { Side::Bottom } else { Side::Top };
            Node {
                obj,
                groups: vec![board.group_of_side(side)],
                shape: Shape::Stroke {
                    path: vec![pt(pad.p1.x, pad.p1.y), pt(pad.p2.x, pad.p2.y)],
                    radius: pad.thickness as f64 / 2.0,
                },
                polygon: None,
                thermals: None,
                is_pad: true,
            }
        }
        ObjectRef::Via(index) => {
            let via = board.vias.get(index)?;
            Node {
                obj,
                groups: all_copper.to_vec(),
                shape: Shape::Stroke {
                    path: vec![pt(via.x, via.y)],
                    radius: via.thickness as f64 / 2.0,
                },
                polygon: None,
                thermals: Some(via.thermals.as_slice()),
                is_pad: false,
            }
        }
        ObjectRef::Line { layer, index } => {
            let line = board.layers.get(layer)?.lines.get(index)?;
            Node {
                obj,
                groups: vec![board.group_of_layer(layer)],
                shape: Shape::Stroke {
                    path: vec![pt(line.p1.x, line.p1.y), pt(line.p2.x, line.p2.y)],
                    radius: line.thickness as f64 / 2.0,
                },
                polygon: None,
                thermals: None,
                is_pad: false,
            }
        }
        ObjectRef::Arc { layer, index } => {
            let arc = board.layers.get(layer)?.arcs.get(index)?;
            let delta = arc.delta.clamp(-360.0, 360.0);
            let steps = (delta.abs() / ARC_STEP_DEG).ceil().max(1.0) as usize;
            let path = (0..=steps)
                .map(|i| arc_point(arc, arc.start_angle + delta * i as f64 / steps as f64))
                .collect();
            Node {
                obj,
                groups: vec![board.group_of_layer(layer)],
                shape: Shape::Stroke {
                    path,
                    radius: arc.thickness as f64 / 2.0,
                },
                polygon: None,
                thermals: None,
                is_pad: false,
            }
        }
        ObjectRef::Polygon { layer, index } => {
            let poly = board.layers.get(layer)?.polygons.get(index)?;
            Node {
                obj,
                groups: vec![board.group_of_layer(layer)],
                shape: Shape::Area(poly.outer().iter().map(|p| pt(p.x, p.y)).collect()),
                polygon: Some((layer, poly.clear_poly)),
                thermals: None,
                is_pad: false,
            }
        }
    };
    Some(n)
}

fn joins_polygon(node: &Node<'_>, layer: usize, clears: bool) -> bool {
    if !clears {
        return true;
    }
    if node.is_pad {
        return false;
    }
    match node.thermals {
        Some(styles) => styles.get(layer).is_some_and(|&s| s != 0),
        None => true,
    }
}

fn may_join(a: &Node<'_>, b: &Node<'_>) -> bool {
    match (a.polygon, b.polygon) {
        (Some((layer, clears)), None) => joins_polygon(b, layer, clears),
        (None, Some((layer, clears))) => joins_polygon(a, layer, clears),
        _ => true,
    }
}

fn connected(a: &Node<'_>, b: &Node<'_>) -> bool {
    a.groups.iter().any(|g| b.groups.contains(g)) && may_join(a, b) && touches(&a.shape, &b.shape)
}

fn segments(path: &[Pt]) -> impl Iterator<Item = (Pt, Pt)> + '_ {
    let single = (path.len() == 1).then(|| (path[0], path[0]));
    single
        .into_iter()
        .chain(path.windows(2).map(|w| (w[0], w[1])))
}

fn edges(ring: &[Pt]) -> impl Iterator<Item = (Pt, Pt)> + '_ {
    (0..ring.len()).map(move |i| (ring[i], ring[(i + 1) % ring.len()]))
}

fn touches(a: &Shape, b: &Shape) -> bool {
    match (a, b) {
        (Shape::Stroke { path: pa, radius: ra }, Shape::Stroke { path: pb, radius: rb }) => {
            segments(pa).any(|sa| segments(pb).any(|sb| seg_seg_distance(sa, sb) <= ra + rb))
        }
        (Shape::Stroke { path, radius }, Shape::Area(ring))
        | (Shape::Area(ring), Shape::Stroke { path, radius }) => {
            path.iter().any(|&p| point_in_ring(p, ring))
                || segments(path).any(|s| edges(ring).any(|e| seg_seg_distance(s, e) <= *radius))
        }
        (Shape::Area(ra), Shape::Area(rb)) => {
            ra.iter().any(|&p| point_in_ring(p, rb))
                || rb.iter().any(|&p| point_in_ring(p, ra))
                || edges(ra).any(|ea| edges(rb).any(|eb| segments_intersect(ea, eb)))
        }
    }
}

fn point_in_ring(p: Pt, ring: &[Pt]) -> bool {
    if ring.len() < 3 {
        return false;
    }
    let mut inside = false;
    for ((x1, y1), (x2, y2)) in edges(ring) {
        if (y1 > p.1) != (y2 > p.1) {
            let x = x1 + (p.1 - y1) * (x2 - x1) / (y2 - y1);
            if p.0 < x {
                inside = !inside;
            }
        }
    }
    inside
}

fn point_seg_distance(p: Pt, (a, b): (Pt, Pt)) -> f64 {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len2 = dx * dx + dy * dy;
    let t = if len2 == 0.0 {
        0.0
    } else {
        (((p.0 - a.0) * dx + (p.1 - a.1) * dy) / len2).clamp(0.0, 1.0)
    };
    let (cx, cy) = (a.0 + t * dx, a.1 + t * dy);
    (p.0 - cx).hypot(p.1 - cy)
}

fn cross(o: Pt, a: Pt, b: Pt) -> f64 {
    (a.0 - o.0) * (b.1 - o.1) - (a.1 - o.1) * (b.0 - o.0)
}

fn segments_intersect((a, b): (Pt, Pt), (c, d): (Pt, Pt)) -> bool {
    let d1 = cross(c, d, a);
    let d2 = cross(c, d, b);
    let d3 = cross(a, b, c);
    let d4 = cross(a, b, d);
    (d1 * d2 < 0.0) && (d3 * d4 < 0.0)
}

fn seg_seg_distance(s: (Pt, Pt), t: (Pt, Pt)) -> f64 {
    if segments_intersect(s, t) {
        return 0.0;
    }
    point_seg_distance(s.0, t)
        .min(point_seg_distance(s.1, t))
        .min(point_seg_distance(t.0, s))
        .min(point_seg_distance(t.1, s))
}

/// Search box of an object. Boxes already cover the stroke, so two shapes that
/// touch have intersecting boxes; the extra unit absorbs rounding.
fn node_box(board: &Board, obj: ObjectRef, index: usize) -> Option<NodeBox> {
    let b = object_bounding_box(board, obj).expand(1);
    if b.is_empty() {
        return None;
    }
    let rect = Rectangle::from_corners([b.x1 as f64, b.y1 as f64], [b.x2 as f64, b.y2 as f64]);
    Some(GeomWithData::new(rect, index))
}

impl ConnectionLookup for GeometricLookup {
    fn find_connections(&self, board: &Board, seed: ObjectRef) -> FoundSet {
        let all_copper = copper_groups(board);
        let nodes: Vec<Node<'_>> = copper_objects(board)
            .into_iter()
            .filter_map(|obj| node(board, obj, &all_copper))
            .collect();

        let mut found = FoundSet::new();
        found.insert(seed);
        let Some(start) = nodes.iter().position(|n| n.obj == seed) else {
            return found;
        };

        let boxes: Vec<Option<NodeBox>> = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| node_box(board, n.obj, i))
            .collect();
        let tree = RTree::bulk_load(boxes.iter().flatten().cloned().collect());

        let mut queue = VecDeque::from([start]);
        let mut reached = vec![false; nodes.len()];
        reached[start] = true;
        while let Some(i) = queue.pop_front() {
            let Some(own) = &boxes[i] else {
                continue;
            };
            let envelope: AABB<[f64; 2]> = own.envelope();
            for candidate in tree.locate_in_envelope_intersecting(&envelope) {
                let j = candidate.data;
                if !reached[j] && connected(&nodes[i], &nodes[j]) {
                    reached[j] = true;
                    found.insert(nodes[j].obj);
                    queue.push_back(j);
                }
            }
        }
        tracing::trace!(seed = seed.kind_name(), reached = found.len(), "flood done");
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_distance_handles_crossings_and_gaps() {
        let a = ((0.0, 0.0), (10.0, 0.0));
        assert_eq!(seg_seg_distance(a, ((5.0, -5.0), (5.0, 5.0))), 0.0);
        assert_eq!(seg_seg_distance(a, ((12.0, 0.0), (20.0, 0.0))), 2.0);
        assert_eq!(seg_seg_distance(a, ((5.0, 3.0), (5.0, 3.0))), 3.0);
    }

    #[test]
    fn ring_containment() {
        let square = [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)];
        assert!(point_in_ring((5.0, 5.0), &square));
        assert!(!point_in_ring((15.0, 5.0), &square));
        assert!(!point_in_ring((5.0, 5.0), &square[..2]));
    }
}
