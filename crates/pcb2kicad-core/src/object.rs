use crate::board::Board;

/// Identity of a copper-bearing board object.
///
/// Two references are equal only when they name the same slot of the same
/// collection; object contents are never compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectRef {
    Pin { element: usize, index: usize },
    Pad { element: usize, index: usize },
    Via(usize),
    Line { layer: usize, index: usize },
    Arc { layer: usize, index: usize },
    Polygon { layer: usize, index: usize },
}

impl ObjectRef {
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            ObjectRef::Pin { .. } => "pin",
            ObjectRef::Pad { .. } => "pad",
            ObjectRef::Via(_) => "via",
            ObjectRef::Line { .. } => "line",
            ObjectRef::Arc { .. } => "arc",
            ObjectRef::Polygon { .. } => "polygon",
        }
    }

    /// Whether this object still exists on `board`.
    #[must_use]
    pub fn exists_in(&self, board: &Board) -> bool {
        match *self {
            ObjectRef::Pin { element, index } => board
                .elements
                .get(element)
                .is_some_and(|e| index < e.pins.len()),
            ObjectRef::Pad { element, index } => board
                .elements
                .get(element)
                .is_some_and(|e| index < e.pads.len()),
            ObjectRef::Via(index) => index < board.vias.len(),
            ObjectRef::Line { layer, index } => board
                .layers
                .get(layer)
                .is_some_and(|l| index < l.lines.len()),
            ObjectRef::Arc { layer, index } => board
                .layers
                .get(layer)
                .is_some_and(|l| index < l.arcs.len()),
            ObjectRef::Polygon { layer, index } => board
                .layers
                .get(layer)
                .is_some_and(|l| index < l.polygons.len()),
        }
    }
}

/// Every copper-bearing object in traversal order: per element its pads then
/// its pins, then vias, then per copper layer its lines, arcs and polygons.
#[must_use]
pub fn copper_objects(board: &Board) -> Vec<ObjectRef> {
    let mut out = Vec::new();
    for (e, element) in board.elements.iter().enumerate() {
        out.extend((0..element.pads.len()).map(|index| ObjectRef::Pad { element: e, index }));
        out.extend((0..element.pins.len()).map(|index| ObjectRef::Pin { element: e, index }));
    }
    out.extend((0..board.vias.len()).map(ObjectRef::Via));
    for layer in board.copper_layer_indices() {
        let l = &board.layers[layer];
        out.extend((0..l.lines.len()).map(|index| ObjectRef::Line { layer, index }));
        out.extend((0..l.arcs.len()).map(|index| ObjectRef::Arc { layer, index }));
        out.extend((0..l.polygons.len()).map(|index| ObjectRef::Polygon { layer, index }));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Element, Layer, LayerKind, Line, Pad, Pin, Point, Via};

    fn pin(number: &str) -> Pin {
        Pin {
            x: 0,
            y: 0,
            thickness: 10,
            drill: 0,
            mask: 0,
            clearance: 0,
            number: number.to_string(),
            shape: Default::default(),
            hole: false,
            thermals: Vec::new(),
        }
    }

    #[test]
    fn traversal_visits_pads_before_pins_and_skips_silk() {
        let mut board = Board::default();
        let mut element = Element::default();
        element.pins.push(pin("1"));
        element.pads.push(Pad {
            p1: Point::new(0, 0),
            p2: Point::new(0, 0),
            thickness: 10,
            mask: 0,
            clearance: 0,
            number: "2".into(),
            shape: Default::default(),
            on_solder: false,
            no_paste: false,
            thermals: Vec::new(),
        });
        board.elements.push(element);
        board.vias.push(Via {
            x: 0,
            y: 0,
            thickness: 10,
            drill: 5,
            clearance: 0,
            thermals: Vec::new(),
        });
        let line = Line {
            p1: Point::new(0, 0),
            p2: Point::new(1, 0),
            thickness: 1,
            clearance: 0,
        };
        let mut copper = Layer::new("top", LayerKind::Copper);
        copper.lines.push(line.clone());
        let mut silk = Layer::new("silk", LayerKind::Silk);
        silk.lines.push(line);
        board.layers = vec![copper, silk];
        board.max_copper_layer = 1;

        let objs = copper_objects(&board);
        assert_eq!(
            objs,
            vec![
                ObjectRef::Pad { element: 0, index: 0 },
                ObjectRef::Pin { element: 0, index: 0 },
                ObjectRef::Via(0),
                ObjectRef::Line { layer: 0, index: 0 },
            ]
        );
        assert!(objs.iter().all(|o| o.exists_in(&board)));
        assert!(!ObjectRef::Line { layer: 1, index: 3 }.exists_in(&board));
    }
}
