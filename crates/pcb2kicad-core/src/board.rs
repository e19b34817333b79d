use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::groups::LayerGroups;
use crate::load::BoardFile;
use crate::Coord;

/// Element attribute that pins the exported rotation to a literal angle.
pub const FIXED_ROTATION_ATTR: &str = "xy-fixed-rotation";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: Coord,
    pub y: Coord,
}

impl Point {
    #[must_use]
    pub const fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Bottom,
}

impl Side {
    /// Index of the silk layer belonging to this side. Silk layers follow the
    /// copper layers: bottom first, then top.
    #[must_use]
    pub fn silk_layer(self, max_copper_layer: usize) -> usize {
        match self {
            Side::Bottom => max_copper_layer,
            Side::Top => max_copper_layer + 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinShape {
    #[default]
    Round,
    Square,
    Octagon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    #[default]
    Copper,
    Silk,
    Outline,
    Notes,
    Mask,
    Paste,
    Fab,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub p1: Point,
    pub p2: Point,
    pub thickness: Coord,
    #[serde(default)]
    pub clearance: Coord,
}

/// Elliptical arc. Points sit at `(x - width*cos(a), y + height*sin(a))` for
/// angles `a` (degrees) from `start_angle` to `start_angle + delta`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    pub x: Coord,
    pub y: Coord,
    pub width: Coord,
    pub height: Coord,
    pub thickness: Coord,
    pub start_angle: f64,
    pub delta: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub x: Coord,
    pub y: Coord,
    /// Quadrant direction, 0..=3 (multiples of 90 degrees).
    #[serde(default)]
    pub direction: u8,
    #[serde(default = "default_scale")]
    pub scale: u32,
    #[serde(default)]
    pub string: String,
    #[serde(default)]
    pub on_solder: bool,
}

fn default_scale() -> u32 {
    100
}

impl Default for Text {
    fn default() -> Self {
        Self::at(0, 0, "")
    }
}

impl Text {
    #[must_use]
    pub fn at(x: Coord, y: Coord, string: &str) -> Self {
        Self {
            x,
            y,
            direction: 0,
            scale: default_scale(),
            string: string.to_string(),
            on_solder: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub points: Vec<Point>,
    /// Start index of each hole contour inside `points`.
    #[serde(default)]
    pub hole_indices: Vec<usize>,
    #[serde(default)]
    pub full_poly: bool,
    #[serde(default = "default_true")]
    pub clear_poly: bool,
}

fn default_true() -> bool {
    true
}

impl Polygon {
    #[must_use]
    pub fn new(points: Vec<Point>) -> Self {
        Self {
            points,
            hole_indices: Vec::new(),
            full_poly: false,
            clear_poly: true,
        }
    }

    /// Outer boundary: everything before the first hole.
    #[must_use]
    pub fn outer(&self) -> &[Point] {
        let end = self
            .hole_indices
            .first()
            .copied()
            .unwrap_or(self.points.len())
            .min(self.points.len());
        &self.points[..end]
    }

    /// Hole contours in declaration order. Out-of-range indices are clamped so a
    /// malformed hole list yields empty contours instead of panicking.
    pub fn holes(&self) -> impl Iterator<Item = &[Point]> + '_ {
        let n = self.points.len();
        self.hole_indices.iter().enumerate().map(move |(h, &start)| {
            let end = self.hole_indices.get(h + 1).copied().unwrap_or(n).min(n);
            let start = start.min(end);
            &self.points[start..end]
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Layer {
    pub name: String,
    pub kind: LayerKind,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub lines: Vec<Line>,
    #[serde(default)]
    pub arcs: Vec<Arc>,
    #[serde(default)]
    pub polygons: Vec<Polygon>,
    #[serde(default)]
    pub texts: Vec<Text>,
}

impl Layer {
    #[must_use]
    pub fn new(name: &str, kind: LayerKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            visible: true,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    pub x: Coord,
    pub y: Coord,
    pub thickness: Coord,
    #[serde(default)]
    pub drill: Coord,
    #[serde(default)]
    pub mask: Coord,
    #[serde(default)]
    pub clearance: Coord,
    pub number: String,
    #[serde(default)]
    pub shape: PinShape,
    /// Non-plated mounting hole.
    #[serde(default)]
    pub hole: bool,
    /// Thermal style per copper layer; 0 means no thermal.
    #[serde(default)]
    pub thermals: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pad {
    pub p1: Point,
    pub p2: Point,
    pub thickness: Coord,
    #[serde(default)]
    pub mask: Coord,
    #[serde(default)]
    pub clearance: Coord,
    pub number: String,
    #[serde(default)]
    pub shape: PinShape,
    #[serde(default)]
    pub on_solder: bool,
    #[serde(default)]
    pub no_paste: bool,
    #[serde(default)]
    pub thermals: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Via {
    pub x: Coord,
    pub y: Coord,
    pub thickness: Coord,
    #[serde(default)]
    pub drill: Coord,
    #[serde(default)]
    pub clearance: Coord,
    #[serde(default)]
    pub thermals: Vec<u8>,
}

/// A footprint instance. Pin, pad, line and arc coordinates are absolute board
/// coordinates; `mark_x/mark_y` is the placement reference point.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Element {
    /// Footprint name.
    #[serde(default)]
    pub description: Text,
    /// Reference designator.
    #[serde(default)]
    pub refdes: Text,
    #[serde(default)]
    pub value: Text,
    pub mark_x: Coord,
    pub mark_y: Coord,
    #[serde(default)]
    pub on_solder: bool,
    #[serde(default)]
    pub hide_name: bool,
    #[serde(default)]
    pub pins: Vec<Pin>,
    #[serde(default)]
    pub pads: Vec<Pad>,
    #[serde(default)]
    pub lines: Vec<Line>,
    #[serde(default)]
    pub arcs: Vec<Arc>,
    #[serde(default)]
    pub attributes: IndexMap<String, String>,
}

impl Element {
    #[must_use]
    pub fn side(&self) -> Side {
        if self.on_solder {
            Side::Bottom
        } else {
            Side::Top
        }
    }

    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NetDef {
    pub name: String,
    /// Member pins as `"<refdes>-<pin number>"`.
    #[serde(default)]
    pub entries: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Netlist {
    pub nets: Vec<NetDef>,
}

/// Layer visibility captured by [`Board::save_and_show_layers`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedVisibility(Vec<bool>);

/// A loaded board. Deserialization goes through [`BoardFile`], which accepts
/// layer groups as a table or as a group string and rejects non-finite
/// numbers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "BoardFile")]
pub struct Board {
    pub filename: Option<String>,
    pub max_width: Coord,
    pub max_height: Coord,
    /// Minimum polygon island area, in square nanometres.
    pub isle_area: f64,
    /// Copper layers first, then bottom silk, then top silk.
    pub layers: Vec<Layer>,
    pub max_copper_layer: usize,
    pub groups: LayerGroups,
    pub elements: Vec<Element>,
    pub vias: Vec<Via>,
    pub netlist: Netlist,
}

impl Board {
    /// Indices of the copper layers that exist in `layers`.
    pub fn copper_layer_indices(&self) -> std::ops::Range<usize> {
        0..self.max_copper_layer.min(self.layers.len())
    }

    #[must_use]
    pub fn group_of_layer(&self, layer: usize) -> usize {
        self.groups.group_of_layer(layer)
    }

    #[must_use]
    pub fn group_of_side(&self, side: Side) -> usize {
        self.groups.group_of_side(side, self.max_copper_layer)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
            && self.vias.is_empty()
            && self.layers.iter().all(|l| {
                l.lines.is_empty() && l.arcs.is_empty() && l.polygons.is_empty() && l.texts.is_empty()
            })
    }

    /// Turn every layer on, returning the previous state.
    pub fn save_and_show_layers(&mut self) -> SavedVisibility {
        let saved = self.layers.iter().map(|l| l.visible).collect();
        for layer in &mut self.layers {
            layer.visible = true;
        }
        SavedVisibility(saved)
    }

    pub fn restore_layers(&mut self, saved: SavedVisibility) {
        for (layer, visible) in self.layers.iter_mut().zip(saved.0) {
            layer.visible = visible;
        }
    }
}
