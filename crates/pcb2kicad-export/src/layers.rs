use pcb2kicad_core::{Board, LayerKind, Side};

/// Fixed KiCad layer table: ordinal, canonical name, type and optional user
/// name.
pub const LAYER_TABLE: &[(u32, &str, &str, Option<&str>)] = &[
    (0, "F.Cu", "signal", None),
    (1, "In1.Cu", "signal", None),
    (2, "In2.Cu", "signal", None),
    (31, "B.Cu", "signal", None),
    (32, "B.Adhes", "user", None),
    (33, "F.Adhes", "user", None),
    (34, "B.Paste", "user", None),
    (35, "F.Paste", "user", None),
    (36, "B.SilkS", "user", None),
    (37, "F.SilkS", "user", None),
    (38, "B.Mask", "user", None),
    (39, "F.Mask", "user", None),
    (40, "Dwgs.User", "user", None),
    (41, "Cmts.User", "user", None),
    (42, "Eco1.User", "user", None),
    (43, "Eco2.User", "user", None),
    (44, "Edge.Cuts", "user", None),
    (45, "Margin", "user", None),
    (46, "B.CrtYd", "user", Some("B.Courtyard")),
    (47, "F.CrtYd", "user", Some("F.Courtyard")),
    (48, "B.Fab", "user", None),
    (49, "F.Fab", "user", None),
    (50, "User.1", "user", None),
    (51, "User.2", "user", None),
    (52, "User.3", "user", None),
    (53, "User.4", "user", None),
    (54, "User.5", "user", None),
    (55, "User.6", "user", None),
    (56, "User.7", "user", None),
    (57, "User.8", "user", None),
    (58, "User.9", "user", None),
];

/// Layer names used by a footprint and its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SideLayers {
    pub copper: &'static str,
    pub silk: &'static str,
    pub fab: &'static str,
    pub paste: &'static str,
    pub mask: &'static str,
}

impl SideLayers {
    #[must_use]
    pub fn of(side: Side) -> Self {
        match side {
            Side::Top => Self {
                copper: "F.Cu",
                silk: "F.SilkS",
                fab: "F.Fab",
                paste: "F.Paste",
                mask: "F.Mask",
            },
            Side::Bottom => Self {
                copper: "B.Cu",
                silk: "B.SilkS",
                fab: "B.Fab",
                paste: "B.Paste",
                mask: "B.Mask",
            },
        }
    }
}

/// Where the objects of one board layer go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerTarget {
    /// Tracks, arcs and zones carrying nets.
    Copper(String),
    /// Graphic lines, arcs and texts.
    Graphic(String),
    Skip,
}

/// Map a board layer onto a KiCad layer through its group and kind.
#[must_use]
pub fn classify_layer(board: &Board, index: usize) -> LayerTarget {
    let Some(layer) = board.layers.get(index) else {
        return LayerTarget::Skip;
    };
    let group = board.group_of_layer(index);
    let top = board.group_of_side(Side::Top);
    let bottom = board.group_of_side(Side::Bottom);

    match layer.kind {
        LayerKind::Silk => {
            if group == bottom && group != top {
                LayerTarget::Graphic("B.SilkS".into())
            } else {
                // Silk outside both side groups lands on the front.
                LayerTarget::Graphic("F.SilkS".into())
            }
        }
        LayerKind::Outline => LayerTarget::Graphic("Edge.Cuts".into()),
        LayerKind::Copper => {
            if group == top {
                LayerTarget::Copper("F.Cu".into())
            } else if group == bottom {
                LayerTarget::Copper("B.Cu".into())
            } else if layer.name == "outline" {
                LayerTarget::Graphic("Edge.Cuts".into())
            } else {
                LayerTarget::Copper(format!("In{group}.Cu"))
            }
        }
        // Notes go to the comments layer rather than being dropped.
        LayerKind::Notes => LayerTarget::Graphic("Cmts.User".into()),
        LayerKind::Mask | LayerKind::Paste | LayerKind::Fab => {
            tracing::warn!(layer = %layer.name, kind = ?layer.kind, "unsupported layer type, skipping");
            LayerTarget::Skip
        }
    }
}
