use serde::Deserialize;
use thiserror::Error;

use crate::board::{Arc, Board, Element, Layer, Netlist, Via, FIXED_ROTATION_ATTR};
use crate::groups::{GroupParseError, LayerGroups};
use crate::Coord;

#[derive(Debug, Error, PartialEq)]
pub enum BoardError {
    #[error("invalid layer groups: {0}")]
    Groups(#[from] GroupParseError),

    #[error("{what} must be a finite number, got {value}")]
    NonFinite { what: String, value: f64 },
}

/// Layer groups as written in a board file: an explicit table of layer
/// indices, or a group string such as `"1,c:2,s"`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GroupsField {
    Table(LayerGroups),
    Text(String),
}

impl Default for GroupsField {
    fn default() -> Self {
        GroupsField::Table(LayerGroups::default())
    }
}

/// On-disk shape of [`Board`].
#[derive(Debug, Deserialize)]
pub(crate) struct BoardFile {
    #[serde(default)]
    filename: Option<String>,
    max_width: Coord,
    max_height: Coord,
    #[serde(default)]
    isle_area: f64,
    #[serde(default)]
    layers: Vec<Layer>,
    #[serde(default)]
    max_copper_layer: usize,
    #[serde(default)]
    groups: GroupsField,
    #[serde(default)]
    elements: Vec<Element>,
    #[serde(default)]
    vias: Vec<Via>,
    #[serde(default)]
    netlist: Netlist,
}

impl TryFrom<BoardFile> for Board {
    type Error = BoardError;

    fn try_from(file: BoardFile) -> Result<Self, BoardError> {
        let groups = match file.groups {
            GroupsField::Table(groups) => groups,
            GroupsField::Text(text) => LayerGroups::parse(&text, file.max_copper_layer)?,
        };
        let board = Board {
            filename: file.filename,
            max_width: file.max_width,
            max_height: file.max_height,
            isle_area: file.isle_area,
            layers: file.layers,
            max_copper_layer: file.max_copper_layer,
            groups,
            elements: file.elements,
            vias: file.vias,
            netlist: file.netlist,
        };
        check_finite(&board)?;
        Ok(board)
    }
}

fn finite(what: impl FnOnce() -> String, value: f64) -> Result<(), BoardError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(BoardError::NonFinite { what: what(), value })
    }
}

fn check_arcs(arcs: &[Arc], owner: &str) -> Result<(), BoardError> {
    for (i, arc) in arcs.iter().enumerate() {
        finite(|| format!("start angle of arc {i} on {owner}"), arc.start_angle)?;
        finite(|| format!("delta of arc {i} on {owner}"), arc.delta)?;
    }
    Ok(())
}

fn check_finite(board: &Board) -> Result<(), BoardError> {
    finite(|| "isle_area".to_string(), board.isle_area)?;
    for layer in &board.layers {
        check_arcs(&layer.arcs, &format!("layer {:?}", layer.name))?;
    }
    for element in &board.elements {
        let owner = format!("element {:?}", element.refdes.string);
        check_arcs(&element.arcs, &owner)?;
        // Unparsable text is tolerated at export time; "inf" and "NaN" parse.
        if let Some(Ok(theta)) = element
            .attribute(FIXED_ROTATION_ATTR)
            .map(|v| v.trim().parse::<f64>())
        {
            finite(|| format!("{FIXED_ROTATION_ATTR} of {owner}"), theta)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SKELETON: &str = r#""max_width": 1000, "max_height": 1000, "max_copper_layer": 2"#;

    #[test]
    fn groups_accept_table_or_string() {
        let table: Board =
            serde_json::from_str(&format!(r#"{{{SKELETON}, "groups": [[0, 3], [1, 2]]}}"#))
                .unwrap();
        let text: Board =
            serde_json::from_str(&format!(r#"{{{SKELETON}, "groups": "1,c:2,s"}}"#)).unwrap();
        assert_eq!(table.groups, text.groups);
    }

    #[test]
    fn bad_group_string_fails_the_load() {
        let json = format!(r#"{{{SKELETON}, "groups": "1,c:7,s"}}"#);
        let err = serde_json::from_str::<Board>(&json).unwrap_err();
        assert!(err.to_string().contains("invalid layer groups"), "{err}");
    }

    #[test]
    fn infinite_fixed_rotation_is_rejected() {
        let json = format!(
            r#"{{{SKELETON}, "elements": [{{
                "mark_x": 0, "mark_y": 0,
                "refdes": {{"x": 0, "y": 0, "string": "U1"}},
                "attributes": {{"xy-fixed-rotation": "inf"}}
            }}]}}"#
        );
        let err = serde_json::from_str::<Board>(&json).unwrap_err();
        assert!(err.to_string().contains("xy-fixed-rotation of element \"U1\""), "{err}");
    }

    #[test]
    fn unparsable_fixed_rotation_still_loads() {
        let json = format!(
            r#"{{{SKELETON}, "elements": [{{
                "mark_x": 0, "mark_y": 0,
                "attributes": {{"xy-fixed-rotation": "sideways"}}
            }}]}}"#
        );
        assert!(serde_json::from_str::<Board>(&json).is_ok());
    }

    #[test]
    fn non_finite_arc_angle_is_rejected() {
        let file = BoardFile {
            filename: None,
            max_width: 0,
            max_height: 0,
            isle_area: 0.0,
            layers: vec![Layer {
                arcs: vec![Arc {
                    x: 0,
                    y: 0,
                    width: 10,
                    height: 10,
                    thickness: 1,
                    start_angle: f64::NAN,
                    delta: 90.0,
                }],
                ..Layer::new("top", crate::LayerKind::Copper)
            }],
            max_copper_layer: 1,
            groups: GroupsField::default(),
            elements: Vec::new(),
            vias: Vec::new(),
            netlist: Netlist::default(),
        };
        assert!(matches!(Board::try_from(file), Err(BoardError::NonFinite { .. })));
    }
}
