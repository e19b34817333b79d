use std::path::PathBuf;

use pcb2kicad_core::{Board, Side};

fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../fixtures/boards")
        .join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("read {}: {e}", path.display()))
}

#[test]
fn group_string_fixture_loads() {
    let board: Board = serde_yaml::from_str(&fixture("grouped.yaml")).expect("parse board");
    assert_eq!(board.groups.len(), 3);
    assert_eq!(board.groups.members(0), &[0, 5]);
    assert_eq!(board.groups.members(1), &[1, 2]);
    assert_eq!(board.groups.members(2), &[3, 4]);
    assert_eq!(board.group_of_side(Side::Top), 0);
    assert_eq!(board.group_of_side(Side::Bottom), 2);
    assert_eq!(board.group_of_layer(2), 1);
}

#[test]
fn group_table_fixture_loads() {
    let board: Board = serde_yaml::from_str(&fixture("two_pin.yaml")).expect("parse board");
    assert_eq!(board.group_of_side(Side::Top), 0);
    assert_eq!(board.group_of_side(Side::Bottom), 1);
    assert_eq!(board.vias.len(), 1);
}

#[test]
fn group_string_naming_a_missing_layer_is_a_load_error() {
    let text = fixture("grouped.yaml").replace("\"1,c:2,3:4,s\"", "\"1,c:2,3:9,s\"");
    let err = serde_yaml::from_str::<Board>(&text).unwrap_err();
    assert!(
        err.to_string().contains("layer 9 does not exist"),
        "unexpected error: {err}"
    );
}
