use std::path::PathBuf;
use std::process::Command;

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root")
        .to_path_buf()
}

#[test]
fn exit_code_usage_is_1_for_missing_args() {
    let bin = env!("CARGO_BIN_EXE_pcb2kicad");
    let status = Command::new(bin)
        .args(["export"])
        .status()
        .expect("run pcb2kicad");
    assert_eq!(status.code(), Some(1));
}

#[test]
fn exit_code_input_is_2_for_missing_file() {
    let bin = env!("CARGO_BIN_EXE_pcb2kicad");
    let out_dir = tempfile::tempdir().expect("tempdir");
    let missing = out_dir.path().join("nope.json");

    let status = Command::new(bin)
        .args(["export", missing.to_string_lossy().as_ref()])
        .status()
        .expect("run pcb2kicad export");
    assert_eq!(status.code(), Some(2));
}

#[test]
fn exit_code_input_is_2_for_invalid_yaml() {
    let bin = env!("CARGO_BIN_EXE_pcb2kicad");
    let out_dir = tempfile::tempdir().expect("tempdir");
    let bad = out_dir.path().join("bad.yaml");
    std::fs::write(&bad, "layers: [1, 2,").expect("write bad yaml");

    let status = Command::new(bin)
        .args(["export", bad.to_string_lossy().as_ref()])
        .status()
        .expect("run pcb2kicad export");
    assert_eq!(status.code(), Some(2));
}

#[test]
fn exit_code_input_is_2_for_bad_group_string() {
    let bin = env!("CARGO_BIN_EXE_pcb2kicad");
    let out_dir = tempfile::tempdir().expect("tempdir");
    let bad = out_dir.path().join("groups.json");
    std::fs::write(
        &bad,
        r#"{"max_width": 1000, "max_height": 1000, "max_copper_layer": 2, "groups": "1,c:3,s"}"#,
    )
    .expect("write board");

    let out = Command::new(bin)
        .args(["export", bad.to_string_lossy().as_ref()])
        .output()
        .expect("run pcb2kicad export");
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("invalid layer groups"));
}

#[test]
fn exit_code_input_is_2_for_unknown_extension() {
    let bin = env!("CARGO_BIN_EXE_pcb2kicad");
    let out_dir = tempfile::tempdir().expect("tempdir");
    let board = out_dir.path().join("board.pcb");
    std::fs::write(&board, "PCB[\"\" 1000 1000]").expect("write board");

    let out = Command::new(bin)
        .args(["export", board.to_string_lossy().as_ref()])
        .output()
        .expect("run pcb2kicad export");
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("unsupported board format"));
}

#[test]
fn exit_code_processing_is_3_for_unwritable_output() {
    let bin = env!("CARGO_BIN_EXE_pcb2kicad");
    let out_dir = tempfile::tempdir().expect("tempdir");
    let output = out_dir.path().join("missing-dir").join("board.kicad_pcb");
    let board = workspace_root().join("fixtures/boards/empty.json");

    let status = Command::new(bin)
        .args([
            "export",
            board.to_string_lossy().as_ref(),
            "--output",
            output.to_string_lossy().as_ref(),
        ])
        .status()
        .expect("run pcb2kicad export");
    assert_eq!(status.code(), Some(3));
}

#[test]
fn export_writes_requested_file() {
    let bin = env!("CARGO_BIN_EXE_pcb2kicad");
    let out_dir = tempfile::tempdir().expect("tempdir");
    let output = out_dir.path().join("two_pin.kicad_pcb");
    let board = workspace_root().join("fixtures/boards/two_pin.yaml");

    let status = Command::new(bin)
        .args([
            "export",
            board.to_string_lossy().as_ref(),
            "-o",
            output.to_string_lossy().as_ref(),
        ])
        .status()
        .expect("run pcb2kicad export");
    assert_eq!(status.code(), Some(0));

    let doc = std::fs::read_to_string(&output).expect("read output");
    assert!(doc.starts_with("(kicad_pcb\n"));
    assert!(doc.contains("\t(net 1 \"VIN\")"));
    assert!(doc.contains("\t(footprint \"geda:ACY100\""));
    assert!(doc.ends_with(")\n"));
}

#[test]
fn extents_prints_board_box() {
    let bin = env!("CARGO_BIN_EXE_pcb2kicad");
    let board = workspace_root().join("fixtures/boards/empty.json");

    let out = Command::new(bin)
        .args(["extents", board.to_string_lossy().as_ref()])
        .output()
        .expect("run pcb2kicad extents");
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(String::from_utf8_lossy(&out.stdout).trim(), "empty");
}
