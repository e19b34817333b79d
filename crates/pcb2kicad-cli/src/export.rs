use std::path::{Path, PathBuf};

use pcb2kicad_core::Board;
use pcb2kicad_export::sexpr::mm;
use pcb2kicad_export::{export_board, ExportOptions};
use pcb2kicad_geometry::{board_bounding_box, Font};

use crate::error::CliError;

/// Read a board from JSON or YAML, picked by file extension.
pub fn load_board(path: &Path) -> Result<Board, CliError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CliError::ReadBoard {
        path: path.to_path_buf(),
        source,
    })?;
    let parse_error = |message: String| CliError::ParseBoard {
        path: path.to_path_buf(),
        message,
    };
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let mut board: Board = match ext.as_deref() {
        Some("json") => serde_json::from_str(&raw).map_err(|e| parse_error(e.to_string()))?,
        Some("yaml" | "yml") => serde_yaml::from_str(&raw).map_err(|e| parse_error(e.to_string()))?,
        _ => {
            return Err(CliError::UnsupportedFormat {
                path: path.to_path_buf(),
            })
        }
    };
    if board.filename.as_deref().map_or(true, str::is_empty) {
        board.filename = Some(path.to_string_lossy().into_owned());
    }
    tracing::debug!(
        path = %path.display(),
        layers = board.layers.len(),
        elements = board.elements.len(),
        vias = board.vias.len(),
        "loaded board"
    );
    Ok(board)
}

pub fn run_export(input: &Path, output: Option<PathBuf>) -> Result<(), CliError> {
    let mut board = load_board(input)?;
    let options = match output {
        Some(output) => ExportOptions { output },
        None => ExportOptions::for_board(&board),
    };
    if export_board(&mut board, &options) != 0 {
        return Err(CliError::Export {
            path: options.output,
        });
    }
    println!("{}", options.output.display());
    Ok(())
}

pub fn run_extents(input: &Path) -> Result<(), CliError> {
    let board = load_board(input)?;
    match board_bounding_box(&board, &Font::default()) {
        Some(b) => println!("{} {} {} {}", mm(b.x1), mm(b.y1), mm(b.x2), mm(b.y2)),
        None => println!("empty"),
    }
    Ok(())
}
