//! KiCad PCB export.
//!
//! [`export_board`] is the host entry point; [`write_kicad_pcb`] streams the
//! document into any writer with injectable identifier and connectivity
//! sources.

mod footprint;
pub mod ids;
pub mod layers;
pub mod placement;
pub mod sexpr;
pub mod writer;

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use pcb2kicad_core::Board;
use pcb2kicad_nets::GeometricLookup;

pub use ids::{IdSource, RandomIds, SequentialIds};
pub use layers::{classify_layer, LayerTarget, SideLayers, LAYER_TABLE};
pub use placement::{rotation_of, transform_offset, xy_to_angle, Placement, REFERENCE_PIN_NAMES};
pub use writer::{write_kicad_pcb, KICAD_VERSION};

/// Output file used when none is configured.
pub const DEFAULT_OUTPUT: &str = "pcb-out.kicad_pcb";

pub const KICAD_EXTENSION: &str = "kicad_pcb";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("cannot open file {} for writing: {source}", path.display())]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    pub output: PathBuf,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

impl ExportOptions {
    /// Output next to the board file, falling back to [`DEFAULT_OUTPUT`].
    #[must_use]
    pub fn for_board(board: &Board) -> Self {
        match board.filename.as_deref() {
            Some(name) if !name.is_empty() => Self {
                output: derive_default_filename(name),
            },
            _ => Self::default(),
        }
    }
}

/// `board.pcb` -> `board.kicad_pcb`.
#[must_use]
pub fn derive_default_filename(board_filename: &str) -> PathBuf {
    Path::new(board_filename).with_extension(KICAD_EXTENSION)
}

/// Write `board` to `options.output` with random identifiers and the
/// geometric connectivity search.
pub fn try_export(board: &Board, options: &ExportOptions) -> Result<(), ExportError> {
    let file = File::create(&options.output).map_err(|source| ExportError::CreateOutput {
        path: options.output.clone(),
        source,
    })?;
    let mut out = BufWriter::new(file);
    write_kicad_pcb(board, &mut out, &mut RandomIds, &GeometricLookup)?;
    tracing::info!(path = %options.output.display(), "exported KiCad board");
    Ok(())
}

/// Export with every layer shown, restoring visibility afterwards.
///
/// Returns 0 on success and 1 when the output cannot be written; the failure
/// is logged.
pub fn export_board(board: &mut Board, options: &ExportOptions) -> i32 {
    let saved = board.save_and_show_layers();
    let result = try_export(board, options);
    board.restore_layers(saved);
    match result {
        Ok(()) => 0,
        Err(err) => {
            tracing::error!("{err}");
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filename_swaps_extension() {
        assert_eq!(
            derive_default_filename("boards/amp.pcb"),
            PathBuf::from("boards/amp.kicad_pcb")
        );
        assert_eq!(derive_default_filename("amp"), PathBuf::from("amp.kicad_pcb"));
    }

    #[test]
    fn options_default_to_fixed_name() {
        assert_eq!(ExportOptions::default().output, PathBuf::from(DEFAULT_OUTPUT));
        let mut board = Board::default();
        assert_eq!(ExportOptions::for_board(&board), ExportOptions::default());
        board.filename = Some("x.pcb".into());
        assert_eq!(ExportOptions::for_board(&board).output, PathBuf::from("x.kicad_pcb"));
    }
}
