use std::path::PathBuf;

use thiserror::Error;

/// Exit code for a malformed command line; clap reports these itself.
pub const EXIT_USAGE: u8 = 1;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("could not read board {}: {source}", path.display())]
    ReadBoard {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported board format: {} (expected .json, .yaml or .yml)", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("could not parse board {}: {message}", path.display())]
    ParseBoard { path: PathBuf, message: String },

    #[error("export to {} failed", path.display())]
    Export { path: PathBuf },
}

impl CliError {
    /// Process exit code: 2 when the board could not be loaded, 3 when the
    /// export itself failed.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::ReadBoard { .. }
            | CliError::UnsupportedFormat { .. }
            | CliError::ParseBoard { .. } => 2,
            CliError::Export { .. } => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_failures_and_export_failures_exit_differently() {
        let path = PathBuf::from("board.json");
        let read = CliError::ReadBoard {
            path: path.clone(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(read.exit_code(), 2);
        assert_eq!(read.to_string(), "could not read board board.json: gone");
        assert_eq!(CliError::UnsupportedFormat { path: path.clone() }.exit_code(), 2);
        assert_eq!(
            CliError::ParseBoard { path: path.clone(), message: "bad".into() }.exit_code(),
            2
        );
        assert_eq!(CliError::Export { path }.exit_code(), 3);
    }
}
