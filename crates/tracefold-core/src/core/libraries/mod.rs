//! Geometry lookup libraries backing the reconstruction pipeline.
//!
//! Both libraries key pre-computed fragment coordinates (expressed in the
//! local frame of a C-alpha window) by discretized inter-C-alpha distances.
//! Lookups are total for non-empty libraries: a miss falls back to the
//! nearest populated bin instead of failing.

pub mod quadrilateral;
pub mod rotamer;

use thiserror::Error;

pub use quadrilateral::{QuadrilateralEntry, QuadrilateralLibrary};
pub use rotamer::{Rotamer, RotamerLibrary};

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },

    #[error("Malformed entry in '{path}' at line {line}: {reason}")]
    Parse {
        path: String,
        line: usize,
        reason: String,
    },

    #[error("Library '{path}' contains no entries")]
    Empty { path: String },
}
