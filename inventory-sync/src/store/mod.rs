//! Tabular store: workbooks made of named sheets, loaded from and saved to a backend
//!
//! The reconciler never talks to files directly. It receives a
//! [`TabularStore`] for each side of the run, so the same pass works over
//! `.xlsx` workbooks, directories of CSV files, or in-memory fixtures.

pub mod csv;
#[cfg(test)]
pub mod memory;
pub mod sheet;
pub mod value;
pub mod workbook;
pub mod xlsx;

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use self::csv::CsvStore;
pub use sheet::{Row, Sheet};
pub use value::CellValue;
pub use workbook::Workbook;
pub use xlsx::XlsxStore;

/// Errors raised by store backends
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("workbook not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("failed to read xlsx: {0}")]
    XlsxRead(#[from] calamine::XlsxError),

    #[error("failed to write xlsx: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("csv error: {0}")]
    Csv(#[from] ::csv::Error),
}

/// Backing store for workbooks
pub trait TabularStore {
    /// Load a workbook with all of its sheets
    fn open_workbook(&self, id: &str) -> Result<Workbook, StoreError>;

    /// Persist a workbook under `id` (which may differ from the id it was opened with)
    fn save_workbook(&self, workbook: &Workbook, id: &str) -> Result<(), StoreError>;
}

/// Which backend to use for a workbook identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    /// Pick `csv` for directories and `xlsx` for everything else
    #[default]
    Auto,
    Xlsx,
    Csv,
}

impl StoreKind {
    /// Resolve `Auto` against an identifier
    pub fn resolve(self, id: &str) -> StoreKind {
        match self {
            StoreKind::Auto if Path::new(id).is_dir() => StoreKind::Csv,
            StoreKind::Auto => StoreKind::Xlsx,
            other => other,
        }
    }
}

impl std::fmt::Display for StoreKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreKind::Auto => write!(f, "auto"),
            StoreKind::Xlsx => write!(f, "xlsx"),
            StoreKind::Csv => write!(f, "csv"),
        }
    }
}

/// Build the backend for an identifier
pub fn store_for(kind: StoreKind, id: &str) -> Box<dyn TabularStore> {
    match kind.resolve(id) {
        StoreKind::Csv => Box::new(CsvStore),
        _ => Box::new(XlsxStore),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_resolves_by_path_kind() {
        let dir = tempfile::tempdir().unwrap();
        let dir_id = dir.path().to_string_lossy().to_string();
        assert_eq!(StoreKind::Auto.resolve(&dir_id), StoreKind::Csv);
        assert_eq!(StoreKind::Auto.resolve("RVTools_export.xlsx"), StoreKind::Xlsx);
        assert_eq!(StoreKind::Csv.resolve("RVTools_export.xlsx"), StoreKind::Csv);
    }
}
