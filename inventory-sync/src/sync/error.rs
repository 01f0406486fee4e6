use thiserror::Error;

use crate::store::StoreError;

/// Errors that abort a sync run
#[derive(Error, Debug)]
pub enum SyncError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("sheet '{table}' not found in workbook {workbook}")]
    MissingTable { workbook: String, table: String },

    #[error("column '{header}' not found in the header row of sheet '{table}'")]
    MissingHeader { table: String, header: String },

    #[error("record has no value for key field '{field}'")]
    MissingKey { field: String },
}

impl SyncError {
    /// Missing sheets and missing header columns are setup problems, not data problems
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SyncError::MissingTable { .. } | SyncError::MissingHeader { .. }
        )
    }
}
