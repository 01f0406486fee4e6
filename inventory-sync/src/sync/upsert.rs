//! Update-or-insert of a single record into a table, keyed by one field

use serde::{Deserialize, Serialize};

use super::{CandidateRecord, HeaderIndex, SyncError, TableLayout};
use crate::store::{Row, Sheet};

/// Which rows are updated when several share the same key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MatchPolicy {
    /// Every row with a matching key is updated
    #[default]
    All,
    /// Only the first row with a matching key is updated
    First,
}

impl std::fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchPolicy::All => write!(f, "all"),
            MatchPolicy::First => write!(f, "first"),
        }
    }
}

/// What an upsert did to the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// Existing rows matched the key. `changed_cells` counts cells whose value differed.
    Updated { rows: Vec<u32>, changed_cells: usize },
    /// No row matched; a new row was appended
    Appended { row: u32 },
}

impl UpsertOutcome {
    /// Rows touched by the upsert, 1-based
    pub fn rows(&self) -> Vec<u32> {
        match self {
            UpsertOutcome::Updated { rows, .. } => rows.clone(),
            UpsertOutcome::Appended { row } => vec![*row],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UpsertOutcome::Updated { changed_cells: 0, .. } => "unchanged",
            UpsertOutcome::Updated { .. } => "updated",
            UpsertOutcome::Appended { .. } => "appended",
        }
    }
}

/// Merges candidate records into a table laid out by `layout`
#[derive(Debug, Clone)]
pub struct Upserter {
    key_field: String,
    layout: TableLayout,
    policy: MatchPolicy,
}

impl Upserter {
    pub fn new(key_field: impl Into<String>, layout: TableLayout, policy: MatchPolicy) -> Self {
        Upserter {
            key_field: key_field.into(),
            layout,
            policy,
        }
    }

    pub fn key_field(&self) -> &str {
        &self.key_field
    }

    pub fn layout(&self) -> TableLayout {
        self.layout
    }

    /// Update the rows whose key matches `record`, or append a new row.
    ///
    /// Data rows are re-read on every call so a row appended by an earlier
    /// record is matched by a later record with the same key.
    ///
    /// On update only fields the record defines are written; every other cell
    /// keeps its value. On insert every header gets the record's value or an
    /// empty cell.
    pub fn upsert(
        &self,
        table: &mut Sheet,
        headers: &HeaderIndex,
        record: &CandidateRecord,
    ) -> Result<UpsertOutcome, SyncError> {
        let key_col = headers.require(&self.key_field)?;
        let key = record
            .defined(&self.key_field)
            .ok_or_else(|| SyncError::MissingKey {
                field: self.key_field.clone(),
            })?;

        let data_start = self.layout.data_start();
        let data_rows = table.read_data_rows(data_start);
        let matched = data_rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.get(key_col) == Some(key))
            .map(|(idx, _)| data_start + idx as u32);

        let rows: Vec<u32> = match self.policy {
            MatchPolicy::All => matched.collect(),
            MatchPolicy::First => matched.take(1).collect(),
        };

        if rows.is_empty() {
            let new_row: Row = headers
                .names()
                .iter()
                .map(|header| record.defined(header).cloned().unwrap_or_default())
                .collect();
            let row = table.append_row(new_row);
            log::debug!("{}: appended {} at row {}", table.name(), key, row);
            return Ok(UpsertOutcome::Appended { row });
        }

        let mut changed_cells = 0;
        for &row in &rows {
            for (idx, header) in headers.names().iter().enumerate() {
                let Some(value) = record.defined(header) else {
                    continue;
                };
                let col = idx as u32 + 1;
                if table.cell(row, col) != value {
                    table.write_cell(row, col, value.clone());
                    changed_cells += 1;
                }
            }
        }

        log::debug!(
            "{}: {} matched rows {:?} ({} cells changed)",
            table.name(),
            key,
            rows,
            changed_cells
        );
        Ok(UpsertOutcome::Updated { rows, changed_cells })
    }
}
