//! Header row lookup and per-table layout

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::SyncError;
use crate::store::Sheet;

/// Where a table's header row sits; data starts on the row after it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableLayout {
    pub header_row: u32,
}

impl TableLayout {
    pub fn new(header_row: u32) -> Self {
        TableLayout { header_row }
    }

    pub fn data_start(&self) -> u32 {
        self.header_row.saturating_add(1)
    }
}

/// Header names with a precomputed name -> column map
///
/// Matching is exact string equality. If a name appears twice the leftmost
/// column wins.
#[derive(Debug, Clone)]
pub struct HeaderIndex {
    table: String,
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

impl HeaderIndex {
    pub fn new(table: impl Into<String>, names: Vec<String>) -> Self {
        let mut positions = HashMap::new();
        for (idx, name) in names.iter().enumerate() {
            if name.is_empty() {
                continue;
            }
            positions.entry(name.clone()).or_insert(idx);
        }
        HeaderIndex {
            table: table.into(),
            names,
            positions,
        }
    }

    /// Read the header row of `sheet` as laid out by `layout`
    pub fn read(sheet: &Sheet, layout: TableLayout) -> Self {
        Self::new(sheet.name(), sheet.read_headers(layout.header_row))
    }

    /// Header names in column order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// 0-based column of a header
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    /// Like [`HeaderIndex::position`], but a missing header is a configuration error
    pub fn require(&self, name: &str) -> Result<usize, SyncError> {
        self.position(name).ok_or_else(|| SyncError::MissingHeader {
            table: self.table.clone(),
            header: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> HeaderIndex {
        HeaderIndex::new("Servidores UNIX", names.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_first_duplicate_wins() {
        let index = headers(&["HOSTNAME", "IP PROD", "HOSTNAME"]);
        assert_eq!(index.position("HOSTNAME"), Some(0));
        assert_eq!(index.position("IP PROD"), Some(1));
    }

    #[test]
    fn test_lookup_is_exact() {
        let index = headers(&["HOSTNAME", "IP PROD"]);
        assert_eq!(index.position("hostname"), None);
        assert_eq!(index.position("IP PROD "), None);
        assert_eq!(index.position(""), None);
    }

    #[test]
    fn test_require_missing_header_is_configuration_error() {
        let index = headers(&["NAME", "IP PROD"]);
        let err = index.require("HOSTNAME").unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("HOSTNAME"));
        assert!(err.to_string().contains("Servidores UNIX"));
    }

    #[test]
    fn test_layout_data_start() {
        assert_eq!(TableLayout::new(1).data_start(), 2);
        assert_eq!(TableLayout::new(3).data_start(), 4);
        assert_eq!(TableLayout::new(u32::MAX).data_start(), u32::MAX);
    }
}
