use std::collections::HashMap;

use crate::store::CellValue;

/// One entity to reconcile into a table: field name -> value
///
/// It does not need to cover every header of the target table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CandidateRecord {
    fields: HashMap<String, CellValue>,
}

impl CandidateRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field setter
    pub fn with(mut self, field: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<CellValue>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Value for `field` if it holds something other than a blank
    pub fn defined(&self, field: &str) -> Option<&CellValue> {
        self.fields.get(field).filter(|v| !v.is_blank())
    }
}
