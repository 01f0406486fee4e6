//! In-memory store used to drive the sync pass in tests

use std::cell::RefCell;
use std::collections::HashMap;

use super::{StoreError, TabularStore, Workbook};

#[derive(Debug, Default)]
pub struct MemoryStore {
    workbooks: RefCell<HashMap<String, Workbook>>,
    saves: RefCell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_workbook(self, workbook: Workbook) -> Self {
        self.workbooks
            .borrow_mut()
            .insert(workbook.id().to_string(), workbook);
        self
    }

    pub fn get(&self, id: &str) -> Option<Workbook> {
        self.workbooks.borrow().get(id).cloned()
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        *self.saves.borrow()
    }
}

impl TabularStore for MemoryStore {
    fn open_workbook(&self, id: &str) -> Result<Workbook, StoreError> {
        self.workbooks
            .borrow()
            .get(id)
            .cloned()
            .map(|mut workbook| {
                workbook.mark_clean();
                workbook
            })
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn save_workbook(&self, workbook: &Workbook, id: &str) -> Result<(), StoreError> {
        self.workbooks
            .borrow_mut()
            .insert(id.to_string(), workbook.clone());
        *self.saves.borrow_mut() += 1;
        Ok(())
    }
}
