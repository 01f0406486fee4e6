//! Workbook: an identifier plus its ordered sheets

use super::sheet::Sheet;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Workbook {
    id: String,
    sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new(id: impl Into<String>) -> Self {
        Workbook {
            id: id.into(),
            sheets: Vec::new(),
        }
    }

    /// Identifier the workbook was opened with
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Add a sheet (replaces an existing sheet with the same name)
    pub fn add_sheet(&mut self, sheet: Sheet) {
        match self.sheets.iter_mut().find(|s| s.name() == sheet.name()) {
            Some(existing) => *existing = sheet,
            None => self.sheets.push(sheet),
        }
    }

    pub fn table(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name() == name)
    }

    pub fn table_mut(&mut self, name: &str) -> Option<&mut Sheet> {
        self.sheets.iter_mut().find(|s| s.name() == name)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name()).collect()
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    /// True when any sheet was written through [`Workbook::table_mut`]
    /// since the workbook was loaded
    pub fn is_dirty(&self) -> bool {
        self.sheets.iter().any(Sheet::is_modified)
    }

    /// Forget pending modifications; stores call this after loading
    pub fn mark_clean(&mut self) {
        for sheet in &mut self.sheets {
            sheet.mark_clean();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::CellValue;

    fn make_workbook() -> Workbook {
        let mut workbook = Workbook::new("inventory.xlsx");
        workbook.add_sheet(Sheet::new("Servidores UNIX"));
        workbook.add_sheet(Sheet::new("MV INTEL"));
        workbook
    }

    #[test]
    fn test_lookup_by_name() {
        let workbook = make_workbook();
        assert!(workbook.table("MV INTEL").is_some());
        assert!(workbook.table("mv intel").is_none());
        assert_eq!(workbook.sheet_names(), vec!["Servidores UNIX", "MV INTEL"]);
    }

    #[test]
    fn test_dirty_only_after_a_write() {
        let mut workbook = make_workbook();
        assert!(!workbook.is_dirty());

        // Borrowing a sheet mutably is not a change by itself
        workbook.table_mut("Servidores UNIX").unwrap();
        assert!(!workbook.is_dirty());

        workbook
            .table_mut("MV INTEL")
            .unwrap()
            .write_cell(1, 1, CellValue::from("HOSTNAME"));
        assert!(workbook.is_dirty());

        workbook.mark_clean();
        assert!(!workbook.is_dirty());
    }
}
