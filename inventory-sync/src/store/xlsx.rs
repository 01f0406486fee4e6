//! Excel backend: read with calamine, write with rust_xlsxwriter
//!
//! Saving rewrites the workbook from cell values. Styles, formulas and
//! column widths of the original file are not carried over.

use std::path::Path;

use calamine::{Data, Range, Reader, Xlsx, open_workbook};
use rust_xlsxwriter::{Format, Worksheet};

use super::{CellValue, Sheet, StoreError, TabularStore, Workbook};

/// Workbook identifiers are paths to `.xlsx` files
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxStore;

impl TabularStore for XlsxStore {
    fn open_workbook(&self, id: &str) -> Result<Workbook, StoreError> {
        let path = Path::new(id);
        if !path.is_file() {
            return Err(StoreError::NotFound(id.to_string()));
        }

        let mut excel: Xlsx<_> = open_workbook(path)?;
        let mut workbook = Workbook::new(id);

        for sheet_name in excel.sheet_names() {
            let range = excel.worksheet_range(&sheet_name)?;
            workbook.add_sheet(range_to_sheet(&sheet_name, &range));
        }
        workbook.mark_clean();

        log::debug!(
            "Opened {} with sheets: {:?}",
            id,
            workbook.sheet_names()
        );
        Ok(workbook)
    }

    fn save_workbook(&self, workbook: &Workbook, id: &str) -> Result<(), StoreError> {
        let mut excel = rust_xlsxwriter::Workbook::new();

        for sheet in workbook.sheets() {
            let worksheet = excel.add_worksheet();
            worksheet.set_name(sheet.name())?;
            for (row, col, value) in sheet.cells() {
                write_value(worksheet, row - 1, (col - 1) as u16, value)?;
            }
        }

        excel.save(id)?;
        log::debug!("Saved {} sheets to {}", workbook.sheets().len(), id);
        Ok(())
    }
}

/// Convert a calamine range to a sheet, keeping absolute positions.
///
/// A range does not have to start at A1: if the first used cell is C3 the
/// range starts there, so its offset is added back.
fn range_to_sheet(name: &str, range: &Range<Data>) -> Sheet {
    let mut sheet = Sheet::new(name);
    let (row_offset, col_offset) = range.start().unwrap_or((0, 0));

    for (row, col, cell) in range.cells() {
        let value = CellValue::from_data(cell);
        if value.is_blank() {
            continue;
        }
        sheet.write_cell(
            row_offset + row as u32 + 1,
            col_offset + col as u32 + 1,
            value,
        );
    }

    sheet
}

fn write_value(ws: &mut Worksheet, row: u32, col: u16, value: &CellValue) -> Result<(), StoreError> {
    match value {
        CellValue::Empty => { /* Leave cell empty */ }
        CellValue::Text(s) => { ws.write_string(row, col, s)?; }
        CellValue::Number(n) => { ws.write_number(row, col, *n)?; }
        CellValue::Bool(b) => { ws.write_boolean(row, col, *b)?; }
        CellValue::DateTime(serial) => {
            // A date number format is what makes Excel (and calamine) treat the serial as a date
            let pattern = if serial.fract() == 0.0 { "yyyy-mm-dd" } else { "yyyy-mm-dd hh:mm:ss" };
            let format = Format::new().set_num_format(pattern);
            ws.write_number_with_format(row, col, *serial, &format)?;
        }
    }
    Ok(())
}
