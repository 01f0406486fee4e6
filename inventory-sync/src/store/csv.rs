//! CSV backend: a workbook is a directory, each sheet is `<sheet name>.csv`

use std::fs;
use std::path::Path;

use ::csv::{ReaderBuilder, WriterBuilder};

use super::{CellValue, Row, Sheet, StoreError, TabularStore, Workbook};

const EXTENSION: &str = "csv";

#[derive(Debug, Clone, Copy, Default)]
pub struct CsvStore;

impl TabularStore for CsvStore {
    fn open_workbook(&self, id: &str) -> Result<Workbook, StoreError> {
        let dir = Path::new(id);
        if !dir.is_dir() {
            return Err(StoreError::NotFound(id.to_string()));
        }

        let mut paths: Vec<_> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == EXTENSION))
            .collect();
        // Directory order is unspecified; keep sheet order stable
        paths.sort();

        let mut workbook = Workbook::new(id);
        for path in paths {
            let Some(name) = path.file_stem().map(|s| s.to_string_lossy().to_string()) else {
                continue;
            };

            let mut reader = ReaderBuilder::new()
                .has_headers(false)
                .flexible(true)
                .from_path(&path)?;

            workbook.add_sheet(Sheet::from_rows(name, read_rows(&mut reader)?));
        }
        workbook.mark_clean();

        log::debug!("Opened {} with sheets: {:?}", id, workbook.sheet_names());
        Ok(workbook)
    }

    fn save_workbook(&self, workbook: &Workbook, id: &str) -> Result<(), StoreError> {
        let dir = Path::new(id);
        fs::create_dir_all(dir)?;

        for sheet in workbook.sheets() {
            let path = dir.join(format!("{}.{}", sheet.name(), EXTENSION));
            let mut wtr = WriterBuilder::new().flexible(true).from_path(&path)?;

            for row in sheet.rows().iter().take(sheet.last_row() as usize) {
                // An empty record would be skipped by the writer and shift every later row up
                if row.is_empty() {
                    wtr.write_record([""])?;
                } else {
                    wtr.write_record(row.iter().map(|c| c.to_string()))?;
                }
            }

            wtr.flush()?;
        }

        log::debug!("Saved {} sheets to {}", workbook.sheets().len(), id);
        Ok(())
    }
}

/// Read records into rows, keeping each record on its file line.
///
/// The reader skips blank lines, so the gap between a record's line and the
/// line after the previous record becomes empty rows. Quoted fields may
/// span lines; those extra lines belong to their record.
fn read_rows<R: std::io::Read>(reader: &mut ::csv::Reader<R>) -> Result<Vec<Row>, StoreError> {
    let mut rows: Vec<Row> = Vec::new();
    let mut next_line: u64 = 1;

    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(next_line, |p| p.line());
        for _ in next_line..line {
            rows.push(Row::new());
        }

        let spanned: u64 = record.iter().map(|f| f.matches('\n').count() as u64).sum();
        next_line = line.max(next_line) + spanned + 1;
        rows.push(record.iter().map(CellValue::from_csv_field).collect());
    }

    Ok(rows)
}
