//! CSV report of what a sync run did, one line per reconciled record

use anyhow::{Context, Result};
use csv::Writer;

use super::SyncSummary;

/// Export the per-record outcome of a run to a CSV file
pub fn export_report_to_csv(summary: &SyncSummary, file_path: &str) -> Result<()> {
    let mut wtr = Writer::from_path(file_path)
        .with_context(|| format!("Failed to create CSV file: {}", file_path))?;

    wtr.write_record(["Source", "Target", "Hostname", "IP", "Action", "Rows", "Synced At"])
        .context("Failed to write CSV header")?;

    let synced_at = summary.started_at.format("%Y-%m-%d %H:%M:%S").to_string();

    for table in &summary.tables {
        for entry in &table.entries {
            let rows = entry
                .rows
                .iter()
                .map(|r| r.to_string())
                .collect::<Vec<_>>()
                .join(";");

            wtr.write_record([
                table.source.as_str(),
                table.target.as_str(),
                entry.hostname.as_str(),
                entry.ip.as_str(),
                entry.action,
                rows.as_str(),
                synced_at.as_str(),
            ])
            .with_context(|| format!("Failed to write record: {}", entry.hostname))?;
        }
    }

    wtr.flush().context("Failed to flush CSV writer")?;

    log::info!("Sync report exported to: {}", file_path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::{ReconcileEntry, ReconcileStats};

    #[test]
    fn test_report_has_one_line_per_entry() {
        let summary = SyncSummary {
            started_at: chrono::Local::now(),
            dry_run: true,
            saved_to: None,
            tables: vec![ReconcileStats {
                source: "vNetwork".to_string(),
                target: "Servidores UNIX".to_string(),
                appended: 1,
                updated: 1,
                entries: vec![
                    ReconcileEntry {
                        hostname: "srv01".to_string(),
                        ip: "10.0.0.5".to_string(),
                        action: "appended",
                        rows: vec![4],
                    },
                    ReconcileEntry {
                        hostname: "srv02".to_string(),
                        ip: "10.0.0.6".to_string(),
                        action: "updated",
                        rows: vec![5, 7],
                    },
                ],
                ..Default::default()
            }],
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        export_report_to_csv(&summary, &path.to_string_lossy()).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(&records[0][2], "srv01");
        assert_eq!(&records[0][4], "appended");
        assert_eq!(&records[1][5], "5;7");
    }
}
