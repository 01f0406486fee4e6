//! Turns source rows into candidate records and feeds them to the upserter

use serde::{Deserialize, Serialize};

use super::{CandidateRecord, HeaderIndex, SyncError, TableLayout, UpsertOutcome, Upserter};
use crate::store::Sheet;

/// Which source columns feed which target fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMapping {
    /// Whether this source/target pair is reconciled at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Source column holding the VM name, written to the key field
    pub hostname_column: String,
    /// Source column holding the IP address
    pub ip_column: String,
    /// Target field receiving the IP address
    pub ip_field: String,
}

fn default_enabled() -> bool {
    true
}

impl FieldMapping {
    /// `vNetwork` -> `Servidores UNIX`
    pub fn network() -> Self {
        FieldMapping {
            enabled: true,
            hostname_column: "VM".to_string(),
            ip_column: "IPv4 Address".to_string(),
            ip_field: "IP PROD".to_string(),
        }
    }

    /// `vInfo` -> `MV INTEL`, off unless switched on in the config
    pub fn info() -> Self {
        FieldMapping {
            enabled: false,
            hostname_column: "VM".to_string(),
            ip_column: "Primary IP Address".to_string(),
            ip_field: "IP PROD".to_string(),
        }
    }
}

/// One reconciled source row
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileEntry {
    pub hostname: String,
    pub ip: String,
    pub action: &'static str,
    pub rows: Vec<u32>,
}

/// Per-table counters for a reconciliation pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcileStats {
    pub source: String,
    pub target: String,
    pub appended: usize,
    pub updated: usize,
    pub unchanged: usize,
    /// Source rows without a hostname or IP
    pub skipped: usize,
    pub entries: Vec<ReconcileEntry>,
}

impl ReconcileStats {
    fn new(source: &str, target: &str) -> Self {
        ReconcileStats {
            source: source.to_string(),
            target: target.to_string(),
            ..Default::default()
        }
    }

    fn record(&mut self, hostname: String, ip: String, outcome: &UpsertOutcome) {
        match outcome {
            UpsertOutcome::Appended { .. } => self.appended += 1,
            UpsertOutcome::Updated { changed_cells: 0, .. } => self.unchanged += 1,
            UpsertOutcome::Updated { .. } => self.updated += 1,
        }
        self.entries.push(ReconcileEntry {
            hostname,
            ip,
            action: outcome.label(),
            rows: outcome.rows(),
        });
    }

    /// Rows that led to an upsert
    pub fn reconciled(&self) -> usize {
        self.appended + self.updated + self.unchanged
    }
}

/// Reconciles one source table into one target table
pub struct Reconciler<'a> {
    upserter: &'a Upserter,
    mapping: &'a FieldMapping,
    source_layout: TableLayout,
}

impl<'a> Reconciler<'a> {
    pub fn new(upserter: &'a Upserter, mapping: &'a FieldMapping, source_layout: TableLayout) -> Self {
        Reconciler {
            upserter,
            mapping,
            source_layout,
        }
    }

    /// Check that both header rows carry the columns this pass needs.
    ///
    /// Done before any row is touched so a bad layout fails without mutating
    /// the target.
    pub fn validate(&self, source: &Sheet, target: &Sheet) -> Result<(HeaderIndex, HeaderIndex), SyncError> {
        let source_headers = HeaderIndex::read(source, self.source_layout);
        source_headers.require(&self.mapping.hostname_column)?;
        source_headers.require(&self.mapping.ip_column)?;

        let target_headers = HeaderIndex::read(target, self.upserter.layout());
        target_headers.require(self.upserter.key_field())?;
        if !target_headers.contains(&self.mapping.ip_field) {
            log::warn!(
                "Sheet '{}' has no '{}' column; only hostnames will be written",
                target.name(),
                self.mapping.ip_field
            );
        }

        Ok((source_headers, target_headers))
    }

    /// Upsert one record per source row with both a hostname and an IP.
    ///
    /// Rows missing either value are skipped without touching the target.
    pub fn reconcile(&self, source: &Sheet, target: &mut Sheet) -> Result<ReconcileStats, SyncError> {
        let (source_headers, target_headers) = self.validate(source, target)?;
        let host_col = source_headers.require(&self.mapping.hostname_column)?;
        let ip_col = source_headers.require(&self.mapping.ip_column)?;

        let mut stats = ReconcileStats::new(source.name(), target.name());
        let data_start = self.source_layout.data_start();

        for (idx, row) in source.read_data_rows(data_start).into_iter().enumerate() {
            let hostname = &row[host_col];
            let ip = &row[ip_col];

            if hostname.is_blank() || ip.is_blank() {
                log::debug!(
                    "{}: skipping row {} (missing hostname or IP)",
                    source.name(),
                    data_start + idx as u32
                );
                stats.skipped += 1;
                continue;
            }

            let record = CandidateRecord::new()
                .with(self.upserter.key_field(), hostname.clone())
                .with(self.mapping.ip_field.as_str(), ip.clone());

            let outcome = self.upserter.upsert(target, &target_headers, &record)?;
            stats.record(hostname.to_string(), ip.to_string(), &outcome);
        }

        log::info!(
            "{} -> {}: {} appended, {} updated, {} unchanged, {} skipped",
            stats.source,
            stats.target,
            stats.appended,
            stats.updated,
            stats.unchanged,
            stats.skipped
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{CellValue, Row};
    use crate::sync::MatchPolicy;

    fn text_row(cells: &[&str]) -> Row {
        cells.iter().map(|c| CellValue::from(*c)).collect()
    }

    fn make_network(data: &[&[&str]]) -> Sheet {
        let mut rows = vec![text_row(&["VM", "Powerstate", "IPv4 Address"])];
        rows.extend(data.iter().map(|r| text_row(r)));
        Sheet::from_rows("vNetwork", rows)
    }

    fn make_unix(data: &[&[&str]]) -> Sheet {
        let mut rows = vec![
            text_row(&["Servidores UNIX"]),
            text_row(&[]),
            text_row(&["HOSTNAME", "IP PROD"]),
        ];
        rows.extend(data.iter().map(|r| text_row(r)));
        Sheet::from_rows("Servidores UNIX", rows)
    }

    fn run(source: &Sheet, target: &mut Sheet, policy: MatchPolicy) -> Result<ReconcileStats, SyncError> {
        let upserter = Upserter::new("HOSTNAME", TableLayout::new(3), policy);
        let mapping = FieldMapping::network();
        Reconciler::new(&upserter, &mapping, TableLayout::new(1)).reconcile(source, target)
    }

    #[test]
    fn test_new_vm_is_appended() {
        let source = make_network(&[&["srv01", "poweredOn", "10.0.0.5"]]);
        let mut target = make_unix(&[]);

        let stats = run(&source, &mut target, MatchPolicy::All).unwrap();

        assert_eq!(stats.appended, 1);
        assert_eq!(target.read_data_rows(4), vec![text_row(&["srv01", "10.0.0.5"])]);
    }

    #[test]
    fn test_existing_vm_ip_is_updated() {
        let source = make_network(&[&["srv01", "poweredOn", "10.0.0.9"]]);
        let mut target = make_unix(&[&["srv01", "10.0.0.1"]]);

        let stats = run(&source, &mut target, MatchPolicy::All).unwrap();

        assert_eq!(stats.updated, 1);
        assert_eq!(stats.appended, 0);
        assert_eq!(target.read_data_rows(4), vec![text_row(&["srv01", "10.0.0.9"])]);
    }

    #[test]
    fn test_rows_missing_hostname_or_ip_are_skipped() {
        let source = make_network(&[
            &["", "poweredOn", "10.0.0.5"],
            &["srv02", "poweredOff", ""],
            &["srv03", "poweredOff"],
        ]);
        let mut target = make_unix(&[&["srv01", "10.0.0.1"]]);
        let before = target.clone();

        let stats = run(&source, &mut target, MatchPolicy::All).unwrap();

        assert_eq!(stats.skipped, 3);
        assert_eq!(stats.reconciled(), 0);
        assert!(stats.entries.is_empty());
        assert_eq!(target, before);
    }

    #[test]
    fn test_vm_with_two_nics_is_appended_once() {
        // Later rows for the same VM match the row appended for the first one
        let source = make_network(&[
            &["srv01", "poweredOn", "10.0.0.5"],
            &["srv01", "poweredOn", "192.168.1.5"],
        ]);
        let mut target = make_unix(&[]);

        let stats = run(&source, &mut target, MatchPolicy::All).unwrap();

        assert_eq!(stats.appended, 1);
        assert_eq!(stats.updated, 1);
        assert_eq!(target.read_data_rows(4), vec![text_row(&["srv01", "192.168.1.5"])]);
    }

    #[test]
    fn test_duplicate_target_rows_follow_policy() {
        let source = make_network(&[&["srv01", "poweredOn", "10.0.0.9"]]);

        let mut all = make_unix(&[&["srv01", "10.0.0.1"], &["srv01", "10.0.0.2"]]);
        run(&source, &mut all, MatchPolicy::All).unwrap();
        assert_eq!(all.cell(4, 2), &CellValue::from("10.0.0.9"));
        assert_eq!(all.cell(5, 2), &CellValue::from("10.0.0.9"));

        let mut first = make_unix(&[&["srv01", "10.0.0.1"], &["srv01", "10.0.0.2"]]);
        run(&source, &mut first, MatchPolicy::First).unwrap();
        assert_eq!(first.cell(4, 2), &CellValue::from("10.0.0.9"));
        assert_eq!(first.cell(5, 2), &CellValue::from("10.0.0.2"));
    }

    #[test]
    fn test_missing_source_column_fails_before_mutation() {
        let source = Sheet::from_rows(
            "vNetwork",
            vec![text_row(&["VM", "IP"]), text_row(&["srv01", "10.0.0.5"])],
        );
        let mut target = make_unix(&[]);
        let before = target.clone();

        let err = run(&source, &mut target, MatchPolicy::All).unwrap_err();

        assert!(err.is_configuration());
        assert!(err.to_string().contains("IPv4 Address"));
        assert_eq!(target, before);
    }

    #[test]
    fn test_missing_key_header_fails_before_mutation() {
        let source = make_network(&[&["srv01", "poweredOn", "10.0.0.5"]]);
        let mut target = Sheet::from_rows(
            "Servidores UNIX",
            vec![text_row(&[]), text_row(&[]), text_row(&["NOMBRE", "IP PROD"])],
        );

        let err = run(&source, &mut target, MatchPolicy::All).unwrap_err();

        assert!(matches!(err, SyncError::MissingHeader { ref header, .. } if header == "HOSTNAME"));
        assert_eq!(target.last_row(), 3);
    }
}
