//! Reconciliation of RVTools data into the server inventory
//!
//! A run opens both workbooks, checks that all four sheets and the columns
//! each enabled pass needs are present, then upserts one record per source
//! row keyed by hostname. Nothing is written back until every pass has
//! succeeded, so a failed run leaves the stored inventory as it was.

mod error;
mod header;
mod reconcile;
mod record;
pub mod report;
mod upsert;

pub use error::SyncError;
pub use header::{HeaderIndex, TableLayout};
pub use reconcile::{FieldMapping, ReconcileEntry, ReconcileStats, Reconciler};
pub use record::CandidateRecord;
pub use upsert::{MatchPolicy, UpsertOutcome, Upserter};

use chrono::{DateTime, Local};

use crate::config::Config;
use crate::store::{Sheet, TabularStore, Workbook};

/// Workbook identifiers and switches for a single run
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub rvtools: String,
    pub inventory: String,
    /// Save here instead of over `inventory`
    pub output: Option<String>,
    /// Reconcile in memory only
    pub dry_run: bool,
}

/// Outcome of a sync run
#[derive(Debug, Clone)]
pub struct SyncSummary {
    pub started_at: DateTime<Local>,
    pub dry_run: bool,
    /// Where the inventory was written, if it was
    pub saved_to: Option<String>,
    pub tables: Vec<ReconcileStats>,
}

impl SyncSummary {
    /// True if any pass appended or changed a row
    pub fn has_changes(&self) -> bool {
        self.tables.iter().any(|t| t.appended + t.updated > 0)
    }
}

/// Data row count for one validated sheet
#[derive(Debug, Clone, PartialEq)]
pub struct TableCheck {
    pub workbook: String,
    pub table: String,
    pub data_rows: usize,
}

/// A source/target pair of sheet names with its mapping
struct Pass<'a> {
    source: &'a str,
    target: &'a str,
    mapping: &'a FieldMapping,
}

fn passes(config: &Config) -> Vec<Pass<'_>> {
    [
        Pass {
            source: &config.sheets.network,
            target: &config.sheets.unix,
            mapping: &config.sync.unix,
        },
        Pass {
            source: &config.sheets.info,
            target: &config.sheets.intel,
            mapping: &config.sync.intel,
        },
    ]
    .into_iter()
    .filter(|p| p.mapping.enabled)
    .collect()
}

fn require_table<'w>(workbook: &'w Workbook, name: &str) -> Result<&'w Sheet, SyncError> {
    workbook.table(name).ok_or_else(|| SyncError::MissingTable {
        workbook: workbook.id().to_string(),
        table: name.to_string(),
    })
}

/// Check that the four named sheets exist and every enabled pass has its columns
fn validate(config: &Config, rvtools: &Workbook, inventory: &Workbook) -> Result<(), SyncError> {
    let sheets = &config.sheets;
    for (workbook, name) in [
        (rvtools, &sheets.network),
        (rvtools, &sheets.info),
        (inventory, &sheets.unix),
        (inventory, &sheets.intel),
    ] {
        require_table(workbook, name)?;
    }

    let upserter = upserter_for(config);
    for pass in passes(config) {
        let reconciler = Reconciler::new(&upserter, pass.mapping, config.layout.rvtools());
        reconciler.validate(
            require_table(rvtools, pass.source)?,
            require_table(inventory, pass.target)?,
        )?;
    }

    log::debug!("All sheets and columns present");
    Ok(())
}

fn upserter_for(config: &Config) -> Upserter {
    Upserter::new(
        config.sync.key_field.clone(),
        config.layout.inventory(),
        config.sync.match_policy,
    )
}

fn open_both(
    rvtools_store: &dyn TabularStore,
    inventory_store: &dyn TabularStore,
    options: &RunOptions,
) -> Result<(Workbook, Workbook), SyncError> {
    log::info!("Opening RVTools export: {}", options.rvtools);
    let rvtools = rvtools_store.open_workbook(&options.rvtools)?;
    log::info!("Opening inventory: {}", options.inventory);
    let inventory = inventory_store.open_workbook(&options.inventory)?;
    Ok((rvtools, inventory))
}

/// Run a full reconciliation pass and save the inventory if anything changed
pub fn run_sync(
    rvtools_store: &dyn TabularStore,
    inventory_store: &dyn TabularStore,
    config: &Config,
    options: &RunOptions,
) -> Result<SyncSummary, SyncError> {
    let started_at = Local::now();
    let (rvtools, mut inventory) = open_both(rvtools_store, inventory_store, options)?;
    validate(config, &rvtools, &inventory)?;

    let upserter = upserter_for(config);
    let mut tables = Vec::new();

    for pass in passes(config) {
        let source = require_table(&rvtools, pass.source)?;
        let workbook_id = inventory.id().to_string();
        let target = inventory
            .table_mut(pass.target)
            .ok_or_else(|| SyncError::MissingTable {
                workbook: workbook_id,
                table: pass.target.to_string(),
            })?;

        let reconciler = Reconciler::new(&upserter, pass.mapping, config.layout.rvtools());
        tables.push(reconciler.reconcile(source, target)?);
    }

    let mut summary = SyncSummary {
        started_at,
        dry_run: options.dry_run,
        saved_to: None,
        tables,
    };

    if options.dry_run {
        log::info!("Dry run, inventory not saved");
    } else if !inventory.is_dirty() {
        log::info!("Inventory already up to date, nothing to save");
    } else {
        let destination = options.output.as_deref().unwrap_or(&options.inventory);
        log::info!("Saving inventory to {}", destination);
        inventory_store.save_workbook(&inventory, destination)?;
        summary.saved_to = Some(destination.to_string());
    }

    log::info!("Sync completed successfully");
    Ok(summary)
}

/// Open both workbooks and validate them without reconciling anything
pub fn check(
    rvtools_store: &dyn TabularStore,
    inventory_store: &dyn TabularStore,
    config: &Config,
    options: &RunOptions,
) -> Result<Vec<TableCheck>, SyncError> {
    let (rvtools, inventory) = open_both(rvtools_store, inventory_store, options)?;
    validate(config, &rvtools, &inventory)?;

    let sheets = &config.sheets;
    let rv_start = config.layout.rvtools().data_start();
    let inv_start = config.layout.inventory().data_start();

    [
        (&rvtools, &sheets.network, rv_start),
        (&rvtools, &sheets.info, rv_start),
        (&inventory, &sheets.unix, inv_start),
        (&inventory, &sheets.intel, inv_start),
    ]
    .into_iter()
    .map(|(workbook, name, start)| -> Result<TableCheck, SyncError> {
        let sheet = require_table(workbook, name)?;
        Ok(TableCheck {
            workbook: workbook.id().to_string(),
            table: name.clone(),
            data_rows: sheet.read_data_rows(start).len(),
        })
    })
    .collect()
}
