//! Reconcile RVTools virtualization exports against a server inventory workbook
//!
//! VMs are matched by hostname and their IP address is upserted into the
//! inventory sheets. See [`sync::run_sync`] for the full pass.

pub mod config;
pub mod store;
pub mod sync;

pub use config::Config;
pub use store::{CellValue, Sheet, StoreError, StoreKind, TabularStore, Workbook};
pub use sync::{MatchPolicy, RunOptions, SyncError, SyncSummary, run_sync};
