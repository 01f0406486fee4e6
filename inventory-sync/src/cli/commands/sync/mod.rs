//! `sync` command: reconcile RVTools into the inventory

mod handler;

use clap::Args;

use inventory_sync::MatchPolicy;

use crate::cli::WorkbookArgs;

pub use handler::handle_sync_command;

#[derive(Args, Debug, Clone, Default)]
pub struct SyncCommands {
    #[command(flatten)]
    pub workbooks: WorkbookArgs,

    /// Save the reconciled inventory here instead of overwriting it
    #[arg(long)]
    pub output: Option<String>,

    /// Which rows to update when several share a hostname
    #[arg(long, value_enum)]
    pub match_policy: Option<MatchPolicy>,

    /// Reconcile in memory and report, but never save
    #[arg(long)]
    pub dry_run: bool,

    /// Write a CSV report of every reconciled VM
    #[arg(long)]
    pub report: Option<String>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}
