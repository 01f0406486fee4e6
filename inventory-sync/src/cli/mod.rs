//! Command-line interface definitions

pub mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use inventory_sync::{Config, StoreKind};

#[derive(Parser)]
#[command(name = "inventory-sync")]
#[command(about = "Reconcile RVTools exports against the server inventory", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to the config file (defaults to ~/.config/inventory-sync/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Upsert VM hostnames and IP addresses from RVTools into the inventory
    Sync(commands::sync::SyncCommands),
    /// Validate both workbooks without changing anything
    Check(commands::check::CheckCommands),
    /// Manage the config file
    Config(commands::config::ConfigCommands),
}

/// Workbook locations, shared by `sync` and `check`
#[derive(Args, Debug, Clone, Default)]
pub struct WorkbookArgs {
    /// RVTools export (.xlsx file or directory of CSV files)
    #[arg(long)]
    pub rvtools: Option<String>,

    /// Server inventory (.xlsx file or directory of CSV files)
    #[arg(long)]
    pub inventory: Option<String>,

    /// Storage backend for both workbooks
    #[arg(long, value_enum)]
    pub store: Option<StoreKind>,
}

impl WorkbookArgs {
    /// Flags override the config file and environment
    pub fn apply(&self, config: &mut Config) {
        if let Some(ref rvtools) = self.rvtools {
            config.workbooks.rvtools = Some(rvtools.clone());
        }
        if let Some(ref inventory) = self.inventory {
            config.workbooks.inventory = Some(inventory.clone());
        }
        if let Some(store) = self.store {
            config.workbooks.store = store;
        }
    }
}
