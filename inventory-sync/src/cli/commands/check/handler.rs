use std::path::Path;

use anyhow::{Context, Result};
use colored::*;

use inventory_sync::store::store_for;
use inventory_sync::sync::check;
use inventory_sync::{Config, RunOptions};

use super::CheckCommands;

/// Handle the check command
pub fn handle_check_command(args: CheckCommands, config_path: Option<&Path>) -> Result<()> {
    if args.no_color {
        colored::control::set_override(false);
    }

    let mut config = Config::load(config_path)?;
    args.workbooks.apply(&mut config);

    let options = RunOptions {
        rvtools: config.rvtools_id()?.to_string(),
        inventory: config.inventory_id()?.to_string(),
        output: None,
        dry_run: true,
    };

    let rvtools_store = store_for(config.workbooks.store, &options.rvtools);
    let inventory_store = store_for(config.workbooks.store, &options.inventory);

    let tables = check(
        rvtools_store.as_ref(),
        inventory_store.as_ref(),
        &config,
        &options,
    )
    .context("Check failed")?;

    println!();
    for table in &tables {
        println!(
            "  {} {:<20} {} data rows  {}",
            "✓".green(),
            table.table.bold(),
            table.data_rows,
            table.workbook.dimmed()
        );
    }
    println!();
    println!("{}", "All sheets and columns present".green());

    Ok(())
}
