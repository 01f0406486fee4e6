//! Sync command handler

use std::path::Path;

use anyhow::{Context, Result};
use colored::*;

use inventory_sync::store::store_for;
use inventory_sync::sync::report::export_report_to_csv;
use inventory_sync::{Config, RunOptions, SyncSummary, run_sync};

use super::SyncCommands;

/// Handle the sync command
pub fn handle_sync_command(args: SyncCommands, config_path: Option<&Path>) -> Result<()> {
    if args.no_color {
        colored::control::set_override(false);
    }

    let mut config = Config::load(config_path)?;
    args.workbooks.apply(&mut config);
    if let Some(ref output) = args.output {
        config.workbooks.output = Some(output.clone());
    }
    if let Some(policy) = args.match_policy {
        config.sync.match_policy = policy;
    }

    let options = RunOptions {
        rvtools: config.rvtools_id()?.to_string(),
        inventory: config.inventory_id()?.to_string(),
        output: config.workbooks.output.clone(),
        dry_run: args.dry_run,
    };

    log::debug!(
        "Store: {}, match policy: {}",
        config.workbooks.store,
        config.sync.match_policy
    );

    let rvtools_store = store_for(config.workbooks.store, &options.rvtools);
    let inventory_store = store_for(config.workbooks.store, &options.inventory);

    let summary = run_sync(
        rvtools_store.as_ref(),
        inventory_store.as_ref(),
        &config,
        &options,
    )
    .context("Sync failed")?;

    print_summary(&summary);

    if let Some(ref report_path) = args.report {
        export_report_to_csv(&summary, report_path)?;
        println!("Report written to {}", report_path.cyan());
    }

    Ok(())
}

fn print_summary(summary: &SyncSummary) {
    println!();
    for table in &summary.tables {
        println!(
            "{} {} {}",
            table.source.bold(),
            "->".dimmed(),
            table.target.bold()
        );
        println!("  {:<10} {}", "appended", table.appended.to_string().green());
        println!("  {:<10} {}", "updated", table.updated.to_string().yellow());
        println!("  {:<10} {}", "unchanged", table.unchanged.to_string().dimmed());
        println!("  {:<10} {}", "skipped", table.skipped.to_string().dimmed());
    }
    println!();

    match (&summary.saved_to, summary.dry_run) {
        (_, true) if summary.has_changes() => {
            println!("{}", "Dry run: changes found, inventory not saved".yellow())
        }
        (_, true) => println!("{}", "Dry run: inventory already up to date".green()),
        (Some(path), false) => println!("Inventory saved to {}", path.bright_green().bold()),
        (None, false) => println!("{}", "Inventory already up to date".green()),
    }
}
