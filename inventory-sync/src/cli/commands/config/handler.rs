use std::path::Path;

use anyhow::Result;
use colored::*;

use inventory_sync::Config;

use super::{ConfigAction, ConfigCommands};

/// Handle the config command
pub fn handle_config_command(args: ConfigCommands, config_path: Option<&Path>) -> Result<()> {
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(Config::default_path);

    match args.action {
        ConfigAction::Init { force } => init_config(&path, force),
        ConfigAction::Show => {
            let config = Config::load(config_path)?;
            print!("{}", config.to_toml()?);
            Ok(())
        }
        ConfigAction::Path => {
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists: {} (use --force to overwrite)",
            path.display()
        );
    }

    Config::default().save(path)?;
    log::info!("Config written to {}", path.display());
    println!("Config written to {}", path.display().to_string().bright_green());
    Ok(())
}
