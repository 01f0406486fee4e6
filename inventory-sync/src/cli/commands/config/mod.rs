//! `config` command: create and inspect the config file

mod handler;

use clap::{Args, Subcommand};

pub use handler::handle_config_command;

#[derive(Args, Debug, Clone)]
pub struct ConfigCommands {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Write a config file with the default settings
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration (file + environment)
    Show,
    /// Print the config file location
    Path,
}
