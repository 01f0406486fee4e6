mod cli;

use anyhow::Result;
use clap::Parser;

use cli::commands::{check, config, sync};
use cli::{Cli, Commands};

fn main() {
    // A missing .env is fine
    dotenvy::dotenv().ok();

    let Cli {
        verbose,
        config: config_path,
        command,
    } = Cli::parse();

    init_logging(verbose);

    if let Err(err) = run(command, config_path.as_deref()) {
        log::error!("{:#}", err);
        std::process::exit(1);
    }
}

fn run(command: Commands, config_path: Option<&std::path::Path>) -> Result<()> {
    match command {
        Commands::Sync(args) => sync::handle_sync_command(args, config_path),
        Commands::Check(args) => check::handle_check_command(args, config_path),
        Commands::Config(args) => config::handle_config_command(args, config_path),
    }
}

/// `RUST_LOG` wins over `-v`
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_target(false)
        .init();
}
