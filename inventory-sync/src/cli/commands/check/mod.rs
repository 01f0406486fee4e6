//! `check` command: validate workbooks without writing

mod handler;

use clap::Args;

use crate::cli::WorkbookArgs;

pub use handler::handle_check_command;

#[derive(Args, Debug, Clone, Default)]
pub struct CheckCommands {
    #[command(flatten)]
    pub workbooks: WorkbookArgs,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}
