//! Command dispatch: bridges CLI args -> Graph collection -> output formatting.

pub mod config_cmd;
pub mod licenses;
pub mod report;
pub mod usage;
pub mod util;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a Graph-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Report(args) => report::handle(args, global).await,
        Command::Usage(args) => usage::handle(args, global).await,
        Command::Licenses(args) => licenses::handle(args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
