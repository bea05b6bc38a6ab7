//! Command dispatch: bridges CLI args -> session operations -> output formatting.

pub mod debug;
pub mod detect;
pub mod login;
pub mod poe;
pub mod port;
pub mod util;

use gsctl_config::Config;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a switch-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, global: &GlobalOpts, cfg: &Config) -> Result<(), CliError> {
    match cmd {
        Command::Login(args) => login::handle(args, global, cfg).await,
        Command::Detect(args) => detect::handle(args, global, cfg).await,
        Command::Port(args) => port::handle(args, global, cfg).await,
        Command::Poe(args) => poe::handle(args, global, cfg).await,
        Command::DebugReport(args) => debug::handle(args, global, cfg).await,
        // Completions is handled before dispatch
        Command::Completions(_) => unreachable!(),
    }
}
