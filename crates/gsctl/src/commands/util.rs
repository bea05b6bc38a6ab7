//! Shared helpers for command handlers.

use gsctl_core::{Session, SwitchFamily};

use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Firmware family of a session whose token has been resolved.
pub fn family(session: &Session) -> Result<SwitchFamily, CliError> {
    session.family().ok_or_else(|| CliError::NotLoggedIn {
        address: session.address().to_owned(),
    })
}

/// `1, 3, 5`
pub fn port_list(ports: &[u8]) -> String {
    ports
        .iter()
        .map(u8::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
