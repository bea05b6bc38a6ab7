//! Resolution of CLI flags over the shared `gsctl-config` file.
//!
//! Flags (and their `GSCTL_*` env vars) win over the config file, which
//! wins over built-in defaults. The result is a ready `Session`.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use clap::ValueEnum;
use tracing::debug;

use gsctl_config::{Config, FileTokenStore};
use gsctl_core::{Session, SwitchModel, TransportConfig};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

/// Load the config file, or report why it could not be read.
pub fn load() -> Result<Config, CliError> {
    Ok(gsctl_config::load_config()?)
}

/// `--output`, else `defaults.output`, else table.
pub fn output_format(global: &GlobalOpts, cfg: &Config) -> OutputFormat {
    global.output.unwrap_or_else(|| {
        OutputFormat::from_str(&cfg.defaults.output, true).unwrap_or(OutputFormat::Table)
    })
}

/// `--model`, else the model pinned for `address` in the config file.
pub fn declared_model(
    global: &GlobalOpts,
    cfg: &Config,
    address: &str,
) -> Result<Option<SwitchModel>, CliError> {
    match global.model.as_deref() {
        Some(name) => SwitchModel::from_str(name)
            .map(Some)
            .map_err(|_| CliError::Validation {
                field: "model".into(),
                reason: format!(
                    "unknown model '{name}' (expected GS305EP, GS305EPP, GS308EP, GS308EPP, GS316EP or GS316EPP)"
                ),
            }),
        None => Ok(cfg.declared_model(address)?),
    }
}

/// Build a session for `address` with the resolved timeout, token
/// directory and declared model.
pub fn open_session(address: &str, global: &GlobalOpts, cfg: &Config) -> Result<Session, CliError> {
    if address.trim().is_empty() {
        return Err(CliError::Validation {
            field: "address".into(),
            reason: "must not be empty".into(),
        });
    }

    let timeout = global.timeout.unwrap_or_else(|| cfg.timeout_for(address));
    let token_dir = global.token_dir.clone().unwrap_or_else(|| cfg.token_dir());
    debug!(address, timeout, token_dir = %token_dir.display(), "opening session");

    let transport = TransportConfig::with_timeout(Duration::from_secs(timeout));
    let store = Arc::new(FileTokenStore::new(token_dir));
    let session = Session::new(address, &transport, store)?;

    Ok(match declared_model(global, cfg, address)? {
        Some(model) => session.with_model(model),
        None => session,
    })
}
