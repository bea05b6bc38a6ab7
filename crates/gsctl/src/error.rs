//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a stable exit code per failure class.

use miette::Diagnostic;
use thiserror::Error;

use gsctl_config::ConfigError;
use gsctl_core::CoreError;

/// Process exit codes.
#[allow(dead_code)]
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const PORT_RANGE: i32 = 4;
    pub const REJECTED: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the switch")]
    #[diagnostic(
        code(gsctl::connection_failed),
        help(
            "Check that the switch is powered and reachable from this host.\n\
             Try: gsctl detect -a <address>"
        )
    )]
    ConnectionFailed {
        #[source]
        source: gsctl_core::CoreError,
    },

    #[error("Request timed out")]
    #[diagnostic(
        code(gsctl::timeout),
        help("Increase the timeout with --timeout or check the switch responsiveness.")
    )]
    Timeout {
        #[source]
        source: gsctl_core::CoreError,
    },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Not logged in to {address}")]
    #[diagnostic(
        code(gsctl::not_logged_in),
        help("Run: gsctl login -a {address}")
    )]
    NotLoggedIn { address: String },

    #[error("Stored session for {address} is unreadable: {reason}")]
    #[diagnostic(
        code(gsctl::stale_token),
        help("Log in again to replace it: gsctl login -a {address}")
    )]
    StaleToken { address: String, reason: String },

    #[error("Login rejected: {message}")]
    #[diagnostic(
        code(gsctl::login_rejected),
        help(
            "Verify the admin password. The switch allows a limited number of\n\
             concurrent sessions; log out of the web UI and retry."
        )
    )]
    LoginRejected { message: String },

    #[error("Session expired while fetching {url}")]
    #[diagnostic(
        code(gsctl::session_expired),
        help("The switch dropped the session. Run gsctl login again.")
    )]
    SessionExpired { url: String },

    // ── Device ───────────────────────────────────────────────────────

    #[error("Unsupported or unrecognised switch at {address}")]
    #[diagnostic(
        code(gsctl::unknown_model),
        help(
            "Supported models: GS305EP(P), GS308EP(P), GS316EP(P).\n\
             Pin the model with --model if detection is wrong."
        )
    )]
    UnknownModel { address: String },

    #[error("Port {port} is out of range (1..={max})")]
    #[diagnostic(
        code(gsctl::port_out_of_range),
        help("Run: gsctl port status -a <address> to list the ports")
    )]
    PortOutOfRange { port: u8, max: u8 },

    #[error("Switch rejected the update: {message}")]
    #[diagnostic(
        code(gsctl::device_rejected),
        help(
            "Earlier ports in the same request may already have been applied.\n\
             Re-read the settings before retrying."
        )
    )]
    DeviceRejected { message: String },

    #[error("Unexpected page content: {message}")]
    #[diagnostic(
        code(gsctl::extraction),
        help("Capture the pages with: gsctl debug-report -a <address>")
    )]
    Extraction { message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(gsctl::validation))]
    Validation { field: String, reason: String },

    #[error("Invalid value {value:?} for {setting}")]
    #[diagnostic(code(gsctl::invalid_setting), help("Accepted values: {accepted}"))]
    InvalidSetting {
        setting: String,
        value: String,
        accepted: String,
    },

    #[error("Nothing to change")]
    #[diagnostic(
        code(gsctl::empty_change),
        help("Pass at least one setting flag; see --help.")
    )]
    EmptyChange,

    // ── Configuration ────────────────────────────────────────────────

    #[error("Configuration could not be loaded: {message}")]
    #[diagnostic(
        code(gsctl::config),
        help("Check the config file at {path}")
    )]
    Config { message: String, path: String },

    // ── IO ───────────────────────────────────────────────────────────

    #[error("Token storage failed")]
    #[diagnostic(
        code(gsctl::token_storage),
        help("Check permissions on the token directory or pass --token-dir.")
    )]
    TokenStorage {
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::NotLoggedIn { .. }
            | Self::StaleToken { .. }
            | Self::LoginRejected { .. }
            | Self::SessionExpired { .. } => exit_code::AUTH,
            Self::PortOutOfRange { .. } => exit_code::PORT_RANGE,
            Self::DeviceRejected { .. } => exit_code::REJECTED,
            Self::Validation { .. } | Self::InvalidSetting { .. } | Self::EmptyChange => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotAuthenticated { address } => CliError::NotLoggedIn { address },

            CoreError::StaleTokenFormat { address, reason } => {
                CliError::StaleToken { address, reason }
            }

            CoreError::LoginRejected { message } => CliError::LoginRejected { message },

            CoreError::LoginRequired { url } => CliError::SessionExpired { url },

            CoreError::UnknownModel { address } => CliError::UnknownModel { address },

            CoreError::PortOutOfRange { port, max } => CliError::PortOutOfRange { port, max },

            CoreError::InvalidSettingValue {
                setting,
                value,
                accepted,
            } => CliError::InvalidSetting {
                setting: setting.into(),
                value,
                accepted: accepted.join(", "),
            },

            CoreError::DeviceRejected { message } => CliError::DeviceRejected { message },

            CoreError::Extraction { message } => CliError::Extraction { message },

            CoreError::TokenStorage(source) => CliError::TokenStorage { source },

            err @ CoreError::Transport(_) => {
                if err.is_timeout() {
                    CliError::Timeout { source: err }
                } else {
                    CliError::ConnectionFailed { source: err }
                }
            }
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Io(source) => CliError::Io(source),
            other => CliError::Config {
                message: other.to_string(),
                path: gsctl_config::config_path().display().to_string(),
            },
        }
    }
}
