// ── Core error types ──
//
// User-facing errors from gsctl-core. Callers see the reconciliation
// taxonomy, not markup or HTTP details. The `From<gsctl_api::Error>` impl
// lifts wire-layer failures into it; transport failures stay wrapped so
// `is_timeout()` can still tell a slow switch from an unreachable one.

use gsctl_api::PortIndex;
use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Session errors ───────────────────────────────────────────────
    #[error("Not logged in to {address} -- run `gsctl login` first")]
    NotAuthenticated { address: String },

    #[error("Stored token for {address} is unreadable: {reason}")]
    StaleTokenFormat { address: String, reason: String },

    #[error("Login rejected: {message}")]
    LoginRejected { message: String },

    #[error("Unknown switch model at {address}")]
    UnknownModel { address: String },

    #[error("Session expired -- login required (while fetching {url})")]
    LoginRequired { url: String },

    // ── Validation errors ────────────────────────────────────────────
    #[error("Port {port} is out of range (1..={max})")]
    PortOutOfRange { port: PortIndex, max: PortIndex },

    #[error("Invalid value {value:?} for {setting}; accepted: {}", .accepted.join(", "))]
    InvalidSettingValue {
        setting: &'static str,
        value: String,
        accepted: Vec<String>,
    },

    // ── Device errors ────────────────────────────────────────────────
    #[error("Switch rejected the update: {message}")]
    DeviceRejected { message: String },

    #[error("Unexpected page content: {message}")]
    Extraction { message: String },

    // ── Transport errors (wrapped, never retried) ────────────────────
    #[error(transparent)]
    Transport(gsctl_api::Error),

    // ── Storage errors ───────────────────────────────────────────────
    #[error("Token storage error: {0}")]
    TokenStorage(#[from] std::io::Error),
}

impl CoreError {
    /// Returns `true` if the transport gave up waiting for the switch.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }

    /// Returns `true` if a later attempt (usually after a fresh login)
    /// may succeed without any change to the request.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::LoginRejected { .. } | Self::LoginRequired { .. }
        )
    }
}

// ── Conversion from wire-layer errors ────────────────────────────────

impl From<gsctl_api::Error> for CoreError {
    fn from(err: gsctl_api::Error) -> Self {
        match err {
            gsctl_api::Error::UnknownModel { address } => CoreError::UnknownModel { address },
            gsctl_api::Error::LoginRejected { message } => CoreError::LoginRejected { message },
            gsctl_api::Error::LoginRequired { url } => CoreError::LoginRequired { url },
            gsctl_api::Error::DeviceRejected { message } => CoreError::DeviceRejected { message },
            gsctl_api::Error::Extraction { what, message } => CoreError::Extraction {
                message: format!("{what}: {message}"),
            },
            other => CoreError::Transport(other),
        }
    }
}
