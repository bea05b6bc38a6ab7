use thiserror::Error;

/// Top-level error type for the `gsctl-api` crate.
///
/// Covers every failure mode of the switch web-admin surface:
/// transport, login, document extraction, and write results.
/// `gsctl-core` lifts these into its own taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The switch answered with a non-success HTTP status.
    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    // ── Detection ───────────────────────────────────────────────────
    /// The root page carried none of the known model markers.
    #[error("Unknown switch model at {address}")]
    UnknownModel { address: String },

    // ── Authentication ──────────────────────────────────────────────
    /// Credentials were posted but the switch granted no session token.
    #[error("Login rejected: {message}")]
    LoginRejected { message: String },

    /// The switch served its login page instead of the requested document.
    #[error("Session expired -- login required (while fetching {url})")]
    LoginRequired { url: String },

    // ── Documents ───────────────────────────────────────────────────
    /// A value required for the operation was missing from the markup.
    #[error("Could not extract {what}: {message}")]
    Extraction { what: &'static str, message: String },

    // ── Writes ──────────────────────────────────────────────────────
    /// The switch answered a form submission with something other than `SUCCESS`.
    #[error("Switch rejected the update: {message}")]
    DeviceRejected { message: String },
}

impl Error {
    /// Returns `true` if the transport layer gave up waiting for the switch.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }

    /// Returns `true` if the error can only be cleared by logging in again.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::LoginRequired { .. })
    }

    pub(crate) fn extraction(what: &'static str, message: impl Into<String>) -> Self {
        Self::Extraction {
            what,
            message: message.into(),
        }
    }
}
