// Shared transport configuration for building reqwest::Client instances.
//
// The switches speak plain HTTP with no cookie jar of their own; session
// tokens are attached per request by `SwitchClient`, so the client built
// here carries no cookie store.

use std::time::Duration;

use reqwest::redirect::Policy;

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
    /// Accept self-signed certificates when an `https://` address is given.
    pub accept_invalid_certs: bool,
    pub max_redirects: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            accept_invalid_certs: true,
            max_redirects: 5,
        }
    }
}

impl TransportConfig {
    /// Config with a custom request timeout and otherwise default settings.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }

    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("gsctl/", env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(self.accept_invalid_certs)
            .redirect(Policy::limited(self.max_redirects))
            .build()
            .map_err(crate::error::Error::Transport)
    }
}
