// Persisted session tokens.
//
// A switch accepts one opaque token per session. It is stored together with
// the model that issued it as `<MODEL>:<token>`, split on the first `:`, so a
// later invocation can skip both detection and login.

use std::collections::HashMap;
use std::io;
use std::str::FromStr;
use std::sync::{Mutex, PoisonError};

use gsctl_api::{SessionToken, SwitchModel};
use secrecy::{ExposeSecret, SecretString};

use crate::error::CoreError;

/// Storage for one token per switch address.
///
/// Implementations own the location and format of the backing store; the
/// value handed over is already encoded.
pub trait TokenStore: Send + Sync {
    /// The stored value for `address`, or `None` if nothing was saved.
    fn load(&self, address: &str) -> io::Result<Option<String>>;

    /// Replace the stored value for `address`.
    fn save(&self, address: &str, value: &str) -> io::Result<()>;
}

/// Decode a stored `<MODEL>:<token>` value.
pub fn decode_token(address: &str, raw: &str) -> Result<SessionToken, CoreError> {
    let stale = |reason: String| CoreError::StaleTokenFormat {
        address: address.to_owned(),
        reason,
    };

    let (model, token) = raw
        .trim()
        .split_once(':')
        .ok_or_else(|| stale("expected MODEL:token".into()))?;
    let model = SwitchModel::from_str(model)
        .map_err(|_| stale(format!("unknown model tag {model:?}")))?;
    if token.is_empty() {
        return Err(stale("empty token".into()));
    }

    Ok(SessionToken::new(model, SecretString::from(token.to_owned())))
}

/// Encode a session token for storage.
pub fn encode_token(token: &SessionToken) -> String {
    format!("{}:{}", token.model(), token.token().expose_secret())
}

/// Process-local token store.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: Mutex<HashMap<String, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self, address: &str) -> io::Result<Option<String>> {
        let tokens = self.tokens.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(tokens.get(address).cloned())
    }

    fn save(&self, address: &str, value: &str) -> io::Result<()> {
        let mut tokens = self.tokens.lock().unwrap_or_else(PoisonError::into_inner);
        tokens.insert(address.to_owned(), value.to_owned());
        Ok(())
    }
}
