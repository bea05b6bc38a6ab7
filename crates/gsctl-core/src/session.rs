// ── Session ──
//
// One session per switch per invocation. The model and token are resolved
// lazily (from the token store, by detection, or by login) and then held
// for the rest of the operation.

use std::sync::Arc;

use gsctl_api::{SessionToken, SwitchClient, SwitchFamily, SwitchModel, TransportConfig};
use secrecy::SecretString;
use tracing::{debug, info};

use crate::error::CoreError;
use crate::token::{TokenStore, decode_token, encode_token};

/// An addressed switch plus whatever authentication is known for it.
pub struct Session {
    address: String,
    client: SwitchClient,
    store: Arc<dyn TokenStore>,
    declared: Option<SwitchModel>,
    auth: Option<SessionToken>,
}

impl Session {
    /// Create a session for `address` without touching the network.
    pub fn new(
        address: &str,
        transport: &TransportConfig,
        store: Arc<dyn TokenStore>,
    ) -> Result<Self, CoreError> {
        let client = SwitchClient::new(address, transport)?;
        Ok(Self::with_client(address, client, store))
    }

    /// Create a session around an existing client.
    pub fn with_client(address: &str, client: SwitchClient, store: Arc<dyn TokenStore>) -> Self {
        Self {
            address: address.trim().to_owned(),
            client,
            store,
            declared: None,
            auth: None,
        }
    }

    /// Declare the model up front so login skips detection.
    #[must_use]
    pub fn with_model(mut self, model: SwitchModel) -> Self {
        self.declared = Some(model);
        self
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn client(&self) -> &SwitchClient {
        &self.client
    }

    /// The model of the held token, once resolved.
    pub fn model(&self) -> Option<SwitchModel> {
        self.auth.as_ref().map(SessionToken::model)
    }

    /// The firmware family of the held token, once resolved.
    pub fn family(&self) -> Option<SwitchFamily> {
        self.model().map(SwitchModel::family)
    }

    /// The session token, loading it from the store on first use.
    ///
    /// A stored token is trusted without re-validation; a stale one only
    /// shows up later as [`CoreError::LoginRequired`].
    pub fn resolve(&mut self) -> Result<SessionToken, CoreError> {
        if let Some(auth) = &self.auth {
            return Ok(auth.clone());
        }

        let raw = self
            .store
            .load(&self.address)?
            .ok_or_else(|| CoreError::NotAuthenticated {
                address: self.address.clone(),
            })?;
        let token = decode_token(&self.address, &raw)?;
        debug!(address = %self.address, model = %token.model(), "loaded stored session token");

        self.auth = Some(token.clone());
        Ok(token)
    }

    /// Classify the switch from its root page.
    pub async fn detect_model(&self) -> Result<SwitchModel, CoreError> {
        Ok(self.client.detect_model().await?)
    }

    /// Log in and persist the issued token, returning the model it was issued for.
    pub async fn login(&mut self, password: &SecretString) -> Result<SwitchModel, CoreError> {
        let model = match self.declared {
            Some(model) => {
                debug!(%model, "using declared model, skipping detection");
                model
            }
            None => self.detect_model().await?,
        };

        let token = self.client.login(model, password).await?;
        self.store.save(&self.address, &encode_token(&token))?;
        info!(address = %self.address, %model, "logged in");

        self.auth = Some(token);
        Ok(model)
    }
}
