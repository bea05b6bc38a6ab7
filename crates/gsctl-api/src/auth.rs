// Switch authentication
//
// Model detection from the unauthenticated root page, and the seeded
// password login. The switch hands out a random seed on its login page;
// the password is interleaved with it and MD5-hashed before posting.

use md5::{Digest, Md5};
use reqwest::header::{CONTENT_TYPE, HeaderMap, SET_COOKIE};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use crate::client::{SessionToken, SwitchClient};
use crate::error::Error;
use crate::form::FormPayload;
use crate::html::{gambit_token, login_seed};
use crate::model::{SwitchFamily, SwitchModel};

impl SwitchClient {
    /// Classify the switch from its unauthenticated root page.
    pub async fn detect_model(&self) -> Result<SwitchModel, Error> {
        let (_, body) = self.get_public("/").await?;
        let model = SwitchModel::detect(&body).ok_or_else(|| Error::UnknownModel {
            address: self.base_url().to_string(),
        })?;
        debug!(%model, "detected switch model");
        Ok(model)
    }

    /// Log in with the switch password and return the issued session token.
    ///
    /// The switch occasionally accepts a login with 200 OK without issuing
    /// a token; that case is reported as [`Error::LoginRejected`] rather
    /// than an empty token.
    pub async fn login(
        &self,
        model: SwitchModel,
        password: &SecretString,
    ) -> Result<SessionToken, Error> {
        let family = model.family();

        let seed_path = family.login_seed_path();
        let (_, page) = self.get_public(seed_path).await?;
        let seed = login_seed(&page).ok_or_else(|| Error::LoginRejected {
            message: format!("no login seed found on {seed_path}"),
        })?;

        let url = self.page_url(family.login_path())?;
        debug!("logging in at {}", url);

        let payload = FormPayload::new().field(
            family.login_field(),
            password_digest(password.expose_secret(), &seed),
        );
        let resp = self
            .http()
            .post(url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(payload.encode())
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::LoginRejected {
                message: format!("login failed (HTTP {status})"),
            });
        }

        let token = match family {
            SwitchFamily::Gs30x => sid_cookie(resp.headers()),
            SwitchFamily::Gs316 => {
                let body = resp.text().await.map_err(Error::Transport)?;
                gambit_token(&body)
            }
        };

        match token {
            Some(token) => {
                debug!(%model, "login successful");
                Ok(SessionToken::new(model, SecretString::from(token)))
            }
            None => {
                warn!(%model, "login answered 200 OK without a session token");
                Err(Error::LoginRejected {
                    message: "the switch accepted the request but issued no session token".into(),
                })
            }
        }
    }
}

/// `SID` value from the `Set-Cookie` headers of a `Gs30x` login response.
fn sid_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|cookie| cookie.strip_prefix("SID="))
        .and_then(|rest| rest.split(';').next())
        .filter(|sid| !sid.is_empty())
        .map(str::to_owned)
}

/// Interleave `password` and `seed` character by character, then MD5 the
/// result and render it as lowercase hex.
///
/// Characters left over from the longer input are appended in place.
pub fn password_digest(password: &str, seed: &str) -> String {
    let mut password = password.chars();
    let mut seed = seed.chars();
    let mut merged = String::new();
    loop {
        let (p, s) = (password.next(), seed.next());
        if p.is_none() && s.is_none() {
            break;
        }
        merged.extend(p);
        merged.extend(s);
    }

    Md5::digest(merged.as_bytes())
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}
