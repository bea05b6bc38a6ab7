// Switch HTTP client
//
// Wraps `reqwest::Client` with address normalisation, family-aware auth
// attachment, and the login-page check every authenticated fetch must pass.
// Endpoint groups (auth, ports, poe, debug) are implemented as inherent
// methods in separate files to keep this module focused on transport.

use reqwest::header::{CONTENT_TYPE, COOKIE};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::form::FormPayload;
use crate::html::requires_login;
use crate::model::{SwitchFamily, SwitchModel};
use crate::transport::TransportConfig;

/// Body a successful form submission answers with.
const WRITE_SUCCESS: &str = "SUCCESS";

/// An authenticated session token, tagged with the model it was issued by.
#[derive(Debug, Clone)]
pub struct SessionToken {
    model: SwitchModel,
    token: SecretString,
}

impl SessionToken {
    pub fn new(model: SwitchModel, token: SecretString) -> Self {
        Self { model, token }
    }

    pub fn model(&self) -> SwitchModel {
        self.model
    }

    pub fn family(&self) -> SwitchFamily {
        self.model.family()
    }

    pub fn token(&self) -> &SecretString {
        &self.token
    }
}

/// Raw HTTP client for one switch's web-admin interface.
pub struct SwitchClient {
    http: reqwest::Client,
    base_url: Url,
}

impl SwitchClient {
    /// Create a client for `address` from a `TransportConfig`.
    ///
    /// `address` may be a bare `host[:port]` (plain HTTP is assumed) or a
    /// full `http://` / `https://` URL.
    pub fn new(address: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url(address)?))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The switch base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Resolve a switch path (optionally carrying a query) against the base URL.
    pub(crate) fn page_url(&self, path: &str) -> Result<Url, Error> {
        self.base_url.join(path).map_err(Error::InvalidUrl)
    }

    /// Attach the session token the way the family expects it.
    ///
    /// `Gs30x` carries it as the `SID` cookie. `Gs316` carries it as the
    /// first query parameter plus a `gambitCookie` cookie.
    fn authorize(
        &self,
        method: reqwest::Method,
        mut url: Url,
        session: &SessionToken,
    ) -> reqwest::RequestBuilder {
        let token = session.token().expose_secret();
        match session.family() {
            SwitchFamily::Gs30x => self
                .http
                .request(method, url)
                .header(COOKIE, format!("SID={token}")),
            SwitchFamily::Gs316 => {
                let existing: Vec<(String, String)> = url.query_pairs().into_owned().collect();
                url.query_pairs_mut()
                    .clear()
                    .append_pair("Gambit", token)
                    .extend_pairs(existing);
                self.http
                    .request(method, url)
                    .header(COOKIE, format!("gambitCookie={token}"))
            }
        }
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Fetch a page without credentials, returning status and body.
    pub(crate) async fn get_public(&self, path: &str) -> Result<(u16, String), Error> {
        let url = self.page_url(path)?;
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;
        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(Error::Transport)?;
        trace!(status, len = body.len(), "public page fetched");
        Ok((status, body))
    }

    /// Fetch an authenticated page, returning its raw status and body.
    pub(crate) async fn get_raw(
        &self,
        path: &str,
        session: &SessionToken,
    ) -> Result<(u16, String), Error> {
        let url = self.page_url(path)?;
        debug!("GET {}", url);

        let resp = self
            .authorize(reqwest::Method::GET, url, session)
            .send()
            .await
            .map_err(Error::Transport)?;
        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(Error::Transport)?;
        Ok((status, body))
    }

    /// Fetch an authenticated document, failing with `LoginRequired` if
    /// the switch served its login page instead.
    pub(crate) async fn get_document(
        &self,
        path: &str,
        session: &SessionToken,
    ) -> Result<String, Error> {
        let (status, body) = self.get_raw(path, session).await?;
        if !(200..300).contains(&status) {
            return Err(Error::HttpStatus {
                status,
                url: path.to_owned(),
            });
        }
        if requires_login(&body) {
            debug!(path, "switch answered with its login page");
            return Err(Error::LoginRequired {
                url: path.to_owned(),
            });
        }
        trace!(path, len = body.len(), "document fetched");
        Ok(body)
    }

    /// POST a form with the session attached and return the response body.
    pub(crate) async fn post_form(
        &self,
        path: &str,
        session: &SessionToken,
        payload: &FormPayload,
    ) -> Result<String, Error> {
        let url = self.page_url(path)?;
        debug!(
            fields = ?payload.keys().collect::<Vec<_>>(),
            "POST {}",
            url
        );

        let resp = self
            .authorize(reqwest::Method::POST, url, session)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(payload.encode())
            .send()
            .await
            .map_err(Error::Transport)?;
        resp.text().await.map_err(Error::Transport)
    }

    /// POST a write and require the switch to acknowledge it with `SUCCESS`.
    pub(crate) async fn submit(
        &self,
        path: &str,
        session: &SessionToken,
        payload: &FormPayload,
    ) -> Result<(), Error> {
        let body = self.post_form(path, session, payload).await?;
        if body.trim() == WRITE_SUCCESS {
            debug!(path, "write acknowledged");
            Ok(())
        } else {
            Err(Error::DeviceRejected { message: body })
        }
    }
}

/// Normalise a user-supplied address into a base URL.
fn base_url(address: &str) -> Result<Url, Error> {
    let address = address.trim().trim_end_matches('/');
    if address.starts_with("http://") || address.starts_with("https://") {
        Ok(Url::parse(&format!("{address}/"))?)
    } else {
        Ok(Url::parse(&format!("http://{address}/"))?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn bare_addresses_default_to_http() {
        assert_eq!(base_url("192.168.0.239").unwrap().as_str(), "http://192.168.0.239/");
        assert_eq!(base_url("switch.lan:8080").unwrap().as_str(), "http://switch.lan:8080/");
        assert_eq!(base_url("https://10.0.0.2/").unwrap().as_str(), "https://10.0.0.2/");
    }

    #[test]
    fn page_urls_keep_queries() {
        let client = SwitchClient::with_client(reqwest::Client::new(), base_url("10.0.0.2").unwrap());
        let url = client
            .page_url(SwitchFamily::Gs316.poe_status_path())
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://10.0.0.2/iss/specific/poePortStatus.html?GetData=TRUE"
        );
    }

    #[test]
    fn gambit_goes_first_in_the_query() {
        let client = SwitchClient::with_client(reqwest::Client::new(), base_url("10.0.0.2").unwrap());
        let session = SessionToken::new(SwitchModel::Gs316ep, SecretString::from("TOK".to_owned()));
        let url = client
            .page_url("/iss/specific/poePortStatus.html?GetData=TRUE")
            .unwrap();
        let request = client
            .authorize(reqwest::Method::GET, url, &session)
            .build()
            .unwrap();

        assert_eq!(request.url().query(), Some("Gambit=TOK&GetData=TRUE"));
        assert_eq!(
            request.headers().get(COOKIE).unwrap(),
            "gambitCookie=TOK"
        );
    }

    #[test]
    fn sid_travels_as_cookie() {
        let client = SwitchClient::with_client(reqwest::Client::new(), base_url("10.0.0.2").unwrap());
        let session = SessionToken::new(SwitchModel::Gs308ep, SecretString::from("abc".to_owned()));
        let url = client.page_url("/dashboard.cgi").unwrap();
        let request = client
            .authorize(reqwest::Method::GET, url, &session)
            .build()
            .unwrap();

        assert_eq!(request.url().query(), None);
        assert_eq!(request.headers().get(COOKIE).unwrap(), "SID=abc");
    }
}
