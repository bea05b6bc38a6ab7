// Port settings and link status endpoints
//
// Fetches go through `get_document`, so a stale session surfaces as
// `LoginRequired` before any markup is parsed.

use scraper::Html;
use secrecy::ExposeSecret;

use crate::client::{SessionToken, SwitchClient};
use crate::error::Error;
use crate::form::FormPayload;
use crate::model::SwitchFamily;
use crate::records::{PortSetting, PortSettingsPage, PortStatus};
use crate::{gs30x, gs316};

impl SwitchClient {
    /// Current per-port settings, plus the write hash on `Gs30x`.
    ///
    /// `Gs316` records carry the labels shown on the page.
    pub async fn port_settings(&self, session: &SessionToken) -> Result<PortSettingsPage, Error> {
        let family = session.family();
        let body = self.get_document(family.port_config_path(), session).await?;
        let doc = Html::parse_document(&body);

        match family {
            SwitchFamily::Gs30x => Ok(PortSettingsPage {
                ports: gs30x::extract::port_settings(&doc)?,
                hash: Some(gs30x::extract::hash(&doc)?),
            }),
            SwitchFamily::Gs316 => Ok(PortSettingsPage {
                ports: gs316::extract::port_settings(&doc)?,
                hash: None,
            }),
        }
    }

    /// Current link state of every port.
    pub async fn port_status(&self, session: &SessionToken) -> Result<Vec<PortStatus>, Error> {
        let family = session.family();
        let body = self.get_document(family.port_config_path(), session).await?;
        let doc = Html::parse_document(&body);

        match family {
            SwitchFamily::Gs30x => gs30x::extract::port_status(&doc),
            SwitchFamily::Gs316 => gs316::extract::port_status(&doc),
        }
    }

    /// Submit one port's settings.
    pub async fn update_port(
        &self,
        session: &SessionToken,
        hash: Option<&str>,
        current: &PortSetting,
        desired: &PortSetting,
    ) -> Result<(), Error> {
        let payload = port_update_form(session, hash, current, desired)?;
        self.submit(session.family().port_update_path(), session, &payload)
            .await
    }
}

/// Build the family-specific port settings payload.
pub fn port_update_form(
    session: &SessionToken,
    hash: Option<&str>,
    current: &PortSetting,
    desired: &PortSetting,
) -> Result<FormPayload, Error> {
    match session.family() {
        SwitchFamily::Gs30x => Ok(gs30x::forms::port_update(require_hash(hash)?, desired)),
        SwitchFamily::Gs316 => Ok(gs316::forms::port_update(
            session.token().expose_secret(),
            current,
            desired,
        )),
    }
}

pub(crate) fn require_hash(hash: Option<&str>) -> Result<&str, Error> {
    hash.ok_or_else(|| Error::extraction("hash", "no write hash from the configuration page"))
}
