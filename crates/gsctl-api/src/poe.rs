// PoE configuration, telemetry, and power-cycle endpoints

use scraper::Html;
use secrecy::ExposeSecret;

use crate::client::{SessionToken, SwitchClient};
use crate::error::Error;
use crate::form::FormPayload;
use crate::model::SwitchFamily;
use crate::ports::require_hash;
use crate::records::{PoeConfigPage, PoePortSetting, PoePortStatus, PortIndex};
use crate::{gs30x, gs316};

impl SwitchClient {
    /// Current PoE settings, plus the write hash and power-limit bound.
    pub async fn poe_config(&self, session: &SessionToken) -> Result<PoeConfigPage, Error> {
        let family = session.family();
        let body = self.get_document(family.poe_config_path(), session).await?;
        let doc = Html::parse_document(&body);

        match family {
            SwitchFamily::Gs30x => Ok(PoeConfigPage {
                ports: gs30x::extract::poe_settings(&doc)?,
                hash: Some(gs30x::extract::hash(&doc)?),
                max_power_limit: gs30x::extract::max_power_limit(&doc)
                    .unwrap_or_else(|| family.default_max_power_limit().to_owned()),
            }),
            SwitchFamily::Gs316 => Ok(PoeConfigPage {
                ports: gs316::extract::poe_settings(&doc)?,
                hash: None,
                max_power_limit: family.default_max_power_limit().to_owned(),
            }),
        }
    }

    /// Live PoE telemetry for every PoE port.
    pub async fn poe_status(&self, session: &SessionToken) -> Result<Vec<PoePortStatus>, Error> {
        let family = session.family();
        let body = self.get_document(family.poe_status_path(), session).await?;
        let doc = Html::parse_document(&body);

        match family {
            SwitchFamily::Gs30x => gs30x::extract::poe_status(&doc),
            SwitchFamily::Gs316 => gs316::extract::poe_status(&doc),
        }
    }

    /// Submit one port's PoE settings.
    pub async fn update_poe_port(
        &self,
        session: &SessionToken,
        hash: Option<&str>,
        current: &PoePortSetting,
        desired: &PoePortSetting,
    ) -> Result<(), Error> {
        let payload = poe_update_form(session, hash, current, desired)?;
        self.submit(session.family().poe_config_path(), session, &payload)
            .await
    }

    /// Power-cycle the given ports in a single submission.
    pub async fn reset_poe_ports(
        &self,
        session: &SessionToken,
        hash: Option<&str>,
        ports: &[PortIndex],
    ) -> Result<(), Error> {
        let payload = poe_reset_form(session, hash, ports)?;
        self.submit(session.family().poe_config_path(), session, &payload)
            .await
    }
}

/// Build the family-specific PoE settings payload.
pub fn poe_update_form(
    session: &SessionToken,
    hash: Option<&str>,
    current: &PoePortSetting,
    desired: &PoePortSetting,
) -> Result<FormPayload, Error> {
    match session.family() {
        SwitchFamily::Gs30x => Ok(gs30x::forms::poe_update(require_hash(hash)?, desired)),
        SwitchFamily::Gs316 => Ok(gs316::forms::poe_update(
            session.token().expose_secret(),
            current,
            desired,
        )),
    }
}

/// Build the family-specific power-cycle payload.
pub fn poe_reset_form(
    session: &SessionToken,
    hash: Option<&str>,
    ports: &[PortIndex],
) -> Result<FormPayload, Error> {
    match session.family() {
        SwitchFamily::Gs30x => Ok(gs30x::forms::poe_reset(require_hash(hash)?, ports)),
        SwitchFamily::Gs316 => Ok(gs316::forms::poe_reset(
            session.token().expose_secret(),
            ports,
            gs316::RESETTABLE_POE_PORTS,
        )),
    }
}
