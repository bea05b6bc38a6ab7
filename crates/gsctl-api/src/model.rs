// Switch models and the two firmware families behind them.
//
// Every family-sensitive decision (paths, auth attachment, port bounds)
// is a pure function of `SwitchFamily`. Callers resolve the family once
// per session and thread it through; nothing here performs I/O.

use strum::{AsRefStr, Display, EnumIter, EnumString};

/// A concrete switch model, as detected from the root page or declared by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr)]
#[strum(ascii_case_insensitive)]
pub enum SwitchModel {
    #[strum(serialize = "GS305EP")]
    Gs305ep,
    #[strum(serialize = "GS305EPP")]
    Gs305epp,
    #[strum(serialize = "GS308EP")]
    Gs308ep,
    #[strum(serialize = "GS308EPP")]
    Gs308epp,
    /// Any 5/8-port model of the older firmware; the root page does not
    /// say which one it is.
    #[strum(serialize = "GS30xEPx")]
    Gs30xEpx,
    #[strum(serialize = "GS316EP")]
    Gs316ep,
    #[strum(serialize = "GS316EPP")]
    Gs316epp,
}

/// The two incompatible firmware generations.
///
/// - [`Gs30x`](Self::Gs30x): `SID` cookie auth, anti-tampering hash on
///   every write, list-item-per-port markup with hidden inputs.
/// - [`Gs316`](Self::Gs316): `Gambit` query-token auth, no hash,
///   div-per-port markup with visible text labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum SwitchFamily {
    #[strum(serialize = "GS30x")]
    Gs30x,
    #[strum(serialize = "GS316")]
    Gs316,
}

const LEGACY_LOGIN_MARKER: &str = "Redirect to Login";

impl SwitchModel {
    /// Classify a root-page body.
    ///
    /// Pure over the body: the same document always yields the same answer.
    /// The more specific `GS316EPP` marker is checked before `GS316EP`,
    /// which is a prefix of it.
    pub fn detect(body: &str) -> Option<Self> {
        if !body.to_ascii_lowercase().contains("<title>") {
            return None;
        }
        if body.contains("GS316EPP") {
            Some(Self::Gs316epp)
        } else if body.contains("GS316EP") {
            Some(Self::Gs316ep)
        } else if body.contains(LEGACY_LOGIN_MARKER) {
            Some(Self::Gs30xEpx)
        } else {
            None
        }
    }

    /// The firmware family this model belongs to.
    pub fn family(self) -> SwitchFamily {
        match self {
            Self::Gs305ep | Self::Gs305epp | Self::Gs308ep | Self::Gs308epp | Self::Gs30xEpx => {
                SwitchFamily::Gs30x
            }
            Self::Gs316ep | Self::Gs316epp => SwitchFamily::Gs316,
        }
    }

    /// Physical port count of the model.
    pub fn max_ports(self) -> u8 {
        match self {
            Self::Gs305ep | Self::Gs305epp => 5,
            Self::Gs308ep | Self::Gs308epp | Self::Gs30xEpx => 8,
            Self::Gs316ep | Self::Gs316epp => 16,
        }
    }
}

impl SwitchFamily {
    // ── Paths ────────────────────────────────────────────────────────

    /// Page serving the login seed.
    pub fn login_seed_path(self) -> &'static str {
        match self {
            Self::Gs30x => "/login.cgi",
            Self::Gs316 => "/wmi/login",
        }
    }

    /// Endpoint accepting the password digest.
    pub fn login_path(self) -> &'static str {
        match self {
            Self::Gs30x => "/login.cgi",
            Self::Gs316 => "/redirect.html",
        }
    }

    /// Form field carrying the password digest.
    pub fn login_field(self) -> &'static str {
        match self {
            Self::Gs30x => "password",
            Self::Gs316 => "LoginPassword",
        }
    }

    /// Page listing per-port settings (and link status).
    pub fn port_config_path(self) -> &'static str {
        match self {
            Self::Gs30x => "/dashboard.cgi",
            Self::Gs316 => "/iss/specific/dashboard.html",
        }
    }

    /// Endpoint accepting per-port setting updates.
    pub fn port_update_path(self) -> &'static str {
        match self {
            Self::Gs30x => "/port_status.cgi",
            Self::Gs316 => "/iss/specific/dashboard.html",
        }
    }

    /// Page listing PoE configuration; also the PoE update and reset endpoint.
    pub fn poe_config_path(self) -> &'static str {
        match self {
            Self::Gs30x => "/PoEPortConfig.cgi",
            Self::Gs316 => "/iss/specific/poePortConf.html",
        }
    }

    /// Page listing live PoE telemetry.
    pub fn poe_status_path(self) -> &'static str {
        match self {
            Self::Gs30x => "/getPoePortStatus.cgi",
            Self::Gs316 => "/iss/specific/poePortStatus.html?GetData=TRUE",
        }
    }

    /// Authenticated pages worth capturing in a debug report.
    pub fn diagnostic_paths(self) -> &'static [&'static str] {
        match self {
            Self::Gs30x => &[
                "/getPoePortStatus.cgi",
                "/PoEPortConfig.cgi",
                "/port_status.cgi",
                "/dashboard.cgi",
            ],
            Self::Gs316 => &[
                "/iss/specific/poe.html",
                "/iss/specific/poePortConf.html",
                "/iss/specific/poePortStatus.html",
                "/iss/specific/poePortStatus.html?GetData=TRUE",
                "/iss/specific/getPortRate.html",
                "/iss/specific/dashboard.html",
                "/iss/specific/homepage.html",
            ],
        }
    }

    // ── Bounds ───────────────────────────────────────────────────────

    /// Fixed port bound of the family, if it has one.
    ///
    /// `Gs30x` models differ in port count, so the page the switch serves
    /// is the authority there and this returns `None`.
    pub fn fixed_port_count(self) -> Option<u8> {
        match self {
            Self::Gs30x => None,
            Self::Gs316 => Some(16),
        }
    }

    /// Highest port index that accepts a PoE power-cycle, if fixed.
    pub fn resettable_poe_ports(self) -> Option<u8> {
        match self {
            Self::Gs30x => None,
            Self::Gs316 => Some(crate::gs316::RESETTABLE_POE_PORTS),
        }
    }

    /// Power-limit granularity, in tenths of a watt.
    pub fn power_limit_step(self) -> u32 {
        match self {
            Self::Gs30x => 1,
            Self::Gs316 => 2,
        }
    }

    /// Maximum power limit when the configuration page does not report one.
    pub fn default_max_power_limit(self) -> &'static str {
        "30.0"
    }

    /// Whether writes must echo the anti-tampering hash from the config page.
    pub fn requires_hash(self) -> bool {
        matches!(self, Self::Gs30x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn detects_gs316epp_before_gs316ep() {
        let body = "<html><head><title>NETGEAR GS316EPP</title></head></html>";
        assert_eq!(SwitchModel::detect(body), Some(SwitchModel::Gs316epp));

        let body = "<html><head><title>NETGEAR GS316EP</title></head></html>";
        assert_eq!(SwitchModel::detect(body), Some(SwitchModel::Gs316ep));
    }

    #[test]
    fn detects_legacy_redirect_marker() {
        let body = "<html><head><TITLE>Redirect to Login</TITLE></head></html>";
        assert_eq!(SwitchModel::detect(body), Some(SwitchModel::Gs30xEpx));
        assert_eq!(SwitchModel::Gs30xEpx.family(), SwitchFamily::Gs30x);
    }

    #[test]
    fn detection_requires_a_title() {
        assert_eq!(SwitchModel::detect("GS316EP"), None);
        assert_eq!(SwitchModel::detect("<title>Some router</title>"), None);
    }

    #[test]
    fn detection_is_pure_over_the_body() {
        let body = "<title>GS316EP</title>";
        let first = SwitchModel::detect(body);
        for _ in 0..3 {
            assert_eq!(SwitchModel::detect(body), first);
        }
    }

    #[test]
    fn model_names_round_trip() {
        use strum::IntoEnumIterator;
        for model in SwitchModel::iter() {
            assert_eq!(SwitchModel::from_str(model.as_ref()), Ok(model));
        }
        assert_eq!(SwitchModel::from_str("gs308epp"), Ok(SwitchModel::Gs308epp));
    }

    #[test]
    fn family_bounds() {
        assert_eq!(SwitchFamily::Gs316.fixed_port_count(), Some(16));
        assert_eq!(SwitchFamily::Gs316.resettable_poe_ports(), Some(15));
        assert_eq!(SwitchFamily::Gs30x.fixed_port_count(), None);
        assert_eq!(SwitchModel::Gs305ep.max_ports(), 5);
    }
}
