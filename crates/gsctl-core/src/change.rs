// Sparse change requests.
//
// `None` keeps the current value; `Some` carries the operator's label,
// validated and encoded by the merge engine.

/// Requested changes to per-port settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortSettingsChange {
    /// An empty string blanks the name.
    pub name: Option<String>,
    pub speed: Option<String>,
    pub ingress_rate: Option<String>,
    pub egress_rate: Option<String>,
    pub flow_control: Option<String>,
}

impl PortSettingsChange {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Requested changes to per-port PoE settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoeSettingsChange {
    /// `enable`/`enabled` or `disable`/`disabled`; anything else keeps the state.
    pub admin: Option<String>,
    pub power_mode: Option<String>,
    pub priority: Option<String>,
    pub limit_type: Option<String>,
    /// Decimal watts.
    pub power_limit: Option<String>,
    pub detection_type: Option<String>,
    pub longer_detection: Option<String>,
}

impl PoeSettingsChange {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
