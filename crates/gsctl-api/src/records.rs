// Typed records extracted from switch documents.
//
// `Gs30x` pages serve device codes (`"1"`, `"3"`, ...) and records carry
// them as-is. `Gs316` pages show display labels, which are returned raw;
// `gsctl-core` normalizes them to codes through its mapping tables.

use serde::Serialize;

/// 1-based physical port number.
pub type PortIndex = u8;

/// Writable per-port settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortSetting {
    pub index: PortIndex,
    pub name: String,
    pub speed: String,
    pub ingress_rate: String,
    pub egress_rate: String,
    pub flow_control: String,
}

/// Writable per-port PoE settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoePortSetting {
    pub index: PortIndex,
    pub name: String,
    pub admin_enabled: bool,
    pub power_mode: String,
    pub priority: String,
    pub limit_type: String,
    /// Decimal watts with one fractional digit, e.g. `"30.0"`.
    pub limit_watts: String,
    pub detection_type: String,
    pub longer_detection: String,
}

/// Live PoE telemetry for one port.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoePortStatus {
    pub index: PortIndex,
    pub name: String,
    pub status: String,
    pub power_class: String,
    pub voltage_v: u32,
    pub current_ma: u32,
    pub power_w: f32,
    pub temperature_c: u32,
    pub error: String,
}

/// Link state for one port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortStatus {
    pub index: PortIndex,
    pub name: String,
    pub link_up: bool,
    pub link_speed: String,
}

/// Port settings plus the write hash served alongside them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortSettingsPage {
    pub ports: Vec<PortSetting>,
    /// Anti-tampering hash; `Some` on `Gs30x` only.
    pub hash: Option<String>,
}

/// PoE settings plus the values a PoE write needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoeConfigPage {
    pub ports: Vec<PoePortSetting>,
    pub hash: Option<String>,
    /// Upper power-limit bound in decimal watts.
    pub max_power_limit: String,
}

/// One page captured for a debug report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DebugPage {
    pub url: String,
    pub authenticated: bool,
    pub status: Option<u16>,
    /// Response body, or the transport error text if the fetch failed.
    pub body: String,
}
