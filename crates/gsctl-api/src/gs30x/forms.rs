// GS305EP/GS308EP write payloads
//
// Every payload leads with the hash from the page it was derived from.
// PoE endpoints address ports 0-based; the port settings endpoint uses
// the index exactly as served in the hidden `port` input.

use crate::form::FormPayload;
use crate::records::{PoePortSetting, PortIndex, PortSetting};

/// Port settings update for `/port_status.cgi`.
pub fn port_update(hash: &str, desired: &PortSetting) -> FormPayload {
    FormPayload::new()
        .field("hash", hash)
        .field(format!("port{}", desired.index), "checked")
        .field("SPEED", &desired.speed)
        .field("FLOW_CONTROL", &desired.flow_control)
        .field("DESCRIPTION", &desired.name)
        .field("IngressRate", &desired.ingress_rate)
        .field("EgressRate", &desired.egress_rate)
        .field("priority", "0")
}

/// PoE settings update for `/PoEPortConfig.cgi`.
pub fn poe_update(hash: &str, desired: &PoePortSetting) -> FormPayload {
    FormPayload::new()
        .field("hash", hash)
        .field("ACTION", "Apply")
        .field("portID", wire_port(desired.index).to_string())
        .field("ADMIN_MODE", if desired.admin_enabled { "1" } else { "0" })
        .field("PORT_PRIO", &desired.priority)
        .field("POW_MOD", &desired.power_mode)
        .field("POW_LIMT_TYP", &desired.limit_type)
        .field("POW_LIMT", &desired.limit_watts)
        .field("DETEC_TYP", &desired.detection_type)
        .field("DISCONNECT_TYP", &desired.longer_detection)
}

/// Power-cycle every listed port in one submission.
pub fn poe_reset(hash: &str, ports: &[PortIndex]) -> FormPayload {
    let mut payload = FormPayload::new().field("hash", hash).field("ACTION", "Reset");
    for &port in ports {
        payload.push(format!("port{}", wire_port(port)), "checked");
    }
    payload
}

fn wire_port(index: PortIndex) -> u8 {
    index.saturating_sub(1)
}
