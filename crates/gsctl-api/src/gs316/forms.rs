// GS316EP/GS316EPP write payloads
//
// Field order matters on these endpoints, so payloads are assembled in a
// fixed sequence. `NOTSET` tells the firmware to keep its current value.

use tracing::warn;

use crate::form::FormPayload;
use crate::records::{PoePortSetting, PortIndex, PortSetting};

/// Keep-current sentinel understood by the firmware.
pub const NOTSET: &str = "NOTSET";

/// Port settings update for `/iss/specific/dashboard.html`.
///
/// Fields whose desired value equals the current one are sent as
/// [`NOTSET`]; the name is always sent.
pub fn port_update(gambit: &str, current: &PortSetting, desired: &PortSetting) -> FormPayload {
    let mut payload = FormPayload::new()
        .field("Gambit", gambit)
        .field("TYPE", "portInfo")
        .field("PORT_NO", desired.index.to_string())
        .field("PORT_NAME", &desired.name)
        .field("COLOR1G", NOTSET)
        .field("COLOR100M", NOTSET)
        .field("FREQUENCY", "-1")
        .field("BRIGHTNESS", "undefined")
        .field("STATUS", "0")
        .field("INGRESS", changed(&current.ingress_rate, &desired.ingress_rate))
        .field("EGRESS", changed(&current.egress_rate, &desired.egress_rate))
        .field("FLOW_CONTROL", changed(&current.flow_control, &desired.flow_control));

    let (mode, speed, duplex) = if current.speed == desired.speed {
        (NOTSET, NOTSET, NOTSET)
    } else {
        speed_control(&desired.speed)
    };
    payload.push("PORT_CTRL_MODE", mode);
    payload.push("PORT_CTRL_SPEED", speed);
    payload.push("PORT_CTRL_DUPLEX", duplex);
    payload
}

/// `want`, or [`NOTSET`] when it matches `now`.
fn changed(now: &str, want: &str) -> String {
    if now == want { NOTSET.to_owned() } else { want.to_owned() }
}

/// Split a speed code into the firmware's mode/speed/duplex triple.
fn speed_control(code: &str) -> (&'static str, &'static str, &'static str) {
    match code {
        "1" => ("1", NOTSET, NOTSET),
        "2" => ("3", NOTSET, NOTSET),
        "3" => ("2", "1", "2"),
        "4" => ("2", "1", "1"),
        "5" => ("2", "2", "2"),
        "6" => ("2", "2", "1"),
        other => {
            warn!(code = other, "speed code has no port control mapping, leaving unchanged");
            (NOTSET, NOTSET, NOTSET)
        }
    }
}

/// PoE settings update for `/iss/specific/poePortConf.html`.
///
/// Every field whose desired value equals the current one is sent as
/// [`NOTSET`]. The power limit travels in tenths of a watt.
pub fn poe_update(gambit: &str, current: &PoePortSetting, desired: &PoePortSetting) -> FormPayload {
    let limit = if current.limit_watts == desired.limit_watts {
        None
    } else {
        deciwatts(&desired.limit_watts)
    };
    let admin = match (current.admin_enabled, desired.admin_enabled) {
        (now, want) if now == want => NOTSET,
        (_, true) => "1",
        (_, false) => "0",
    };

    FormPayload::new()
        .field("Gambit", gambit)
        .field("TYPE", "submitPoe")
        .field("PORT_NO", desired.index.to_string())
        .field(
            "POWER_LIMIT_VALUE",
            limit.map_or_else(|| NOTSET.to_owned(), |l| l.to_string()),
        )
        .field("PRIORITY", changed(&current.priority, &desired.priority))
        .field("POWER_MODE", changed(&current.power_mode, &desired.power_mode))
        .field("POWER_LIMIT_TYPE", changed(&current.limit_type, &desired.limit_type))
        .field("DETECTION", changed(&current.detection_type, &desired.detection_type))
        .field("ADMIN_STATE", admin)
        .field(
            "DISCONNECT_TYPE",
            changed(&current.longer_detection, &desired.longer_detection),
        )
}

/// Power-cycle the listed ports through a single bit mask.
pub fn poe_reset(gambit: &str, ports: &[PortIndex], resettable: u8) -> FormPayload {
    FormPayload::new()
        .field("Gambit", gambit)
        .field("TYPE", "resetPoe")
        .field("PoePort", reset_mask(ports, resettable))
}

/// One character per resettable port, `1` where port `i + 1` is selected.
pub fn reset_mask(ports: &[PortIndex], resettable: u8) -> String {
    (1..=resettable)
        .map(|port| if ports.contains(&port) { '1' } else { '0' })
        .collect()
}

/// `"15.0"` → `150`.
fn deciwatts(watts: &str) -> Option<u32> {
    let watts = watts.trim();
    let (whole, frac) = watts.split_once('.').unwrap_or((watts, "0"));
    let whole: u32 = whole.parse().ok()?;
    let tenth = frac.chars().next().unwrap_or('0').to_digit(10)?;
    Some(whole * 10 + tenth)
}
