// GS305EP/GS308EP document extraction
//
// These firmwares render one `<li>` per port and keep the authoritative
// values in hidden inputs next to the visible widgets.

use scraper::Html;

use crate::error::Error;
use crate::html::{
    document_value, input_value, port_index, port_label, power_class, selector, telemetry_f32,
    telemetry_u32, text,
};
use crate::records::{PoePortSetting, PoePortStatus, PortSetting, PortStatus};

/// Anti-tampering hash that every write must echo back.
pub fn hash(doc: &Html) -> Result<String, Error> {
    document_value(doc, "input#hash")
        .ok_or_else(|| Error::extraction("hash", "no input#hash on the configuration page"))
}

/// Per-port settings from `/dashboard.cgi`.
pub fn port_settings(doc: &Html) -> Result<Vec<PortSetting>, Error> {
    doc.select(&selector("li.list_item"))
        .map(|item| {
            let hidden = |css| input_value(item, css).unwrap_or_default();
            Ok(PortSetting {
                index: port_index(&hidden("input[type=hidden].port"))?,
                name: hidden("input[type=hidden].portName"),
                speed: hidden("input[type=hidden].Speed"),
                ingress_rate: hidden("input[type=hidden].ingressRate"),
                egress_rate: hidden("input[type=hidden].egressRate"),
                flow_control: hidden("input[type=hidden].flowCtr"),
            })
        })
        .collect()
}

/// Link state from the same `/dashboard.cgi` list items.
pub fn port_status(doc: &Html) -> Result<Vec<PortStatus>, Error> {
    doc.select(&selector("li.list_item"))
        .map(|item| {
            let hidden = |css| input_value(item, css).unwrap_or_default();
            Ok(PortStatus {
                index: port_index(&hidden("input[type=hidden].port"))?,
                name: hidden("input[type=hidden].portName"),
                link_up: hidden("input[type=hidden].linkStatus") == "1",
                link_speed: hidden("input[type=hidden].linkSpeed"),
            })
        })
        .collect()
}

/// PoE settings from `/PoEPortConfig.cgi`.
pub fn poe_settings(doc: &Html) -> Result<Vec<PoePortSetting>, Error> {
    doc.select(&selector("li.poePortSettingListItem"))
        .map(|item| {
            let hidden = |css| input_value(item, css).unwrap_or_default();
            Ok(PoePortSetting {
                index: port_index(&hidden("input[type=hidden].port"))?,
                name: hidden("input[type=hidden].portName"),
                admin_enabled: hidden("input#hidPortPwr") == "1",
                power_mode: hidden("input#hidPwrMode"),
                priority: hidden("input#hidPortPrio"),
                limit_type: hidden("input#hidLimitType"),
                limit_watts: hidden("input.pwrLimit"),
                detection_type: hidden("input#hidDetecType"),
                longer_detection: hidden("input.longerDetect"),
            })
        })
        .collect()
}

/// Upper power-limit bound: the `max` of the first limit input, else its value.
pub fn max_power_limit(doc: &Html) -> Option<String> {
    let input = doc.select(&selector("input.pwrLimit")).next()?;
    input
        .value()
        .attr("max")
        .or_else(|| input.value().attr("value"))
        .map(str::to_owned)
}

/// Live PoE telemetry from `/getPoePortStatus.cgi`.
///
/// The telemetry block alternates label and value spans; values sit at
/// the odd positions in the order voltage, current, power, temperature,
/// fault text.
pub fn poe_status(doc: &Html) -> Result<Vec<PoePortStatus>, Error> {
    let values = selector("div.poe_port_status div div span");
    doc.select(&selector("li.poePortStatusListItem"))
        .map(|item| {
            let index = port_index(&input_value(item, "input[type=hidden].port").unwrap_or_default())?;
            let (_, name) = port_label(&text(item, "span.poe-port-index span"))?;

            let mut status = PoePortStatus {
                index,
                name,
                status: text(item, "span.poe-power-mode span"),
                power_class: power_class(&text(item, "span.poe-portPwr-width span")),
                voltage_v: 0,
                current_ma: 0,
                power_w: 0.0,
                temperature_c: 0,
                error: String::new(),
            };

            for (i, span) in item.select(&values).enumerate() {
                let value = span.text().collect::<String>();
                match i {
                    1 => status.voltage_v = telemetry_u32(&value),
                    3 => status.current_ma = telemetry_u32(&value),
                    5 => status.power_w = telemetry_f32(&value),
                    7 => status.temperature_c = telemetry_u32(&value),
                    9 => status.error = value.trim().to_owned(),
                    _ => {}
                }
            }
            Ok(status)
        })
        .collect()
}
