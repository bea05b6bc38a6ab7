// GS316EP/GS316EPP document extraction
//
// The dashboard renders parallel per-column lists that are zipped back
// together by position. Values there are visible labels, not codes.

use scraper::Html;

use crate::error::Error;
use crate::html::{
    input_value, port_index, port_label, power_class, selector, telemetry_f32, telemetry_u32,
    text, texts,
};
use crate::records::{PoePortSetting, PoePortStatus, PortSetting, PortStatus};

/// Per-port settings from `/iss/specific/dashboard.html`, as displayed labels.
pub fn port_settings(doc: &Html) -> Result<Vec<PortSetting>, Error> {
    let mut ports = Vec::new();
    for block in doc.select(&selector("div.dashboard-port-status")) {
        let numbers = texts(block, "span.port-number");
        let names = texts(block, "span.port-name span.name");
        let speeds = texts(block, "p.speed-text");
        let ingress = texts(block, "p.ingress-text");
        let egress = texts(block, "p.egress-text");
        let flow = texts(block, "p.flow-text");

        for (i, number) in numbers.iter().enumerate() {
            let column = |list: &[String]| list.get(i).cloned().unwrap_or_default();
            ports.push(PortSetting {
                index: port_index(number)?,
                name: column(&names),
                speed: column(&speeds),
                ingress_rate: column(&ingress),
                egress_rate: column(&egress),
                flow_control: column(&flow),
            });
        }
    }
    Ok(ports)
}

/// Link state from the same dashboard columns.
pub fn port_status(doc: &Html) -> Result<Vec<PortStatus>, Error> {
    let mut ports = Vec::new();
    for block in doc.select(&selector("div.dashboard-port-status")) {
        let numbers = texts(block, "span.port-number");
        let names = texts(block, "span.port-name span.name");
        let links = texts(block, "p.link-text");
        let speeds = texts(block, "p.link-speed-text");

        for (i, number) in numbers.iter().enumerate() {
            let column = |list: &[String]| list.get(i).cloned().unwrap_or_default();
            ports.push(PortStatus {
                index: port_index(number)?,
                name: column(&names),
                link_up: column(&links).eq_ignore_ascii_case("up"),
                link_speed: column(&speeds),
            });
        }
    }
    Ok(ports)
}

/// PoE settings from `/iss/specific/poePortConf.html`.
pub fn poe_settings(doc: &Html) -> Result<Vec<PoePortSetting>, Error> {
    doc.select(&selector("div.port-wrap"))
        .map(|wrap| {
            let (index, name) = port_label(&text(wrap, "span.port-number"))?;
            let hidden = |css| input_value(wrap, css).unwrap_or_default();
            Ok(PoePortSetting {
                index,
                name,
                admin_enabled: hidden("input.hidPortPwr") == "1",
                power_mode: hidden("input.hidPwrMode"),
                priority: hidden("input.hidPortPrio"),
                limit_type: hidden("input.hidLimitType"),
                limit_watts: hidden("input.hidPwrLimit"),
                detection_type: hidden("input.hidDetecType"),
                longer_detection: hidden("input.hidDisconnectType"),
            })
        })
        .collect()
}

/// Live PoE telemetry from `/iss/specific/poePortStatus.html?GetData=TRUE`.
pub fn poe_status(doc: &Html) -> Result<Vec<PoePortStatus>, Error> {
    doc.select(&selector("div.port-wrap"))
        .map(|wrap| {
            let (index, name) = port_label(&text(wrap, "span.port-number"))?;
            Ok(PoePortStatus {
                index,
                name,
                status: text(wrap, "span.Status-text"),
                power_class: power_class(&text(wrap, "span.Class-text")),
                voltage_v: telemetry_u32(&text(wrap, "p.OutputVoltage-text")),
                current_ma: telemetry_u32(&text(wrap, "p.OutputCurrent-text")),
                power_w: telemetry_f32(&text(wrap, "p.OutputPower-text")),
                temperature_c: telemetry_u32(&text(wrap, "p.Temperature-text")),
                error: text(wrap, "p.Fault-Status-text"),
            })
        })
        .collect()
}
