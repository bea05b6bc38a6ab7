//! PoE settings, telemetry and power-cycle handlers.

use serde::Serialize;
use tabled::Tabled;

use gsctl_config::Config;
use gsctl_core::mapping;
use gsctl_core::{PoePortSetting, PoePortStatus, PoeSettingsChange, SwitchFamily};

use crate::cli::{GlobalOpts, PoeArgs, PoeCommand, PoeSetArgs};
use crate::config;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Views ───────────────────────────────────────────────────────────

#[derive(Clone, Serialize, Tabled)]
struct PoeSettingView {
    #[tabled(rename = "Port")]
    port: u8,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Power")]
    power: &'static str,
    #[tabled(rename = "Mode")]
    power_mode: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Limit Type")]
    limit_type: String,
    #[tabled(rename = "Limit (W)")]
    power_limit: String,
    #[tabled(rename = "Detection")]
    detection_type: String,
    #[tabled(rename = "Longer Detection")]
    longer_detection: String,
}

impl PoeSettingView {
    fn new(family: SwitchFamily, p: &PoePortSetting) -> Self {
        Self {
            port: p.index,
            name: p.name.clone(),
            power: if p.admin_enabled { "enabled" } else { "disabled" },
            power_mode: mapping::POWER_MODE.display(&p.power_mode),
            priority: mapping::priority(family).display(&p.priority),
            limit_type: mapping::LIMIT_TYPE.display(&p.limit_type),
            power_limit: p.limit_watts.clone(),
            detection_type: mapping::detection_type(family).display(&p.detection_type),
            longer_detection: mapping::LONGER_DETECTION.display(&p.longer_detection),
        }
    }
}

#[derive(Tabled)]
struct PoeStatusRow {
    #[tabled(rename = "Port")]
    port: u8,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Class")]
    class: String,
    #[tabled(rename = "Voltage (V)")]
    voltage: u32,
    #[tabled(rename = "Current (mA)")]
    current: u32,
    #[tabled(rename = "Power (W)")]
    power: String,
    #[tabled(rename = "Temp (°C)")]
    temperature: u32,
    #[tabled(rename = "Error")]
    error: String,
}

impl From<&PoePortStatus> for PoeStatusRow {
    fn from(p: &PoePortStatus) -> Self {
        Self {
            port: p.index,
            name: p.name.clone(),
            status: p.status.clone(),
            class: p.power_class.clone(),
            voltage: p.voltage_v,
            current: p.current_ma,
            power: format!("{:.1}", p.power_w),
            temperature: p.temperature_c,
            error: p.error.clone(),
        }
    }
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn handle(args: PoeArgs, global: &GlobalOpts, cfg: &Config) -> Result<(), CliError> {
    let format = config::output_format(global, cfg);

    match args.command {
        PoeCommand::Status(filter) => {
            let mut session = config::open_session(&filter.target.address, global, cfg)?;
            let status = session.get_poe_status(&filter.ports).await?;

            let out = output::render_list(format, &status, |s| PoeStatusRow::from(s));
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PoeCommand::Settings(filter) => {
            let mut session = config::open_session(&filter.target.address, global, cfg)?;
            let settings = session.get_poe_settings(&filter.ports).await?;
            let family = util::family(&session)?;

            let views: Vec<PoeSettingView> = settings
                .iter()
                .map(|p| PoeSettingView::new(family, p))
                .collect();
            let out = output::render_list(format, &views, PoeSettingView::clone);
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PoeCommand::Set(set) => {
            let change = change_from(&set);
            if change.is_empty() {
                return Err(CliError::EmptyChange);
            }

            let ports = set.selection.ports;
            let mut session = config::open_session(&set.selection.target.address, global, cfg)?;
            let updated = session.set_poe_settings(&ports, change).await?;
            let family = util::family(&session)?;

            output::print_status(
                &format!("Updated PoE settings for port(s) {}", util::port_list(&ports)),
                global.quiet,
            );
            let views: Vec<PoeSettingView> = updated
                .iter()
                .map(|p| PoeSettingView::new(family, p))
                .collect();
            let out = output::render_list(format, &views, PoeSettingView::clone);
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PoeCommand::Cycle(selection) => {
            let ports = selection.ports;
            let prompt = format!(
                "Power-cycle PoE port(s) {}? Attached devices will lose power.",
                util::port_list(&ports)
            );
            if !util::confirm(&prompt, global.yes)? {
                return Ok(());
            }

            let mut session = config::open_session(&selection.target.address, global, cfg)?;
            let cycled = session.cycle_poe_power(&ports).await?;
            let family = util::family(&session)?;

            output::print_status(
                &format!("Power-cycled port(s) {}", util::port_list(&ports)),
                global.quiet,
            );
            let views: Vec<PoeSettingView> = cycled
                .iter()
                .map(|p| PoeSettingView::new(family, p))
                .collect();
            let out = output::render_list(format, &views, PoeSettingView::clone);
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

fn change_from(args: &PoeSetArgs) -> PoeSettingsChange {
    PoeSettingsChange {
        admin: args.power.clone(),
        power_mode: args.mode.clone(),
        priority: args.priority.clone(),
        limit_type: args.limit_type.clone(),
        power_limit: args.power_limit.clone(),
        detection_type: args.detection_type.clone(),
        longer_detection: args.longer_detection.clone(),
    }
}
