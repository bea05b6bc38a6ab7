//! Port settings and link status handlers.

use serde::Serialize;
use tabled::Tabled;

use gsctl_config::Config;
use gsctl_core::mapping;
use gsctl_core::{PortSetting, PortSettingsChange, PortStatus, SwitchFamily};

use crate::cli::{GlobalOpts, PortArgs, PortCommand, PortSetArgs};
use crate::config;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Views ───────────────────────────────────────────────────────────

#[derive(Clone, Serialize, Tabled)]
struct PortSettingView {
    #[tabled(rename = "Port")]
    port: u8,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Speed")]
    speed: String,
    #[tabled(rename = "Ingress")]
    ingress_rate: String,
    #[tabled(rename = "Egress")]
    egress_rate: String,
    #[tabled(rename = "Flow Control")]
    flow_control: String,
}

impl PortSettingView {
    fn new(family: SwitchFamily, p: &PortSetting) -> Self {
        Self {
            port: p.index,
            name: p.name.clone(),
            speed: mapping::SPEED.display(&p.speed),
            ingress_rate: mapping::INGRESS_RATE.display(&p.ingress_rate),
            egress_rate: mapping::EGRESS_RATE.display(&p.egress_rate),
            flow_control: mapping::flow_control(family).display(&p.flow_control),
        }
    }
}

#[derive(Tabled)]
struct PortStatusRow {
    #[tabled(rename = "Port")]
    port: u8,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Link")]
    link: &'static str,
    #[tabled(rename = "Speed")]
    speed: String,
}

impl From<&PortStatus> for PortStatusRow {
    fn from(p: &PortStatus) -> Self {
        Self {
            port: p.index,
            name: p.name.clone(),
            link: if p.link_up { "up" } else { "down" },
            speed: p.link_speed.clone(),
        }
    }
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn handle(args: PortArgs, global: &GlobalOpts, cfg: &Config) -> Result<(), CliError> {
    let format = config::output_format(global, cfg);

    match args.command {
        PortCommand::Settings(filter) => {
            let mut session = config::open_session(&filter.target.address, global, cfg)?;
            let ports = session.get_port_settings(&filter.ports).await?;
            let family = util::family(&session)?;

            let views: Vec<PortSettingView> =
                ports.iter().map(|p| PortSettingView::new(family, p)).collect();
            let out = output::render_list(format, &views, PortSettingView::clone);
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PortCommand::Status(filter) => {
            let mut session = config::open_session(&filter.target.address, global, cfg)?;
            let status = session.get_port_status(&filter.ports).await?;

            let out = output::render_list(format, &status, |s| PortStatusRow::from(s));
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PortCommand::Set(set) => {
            let change = change_from(&set);
            if change.is_empty() {
                return Err(CliError::EmptyChange);
            }

            let ports = set.selection.ports;
            let mut session = config::open_session(&set.selection.target.address, global, cfg)?;
            let updated = session.set_port_settings(&ports, change).await?;
            let family = util::family(&session)?;

            output::print_status(
                &format!("Updated port settings for port(s) {}", util::port_list(&ports)),
                global.quiet,
            );
            let views: Vec<PortSettingView> = updated
                .iter()
                .map(|p| PortSettingView::new(family, p))
                .collect();
            let out = output::render_list(format, &views, PortSettingView::clone);
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

fn change_from(args: &PortSetArgs) -> PortSettingsChange {
    PortSettingsChange {
        name: args.name.clone(),
        speed: args.speed.clone(),
        ingress_rate: args.ingress_rate.clone(),
        egress_rate: args.egress_rate.clone(),
        flow_control: args.flow_control.clone(),
    }
}
