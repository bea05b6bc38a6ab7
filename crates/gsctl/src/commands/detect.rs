//! Model detection command.

use serde::Serialize;

use gsctl_config::Config;

use crate::cli::{AddressArgs, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct Detected {
    address: String,
    model: String,
    family: String,
    ports: u8,
}

fn detail(d: &Detected) -> String {
    [
        format!("Address: {}", d.address),
        format!("Model:   {}", d.model),
        format!("Family:  {}", d.family),
        format!("Ports:   {}", d.ports),
    ]
    .join("\n")
}

pub async fn handle(args: AddressArgs, global: &GlobalOpts, cfg: &Config) -> Result<(), CliError> {
    let session = config::open_session(&args.address, global, cfg)?;
    let model = session.detect_model().await?;

    let detected = Detected {
        address: session.address().to_owned(),
        model: model.to_string(),
        family: model.family().to_string(),
        ports: model.max_ports(),
    };
    let out = output::render_single(config::output_format(global, cfg), &detected, detail);
    output::print_output(&out, global.quiet);
    Ok(())
}
