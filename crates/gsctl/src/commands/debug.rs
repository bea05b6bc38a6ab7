//! Debug report: raw page capture for troubleshooting unsupported firmware.

use gsctl_config::Config;
use gsctl_core::DebugPage;

use crate::cli::{AddressArgs, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

fn detail(pages: &[DebugPage]) -> String {
    pages
        .iter()
        .map(|page| {
            let status = page
                .status
                .map_or_else(|| "error".to_owned(), |s| s.to_string());
            let access = if page.authenticated { "auth" } else { "public" };
            format!(
                "==== {} [{access}, {status}] ====\n{}",
                page.url,
                page.body.trim_end()
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub async fn handle(args: AddressArgs, global: &GlobalOpts, cfg: &Config) -> Result<(), CliError> {
    let mut session = config::open_session(&args.address, global, cfg)?;
    let pages = session.debug_report().await;

    let out = output::render_single(config::output_format(global, cfg), &pages, |p| detail(p));
    output::print_output(&out, global.quiet);
    Ok(())
}
