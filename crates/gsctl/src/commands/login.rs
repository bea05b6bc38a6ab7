//! Login and model detection.

use secrecy::SecretString;

use gsctl_config::Config;

use crate::cli::{GlobalOpts, LoginArgs};
use crate::config;
use crate::error::CliError;
use crate::output;

pub async fn handle(args: LoginArgs, global: &GlobalOpts, cfg: &Config) -> Result<(), CliError> {
    let mut session = config::open_session(&args.target.address, global, cfg)?;

    let password = match args.password {
        Some(password) => SecretString::from(password),
        None => SecretString::from(rpassword::prompt_password("Switch password: ")?),
    };

    let model = session.login(&password).await?;
    output::print_status(
        &format!("Logged in to {} ({model})", session.address()),
        global.quiet,
    );
    Ok(())
}
