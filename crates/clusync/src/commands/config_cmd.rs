//! Config subcommand handlers.

use secrecy::{ExposeSecret, SecretString};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

use super::credential_role;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let cfg = config::effective_config(global)?;
            output::print_output(&config::to_toml(&cfg)?, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::StorePassword { role } => {
            let role = credential_role(role);
            let password = SecretString::from(rpassword::prompt_password(format!(
                "{role} password: "
            ))?);
            if password.expose_secret().is_empty() {
                return Err(CliError::Validation {
                    field: "password".into(),
                    reason: "password cannot be empty".into(),
                });
            }
            clusync_config::store_password(role, &password)?;
            if !global.quiet {
                eprintln!("   ✓ {role} password stored in system keyring");
            }
            Ok(())
        }
    }
}
