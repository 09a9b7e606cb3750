//! Terminal implementations of the engine's and config crate's prompt seams.

use dialoguer::Input;
use secrecy::{ExposeSecret, SecretString};

use clusync_config::{ConfigError, CredentialPrompt, CredentialResolver, CredentialRole};
use clusync_core::{BindCredentials, CoreError, DirectoryService, Prompter, SecretSource};

/// Environment variable holding the password given to newly created users.
pub const USER_PASSWORD_ENV: &str = "CLUSYNC_USER_PASSWORD";

fn read_line(question: &str, default: Option<&str>) -> Result<String, dialoguer::Error> {
    let mut input = Input::<String>::new().with_prompt(question).allow_empty(true);
    if let Some(default) = default {
        input = input.default(default.to_owned()).show_default(true);
    }
    input.interact_text()
}

fn read_secret(label: &str) -> std::io::Result<SecretString> {
    rpassword::prompt_password(format!("{label}: ")).map(SecretString::from)
}

/// Approval questions answered on the terminal.
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn ask(&mut self, question: &str) -> Result<String, CoreError> {
        read_line(&format!("{question} [y/N]"), None).map_err(|e| CoreError::Prompt {
            message: e.to_string(),
        })
    }
}

/// Missing credential fields asked on the terminal; secrets are masked.
pub struct TerminalCredentials;

impl CredentialPrompt for TerminalCredentials {
    fn text(&mut self, label: &str, default: Option<&str>) -> Result<String, ConfigError> {
        read_line(label, default).map_err(|e| ConfigError::Prompt {
            message: e.to_string(),
        })
    }

    fn secret(&mut self, label: &str) -> Result<SecretString, ConfigError> {
        read_secret(label).map_err(|e| ConfigError::Prompt {
            message: e.to_string(),
        })
    }
}

/// Secrets for `apply`: the initial user password and directory-service
/// bind credentials, resolved lazily so nothing is asked unless needed.
pub struct CliSecrets<P> {
    resolver: CredentialResolver<P>,
}

impl<P: CredentialPrompt> CliSecrets<P> {
    pub fn new(resolver: CredentialResolver<P>) -> Self {
        Self { resolver }
    }
}

impl<P: CredentialPrompt> SecretSource for CliSecrets<P> {
    fn initial_user_password(&mut self) -> Result<SecretString, CoreError> {
        if let Ok(pw) = std::env::var(USER_PASSWORD_ENV) {
            if !pw.is_empty() {
                return Ok(SecretString::from(pw));
            }
        }
        let pw = self
            .resolver
            .prompt_mut()
            .secret("initial password for new users")
            .map_err(|e| CoreError::Prompt {
                message: e.to_string(),
            })?;
        if pw.expose_secret().is_empty() {
            return Err(CoreError::Prompt {
                message: "an initial password is required to create users".into(),
            });
        }
        Ok(pw)
    }

    fn bind_credentials(&mut self, service: DirectoryService) -> Result<BindCredentials, CoreError> {
        let role = match service {
            DirectoryService::Ldap => CredentialRole::Ldap,
            DirectoryService::Ad => CredentialRole::Ad,
        };
        self.resolver
            .resolve_bind(role)
            .map_err(|e| CoreError::Prompt {
                message: e.to_string(),
            })
    }
}
