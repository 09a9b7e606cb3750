//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a process exit code.

use miette::Diagnostic;
use thiserror::Error;

use clusync_config::ConfigError;
use clusync_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to cluster at {url}")]
    #[diagnostic(
        code(clusync::connection_failed),
        help(
            "Check that the cluster is reachable and the API port is correct.\n\
             Cause: {reason}"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(clusync::auth_failed),
        help(
            "Verify the username and password in the credentials file, the\n\
             CLUSYNC_<ROLE>_PASSWORD variables or the keyring.\n\
             Run: clusync config store-password <role>"
        )
    )]
    AuthFailed { message: String },

    #[error("No {field} available for the {role} credentials")]
    #[diagnostic(
        code(clusync::no_credentials),
        help(
            "Add it to the credentials file, set CLUSYNC_{env_role}_{env_field}, \
             or answer the prompt."
        )
    )]
    NoCredentials {
        role: String,
        field: String,
        env_role: String,
        env_field: String,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(clusync::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration could not be loaded")]
    #[diagnostic(code(clusync::config), help("{message}"))]
    Config { message: String },

    #[error("Keyring error: {message}")]
    #[diagnostic(code(clusync::keyring))]
    Keyring { message: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Prompt failed: {message}")]
    #[diagnostic(
        code(clusync::prompt),
        help("Use --auto-approve (-a) and a credentials file in non-interactive contexts.")
    )]
    Prompt { message: String },

    // ── Other ────────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(clusync::internal))]
    Internal { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            CoreError::Prompt { message } => CliError::Prompt { message },
            other => CliError::Internal {
                message: other.to_string(),
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { role, field } => CliError::NoCredentials {
                env_role: role.to_string().to_uppercase(),
                env_field: field.to_uppercase(),
                role: role.to_string(),
                field,
            },
            ConfigError::Prompt { message } => CliError::Prompt { message },
            ConfigError::Keyring { message } => CliError::Keyring { message },
            ConfigError::Io(e) => CliError::Io(e),
            other @ (ConfigError::Serialization(_) | ConfigError::Figment(_)) => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}
