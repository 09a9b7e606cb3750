//! Configuration for the clusync CLI.
//!
//! TOML defaults, the optional `credentials.json` file, and the credential
//! resolution chain (file, environment, keyring, prompt) that turns them
//! into `clusync_core::ClusterConfig` and `BindCredentials`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use thiserror::Error;
use tracing::debug;

use clusync_core::{BindCredentials, ClusterConfig, LiveState, TlsVerification};

/// Keyring service name for stored passwords.
pub const KEYRING_SERVICE: &str = "clusync";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no {field} available for the {role} credentials")]
    NoCredentials { role: CredentialRole, field: String },

    #[error("prompt failed: {message}")]
    Prompt { message: String },

    #[error("keyring error: {message}")]
    Keyring { message: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    /// Directory holding the snapshot JSON files.
    #[serde(default = "default_snapshot_dir")]
    pub snapshot_dir: PathBuf,

    /// Persistent audit log.
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,

    #[serde(default = "default_credentials_file")]
    pub credentials_file: PathBuf,

    /// API port used when the credentials do not name one.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Accept self-signed certificates.
    #[serde(default = "default_insecure")]
    pub insecure: bool,

    /// CA certificate used instead of the system store when not insecure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    #[serde(default)]
    pub live_state: LiveState,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            snapshot_dir: default_snapshot_dir(),
            log_file: default_log_file(),
            credentials_file: default_credentials_file(),
            port: default_port(),
            timeout: default_timeout(),
            insecure: default_insecure(),
            ca_cert: None,
            live_state: LiveState::default(),
        }
    }
}

impl Defaults {
    pub fn tls(&self) -> TlsVerification {
        if self.insecure {
            TlsVerification::DangerAcceptInvalid
        } else if let Some(ref ca) = self.ca_cert {
            TlsVerification::CustomCa(ca.clone())
        } else {
            TlsVerification::SystemDefaults
        }
    }
}

fn default_snapshot_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_log_file() -> PathBuf {
    PathBuf::from("clusync.log")
}
fn default_credentials_file() -> PathBuf {
    PathBuf::from("credentials.json")
}
fn default_port() -> u16 {
    8000
}
fn default_timeout() -> u64 {
    30
}
fn default_insecure() -> bool {
    true
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "clusync", "clusync").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("clusync");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load Config from `path` + environment.
///
/// Environment keys nest with a double underscore:
/// `CLUSYNC_DEFAULTS__SNAPSHOT_DIR=/srv/snap`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("CLUSYNC_").split("__"));

    let config: Config = figment.extract()?;
    debug!(path = %path.display(), "configuration loaded");
    Ok(config)
}

/// Render the effective configuration as TOML.
pub fn to_toml(cfg: &Config) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(cfg)?)
}

// ── Credentials file ────────────────────────────────────────────────

/// Whose credentials: one of the two clusters or a directory service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum CredentialRole {
    /// The cluster a snapshot is dumped from.
    Primary,
    /// The cluster a snapshot is applied to.
    Secondary,
    Ldap,
    Ad,
}

impl CredentialRole {
    /// Environment variable for one field, e.g. `CLUSYNC_PRIMARY_PASSWORD`.
    pub fn env_var(self, field: &str) -> String {
        format!("CLUSYNC_{}_{}", self.to_string().to_uppercase(), field.to_uppercase())
    }

    /// Keyring account holding this role's password.
    pub fn keyring_account(self) -> String {
        format!("{self}/password")
    }
}

/// Contents of `credentials.json`. Every field is optional; gaps are
/// filled from the environment, the keyring or a prompt.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CredentialsFile {
    #[serde(default)]
    pub primary: Option<ClusterEntry>,
    #[serde(default)]
    pub secondary: Option<ClusterEntry>,
    #[serde(default)]
    pub ldap: Option<BindEntry>,
    #[serde(default)]
    pub ad: Option<BindEntry>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct ClusterEntry {
    #[serde(default)]
    pub cluster_address: Option<String>,
    #[serde(default)]
    pub port: Option<PortValue>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct BindEntry {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Ports appear both as numbers and as strings in hand-written files.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum PortValue {
    Number(u16),
    Text(String),
}

impl PortValue {
    fn as_text(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.trim().to_owned(),
        }
    }
}

impl CredentialsFile {
    fn cluster(&self, role: CredentialRole) -> Option<&ClusterEntry> {
        match role {
            CredentialRole::Primary => self.primary.as_ref(),
            CredentialRole::Secondary => self.secondary.as_ref(),
            CredentialRole::Ldap | CredentialRole::Ad => None,
        }
    }

    fn bind(&self, role: CredentialRole) -> Option<&BindEntry> {
        match role {
            CredentialRole::Ldap => self.ldap.as_ref(),
            CredentialRole::Ad => self.ad.as_ref(),
            CredentialRole::Primary | CredentialRole::Secondary => None,
        }
    }
}

/// Load `credentials.json`. A missing file yields empty credentials.
pub fn load_credentials(path: &Path) -> Result<CredentialsFile, ConfigError> {
    if !path.exists() {
        debug!(path = %path.display(), "no credentials file; everything will be prompted");
        return Ok(CredentialsFile::default());
    }
    let creds: CredentialsFile = Figment::from(Json::file(path)).extract()?;
    Ok(creds)
}

// ── Credential resolution ───────────────────────────────────────────

/// Interactive last resort of the credential chain.
pub trait CredentialPrompt {
    /// Ask for a visible value; an empty answer selects `default` if given.
    fn text(&mut self, label: &str, default: Option<&str>) -> Result<String, ConfigError>;

    /// Ask for a masked value.
    fn secret(&mut self, label: &str) -> Result<SecretString, ConfigError>;
}

/// Environment variable lookup, injectable for tests.
pub type EnvLookup = fn(&str) -> Option<String>;

fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

/// Resolves each credential field through: credentials file →
/// `CLUSYNC_<ROLE>_<FIELD>` → keyring (passwords only) → prompt.
pub struct CredentialResolver<P> {
    file: CredentialsFile,
    env: EnvLookup,
    use_keyring: bool,
    prompt: P,
}

impl<P: CredentialPrompt> CredentialResolver<P> {
    pub fn new(file: CredentialsFile, prompt: P) -> Self {
        Self {
            file,
            env: process_env,
            use_keyring: true,
            prompt,
        }
    }

    #[must_use]
    pub fn with_env(mut self, env: EnvLookup) -> Self {
        self.env = env;
        self
    }

    #[must_use]
    pub fn without_keyring(mut self) -> Self {
        self.use_keyring = false;
        self
    }

    pub fn prompt_mut(&mut self) -> &mut P {
        &mut self.prompt
    }

    fn from_env(&self, role: CredentialRole, field: &str) -> Option<String> {
        non_empty((self.env)(&role.env_var(field)).as_deref())
    }

    fn lookup(&self, role: CredentialRole, file_value: Option<&str>, field: &str) -> Option<String> {
        non_empty(file_value).or_else(|| self.from_env(role, field))
    }

    fn password(
        &mut self,
        role: CredentialRole,
        file_value: Option<&str>,
    ) -> Result<SecretString, ConfigError> {
        if let Some(pw) = self.lookup(role, file_value, "password") {
            return Ok(SecretString::from(pw));
        }

        if self.use_keyring {
            if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &role.keyring_account()) {
                if let Ok(pw) = entry.get_password() {
                    debug!(%role, "password taken from keyring");
                    return Ok(SecretString::from(pw));
                }
            }
        }

        let pw = self.prompt.secret(&format!("{role} password"))?;
        if pw.expose_secret().is_empty() {
            return Err(ConfigError::NoCredentials {
                role,
                field: "password".into(),
            });
        }
        Ok(pw)
    }

    fn required_text(
        &mut self,
        role: CredentialRole,
        file_value: Option<&str>,
        field: &str,
        label: &str,
        default: Option<&str>,
    ) -> Result<String, ConfigError> {
        if let Some(value) = self.lookup(role, file_value, field) {
            return Ok(value);
        }
        let answer = self.prompt.text(label, default)?;
        non_empty(Some(answer.as_str()))
            .or_else(|| default.map(str::to_owned))
            .ok_or_else(|| ConfigError::NoCredentials {
                role,
                field: field.into(),
            })
    }

    /// Build the connection configuration for one cluster.
    pub fn resolve_cluster(
        &mut self,
        role: CredentialRole,
        defaults: &Defaults,
    ) -> Result<ClusterConfig, ConfigError> {
        let entry = self.file.cluster(role).cloned().unwrap_or_default();

        let address = self.required_text(
            role,
            entry.cluster_address.as_deref(),
            "address",
            &format!("{role} cluster address"),
            None,
        )?;
        let default_port = defaults.port.to_string();
        let port = self.required_text(
            role,
            entry.port.as_ref().map(PortValue::as_text).as_deref(),
            "port",
            &format!("{role} API port"),
            Some(&default_port),
        )?;
        let username = self.required_text(
            role,
            entry.username.as_deref(),
            "username",
            &format!("{role} username"),
            Some("admin"),
        )?;
        let password = self.password(role, entry.password.as_deref())?;

        Ok(ClusterConfig {
            url: cluster_url(&address, &port)?,
            username,
            password,
            tls: defaults.tls(),
            timeout: Duration::from_secs(defaults.timeout),
        })
    }

    /// Bind credentials for a directory service.
    pub fn resolve_bind(&mut self, role: CredentialRole) -> Result<BindCredentials, ConfigError> {
        let entry = self.file.bind(role).cloned().unwrap_or_default();
        let username = self.required_text(
            role,
            entry.username.as_deref(),
            "username",
            &format!("{role} bind username"),
            None,
        )?;
        let password = self.password(role, entry.password.as_deref())?;
        Ok(BindCredentials { username, password })
    }
}

/// `https://<address>:<port>`, unless `address` is already a URL.
pub fn cluster_url(address: &str, port: &str) -> Result<url::Url, ConfigError> {
    let port: u16 = port.parse().map_err(|_| ConfigError::Validation {
        field: "port".into(),
        reason: format!("not a port number: {port}"),
    })?;
    let raw = if address.contains("://") {
        address.to_owned()
    } else {
        format!("https://{address}:{port}")
    };
    raw.parse().map_err(|_| ConfigError::Validation {
        field: "cluster_address".into(),
        reason: format!("invalid address: {address}"),
    })
}

/// Store `password` for `role` in the system keyring.
pub fn store_password(role: CredentialRole, password: &SecretString) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &role.keyring_account()).map_err(|e| {
        ConfigError::Keyring {
            message: e.to_string(),
        }
    })?;
    entry
        .set_password(password.expose_secret())
        .map_err(|e| ConfigError::Keyring {
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::VecDeque;

    #[derive(Default)]
    struct Scripted {
        answers: VecDeque<&'static str>,
        asked: Vec<String>,
    }

    impl Scripted {
        fn answering(answers: &[&'static str]) -> Self {
            Self {
                answers: answers.iter().copied().collect(),
                asked: Vec::new(),
            }
        }
    }

    impl CredentialPrompt for Scripted {
        fn text(&mut self, label: &str, _default: Option<&str>) -> Result<String, ConfigError> {
            self.asked.push(label.into());
            Ok(self.answers.pop_front().unwrap_or_default().into())
        }

        fn secret(&mut self, label: &str) -> Result<SecretString, ConfigError> {
            self.asked.push(label.into());
            Ok(SecretString::from(
                self.answers.pop_front().unwrap_or_default().to_string(),
            ))
        }
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn ops_env(name: &str) -> Option<String> {
        match name {
            "CLUSYNC_SECONDARY_USERNAME" => Some("ops".into()),
            "CLUSYNC_SECONDARY_PASSWORD" => Some("from-env".into()),
            _ => None,
        }
    }

    fn file(json: &str) -> CredentialsFile {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, json).unwrap();
        load_credentials(&path).unwrap()
    }

    #[test]
    fn credentials_file_values_need_no_prompt() {
        let creds = file(
            r#"{"primary": {"cluster_address": "10.0.0.10", "port": "8000",
                "username": "admin", "password": "secret"}}"#,
        );
        let mut resolver = CredentialResolver::new(creds, Scripted::default())
            .with_env(no_env)
            .without_keyring();

        let cfg = resolver
            .resolve_cluster(CredentialRole::Primary, &Defaults::default())
            .unwrap();

        assert_eq!(cfg.url.as_str(), "https://10.0.0.10:8000/");
        assert_eq!(cfg.username, "admin");
        assert_eq!(cfg.password.expose_secret(), "secret");
        assert_eq!(cfg.tls, TlsVerification::DangerAcceptInvalid);
        assert!(resolver.prompt_mut().asked.is_empty());
    }

    #[test]
    fn numeric_port_is_accepted() {
        let creds = file(
            r#"{"secondary": {"cluster_address": "qumulo.lab", "port": 9000,
                "username": "admin", "password": "pw"}}"#,
        );
        let mut resolver = CredentialResolver::new(creds, Scripted::default())
            .with_env(no_env)
            .without_keyring();

        let cfg = resolver
            .resolve_cluster(CredentialRole::Secondary, &Defaults::default())
            .unwrap();

        assert_eq!(cfg.url.port(), Some(9000));
    }

    #[test]
    fn environment_fills_gaps_before_prompting() {
        let creds = file(r#"{"secondary": {"cluster_address": "10.0.0.20", "username": ""}}"#);
        // Empty answer to the port prompt selects the default port.
        let mut resolver = CredentialResolver::new(creds, Scripted::answering(&[""]))
            .with_env(ops_env)
            .without_keyring();

        let cfg = resolver
            .resolve_cluster(CredentialRole::Secondary, &Defaults::default())
            .unwrap();

        assert_eq!(cfg.url.as_str(), "https://10.0.0.20:8000/");
        assert_eq!(cfg.username, "ops");
        assert_eq!(cfg.password.expose_secret(), "from-env");
        assert_eq!(resolver.prompt_mut().asked, vec!["secondary API port"]);
    }

    #[test]
    fn missing_file_prompts_for_everything() {
        let creds = load_credentials(Path::new("/nonexistent/credentials.json")).unwrap();
        let mut resolver =
            CredentialResolver::new(creds, Scripted::answering(&["c1", "8443", "root", "pw"]))
                .with_env(no_env)
                .without_keyring();

        let cfg = resolver
            .resolve_cluster(CredentialRole::Primary, &Defaults::default())
            .unwrap();

        assert_eq!(cfg.url.as_str(), "https://c1:8443/");
        assert_eq!(cfg.username, "root");
        assert_eq!(
            resolver.prompt_mut().asked,
            vec![
                "primary cluster address",
                "primary API port",
                "primary username",
                "primary password"
            ]
        );
    }

    #[test]
    fn empty_address_answer_is_an_error() {
        let mut resolver =
            CredentialResolver::new(CredentialsFile::default(), Scripted::answering(&[""]))
                .with_env(no_env)
                .without_keyring();

        let err = resolver
            .resolve_cluster(CredentialRole::Primary, &Defaults::default())
            .unwrap_err();

        assert!(matches!(err, ConfigError::NoCredentials { field, .. } if field == "address"));
    }

    #[test]
    fn bind_credentials_come_from_their_own_section() {
        let creds = file(r#"{"ldap": {"username": "cn=binder", "password": "bindpw"}}"#);
        let mut resolver = CredentialResolver::new(creds, Scripted::answering(&["EXAMPLE\\joiner", "adpw"]))
            .with_env(no_env)
            .without_keyring();

        let ldap = resolver.resolve_bind(CredentialRole::Ldap).unwrap();
        let ad = resolver.resolve_bind(CredentialRole::Ad).unwrap();

        assert_eq!(ldap.username, "cn=binder");
        assert_eq!(ldap.password.expose_secret(), "bindpw");
        assert_eq!(ad.username, "EXAMPLE\\joiner");
        assert_eq!(ad.password.expose_secret(), "adpw");
    }

    #[test]
    fn address_may_be_a_full_url() {
        let url = cluster_url("https://cluster.example.com:8000", "8000").unwrap();
        assert_eq!(url.host_str(), Some("cluster.example.com"));
        assert!(cluster_url("c1", "http").is_err());
    }

    #[test]
    fn role_names_env_vars_and_keyring_accounts() {
        assert_eq!(
            CredentialRole::Secondary.env_var("password"),
            "CLUSYNC_SECONDARY_PASSWORD"
        );
        assert_eq!(CredentialRole::Ad.keyring_account(), "ad/password");
        assert_eq!("ldap".parse::<CredentialRole>().ok(), Some(CredentialRole::Ldap));
    }

    #[test]
    fn config_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[defaults]\nsnapshot_dir = \"/srv/snap\"\ninsecure = false\nlive_state = \"per-batch\"\n",
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();

        assert_eq!(cfg.defaults.snapshot_dir, PathBuf::from("/srv/snap"));
        assert_eq!(cfg.defaults.port, 8000);
        assert_eq!(cfg.defaults.live_state, LiveState::PerBatch);
        assert_eq!(cfg.defaults.tls(), TlsVerification::SystemDefaults);
    }

    #[test]
    fn effective_config_renders_as_toml() {
        let rendered = to_toml(&Config::default()).unwrap();
        assert!(rendered.contains("[defaults]"));
        assert!(rendered.contains("live_state = \"per-item\""));
    }
}
