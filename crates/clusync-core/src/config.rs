// ── Runtime connection configuration ──
//
// These types describe *how* to reach a cluster and how the engine should
// treat live state. They carry credential data but never touch disk; the
// CLI builds a `ClusterConfig` and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use url::Url;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification. Clusters ship with self-signed certificates.
    #[default]
    DangerAcceptInvalid,
}

/// Configuration for connecting to a single cluster.
#[derive(Debug, Clone)]
pub struct ClusterConfig {
    /// API base URL (e.g., `https://10.0.0.10:8000`).
    pub url: Url,
    pub username: String,
    pub password: SecretString,
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
}

/// How often live state is fetched while reconciling a batch.
///
/// `PerItem` re-reads the cluster before every decision, which keeps long
/// interactive sessions accurate. `PerBatch` reads shared listings (tenants,
/// users) once per kind.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum LiveState {
    #[default]
    PerItem,
    PerBatch,
}

/// Credentials used to bind a directory service (LDAP or AD).
///
/// Never part of a snapshot; collected at apply time.
#[derive(Debug, Clone)]
pub struct BindCredentials {
    pub username: String,
    pub password: SecretString,
}
