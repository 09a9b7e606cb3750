// ── Session establishment ──
//
// Builds the HTTP client for one cluster and logs in. A failure here is
// the only error that ends a run: nothing else can proceed without a
// session.

use clusync_api::ClusterClient;
use clusync_api::transport::{TlsMode, TransportConfig};
use tracing::{debug, error, info};

use crate::config::{ClusterConfig, TlsVerification};
use crate::error::CoreError;

/// Connect and authenticate against the cluster described by `config`.
pub async fn connect(config: &ClusterConfig) -> Result<ClusterClient, CoreError> {
    let transport = build_transport(config);
    let client = ClusterClient::new(config.url.clone(), &transport)?;

    debug!(url = %config.url, username = %config.username, "logging in");
    if let Err(e) = client.login(&config.username, &config.password).await {
        error!(url = %config.url, error = %e, "login failed");
        return Err(match CoreError::from(e) {
            err @ (CoreError::ConnectionFailed { .. } | CoreError::AuthenticationFailed { .. }) => {
                err
            }
            other => CoreError::ConnectionFailed {
                url: config.url.to_string(),
                reason: other.to_string(),
            },
        });
    }

    info!(url = %config.url, "connection established");
    Ok(client)
}

fn build_transport(config: &ClusterConfig) -> TransportConfig {
    TransportConfig {
        tls: tls_to_transport(&config.tls),
        timeout: config.timeout,
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}
