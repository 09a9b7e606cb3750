// ── Core error types ──
//
// Reconciliation-level errors. The `From<clusync_api::Error>` impl folds
// transport failures into a small taxonomy the engine can classify: some
// abort the run (no session), the rest only cost a single item.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Session errors (fatal for the run) ───────────────────────────
    #[error("Cannot connect to cluster at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // ── Per-item errors ──────────────────────────────────────────────
    #[error("Tenant `{name}` does not exist on the target cluster")]
    UnresolvedTenant { name: String },

    #[error("Path not found: {path}")]
    PathNotFound { path: String },

    #[error("Conflicting live state: {message}")]
    Conflict { message: String },

    #[error("Operation not supported: {operation}")]
    Unsupported { operation: String },

    #[error("API error: {message}")]
    Api {
        message: String,
        /// The cluster's error class (e.g., `fs_no_such_entry_error`).
        code: Option<String>,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Snapshot files ───────────────────────────────────────────────
    #[error("Snapshot file not found: {path}")]
    SnapshotMissing { path: String },

    #[error("Cannot access snapshot file {path}: {source}")]
    SnapshotIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed snapshot file {path}: {source}")]
    SnapshotFormat {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    // ── Interaction ──────────────────────────────────────────────────
    #[error("Prompt failed: {message}")]
    Prompt { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Whether this error means a filesystem path does not exist.
    pub fn is_path_not_found(&self) -> bool {
        matches!(self, Self::PathNotFound { .. } | Self::Api { status: Some(404), .. })
    }

    /// Errors that mean "this item cannot be reconciled here" rather than a
    /// failed mutation. They are recorded as skips.
    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            Self::UnresolvedTenant { .. }
                | Self::PathNotFound { .. }
                | Self::Conflict { .. }
                | Self::Unsupported { .. }
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<clusync_api::Error> for CoreError {
    fn from(err: clusync_api::Error) -> Self {
        match err {
            clusync_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            clusync_api::Error::SessionMissing => CoreError::AuthenticationFailed {
                message: "no active session -- login required".into(),
            },
            clusync_api::Error::Transport(ref e) => {
                if e.is_connect() || e.is_timeout() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        code: None,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            clusync_api::Error::InvalidUrl(e) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("invalid URL: {e}"),
            },
            clusync_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            clusync_api::Error::Api {
                status,
                message,
                code,
            } => CoreError::Api {
                message,
                code,
                status: Some(status),
            },
            clusync_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_404_counts_as_missing_path() {
        let err = CoreError::from(clusync_api::Error::Api {
            status: 404,
            message: "no such entry".into(),
            code: Some("fs_no_such_entry_error".into()),
        });
        assert!(err.is_path_not_found());
        assert!(!err.is_skip());
    }

    #[test]
    fn missing_session_maps_to_authentication_failure() {
        let err = CoreError::from(clusync_api::Error::SessionMissing);
        assert!(matches!(err, CoreError::AuthenticationFailed { .. }));
    }
}
