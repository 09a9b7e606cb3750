// ── Outcome log ──
//
// Append-only record of every per-item decision. Each entry is emitted as
// a structured `tracing` event (the persistent audit trail is whatever
// subscriber the binary installs) and kept in memory for the end-of-run
// summary.

use chrono::{DateTime, Utc};
use serde::Serialize;
use strum::{Display, EnumString};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Action {
    Created,
    Updated,
    /// A missing directory was created ahead of a quota.
    DirectoryCreated,
    /// The operator said no.
    Declined,
    /// Not attempted: missing path, unknown tenant, conflict.
    Skipped,
    /// The mutation was attempted and the cluster rejected it.
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    pub timestamp: DateTime<Utc>,
    pub kind: &'static str,
    pub key: String,
    pub action: Action,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Default)]
pub struct OutcomeLog {
    entries: Vec<Outcome>,
}

impl OutcomeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(
        &mut self,
        kind: &'static str,
        key: impl Into<String>,
        action: Action,
        detail: Option<String>,
    ) {
        let outcome = Outcome {
            timestamp: Utc::now(),
            kind,
            key: key.into(),
            action,
            detail,
        };

        let detail = outcome.detail.as_deref().unwrap_or("");
        match action {
            Action::Failed | Action::Skipped => warn!(
                kind,
                key = %outcome.key,
                action = %action,
                detail,
                "{kind} `{}` {action}",
                outcome.key
            ),
            _ => info!(
                kind,
                key = %outcome.key,
                action = %action,
                detail,
                "{kind} `{}` {action}",
                outcome.key
            ),
        }

        self.entries.push(outcome);
    }

    pub fn entries(&self) -> &[Outcome] {
        &self.entries
    }

    /// Entries for one key, in the order they were recorded.
    pub fn for_key<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Outcome> + 'a {
        self.entries.iter().filter(move |o| o.key == key)
    }

    pub fn count(&self, action: Action) -> usize {
        self.entries.iter().filter(|o| o.action == action).count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append another log's entries (already emitted as events).
    pub fn extend(&mut self, other: OutcomeLog) {
        self.entries.extend(other.entries);
    }
}
