//! Generic reconciliation engine.
//!
//! Every resource kind is driven through the same cycle: extract the
//! natural key, look the key up on the target cluster, ask the approval
//! gate, then issue exactly one create or update carrying every field.
//! Per-kind behavior lives in [`ResourceKind`] implementations; the
//! [`Reconciler`] owns the loop, the approval gate and the outcome log.
//!
//! Nothing that goes wrong with one item stops the batch. Errors are
//! classified into `skipped` (the item cannot be reconciled here: missing
//! path, unknown tenant, conflicting live state) and `failed` (the cluster
//! rejected the mutation), recorded, and the loop moves on.

mod exports;
mod network;
mod quotas;
mod settings;
mod shares;
mod snapshots;
mod users;

pub use exports::ExportsKind;
pub use network::{InterfaceKind, NetworksKind};
pub use quotas::{QuotasKind, split_path};
pub use settings::{AdKind, LdapKind, SmbSettingsKind, TimeKind, UserMappingsKind};
pub use shares::SharesKind;
pub use snapshots::SnapshotPoliciesKind;
pub use users::UsersKind;

use tracing::debug;

use crate::approval::{ApprovalGate, Prompter};
use crate::config::LiveState;
use crate::error::CoreError;
use crate::outcome::{Action, OutcomeLog};
use crate::remote::ClusterApi;
use crate::tenant::TenantResolver;

/// Result of matching one declared item against live state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult<I> {
    /// An equivalent live item exists; carries what the update needs to target it.
    Found(I),
    /// Nothing on the cluster matches the natural key.
    Absent,
    /// Live state matches the key ambiguously; the item is skipped.
    Conflict(String),
}

/// Collaborators shared by every strategy for one run.
pub struct Context<'a, A> {
    pub api: &'a A,
    pub tenants: &'a TenantResolver,
    pub live_state: LiveState,
}

impl<'a, A: ClusterApi> Context<'a, A> {
    pub fn new(api: &'a A, tenants: &'a TenantResolver, live_state: LiveState) -> Self {
        Self {
            api,
            tenants,
            live_state,
        }
    }
}

/// Per-kind strategy: how to key, find, create and update one item.
///
/// `lookup` must not fail for "absent"; it returns `MatchResult::Absent`
/// and keeps errors for genuine remote failures. `create` and `update`
/// resolve tenants and normalize identities against the target cluster
/// themselves, so nothing cluster-local read at lookup time leaks into the
/// mutation.
#[allow(async_fn_in_trait)]
pub trait ResourceKind {
    type Item;
    type LiveId;

    /// Kind name used in logs and outcome entries.
    const KIND: &'static str;

    /// Whether a missing path may be created (after approval) via `provision`.
    const PROVISIONS_PATHS: bool = false;

    fn natural_key(item: &Self::Item) -> String;

    /// Called once before the first item of a batch.
    fn begin_batch(&self) {}

    async fn lookup<A: ClusterApi>(
        &self,
        cx: &Context<'_, A>,
        item: &Self::Item,
    ) -> Result<MatchResult<Self::LiveId>, CoreError>;

    async fn create<A: ClusterApi>(
        &self,
        cx: &Context<'_, A>,
        item: &Self::Item,
    ) -> Result<(), CoreError>;

    async fn update<A: ClusterApi>(
        &self,
        cx: &Context<'_, A>,
        id: Self::LiveId,
        item: &Self::Item,
    ) -> Result<(), CoreError>;

    /// Create whatever filesystem object `item` needs before `create`.
    async fn provision<A: ClusterApi>(
        &self,
        _cx: &Context<'_, A>,
        _item: &Self::Item,
    ) -> Result<String, CoreError> {
        Err(CoreError::Unsupported {
            operation: format!("creating paths for {}", Self::KIND),
        })
    }
}

/// Drives declared items through the match/approve/act/record cycle.
pub struct Reconciler<'a, A, P> {
    cx: Context<'a, A>,
    gate: ApprovalGate<P>,
    log: OutcomeLog,
}

impl<'a, A: ClusterApi, P: Prompter> Reconciler<'a, A, P> {
    pub fn new(cx: Context<'a, A>, gate: ApprovalGate<P>) -> Self {
        Self {
            cx,
            gate,
            log: OutcomeLog::new(),
        }
    }

    pub fn log(&self) -> &OutcomeLog {
        &self.log
    }

    /// Mutable access for recording outcomes outside a kind run.
    pub fn log_mut(&mut self) -> &mut OutcomeLog {
        &mut self.log
    }

    pub fn into_log(self) -> OutcomeLog {
        self.log
    }

    /// Reconcile `items` in order. Never fails; every item ends up in the log.
    pub async fn run<K: ResourceKind>(&mut self, kind: &K, items: &[K::Item]) {
        debug!(kind = K::KIND, count = items.len(), "reconciling batch");
        self.cx.tenants.invalidate();
        kind.begin_batch();

        for item in items {
            let key = K::natural_key(item);
            if let Err(e) = self.reconcile_one(kind, item, &key).await {
                self.record_error(K::KIND, &key, &e);
            }
        }
    }

    async fn reconcile_one<K: ResourceKind>(
        &mut self,
        kind: &K,
        item: &K::Item,
        key: &str,
    ) -> Result<(), CoreError> {
        let matched = match kind.lookup(&self.cx, item).await {
            Ok(matched) => matched,
            Err(e) if K::PROVISIONS_PATHS && e.is_path_not_found() => {
                return self.provision_and_create(kind, item, key).await;
            }
            Err(e) => return Err(e),
        };

        match matched {
            MatchResult::Found(id) => {
                if !self.gate.approve(&format!("update `{key}`?"))? {
                    self.log.record(K::KIND, key, Action::Declined, None);
                    return Ok(());
                }
                kind.update(&self.cx, id, item).await?;
                self.log.record(K::KIND, key, Action::Updated, None);
            }
            MatchResult::Absent => {
                if !self.gate.approve(&format!("create `{key}`?"))? {
                    self.log.record(K::KIND, key, Action::Declined, None);
                    return Ok(());
                }
                kind.create(&self.cx, item).await?;
                self.log.record(K::KIND, key, Action::Created, None);
            }
            MatchResult::Conflict(reason) => {
                self.log.record(K::KIND, key, Action::Skipped, Some(reason));
            }
        }
        Ok(())
    }

    /// The item's path is missing: create it (after approval), then create
    /// the item itself without asking a second time.
    async fn provision_and_create<K: ResourceKind>(
        &mut self,
        kind: &K,
        item: &K::Item,
        key: &str,
    ) -> Result<(), CoreError> {
        if !self.gate.approve(&format!("create directory `{key}`?"))? {
            self.log.record(
                K::KIND,
                key,
                Action::Declined,
                Some("directory does not exist".into()),
            );
            return Ok(());
        }

        let created = kind.provision(&self.cx, item).await?;
        self.log
            .record(K::KIND, key, Action::DirectoryCreated, Some(created));

        kind.create(&self.cx, item).await?;
        self.log.record(K::KIND, key, Action::Created, None);
        Ok(())
    }

    fn record_error(&mut self, kind: &'static str, key: &str, err: &CoreError) {
        let action = if err.is_skip() || err.is_path_not_found() {
            Action::Skipped
        } else {
            Action::Failed
        };
        self.log.record(kind, key, action, Some(err.to_string()));
    }
}
