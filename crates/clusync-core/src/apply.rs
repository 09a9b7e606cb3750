// ── Snapshot replay ──
//
// Reads each selected snapshot file once and feeds its items through the
// reconciler, in a fixed order: nfs, smb, quotas, users, others. A file
// that is missing or unreadable costs only its own kind; the run goes on.

use clusync_api::models::TimeSettings;
use secrecy::SecretString;
use serde::de::DeserializeOwned;
use serde_json::Value;
use strum::{Display, EnumIter, EnumString};
use tracing::{error, info, warn};

use crate::approval::{ApprovalGate, Prompter};
use crate::config::BindCredentials;
use crate::error::CoreError;
use crate::model::{
    DeclaredAd, DeclaredExport, DeclaredLdap, DeclaredQuota, DeclaredSnapshotPolicy, DeclaredUser,
    NetworkSnapshot, SmbSnapshot,
};
use crate::outcome::{Action, OutcomeLog};
use crate::reconcile::{
    AdKind, Context, ExportsKind, InterfaceKind, LdapKind, NetworksKind, QuotasKind, Reconciler,
    SharesKind, SmbSettingsKind, SnapshotPoliciesKind, TimeKind, UserMappingsKind, UsersKind,
};
use crate::remote::ClusterApi;
use crate::snapshot::{SnapshotFile, SnapshotStore};

/// A group of kinds selectable as a unit. Declaration order is replay order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum ResourceSet {
    /// `nfs.json`
    Nfs,
    /// `smb.json`
    Smb,
    /// `quotas.json`
    Quotas,
    /// `users.json`
    Users,
    /// time, network, LDAP, AD, identity mappings, snapshot policies
    Others,
}

impl ResourceSet {
    /// Sort into replay order and drop duplicates; empty means everything.
    pub fn normalize(sets: &[ResourceSet]) -> Vec<ResourceSet> {
        let mut out: Vec<ResourceSet> = if sets.is_empty() {
            <ResourceSet as strum::IntoEnumIterator>::iter().collect()
        } else {
            sets.to_vec()
        };
        out.sort_unstable();
        out.dedup();
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum DirectoryService {
    Ldap,
    Ad,
}

/// Secrets a snapshot never contains and apply needs anyway.
pub trait SecretSource {
    /// Password given to every newly created local user.
    fn initial_user_password(&mut self) -> Result<SecretString, CoreError>;

    /// Credentials used to bind `service` on the target cluster.
    fn bind_credentials(&mut self, service: DirectoryService) -> Result<BindCredentials, CoreError>;
}

/// Replays a snapshot directory against one cluster.
pub struct Applier<'a, A, P> {
    store: &'a SnapshotStore,
    reconciler: Reconciler<'a, A, P>,
}

impl<'a, A: ClusterApi, P: Prompter> Applier<'a, A, P> {
    pub fn new(cx: Context<'a, A>, gate: ApprovalGate<P>, store: &'a SnapshotStore) -> Self {
        Self {
            store,
            reconciler: Reconciler::new(cx, gate),
        }
    }

    /// Replay the selected kinds and return every recorded outcome.
    pub async fn apply<S: SecretSource>(
        mut self,
        sets: &[ResourceSet],
        secrets: &mut S,
    ) -> OutcomeLog {
        for set in ResourceSet::normalize(sets) {
            info!(kind = %set, "applying");
            match set {
                ResourceSet::Nfs => self.apply_nfs().await,
                ResourceSet::Smb => self.apply_smb().await,
                ResourceSet::Quotas => self.apply_quotas().await,
                ResourceSet::Users => self.apply_users(secrets).await,
                ResourceSet::Others => self.apply_others(secrets).await,
            }
        }
        self.reconciler.into_log()
    }

    async fn apply_nfs(&mut self) {
        if let Some(exports) = self.load::<Vec<DeclaredExport>>(SnapshotFile::Nfs, "nfs") {
            self.reconciler.run(&ExportsKind, &exports).await;
        }
    }

    async fn apply_smb(&mut self) {
        let Some(smb) = self.load::<SmbSnapshot>(SnapshotFile::Smb, "smb") else {
            return;
        };
        if !smb.smb_settings.is_empty() {
            self.reconciler
                .run(&SmbSettingsKind, std::slice::from_ref(&smb.smb_settings))
                .await;
        }
        self.reconciler.run(&SharesKind, &smb.smb_shares).await;
    }

    async fn apply_quotas(&mut self) {
        if let Some(quotas) = self.load::<Vec<DeclaredQuota>>(SnapshotFile::Quotas, "quotas") {
            self.reconciler.run(&QuotasKind, &quotas).await;
        }
    }

    async fn apply_users<S: SecretSource>(&mut self, secrets: &mut S) {
        let Some(users) = self.load::<Vec<DeclaredUser>>(SnapshotFile::Users, "users") else {
            return;
        };
        if users.is_empty() {
            return;
        }
        let password = match secrets.initial_user_password() {
            Ok(password) => password,
            Err(e) => {
                self.record_file_failure("users", SnapshotFile::Users, &e);
                return;
            }
        };
        self.reconciler.run(&UsersKind::new(password), &users).await;
    }

    async fn apply_others<S: SecretSource>(&mut self, secrets: &mut S) {
        if let Some(time) = self.load::<TimeSettings>(SnapshotFile::Time, "ntp") {
            self.reconciler.run(&TimeKind, &[time]).await;
        }

        if let Some(network) = self.load::<NetworkSnapshot>(SnapshotFile::Network, "network") {
            if let Some(iface) = network.interface.first() {
                self.reconciler
                    .run(&InterfaceKind, std::slice::from_ref(iface))
                    .await;
            }
            let networks = NetworksKind::new(network.interface_id());
            self.reconciler.run(&networks, &network.networks).await;
        }

        if let Some(ldap) = self.load::<DeclaredLdap>(SnapshotFile::Ldap, "ldap") {
            let credentials = if ldap.use_ldap {
                secrets.bind_credentials(DirectoryService::Ldap)
            } else {
                Ok(BindCredentials {
                    username: String::new(),
                    password: SecretString::from(String::new()),
                })
            };
            match credentials {
                Ok(credentials) => self.reconciler.run(&LdapKind::new(credentials), &[ldap]).await,
                Err(e) => self.record_file_failure("ldap", SnapshotFile::Ldap, &e),
            }
        }

        if let Some(ad) = self.load::<DeclaredAd>(SnapshotFile::Ad, "ad") {
            if ad.domain.is_empty() {
                info!("snapshot has no AD membership; nothing to join");
            } else {
                match secrets.bind_credentials(DirectoryService::Ad) {
                    Ok(credentials) => self.reconciler.run(&AdKind::new(credentials), &[ad]).await,
                    Err(e) => self.record_file_failure("ad", SnapshotFile::Ad, &e),
                }
            }
        }

        if let Some(mappings) = self.load::<Value>(SnapshotFile::UserMappings, "mappings") {
            self.reconciler.run(&UserMappingsKind, &[mappings]).await;
        }

        if let Some(policies) =
            self.load::<Vec<DeclaredSnapshotPolicy>>(SnapshotFile::SnapshotPolicies, "snapshot_policy")
        {
            self.reconciler.run(&SnapshotPoliciesKind, &policies).await;
        }
    }

    /// Read one snapshot file. Problems are recorded against the file and
    /// yield `None` so the caller moves on to the next kind.
    fn load<T: DeserializeOwned>(&mut self, file: SnapshotFile, kind: &'static str) -> Option<T> {
        match self.store.read(file) {
            Ok(value) => Some(value),
            Err(e @ CoreError::SnapshotMissing { .. }) => {
                warn!(kind, file = %file, "snapshot file missing; skipping");
                self.reconciler.log_mut().record(
                    kind,
                    file.to_string(),
                    Action::Skipped,
                    Some(e.to_string()),
                );
                None
            }
            Err(e) => {
                self.record_file_failure(kind, file, &e);
                None
            }
        }
    }

    fn record_file_failure(&mut self, kind: &'static str, file: SnapshotFile, err: &CoreError) {
        error!(kind, file = %file, error = %err, "cannot apply snapshot file");
        self.reconciler
            .log_mut()
            .record(kind, file.to_string(), Action::Failed, Some(err.to_string()));
    }
}
