// ── Snapshot capture ──
//
// Reads live state from the source cluster and writes portable snapshot
// files. Identities are normalized and tenant ids replaced by names on the
// way out. Each file is captured independently: one failing endpoint does
// not stop the others.

use std::collections::HashMap;

use serde_json::Map;
use tracing::{error, info, warn};

use crate::apply::ResourceSet;
use crate::convert::{
    declare_ad, declare_export, declare_interface, declare_ldap, declare_network, declare_quota,
    declare_share, declare_snapshot_policy, declare_user,
};
use crate::error::CoreError;
use crate::model::{
    DeclaredExport, DeclaredNetwork, DeclaredSnapshotPolicy, NetworkSnapshot, SmbSnapshot,
};
use crate::remote::ClusterApi;
use crate::snapshot::{SnapshotFile, SnapshotStore};
use crate::tenant::TenantResolver;

/// Result of capturing one snapshot file.
#[derive(Debug)]
pub struct DumpEntry {
    pub file: SnapshotFile,
    /// Number of items written, or why the file was not written.
    pub result: Result<usize, CoreError>,
}

pub struct Dumper<'a, A> {
    api: &'a A,
    tenants: &'a TenantResolver,
    store: &'a SnapshotStore,
}

impl<'a, A: ClusterApi> Dumper<'a, A> {
    pub fn new(api: &'a A, tenants: &'a TenantResolver, store: &'a SnapshotStore) -> Self {
        Self {
            api,
            tenants,
            store,
        }
    }

    /// Capture the selected sets. Never fails as a whole.
    pub async fn dump(&self, sets: &[ResourceSet]) -> Vec<DumpEntry> {
        let mut entries = Vec::new();
        for set in ResourceSet::normalize(sets) {
            match set {
                ResourceSet::Nfs => entries.push(self.capture(SnapshotFile::Nfs, self.nfs()).await),
                ResourceSet::Smb => entries.push(self.capture(SnapshotFile::Smb, self.smb()).await),
                ResourceSet::Quotas => {
                    entries.push(self.capture(SnapshotFile::Quotas, self.quotas()).await);
                }
                ResourceSet::Users => {
                    entries.push(self.capture(SnapshotFile::Users, self.users()).await);
                }
                ResourceSet::Others => {
                    entries.push(self.capture(SnapshotFile::Time, self.time()).await);
                    entries.push(self.capture(SnapshotFile::Ldap, self.ldap()).await);
                    entries.push(self.capture(SnapshotFile::UserMappings, self.mappings()).await);
                    entries.push(self.capture(SnapshotFile::Ad, self.ad()).await);
                    entries.push(
                        self.capture(SnapshotFile::SnapshotPolicies, self.snapshot_policies())
                            .await,
                    );
                    entries.push(self.capture(SnapshotFile::Network, self.network()).await);
                }
            }
        }
        entries
    }

    async fn capture(
        &self,
        file: SnapshotFile,
        work: impl Future<Output = Result<usize, CoreError>>,
    ) -> DumpEntry {
        let result = work.await;
        match &result {
            Ok(count) => info!(file = %file, count, "snapshot captured"),
            Err(e) => error!(file = %file, error = %e, "snapshot capture failed"),
        }
        DumpEntry { file, result }
    }

    async fn nfs(&self) -> Result<usize, CoreError> {
        let mut declared: Vec<DeclaredExport> = Vec::new();
        for export in self.api.list_exports().await? {
            let tenant = self.tenants.name_for(self.api, export.tenant_id).await?;
            declared.push(declare_export(export, tenant));
        }
        self.store.write(SnapshotFile::Nfs, &declared)?;
        Ok(declared.len())
    }

    async fn smb(&self) -> Result<usize, CoreError> {
        let mut shares = Vec::new();
        for summary in self.api.list_shares().await? {
            let Some(share) = self.api.get_share(&summary.id).await? else {
                warn!(share = %summary.share_name, "share vanished during capture");
                continue;
            };
            let tenant = self.tenants.name_for(self.api, share.tenant_id).await?;
            shares.push(declare_share(share, tenant));
        }
        let smb_settings = match self.api.get_smb_settings().await? {
            serde_json::Value::Object(map) => map,
            _ => Map::new(),
        };
        let count = shares.len();
        self.store.write(
            SnapshotFile::Smb,
            &SmbSnapshot {
                smb_settings,
                smb_shares: shares,
            },
        )?;
        Ok(count)
    }

    async fn quotas(&self) -> Result<usize, CoreError> {
        let quotas: Vec<_> = self
            .api
            .list_quotas()
            .await?
            .into_iter()
            .map(declare_quota)
            .collect();
        self.store.write(SnapshotFile::Quotas, &quotas)?;
        Ok(quotas.len())
    }

    async fn users(&self) -> Result<usize, CoreError> {
        let users: Vec<_> = self
            .api
            .list_users()
            .await?
            .into_iter()
            .map(declare_user)
            .collect();
        self.store.write(SnapshotFile::Users, &users)?;
        Ok(users.len())
    }

    async fn time(&self) -> Result<usize, CoreError> {
        let time = self.api.get_time_settings().await?;
        self.store.write(SnapshotFile::Time, &time)?;
        Ok(1)
    }

    async fn ldap(&self) -> Result<usize, CoreError> {
        let ldap = declare_ldap(self.api.get_ldap_settings().await?);
        self.store.write(SnapshotFile::Ldap, &ldap)?;
        Ok(1)
    }

    async fn mappings(&self) -> Result<usize, CoreError> {
        let mappings = self.api.get_user_mappings().await?;
        self.store.write(SnapshotFile::UserMappings, &mappings)?;
        Ok(mappings.as_array().map_or(1, Vec::len))
    }

    async fn ad(&self) -> Result<usize, CoreError> {
        let ad = declare_ad(self.api.ad_status().await?);
        self.store.write(SnapshotFile::Ad, &ad)?;
        Ok(1)
    }

    async fn snapshot_policies(&self) -> Result<usize, CoreError> {
        let policies = self.api.list_snapshot_policies().await?;
        let ids: Vec<String> = policies.iter().map(|p| p.source_file_id.clone()).collect();
        let paths: HashMap<String, String> = if ids.is_empty() {
            HashMap::new()
        } else {
            self.api
                .resolve_ids(&ids)
                .await?
                .into_iter()
                .map(|resolved| (resolved.id, resolved.path))
                .collect()
        };

        let mut declared: Vec<DeclaredSnapshotPolicy> = Vec::new();
        for policy in policies {
            let Some(path) = paths.get(&policy.source_file_id).cloned() else {
                warn!(
                    policy = %policy.policy_name,
                    file_id = %policy.source_file_id,
                    "policy directory could not be resolved; omitted"
                );
                continue;
            };
            declared.push(declare_snapshot_policy(policy, path));
        }
        self.store.write(SnapshotFile::SnapshotPolicies, &declared)?;
        Ok(declared.len())
    }

    async fn network(&self) -> Result<usize, CoreError> {
        let interface: Vec<_> = self
            .api
            .list_interfaces()
            .await?
            .into_iter()
            .map(declare_interface)
            .collect();
        let interface_id = interface.first().map_or(1, |iface| iface.id);

        let mut networks: Vec<DeclaredNetwork> = Vec::new();
        for network in self.api.list_networks(interface_id).await? {
            let tenant = self.tenants.name_for(self.api, network.tenant_id).await?;
            networks.push(declare_network(network, tenant));
        }
        let count = networks.len();
        self.store.write(
            SnapshotFile::Network,
            &NetworkSnapshot {
                interface,
                networks,
            },
        )?;
        Ok(count)
    }
}
