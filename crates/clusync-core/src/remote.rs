// ── Remote cluster capability ──
//
// `ClusterApi` is the seam between the engine and a live cluster. The
// production implementation delegates to `ClusterClient`; tests drive the
// engine with an in-memory fake. Lookups by key return `Ok(None)` when the
// cluster answers 404 so that "absent" is never confused with "failed".

use clusync_api::models::{
    AdJoinRequest, AdReconfigureRequest, AdStatus, FileAttr, InterfaceSpec, LdapSettings,
    LdapSettingsSpec, Network, NetworkInterface, NetworkSpec, NfsExport, NfsExportSpec, Quota,
    QuotaStatus, ResolvedPath, SmbShare, SmbShareSpec, SnapshotPolicy, SnapshotPolicySpec, Tenant,
    TimeSettings, User, UserSpec,
};
use clusync_api::ClusterClient;
use secrecy::SecretString;
use serde_json::Value;

use crate::error::CoreError;

/// Everything the engine needs from a cluster.
#[allow(async_fn_in_trait)]
pub trait ClusterApi {
    // ── Tenants ──────────────────────────────────────────────────────
    async fn list_tenants(&self) -> Result<Vec<Tenant>, CoreError>;

    // ── NFS ──────────────────────────────────────────────────────────
    async fn list_exports(&self) -> Result<Vec<NfsExport>, CoreError>;
    async fn get_export(&self, export_path: &str) -> Result<Option<NfsExport>, CoreError>;
    async fn create_export(&self, spec: &NfsExportSpec) -> Result<(), CoreError>;
    async fn update_export(&self, id: &str, spec: &NfsExportSpec) -> Result<(), CoreError>;

    // ── SMB ──────────────────────────────────────────────────────────
    async fn list_shares(&self) -> Result<Vec<SmbShare>, CoreError>;
    async fn get_share(&self, name: &str) -> Result<Option<SmbShare>, CoreError>;
    async fn create_share(&self, spec: &SmbShareSpec) -> Result<(), CoreError>;
    async fn update_share(&self, id: &str, spec: &SmbShareSpec) -> Result<(), CoreError>;
    async fn get_smb_settings(&self) -> Result<Value, CoreError>;
    async fn set_smb_settings(&self, settings: &Value) -> Result<(), CoreError>;

    // ── Quotas ───────────────────────────────────────────────────────
    async fn list_quotas(&self) -> Result<Vec<QuotaStatus>, CoreError>;
    async fn get_quota(&self, id: &str) -> Result<Option<Quota>, CoreError>;
    async fn create_quota(&self, id: &str, limit: u64) -> Result<(), CoreError>;
    async fn update_quota(&self, id: &str, limit: u64) -> Result<(), CoreError>;

    // ── Filesystem ───────────────────────────────────────────────────
    /// `None` when the path does not exist.
    async fn resolve_path(&self, path: &str) -> Result<Option<FileAttr>, CoreError>;
    async fn create_directory(&self, parent: &str, name: &str) -> Result<(), CoreError>;
    async fn resolve_ids(&self, ids: &[String]) -> Result<Vec<ResolvedPath>, CoreError>;

    // ── Users ────────────────────────────────────────────────────────
    async fn list_users(&self) -> Result<Vec<User>, CoreError>;
    async fn create_user(&self, spec: &UserSpec, password: &SecretString) -> Result<(), CoreError>;
    async fn update_user(&self, id: &str, spec: &UserSpec) -> Result<(), CoreError>;
    async fn get_user_mappings(&self) -> Result<Value, CoreError>;
    async fn set_user_mappings(&self, mappings: &Value) -> Result<(), CoreError>;

    // ── Network ──────────────────────────────────────────────────────
    async fn list_interfaces(&self) -> Result<Vec<NetworkInterface>, CoreError>;
    async fn update_interface(&self, id: u64, spec: &InterfaceSpec) -> Result<(), CoreError>;
    async fn list_networks(&self, interface_id: u64) -> Result<Vec<Network>, CoreError>;
    async fn create_network(&self, interface_id: u64, spec: &NetworkSpec)
    -> Result<(), CoreError>;
    async fn update_network(
        &self,
        interface_id: u64,
        id: u64,
        spec: &NetworkSpec,
    ) -> Result<(), CoreError>;

    // ── Services ─────────────────────────────────────────────────────
    async fn get_time_settings(&self) -> Result<TimeSettings, CoreError>;
    async fn set_time_settings(&self, settings: &TimeSettings) -> Result<(), CoreError>;
    async fn get_ldap_settings(&self) -> Result<LdapSettings, CoreError>;
    async fn set_ldap_settings(&self, spec: &LdapSettingsSpec) -> Result<(), CoreError>;
    async fn ad_status(&self) -> Result<AdStatus, CoreError>;
    async fn ad_join(&self, request: &AdJoinRequest) -> Result<(), CoreError>;
    async fn ad_reconfigure(&self, request: &AdReconfigureRequest) -> Result<(), CoreError>;

    // ── Snapshot policies ────────────────────────────────────────────
    async fn list_snapshot_policies(&self) -> Result<Vec<SnapshotPolicy>, CoreError>;
    async fn create_snapshot_policy(&self, spec: &SnapshotPolicySpec) -> Result<(), CoreError>;
    async fn update_snapshot_policy(
        &self,
        id: u64,
        spec: &SnapshotPolicySpec,
    ) -> Result<(), CoreError>;
}

/// Map a 404 to `None`, keep every other failure as an error.
fn found<T>(result: Result<T, clusync_api::Error>) -> Result<Option<T>, CoreError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e.into()),
    }
}

impl ClusterApi for ClusterClient {
    async fn list_tenants(&self) -> Result<Vec<Tenant>, CoreError> {
        Ok(ClusterClient::list_tenants(self).await?)
    }

    async fn list_exports(&self) -> Result<Vec<NfsExport>, CoreError> {
        Ok(self.list_nfs_exports().await?)
    }

    async fn get_export(&self, export_path: &str) -> Result<Option<NfsExport>, CoreError> {
        found(self.get_nfs_export(export_path).await)
    }

    async fn create_export(&self, spec: &NfsExportSpec) -> Result<(), CoreError> {
        self.create_nfs_export(spec).await?;
        Ok(())
    }

    async fn update_export(&self, id: &str, spec: &NfsExportSpec) -> Result<(), CoreError> {
        Ok(self.replace_nfs_export(id, spec).await?)
    }

    async fn list_shares(&self) -> Result<Vec<SmbShare>, CoreError> {
        Ok(self.list_smb_shares().await?)
    }

    async fn get_share(&self, name: &str) -> Result<Option<SmbShare>, CoreError> {
        found(self.get_smb_share(name).await)
    }

    async fn create_share(&self, spec: &SmbShareSpec) -> Result<(), CoreError> {
        self.create_smb_share(spec).await?;
        Ok(())
    }

    async fn update_share(&self, id: &str, spec: &SmbShareSpec) -> Result<(), CoreError> {
        Ok(self.replace_smb_share(id, spec).await?)
    }

    async fn get_smb_settings(&self) -> Result<Value, CoreError> {
        Ok(ClusterClient::get_smb_settings(self).await?)
    }

    async fn set_smb_settings(&self, settings: &Value) -> Result<(), CoreError> {
        Ok(ClusterClient::set_smb_settings(self, settings).await?)
    }

    async fn list_quotas(&self) -> Result<Vec<QuotaStatus>, CoreError> {
        Ok(self.list_quota_status().await?)
    }

    async fn get_quota(&self, id: &str) -> Result<Option<Quota>, CoreError> {
        found(ClusterClient::get_quota(self, id).await)
    }

    async fn create_quota(&self, id: &str, limit: u64) -> Result<(), CoreError> {
        Ok(ClusterClient::create_quota(self, id, limit).await?)
    }

    async fn update_quota(&self, id: &str, limit: u64) -> Result<(), CoreError> {
        Ok(self.replace_quota(id, limit).await?)
    }

    async fn resolve_path(&self, path: &str) -> Result<Option<FileAttr>, CoreError> {
        found(self.file_attributes(path).await)
    }

    async fn create_directory(&self, parent: &str, name: &str) -> Result<(), CoreError> {
        ClusterClient::create_directory(self, parent, name).await?;
        Ok(())
    }

    async fn resolve_ids(&self, ids: &[String]) -> Result<Vec<ResolvedPath>, CoreError> {
        Ok(self.resolve_file_ids(ids).await?)
    }

    async fn list_users(&self) -> Result<Vec<User>, CoreError> {
        Ok(ClusterClient::list_users(self).await?)
    }

    async fn create_user(&self, spec: &UserSpec, password: &SecretString) -> Result<(), CoreError> {
        self.add_user(spec, password).await?;
        Ok(())
    }

    async fn update_user(&self, id: &str, spec: &UserSpec) -> Result<(), CoreError> {
        Ok(self.modify_user(id, spec).await?)
    }

    async fn get_user_mappings(&self) -> Result<Value, CoreError> {
        Ok(ClusterClient::get_user_mappings(self).await?)
    }

    async fn set_user_mappings(&self, mappings: &Value) -> Result<(), CoreError> {
        Ok(ClusterClient::set_user_mappings(self, mappings).await?)
    }

    async fn list_interfaces(&self) -> Result<Vec<NetworkInterface>, CoreError> {
        Ok(ClusterClient::list_interfaces(self).await?)
    }

    async fn update_interface(&self, id: u64, spec: &InterfaceSpec) -> Result<(), CoreError> {
        Ok(self.modify_interface(id, spec).await?)
    }

    async fn list_networks(&self, interface_id: u64) -> Result<Vec<Network>, CoreError> {
        Ok(ClusterClient::list_networks(self, interface_id).await?)
    }

    async fn create_network(
        &self,
        interface_id: u64,
        spec: &NetworkSpec,
    ) -> Result<(), CoreError> {
        self.add_network(interface_id, spec).await?;
        Ok(())
    }

    async fn update_network(
        &self,
        interface_id: u64,
        id: u64,
        spec: &NetworkSpec,
    ) -> Result<(), CoreError> {
        Ok(self.replace_network(interface_id, id, spec).await?)
    }

    async fn get_time_settings(&self) -> Result<TimeSettings, CoreError> {
        Ok(ClusterClient::get_time_settings(self).await?)
    }

    async fn set_time_settings(&self, settings: &TimeSettings) -> Result<(), CoreError> {
        Ok(ClusterClient::set_time_settings(self, settings).await?)
    }

    async fn get_ldap_settings(&self) -> Result<LdapSettings, CoreError> {
        Ok(ClusterClient::get_ldap_settings(self).await?)
    }

    async fn set_ldap_settings(&self, spec: &LdapSettingsSpec) -> Result<(), CoreError> {
        Ok(ClusterClient::set_ldap_settings(self, spec).await?)
    }

    async fn ad_status(&self) -> Result<AdStatus, CoreError> {
        Ok(ClusterClient::ad_status(self).await?)
    }

    async fn ad_join(&self, request: &AdJoinRequest) -> Result<(), CoreError> {
        Ok(ClusterClient::ad_join(self, request).await?)
    }

    async fn ad_reconfigure(&self, request: &AdReconfigureRequest) -> Result<(), CoreError> {
        Ok(ClusterClient::ad_reconfigure(self, request).await?)
    }

    async fn list_snapshot_policies(&self) -> Result<Vec<SnapshotPolicy>, CoreError> {
        Ok(ClusterClient::list_snapshot_policies(self).await?)
    }

    async fn create_snapshot_policy(&self, spec: &SnapshotPolicySpec) -> Result<(), CoreError> {
        ClusterClient::create_snapshot_policy(self, spec).await?;
        Ok(())
    }

    async fn update_snapshot_policy(
        &self,
        id: u64,
        spec: &SnapshotPolicySpec,
    ) -> Result<(), CoreError> {
        Ok(self.replace_snapshot_policy(id, spec).await?)
    }
}
