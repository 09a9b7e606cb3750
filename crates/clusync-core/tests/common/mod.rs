// In-memory cluster used to drive the engine in tests.
#![allow(dead_code, clippy::unwrap_used)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

use clusync_api::models::{
    AdJoinRequest, AdReconfigureRequest, AdStatus, FileAttr, InterfaceSpec, LdapSettings,
    LdapSettingsSpec, Network, NetworkInterface, NetworkSpec, NfsExport, NfsExportSpec, Quota,
    QuotaStatus, ResolvedPath, SmbShare, SmbShareSpec, SnapshotPolicy, SnapshotPolicySpec, Tenant,
    TimeSettings, User, UserSpec,
};
use clusync_core::{
    BindCredentials, ClusterApi, CoreError, DirectoryService, Prompter, SecretSource,
};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};

/// Every mutating call the engine made, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateExport(NfsExportSpec),
    UpdateExport(String, NfsExportSpec),
    CreateShare(SmbShareSpec),
    UpdateShare(String, SmbShareSpec),
    SetSmbSettings(Value),
    CreateQuota(String, u64),
    UpdateQuota(String, u64),
    CreateDirectory(String, String),
    CreateUser(UserSpec, String),
    UpdateUser(String, UserSpec),
    SetUserMappings(Value),
    UpdateInterface(u64, InterfaceSpec),
    CreateNetwork(u64, NetworkSpec),
    UpdateNetwork(u64, u64, NetworkSpec),
    SetTime(TimeSettings),
    SetLdap(LdapSettingsSpec),
    AdJoin(AdJoinRequest),
    AdReconfigure(AdReconfigureRequest),
    CreatePolicy(SnapshotPolicySpec),
    UpdatePolicy(u64, SnapshotPolicySpec),
}

#[derive(Default)]
pub struct FakeCluster {
    pub tenants: RefCell<Vec<Tenant>>,
    pub exports: RefCell<Vec<NfsExport>>,
    pub shares: RefCell<Vec<SmbShare>>,
    pub smb_settings: RefCell<Value>,
    /// path (no trailing slash) → file id
    pub files: RefCell<HashMap<String, String>>,
    /// file id → limit
    pub quotas: RefCell<HashMap<String, u64>>,
    pub users: RefCell<Vec<User>>,
    pub mappings: RefCell<Value>,
    pub interfaces: RefCell<Vec<NetworkInterface>>,
    pub networks: RefCell<Vec<Network>>,
    pub time: RefCell<Option<TimeSettings>>,
    pub ldap: RefCell<Option<LdapSettings>>,
    pub ad: RefCell<Option<AdStatus>>,
    pub policies: RefCell<Vec<SnapshotPolicy>>,

    pub calls: RefCell<Vec<Call>>,
    /// Operations (by method name) that fail with HTTP 500.
    pub failing: RefCell<HashSet<&'static str>>,
    pub tenant_listings: Cell<usize>,
    next_id: Cell<u64>,
}

fn injected(op: &str) -> CoreError {
    CoreError::Api {
        message: format!("injected failure in {op}"),
        code: None,
        status: Some(500),
    }
}

fn trim(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/".into() } else { trimmed.into() }
}

impl FakeCluster {
    pub fn new() -> Self {
        let fake = Self::default();
        fake.files.borrow_mut().insert("/".into(), "2".into());
        fake.next_id.set(1000);
        fake
    }

    pub fn fail(&self, op: &'static str) {
        self.failing.borrow_mut().insert(op);
    }

    fn check(&self, op: &'static str) -> Result<(), CoreError> {
        if self.failing.borrow().contains(op) {
            Err(injected(op))
        } else {
            Ok(())
        }
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn next_id(&self) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn with_tenant(self, id: u64, name: &str) -> Self {
        self.tenants.borrow_mut().push(Tenant {
            id,
            name: name.into(),
            extra: serde_json::Map::new(),
        });
        self
    }

    pub fn with_dir(self, path: &str, id: &str) -> Self {
        self.files.borrow_mut().insert(trim(path), id.into());
        self
    }

    pub fn with_quota(self, file_id: &str, limit: u64) -> Self {
        self.quotas.borrow_mut().insert(file_id.into(), limit);
        self
    }

    pub fn with_export(self, id: &str, export_path: &str, fs_path: &str) -> Self {
        self.exports.borrow_mut().push(
            serde_json::from_value(json!({
                "id": id, "export_path": export_path, "fs_path": fs_path
            }))
            .unwrap(),
        );
        self
    }

    pub fn with_share(self, share: Value) -> Self {
        self.shares
            .borrow_mut()
            .push(serde_json::from_value(share).unwrap());
        self
    }

    pub fn with_user(self, id: &str, name: &str, uid: &str) -> Self {
        self.users.borrow_mut().push(
            serde_json::from_value(json!({
                "id": id, "name": name, "primary_group": "513", "uid": uid
            }))
            .unwrap(),
        );
        self
    }

    pub fn with_interface(self, id: u64) -> Self {
        self.interfaces.borrow_mut().push(
            serde_json::from_value(json!({
                "id": id, "name": "bond0", "default_gateway": "10.0.0.1", "mtu": 1500
            }))
            .unwrap(),
        );
        self
    }

    pub fn with_network(self, id: u64, name: &str, tenant_id: Option<u64>) -> Self {
        self.networks.borrow_mut().push(
            serde_json::from_value(json!({
                "id": id, "name": name, "tenant_id": tenant_id
            }))
            .unwrap(),
        );
        self
    }

    pub fn with_policy(self, id: u64, name: &str, source_file_id: &str) -> Self {
        self.policies.borrow_mut().push(
            serde_json::from_value(json!({
                "id": id,
                "policy_name": name,
                "source_file_id": source_file_id,
                "schedule": {"id": 1, "creation_schedule": {}},
                "enabled": true
            }))
            .unwrap(),
        );
        self
    }

    pub fn with_ad(self, status: &str, domain: &str) -> Self {
        *self.ad.borrow_mut() = Some(AdStatus {
            status: status.into(),
            domain: domain.into(),
            domain_netbios: String::new(),
            ou: String::new(),
            use_ad_posix_attributes: false,
            base_dn: String::new(),
            extra: serde_json::Map::new(),
        });
        self
    }
}

impl ClusterApi for FakeCluster {
    async fn list_tenants(&self) -> Result<Vec<Tenant>, CoreError> {
        self.check("list_tenants")?;
        self.tenant_listings.set(self.tenant_listings.get() + 1);
        Ok(self.tenants.borrow().clone())
    }

    async fn list_exports(&self) -> Result<Vec<NfsExport>, CoreError> {
        self.check("list_exports")?;
        Ok(self.exports.borrow().clone())
    }

    async fn get_export(&self, export_path: &str) -> Result<Option<NfsExport>, CoreError> {
        self.check("get_export")?;
        Ok(self
            .exports
            .borrow()
            .iter()
            .find(|e| e.export_path == export_path)
            .cloned())
    }

    async fn create_export(&self, spec: &NfsExportSpec) -> Result<(), CoreError> {
        self.record(Call::CreateExport(spec.clone()));
        self.check("create_export")
    }

    async fn update_export(&self, id: &str, spec: &NfsExportSpec) -> Result<(), CoreError> {
        self.record(Call::UpdateExport(id.into(), spec.clone()));
        self.check("update_export")
    }

    async fn list_shares(&self) -> Result<Vec<SmbShare>, CoreError> {
        self.check("list_shares")?;
        Ok(self.shares.borrow().clone())
    }

    async fn get_share(&self, name: &str) -> Result<Option<SmbShare>, CoreError> {
        self.check("get_share")?;
        Ok(self
            .shares
            .borrow()
            .iter()
            .find(|s| s.share_name == name || s.id == name)
            .cloned())
    }

    async fn create_share(&self, spec: &SmbShareSpec) -> Result<(), CoreError> {
        self.record(Call::CreateShare(spec.clone()));
        self.check("create_share")
    }

    async fn update_share(&self, id: &str, spec: &SmbShareSpec) -> Result<(), CoreError> {
        self.record(Call::UpdateShare(id.into(), spec.clone()));
        self.check("update_share")
    }

    async fn get_smb_settings(&self) -> Result<Value, CoreError> {
        self.check("get_smb_settings")?;
        Ok(self.smb_settings.borrow().clone())
    }

    async fn set_smb_settings(&self, settings: &Value) -> Result<(), CoreError> {
        self.record(Call::SetSmbSettings(settings.clone()));
        self.check("set_smb_settings")
    }

    async fn list_quotas(&self) -> Result<Vec<QuotaStatus>, CoreError> {
        self.check("list_quotas")?;
        let files = self.files.borrow();
        let mut out: Vec<QuotaStatus> = self
            .quotas
            .borrow()
            .iter()
            .map(|(id, limit)| {
                let path = files
                    .iter()
                    .find(|(_, fid)| *fid == id)
                    .map(|(p, _)| format!("{p}/"))
                    .unwrap_or_default();
                serde_json::from_value(json!({"id": id, "path": path, "limit": limit.to_string()}))
                    .unwrap()
            })
            .collect();
        out.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(out)
    }

    async fn get_quota(&self, id: &str) -> Result<Option<Quota>, CoreError> {
        self.check("get_quota")?;
        Ok(self.quotas.borrow().get(id).map(|limit| Quota {
            id: id.into(),
            limit: *limit,
        }))
    }

    async fn create_quota(&self, id: &str, limit: u64) -> Result<(), CoreError> {
        self.record(Call::CreateQuota(id.into(), limit));
        self.check("create_quota")?;
        self.quotas.borrow_mut().insert(id.into(), limit);
        Ok(())
    }

    async fn update_quota(&self, id: &str, limit: u64) -> Result<(), CoreError> {
        self.record(Call::UpdateQuota(id.into(), limit));
        self.check("update_quota")
    }

    async fn resolve_path(&self, path: &str) -> Result<Option<FileAttr>, CoreError> {
        self.check("resolve_path")?;
        Ok(self.files.borrow().get(&trim(path)).map(|id| {
            serde_json::from_value(json!({"id": id, "path": path, "type": "FS_FILE_TYPE_DIRECTORY"}))
                .unwrap()
        }))
    }

    async fn create_directory(&self, parent: &str, name: &str) -> Result<(), CoreError> {
        self.record(Call::CreateDirectory(parent.into(), name.into()));
        self.check("create_directory")?;
        let path = if parent == "/" {
            format!("/{name}")
        } else {
            format!("{}/{name}", trim(parent))
        };
        let id = self.next_id().to_string();
        self.files.borrow_mut().insert(path, id);
        Ok(())
    }

    async fn resolve_ids(&self, ids: &[String]) -> Result<Vec<ResolvedPath>, CoreError> {
        self.check("resolve_ids")?;
        let files = self.files.borrow();
        Ok(ids
            .iter()
            .filter_map(|id| {
                files.iter().find(|(_, fid)| *fid == id).map(|(p, _)| ResolvedPath {
                    id: id.clone(),
                    path: format!("{p}/"),
                })
            })
            .collect())
    }

    async fn list_users(&self) -> Result<Vec<User>, CoreError> {
        self.check("list_users")?;
        Ok(self.users.borrow().clone())
    }

    async fn create_user(&self, spec: &UserSpec, password: &SecretString) -> Result<(), CoreError> {
        self.record(Call::CreateUser(
            spec.clone(),
            password.expose_secret().to_owned(),
        ));
        self.check("create_user")
    }

    async fn update_user(&self, id: &str, spec: &UserSpec) -> Result<(), CoreError> {
        self.record(Call::UpdateUser(id.into(), spec.clone()));
        self.check("update_user")
    }

    async fn get_user_mappings(&self) -> Result<Value, CoreError> {
        self.check("get_user_mappings")?;
        Ok(self.mappings.borrow().clone())
    }

    async fn set_user_mappings(&self, mappings: &Value) -> Result<(), CoreError> {
        self.record(Call::SetUserMappings(mappings.clone()));
        self.check("set_user_mappings")
    }

    async fn list_interfaces(&self) -> Result<Vec<NetworkInterface>, CoreError> {
        self.check("list_interfaces")?;
        Ok(self.interfaces.borrow().clone())
    }

    async fn update_interface(&self, id: u64, spec: &InterfaceSpec) -> Result<(), CoreError> {
        self.record(Call::UpdateInterface(id, spec.clone()));
        self.check("update_interface")
    }

    async fn list_networks(&self, _interface_id: u64) -> Result<Vec<Network>, CoreError> {
        self.check("list_networks")?;
        Ok(self.networks.borrow().clone())
    }

    async fn create_network(
        &self,
        interface_id: u64,
        spec: &NetworkSpec,
    ) -> Result<(), CoreError> {
        self.record(Call::CreateNetwork(interface_id, spec.clone()));
        self.check("create_network")
    }

    async fn update_network(
        &self,
        interface_id: u64,
        id: u64,
        spec: &NetworkSpec,
    ) -> Result<(), CoreError> {
        self.record(Call::UpdateNetwork(interface_id, id, spec.clone()));
        self.check("update_network")
    }

    async fn get_time_settings(&self) -> Result<TimeSettings, CoreError> {
        self.check("get_time_settings")?;
        Ok(self.time.borrow().clone().unwrap_or(TimeSettings {
            use_ad_for_primary: false,
            ntp_servers: vec![],
        }))
    }

    async fn set_time_settings(&self, settings: &TimeSettings) -> Result<(), CoreError> {
        self.record(Call::SetTime(settings.clone()));
        self.check("set_time_settings")
    }

    async fn get_ldap_settings(&self) -> Result<LdapSettings, CoreError> {
        self.check("get_ldap_settings")?;
        Ok(self
            .ldap
            .borrow()
            .clone()
            .unwrap_or_else(|| serde_json::from_value(json!({})).unwrap()))
    }

    async fn set_ldap_settings(&self, spec: &LdapSettingsSpec) -> Result<(), CoreError> {
        self.record(Call::SetLdap(spec.clone()));
        self.check("set_ldap_settings")
    }

    async fn ad_status(&self) -> Result<AdStatus, CoreError> {
        self.check("ad_status")?;
        Ok(self
            .ad
            .borrow()
            .clone()
            .unwrap_or_else(|| serde_json::from_value(json!({"status": "LEFT"})).unwrap()))
    }

    async fn ad_join(&self, request: &AdJoinRequest) -> Result<(), CoreError> {
        self.record(Call::AdJoin(request.clone()));
        self.check("ad_join")
    }

    async fn ad_reconfigure(&self, request: &AdReconfigureRequest) -> Result<(), CoreError> {
        self.record(Call::AdReconfigure(request.clone()));
        self.check("ad_reconfigure")
    }

    async fn list_snapshot_policies(&self) -> Result<Vec<SnapshotPolicy>, CoreError> {
        self.check("list_snapshot_policies")?;
        Ok(self.policies.borrow().clone())
    }

    async fn create_snapshot_policy(&self, spec: &SnapshotPolicySpec) -> Result<(), CoreError> {
        self.record(Call::CreatePolicy(spec.clone()));
        self.check("create_snapshot_policy")
    }

    async fn update_snapshot_policy(
        &self,
        id: u64,
        spec: &SnapshotPolicySpec,
    ) -> Result<(), CoreError> {
        self.record(Call::UpdatePolicy(id, spec.clone()));
        self.check("update_snapshot_policy")
    }
}

// ── Prompts and secrets ─────────────────────────────────────────────

/// Answers prompts from a script and remembers every question.
#[derive(Clone, Default)]
pub struct ScriptedPrompter {
    pub answers: Rc<RefCell<VecDeque<String>>>,
    pub asked: Rc<RefCell<Vec<String>>>,
}

impl ScriptedPrompter {
    pub fn answering(answers: &[&str]) -> Self {
        Self {
            answers: Rc::new(RefCell::new(answers.iter().map(|a| (*a).to_owned()).collect())),
            asked: Rc::default(),
        }
    }

    pub fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, question: &str) -> Result<String, CoreError> {
        self.asked.borrow_mut().push(question.into());
        Ok(self.answers.borrow_mut().pop_front().unwrap_or_default())
    }
}

/// Fixed secrets, counting how often each was requested.
#[derive(Default)]
pub struct FixedSecrets {
    pub password_requests: usize,
    pub bind_requests: Vec<DirectoryService>,
}

impl SecretSource for FixedSecrets {
    fn initial_user_password(&mut self) -> Result<SecretString, CoreError> {
        self.password_requests += 1;
        Ok(SecretString::from("Initial-1".to_string()))
    }

    fn bind_credentials(&mut self, service: DirectoryService) -> Result<BindCredentials, CoreError> {
        self.bind_requests.push(service);
        Ok(BindCredentials {
            username: format!("{service}-binder"),
            password: SecretString::from("bind-pw".to_string()),
        })
    }
}
