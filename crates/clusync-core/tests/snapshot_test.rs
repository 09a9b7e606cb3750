#![allow(clippy::unwrap_used)]

mod common;

use clusync_core::{
    Action, Applier, ApprovalGate, ApprovalMode, Context, DirectoryService, Dumper, LiveState,
    ResourceSet, SnapshotFile, SnapshotStore, TenantResolver,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tempfile::TempDir;

use common::{Call, FakeCluster, FixedSecrets, ScriptedPrompter};

fn write(dir: &TempDir, name: &str, value: &Value) {
    std::fs::write(
        dir.path().join(name),
        serde_json::to_string_pretty(value).unwrap(),
    )
    .unwrap();
}

fn read(dir: &TempDir, name: &str) -> Value {
    serde_json::from_str(&std::fs::read_to_string(dir.path().join(name)).unwrap()).unwrap()
}

async fn apply(
    fake: &FakeCluster,
    dir: &TempDir,
    sets: &[ResourceSet],
    secrets: &mut FixedSecrets,
) -> clusync_core::OutcomeLog {
    let tenants = TenantResolver::new(LiveState::PerItem);
    let store = SnapshotStore::new(dir.path());
    let gate = ApprovalGate::new(ApprovalMode::Auto, ScriptedPrompter::default());
    Applier::new(Context::new(fake, &tenants, LiveState::PerItem), gate, &store)
        .apply(sets, secrets)
        .await
}

// ── Apply ───────────────────────────────────────────────────────────

#[tokio::test]
async fn missing_snapshot_file_is_skipped_and_run_continues() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "quotas.json",
        &json!([{"path": "/q/", "limit": "100"}]),
    );
    let fake = FakeCluster::new().with_dir("/q", "40");

    let log = apply(
        &fake,
        &dir,
        &[ResourceSet::Nfs, ResourceSet::Quotas],
        &mut FixedSecrets::default(),
    )
    .await;

    let nfs: Vec<_> = log.for_key("nfs.json").collect();
    assert_eq!(nfs.len(), 1);
    assert_eq!(nfs[0].action, Action::Skipped);
    assert_eq!(fake.calls(), vec![Call::CreateQuota("40".into(), 100)]);
}

#[tokio::test]
async fn unreadable_snapshot_file_fails_only_its_kind() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("nfs.json"), "{ not json").unwrap();
    write(
        &dir,
        "quotas.json",
        &json!([{"path": "/q/", "limit": 7}]),
    );
    let fake = FakeCluster::new().with_dir("/q", "40");

    let log = apply(&fake, &dir, &[], &mut FixedSecrets::default()).await;

    assert_eq!(log.for_key("nfs.json").next().unwrap().action, Action::Failed);
    assert_eq!(log.for_key("/q/").next().unwrap().action, Action::Created);
}

#[tokio::test]
async fn kinds_replay_in_fixed_order() {
    let dir = TempDir::new().unwrap();
    write(&dir, "nfs.json", &json!([{"export_path": "/e1", "fs_path": "/d1"}]));
    write(
        &dir,
        "smb.json",
        &json!({"smb_settings": {"session_encryption": "NONE"}, "smb_shares": [{"share_name": "S1", "fs_path": "/s1"}]}),
    );
    let fake = FakeCluster::new();

    apply(
        &fake,
        &dir,
        &[ResourceSet::Smb, ResourceSet::Nfs],
        &mut FixedSecrets::default(),
    )
    .await;

    let calls = fake.calls();
    assert_eq!(calls.len(), 3);
    assert!(matches!(calls[0], Call::CreateExport(_)));
    assert_eq!(
        calls[1],
        Call::SetSmbSettings(json!({"session_encryption": "NONE"}))
    );
    assert!(matches!(calls[2], Call::CreateShare(_)));
}

#[tokio::test]
async fn users_password_is_requested_only_when_needed() {
    let dir = TempDir::new().unwrap();
    write(&dir, "users.json", &json!([]));
    let fake = FakeCluster::new();
    let mut secrets = FixedSecrets::default();

    apply(&fake, &dir, &[ResourceSet::Users], &mut secrets).await;
    assert_eq!(secrets.password_requests, 0);

    write(
        &dir,
        "users.json",
        &json!([{"name": "carol", "primary_group": "513", "uid": ""}]),
    );
    apply(&fake, &dir, &[ResourceSet::Users], &mut secrets).await;
    assert_eq!(secrets.password_requests, 1);
    assert!(matches!(&fake.calls()[0], Call::CreateUser(spec, pw) if spec.name == "carol" && pw == "Initial-1"));
}

#[tokio::test]
async fn others_replay_settings_network_directory_services_and_policies() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "ntp.json",
        &json!({"use_ad_for_primary": false, "ntp_servers": ["pool.ntp.org"]}),
    );
    write(
        &dir,
        "network.json",
        &json!({
            "interface": [{"id": 1, "name": "bond0", "default_gateway": "10.0.0.1", "bonding_mode": "ACTIVE_BACKUP", "mtu": 9000}],
            "networks": [{"id": 1, "name": "Default", "assigned_by": "STATIC"}]
        }),
    );
    write(
        &dir,
        "ldap.json",
        &json!({"use_ldap": true, "bind_uri": "ldap://dc.example.com", "base_distinguished_names": "dc=example,dc=com"}),
    );
    write(
        &dir,
        "ad.json",
        &json!({"status": "JOINED", "domain": "example.com", "domain_netbios": "EXAMPLE"}),
    );
    write(&dir, "maps.json", &json!([{"local": "alice", "remote": "EXAMPLE\\alice"}]));
    write(
        &dir,
        "snap_policy.json",
        &json!([{
            "policy_name": "hourly",
            "snapshot_name_template": "{policy}_{datetime}",
            "directory_path": "/data/",
            "schedule": {"id": 3, "creation_schedule": {"frequency": "SCHEDULE_HOURLY_OR_LESS"}},
            "enabled": true
        }]),
    );
    let fake = FakeCluster::new()
        .with_interface(1)
        .with_network(1, "Default", None)
        .with_dir("/data", "77");
    let mut secrets = FixedSecrets::default();

    let log = apply(&fake, &dir, &[ResourceSet::Others], &mut secrets).await;

    assert_eq!(log.count(Action::Failed), 0, "{:?}", log.entries());
    assert_eq!(
        secrets.bind_requests,
        vec![DirectoryService::Ldap, DirectoryService::Ad]
    );

    let calls = fake.calls();
    assert_eq!(calls.len(), 7, "{calls:?}");
    assert!(matches!(&calls[0], Call::SetTime(t) if t.ntp_servers == ["pool.ntp.org"]));
    assert!(matches!(&calls[1], Call::UpdateInterface(1, spec) if spec.mtu == 9000));
    assert!(matches!(&calls[2], Call::UpdateNetwork(1, 1, _)));
    assert!(matches!(&calls[3], Call::SetLdap(spec) if spec.user == "ldap-binder" && spec.password == "bind-pw"));
    assert!(matches!(&calls[4], Call::AdJoin(req) if req.domain == "example.com" && req.user == "ad-binder"));
    assert!(matches!(&calls[5], Call::SetUserMappings(_)));
    let Call::CreatePolicy(policy) = &calls[6] else {
        panic!("expected a policy create, got {calls:?}");
    };
    assert_eq!(policy.source_file_id, "77");
    assert_eq!(
        policy.schedule,
        json!({"creation_schedule": {"frequency": "SCHEDULE_HOURLY_OR_LESS"}})
    );
}

#[tokio::test]
async fn ad_joined_elsewhere_is_a_conflict() {
    let dir = TempDir::new().unwrap();
    write(&dir, "ad.json", &json!({"status": "JOINED", "domain": "example.com"}));
    let fake = FakeCluster::new().with_ad("JOINED", "other.org");

    let log = apply(&fake, &dir, &[ResourceSet::Others], &mut FixedSecrets::default()).await;

    assert!(fake.calls().is_empty());
    assert_eq!(
        log.for_key("example.com").next().unwrap().action,
        Action::Skipped
    );
}

#[tokio::test]
async fn ad_joined_to_same_domain_is_reconfigured() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "ad.json",
        &json!({"status": "JOINED", "domain": "example.com", "use_ad_posix_attributes": true, "base_dn": "dc=example,dc=com"}),
    );
    let fake = FakeCluster::new().with_ad("JOINED", "EXAMPLE.COM");

    apply(&fake, &dir, &[ResourceSet::Others], &mut FixedSecrets::default()).await;

    assert!(matches!(&fake.calls()[0], Call::AdReconfigure(req) if req.use_ad_posix_attributes));
}

// ── Dump ────────────────────────────────────────────────────────────

#[tokio::test]
async fn dump_writes_portable_snapshot_files() {
    let dir = TempDir::new().unwrap();
    let fake = FakeCluster::new()
        .with_tenant(9, "eng")
        .with_export("3", "/e1", "/d1")
        .with_share(json!({
            "id": "4",
            "share_name": "S1",
            "fs_path": "/s1",
            "tenant_id": 9,
            "permissions": [{
                "type": "ALLOWED",
                "rights": ["ALL"],
                "trustee": {"domain": "LOCAL", "name": "alice", "auth_id": "100", "sid": "S-1"}
            }]
        }))
        .with_dir("/q", "40")
        .with_quota("40", 100);
    *fake.smb_settings.borrow_mut() = json!({"session_encryption": "NONE"});
    let tenants = TenantResolver::new(LiveState::PerItem);
    let store = SnapshotStore::new(dir.path());

    let entries = Dumper::new(&fake, &tenants, &store)
        .dump(&[ResourceSet::Nfs, ResourceSet::Smb, ResourceSet::Quotas])
        .await;

    assert!(entries.iter().all(|e| e.result.is_ok()), "{entries:?}");
    assert!(fake.calls().is_empty());

    assert_eq!(
        read(&dir, "nfs.json"),
        json!([{
            "export_path": "/e1",
            "fs_path": "/d1",
            "description": "",
            "restrictions": [],
            "fields_to_present_as_32_bit": []
        }])
    );
    assert_eq!(
        read(&dir, "smb.json"),
        json!({
            "smb_settings": {"session_encryption": "NONE"},
            "smb_shares": [{
                "share_name": "S1",
                "fs_path": "/s1",
                "description": "",
                "permissions": [{
                    "type": "ALLOWED",
                    "rights": ["ALL"],
                    "trustee": {"domain": "LOCAL", "name": "alice"}
                }],
                "network_permissions": [],
                "access_based_enumeration_enabled": false,
                "default_file_create_mode": "",
                "default_directory_create_mode": "",
                "require_encryption": false,
                "tenant_name": "eng"
            }]
        })
    );
    assert_eq!(read(&dir, "quotas.json"), json!([{"path": "/q/", "limit": "100"}]));
}

#[tokio::test]
async fn dump_failure_is_isolated_to_its_file() {
    let dir = TempDir::new().unwrap();
    let fake = FakeCluster::new().with_export("3", "/e1", "/d1");
    fake.fail("list_shares");
    let tenants = TenantResolver::new(LiveState::PerItem);
    let store = SnapshotStore::new(dir.path());

    let entries = Dumper::new(&fake, &tenants, &store)
        .dump(&[ResourceSet::Nfs, ResourceSet::Smb])
        .await;

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].file, SnapshotFile::Nfs);
    assert!(entries[0].result.is_ok());
    assert!(entries[1].result.is_err());
    assert!(store.exists(SnapshotFile::Nfs));
    assert!(!store.exists(SnapshotFile::Smb));
}

#[tokio::test]
async fn dump_then_apply_recreates_exports_on_an_empty_cluster() {
    let dir = TempDir::new().unwrap();
    let source = FakeCluster::new()
        .with_export("3", "/e1", "/d1")
        .with_export("4", "/e2", "/d2");
    let tenants = TenantResolver::new(LiveState::PerItem);
    let store = SnapshotStore::new(dir.path());
    Dumper::new(&source, &tenants, &store)
        .dump(&[ResourceSet::Nfs])
        .await;

    let target = FakeCluster::new();
    let log = apply(&target, &dir, &[ResourceSet::Nfs], &mut FixedSecrets::default()).await;

    assert_eq!(log.count(Action::Created), 2);
    let paths: Vec<_> = target
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            Call::CreateExport(spec) => Some((spec.export_path, spec.fs_path)),
            _ => None,
        })
        .collect();
    assert_eq!(
        paths,
        vec![("/e1".to_string(), "/d1".to_string()), ("/e2".to_string(), "/d2".to_string())]
    );
}
