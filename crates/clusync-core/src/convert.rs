// ── Wire ↔ declared conversions ──
//
// Live records become declared items on dump (identities normalized,
// tenant ids replaced by names resolved by the caller); declared items
// become full request bodies on apply (tenant ids re-resolved on the
// target by the caller). Every body carries every field: the cluster
// never sees a partial update.

use clusync_api::models::{
    AdJoinRequest, AdReconfigureRequest, AdStatus, InterfaceSpec, LdapSettings, LdapSettingsSpec,
    Network, NetworkInterface, NetworkSpec, NfsExport, NfsExportSpec, QuotaStatus, SmbShare,
    SmbShareSpec, SnapshotPolicy, SnapshotPolicySpec, User, UserSpec,
};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

use crate::identity::normalize_permissions;
use crate::model::{
    DeclaredAd, DeclaredExport, DeclaredInterface, DeclaredLdap, DeclaredNetwork, DeclaredQuota,
    DeclaredShare, DeclaredSnapshotPolicy, DeclaredUser,
};

// ── Live → declared ──────────────────────────────────────────────────

pub fn declare_export(export: NfsExport, tenant_name: Option<String>) -> DeclaredExport {
    DeclaredExport {
        export_path: export.export_path,
        fs_path: export.fs_path,
        description: export.description,
        restrictions: export.restrictions,
        fields_to_present_as_32_bit: export.fields_to_present_as_32_bit,
        tenant_name,
    }
}

pub fn declare_share(share: SmbShare, tenant_name: Option<String>) -> DeclaredShare {
    DeclaredShare {
        permissions: normalize_permissions(&share.permissions),
        share_name: share.share_name,
        fs_path: share.fs_path,
        description: share.description,
        network_permissions: share.network_permissions,
        access_based_enumeration_enabled: share.access_based_enumeration_enabled,
        default_file_create_mode: share.default_file_create_mode,
        default_directory_create_mode: share.default_directory_create_mode,
        require_encryption: share.require_encryption,
        tenant_name,
    }
}

pub fn declare_quota(quota: QuotaStatus) -> DeclaredQuota {
    DeclaredQuota {
        path: quota.path,
        limit: quota.limit,
    }
}

pub fn declare_user(user: User) -> DeclaredUser {
    DeclaredUser {
        name: user.name,
        primary_group: user.primary_group,
        uid: user.uid,
        home_directory: user.home_directory,
    }
}

pub fn declare_interface(iface: NetworkInterface) -> DeclaredInterface {
    DeclaredInterface {
        id: iface.id,
        name: iface.name,
        default_gateway: iface.default_gateway,
        bonding_mode: iface.bonding_mode,
        mtu: iface.mtu,
    }
}

pub fn declare_network(network: Network, tenant_name: Option<String>) -> DeclaredNetwork {
    DeclaredNetwork {
        id: network.id,
        name: network.name,
        assigned_by: network.assigned_by,
        floating_ip_ranges: network.floating_ip_ranges,
        dns_servers: network.dns_servers,
        dns_search_domains: network.dns_search_domains,
        ip_ranges: network.ip_ranges,
        netmask: network.netmask,
        vlan_id: network.vlan_id,
        tenant_name,
    }
}

pub fn declare_snapshot_policy(
    policy: SnapshotPolicy,
    directory_path: String,
) -> DeclaredSnapshotPolicy {
    DeclaredSnapshotPolicy {
        policy_name: policy.policy_name,
        snapshot_name_template: policy.snapshot_name_template,
        directory_path,
        schedule: policy.schedule,
        enabled: policy.enabled,
        lock_key_ref: policy.lock_key_ref,
    }
}

pub fn declare_ldap(ldap: LdapSettings) -> DeclaredLdap {
    DeclaredLdap {
        use_ldap: ldap.use_ldap,
        bind_uri: ldap.bind_uri,
        base_distinguished_names: ldap.base_distinguished_names,
        ldap_schema: ldap.ldap_schema,
        encrypt_connection: ldap.encrypt_connection,
    }
}

pub fn declare_ad(ad: AdStatus) -> DeclaredAd {
    DeclaredAd {
        status: ad.status,
        domain: ad.domain,
        domain_netbios: ad.domain_netbios,
        ou: ad.ou,
        use_ad_posix_attributes: ad.use_ad_posix_attributes,
        base_dn: ad.base_dn,
    }
}

// ── Declared → request bodies ────────────────────────────────────────

pub fn export_spec(item: &DeclaredExport, tenant_id: Option<u64>) -> NfsExportSpec {
    NfsExportSpec {
        export_path: item.export_path.clone(),
        fs_path: item.fs_path.clone(),
        description: item.description.clone(),
        restrictions: item.restrictions.clone(),
        fields_to_present_as_32_bit: item.fields_to_present_as_32_bit.clone(),
        tenant_id,
    }
}

/// Share body; permissions are normalized again so a hand-edited snapshot
/// cannot smuggle cluster-local ids into the target.
pub fn share_spec(item: &DeclaredShare, tenant_id: Option<u64>) -> SmbShareSpec {
    SmbShareSpec {
        share_name: item.share_name.clone(),
        fs_path: item.fs_path.clone(),
        description: item.description.clone(),
        permissions: normalize_permissions(&item.permissions),
        network_permissions: item.network_permissions.clone(),
        access_based_enumeration_enabled: item.access_based_enumeration_enabled,
        default_file_create_mode: item.default_file_create_mode.clone(),
        default_directory_create_mode: item.default_directory_create_mode.clone(),
        require_encryption: item.require_encryption,
        tenant_id,
    }
}

pub fn user_spec(item: &DeclaredUser) -> UserSpec {
    UserSpec {
        name: item.name.clone(),
        primary_group: item.primary_group.clone(),
        uid: item.uid.clone(),
        home_directory: item.home_directory.clone(),
    }
}

pub fn interface_spec(item: &DeclaredInterface) -> InterfaceSpec {
    InterfaceSpec {
        default_gateway: item.default_gateway.clone(),
        bonding_mode: item.bonding_mode.clone(),
        mtu: item.mtu,
    }
}

pub fn network_spec(item: &DeclaredNetwork, tenant_id: Option<u64>) -> NetworkSpec {
    NetworkSpec {
        name: item.name.clone(),
        assigned_by: item.assigned_by.clone(),
        floating_ip_ranges: item.floating_ip_ranges.clone(),
        dns_servers: item.dns_servers.clone(),
        dns_search_domains: item.dns_search_domains.clone(),
        ip_ranges: item.ip_ranges.clone(),
        netmask: item.netmask.clone(),
        vlan_id: item.vlan_id,
        tenant_id,
    }
}

/// Policy body targeting `source_file_id`. The schedule's own `id` belongs
/// to the source cluster and is dropped.
pub fn snapshot_policy_spec(
    item: &DeclaredSnapshotPolicy,
    source_file_id: String,
) -> SnapshotPolicySpec {
    let mut schedule = item.schedule.clone();
    if let Value::Object(map) = &mut schedule {
        map.remove("id");
    }
    SnapshotPolicySpec {
        policy_name: item.policy_name.clone(),
        snapshot_name_template: item.snapshot_name_template.clone(),
        source_file_id,
        schedule,
        enabled: item.enabled,
        lock_key_ref: item.lock_key_ref.clone(),
    }
}

pub fn ldap_spec(item: &DeclaredLdap, user: &str, password: &SecretString) -> LdapSettingsSpec {
    LdapSettingsSpec {
        use_ldap: item.use_ldap,
        bind_uri: item.bind_uri.clone(),
        user: user.into(),
        password: password.expose_secret().to_owned(),
        base_distinguished_names: item.base_distinguished_names.clone(),
        ldap_schema: item.ldap_schema.clone(),
        encrypt_connection: item.encrypt_connection,
    }
}

pub fn ad_join_request(item: &DeclaredAd, user: &str, password: &SecretString) -> AdJoinRequest {
    AdJoinRequest {
        domain: item.domain.clone(),
        domain_netbios: item.domain_netbios.clone(),
        user: user.into(),
        password: password.expose_secret().to_owned(),
        ou: item.ou.clone(),
        use_ad_posix_attributes: item.use_ad_posix_attributes,
        base_dn: item.base_dn.clone(),
    }
}

pub fn ad_reconfigure_request(item: &DeclaredAd) -> AdReconfigureRequest {
    AdReconfigureRequest {
        use_ad_posix_attributes: item.use_ad_posix_attributes,
        base_dn: item.base_dn.clone(),
    }
}
