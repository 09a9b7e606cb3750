// ── Declared (portable) resource items ──
//
// These are the records stored in snapshot files. They never carry
// cluster-local identifiers: tenants travel by name, trustees are
// normalized, directories travel by path. The one exception is the network
// kind, whose numeric ids are stable by convention (interface 1, network 1).

use clusync_api::models::{SharePermission, string_u64};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An NFS export, keyed by `export_path`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclaredExport {
    pub export_path: String,
    pub fs_path: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub restrictions: Vec<Value>,
    #[serde(default)]
    pub fields_to_present_as_32_bit: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_name: Option<String>,
}

/// An SMB share, keyed by `share_name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclaredShare {
    pub share_name: String,
    pub fs_path: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub permissions: Vec<SharePermission>,
    #[serde(default)]
    pub network_permissions: Vec<Value>,
    #[serde(default)]
    pub access_based_enumeration_enabled: bool,
    #[serde(default)]
    pub default_file_create_mode: String,
    #[serde(default)]
    pub default_directory_create_mode: String,
    #[serde(default)]
    pub require_encryption: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_name: Option<String>,
}

/// Contents of `smb.json`: global settings alongside the share list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SmbSnapshot {
    #[serde(default)]
    pub smb_settings: Map<String, Value>,
    #[serde(default)]
    pub smb_shares: Vec<DeclaredShare>,
}

/// A directory quota, keyed by directory `path`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclaredQuota {
    pub path: String,
    #[serde(with = "string_u64")]
    pub limit: u64,
}

/// A local user, matched by name or numeric uid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclaredUser {
    pub name: String,
    #[serde(default)]
    pub primary_group: String,
    /// Numeric uid as a string; empty means "no fixed uid".
    #[serde(default)]
    pub uid: String,
    #[serde(default)]
    pub home_directory: Option<String>,
}

impl DeclaredUser {
    /// The uid, if one is pinned.
    pub fn pinned_uid(&self) -> Option<&str> {
        Some(self.uid.trim()).filter(|uid| !uid.is_empty())
    }
}

/// Interface tuning applied to the interface with the same id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclaredInterface {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub default_gateway: String,
    #[serde(default)]
    pub bonding_mode: Option<String>,
    #[serde(default)]
    pub mtu: u32,
}

/// A network on an interface. `id == 1` denotes the primary network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclaredNetwork {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub assigned_by: String,
    #[serde(default)]
    pub floating_ip_ranges: Vec<String>,
    #[serde(default)]
    pub dns_servers: Vec<String>,
    #[serde(default)]
    pub dns_search_domains: Vec<String>,
    #[serde(default)]
    pub ip_ranges: Vec<String>,
    #[serde(default)]
    pub netmask: String,
    #[serde(default)]
    pub vlan_id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_name: Option<String>,
}

/// Network id reserved for the primary network on every cluster.
pub const PRIMARY_NETWORK_ID: u64 = 1;

/// Contents of `network.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    #[serde(default)]
    pub interface: Vec<DeclaredInterface>,
    #[serde(default)]
    pub networks: Vec<DeclaredNetwork>,
}

impl NetworkSnapshot {
    /// Interface the networks belong to: the first declared one, else 1.
    pub fn interface_id(&self) -> u64 {
        self.interface.first().map_or(1, |iface| iface.id)
    }
}

/// A snapshot policy, keyed by `policy_name`; its directory travels by path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclaredSnapshotPolicy {
    pub policy_name: String,
    #[serde(default)]
    pub snapshot_name_template: String,
    pub directory_path: String,
    #[serde(default)]
    pub schedule: Value,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub lock_key_ref: Option<Value>,
}

/// LDAP binding as stored in `ldap.json`; bind credentials are never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclaredLdap {
    #[serde(default)]
    pub use_ldap: bool,
    #[serde(default)]
    pub bind_uri: String,
    #[serde(default)]
    pub base_distinguished_names: String,
    #[serde(default)]
    pub ldap_schema: String,
    #[serde(default)]
    pub encrypt_connection: bool,
}

/// Active Directory membership as stored in `ad.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclaredAd {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub domain_netbios: String,
    #[serde(default)]
    pub ou: String,
    #[serde(default)]
    pub use_ad_posix_attributes: bool,
    #[serde(default)]
    pub base_dn: String,
}
