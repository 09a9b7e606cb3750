// Cluster API wire types
//
// Request and response models for the administrative REST API. Fields use
// `#[serde(default)]` liberally because field presence varies across
// cluster software versions; anything not modelled explicitly lands in
// `extra` so that a listing can be written back out without loss.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Catch-all map for undocumented fields.
pub type Extra = Map<String, Value>;

// ── Identity ─────────────────────────────────────────────────────────

/// An identity referenced by a permission grant.
///
/// `auth_id` and `sid` are assigned by each cluster independently;
/// `domain` and `name` are the portable parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trustee {
    pub domain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
    /// `uid`, `gid` and anything else the cluster reports.
    #[serde(flatten)]
    pub extra: Extra,
}

/// One access grant on a share: a trustee plus its rights and type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharePermission {
    pub trustee: Trustee,
    /// `type`, `rights` and any other grant fields, carried verbatim.
    #[serde(flatten)]
    pub grant: Extra,
}

// ── Tenants ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub id: u64,
    pub name: String,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TenantList {
    #[serde(default)]
    pub entries: Vec<Tenant>,
}

// ── NFS ──────────────────────────────────────────────────────────────

/// NFS export as reported by `GET /v2/nfs/exports/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NfsExport {
    pub id: String,
    pub export_path: String,
    pub fs_path: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub restrictions: Vec<Value>,
    #[serde(default)]
    pub fields_to_present_as_32_bit: Vec<String>,
    #[serde(default)]
    pub tenant_id: Option<u64>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Body for creating or replacing an NFS export. Every field is always sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NfsExportSpec {
    pub export_path: String,
    pub fs_path: String,
    pub description: String,
    pub restrictions: Vec<Value>,
    pub fields_to_present_as_32_bit: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<u64>,
}

// ── SMB ──────────────────────────────────────────────────────────────

/// SMB share as reported by `GET /v2/smb/shares/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmbShare {
    pub id: String,
    pub share_name: String,
    #[serde(default)]
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
    #[serde(default)]
    pub tenant_id: Option<u64>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Body for creating or replacing an SMB share. Every field is always sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmbShareSpec {
    pub share_name: String,
    pub fs_path: String,
    pub description: String,
    pub permissions: Vec<SharePermission>,
    pub network_permissions: Vec<Value>,
    pub access_based_enumeration_enabled: bool,
    pub default_file_create_mode: String,
    pub default_directory_create_mode: String,
    pub require_encryption: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<u64>,
}

// ── Files ────────────────────────────────────────────────────────────

/// Attributes of a filesystem object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileAttr {
    pub id: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub file_type: String,
    #[serde(flatten)]
    pub extra: Extra,
}

/// One entry of `POST /v1/files/resolve`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedPath {
    pub id: String,
    pub path: String,
}

// ── Quotas ───────────────────────────────────────────────────────────

/// Directory quota keyed by the directory's file id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quota {
    pub id: String,
    #[serde(with = "string_u64")]
    pub limit: u64,
}

/// Quota plus usage, as reported by the status listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaStatus {
    pub id: String,
    pub path: String,
    #[serde(with = "string_u64")]
    pub limit: u64,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuotaPage {
    #[serde(default)]
    pub quotas: Vec<QuotaStatus>,
    #[serde(default)]
    pub paging: Paging,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Paging {
    #[serde(default)]
    pub next: Option<String>,
}

// ── Users ────────────────────────────────────────────────────────────

/// Local user record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub primary_group: String,
    /// Numeric POSIX uid as a string; empty when unset.
    #[serde(default)]
    pub uid: String,
    #[serde(default)]
    pub home_directory: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Body for creating or replacing a local user (password handled separately).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSpec {
    pub name: String,
    pub primary_group: String,
    pub uid: String,
    pub home_directory: Option<String>,
}

// ── Network ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkInterface {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub default_gateway: String,
    #[serde(default)]
    pub bonding_mode: Option<String>,
    #[serde(default)]
    pub mtu: u32,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceSpec {
    pub default_gateway: String,
    pub bonding_mode: Option<String>,
    pub mtu: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Network {
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
    #[serde(default)]
    pub tenant_id: Option<u64>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    pub name: String,
    pub assigned_by: String,
    pub floating_ip_ranges: Vec<String>,
    pub dns_servers: Vec<String>,
    pub dns_search_domains: Vec<String>,
    pub ip_ranges: Vec<String>,
    pub netmask: String,
    pub vlan_id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<u64>,
}

// ── Time / directory services ────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSettings {
    #[serde(default)]
    pub use_ad_for_primary: bool,
    #[serde(default)]
    pub ntp_servers: Vec<String>,
}

/// LDAP settings as reported by the cluster. The bind password is never returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LdapSettings {
    #[serde(default)]
    pub use_ldap: bool,
    #[serde(default)]
    pub bind_uri: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub base_distinguished_names: String,
    #[serde(default)]
    pub ldap_schema: String,
    #[serde(default)]
    pub encrypt_connection: bool,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LdapSettingsSpec {
    pub use_ldap: bool,
    pub bind_uri: String,
    pub user: String,
    pub password: String,
    pub base_distinguished_names: String,
    pub ldap_schema: String,
    pub encrypt_connection: bool,
}

/// Active Directory membership as reported by `GET /v1/ad/monitor`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdStatus {
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
    #[serde(flatten)]
    pub extra: Extra,
}

impl AdStatus {
    pub fn is_joined(&self) -> bool {
        self.status == "JOINED"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdJoinRequest {
    pub domain: String,
    pub domain_netbios: String,
    pub user: String,
    pub password: String,
    pub ou: String,
    pub use_ad_posix_attributes: bool,
    pub base_dn: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdReconfigureRequest {
    pub use_ad_posix_attributes: bool,
    pub base_dn: String,
}

// ── Snapshot policies ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotPolicy {
    pub id: u64,
    pub policy_name: String,
    #[serde(default)]
    pub snapshot_name_template: String,
    pub source_file_id: String,
    #[serde(default)]
    pub schedule: Value,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub lock_key_ref: Option<Value>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SnapshotPolicyList {
    #[serde(default)]
    pub entries: Vec<SnapshotPolicy>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotPolicySpec {
    pub policy_name: String,
    pub snapshot_name_template: String,
    pub source_file_id: String,
    pub schedule: Value,
    pub enabled: bool,
    pub lock_key_ref: Option<Value>,
}

// ── Serde helpers ────────────────────────────────────────────────────

/// Byte counts travel as decimal strings; accept bare numbers on input too.
pub mod string_u64 {
    use serde::de::{self, Deserializer, Visitor};
    use serde::Serializer;
    use std::fmt;

    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        struct U64Visitor;

        impl Visitor<'_> for U64Visitor {
            type Value = u64;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an unsigned integer or a decimal string")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<u64, E> {
                Ok(v)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<u64, E> {
                u64::try_from(v).map_err(|_| E::custom(format!("negative value {v}")))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<u64, E> {
                v.trim()
                    .parse()
                    .map_err(|_| E::custom(format!("invalid integer string {v:?}")))
            }
        }

        deserializer.deserialize_any(U64Visitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn trustee_keeps_unknown_fields() {
        let raw = json!({"domain": "LOCAL", "name": "alice", "uid": null, "gid": 12});
        let trustee: Trustee = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(trustee.name.as_deref(), Some("alice"));
        assert_eq!(serde_json::to_value(&trustee).unwrap(), raw);
    }

    #[test]
    fn quota_limit_accepts_string_and_number() {
        let a: Quota = serde_json::from_value(json!({"id": "7", "limit": "100"})).unwrap();
        let b: Quota = serde_json::from_value(json!({"id": "7", "limit": 100})).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_value(&a).unwrap(),
            json!({"id": "7", "limit": "100"})
        );
    }
}
