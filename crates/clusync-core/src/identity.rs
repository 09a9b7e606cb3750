// ── Identity normalization ──
//
// Security identifiers and auth ids are minted independently by every
// cluster, so a grant read from one cluster cannot be replayed on another
// with them attached. Normalization strips them while leaving the grant
// itself (rights, type, inheritance) untouched.

use clusync_api::models::{SharePermission, Trustee};

/// Domain tag of identities local to one cluster.
pub const LOCAL_DOMAIN: &str = "LOCAL";

/// Strip the non-portable identifiers from one trustee.
///
/// - `LOCAL`: the `sid` always goes; `auth_id` goes when a name is present.
/// - any other domain: `auth_id` goes, name or not.
pub fn normalize_trustee(trustee: &Trustee) -> Trustee {
    let mut out = trustee.clone();
    if out.domain == LOCAL_DOMAIN {
        out.sid = None;
        if out.name.as_deref().is_some_and(|name| !name.is_empty()) {
            out.auth_id = None;
        }
    } else {
        out.auth_id = None;
    }
    out
}

/// Normalize every trustee in a permission list. Pure and idempotent.
pub fn normalize_permissions(permissions: &[SharePermission]) -> Vec<SharePermission> {
    permissions
        .iter()
        .map(|perm| SharePermission {
            trustee: normalize_trustee(&perm.trustee),
            grant: perm.grant.clone(),
        })
        .collect()
}
