use crate::convert::snapshot_policy_spec;
use crate::error::CoreError;
use crate::model::DeclaredSnapshotPolicy;
use crate::remote::ClusterApi;

use super::{Context, MatchResult, ResourceKind};

/// Snapshot policies, keyed by policy name. The protected directory is
/// re-resolved to a file id on the target.
pub struct SnapshotPoliciesKind;

impl SnapshotPoliciesKind {
    async fn source_file_id<A: ClusterApi>(
        cx: &Context<'_, A>,
        item: &DeclaredSnapshotPolicy,
    ) -> Result<String, CoreError> {
        cx.api
            .resolve_path(&item.directory_path)
            .await?
            .map(|attr| attr.id)
            .ok_or_else(|| CoreError::PathNotFound {
                path: item.directory_path.clone(),
            })
    }
}

impl ResourceKind for SnapshotPoliciesKind {
    type Item = DeclaredSnapshotPolicy;
    type LiveId = u64;

    const KIND: &'static str = "snapshot_policy";

    fn natural_key(item: &DeclaredSnapshotPolicy) -> String {
        item.policy_name.clone()
    }

    async fn lookup<A: ClusterApi>(
        &self,
        cx: &Context<'_, A>,
        item: &DeclaredSnapshotPolicy,
    ) -> Result<MatchResult<u64>, CoreError> {
        let policies = cx.api.list_snapshot_policies().await?;
        Ok(policies
            .iter()
            .find(|policy| policy.policy_name == item.policy_name)
            .map_or(MatchResult::Absent, |policy| MatchResult::Found(policy.id)))
    }

    async fn create<A: ClusterApi>(
        &self,
        cx: &Context<'_, A>,
        item: &DeclaredSnapshotPolicy,
    ) -> Result<(), CoreError> {
        let source = Self::source_file_id(cx, item).await?;
        cx.api
            .create_snapshot_policy(&snapshot_policy_spec(item, source))
            .await
    }

    async fn update<A: ClusterApi>(
        &self,
        cx: &Context<'_, A>,
        id: u64,
        item: &DeclaredSnapshotPolicy,
    ) -> Result<(), CoreError> {
        let source = Self::source_file_id(cx, item).await?;
        cx.api
            .update_snapshot_policy(id, &snapshot_policy_spec(item, source))
            .await
    }
}
