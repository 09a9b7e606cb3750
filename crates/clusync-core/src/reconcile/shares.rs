use crate::convert::share_spec;
use crate::error::CoreError;
use crate::model::DeclaredShare;
use crate::remote::ClusterApi;

use super::{Context, MatchResult, ResourceKind};

/// SMB shares, keyed by share name. Trustees are normalized in `share_spec`.
pub struct SharesKind;

impl ResourceKind for SharesKind {
    type Item = DeclaredShare;
    type LiveId = String;

    const KIND: &'static str = "smb";

    fn natural_key(item: &DeclaredShare) -> String {
        item.share_name.clone()
    }

    async fn lookup<A: ClusterApi>(
        &self,
        cx: &Context<'_, A>,
        item: &DeclaredShare,
    ) -> Result<MatchResult<String>, CoreError> {
        Ok(match cx.api.get_share(&item.share_name).await? {
            Some(live) => MatchResult::Found(live.id),
            None => MatchResult::Absent,
        })
    }

    async fn create<A: ClusterApi>(
        &self,
        cx: &Context<'_, A>,
        item: &DeclaredShare,
    ) -> Result<(), CoreError> {
        let tenant_id = cx
            .tenants
            .resolve_optional(cx.api, item.tenant_name.as_deref())
            .await?;
        cx.api.create_share(&share_spec(item, tenant_id)).await
    }

    async fn update<A: ClusterApi>(
        &self,
        cx: &Context<'_, A>,
        id: String,
        item: &DeclaredShare,
    ) -> Result<(), CoreError> {
        let tenant_id = cx
            .tenants
            .resolve_optional(cx.api, item.tenant_name.as_deref())
            .await?;
        cx.api.update_share(&id, &share_spec(item, tenant_id)).await
    }
}
