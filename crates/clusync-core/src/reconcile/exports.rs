use crate::convert::export_spec;
use crate::error::CoreError;
use crate::model::DeclaredExport;
use crate::remote::ClusterApi;

use super::{Context, MatchResult, ResourceKind};

/// NFS exports, keyed by export path.
pub struct ExportsKind;

impl ResourceKind for ExportsKind {
    type Item = DeclaredExport;
    type LiveId = String;

    const KIND: &'static str = "nfs";

    fn natural_key(item: &DeclaredExport) -> String {
        item.export_path.clone()
    }

    async fn lookup<A: ClusterApi>(
        &self,
        cx: &Context<'_, A>,
        item: &DeclaredExport,
    ) -> Result<MatchResult<String>, CoreError> {
        Ok(match cx.api.get_export(&item.export_path).await? {
            Some(live) => MatchResult::Found(live.id),
            None => MatchResult::Absent,
        })
    }

    async fn create<A: ClusterApi>(
        &self,
        cx: &Context<'_, A>,
        item: &DeclaredExport,
    ) -> Result<(), CoreError> {
        let tenant_id = cx
            .tenants
            .resolve_optional(cx.api, item.tenant_name.as_deref())
            .await?;
        cx.api.create_export(&export_spec(item, tenant_id)).await
    }

    async fn update<A: ClusterApi>(
        &self,
        cx: &Context<'_, A>,
        id: String,
        item: &DeclaredExport,
    ) -> Result<(), CoreError> {
        let tenant_id = cx
            .tenants
            .resolve_optional(cx.api, item.tenant_name.as_deref())
            .await?;
        cx.api.update_export(&id, &export_spec(item, tenant_id)).await
    }
}
