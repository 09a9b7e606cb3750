use tracing::info;

use crate::error::CoreError;
use crate::model::DeclaredQuota;
use crate::remote::ClusterApi;

use super::{Context, MatchResult, ResourceKind};

/// Directory quotas, keyed by path. A missing directory can be provisioned.
pub struct QuotasKind;

impl QuotasKind {
    async fn file_id<A: ClusterApi>(cx: &Context<'_, A>, path: &str) -> Result<String, CoreError> {
        cx.api
            .resolve_path(path)
            .await?
            .map(|attr| attr.id)
            .ok_or_else(|| CoreError::PathNotFound { path: path.into() })
    }
}

impl ResourceKind for QuotasKind {
    type Item = DeclaredQuota;
    type LiveId = String;

    const KIND: &'static str = "quotas";
    const PROVISIONS_PATHS: bool = true;

    fn natural_key(item: &DeclaredQuota) -> String {
        item.path.clone()
    }

    /// A missing directory is an error (`PathNotFound`); a directory with no
    /// quota is `Absent`. Any other failure of the quota lookup stays an error.
    async fn lookup<A: ClusterApi>(
        &self,
        cx: &Context<'_, A>,
        item: &DeclaredQuota,
    ) -> Result<MatchResult<String>, CoreError> {
        let id = Self::file_id(cx, &item.path).await?;
        Ok(match cx.api.get_quota(&id).await? {
            Some(_) => MatchResult::Found(id),
            None => MatchResult::Absent,
        })
    }

    async fn create<A: ClusterApi>(
        &self,
        cx: &Context<'_, A>,
        item: &DeclaredQuota,
    ) -> Result<(), CoreError> {
        let id = Self::file_id(cx, &item.path).await?;
        cx.api.create_quota(&id, item.limit).await
    }

    async fn update<A: ClusterApi>(
        &self,
        cx: &Context<'_, A>,
        id: String,
        item: &DeclaredQuota,
    ) -> Result<(), CoreError> {
        cx.api.update_quota(&id, item.limit).await
    }

    async fn provision<A: ClusterApi>(
        &self,
        cx: &Context<'_, A>,
        item: &DeclaredQuota,
    ) -> Result<String, CoreError> {
        let (parent, name) = split_path(&item.path).ok_or_else(|| CoreError::Unsupported {
            operation: format!("creating `{}`", item.path),
        })?;
        cx.api.create_directory(parent, name).await?;
        info!(parent, name, "directory created");
        Ok(format!("created directory `{name}` in `{parent}`"))
    }
}

/// Split a directory path into parent and leaf name.
///
/// A trailing slash is ignored and a top-level directory's parent is `/`.
/// The root itself has no parent and yields `None`.
pub fn split_path(path: &str) -> Option<(&str, &str)> {
    let trimmed = path.trim_end_matches('/');
    let (parent, name) = trimmed.rsplit_once('/')?;
    if name.is_empty() {
        return None;
    }
    Some((if parent.is_empty() { "/" } else { parent }, name))
}
