// Directory quota endpoints
//
// Quotas are keyed by the file id of the directory they limit. The status
// listing is paged; `paging.next` carries a server-relative link to the
// following page and is absent on the last one.

use serde_json::json;
use tracing::debug;

use crate::client::ClusterClient;
use crate::error::Error;
use crate::models::{Quota, QuotaPage, QuotaStatus};

const QUOTA_PAGE_SIZE: &str = "1000";

impl ClusterClient {
    /// List every quota with its path, following `paging.next` links.
    ///
    /// `GET /v1/files/quotas/status/?limit=1000`
    pub async fn list_quota_status(&self) -> Result<Vec<QuotaStatus>, Error> {
        let mut url = self.endpoint(&["v1", "files", "quotas", "status", ""])?;
        url.query_pairs_mut().append_pair("limit", QUOTA_PAGE_SIZE);

        let mut quotas = Vec::new();
        loop {
            let page: QuotaPage = self.get(url).await?;
            debug!(count = page.quotas.len(), "quota page received");
            quotas.extend(page.quotas);
            match page.paging.next.filter(|next| !next.is_empty()) {
                Some(next) => url = self.join(&next)?,
                None => break,
            }
        }
        Ok(quotas)
    }

    /// `GET /v1/files/quotas/{id}`
    pub async fn get_quota(&self, id: &str) -> Result<Quota, Error> {
        let url = self.endpoint(&["v1", "files", "quotas", id])?;
        self.get(url).await
    }

    /// `POST /v1/files/quotas/` with `{"id": "...", "limit": "..."}`
    pub async fn create_quota(&self, id: &str, limit: u64) -> Result<(), Error> {
        let url = self.endpoint(&["v1", "files", "quotas", ""])?;
        debug!(id, limit, "creating quota");
        self.post_no_response(url, &json!({ "id": id, "limit": limit.to_string() }))
            .await
    }

    /// `PUT /v1/files/quotas/{id}`
    pub async fn replace_quota(&self, id: &str, limit: u64) -> Result<(), Error> {
        let url = self.endpoint(&["v1", "files", "quotas", id])?;
        debug!(id, limit, "replacing quota");
        self.put_no_response(url, &json!({ "id": id, "limit": limit.to_string() }))
            .await
    }
}
