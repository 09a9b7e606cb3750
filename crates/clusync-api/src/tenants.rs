// Multitenancy endpoints

use crate::client::ClusterClient;
use crate::error::Error;
use crate::models::{Tenant, TenantList};

impl ClusterClient {
    /// `GET /v1/multitenancy/tenants/`
    pub async fn list_tenants(&self) -> Result<Vec<Tenant>, Error> {
        let url = self.endpoint(&["v1", "multitenancy", "tenants", ""])?;
        let list: TenantList = self.get(url).await?;
        Ok(list.entries)
    }
}
