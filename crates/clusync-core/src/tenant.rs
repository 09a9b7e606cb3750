// ── Tenant resolution ──
//
// Numeric tenant ids are assigned per cluster; snapshots carry tenant
// names. Every lookup scans the cluster's tenant listing. With
// `LiveState::PerBatch` the listing is fetched once and reused until
// `invalidate()`.

use std::sync::{Mutex, PoisonError};

use clusync_api::models::Tenant;
use tracing::debug;

use crate::config::LiveState;
use crate::error::CoreError;
use crate::remote::ClusterApi;

/// Maps tenant names to ids (and back) on one cluster.
#[derive(Debug, Default)]
pub struct TenantResolver {
    live_state: LiveState,
    cached: Mutex<Option<Vec<Tenant>>>,
}

impl TenantResolver {
    pub fn new(live_state: LiveState) -> Self {
        Self {
            live_state,
            cached: Mutex::new(None),
        }
    }

    /// Drop any cached listing (start of a new kind).
    pub fn invalidate(&self) {
        *self.cached.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    async fn tenants<A: ClusterApi>(&self, api: &A) -> Result<Vec<Tenant>, CoreError> {
        if self.live_state == LiveState::PerBatch {
            if let Some(tenants) = self
                .cached
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .as_ref()
            {
                return Ok(tenants.clone());
            }
        }

        let tenants = api.list_tenants().await?;
        debug!(count = tenants.len(), "tenant listing fetched");
        if self.live_state == LiveState::PerBatch {
            *self.cached.lock().unwrap_or_else(PoisonError::into_inner) = Some(tenants.clone());
        }
        Ok(tenants)
    }

    /// Name of the tenant with `tenant_id`, or `None` when no tenant matches.
    pub async fn resolve_name<A: ClusterApi>(
        &self,
        api: &A,
        tenant_id: u64,
    ) -> Result<Option<String>, CoreError> {
        let tenants = self.tenants(api).await?;
        Ok(tenants
            .into_iter()
            .find(|tenant| tenant.id == tenant_id)
            .map(|tenant| tenant.name))
    }

    /// Id of the tenant called `name` on this cluster.
    pub async fn resolve_id<A: ClusterApi>(&self, api: &A, name: &str) -> Result<u64, CoreError> {
        let tenants = self.tenants(api).await?;
        tenants
            .iter()
            .find(|tenant| tenant.name == name)
            .map(|tenant| tenant.id)
            .ok_or_else(|| CoreError::UnresolvedTenant { name: name.into() })
    }

    /// Resolve an optional tenant name; no name means no tenant association.
    pub async fn resolve_optional<A: ClusterApi>(
        &self,
        api: &A,
        name: Option<&str>,
    ) -> Result<Option<u64>, CoreError> {
        match name {
            Some(name) => self.resolve_id(api, name).await.map(Some),
            None => Ok(None),
        }
    }

    /// Optional id → optional name, for the dump direction.
    pub async fn name_for<A: ClusterApi>(
        &self,
        api: &A,
        tenant_id: Option<u64>,
    ) -> Result<Option<String>, CoreError> {
        match tenant_id {
            Some(id) => self.resolve_name(api, id).await,
            None => Ok(None),
        }
    }
}
