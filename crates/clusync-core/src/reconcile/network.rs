use crate::convert::{interface_spec, network_spec};
use crate::error::CoreError;
use crate::model::{DeclaredInterface, DeclaredNetwork, PRIMARY_NETWORK_ID};
use crate::remote::ClusterApi;

use super::{Context, MatchResult, ResourceKind};

/// Interface tuning. Interfaces are hardware: they are matched by id and
/// never created.
pub struct InterfaceKind;

impl ResourceKind for InterfaceKind {
    type Item = DeclaredInterface;
    type LiveId = u64;

    const KIND: &'static str = "interface";

    fn natural_key(item: &DeclaredInterface) -> String {
        format!("interface {}", item.id)
    }

    async fn lookup<A: ClusterApi>(
        &self,
        cx: &Context<'_, A>,
        item: &DeclaredInterface,
    ) -> Result<MatchResult<u64>, CoreError> {
        let interfaces = cx.api.list_interfaces().await?;
        Ok(if interfaces.iter().any(|iface| iface.id == item.id) {
            MatchResult::Found(item.id)
        } else {
            MatchResult::Conflict(format!("no interface with id {} on the target", item.id))
        })
    }

    async fn create<A: ClusterApi>(
        &self,
        _cx: &Context<'_, A>,
        item: &DeclaredInterface,
    ) -> Result<(), CoreError> {
        Err(CoreError::Unsupported {
            operation: format!("adding network interface {}", item.id),
        })
    }

    async fn update<A: ClusterApi>(
        &self,
        cx: &Context<'_, A>,
        id: u64,
        item: &DeclaredInterface,
    ) -> Result<(), CoreError> {
        cx.api.update_interface(id, &interface_spec(item)).await
    }
}

/// Networks on one interface, keyed by name.
///
/// The primary network (`id == 1`) exists on every cluster and is always
/// updated in place, wherever it appears in the snapshot.
pub struct NetworksKind {
    interface_id: u64,
}

impl NetworksKind {
    pub fn new(interface_id: u64) -> Self {
        Self { interface_id }
    }
}

impl ResourceKind for NetworksKind {
    type Item = DeclaredNetwork;
    type LiveId = u64;

    const KIND: &'static str = "network";

    fn natural_key(item: &DeclaredNetwork) -> String {
        item.name.clone()
    }

    async fn lookup<A: ClusterApi>(
        &self,
        cx: &Context<'_, A>,
        item: &DeclaredNetwork,
    ) -> Result<MatchResult<u64>, CoreError> {
        if item.id == PRIMARY_NETWORK_ID {
            return Ok(MatchResult::Found(PRIMARY_NETWORK_ID));
        }
        let networks = cx.api.list_networks(self.interface_id).await?;
        Ok(networks
            .iter()
            .find(|network| network.name == item.name)
            .map_or(MatchResult::Absent, |network| MatchResult::Found(network.id)))
    }

    async fn create<A: ClusterApi>(
        &self,
        cx: &Context<'_, A>,
        item: &DeclaredNetwork,
    ) -> Result<(), CoreError> {
        let tenant_id = cx
            .tenants
            .resolve_optional(cx.api, item.tenant_name.as_deref())
            .await?;
        cx.api
            .create_network(self.interface_id, &network_spec(item, tenant_id))
            .await
    }

    async fn update<A: ClusterApi>(
        &self,
        cx: &Context<'_, A>,
        id: u64,
        item: &DeclaredNetwork,
    ) -> Result<(), CoreError> {
        let tenant_id = cx
            .tenants
            .resolve_optional(cx.api, item.tenant_name.as_deref())
            .await?;
        cx.api
            .update_network(self.interface_id, id, &network_spec(item, tenant_id))
            .await
    }
}
