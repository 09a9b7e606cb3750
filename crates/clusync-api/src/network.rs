// Network interface and network endpoints

use tracing::debug;

use crate::client::ClusterClient;
use crate::error::Error;
use crate::models::{InterfaceSpec, Network, NetworkInterface, NetworkSpec};

impl ClusterClient {
    /// `GET /v2/network/interfaces/`
    pub async fn list_interfaces(&self) -> Result<Vec<NetworkInterface>, Error> {
        let url = self.endpoint(&["v2", "network", "interfaces", ""])?;
        self.get(url).await
    }

    /// `GET /v2/network/interfaces/{id}`
    pub async fn get_interface(&self, id: u64) -> Result<NetworkInterface, Error> {
        let url = self.endpoint(&["v2", "network", "interfaces", &id.to_string()])?;
        self.get(url).await
    }

    /// `PATCH /v2/network/interfaces/{id}`
    pub async fn modify_interface(&self, id: u64, spec: &InterfaceSpec) -> Result<(), Error> {
        let url = self.endpoint(&["v2", "network", "interfaces", &id.to_string()])?;
        debug!(id, "modifying interface");
        self.patch_no_response(url, spec).await
    }

    /// `GET /v2/network/interfaces/{interface}/networks/`
    pub async fn list_networks(&self, interface_id: u64) -> Result<Vec<Network>, Error> {
        let url = self.endpoint(&[
            "v2",
            "network",
            "interfaces",
            &interface_id.to_string(),
            "networks",
            "",
        ])?;
        self.get(url).await
    }

    /// `POST /v2/network/interfaces/{interface}/networks/`
    pub async fn add_network(&self, interface_id: u64, spec: &NetworkSpec) -> Result<Network, Error> {
        let url = self.endpoint(&[
            "v2",
            "network",
            "interfaces",
            &interface_id.to_string(),
            "networks",
            "",
        ])?;
        debug!(interface_id, name = %spec.name, "adding network");
        self.post(url, spec).await
    }

    /// `PUT /v2/network/interfaces/{interface}/networks/{id}`
    pub async fn replace_network(
        &self,
        interface_id: u64,
        id: u64,
        spec: &NetworkSpec,
    ) -> Result<(), Error> {
        let url = self.endpoint(&[
            "v2",
            "network",
            "interfaces",
            &interface_id.to_string(),
            "networks",
            &id.to_string(),
        ])?;
        debug!(interface_id, id, name = %spec.name, "replacing network");
        self.put_no_response(url, spec).await
    }
}
