// Snapshot policy endpoints

use tracing::debug;

use crate::client::ClusterClient;
use crate::error::Error;
use crate::models::{SnapshotPolicy, SnapshotPolicyList, SnapshotPolicySpec};

impl ClusterClient {
    /// `GET /v2/snapshots/policies/`
    pub async fn list_snapshot_policies(&self) -> Result<Vec<SnapshotPolicy>, Error> {
        let url = self.endpoint(&["v2", "snapshots", "policies", ""])?;
        let list: SnapshotPolicyList = self.get(url).await?;
        Ok(list.entries)
    }

    /// `POST /v2/snapshots/policies/`
    pub async fn create_snapshot_policy(
        &self,
        spec: &SnapshotPolicySpec,
    ) -> Result<SnapshotPolicy, Error> {
        let url = self.endpoint(&["v2", "snapshots", "policies", ""])?;
        debug!(policy_name = %spec.policy_name, "creating snapshot policy");
        self.post(url, spec).await
    }

    /// `PUT /v2/snapshots/policies/{id}`
    pub async fn replace_snapshot_policy(
        &self,
        id: u64,
        spec: &SnapshotPolicySpec,
    ) -> Result<(), Error> {
        let url = self.endpoint(&["v2", "snapshots", "policies", &id.to_string()])?;
        debug!(id, policy_name = %spec.policy_name, "replacing snapshot policy");
        self.put_no_response(url, spec).await
    }
}
