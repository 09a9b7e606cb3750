// NFS export endpoints
//
// Exports are addressed by their export path, which is URL-encoded into a
// single path segment (`/v2/nfs/exports/%2Fe1`).

use tracing::debug;

use crate::client::ClusterClient;
use crate::error::Error;
use crate::models::{NfsExport, NfsExportSpec};

impl ClusterClient {
    /// `GET /v2/nfs/exports/`
    pub async fn list_nfs_exports(&self) -> Result<Vec<NfsExport>, Error> {
        let url = self.endpoint(&["v2", "nfs", "exports", ""])?;
        self.get(url).await
    }

    /// `GET /v2/nfs/exports/{export_path}`
    pub async fn get_nfs_export(&self, export_path: &str) -> Result<NfsExport, Error> {
        let url = self.endpoint(&["v2", "nfs", "exports", export_path])?;
        self.get(url).await
    }

    /// `POST /v2/nfs/exports/?allow-fs-path-create=true`
    pub async fn create_nfs_export(&self, spec: &NfsExportSpec) -> Result<NfsExport, Error> {
        let mut url = self.endpoint(&["v2", "nfs", "exports", ""])?;
        url.query_pairs_mut().append_pair("allow-fs-path-create", "true");
        debug!(export_path = %spec.export_path, "creating NFS export");
        self.post(url, spec).await
    }

    /// `PUT /v2/nfs/exports/{id}?allow-fs-path-create=false`
    pub async fn replace_nfs_export(&self, id: &str, spec: &NfsExportSpec) -> Result<(), Error> {
        let mut url = self.endpoint(&["v2", "nfs", "exports", id])?;
        url.query_pairs_mut().append_pair("allow-fs-path-create", "false");
        debug!(id, export_path = %spec.export_path, "replacing NFS export");
        self.put_no_response(url, spec).await
    }
}
