// SMB share and global SMB settings endpoints

use serde_json::Value;
use tracing::debug;

use crate::client::ClusterClient;
use crate::error::Error;
use crate::models::{SmbShare, SmbShareSpec};

impl ClusterClient {
    /// `GET /v2/smb/shares/`
    pub async fn list_smb_shares(&self) -> Result<Vec<SmbShare>, Error> {
        let url = self.endpoint(&["v2", "smb", "shares", ""])?;
        self.get(url).await
    }

    /// Fetch one share by name or id.
    ///
    /// `GET /v2/smb/shares/{name}`
    pub async fn get_smb_share(&self, name: &str) -> Result<SmbShare, Error> {
        let url = self.endpoint(&["v2", "smb", "shares", name])?;
        self.get(url).await
    }

    /// `POST /v2/smb/shares/?allow-fs-path-create=true`
    pub async fn create_smb_share(&self, spec: &SmbShareSpec) -> Result<SmbShare, Error> {
        let mut url = self.endpoint(&["v2", "smb", "shares", ""])?;
        url.query_pairs_mut().append_pair("allow-fs-path-create", "true");
        debug!(share_name = %spec.share_name, "creating SMB share");
        self.post(url, spec).await
    }

    /// `PUT /v2/smb/shares/{id}?allow-fs-path-create=false`
    pub async fn replace_smb_share(&self, id: &str, spec: &SmbShareSpec) -> Result<(), Error> {
        let mut url = self.endpoint(&["v2", "smb", "shares", id])?;
        url.query_pairs_mut().append_pair("allow-fs-path-create", "false");
        debug!(id, share_name = %spec.share_name, "replacing SMB share");
        self.put_no_response(url, spec).await
    }

    /// Global SMB settings, carried as an opaque document.
    ///
    /// `GET /v1/smb/settings`
    pub async fn get_smb_settings(&self) -> Result<Value, Error> {
        let url = self.endpoint(&["v1", "smb", "settings"])?;
        self.get(url).await
    }

    /// `PUT /v1/smb/settings`
    pub async fn set_smb_settings(&self, settings: &Value) -> Result<(), Error> {
        let url = self.endpoint(&["v1", "smb", "settings"])?;
        debug!("replacing SMB settings");
        self.put_no_response(url, settings).await
    }
}
