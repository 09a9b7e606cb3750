// Filesystem endpoints: path lookup, id resolution and directory creation

use serde_json::json;
use tracing::debug;

use crate::client::ClusterClient;
use crate::error::Error;
use crate::models::{FileAttr, ResolvedPath};

impl ClusterClient {
    /// Attributes of the object at `path`. A 404 means the path does not exist.
    ///
    /// `GET /v1/files/{path}/info/attributes`
    pub async fn file_attributes(&self, path: &str) -> Result<FileAttr, Error> {
        let url = self.endpoint(&["v1", "files", path, "info", "attributes"])?;
        self.get(url).await
    }

    /// Create directory `name` inside `parent`.
    ///
    /// `POST /v1/files/{parent}/entries/` with `{"name": "...", "action": "CREATE_DIRECTORY"}`
    pub async fn create_directory(&self, parent: &str, name: &str) -> Result<FileAttr, Error> {
        let url = self.endpoint(&["v1", "files", parent, "entries", ""])?;
        debug!(parent, name, "creating directory");
        self.post(url, &json!({ "name": name, "action": "CREATE_DIRECTORY" }))
            .await
    }

    /// Map file ids back to paths.
    ///
    /// `POST /v1/files/resolve` with a JSON array of ids
    pub async fn resolve_file_ids(&self, ids: &[String]) -> Result<Vec<ResolvedPath>, Error> {
        let url = self.endpoint(&["v1", "files", "resolve"])?;
        self.post(url, &ids).await
    }
}
