// ── Snapshot store ──
//
// One JSON file per resource collection in a snapshot directory, written
// with 4-space indentation. There is no schema tag: the dump and apply
// sides share the types in `model`.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use strum::Display;
use tracing::debug;

use crate::error::CoreError;

/// The files a snapshot directory may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SnapshotFile {
    #[strum(to_string = "nfs.json")]
    Nfs,
    #[strum(to_string = "smb.json")]
    Smb,
    #[strum(to_string = "quotas.json")]
    Quotas,
    #[strum(to_string = "users.json")]
    Users,
    #[strum(to_string = "ntp.json")]
    Time,
    #[strum(to_string = "ldap.json")]
    Ldap,
    #[strum(to_string = "ad.json")]
    Ad,
    #[strum(to_string = "maps.json")]
    UserMappings,
    #[strum(to_string = "snap_policy.json")]
    SnapshotPolicies,
    #[strum(to_string = "network.json")]
    Network,
}

#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, file: SnapshotFile) -> PathBuf {
        self.dir.join(file.to_string())
    }

    pub fn exists(&self, file: SnapshotFile) -> bool {
        self.path(file).is_file()
    }

    pub fn read<T: DeserializeOwned>(&self, file: SnapshotFile) -> Result<T, CoreError> {
        let path = self.path(file);
        let shown = path.display().to_string();
        let raw = std::fs::read_to_string(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                CoreError::SnapshotMissing { path: shown.clone() }
            } else {
                CoreError::SnapshotIo {
                    path: shown.clone(),
                    source,
                }
            }
        })?;
        debug!(path = %shown, bytes = raw.len(), "snapshot read");
        serde_json::from_str(&raw).map_err(|source| CoreError::SnapshotFormat {
            path: shown,
            source,
        })
    }

    pub fn write<T: Serialize>(&self, file: SnapshotFile, value: &T) -> Result<(), CoreError> {
        let path = self.path(file);
        let shown = path.display().to_string();

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        value
            .serialize(&mut ser)
            .map_err(|source| CoreError::SnapshotFormat {
                path: shown.clone(),
                source,
            })?;
        buf.push(b'\n');

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| CoreError::SnapshotIo {
                path: shown.clone(),
                source,
            })?;
        }
        std::fs::write(&path, &buf).map_err(|source| CoreError::SnapshotIo {
            path: shown.clone(),
            source,
        })?;
        debug!(path = %shown, bytes = buf.len(), "snapshot written");
        Ok(())
    }
}
