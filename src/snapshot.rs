use std::io::ErrorKind;
use std::path::PathBuf;

use serde::de::IgnoredAny;
use tracing::{debug, error, warn};

use crate::error::SnapshotError;

pub const EMPTY_SNAPSHOT: &[u8] = b"[]";

/// The JSON document the capture process keeps overwriting.
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SnapshotFile { path: path.into() }
    }

    /// Reads the current snapshot, checking that it is a JSON array.
    /// The returned bytes are the file contents untouched.
    pub async fn read(&self) -> Result<Vec<u8>, SnapshotError> {
        let body = tokio::fs::read(&self.path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => SnapshotError::NotFound(self.path.clone()),
            _ => SnapshotError::Io {
                path: self.path.clone(),
                source: e,
            },
        })?;

        serde_json::from_slice::<Vec<IgnoredAny>>(&body).map_err(|source| {
            SnapshotError::Malformed {
                path: self.path.clone(),
                source,
            }
        })?;

        Ok(body)
    }

    /// Like `read`, but every failure degrades to an empty array.
    pub async fn read_or_empty(&self) -> Vec<u8> {
        match self.read().await {
            Ok(body) => body,
            Err(e @ SnapshotError::NotFound(_)) => {
                debug!("{}", e);
                EMPTY_SNAPSHOT.to_vec()
            }
            Err(e @ SnapshotError::Malformed { .. }) => {
                // Usually a partial write by the producer; next poll catches up.
                warn!("{}", e);
                EMPTY_SNAPSHOT.to_vec()
            }
            Err(e @ SnapshotError::Io { .. }) => {
                error!("{}", e);
                EMPTY_SNAPSHOT.to_vec()
            }
        }
    }
}
