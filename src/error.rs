use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Failures reading the snapshot file. None of these reach an HTTP client:
/// the endpoint answers `[]` for all of them.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("no snapshot at {0} yet")]
    NotFound(PathBuf),

    #[error("malformed snapshot at {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failures of a single refresh cycle on the rendering side.
#[derive(Debug, Error)]
pub enum Error {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("snapshot endpoint answered HTTP {0}")]
    Status(u16),

    #[error("snapshot fetch timed out after {0:?}")]
    Timeout(Duration),

    #[error("snapshot body is not a JSON array: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
