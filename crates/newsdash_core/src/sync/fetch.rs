//! Snapshot delivery seam.
//!
//! # Responsibility
//! - Define the fetch contract the sync engine drives.
//! - Provide the file-backed fetcher for the local scrape pipeline output.
//!
//! # Invariants
//! - A fetcher either yields a fully parsed snapshot or a typed error;
//!   partial documents never cross this boundary.

use crate::model::snapshot::{Snapshot, SnapshotError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub type FetchResult<T> = Result<T, FetchError>;

/// Why a fetch attempt produced no snapshot.
#[derive(Debug)]
pub enum FetchError {
    /// The document could not be retrieved at all.
    Transport(std::io::Error),
    /// The document was retrieved but violates the expected shape.
    Malformed(SnapshotError),
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(err) => write!(f, "snapshot fetch failed: {err}"),
            Self::Malformed(err) => write!(f, "{err}"),
        }
    }
}

impl Error for FetchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            Self::Malformed(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for FetchError {
    fn from(value: std::io::Error) -> Self {
        Self::Transport(value)
    }
}

impl From<SnapshotError> for FetchError {
    fn from(value: SnapshotError) -> Self {
        Self::Malformed(value)
    }
}

/// Contract for the external delivery mechanism.
///
/// The scrape pipeline and its transport live outside this crate; the engine
/// only ever sees "a snapshot arrived" or "this attempt failed".
pub trait SnapshotFetcher {
    fn fetch(&self) -> FetchResult<Snapshot>;
}

/// Reads the merged document the scrape orchestrator writes to local disk.
pub struct FileSnapshotFetcher {
    path: PathBuf,
}

impl FileSnapshotFetcher {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl SnapshotFetcher for FileSnapshotFetcher {
    fn fetch(&self) -> FetchResult<Snapshot> {
        let raw = std::fs::read_to_string(&self.path)?;
        Ok(Snapshot::parse(&raw)?)
    }
}
