use std::path::PathBuf;

use strata_core::CoreError;
use strata_world::WorldError;

/// Errors that can occur during save/load operations.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("truncated file: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("corrupt data: {0}")]
    Corrupt(String),

    #[error("invalid magic bytes (expected STRA)")]
    InvalidMagic,

    #[error("unsupported archive format version {0}")]
    UnsupportedVersion(u16),

    #[error("LZ4 decompression failed: {0}")]
    DecompressError(String),

    #[error(transparent)]
    Allocation(#[from] CoreError),

    #[error(transparent)]
    World(#[from] WorldError),
}

impl PersistError {
    /// Map a read failure, keeping "not found" distinct so callers can
    /// fall back to generating terrain.
    pub(crate) fn from_read(path: &std::path::Path, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            PersistError::NotFound(path.to_path_buf())
        } else {
            PersistError::Io(err)
        }
    }
}
