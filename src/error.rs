use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Model-level error taxonomy
// ---------------------------------------------------------------------------

/// Errors surfaced by [`crate::model::ClusterModel`] operations.
///
/// Per-file decode failures are absorbed into zero feature rows and never
/// reach this level; only catalog- and selection-level failures do.
#[derive(Error, Debug)]
pub enum ClusterError {
    #[error("Directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("No audio files found in {0}")]
    EmptyCatalog(PathBuf),

    #[error("Asset index {index} out of range (catalog has {len} entries)")]
    IndexOutOfRange { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, ClusterError>;
