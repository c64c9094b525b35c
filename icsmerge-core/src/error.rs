//! Error types for the icsmerge engine.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reconciling calendar snapshots.
#[derive(Error, Debug)]
pub enum MergeError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("ICS parse error: {0}")]
    IcsParse(String),

    #[error("ICS generation error: {0}")]
    IcsGenerate(String),

    #[error("Merge failed: {0}")]
    Reconcile(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for icsmerge operations.
pub type MergeResult<T> = Result<T, MergeError>;
