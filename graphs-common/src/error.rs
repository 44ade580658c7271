//! Error kinds shared across the graphs toolkit.
//!
//! Mirrors the kinds named in the error-handling design: unreachable
//! targets and invariant violations are deliberately NOT errors here —
//! the former is encoded as `Distance::INFINITY`, the latter is a panic.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("input not found: {0}")]
    InputNotFound(PathBuf),

    #[error("unrecognized extract format: {0}")]
    FormatUnrecognized(PathBuf),

    #[error("cache entry corrupt or unreadable: {0}")]
    CacheCorrupt(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
