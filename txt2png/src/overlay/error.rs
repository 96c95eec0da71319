//! Error kinds for overlay operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::render::RenderError;

/// Result type for overlay operations.
pub type OverlayResult<T> = Result<T, OverlayError>;

/// Errors surfaced by overlay operations.
///
/// Classifier failures never appear here: they are absorbed by the
/// eligibility adapter and the entry is treated as a plain file.
#[derive(Debug, Error)]
pub enum OverlayError {
    /// A directory or file on the backing tree could not be accessed.
    #[error("backing path unavailable: {}: {source}", path.display())]
    BackingUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A synthetic name resolved to no real entry.
    #[error("no real entry for synthetic name: {0}")]
    NotFound(String),

    /// The renderer failed for a resolved real file.
    #[error("render failed for {}: {source}", path.display())]
    Render {
        path: PathBuf,
        #[source]
        source: RenderError,
    },

    /// A mutation or write-intent open was attempted.
    #[error("read-only filesystem")]
    ReadOnlyViolation,

    /// A virtual path or name component was malformed.
    #[error("invalid virtual path: {0}")]
    InvalidPath(String),

    /// The backing root was empty.
    #[error("backing root must not be empty")]
    EmptyRoot,
}

impl OverlayError {
    /// Wrap an I/O error from the backing tree.
    pub fn backing(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::BackingUnavailable {
            path: path.into(),
            source,
        }
    }

    /// POSIX errno reported to the virtual-filesystem caller.
    pub fn errno(&self) -> i32 {
        match self {
            Self::BackingUnavailable { source, .. } => source.raw_os_error().unwrap_or(libc::EIO),
            Self::NotFound(_) => libc::ENOENT,
            Self::Render { .. } => libc::EIO,
            Self::ReadOnlyViolation => libc::EROFS,
            Self::InvalidPath(_) => libc::ENOENT,
            Self::EmptyRoot => libc::EINVAL,
        }
    }
}
