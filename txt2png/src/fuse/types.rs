//! Mount handle and bridge errors.

use fuse3::raw::MountHandle as Fuse3MountHandle;
use std::future::Future;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use thiserror::Error;

/// Result type for bridge operations.
pub type Fuse3Result<T> = Result<T, Fuse3Error>;

/// Errors from mounting the overlay.
#[derive(Debug, Error)]
pub enum Fuse3Error {
    /// The fuse3 session could not be mounted
    #[error("Mount failed: {0}")]
    MountFailed(String),
}

/// Handle to a mounted overlay.
///
/// Awaiting the handle resolves when the filesystem is unmounted (for
/// example with `fusermount -u`). Dropping it unmounts.
pub struct MountHandle {
    inner: Fuse3MountHandle,
}

impl MountHandle {
    pub(crate) fn new(inner: Fuse3MountHandle) -> Self {
        Self { inner }
    }

    /// Unmount the filesystem.
    pub async fn unmount(self) -> io::Result<()> {
        self.inner.unmount().await
    }
}

impl Future for MountHandle {
    type Output = io::Result<()>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.inner).poll(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fuse3_error_mount_failed() {
        let err = Fuse3Error::MountFailed("permission denied".to_string());
        assert!(err.to_string().contains("Mount failed"));
        assert!(err.to_string().contains("permission denied"));
    }
}
