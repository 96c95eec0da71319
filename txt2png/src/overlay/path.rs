//! Path translation between the mounted view and the backing tree.
//!
//! Virtual paths are slash-separated strings rooted at the mount point.
//! Real paths are only ever produced by [`BackingRoot::to_real`], which keeps
//! every filesystem access confined to the backing root.

use std::path::PathBuf;

use super::error::{OverlayError, OverlayResult};

/// The virtual root path.
pub const VIRTUAL_ROOT: &str = "/";

/// Immutable backing-root configuration, established once at mount time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackingRoot {
    root: String,
}

impl BackingRoot {
    /// Create a backing root from a directory path.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::EmptyRoot`] if `root` is empty.
    pub fn new(root: impl Into<String>) -> OverlayResult<Self> {
        let root = root.into();
        if root.is_empty() {
            return Err(OverlayError::EmptyRoot);
        }
        Ok(Self { root })
    }

    /// The backing root as configured.
    pub fn as_str(&self) -> &str {
        &self.root
    }

    /// Translate a virtual path into the corresponding real path.
    ///
    /// Concatenates the root with `virtual_path`, collapsing a duplicate
    /// separator at the join point. Never fails and never touches the disk.
    pub fn to_real(&self, virtual_path: &str) -> PathBuf {
        let base = self.root.strip_suffix('/').unwrap_or(&self.root);
        let mut real = String::with_capacity(base.len() + virtual_path.len() + 1);
        real.push_str(base);
        if !virtual_path.starts_with('/') {
            real.push('/');
        }
        real.push_str(virtual_path);
        PathBuf::from(real)
    }
}

/// Split a virtual path into its parent directory and final component.
///
/// `"/a/b.png"` → `("/a", "b.png")`, `"/b.png"` → `("/", "b.png")`.
pub fn split_virtual(virtual_path: &str) -> (&str, &str) {
    match virtual_path.rfind('/') {
        Some(0) => (VIRTUAL_ROOT, &virtual_path[1..]),
        Some(idx) => (&virtual_path[..idx], &virtual_path[idx + 1..]),
        None => (VIRTUAL_ROOT, virtual_path),
    }
}

/// Join a virtual directory and a single name component.
///
/// # Errors
///
/// Rejects empty names, `.`/`..`, and names containing a separator, so a
/// joined path can never climb out of the backing root.
pub fn join_virtual(dir: &str, name: &str) -> OverlayResult<String> {
    if name.is_empty() || name == "." || name == ".." || name.contains('/') {
        return Err(OverlayError::InvalidPath(name.to_string()));
    }
    let dir = dir.strip_suffix('/').unwrap_or(dir);
    Ok(format!("{}/{}", dir, name))
}
