//! Inode numbering for the FUSE bridge.
//!
//! The kernel addresses entries by inode number while the overlay works on
//! virtual paths. This table is the only state the bridge keeps: it maps
//! numbers to path strings and nothing else, so eligibility, attributes and
//! rendered data are always recomputed by the overlay.
//!
//! Inodes handed out by `lookup` carry the kernel's lookup count and are
//! dropped again on `forget`, so looking up names that do not exist in a
//! listing does not grow the table for the life of the mount.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::overlay::VIRTUAL_ROOT;

/// The FUSE root inode.
pub const ROOT_INODE: u64 = 1;

/// Concurrent inode ↔ virtual path table.
///
/// Numbers are allocated on first sight of a path and stay stable while
/// the kernel holds a reference. Lock order is `lookups`, then
/// `path_to_inode`, then `inode_to_path`.
pub struct InodeTable {
    inode_to_path: DashMap<u64, String>,
    path_to_inode: DashMap<String, u64>,
    lookups: DashMap<u64, u64>,
    next_inode: AtomicU64,
}

impl InodeTable {
    /// Create a table holding only the root.
    pub fn new() -> Self {
        let table = Self {
            inode_to_path: DashMap::new(),
            path_to_inode: DashMap::new(),
            lookups: DashMap::new(),
            next_inode: AtomicU64::new(ROOT_INODE + 1),
        };
        table
            .inode_to_path
            .insert(ROOT_INODE, VIRTUAL_ROOT.to_string());
        table
            .path_to_inode
            .insert(VIRTUAL_ROOT.to_string(), ROOT_INODE);
        table
    }

    /// Inode for `path`, allocating one if needed.
    pub fn get_or_create(&self, path: &str) -> u64 {
        if let Some(inode) = self.path_to_inode.get(path) {
            return *inode;
        }

        match self.path_to_inode.entry(path.to_string()) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let inode = self.next_inode.fetch_add(1, Ordering::Relaxed);
                self.inode_to_path.insert(inode, path.to_string());
                entry.insert(inode);
                inode
            }
        }
    }

    /// Inode for `path`, counting one kernel reference to it.
    pub fn lookup(&self, path: &str) -> u64 {
        loop {
            let inode = self.get_or_create(path);
            let mut count = self.lookups.entry(inode).or_insert(0);
            if self.inode_to_path.contains_key(&inode) {
                *count += 1;
                return inode;
            }
            // Forgotten between allocation and counting.
            drop(count);
            self.lookups.remove_if(&inode, |_, n| *n == 0);
        }
    }

    /// Drop `nlookup` kernel references to `inode`, releasing it at zero.
    ///
    /// The root and inodes the kernel never looked up are left alone.
    pub fn forget(&self, inode: u64, nlookup: u64) {
        if inode == ROOT_INODE {
            return;
        }
        let Entry::Occupied(mut count) = self.lookups.entry(inode) else {
            return;
        };
        let remaining = count.get().saturating_sub(nlookup);
        if remaining > 0 {
            *count.get_mut() = remaining;
            return;
        }

        if let Some(path) = self.path(inode) {
            self.path_to_inode.remove_if(&path, |_, i| *i == inode);
        }
        self.inode_to_path.remove(&inode);
        count.remove();
    }

    /// Virtual path for `inode`.
    pub fn path(&self, inode: u64) -> Option<String> {
        self.inode_to_path.get(&inode).map(|p| p.value().clone())
    }

    /// Inode for `path` without allocating.
    pub fn inode(&self, path: &str) -> Option<u64> {
        self.path_to_inode.get(path).map(|i| *i)
    }

    /// Number of known inodes, including the root.
    pub fn len(&self) -> usize {
        self.inode_to_path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inode_to_path.is_empty()
    }
}

impl Default for InodeTable {
    fn default() -> Self {
        Self::new()
    }
}
