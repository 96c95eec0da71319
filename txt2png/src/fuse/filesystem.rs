//! fuse3 filesystem over the overlay.
//!
//! Callbacks translate inode numbers to virtual paths and hand the call to
//! [`Overlay`] on the blocking pool, since directory scans, classification
//! and rendering are synchronous. Overlay errors become errno replies.

use super::attributes::{entry_attr, file_type, TTL};
use super::inode::{InodeTable, ROOT_INODE};
use super::types::{Fuse3Error, Fuse3Result, MountHandle};
use crate::overlay::{join_virtual, split_virtual, OpenedEntry, Overlay, OverlayResult};
use bytes::Bytes;
use fuse3::raw::prelude::*;
use fuse3::raw::reply::{
    DirectoryEntry, DirectoryEntryPlus, ReplyAttr, ReplyCreated, ReplyData, ReplyDirectory,
    ReplyEntry, ReplyInit, ReplyOpen, ReplyStatFs, ReplyWrite,
};
use fuse3::raw::Filesystem;
use fuse3::{Errno, MountOptions, Result as Fuse3InternalResult, SetAttr};
use futures::stream::{self, BoxStream, StreamExt};
use std::ffi::{OsStr, OsString};
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, trace};

/// Open reply flag asking the kernel to bypass the page cache, so reads of
/// a synthetic file are not clamped to its placeholder size.
pub const FOPEN_DIRECT_IO: u32 = 1 << 0;

/// Read-only FUSE filesystem serving an [`Overlay`].
pub struct Txt2PngFS {
    overlay: Arc<Overlay>,
    inodes: InodeTable,
}

impl Txt2PngFS {
    pub fn new(overlay: Arc<Overlay>) -> Self {
        Self {
            overlay,
            inodes: InodeTable::new(),
        }
    }

    pub fn overlay(&self) -> &Arc<Overlay> {
        &self.overlay
    }

    /// Mount the filesystem at the given path.
    ///
    /// The returned handle must be awaited (or held) to keep the mount alive.
    pub async fn mount(self, mountpoint: &str) -> Fuse3Result<MountHandle> {
        let mut mount_options = MountOptions::default();
        mount_options.read_only(true);
        mount_options.force_readdir_plus(false);
        mount_options.no_open_dir_support(true);

        let mount_path = PathBuf::from(mountpoint);

        #[cfg(target_os = "linux")]
        let handle = fuse3::raw::Session::new(mount_options)
            .mount_with_unprivileged(self, mount_path)
            .await
            .map_err(|e| Fuse3Error::MountFailed(e.to_string()))?;

        #[cfg(not(target_os = "linux"))]
        let handle = fuse3::raw::Session::new(mount_options)
            .mount(self, mount_path)
            .await
            .map_err(|e| Fuse3Error::MountFailed(e.to_string()))?;

        Ok(MountHandle::new(handle))
    }

    /// Run an overlay operation on the blocking pool.
    async fn blocking<T, F>(&self, op: F) -> Fuse3InternalResult<T>
    where
        F: FnOnce(&Overlay) -> OverlayResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let overlay = Arc::clone(&self.overlay);
        match tokio::task::spawn_blocking(move || op(&overlay)).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                debug!(error = %e, errno = e.errno(), "Overlay operation failed");
                Err(Errno::from(e.errno()))
            }
            Err(e) => {
                error!(error = %e, "Overlay task aborted");
                Err(Errno::from(libc::EIO))
            }
        }
    }

    fn path_of(&self, ino: u64) -> Fuse3InternalResult<String> {
        self.inodes.path(ino).ok_or_else(|| Errno::from(libc::ENOENT))
    }

    fn refused(&self, operation: &str) -> Errno {
        Errno::from(self.overlay.refuse_mutation(operation).errno())
    }

    /// Attribute query for `name` inside directory inode `parent`.
    pub async fn lookup_entry(&self, parent: u64, name: &OsStr) -> Fuse3InternalResult<ReplyEntry> {
        let parent_path = self.path_of(parent)?;
        let name = name.to_str().ok_or_else(|| Errno::from(libc::ENOENT))?;
        let child = join_virtual(&parent_path, name).map_err(|e| Errno::from(e.errno()))?;

        let query = child.clone();
        let attributes = self.blocking(move |o| o.getattr(&query)).await?;
        let ino = self.inodes.lookup(&child);

        Ok(ReplyEntry {
            ttl: TTL,
            attr: entry_attr(ino, &attributes),
            generation: 0,
        })
    }

    /// Attribute query for a known inode.
    pub async fn attr_of(&self, ino: u64) -> Fuse3InternalResult<ReplyAttr> {
        let path = self.path_of(ino)?;
        let attributes = self.blocking(move |o| o.getattr(&path)).await?;
        Ok(ReplyAttr {
            ttl: TTL,
            attr: entry_attr(ino, &attributes),
        })
    }

    /// Open validation; returns the reply flags.
    pub async fn open_flags(&self, ino: u64, flags: u32) -> Fuse3InternalResult<u32> {
        let path = self.path_of(ino)?;
        let opened = self
            .blocking(move |o| o.open(&path, flags as i32))
            .await?;
        Ok(match opened {
            OpenedEntry::Synthetic => FOPEN_DIRECT_IO,
            OpenedEntry::PassThrough => 0,
        })
    }

    /// Read a window of a file.
    pub async fn read_data(&self, ino: u64, offset: u64, size: u32) -> Fuse3InternalResult<Bytes> {
        let path = self.path_of(ino)?;
        let data = self
            .blocking(move |o| o.read(&path, offset, size as usize))
            .await?;
        Ok(Bytes::from(data))
    }

    /// Full listing of a directory inode, including `.` and `..`.
    pub async fn directory_entries(&self, ino: u64) -> Fuse3InternalResult<Vec<DirectoryEntry>> {
        let path = self.path_of(ino)?;
        let dir = path.clone();
        let listing = self.blocking(move |o| o.list(&dir)).await?;

        let parent_inode = if ino == ROOT_INODE {
            ROOT_INODE
        } else {
            let (parent, _) = split_virtual(&path);
            self.inodes.inode(parent).unwrap_or(ROOT_INODE)
        };

        let mut entries = Vec::with_capacity(listing.len() + 2);
        entries.push(DirectoryEntry {
            inode: ino,
            kind: FileType::Directory,
            name: OsString::from("."),
            offset: 1,
        });
        entries.push(DirectoryEntry {
            inode: parent_inode,
            kind: FileType::Directory,
            name: OsString::from(".."),
            offset: 2,
        });

        for entry in listing {
            let Ok(child) = join_virtual(&path, &entry.name) else {
                continue;
            };
            let kind = entry.file_type.map(file_type).unwrap_or(FileType::RegularFile);
            entries.push(DirectoryEntry {
                inode: self.inodes.get_or_create(&child),
                kind,
                name: OsString::from(entry.name),
                offset: entries.len() as i64 + 1,
            });
        }

        Ok(entries)
    }
}

impl Filesystem for Txt2PngFS {
    type DirEntryStream<'a>
        = BoxStream<'a, Fuse3InternalResult<DirectoryEntry>>
    where
        Self: 'a;
    type DirEntryPlusStream<'a>
        = BoxStream<'a, Fuse3InternalResult<DirectoryEntryPlus>>
    where
        Self: 'a;

    async fn init(&self, _req: Request) -> Fuse3InternalResult<ReplyInit> {
        debug!(root = %self.overlay.root().as_str(), "fuse3: init");
        Ok(ReplyInit {
            max_write: NonZeroU32::MIN,
        })
    }

    async fn destroy(&self, _req: Request) {
        debug!("fuse3: destroy");
    }

    async fn lookup(
        &self,
        _req: Request,
        parent: u64,
        name: &OsStr,
    ) -> Fuse3InternalResult<ReplyEntry> {
        trace!(parent = parent, name = ?name, "fuse3: lookup");
        self.lookup_entry(parent, name).await
    }

    async fn forget(&self, _req: Request, inode: u64, nlookup: u64) {
        trace!(ino = inode, nlookup = nlookup, "fuse3: forget");
        self.inodes.forget(inode, nlookup);
    }

    async fn batch_forget(&self, _req: Request, inodes: &[u64]) {
        trace!(count = inodes.len(), "fuse3: batch_forget");
        // fuse3 0.8 drops the per-inode lookup counts; the kernel only batch
        // forgets inodes it is evicting, so release each one completely.
        for &inode in inodes {
            self.inodes.forget(inode, u64::MAX);
        }
    }

    async fn getattr(
        &self,
        _req: Request,
        ino: u64,
        _fh: Option<u64>,
        _flags: u32,
    ) -> Fuse3InternalResult<ReplyAttr> {
        trace!(ino = ino, "fuse3: getattr");
        self.attr_of(ino).await
    }

    async fn open(&self, _req: Request, ino: u64, flags: u32) -> Fuse3InternalResult<ReplyOpen> {
        trace!(ino = ino, flags = flags, "fuse3: open");
        let flags = self.open_flags(ino, flags).await?;
        Ok(ReplyOpen { fh: 0, flags })
    }

    async fn read(
        &self,
        _req: Request,
        ino: u64,
        _fh: u64,
        offset: u64,
        size: u32,
    ) -> Fuse3InternalResult<ReplyData> {
        trace!(ino = ino, offset = offset, size = size, "fuse3: read");
        let data = self.read_data(ino, offset, size).await?;
        Ok(ReplyData { data })
    }

    async fn readdir(
        &self,
        _req: Request,
        ino: u64,
        _fh: u64,
        offset: i64,
    ) -> Fuse3InternalResult<ReplyDirectory<Self::DirEntryStream<'_>>> {
        trace!(ino = ino, offset = offset, "fuse3: readdir");
        let entries: Vec<_> = self
            .directory_entries(ino)
            .await?
            .into_iter()
            .skip(offset.max(0) as usize)
            .map(Ok)
            .collect();

        Ok(ReplyDirectory {
            entries: stream::iter(entries).boxed(),
        })
    }

    async fn opendir(
        &self,
        _req: Request,
        ino: u64,
        _flags: u32,
    ) -> Fuse3InternalResult<ReplyOpen> {
        trace!(ino = ino, "fuse3: opendir");
        Ok(ReplyOpen { fh: 0, flags: 0 })
    }

    async fn access(&self, _req: Request, ino: u64, mask: u32) -> Fuse3InternalResult<()> {
        if mask & libc::W_OK as u32 != 0 {
            trace!(ino = ino, "fuse3: access with write intent");
            return Err(self.refused("access"));
        }
        Ok(())
    }

    async fn flush(
        &self,
        _req: Request,
        _ino: u64,
        _fh: u64,
        _lock_owner: u64,
    ) -> Fuse3InternalResult<()> {
        Ok(())
    }

    async fn fsync(
        &self,
        _req: Request,
        _ino: u64,
        _fh: u64,
        _datasync: bool,
    ) -> Fuse3InternalResult<()> {
        Ok(())
    }

    async fn statfs(&self, _req: Request, _ino: u64) -> Fuse3InternalResult<ReplyStatFs> {
        Ok(ReplyStatFs {
            blocks: 1_000_000,
            bfree: 0,
            bavail: 0,
            files: 100_000,
            ffree: 0,
            bsize: 4096,
            namelen: 255,
            frsize: 4096,
        })
    }

    async fn setattr(
        &self,
        _req: Request,
        _ino: u64,
        _fh: Option<u64>,
        _set_attr: SetAttr,
    ) -> Fuse3InternalResult<ReplyAttr> {
        Err(self.refused("setattr"))
    }

    async fn mknod(
        &self,
        _req: Request,
        _parent: u64,
        _name: &OsStr,
        _mode: u32,
        _rdev: u32,
    ) -> Fuse3InternalResult<ReplyEntry> {
        Err(self.refused("mknod"))
    }

    async fn mkdir(
        &self,
        _req: Request,
        _parent: u64,
        _name: &OsStr,
        _mode: u32,
        _umask: u32,
    ) -> Fuse3InternalResult<ReplyEntry> {
        Err(self.refused("mkdir"))
    }

    async fn unlink(&self, _req: Request, _parent: u64, _name: &OsStr) -> Fuse3InternalResult<()> {
        Err(self.refused("unlink"))
    }

    async fn rmdir(&self, _req: Request, _parent: u64, _name: &OsStr) -> Fuse3InternalResult<()> {
        Err(self.refused("rmdir"))
    }

    async fn symlink(
        &self,
        _req: Request,
        _parent: u64,
        _name: &OsStr,
        _link: &OsStr,
    ) -> Fuse3InternalResult<ReplyEntry> {
        Err(self.refused("symlink"))
    }

    async fn rename(
        &self,
        _req: Request,
        _parent: u64,
        _name: &OsStr,
        _new_parent: u64,
        _new_name: &OsStr,
    ) -> Fuse3InternalResult<()> {
        Err(self.refused("rename"))
    }

    async fn link(
        &self,
        _req: Request,
        _ino: u64,
        _new_parent: u64,
        _new_name: &OsStr,
    ) -> Fuse3InternalResult<ReplyEntry> {
        Err(self.refused("link"))
    }

    #[allow(clippy::too_many_arguments)]
    async fn write(
        &self,
        _req: Request,
        _ino: u64,
        _fh: u64,
        _offset: u64,
        _data: &[u8],
        _write_flags: u32,
        _flags: u32,
    ) -> Fuse3InternalResult<ReplyWrite> {
        Err(self.refused("write"))
    }

    async fn create(
        &self,
        _req: Request,
        _parent: u64,
        _name: &OsStr,
        _mode: u32,
        _flags: u32,
    ) -> Fuse3InternalResult<ReplyCreated> {
        Err(self.refused("create"))
    }

    async fn setxattr(
        &self,
        _req: Request,
        _ino: u64,
        _name: &OsStr,
        _value: &[u8],
        _flags: u32,
        _position: u32,
    ) -> Fuse3InternalResult<()> {
        Err(self.refused("setxattr"))
    }

    async fn removexattr(
        &self,
        _req: Request,
        _ino: u64,
        _name: &OsStr,
    ) -> Fuse3InternalResult<()> {
        Err(self.refused("removexattr"))
    }
}
