//! FUSE attribute construction.

use std::fs::Metadata;
use std::fs;
use std::os::unix::fs::{FileTypeExt, MetadataExt};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use fuse3::raw::reply::FileAttr;
use fuse3::FileType;

use crate::overlay::EntryAttributes;

/// Time-to-live for kernel attribute and entry caching.
pub const TTL: Duration = Duration::from_secs(1);

/// Block size reported for every entry.
pub const BLOCK_SIZE: u32 = 4096;

/// Permission bits that grant write access.
const WRITE_BITS: u32 = 0o222;

/// Build the FUSE attributes for an overlay attribute-query result.
pub fn entry_attr(ino: u64, attributes: &EntryAttributes) -> FileAttr {
    match attributes {
        EntryAttributes::Synthetic { size } => synthetic_attr(ino, *size),
        EntryAttributes::Real(metadata) => metadata_to_attr(ino, metadata),
    }
}

/// Attributes of a pass-through entry, with every write bit cleared.
pub fn metadata_to_attr(ino: u64, metadata: &Metadata) -> FileAttr {
    FileAttr {
        ino,
        size: metadata.len(),
        blocks: metadata.blocks(),
        atime: metadata.accessed().unwrap_or(UNIX_EPOCH).into(),
        mtime: metadata.modified().unwrap_or(UNIX_EPOCH).into(),
        ctime: (UNIX_EPOCH + Duration::from_secs(metadata.ctime().max(0) as u64)).into(),
        kind: file_type(metadata.file_type()),
        perm: (metadata.mode() & 0o7777 & !WRITE_BITS) as u16,
        nlink: metadata.nlink() as u32,
        uid: metadata.uid(),
        gid: metadata.gid(),
        rdev: metadata.rdev() as u32,
        blksize: BLOCK_SIZE,
    }
}

/// Attributes of a synthetic image: a read-only regular file owned by the
/// mounting user.
pub fn synthetic_attr(ino: u64, size: u64) -> FileAttr {
    let now = SystemTime::now().into();

    FileAttr {
        ino,
        size,
        blocks: size.div_ceil(BLOCK_SIZE as u64),
        atime: now,
        mtime: now,
        ctime: now,
        kind: FileType::RegularFile,
        perm: 0o444,
        nlink: 1,
        uid: unsafe { libc::getuid() },
        gid: unsafe { libc::getgid() },
        rdev: 0,
        blksize: BLOCK_SIZE,
    }
}

/// FUSE file type of a backing entry.
pub fn file_type(ft: fs::FileType) -> FileType {
    if ft.is_dir() {
        FileType::Directory
    } else if ft.is_symlink() {
        FileType::Symlink
    } else if ft.is_fifo() {
        FileType::NamedPipe
    } else if ft.is_socket() {
        FileType::Socket
    } else if ft.is_char_device() {
        FileType::CharDevice
    } else if ft.is_block_device() {
        FileType::BlockDevice
    } else {
        FileType::RegularFile
    }
}
