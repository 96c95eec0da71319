//! FUSE bridge for the overlay.
//!
//! Exposes an [`Overlay`](crate::overlay::Overlay) to the kernel through the
//! async multi-threaded fuse3 raw API. The kernel speaks inode numbers; the
//! bridge maps them to virtual paths and forwards every supported call to
//! the overlay on Tokio's blocking pool.
//!
//! ```text
//! kernel                     Tokio runtime (multi-threaded)
//!    │                              │
//!    ├── read(note.png) ───────────►├── spawn_blocking ──► resolve → render → slice
//!    ├── read(art.png) ────────────►├── spawn_blocking ──► resolve → render → slice
//!    ├── readdir(/) ───────────────►├── spawn_blocking ──► list
//!    │◄── replies ──────────────────┤
//! ```
//!
//! Mutations are answered with `EROFS`; the session is also mounted
//! read-only.

mod attributes;
mod filesystem;
mod inode;
mod types;

pub use attributes::{entry_attr, metadata_to_attr, synthetic_attr, TTL};
pub use filesystem::{Txt2PngFS, FOPEN_DIRECT_IO};
pub use inode::{InodeTable, ROOT_INODE};
pub use types::{Fuse3Error, Fuse3Result, MountHandle};
