//! Mount orchestration for the overlay.
//!
//! Wires the default capabilities and the mount configuration into an
//! [`Overlay`](crate::overlay::Overlay) and mounts it through the fuse3
//! bridge.

mod error;
mod fuse_mount;

pub use error::ServiceError;
pub use fuse_mount::{FuseMountConfig, FuseMountService};
