//! txt2png - text and ANSI art as PNG images, through a read-only FUSE overlay
//!
//! The overlay mirrors a backing directory. Every text or ANSI art file
//! additionally appears under its stem with a `.png` extension; reading that
//! virtual file renders the source file to PNG on demand. Nothing is cached and
//! nothing is ever written to the backing tree.
//!
//! # Layers
//!
//! - [`overlay`] - path translation, naming, listing, resolution and the
//!   operation dispatcher ([`overlay::Overlay`])
//! - [`classify`] - content classification capability and default sniffer
//! - [`render`] - renderer capability, render pipeline and the ANSI renderer
//! - [`fuse`] - fuse3 bridge exposing an `Overlay` to the kernel
//! - [`service`] - mount orchestration
//! - [`config`] / [`logging`] - ambient configuration and tracing setup
//!
//! ```ignore
//! use txt2png::service::{FuseMountConfig, FuseMountService};
//!
//! let handle = FuseMountService::mount_fuse3(&FuseMountConfig::new(), "/srv/art", "/mnt/art").await?;
//! handle.await?;
//! ```

pub mod classify;
pub mod config;
pub mod fuse;
pub mod logging;
pub mod overlay;
pub mod render;
pub mod service;

/// Version of the txt2png library and CLI.
///
/// This is synchronized across all components in the workspace.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
