//! FUSE overlay mounting service.
//!
//! Validates the mount paths, builds the [`Overlay`] once from the mount
//! configuration and hands it to the fuse3 bridge.
//!
//! # Mounting Modes
//!
//! - **Async** ([`FuseMountService::mount_fuse3`]) - Returns a `MountHandle` for async contexts
//! - **Blocking** ([`FuseMountService::mount_fuse3_blocking`]) - Blocks until unmounted or
//!   interrupted (for the CLI)
//!
//! # Example
//!
//! ```ignore
//! use txt2png::service::{FuseMountConfig, FuseMountService};
//!
//! let config = FuseMountConfig::new().with_placeholder_size(256 * 1024);
//! FuseMountService::mount_fuse3_blocking(&config, "/srv/ansi", "/mnt/ansi", &runtime_handle)?;
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::info;

use crate::classify::{ContentClassifier, SniffClassifier};
use crate::fuse::{MountHandle, Txt2PngFS};
use crate::overlay::{BackingRoot, Overlay, DEFAULT_PLACEHOLDER_SIZE};
use crate::render::{AnsiRenderer, Renderer};

use super::error::ServiceError;

/// Configuration for mounting the overlay.
#[derive(Clone)]
pub struct FuseMountConfig {
    classifier: Arc<dyn ContentClassifier>,
    renderer: Arc<dyn Renderer>,
    placeholder_size: u64,
}

impl FuseMountConfig {
    /// Default capabilities: [`SniffClassifier`] and [`AnsiRenderer`].
    pub fn new() -> Self {
        Self {
            classifier: Arc::new(SniffClassifier::new()),
            renderer: Arc::new(AnsiRenderer::new()),
            placeholder_size: DEFAULT_PLACEHOLDER_SIZE,
        }
    }

    /// Set the size reported for synthetic entries.
    pub fn with_placeholder_size(mut self, size: u64) -> Self {
        self.placeholder_size = size;
        self
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn ContentClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn placeholder_size(&self) -> u64 {
        self.placeholder_size
    }
}

impl Default for FuseMountConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Service for mounting the overlay.
pub struct FuseMountService;

impl FuseMountService {
    /// Validate that the backing directory and mountpoint exist.
    ///
    /// # Returns
    ///
    /// Tuple of (source_path, mountpoint_path) on success.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::ConfigError` for an empty backing root and
    /// `ServiceError::IoError` if either path is missing or not a directory.
    pub fn validate_paths(
        source_dir: &str,
        mountpoint: &str,
    ) -> Result<(PathBuf, PathBuf), ServiceError> {
        if source_dir.is_empty() {
            return Err(ServiceError::ConfigError(
                "Backing directory must not be empty".to_string(),
            ));
        }

        let source_path = PathBuf::from(source_dir);
        if !source_path.is_dir() {
            return Err(ServiceError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Source directory does not exist: {}", source_dir),
            )));
        }

        let mount_path = PathBuf::from(mountpoint);
        if !mount_path.is_dir() {
            return Err(ServiceError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Mountpoint does not exist: {}", mountpoint),
            )));
        }

        Ok((source_path, mount_path))
    }

    /// Build the immutable overlay for `source_dir`.
    pub fn build_overlay(config: &FuseMountConfig, source_dir: &str) -> Result<Overlay, ServiceError> {
        let root = BackingRoot::new(source_dir)?;
        Ok(Overlay::new(
            root,
            Arc::clone(&config.classifier),
            Arc::clone(&config.renderer),
        )
        .with_placeholder_size(config.placeholder_size))
    }

    /// Mount the overlay (async).
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Source directory doesn't exist
    /// - Mountpoint directory doesn't exist
    /// - FUSE mount fails
    pub async fn mount_fuse3(
        config: &FuseMountConfig,
        source_dir: &str,
        mountpoint: &str,
    ) -> Result<MountHandle, ServiceError> {
        Self::validate_paths(source_dir, mountpoint)?;
        let overlay = Self::build_overlay(config, source_dir)?;

        info!(
            source = %source_dir,
            mountpoint = %mountpoint,
            placeholder_size = config.placeholder_size,
            "Mounting txt2png overlay"
        );

        Txt2PngFS::new(Arc::new(overlay))
            .mount(mountpoint)
            .await
            .map_err(|e| ServiceError::FuseError(e.to_string()))
    }

    /// Mount the overlay and block until it is unmounted externally or the
    /// process receives Ctrl+C, in which case it unmounts cleanly.
    pub fn mount_fuse3_blocking(
        config: &FuseMountConfig,
        source_dir: &str,
        mountpoint: &str,
        runtime_handle: &Handle,
    ) -> Result<(), ServiceError> {
        runtime_handle.block_on(async {
            let mut handle = Self::mount_fuse3(config, source_dir, mountpoint).await?;
            info!(mountpoint = %mountpoint, "Overlay mounted, press Ctrl+C to unmount");

            let interrupted = tokio::select! {
                result = &mut handle => {
                    result.map_err(|e| ServiceError::FuseError(e.to_string()))?;
                    false
                }
                _ = tokio::signal::ctrl_c() => true,
            };

            if interrupted {
                info!(mountpoint = %mountpoint, "Interrupted, unmounting");
                handle
                    .unmount()
                    .await
                    .map_err(|e| ServiceError::FuseError(e.to_string()))?;
            }

            info!(mountpoint = %mountpoint, "Overlay unmounted");
            Ok(())
        })
    }
}
