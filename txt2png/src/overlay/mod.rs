//! Read-only overlay with synthetic PNG twins of text files.
//!
//! [`Overlay`] is the operation dispatcher. It composes the path translator,
//! name codec, lister, resolver, render pipeline and read-window server into
//! the four supported operations (attribute query, listing, open, read) and
//! refuses every mutation.
//!
//! Every operation is self-contained: nothing is cached between calls and
//! each read of a synthetic file resolves and renders afresh. The only state
//! is the immutable configuration built at mount time.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use txt2png::classify::SniffClassifier;
//! use txt2png::overlay::{BackingRoot, Overlay};
//! use txt2png::render::AnsiRenderer;
//!
//! let root = BackingRoot::new("/srv/notes")?;
//! let overlay = Overlay::new(root, Arc::new(SniffClassifier::new()), Arc::new(AnsiRenderer::new()));
//!
//! for entry in overlay.list("/")? {
//!     println!("{}", entry.name);
//! }
//! let png = overlay.read("/todo.png", 0, 1 << 20)?;
//! # Ok::<(), txt2png::overlay::OverlayError>(())
//! ```

mod error;
mod listing;
pub mod name;
mod passthrough;
mod path;
mod resolve;
pub mod window;

pub use error::{OverlayError, OverlayResult};
pub use listing::{list_directory, EntryKind, ListedEntry};
pub use path::{join_virtual, split_virtual, BackingRoot, VIRTUAL_ROOT};
pub use resolve::resolve;

use std::fs::Metadata;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::classify::{is_render_eligible, ContentClassifier};
use crate::render::{render_file, RenderedBuffer, Renderer};

/// Size reported for synthetic entries before they are rendered.
pub const DEFAULT_PLACEHOLDER_SIZE: u64 = 100_000;

/// Result of an attribute query.
#[derive(Debug, Clone)]
pub enum EntryAttributes {
    /// A synthetic image; `size` is the placeholder, not the rendered length.
    Synthetic { size: u64 },
    /// A pass-through entry with its backing attributes.
    Real(Metadata),
}

/// What an open call validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenedEntry {
    Synthetic,
    PassThrough,
}

/// Whether open flags carry any write, create, truncate or append intent.
pub fn has_write_intent(flags: i32) -> bool {
    let access = flags & libc::O_ACCMODE;
    access == libc::O_WRONLY
        || access == libc::O_RDWR
        || flags & (libc::O_CREAT | libc::O_EXCL | libc::O_TRUNC | libc::O_APPEND) != 0
}

/// The operation dispatcher.
pub struct Overlay {
    root: BackingRoot,
    classifier: Arc<dyn ContentClassifier>,
    renderer: Arc<dyn Renderer>,
    placeholder_size: u64,
}

impl Overlay {
    /// Create an overlay over `root` with injected capabilities.
    pub fn new(
        root: BackingRoot,
        classifier: Arc<dyn ContentClassifier>,
        renderer: Arc<dyn Renderer>,
    ) -> Self {
        Self {
            root,
            classifier,
            renderer,
            placeholder_size: DEFAULT_PLACEHOLDER_SIZE,
        }
    }

    /// Set the size reported for synthetic entries.
    pub fn with_placeholder_size(mut self, size: u64) -> Self {
        self.placeholder_size = size;
        self
    }

    pub fn root(&self) -> &BackingRoot {
        &self.root
    }

    pub fn placeholder_size(&self) -> u64 {
        self.placeholder_size
    }

    /// Whether `virtual_path` names a synthetic entry.
    ///
    /// True when the last component ends with `.png` and the backing path is
    /// neither a directory nor a file that would pass through. A text file
    /// literally named `*.png` is its own synthetic twin.
    pub fn is_synthetic(&self, virtual_path: &str) -> bool {
        let (_, file_name) = split_virtual(virtual_path);
        if !name::has_synthetic_suffix(file_name) {
            return false;
        }

        let real = self.root.to_real(virtual_path);
        match passthrough::stat(&real) {
            Ok(meta) if meta.is_file() => is_render_eligible(self.classifier.as_ref(), &real),
            Ok(_) => false,
            Err(_) => true,
        }
    }

    /// Attribute query.
    ///
    /// Synthetic entries report a regular file with the placeholder size and
    /// are never resolved here. Everything else reports the backing
    /// attributes, with the backing errno on failure.
    pub fn getattr(&self, virtual_path: &str) -> OverlayResult<EntryAttributes> {
        if self.is_synthetic(virtual_path) {
            return Ok(EntryAttributes::Synthetic {
                size: self.placeholder_size,
            });
        }

        let real = self.root.to_real(virtual_path);
        passthrough::stat(&real)
            .map(EntryAttributes::Real)
            .map_err(|e| OverlayError::backing(real, e))
    }

    /// Directory listing.
    pub fn list(&self, virtual_dir: &str) -> OverlayResult<Vec<ListedEntry>> {
        list_directory(&self.root, self.classifier.as_ref(), virtual_dir)
    }

    /// Open validation. No handle is retained.
    ///
    /// # Errors
    ///
    /// [`OverlayError::ReadOnlyViolation`] for any write intent, checked
    /// before the path is looked at; otherwise the resolution or backing
    /// error.
    pub fn open(&self, virtual_path: &str, flags: i32) -> OverlayResult<OpenedEntry> {
        if has_write_intent(flags) {
            debug!(path = %virtual_path, flags, "Refusing open with write intent");
            return Err(OverlayError::ReadOnlyViolation);
        }

        if self.is_synthetic(virtual_path) {
            self.resolve_synthetic(virtual_path)?;
            return Ok(OpenedEntry::Synthetic);
        }

        let real = self.root.to_real(virtual_path);
        passthrough::stat(&real).map_err(|e| OverlayError::backing(real, e))?;
        Ok(OpenedEntry::PassThrough)
    }

    /// Read `size` bytes at `offset`.
    ///
    /// Synthetic paths are resolved, rendered and sliced on every call.
    pub fn read(&self, virtual_path: &str, offset: u64, size: usize) -> OverlayResult<Vec<u8>> {
        if self.is_synthetic(virtual_path) {
            let buffer = self.render(virtual_path)?;
            return Ok(window::slice(buffer.as_bytes(), offset, size).to_vec());
        }

        let real = self.root.to_real(virtual_path);
        passthrough::read_range(&real, offset, size).map_err(|e| OverlayError::backing(real, e))
    }

    /// Resolve and render a synthetic path into a fresh buffer.
    pub fn render(&self, virtual_path: &str) -> OverlayResult<RenderedBuffer> {
        let real = self.resolve_synthetic(virtual_path)?;
        self.render_real(&real)
    }

    /// Render a real file through the configured renderer.
    pub fn render_real(&self, real: &Path) -> OverlayResult<RenderedBuffer> {
        render_file(self.renderer.as_ref(), real).map_err(|source| {
            warn!(path = %real.display(), error = %source, "Render failed");
            OverlayError::Render {
                path: real.to_path_buf(),
                source,
            }
        })
    }

    /// Uniform answer to every mutation operation.
    pub fn refuse_mutation(&self, operation: &str) -> OverlayError {
        debug!(operation, "Refusing mutation on read-only overlay");
        OverlayError::ReadOnlyViolation
    }

    fn resolve_synthetic(&self, virtual_path: &str) -> OverlayResult<std::path::PathBuf> {
        let (dir, file_name) = split_virtual(virtual_path);
        resolve(&self.root, self.classifier.as_ref(), dir, file_name)
    }
}

impl std::fmt::Debug for Overlay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Overlay")
            .field("root", &self.root)
            .field("placeholder_size", &self.placeholder_size)
            .finish_non_exhaustive()
    }
}
