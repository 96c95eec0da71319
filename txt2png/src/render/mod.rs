//! Render pipeline.
//!
//! Turns a resolved real file into an encoded image held only in memory.
//! The raster engine sits behind the [`Renderer`] trait so tests can inject
//! deterministic doubles; [`AnsiRenderer`] is the default implementation.
//!
//! # Example
//!
//! ```
//! use txt2png::render::{AnsiRenderer, Renderer};
//!
//! let png = AnsiRenderer::new().render(b"hello\n").unwrap();
//! assert_eq!(&png[1..4], b"PNG");
//! ```

mod ansi;
mod canvas;
mod font;
mod palette;

pub use ansi::{AnsiRenderer, DEFAULT_COLUMNS};
pub use canvas::MAX_ROWS;
pub use font::{CELL_HEIGHT, CELL_WIDTH};

use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Errors from a renderer.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The input file could not be read.
    #[error("failed to read input: {0}")]
    Read(#[from] io::Error),

    /// There was nothing to render.
    #[error("input is empty")]
    EmptyInput,

    /// Image encoding failed.
    #[error("failed to encode image: {0}")]
    Encode(#[from] image::ImageError),
}

/// Capability that turns file bytes into an encoded image.
///
/// Implementations must be thread-safe; concurrent reads each render
/// independently.
pub trait Renderer: Send + Sync {
    /// Render `input` into an encoded image.
    fn render(&self, input: &[u8]) -> Result<Vec<u8>, RenderError>;
}

/// An encoded image produced for a single read and discarded after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBuffer {
    bytes: Vec<u8>,
}

impl RenderedBuffer {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Load `path` and render it entirely in memory.
///
/// Nothing is written to any filesystem. The file handle is released before
/// rendering starts.
pub fn render_file(renderer: &dyn Renderer, path: &Path) -> Result<RenderedBuffer, RenderError> {
    let input = fs::read(path)?;
    let bytes = renderer.render(&input)?;
    debug!(
        path = %path.display(),
        input_bytes = input.len(),
        output_bytes = bytes.len(),
        "Rendered file"
    );
    Ok(RenderedBuffer::new(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct EchoRenderer;

    impl Renderer for EchoRenderer {
        fn render(&self, input: &[u8]) -> Result<Vec<u8>, RenderError> {
            let mut out = b"IMG:".to_vec();
            out.extend_from_slice(input);
            Ok(out)
        }
    }

    #[test]
    fn test_render_file_uses_renderer() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("note.txt");
        fs::write(&path, "hi").unwrap();

        let buffer = render_file(&EchoRenderer, &path).unwrap();
        assert_eq!(buffer.as_bytes(), b"IMG:hi");
        assert_eq!(buffer.len(), 6);
    }

    #[test]
    fn test_render_file_missing_input() {
        let temp = TempDir::new().unwrap();
        let result = render_file(&EchoRenderer, &temp.path().join("absent.txt"));
        assert!(matches!(result, Err(RenderError::Read(_))));
    }

    #[test]
    fn test_render_file_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("note.txt");
        fs::write(&path, "hello").unwrap();

        render_file(&AnsiRenderer::new(), &path).unwrap();

        let entries: Vec<_> = fs::read_dir(temp.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_render_file_empty_input() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("empty.txt");
        fs::write(&path, "").unwrap();

        let result = render_file(&AnsiRenderer::new(), &path);
        assert!(matches!(result, Err(RenderError::EmptyInput)));
    }
}
