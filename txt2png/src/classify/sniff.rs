//! Default content classifier based on leading-byte sniffing.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use content_inspector::ContentType;

use super::{ClassifierError, ContentClassifier, ANSI_MARKER};

/// Number of leading bytes inspected per file.
pub const SNIFF_LEN: u64 = 8 * 1024;

/// Category reported for empty files.
pub const EMPTY_CATEGORY: &str = "inode/x-empty";

/// Classifier that inspects the first [`SNIFF_LEN`] bytes of a file.
///
/// - empty files report `inode/x-empty`
/// - recognised binary signatures report their MIME type (`image/jpeg`, ...)
/// - textual content reports `text/plain; charset=...`
/// - anything else reports `application/octet-stream`
///
/// The file handle is opened and closed within each call.
#[derive(Debug, Clone, Copy, Default)]
pub struct SniffClassifier;

impl SniffClassifier {
    /// Create a new sniffing classifier.
    pub fn new() -> Self {
        Self
    }

    /// Classify an in-memory prefix of a file.
    pub fn classify_bytes(head: &[u8]) -> String {
        if head.is_empty() {
            return EMPTY_CATEGORY.to_string();
        }

        if let Some(kind) = infer::get(head) {
            return kind.mime_type().to_string();
        }

        match text_charset(content_inspector::inspect(head)) {
            Some(charset) => format!("text/plain; charset={}", charset),
            None => ANSI_MARKER.to_string(),
        }
    }
}

impl ContentClassifier for SniffClassifier {
    fn classify(&self, path: &Path) -> Result<String, ClassifierError> {
        let io_err = |source| ClassifierError::Io {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(io_err)?;
        let mut head = Vec::with_capacity(SNIFF_LEN as usize);
        file.take(SNIFF_LEN).read_to_end(&mut head).map_err(io_err)?;

        Ok(Self::classify_bytes(&head))
    }
}

fn text_charset(content: ContentType) -> Option<&'static str> {
    match content {
        ContentType::UTF_8 | ContentType::UTF_8_BOM => Some("utf-8"),
        ContentType::UTF_16LE => Some("utf-16le"),
        ContentType::UTF_16BE => Some("utf-16be"),
        ContentType::UTF_32LE => Some("utf-32le"),
        ContentType::UTF_32BE => Some("utf-32be"),
        ContentType::BINARY => None,
    }
}
