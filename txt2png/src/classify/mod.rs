//! Content classification for render eligibility.
//!
//! The overlay never inspects file content itself. It asks a
//! [`ContentClassifier`] for a coarse MIME-like category and grants a
//! synthetic image twin only to textual or ANSI-art content.
//!
//! Classifier failure is absorbed here: the entry is logged and treated as
//! a plain file, so a broken classifier can never abort a directory listing.

mod sniff;

pub use sniff::SniffClassifier;

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{trace, warn};

/// Category prefix reported for textual content.
pub const TEXT_MARKER: &str = "text";

/// Category prefix reported for ANSI art (CP437 bytes with escape codes,
/// which sniffers cannot tell apart from generic binary data).
pub const ANSI_MARKER: &str = "application/octet-stream";

/// Errors from a content classifier.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// The file could not be read for classification.
    #[error("cannot classify {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The classifier itself is not usable (e.g. database failed to load).
    #[error("content classifier unavailable: {0}")]
    Unavailable(String),
}

/// Capability that reports a MIME-like category for a real file.
pub trait ContentClassifier: Send + Sync {
    /// Classify the file at `path`, e.g. `"text/plain; charset=utf-8"`.
    fn classify(&self, path: &Path) -> Result<String, ClassifierError>;
}

/// Whether a category string marks render-eligible content.
pub fn is_eligible_category(category: &str) -> bool {
    category.starts_with(TEXT_MARKER) || category.starts_with(ANSI_MARKER)
}

/// Whether the real file at `path` should get a synthetic image twin.
///
/// Returns `false` (and logs) when the classifier fails.
pub fn is_render_eligible(classifier: &dyn ContentClassifier, path: &Path) -> bool {
    match classifier.classify(path) {
        Ok(category) => {
            let eligible = is_eligible_category(&category);
            trace!(path = %path.display(), category = %category, eligible, "Classified file");
            eligible
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Classifier failed, treating as plain file");
            false
        }
    }
}
