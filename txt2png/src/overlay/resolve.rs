//! Entry resolver: synthetic name back to exactly one real file.

use std::fs;
use std::path::PathBuf;

use tracing::{debug, trace};

use super::error::{OverlayError, OverlayResult};
use super::name;
use super::path::{join_virtual, BackingRoot};
use crate::classify::{is_render_eligible, ContentClassifier};

/// Resolve `synthetic_name` inside `virtual_dir` to a real file.
///
/// Scans the backing directory in enumeration order and returns the first
/// regular file whose name encodes to `synthetic_name` and which is
/// render-eligible, so resolution agrees with what a listing advertised.
/// When several real files share a stem the first one enumerated wins.
///
/// # Errors
///
/// Returns [`OverlayError::NotFound`] if the directory cannot be opened or
/// no entry qualifies.
pub fn resolve(
    root: &BackingRoot,
    classifier: &dyn ContentClassifier,
    virtual_dir: &str,
    synthetic_name: &str,
) -> OverlayResult<PathBuf> {
    let not_found = || {
        OverlayError::NotFound(
            join_virtual(virtual_dir, synthetic_name).unwrap_or_else(|_| synthetic_name.to_string()),
        )
    };

    let real_dir = root.to_real(virtual_dir);
    let reader = match fs::read_dir(&real_dir) {
        Ok(reader) => reader,
        Err(e) => {
            debug!(dir = %real_dir.display(), error = %e, "Cannot scan directory for resolution");
            return Err(not_found());
        }
    };

    for entry in reader.flatten() {
        let file_name = entry.file_name();
        let Some(real_name) = file_name.to_str() else {
            continue;
        };
        if !name::matches(real_name, synthetic_name) {
            continue;
        }

        let entry_path = entry.path();
        let is_file = fs::metadata(&entry_path).is_ok_and(|m| m.is_file());
        if is_file && is_render_eligible(classifier, &entry_path) {
            trace!(
                synthetic = %synthetic_name,
                real = %entry_path.display(),
                "Resolved synthetic name"
            );
            return Ok(entry_path);
        }
    }

    Err(not_found())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ClassifierError;
    use std::path::Path;
    use tempfile::TempDir;

    struct PrefixClassifier;

    impl ContentClassifier for PrefixClassifier {
        fn classify(&self, path: &Path) -> Result<String, ClassifierError> {
            let data = fs::read(path).map_err(|source| ClassifierError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            Ok(if data.starts_with(b"TEXT") {
                "text/plain".to_string()
            } else {
                "image/jpeg".to_string()
            })
        }
    }

    fn setup() -> (TempDir, BackingRoot) {
        let temp = TempDir::new().unwrap();
        let root = BackingRoot::new(temp.path().to_str().unwrap()).unwrap();
        (temp, root)
    }

    #[test]
    fn test_single_match_resolves() {
        let (temp, root) = setup();
        fs::write(temp.path().join("note.txt"), "TEXT").unwrap();

        let real = resolve(&root, &PrefixClassifier, "/", "note.png").unwrap();
        assert_eq!(real, temp.path().join("note.txt"));
    }

    #[test]
    fn test_no_match_is_not_found() {
        let (temp, root) = setup();
        fs::write(temp.path().join("other.txt"), "TEXT").unwrap();

        let err = resolve(&root, &PrefixClassifier, "/", "note.png").unwrap_err();
        assert!(matches!(err, OverlayError::NotFound(ref p) if p == "/note.png"));
        assert_eq!(err.errno(), libc::ENOENT);
    }

    #[test]
    fn test_missing_directory_is_not_found() {
        let (_temp, root) = setup();
        let err = resolve(&root, &PrefixClassifier, "/absent", "note.png").unwrap_err();
        assert!(matches!(err, OverlayError::NotFound(_)));
    }

    #[test]
    fn test_prefix_names_do_not_match() {
        let (temp, root) = setup();
        fs::write(temp.path().join("notebook.txt"), "TEXT").unwrap();
        fs::write(temp.path().join("note.txt.bak"), "TEXT").unwrap();

        assert!(resolve(&root, &PrefixClassifier, "/", "note.png").is_err());
    }

    #[test]
    fn test_non_eligible_match_is_skipped() {
        let (temp, root) = setup();
        fs::write(temp.path().join("note.bin"), "binary").unwrap();

        assert!(resolve(&root, &PrefixClassifier, "/", "note.png").is_err());
    }

    #[test]
    fn test_directory_match_is_skipped() {
        let (temp, root) = setup();
        fs::create_dir(temp.path().join("note.d")).unwrap();

        assert!(resolve(&root, &PrefixClassifier, "/", "note.png").is_err());
    }

    #[test]
    fn test_collision_returns_one_of_the_candidates() {
        let (temp, root) = setup();
        fs::write(temp.path().join("note.txt"), "TEXT one").unwrap();
        fs::write(temp.path().join("note.asc"), "TEXT two").unwrap();

        let real = resolve(&root, &PrefixClassifier, "/", "note.png").unwrap();
        assert!(real == temp.path().join("note.txt") || real == temp.path().join("note.asc"));
    }

    #[test]
    fn test_resolves_in_subdirectory() {
        let (temp, root) = setup();
        fs::create_dir_all(temp.path().join("a/b")).unwrap();
        fs::write(temp.path().join("a/b/readme"), "TEXT").unwrap();

        let real = resolve(&root, &PrefixClassifier, "/a/b", "readme.png").unwrap();
        assert_eq!(real, temp.path().join("a/b/readme"));
    }
}
