//! Directory lister.
//!
//! Synthesizes the overlay's view of one backing directory. Directories and
//! non-eligible files pass through under their real names; render-eligible
//! files are shown only under their synthetic name.

use std::collections::HashSet;
use std::fs::{self, FileType, Metadata};

use tracing::{debug, trace};

use super::error::{OverlayError, OverlayResult};
use super::name;
use super::path::BackingRoot;
use crate::classify::{is_render_eligible, ContentClassifier};

/// Derived kind of a listed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    PlainFile,
    RenderEligible,
}

/// One entry of a synthesized listing.
#[derive(Debug, Clone)]
pub struct ListedEntry {
    /// Display name (synthetic for render-eligible files).
    pub name: String,
    pub kind: EntryKind,
    /// Backing file type, following symlinks; the link itself when dangling.
    pub file_type: Option<FileType>,
    /// Full attributes for directories; deferred to a later attribute
    /// query for everything else.
    pub attr: Option<Metadata>,
}

impl ListedEntry {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// List the backing directory behind `virtual_dir`.
///
/// Enumeration order is whatever the backing directory yields. A synthetic
/// name that collides with a pass-through name in the same directory is
/// dropped, and a synthetic name shared by several real files is listed once.
/// Names that are not valid UTF-8 are skipped. Does not recurse.
///
/// # Errors
///
/// Returns [`OverlayError::BackingUnavailable`] if the directory cannot be
/// opened.
pub fn list_directory(
    root: &BackingRoot,
    classifier: &dyn ContentClassifier,
    virtual_dir: &str,
) -> OverlayResult<Vec<ListedEntry>> {
    let real_dir = root.to_real(virtual_dir);
    let reader = fs::read_dir(&real_dir).map_err(|e| OverlayError::backing(&real_dir, e))?;

    let mut scanned = Vec::new();
    for entry in reader {
        let entry = entry.map_err(|e| OverlayError::backing(&real_dir, e))?;
        let real_name = match entry.file_name().into_string() {
            Ok(real_name) => real_name,
            Err(raw) => {
                debug!(dir = %real_dir.display(), name = ?raw, "Skipping non-UTF-8 entry");
                continue;
            }
        };

        let entry_path = entry.path();
        let scanned_entry = match fs::metadata(&entry_path) {
            Ok(meta) if meta.is_dir() => ListedEntry {
                name: real_name,
                kind: EntryKind::Directory,
                file_type: Some(meta.file_type()),
                attr: Some(meta),
            },
            // Only regular files are classified; opening a FIFO would block.
            Ok(meta) if meta.is_file() && is_render_eligible(classifier, &entry_path) => {
                ListedEntry {
                    name: name::encode(&real_name),
                    kind: EntryKind::RenderEligible,
                    file_type: Some(meta.file_type()),
                    attr: None,
                }
            }
            Ok(meta) => ListedEntry {
                name: real_name,
                kind: EntryKind::PlainFile,
                file_type: Some(meta.file_type()),
                attr: None,
            },
            // Dangling symlinks pass through; their attribute query reports
            // the backing error.
            Err(_) => ListedEntry {
                name: real_name,
                kind: EntryKind::PlainFile,
                file_type: entry.file_type().ok(),
                attr: None,
            },
        };
        scanned.push(scanned_entry);
    }

    let pass_through: HashSet<String> = scanned
        .iter()
        .filter(|e| e.kind != EntryKind::RenderEligible)
        .map(|e| e.name.clone())
        .collect();

    let mut emitted_synthetic = HashSet::new();
    let listing: Vec<ListedEntry> = scanned
        .into_iter()
        .filter(|e| {
            if e.kind != EntryKind::RenderEligible {
                return true;
            }
            if pass_through.contains(&e.name) {
                trace!(name = %e.name, "Synthetic name shadowed by real entry");
                return false;
            }
            emitted_synthetic.insert(e.name.clone())
        })
        .collect();

    debug!(
        dir = %virtual_dir,
        entries = listing.len(),
        synthetic = emitted_synthetic.len(),
        "Listed directory"
    );
    Ok(listing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ClassifierError;
    use std::path::Path;
    use tempfile::TempDir;

    /// Treats files whose content starts with "TEXT" as eligible.
    struct PrefixClassifier;

    impl ContentClassifier for PrefixClassifier {
        fn classify(&self, path: &Path) -> Result<String, ClassifierError> {
            let data = fs::read(path).map_err(|source| ClassifierError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            if data.starts_with(b"TEXT") {
                Ok("text/plain".to_string())
            } else {
                Ok("image/jpeg".to_string())
            }
        }
    }

    struct BrokenClassifier;

    impl ContentClassifier for BrokenClassifier {
        fn classify(&self, _path: &Path) -> Result<String, ClassifierError> {
            Err(ClassifierError::Unavailable("no database".to_string()))
        }
    }

    fn setup() -> (TempDir, BackingRoot) {
        let temp = TempDir::new().unwrap();
        let root = BackingRoot::new(temp.path().to_str().unwrap()).unwrap();
        (temp, root)
    }

    fn names(listing: &[ListedEntry]) -> Vec<&str> {
        let mut names: Vec<&str> = listing.iter().map(|e| e.name.as_str()).collect();
        names.sort_unstable();
        names
    }

    #[test]
    fn test_eligible_file_is_replaced_by_synthetic_name() {
        let (temp, root) = setup();
        fs::write(temp.path().join("note.txt"), "TEXT hello").unwrap();
        fs::write(temp.path().join("photo.jpg"), "\u{FF}binary").unwrap();

        let listing = list_directory(&root, &PrefixClassifier, "/").unwrap();
        assert_eq!(names(&listing), vec!["note.png", "photo.jpg"]);
    }

    #[test]
    fn test_directories_carry_attributes() {
        let (temp, root) = setup();
        fs::create_dir(temp.path().join("sub")).unwrap();
        fs::write(temp.path().join("sub").join("inner.txt"), "TEXT").unwrap();
        fs::write(temp.path().join("plain.bin"), "bin").unwrap();

        let listing = list_directory(&root, &PrefixClassifier, "/").unwrap();
        let sub = listing.iter().find(|e| e.name == "sub").unwrap();
        assert!(sub.is_dir());
        assert!(sub.attr.as_ref().is_some_and(|m| m.is_dir()));

        let plain = listing.iter().find(|e| e.name == "plain.bin").unwrap();
        assert_eq!(plain.kind, EntryKind::PlainFile);
        assert!(plain.attr.is_none());

        // No recursion into subdirectories.
        assert!(listing.iter().all(|e| e.name != "inner.png"));
    }

    #[test]
    fn test_subdirectory_listing() {
        let (temp, root) = setup();
        fs::create_dir(temp.path().join("sub")).unwrap();
        fs::write(temp.path().join("sub").join("inner.txt"), "TEXT").unwrap();

        let listing = list_directory(&root, &PrefixClassifier, "/sub").unwrap();
        assert_eq!(names(&listing), vec!["inner.png"]);
        assert_eq!(listing[0].kind, EntryKind::RenderEligible);
    }

    #[test]
    fn test_classifier_failure_lists_plain_file() {
        let (temp, root) = setup();
        fs::write(temp.path().join("note.txt"), "TEXT").unwrap();

        let listing = list_directory(&root, &BrokenClassifier, "/").unwrap();
        assert_eq!(names(&listing), vec!["note.txt"]);
        assert_eq!(listing[0].kind, EntryKind::PlainFile);
    }

    #[test]
    fn test_synthetic_name_shadowed_by_real_file() {
        let (temp, root) = setup();
        fs::write(temp.path().join("pic.txt"), "TEXT").unwrap();
        fs::write(temp.path().join("pic.png"), "binary png").unwrap();

        let listing = list_directory(&root, &PrefixClassifier, "/").unwrap();
        assert_eq!(names(&listing), vec!["pic.png"]);
        assert_eq!(listing[0].kind, EntryKind::PlainFile);
    }

    #[test]
    fn test_synthetic_name_shadowed_by_directory() {
        let (temp, root) = setup();
        fs::write(temp.path().join("pic.txt"), "TEXT").unwrap();
        fs::create_dir(temp.path().join("pic.png")).unwrap();

        let listing = list_directory(&root, &PrefixClassifier, "/").unwrap();
        assert_eq!(names(&listing), vec!["pic.png"]);
        assert!(listing[0].is_dir());
    }

    #[test]
    fn test_colliding_synthetic_names_listed_once() {
        let (temp, root) = setup();
        fs::write(temp.path().join("note.txt"), "TEXT one").unwrap();
        fs::write(temp.path().join("note.asc"), "TEXT two").unwrap();

        let listing = list_directory(&root, &PrefixClassifier, "/").unwrap();
        assert_eq!(names(&listing), vec!["note.png"]);
    }

    #[test]
    fn test_text_file_named_png_is_its_own_twin() {
        let (temp, root) = setup();
        fs::write(temp.path().join("readme.png"), "TEXT").unwrap();

        let listing = list_directory(&root, &PrefixClassifier, "/").unwrap();
        assert_eq!(names(&listing), vec!["readme.png"]);
        assert_eq!(listing[0].kind, EntryKind::RenderEligible);
    }

    #[test]
    fn test_missing_directory_is_backing_error() {
        let (_temp, root) = setup();
        let result = list_directory(&root, &PrefixClassifier, "/absent");
        let err = result.unwrap_err();
        assert!(matches!(err, OverlayError::BackingUnavailable { .. }));
        assert_eq!(err.errno(), libc::ENOENT);
    }

    #[test]
    fn test_file_as_directory_is_backing_error() {
        let (temp, root) = setup();
        fs::write(temp.path().join("file"), "x").unwrap();
        let err = list_directory(&root, &PrefixClassifier, "/file").unwrap_err();
        assert_eq!(err.errno(), libc::ENOTDIR);
    }

    #[test]
    fn test_dangling_symlink_passes_through() {
        let (temp, root) = setup();
        std::os::unix::fs::symlink(temp.path().join("gone"), temp.path().join("link")).unwrap();

        let listing = list_directory(&root, &PrefixClassifier, "/").unwrap();
        assert_eq!(names(&listing), vec!["link"]);
        assert_eq!(listing[0].kind, EntryKind::PlainFile);
        assert!(listing[0].file_type.is_some_and(|ft| ft.is_symlink()));
    }

    #[test]
    fn test_special_files_keep_their_type() {
        use std::os::unix::fs::FileTypeExt;

        let (temp, root) = setup();
        let fifo = temp.path().join("queue");
        let c_path = std::ffi::CString::new(fifo.to_str().unwrap()).unwrap();
        assert_eq!(unsafe { libc::mkfifo(c_path.as_ptr(), 0o644) }, 0);

        let listing = list_directory(&root, &PrefixClassifier, "/").unwrap();
        assert_eq!(names(&listing), vec!["queue"]);
        assert_eq!(listing[0].kind, EntryKind::PlainFile);
        assert!(listing[0].file_type.is_some_and(|ft| ft.is_fifo()));
    }

    #[test]
    fn test_eligibility_is_not_cached() {
        let (temp, root) = setup();
        let path = temp.path().join("note.txt");
        fs::write(&path, "binary").unwrap();
        assert_eq!(
            names(&list_directory(&root, &PrefixClassifier, "/").unwrap()),
            vec!["note.txt"]
        );

        fs::write(&path, "TEXT now").unwrap();
        assert_eq!(
            names(&list_directory(&root, &PrefixClassifier, "/").unwrap()),
            vec!["note.png"]
        );
    }
}
