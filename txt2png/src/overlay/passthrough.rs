//! Plain byte access for pass-through entries.

use std::fs::{self, File, Metadata};
use std::io::{self, ErrorKind};
use std::os::unix::fs::FileExt;
use std::path::Path;

/// Attributes of a real entry, following symlinks.
pub fn stat(path: &Path) -> io::Result<Metadata> {
    fs::metadata(path)
}

/// Read up to `size` bytes starting at `offset`.
///
/// Returns fewer bytes only at end of file. The handle is scoped to the call.
pub fn read_range(path: &Path, offset: u64, size: usize) -> io::Result<Vec<u8>> {
    let file = File::open(path)?;
    let mut buf = vec![0u8; size];
    let mut filled = 0;

    while filled < size {
        match file.read_at(&mut buf[filled..], offset + filled as u64) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    buf.truncate(filled);
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn file_with(content: &[u8]) -> (TempDir, std::path::PathBuf) {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("data.bin");
        fs::write(&path, content).unwrap();
        (temp, path)
    }

    #[test]
    fn test_read_middle() {
        let (_temp, path) = file_with(b"0123456789");
        assert_eq!(read_range(&path, 3, 4).unwrap(), b"3456");
    }

    #[test]
    fn test_short_read_at_end() {
        let (_temp, path) = file_with(b"0123456789");
        assert_eq!(read_range(&path, 8, 100).unwrap(), b"89");
    }

    #[test]
    fn test_offset_past_end() {
        let (_temp, path) = file_with(b"0123");
        assert!(read_range(&path, 10, 4).unwrap().is_empty());
    }

    #[test]
    fn test_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = read_range(&temp.path().join("absent"), 0, 4).unwrap_err();
        assert_eq!(err.raw_os_error(), Some(libc::ENOENT));
    }

    #[test]
    fn test_stat_follows_symlinks() {
        let (temp, path) = file_with(b"abc");
        let link = temp.path().join("link");
        std::os::unix::fs::symlink(&path, &link).unwrap();
        let meta = stat(&link).unwrap();
        assert!(meta.is_file());
        assert_eq!(meta.len(), 3);
    }
}
