//! Read-window slicing over an in-memory buffer.

/// Return the part of `buffer` covered by the read window
/// `[offset, offset + length)`.
///
/// An offset at or past the end yields an empty slice (end of file, not an
/// error); a window running past the end is shortened to the bytes that
/// remain. Never indexes outside the buffer.
pub fn slice(buffer: &[u8], offset: u64, length: usize) -> &[u8] {
    let start = match usize::try_from(offset) {
        Ok(start) if start < buffer.len() => start,
        _ => return &[],
    };
    let end = start + length.min(buffer.len() - start);
    &buffer[start..end]
}
