//! Synthetic name codec.
//!
//! A render-eligible file `notes.txt` is shown as `notes.png`: the real
//! extension (everything from the last `.`) is replaced by `.png`, or `.png`
//! is appended when there is no extension.
//!
//! The mapping is not injective: `notes.txt` and `notes.asc` both encode to
//! `notes.png`. The reverse direction therefore never guesses an extension;
//! it re-derives the encoding of each candidate real name and compares.

/// Extension carried by every synthetic name.
pub const SYNTHETIC_EXTENSION: &str = ".png";

/// Encode a real base name into its synthetic display name.
///
/// # Examples
///
/// ```
/// use txt2png::overlay::name::encode;
///
/// assert_eq!(encode("note.txt"), "note.png");
/// assert_eq!(encode("README"), "README.png");
/// assert_eq!(encode("archive.tar.gz"), "archive.tar.png");
/// ```
pub fn encode(real_name: &str) -> String {
    let stem = match real_name.rfind('.') {
        Some(idx) => &real_name[..idx],
        None => real_name,
    };
    let mut synthetic = String::with_capacity(stem.len() + SYNTHETIC_EXTENSION.len());
    synthetic.push_str(stem);
    synthetic.push_str(SYNTHETIC_EXTENSION);
    synthetic
}

/// Whether `real_name` is a possible source of `synthetic_name`.
pub fn matches(real_name: &str, synthetic_name: &str) -> bool {
    encode(real_name) == synthetic_name
}

/// Whether a name carries the synthetic suffix.
pub fn has_synthetic_suffix(name: &str) -> bool {
    name.ends_with(SYNTHETIC_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_replaces_extension() {
        assert_eq!(encode("note.txt"), "note.png");
        assert_eq!(encode("art.ans"), "art.png");
    }

    #[test]
    fn test_encode_without_extension() {
        assert_eq!(encode("README"), "README.png");
    }

    #[test]
    fn test_encode_strips_only_last_extension() {
        assert_eq!(encode("a.b.c"), "a.b.png");
    }

    #[test]
    fn test_encode_png_is_fixed_point() {
        assert_eq!(encode("photo.png"), "photo.png");
    }

    #[test]
    fn test_encode_dotfile() {
        // The whole name is the extension.
        assert_eq!(encode(".bashrc"), ".png");
    }

    #[test]
    fn test_matches_rederives_encoding() {
        assert!(matches("note.txt", "note.png"));
        assert!(matches("note.asc", "note.png"));
        assert!(matches("note", "note.png"));
        assert!(!matches("note.txt", "notes.png"));
        assert!(!matches("note.txt.bak", "note.png"));
    }

    #[test]
    fn test_matches_is_not_a_prefix_test() {
        // A prefix comparison would wrongly accept these.
        assert!(!matches("note-long.txt", "note.png"));
        assert!(!matches("notebook.txt", "note.png"));
    }

    #[test]
    fn test_has_synthetic_suffix() {
        assert!(has_synthetic_suffix("a.png"));
        assert!(has_synthetic_suffix(".png"));
        assert!(!has_synthetic_suffix("a.jpg"));
        assert!(!has_synthetic_suffix("png"));
        assert!(!has_synthetic_suffix("a.PNG"));
    }

    mod proptests {
        use super::super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn encode_always_ends_with_png(name in "[a-zA-Z0-9._ -]{0,40}") {
                prop_assert!(encode(&name).ends_with(SYNTHETIC_EXTENSION));
            }

            #[test]
            fn encode_never_stacks_suffix(name in "[a-zA-Z0-9._ -]{0,40}") {
                let once = encode(&name);
                prop_assert_eq!(encode(&once), once);
            }

            #[test]
            fn encoded_name_matches_its_source(name in "[a-zA-Z0-9._ -]{1,40}") {
                let synthetic = encode(&name);
                prop_assert!(matches(&name, &synthetic));
            }
        }
    }
}
