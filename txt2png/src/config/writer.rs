//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! Produces the commented INI representation written to `config.ini`.

use super::settings::ConfigFile;
use super::size::format_size;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    format!(
        r#"[overlay]
; Size reported for virtual .png entries before they are rendered (default: 100000)
; Reads are served in direct I/O mode, so the real rendered size may differ.
; Supports: KB, MB suffixes (e.g., 128KB, 1MB)
placeholder_size = {}

[logging]
; Log file path (default: ~/.txt2png/txt2png.log)
; The file is truncated at the start of every session.
file = {}
"#,
        format_size(config.overlay.placeholder_size),
        config.logging.file.to_string_lossy(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ini::Ini;
    use std::path::PathBuf;

    #[test]
    fn test_output_is_valid_ini() {
        let mut config = ConfigFile::default();
        config.overlay.placeholder_size = 2 * 1024 * 1024;
        config.logging.file = PathBuf::from("/tmp/txt2png.log");

        let content = to_config_string(&config);
        let ini = Ini::load_from_str(&content).unwrap();

        let overlay = ini.section(Some("overlay")).unwrap();
        assert_eq!(overlay.get("placeholder_size"), Some("2MB"));
        let logging = ini.section(Some("logging")).unwrap();
        assert_eq!(logging.get("file"), Some("/tmp/txt2png.log"));
    }

    #[test]
    fn test_output_documents_keys() {
        let content = to_config_string(&ConfigFile::default());
        assert!(content.contains("; Size reported for virtual .png entries"));
        assert!(content.contains("placeholder_size = 100000"));
    }
}
