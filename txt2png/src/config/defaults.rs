//! Default values for all configuration settings.

use std::path::PathBuf;

use super::file::config_directory;
use super::settings::*;
use crate::overlay::DEFAULT_PLACEHOLDER_SIZE;

/// Name of the configuration file inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.ini";

/// Name of the default log file inside the config directory.
pub const DEFAULT_LOG_FILE_NAME: &str = "txt2png.log";

/// Default log file path (~/.txt2png/txt2png.log).
pub fn default_log_file() -> PathBuf {
    config_directory().join(DEFAULT_LOG_FILE_NAME)
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            overlay: OverlaySettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            placeholder_size: DEFAULT_PLACEHOLDER_SIZE,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file: default_log_file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_placeholder_size() {
        assert_eq!(
            ConfigFile::default().overlay.placeholder_size,
            DEFAULT_PLACEHOLDER_SIZE
        );
    }

    #[test]
    fn test_default_log_file_in_config_directory() {
        let file = default_log_file();
        assert!(file.ends_with(DEFAULT_LOG_FILE_NAME));
        assert_eq!(file.parent(), Some(config_directory().as_path()));
    }
}
