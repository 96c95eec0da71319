//! User configuration for the overlay.
//!
//! An optional INI file at `~/.txt2png/config.ini` supplies the placeholder
//! size for synthetic entries and the log file location. Command-line flags
//! take precedence over file values.
//!
//! # Example
//!
//! ```
//! use txt2png::config::{parse_size, ConfigFile};
//!
//! let mut config = ConfigFile::default();
//! config.overlay.placeholder_size = parse_size("128KB").unwrap();
//! assert_eq!(config.overlay.placeholder_size, 131072);
//! ```

mod defaults;
mod file;
mod parser;
mod settings;
mod size;
mod writer;

pub use defaults::{default_log_file, CONFIG_FILE_NAME, DEFAULT_LOG_FILE_NAME};
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{ConfigFile, LoggingSettings, OverlaySettings};
pub use size::{format_size, parse_size, Size, SizeParseError};
