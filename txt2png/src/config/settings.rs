//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    /// Overlay settings
    pub overlay: OverlaySettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Overlay configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlaySettings {
    /// Size in bytes reported for synthetic `.png` entries before rendering.
    pub placeholder_size: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}
