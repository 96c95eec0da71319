//! CLI runner for common setup.
//!
//! Encapsulates configuration loading, logging initialization and the
//! async runtime for long-running commands.

use crate::error::CliError;
use tokio::runtime::Runtime;
use tracing::info;
use txt2png::config::{ConfigFile, DEFAULT_LOG_FILE_NAME};
use txt2png::logging::{init_logging, split_log_path, LoggingGuard};

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Create a new CLI runner with optional debug logging.
    ///
    /// # Arguments
    ///
    /// * `debug_mode` - When true, enables debug-level logging regardless of
    ///   RUST_LOG and echoes events to stdout
    pub fn with_debug(debug_mode: bool) -> Result<Self, CliError> {
        let config = ConfigFile::load()?;

        let (log_dir, log_file) = split_log_path(&config.logging.file).ok_or_else(|| {
            CliError::LoggingInit(format!(
                "Invalid log file path '{}' (expected a file such as {})",
                config.logging.file.display(),
                DEFAULT_LOG_FILE_NAME
            ))
        })?;

        let logging_guard = init_logging(&log_dir, &log_file, debug_mode, debug_mode)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("txt2png v{}", txt2png::VERSION);
        info!("txt2png CLI: {} command", command);
    }

    /// Build the multi-threaded Tokio runtime that drives the FUSE session.
    pub fn runtime(&self) -> Result<Runtime, CliError> {
        Runtime::new().map_err(CliError::Runtime)
    }
}
