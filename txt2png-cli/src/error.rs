//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::path::PathBuf;
use std::process;
use txt2png::config::ConfigFileError;
use txt2png::render::RenderError;
use txt2png::service::ServiceError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Failed to start the async runtime
    Runtime(std::io::Error),
    /// Failed to render a file
    Render { path: PathBuf, error: RenderError },
    /// Failed to write output file
    FileWrite { path: PathBuf, error: std::io::Error },
    /// One or more files could not be classified
    Classify(usize),
    /// FUSE server error
    Serve(ServiceError),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Serve(ServiceError::FuseError(_)) => {
                eprintln!();
                eprintln!("Common issues:");
                eprintln!("  1. FUSE not installed: sudo apt install fuse3 (Linux)");
                eprintln!("  2. Permissions: You may need to add your user to the 'fuse' group");
                eprintln!(
                    "  3. Mountpoint in use: Try unmounting with: fusermount3 -u <mountpoint>"
                );
            }
            CliError::Render {
                error: RenderError::EmptyInput,
                ..
            } => {
                eprintln!();
                eprintln!("Empty files have no image; add some text and try again.");
            }
            CliError::Config(_) => {
                eprintln!();
                eprintln!(
                    "Check {} or recreate it with: txt2png config init",
                    txt2png::config::config_file_path().display()
                );
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Runtime(e) => write!(f, "Failed to start async runtime: {}", e),
            CliError::Render { path, error } => {
                write!(f, "Failed to render '{}': {}", path.display(), error)
            }
            CliError::FileWrite { path, error } => {
                write!(f, "Failed to write file '{}': {}", path.display(), error)
            }
            CliError::Classify(count) => write!(f, "{} path(s) could not be classified", count),
            CliError::Serve(e) => write!(f, "FUSE server error: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Runtime(e) => Some(e),
            CliError::Render { error, .. } => Some(error),
            CliError::FileWrite { error, .. } => Some(error),
            CliError::Serve(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<ServiceError> for CliError {
    fn from(e: ServiceError) -> Self {
        CliError::Serve(e)
    }
}
