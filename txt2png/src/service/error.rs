//! Service error types.

use crate::overlay::OverlayError;
use std::fmt;
use std::io;

/// Errors that can occur while setting up or running the overlay service.
#[derive(Debug)]
pub enum ServiceError {
    /// Invalid configuration
    ConfigError(String),
    /// I/O error (path validation, FUSE mount, etc.)
    IoError(io::Error),
    /// The overlay could not be constructed
    OverlayError(OverlayError),
    /// FUSE mount or operation error
    FuseError(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            Self::IoError(e) => write!(f, "I/O error: {}", e),
            Self::OverlayError(e) => write!(f, "Overlay error: {}", e),
            Self::FuseError(msg) => write!(f, "FUSE error: {}", msg),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IoError(e) => Some(e),
            Self::OverlayError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ServiceError {
    fn from(e: io::Error) -> Self {
        Self::IoError(e)
    }
}

impl From<OverlayError> for ServiceError {
    fn from(e: OverlayError) -> Self {
        Self::OverlayError(e)
    }
}
