//! Error types for the printer library

use thiserror::Error;

/// Printer error types
#[derive(Debug, Error)]
pub enum PrintError {
    /// No printer device present
    #[error("No device: {0}")]
    NoDevice(String),

    /// The OS refused access to the device
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Device could not be opened
    #[error("Connection failed: {0}")]
    Connection(String),

    /// IO error during printing
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Printer is offline or unreachable
    #[error("Printer offline: {0}")]
    Offline(String),

    /// Timeout waiting for printer
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Invalid printer configuration
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

/// Result type for printer operations
pub type PrintResult<T> = Result<T, PrintError>;
