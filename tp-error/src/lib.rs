//! Unified error handling for tpfand
//!
//! A single error type shared by the core library and the daemon binary.
//! Uses thiserror for ergonomic error definitions with proper Display and
//! Error trait impls.

use std::io;
use std::path::PathBuf;

/// Result type alias using TpError
pub type Result<T> = std::result::Result<T, TpError>;

/// Unified error type for all tpfand operations
#[derive(thiserror::Error, Debug)]
pub enum TpError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: io::Error,
    },

    // ============================================================================
    // Fan Control Errors
    // ============================================================================
    #[error("Fan control file not available: {0}")]
    FanNotAvailable(PathBuf),

    #[error("Fan control file {0} does not accept commands (is thinkpad_acpi loaded with fan_control=1?)")]
    FanNotSupported(PathBuf),

    #[error("Failed to write fan command to {path}: {source}")]
    FanWrite {
        path: PathBuf,
        source: io::Error,
    },

    // ============================================================================
    // Sensor Errors
    // ============================================================================
    #[error("Sensor input file missing or not a regular file: {0}")]
    SensorInput(PathBuf),

    #[error("Sensor limit file missing or reports no limit: {0}")]
    SensorLimit(PathBuf),

    #[error("No coretemp hwmon device found under {0}")]
    NoCoretemp(PathBuf),

    #[error("No usable temperature sensors")]
    NoSensors,
}

impl TpError {
    /// Create a file-read error for a path
    pub fn file_read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }
}
