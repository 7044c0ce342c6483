//! Error types for cobble.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for cobble operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while setting up or driving the automation.
#[derive(Debug, Error)]
pub enum Error {
    /// The physical input device could not be opened.
    #[error("cannot open input device {}: {source}", path.display())]
    DeviceOpen {
        /// Path of the device node.
        path: PathBuf,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },

    /// The virtual (uinput) device could not be configured or created.
    #[error("cannot create virtual device: {0}")]
    VirtualDevice(String),

    /// The operation requires access the process does not have.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Reading from the input device failed for a reason other than "no data".
    #[error("failed to read input event: {0}")]
    Read(#[source] io::Error),

    /// Writing to the virtual device failed.
    #[error("failed to emit event: {0}")]
    Emit(#[source] io::Error),

    /// Writing the status display failed.
    #[error("status output failed: {0}")]
    Status(#[source] io::Error),

    /// A key name could not be resolved.
    #[error("unknown key: {0}")]
    InvalidKey(String),

    /// The startup configuration is inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Installing the signal handler failed.
    #[error("cannot install signal handler: {0}")]
    Signal(String),
}
