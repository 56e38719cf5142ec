// SPDX-License-Identifier: MIT
//! Error types for the application
//!
//! Setup failures (config, display connection, protocol negotiation, event
//! subscription) are fatal. Everything else is reported and the monitor keeps
//! running.

use std::path::PathBuf;

use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// No config file at the expected location
    #[error("Failed to load config file from: {}", path.display())]
    ConfigMissing { path: PathBuf },

    /// Config file exists but cannot be used
    #[error("Malformed config file {}: {reason}", path.display())]
    ConfigMalformed { path: PathBuf, reason: String },

    /// Could not open the X display
    #[error("Failed to open X display: {0}")]
    DisplayConnectFailed(String),

    /// XInput 2 missing or too old on the server
    #[error("Failed to set up XI2 version: {0}")]
    ProtocolVersionUnsupported(String),

    /// Selecting hierarchy events on the root window failed
    #[error("Failed to register for XI2 events: {0}")]
    SubscriptionFailed(String),

    /// The handler program could not be started
    #[error("Failed to spawn command {command}: {source}")]
    HandlerSpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// A single event could not be read; the next one may be fine
    #[error("Failed to fetch event: {0}")]
    EventFetchFailed(String),

    /// The display server went away
    #[error("Display connection closed: {0}")]
    ConnectionClosed(String),

    /// Device id does not fit the name cache
    #[error("Device id {id} exceeds the supported maximum of {capacity} devices")]
    DeviceIdOutOfRange { id: u16, capacity: usize },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Whether the event loop may carry on after failing to read an event
    pub fn is_transient(&self) -> bool {
        matches!(self, AppError::EventFetchFailed(_))
    }
}

/// Result type alias for AppError
pub type Result<T> = std::result::Result<T, AppError>;
