//! Error types for the occupancy workspace.
//!
//! Library crates use [`OccupancyError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all occupancy operations.
#[derive(Debug, thiserror::Error)]
pub enum OccupancyError {
    /// The user-supplied location alias is not in the alias table.
    #[error("unknown location: '{alias}'")]
    UnknownLocation { alias: String },

    /// A remote fetch failed to connect or returned a non-success status.
    #[error("could not reach VPIS at {url}: {message}")]
    Transport {
        url: String,
        status: Option<u16>,
        message: String,
    },

    /// A response declared an unexpected content type.
    #[error("unexpected content type from {url}: {}", content_type.as_deref().unwrap_or("<none>"))]
    Format {
        url: String,
        content_type: Option<String>,
    },

    /// The live control document does not list a location the alias table supports.
    #[error("location '{location}' is not listed in the VPIS control document")]
    LocationNotInControlDocument { location: String },

    /// A room identifier lacks the two-letter location prefix.
    #[error("malformed room identifier: '{room}'")]
    MalformedRoomIdentifier { room: String },

    /// XML or HTML content could not be parsed.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Input validation error (semester token, URL shape, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, OccupancyError>;

impl OccupancyError {
    /// Create a transport error for a non-success HTTP status.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::Transport {
            url: url.into(),
            status: Some(status),
            message: format!("HTTP {status}"),
        }
    }

    /// Create a transport error for a failure below the HTTP layer.
    pub fn network(url: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Transport {
            url: url.into(),
            status: None,
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True when the remote system could not be checked at all
    /// (as opposed to answering with an empty schedule).
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Format { .. })
    }
}
