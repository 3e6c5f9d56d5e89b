//! Error types for the filehandle library.
//!
//! Backends speak `std::io::Result`; everything above the backend boundary
//! speaks [`Error`]. Most public handle methods turn an [`Error`] into a
//! sentinel (`None` or `false`) after logging it, so this type is mainly seen
//! by stream creation, configuration persistence, and code that drives the
//! traversal engine directly.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for operations that may fail with a filehandle error.
///
/// # Examples
///
/// ```
/// use filehandle::{Error, Result};
///
/// fn example_operation() -> Result<u64> {
///     Ok(42)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the filehandle library.
#[derive(Debug, Error)]
pub enum Error {
    /// An invalid filesystem path was provided.
    #[error("invalid path {}: {reason}", path.display())]
    InvalidPath {
        /// The invalid path.
        path: PathBuf,
        /// The reason the path is invalid.
        reason: String,
    },

    /// A path does not exist.
    #[error("path not found: {}", path.display())]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// Permission denied accessing a path.
    #[error("permission denied: {}", path.display())]
    PermissionDenied {
        /// The path that could not be accessed.
        path: PathBuf,
    },

    /// The destination of an operation already exists.
    #[error("already exists: {}", path.display())]
    AlreadyExists {
        /// The path that already exists.
        path: PathBuf,
    },

    /// The backend does not provide the requested capability.
    #[error("backend does not support '{operation}'")]
    Unsupported {
        /// The backend operation that is missing.
        operation: &'static str,
    },

    /// Any other I/O failure reported by the backend.
    #[error("{operation} failed for {}: {source}", path.display())]
    Io {
        /// The backend operation that failed.
        operation: &'static str,
        /// The path the operation was applied to.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// Content could not be parsed or serialized as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A configuration store operation failed.
    #[error("configuration error for '{key}': {message}")]
    Configuration {
        /// The dotted key involved.
        key: String,
        /// A description of the failure.
        message: String,
    },

    /// A signal handler could not be installed.
    #[error("signal handler error: {0}")]
    Signal(#[from] ctrlc::Error),
}

impl Error {
    /// Classify an I/O error coming back from a backend call.
    ///
    /// `ErrorKind::Unsupported` is the backend's way of saying the capability
    /// is absent, so it maps to [`Error::Unsupported`] rather than [`Error::Io`].
    #[must_use]
    pub fn from_io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::Unsupported => Self::Unsupported { operation },
            io::ErrorKind::NotFound => Self::NotFound { path },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            io::ErrorKind::AlreadyExists => Self::AlreadyExists { path },
            _ => Self::Io {
                operation,
                path,
                source,
            },
        }
    }

    /// Check if error indicates a path does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use filehandle::Error;
    /// use std::path::PathBuf;
    ///
    /// let err = Error::NotFound { path: PathBuf::from("/nonexistent") };
    /// assert!(err.is_not_found());
    /// ```
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if error is permission-related.
    #[must_use]
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied { .. })
    }

    /// Check if error means the backend lacks a capability.
    ///
    /// # Examples
    ///
    /// ```
    /// use filehandle::Error;
    ///
    /// let err = Error::Unsupported { operation: "open_read" };
    /// assert!(err.is_unsupported());
    /// ```
    #[must_use]
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }
}
