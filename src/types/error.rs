//! Error types for stordiff

use thiserror::Error;

/// Error type shared by storage clients and the diff engine.
#[derive(Debug, Error)]
pub enum DiffError {
    /// Standard IO error (automatically converted via #[from])
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// URL failed to parse
    #[error("Invalid URL '{url}': {reason}")]
    UrlParse { url: String, reason: String },

    /// URL scheme has no registered backend
    #[error("Unsupported URL scheme '{scheme}': no storage backend available")]
    UnsupportedScheme { scheme: String },

    /// Stat failed for a specific URL
    #[error("Unable to stat '{url}': {source}")]
    Stat {
        url: String,
        #[source]
        source: std::io::Error,
    },

    /// Listing failed for a specific URL, possibly mid-stream
    #[error("Listing failed for '{url}': {message}")]
    Listing { url: String, message: String },

    /// Entry does not exist
    #[error("'{url}' does not exist")]
    NotFound { url: String },

    /// Expected a single object, found something else
    #[error("'{url}' is not an object")]
    NotAnObject { url: String },

    /// Entry kind the engine cannot classify (symlink, device, ...)
    #[error("'{url}' is neither a regular object nor a directory")]
    UnsupportedEntryType { url: String },

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DiffError {
    /// Check if this error means the entry is simply absent.
    pub fn is_not_found(&self) -> bool {
        match self {
            DiffError::NotFound { .. } => true,
            DiffError::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            DiffError::Stat { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }

    /// Check if this error came from URL resolution rather than the backend.
    pub fn is_resolution_error(&self) -> bool {
        matches!(
            self,
            DiffError::UrlParse { .. } | DiffError::UnsupportedScheme { .. }
        )
    }
}
