//! Common error types used throughout sweetshop.
//!
//! This module provides a unified error type that covers the failure cases of
//! the catalog: missing products, rejected input, rejected photo formats,
//! database failures, and filesystem failures. None of them is fatal; every
//! variant maps to a user-visible message.

/// Common error type for sweetshop.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested product was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The caller is not an authenticated admin.
    #[error("Unauthorized")]
    Unauthorized,

    /// A database operation failed.
    #[error("Database error: {0}")]
    Database(String),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input was provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An uploaded photo has an extension outside the allowed set.
    #[error("Unsupported photo format '{filename}'. Allowed: {allowed}")]
    InvalidFormat { filename: String, allowed: String },

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new NotFound error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new Database error.
    pub fn database<S: Into<String>>(msg: S) -> Self {
        Self::Database(msg.into())
    }

    /// Create a new InvalidInput error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new InvalidFormat error naming the allowed photo extensions.
    pub fn invalid_format<S: Into<String>>(filename: S) -> Self {
        Self::InvalidFormat {
            filename: filename.into(),
            allowed: crate::paths::photo_extensions().join(", "),
        }
    }

    /// Create a new Internal error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }

    /// Create a new Io error from a message.
    pub fn io<S: Into<String>>(msg: S) -> Self {
        Self::Io(std::io::Error::other(msg.into()))
    }

    /// Alias for invalid_input (for consistency).
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether the error was caused by the caller's input rather than storage.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::Unauthorized | Self::InvalidInput(_) | Self::InvalidFormat { .. }
        )
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
