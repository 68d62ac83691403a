//! Error types and result aliases.
//!
//! Defines the core `GameError` enumeration and common `Result` type.

use thiserror::Error;

/// Request handling errors.
#[derive(Debug, Error)]
pub enum GameError {
    /// The route was hit with an unsupported HTTP method.
    #[error("method not allowed")]
    MethodNotAllowed,

    /// The request or its form body could not be parsed. Carries the
    /// message displayed to the client.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The request body exceeds the configured size limit.
    #[error("request body too large")]
    PayloadTooLarge,

    /// The game cookie is missing or does not hold a number.
    #[error("no active game session")]
    MissingSession,

    /// Connection-level I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for `GameError`.
pub type Result<T> = std::result::Result<T, GameError>;
