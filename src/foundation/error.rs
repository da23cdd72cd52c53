/// Convenience result type used across the crate.
pub type RevealResult<T> = Result<T, RevealError>;

/// Top-level error taxonomy for configuration, geometry and binding APIs.
///
/// Content acquisition failures never surface through this type at the loader
/// boundary; they are absorbed into the fallback path. The
/// [`RevealError::ContentUnavailable`] variant exists for callers that drive a
/// [`crate::DocumentFetcher`] directly.
#[derive(thiserror::Error, Debug)]
pub enum RevealError {
    /// Invalid caller-provided data (ids, reveal parameters).
    #[error("validation error: {0}")]
    Validation(String),

    /// Malformed scroll position expression.
    #[error("scroll position error: {0}")]
    Position(String),

    /// Invalid or unreadable settings file.
    #[error("configuration error: {0}")]
    Config(String),

    /// Remote document could not be obtained.
    #[error("content unavailable: {0}")]
    ContentUnavailable(#[from] ContentUnavailable),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RevealError {
    /// Build a [`RevealError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`RevealError::Position`] value.
    pub fn position(msg: impl Into<String>) -> Self {
        Self::Position(msg.into())
    }

    /// Build a [`RevealError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Reasons a remote document fetch did not produce usable text.
///
/// All variants are recoverable and handled identically by the loader.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ContentUnavailable {
    /// Transport failure (DNS, connect, timeout, body read).
    #[error("remote unreachable: {0}")]
    RemoteUnreachable(String),

    /// The endpoint answered with a non-success status.
    #[error("remote rejected request with status {0}")]
    RemoteRejected(u16),

    /// The body was empty, whitespace-only, or held no body lines.
    #[error("remote document is empty")]
    RemoteEmpty,
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
