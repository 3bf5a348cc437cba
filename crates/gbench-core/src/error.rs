//! Error types for gbench

use thiserror::Error;

/// Result type alias using our custom Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Infrastructure errors raised by the core system.
///
/// These are the failures that propagate: the inference backend being
/// unreachable, a request timing out, the backend misbehaving. Expected
/// document-level failures (a missing file, an off-format reply) are never
/// represented here; they travel as values on [`AnalysisResult`]
/// (`crate::types::AnalysisResult::error`) so batch flows can keep going.
#[derive(Error, Debug)]
pub enum Error {
    /// Backend unreachable after exhausting retries.
    #[error("connection error: {0}")]
    Connection(String),

    /// Request exceeded the configured per-request timeout. Never retried.
    #[error("timeout: {0}")]
    Timeout(String),

    /// The backend answered, but with a failure status or unusable body.
    #[error("backend error: {0}")]
    Backend(String),

    /// The backend returned a successful but empty generation.
    #[error("backend returned an empty response")]
    EmptyResponse,

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for the connection kind, which CLI layers answer with an
    /// "is the backend running?" hint.
    pub fn is_connection(&self) -> bool {
        matches!(self, Error::Connection(_))
    }
}
