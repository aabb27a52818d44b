//! QA errors.

use std::time::Duration;

use thiserror::Error;

use crate::provider::LlmError;

/// Result alias for QA operations.
pub type QaResult<T> = Result<T, QaError>;

/// Errors that end a single QA operation.
#[derive(Debug, Error)]
pub enum QaError {
    #[error("Rate limit exceeded for '{caller}'. Please try again in {}s.", retry_after.as_secs())]
    RateLimited { caller: String, retry_after: Duration },

    #[error("QA provider failed: {0}")]
    Provider(#[from] LlmError),

    #[error("Invalid response from QA engine: {message}")]
    MalformedResponse { message: String, raw: String },

    #[error("chat message is empty")]
    EmptyMessage,
}

impl QaError {
    /// Raw model output for malformed responses.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Self::MalformedResponse { raw, .. } => Some(raw),
            _ => None,
        }
    }
}
