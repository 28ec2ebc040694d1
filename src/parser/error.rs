//! Error types for inbound video reference parsing.

use thiserror::Error;

/// Errors that can occur while extracting a video identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The input is neither a watch/embed URL nor a bare 11-character id.
    #[error("invalid URL '{input}': {reason}\n  Suggestion: {suggestion}")]
    InvalidUrl {
        /// The input that failed extraction
        input: String,
        /// Why the input was rejected
        reason: String,
        /// How to fix the issue
        suggestion: String,
    },
}

impl ParseError {
    /// Creates an `InvalidUrl` error for input that carries no video id.
    #[must_use]
    pub fn invalid_url(input: &str) -> Self {
        Self::InvalidUrl {
            input: input.to_string(),
            reason: "could not extract a video id".to_string(),
            suggestion: "Pass a watch URL (…?v=<id>), an embed URL (…/embed/<id>) or the 11-character id"
                .to_string(),
        }
    }
}
