//! Error types for metadata resolution.
//!
//! Follows the What/Why/Fix pattern: each message names the failure and a
//! suggestion where one exists.

use thiserror::Error;

use crate::transport::TransportError;

/// Errors that can occur while negotiating video metadata.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The last profile tried reported a status other than `OK`/`UNPLAYABLE`.
    #[error("video {video_id} not available: {reason}\n  Suggestion: {suggestion}")]
    VideoUnavailable {
        /// The video that was requested.
        video_id: String,
        /// Reason reported by the API.
        reason: String,
        /// How to fix the issue
        suggestion: String,
    },

    /// No profile produced a response at all.
    #[error(
        "no usable response for video {video_id}: tried {tried} profile(s)\n  Suggestion: Check the configured client profiles"
    )]
    AllProfilesExhausted {
        /// The video that was requested.
        video_id: String,
        /// Number of profiles tried.
        tried: usize,
    },

    /// The final profile's request failed after retries.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl ResolveError {
    /// Creates a `VideoUnavailable` error.
    #[must_use]
    pub fn video_unavailable(video_id: &str, reason: &str) -> Self {
        let lower = reason.to_ascii_lowercase();
        let suggestion = if lower.contains("sign in") || lower.contains("age") {
            "The video requires a signed-in account, which is not supported"
        } else if lower.contains("private") {
            "The video is private; ask the owner for access"
        } else {
            "Check that the video exists and is available in your region"
        };
        Self::VideoUnavailable {
            video_id: video_id.to_string(),
            reason: reason.to_string(),
            suggestion: suggestion.to_string(),
        }
    }

    /// Creates an `AllProfilesExhausted` error.
    #[must_use]
    pub fn all_profiles_exhausted(video_id: &str, tried: usize) -> Self {
        Self::AllProfilesExhausted {
            video_id: video_id.to_string(),
            tried,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_unavailable_message_includes_reason() {
        let err = ResolveError::video_unavailable("dQw4w9WgXcQ", "This video is private");
        let msg = err.to_string();
        assert!(msg.contains("dQw4w9WgXcQ"), "{msg}");
        assert!(msg.contains("This video is private"), "{msg}");
        assert!(msg.contains("private; ask the owner"), "{msg}");
    }

    #[test]
    fn test_video_unavailable_sign_in_suggestion() {
        let err = ResolveError::video_unavailable("dQw4w9WgXcQ", "Sign in to confirm your age");
        assert!(err.to_string().contains("signed-in account"));
    }

    #[test]
    fn test_transport_error_is_transparent() {
        let err: ResolveError = TransportError::http_status("https://example.com", 500).into();
        assert_eq!(err.to_string(), "HTTP 500 requesting https://example.com");
    }
}
