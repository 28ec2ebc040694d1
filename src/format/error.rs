//! Error types for format selection.

use thiserror::Error;

/// Errors that can occur while choosing formats from a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// The catalog is empty, usually because every format was signature-ciphered.
    #[error(
        "no downloadable formats\n  Suggestion: this video only offers ciphered stream URLs, which are not supported"
    )]
    EmptyCatalog,

    /// Audio-only policy found no audio-only stream.
    #[error("no audio-only format available")]
    NoAudioFormat,

    /// Video policy found no stream carrying video.
    #[error("no video format available")]
    NoVideoFormat,

    /// Muxed policy found no stream carrying both tracks.
    #[error("no combined audio+video format available\n  Suggestion: allow merging to use separate video and audio streams")]
    NoMuxedFormat,

    /// The quality string could not be interpreted.
    #[error("invalid quality '{value}'\n  Suggestion: use best, worst, or a resolution such as 720 or 720p")]
    InvalidQualitySpec {
        /// The rejected value.
        value: String,
    },
}

impl SelectionError {
    /// Creates an `InvalidQualitySpec` error.
    #[must_use]
    pub fn invalid_quality(value: &str) -> Self {
        Self::InvalidQualitySpec {
            value: value.to_string(),
        }
    }
}
