//! Top-level error for the end-to-end pipeline.

use thiserror::Error;

use crate::download::TransferError;
use crate::format::SelectionError;
use crate::parser::ParseError;
use crate::resolver::ResolveError;
use crate::transport::TransportError;

/// Any failure of [`Downloader::info`](crate::Downloader::info) or
/// [`Downloader::download`](crate::Downloader::download).
///
/// Each stage keeps its own error type; this enum only tags the stage.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The input carried no video id.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Metadata negotiation failed.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// The policy matched no format.
    #[error(transparent)]
    Selection(#[from] SelectionError),

    /// Download or merge failed.
    #[error(transparent)]
    Transfer(#[from] TransferError),

    /// An HTTP client could not be set up.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_errors_convert_and_keep_message() {
        let err: PipelineError = ParseError::invalid_url("nope").into();
        assert!(matches!(err, PipelineError::Parse(_)));
        assert!(err.to_string().contains("invalid URL 'nope'"));

        let err: PipelineError = SelectionError::NoAudioFormat.into();
        assert_eq!(err.to_string(), "no audio-only format available");
    }
}
