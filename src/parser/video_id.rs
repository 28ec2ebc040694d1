//! Video id extraction from watch URLs, embed URLs and bare ids.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, trace};

use super::error::ParseError;

/// Length of a platform video id.
pub const VIDEO_ID_LEN: usize = 11;

/// Tried in order; the first match wins.
#[allow(clippy::expect_used)]
static ID_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    let id = format!("([0-9A-Za-z_-]{{{VIDEO_ID_LEN}}})");
    [
        // `watch?v=<id>`, `youtu.be/<id>`, `/shorts/<id>` and similar path forms
        Regex::new(&format!("(?:v=|/){id}")).expect("query/path id regex is valid"),
        Regex::new(&format!("(?:embed/){id}")).expect("embed id regex is valid"),
        Regex::new(&format!("^{id}$")).expect("bare id regex is valid"),
    ]
});

/// An 11-character platform video identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for VideoId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        extract_video_id(s)
    }
}

impl AsRef<str> for VideoId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Extracts the video id from a platform URL or a bare id.
///
/// Accepted shapes:
/// - `...?v=<id>...`
/// - `.../embed/<id>`
/// - a bare 11-character id
///
/// Extraction is idempotent: feeding the returned id back in yields the same id.
///
/// # Errors
///
/// Returns [`ParseError::InvalidUrl`] when none of the shapes match.
#[tracing::instrument(level = "debug")]
pub fn extract_video_id(input: &str) -> Result<VideoId, ParseError> {
    let trimmed = input.trim();

    for pattern in ID_PATTERNS.iter() {
        if let Some(id) = pattern.captures(trimmed).and_then(|c| c.get(1)) {
            trace!(pattern = %pattern.as_str(), id = id.as_str(), "video id matched");
            return Ok(VideoId(id.as_str().to_string()));
        }
    }

    debug!("no video id pattern matched");
    Err(ParseError::invalid_url(input))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_from_watch_url() {
        let id = extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s").unwrap();
        assert_eq!(id.as_str(), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_extract_from_watch_url_with_leading_params() {
        let id =
            extract_video_id("https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ").unwrap();
        assert_eq!(id.as_str(), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_extract_from_embed_url() {
        let id = extract_video_id("https://www.youtube.com/embed/dQw4w9WgXcQ?rel=0").unwrap();
        assert_eq!(id.as_str(), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_extract_from_short_link() {
        let id = extract_video_id("https://youtu.be/dQw4w9WgXcQ").unwrap();
        assert_eq!(id.as_str(), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_extract_from_bare_id() {
        let id = extract_video_id("dQw4w9WgXcQ").unwrap();
        assert_eq!(id.as_str(), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_extract_trims_whitespace() {
        let id = extract_video_id("  dQw4w9WgXcQ\n").unwrap();
        assert_eq!(id.as_str(), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_extract_is_idempotent() {
        for input in [
            "https://www.youtube.com/watch?v=a_b-c1D2e3F",
            "https://www.youtube.com/embed/a_b-c1D2e3F",
            "a_b-c1D2e3F",
        ] {
            let first = extract_video_id(input).unwrap();
            let second = extract_video_id(first.as_str()).unwrap();
            assert_eq!(first, second, "extraction not idempotent for {input}");
        }
    }

    #[test]
    fn test_extract_rejects_short_bare_id() {
        let err = extract_video_id("abc123").unwrap_err();
        assert!(matches!(err, ParseError::InvalidUrl { .. }));
    }

    #[test]
    fn test_extracted_ids_have_fixed_length() {
        let bare = "x".repeat(VIDEO_ID_LEN);
        assert_eq!(extract_video_id(&bare).unwrap().as_str().len(), VIDEO_ID_LEN);
        assert!(extract_video_id(&"x".repeat(VIDEO_ID_LEN + 1)).is_err());
        assert!(extract_video_id(&"x".repeat(VIDEO_ID_LEN - 1)).is_err());

        let long_path = format!("https://youtu.be/{}", "y".repeat(VIDEO_ID_LEN + 3));
        assert_eq!(extract_video_id(&long_path).unwrap().as_str().len(), VIDEO_ID_LEN);
    }

    #[test]
    fn test_extract_rejects_plain_text() {
        assert!(extract_video_id("not a video at all").is_err());
        assert!(extract_video_id("").is_err());
    }

    #[test]
    fn test_from_str_round_trips_display() {
        let id: VideoId = "dQw4w9WgXcQ".parse().unwrap();
        assert_eq!(id.to_string(), "dQw4w9WgXcQ");
    }
}
