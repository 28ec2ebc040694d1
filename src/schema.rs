//! Wire types of the player endpoint response.
//!
//! Every field the pipeline reads is optional or defaulted. The API omits
//! fields freely depending on the client profile, and it delivers several
//! numbers (`lengthSeconds`, `viewCount`, `contentLength`) as strings.

use serde::{Deserialize, Deserializer};

/// Top-level response of the player endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerResponse {
    /// Whether the video can be played under the requesting profile.
    pub playability_status: Option<PlayabilityStatus>,
    /// Descriptive metadata.
    pub video_details: Option<VideoDetails>,
    /// Stream lists.
    pub streaming_data: Option<StreamingData>,
}

impl PlayerResponse {
    /// Parses a response body.
    ///
    /// # Errors
    ///
    /// Returns the JSON error when the body is not a JSON object.
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }

    /// Returns `playabilityStatus.status`, if present.
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.playability_status
            .as_ref()
            .and_then(|p| p.status.as_deref())
    }

    /// Returns `playabilityStatus.reason`, if present.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        self.playability_status
            .as_ref()
            .and_then(|p| p.reason.as_deref())
    }
}

/// `playabilityStatus` object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayabilityStatus {
    /// `OK`, `UNPLAYABLE`, `LOGIN_REQUIRED`, `ERROR`, ...
    pub status: Option<String>,
    /// Human-readable reason accompanying a non-OK status.
    pub reason: Option<String>,
}

/// `videoDetails` object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoDetails {
    pub video_id: Option<String>,
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient_u64")]
    pub length_seconds: Option<u64>,
    pub author: Option<String>,
    #[serde(deserialize_with = "lenient_u64")]
    pub view_count: Option<u64>,
    pub short_description: Option<String>,
    pub thumbnail: Option<ThumbnailList>,
}

/// `videoDetails.thumbnail` object; thumbnails are listed smallest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ThumbnailList {
    pub thumbnails: Vec<Thumbnail>,
}

/// One thumbnail entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Thumbnail {
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// `streamingData` object with its two incompatible stream lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StreamingData {
    /// Combined (muxed) formats carrying both audio and video.
    pub formats: Vec<RawFormat>,
    /// Single-track formats; the track kind is only visible in `mimeType`.
    pub adaptive_formats: Vec<RawFormat>,
}

/// One entry of either stream list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawFormat {
    pub itag: u32,
    /// Absent when the URL is signature-ciphered.
    pub url: Option<String>,
    pub mime_type: String,
    pub quality_label: Option<String>,
    pub quality: Option<String>,
    #[serde(deserialize_with = "lenient_u64")]
    pub bitrate: Option<u64>,
    #[serde(deserialize_with = "lenient_u64")]
    pub content_length: Option<u64>,
    pub signature_cipher: Option<String>,
}

/// Accepts a number, a numeric string, or anything else (mapped to `None`).
fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient {
        Number(u64),
        Text(String),
        Other(serde_json::Value),
    }

    Ok(match Option::<Lenient>::deserialize(deserializer)? {
        Some(Lenient::Number(n)) => Some(n),
        Some(Lenient::Text(s)) => s.trim().parse().ok(),
        Some(Lenient::Other(_)) | None => None,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_response() {
        let body = r#"{
            "playabilityStatus": {"status": "OK"},
            "videoDetails": {
                "videoId": "dQw4w9WgXcQ",
                "title": "Never Gonna Give You Up",
                "lengthSeconds": "212",
                "author": "Rick Astley",
                "viewCount": "1500000000",
                "shortDescription": "The official video",
                "thumbnail": {"thumbnails": [
                    {"url": "https://i.ytimg.com/small.jpg", "width": 120, "height": 90},
                    {"url": "https://i.ytimg.com/large.jpg", "width": 1280, "height": 720}
                ]}
            },
            "streamingData": {
                "formats": [{"itag": 18, "url": "https://r1/18", "mimeType": "video/mp4; codecs=\"avc1, mp4a\"", "qualityLabel": "360p", "bitrate": 500000}],
                "adaptiveFormats": [{"itag": 140, "url": "https://r1/140", "mimeType": "audio/mp4", "bitrate": 128000, "contentLength": "3433514"}]
            }
        }"#;

        let response = PlayerResponse::from_json(body).unwrap();
        assert_eq!(response.status(), Some("OK"));

        let details = response.video_details.unwrap();
        assert_eq!(details.length_seconds, Some(212));
        assert_eq!(details.view_count, Some(1_500_000_000));
        assert_eq!(details.thumbnail.unwrap().thumbnails.len(), 2);

        let streaming = response.streaming_data.unwrap();
        assert_eq!(streaming.formats[0].quality_label.as_deref(), Some("360p"));
        assert_eq!(streaming.adaptive_formats[0].content_length, Some(3_433_514));
    }

    #[test]
    fn test_missing_sections_default_to_none() {
        let response = PlayerResponse::from_json("{}").unwrap();
        assert_eq!(response, PlayerResponse::default());
        assert_eq!(response.status(), None);
        assert_eq!(response.reason(), None);
    }

    #[test]
    fn test_unplayable_reason_is_exposed() {
        let response = PlayerResponse::from_json(
            r#"{"playabilityStatus": {"status": "LOGIN_REQUIRED", "reason": "Sign in to confirm your age"}}"#,
        )
        .unwrap();
        assert_eq!(response.status(), Some("LOGIN_REQUIRED"));
        assert_eq!(response.reason(), Some("Sign in to confirm your age"));
    }

    #[test]
    fn test_lenient_numbers_accept_garbage() {
        let format: RawFormat = serde_json::from_str(
            r#"{"itag": 22, "bitrate": "not-a-number", "contentLength": null, "mimeType": "video/mp4"}"#,
        )
        .unwrap();
        assert_eq!(format.bitrate, None);
        assert_eq!(format.content_length, None);

        let format: RawFormat =
            serde_json::from_str(r#"{"itag": 22, "bitrate": {"nested": true}}"#).unwrap();
        assert_eq!(format.bitrate, None);
    }

    #[test]
    fn test_ciphered_format_has_no_url() {
        let format: RawFormat = serde_json::from_str(
            r#"{"itag": 137, "signatureCipher": "s=abc&url=https%3A%2F%2Fr1", "mimeType": "video/mp4"}"#,
        )
        .unwrap();
        assert!(format.url.is_none());
        assert!(format.signature_cipher.is_some());
    }

    #[test]
    fn test_non_object_body_is_an_error() {
        assert!(PlayerResponse::from_json("<html>").is_err());
    }
}
