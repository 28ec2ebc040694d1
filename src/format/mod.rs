//! Format catalog: normalization of the API's stream lists and selection.
//!
//! # Architecture
//!
//! - [`normalize`] - merges combined and adaptive lists into [`FormatRecord`]s
//! - [`select`] - applies a [`SelectionPolicy`] and yields a [`DownloadPlan`]
//!
//! # Example
//!
//! ```
//! use tubefetch_core::format::{select, FormatRecord, QualityTarget, SelectionPolicy};
//!
//! let catalog = vec![
//!     FormatRecord::new(18, "360p", "video/mp4", "https://r/18", true, true),
//!     FormatRecord::new(22, "720p", "video/mp4", "https://r/22", true, true),
//! ];
//! let selection = select(&catalog, &SelectionPolicy::BestMuxed, false).unwrap();
//! assert_eq!(selection.plan.primary().itag, 22);
//! ```

mod error;
mod normalize;
mod selector;

pub use error::SelectionError;
pub use normalize::normalize;
pub use selector::{DownloadPlan, QualityTarget, Selection, SelectionNotice, SelectionPolicy, select};

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// A quality label counts as a resolution only when it is digits followed by `p`.
#[allow(clippy::expect_used)]
static RESOLUTION_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)p$").expect("resolution regex is valid"));

/// One downloadable stream.
///
/// Records only enter a catalog through [`normalize`], which guarantees a
/// non-empty `url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatRecord {
    /// The API's encoding identifier.
    pub itag: u32,
    /// Quality label (`720p`) or raw quality enum (`medium`, `tiny`).
    pub quality: String,
    /// MIME type including codecs.
    pub mime_type: String,
    /// Direct retrieval URL.
    pub url: String,
    /// Stream carries an audio track.
    pub has_audio: bool,
    /// Stream carries a video track.
    pub has_video: bool,
    /// Average bitrate in bits per second.
    pub bitrate: Option<u64>,
    /// Declared size in bytes.
    pub content_length: Option<u64>,
}

impl FormatRecord {
    /// Creates a record without bitrate or size.
    #[must_use]
    pub fn new(
        itag: u32,
        quality: impl Into<String>,
        mime_type: impl Into<String>,
        url: impl Into<String>,
        has_audio: bool,
        has_video: bool,
    ) -> Self {
        Self {
            itag,
            quality: quality.into(),
            mime_type: mime_type.into(),
            url: url.into(),
            has_audio,
            has_video,
            bitrate: None,
            content_length: None,
        }
    }

    /// Sets the bitrate.
    #[must_use]
    pub fn with_bitrate(mut self, bitrate: u64) -> Self {
        self.bitrate = Some(bitrate);
        self
    }

    /// Parsed vertical resolution, when the label has the `<digits>p` shape.
    #[must_use]
    pub fn resolution(&self) -> Option<u32> {
        RESOLUTION_LABEL
            .captures(self.quality.trim())
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse().ok())
    }

    /// Sort key for resolution ordering.
    ///
    /// Unparsable labels rank as 0, the same as a literal `0p`; callers
    /// cannot tell the two apart.
    #[must_use]
    pub fn rank(&self) -> u32 {
        self.resolution().unwrap_or(0)
    }

    /// Bitrate for ordering; absent bitrate ranks as 0.
    #[must_use]
    pub fn bitrate_rank(&self) -> u64 {
        self.bitrate.unwrap_or(0)
    }

    /// Audio track without video.
    #[must_use]
    pub fn is_audio_only(&self) -> bool {
        self.has_audio && !self.has_video
    }

    /// Both tracks in one stream.
    #[must_use]
    pub fn is_muxed(&self) -> bool {
        self.has_audio && self.has_video
    }
}
