//! Metadata resolution through client-profile negotiation.
//!
//! The player endpoint answers differently depending on the declared client.
//! [`NegotiationClient`] tries each [`ClientProfile`](crate::identity::ClientProfile)
//! in order and classifies every answer as a [`PlayabilityResult`]; the first
//! playable one becomes the [`VideoMetadata`].
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tubefetch_core::identity::{HeaderPool, ThreadRandom, default_profiles};
//! use tubefetch_core::parser::extract_video_id;
//! use tubefetch_core::resolver::NegotiationClient;
//! use tubefetch_core::transport::HttpTransport;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = NegotiationClient::new(
//!     HttpTransport::new()?,
//!     default_profiles(),
//!     HeaderPool::default(),
//!     Arc::new(ThreadRandom),
//! );
//! let metadata = client.resolve(&extract_video_id("dQw4w9WgXcQ")?).await?;
//! println!("{} ({} formats)", metadata.title, metadata.formats.len());
//! # Ok(())
//! # }
//! ```

mod client;
mod error;

pub use client::{DEFAULT_PLAYER_ENDPOINT, NegotiationClient};
pub use error::ResolveError;

use serde::Serialize;

use crate::format::{FormatRecord, normalize};
use crate::parser::VideoId;
use crate::schema::PlayerResponse;
use crate::transport::TransportError;

const UNKNOWN: &str = "Unknown";

/// Descriptive metadata and the downloadable catalog of one video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoMetadata {
    pub id: VideoId,
    pub title: String,
    /// Duration in seconds.
    pub duration: u64,
    pub author: String,
    pub view_count: u64,
    pub description: String,
    /// Largest thumbnail URL, or empty.
    pub thumbnail: String,
    /// Normalized catalog; every record has a URL.
    pub formats: Vec<FormatRecord>,
    /// Name of the client profile whose response was used.
    pub profile: String,
}

impl VideoMetadata {
    /// Builds metadata from a parsed player response.
    #[must_use]
    pub fn from_response(id: &VideoId, response: &PlayerResponse, profile: &str) -> Self {
        let details = response.video_details.clone().unwrap_or_default();
        let formats = response
            .streaming_data
            .as_ref()
            .map(normalize)
            .unwrap_or_default();
        let thumbnail = details
            .thumbnail
            .and_then(|list| list.thumbnails.into_iter().last())
            .map(|t| t.url)
            .unwrap_or_default();

        Self {
            id: id.clone(),
            title: details.title.unwrap_or_else(|| UNKNOWN.to_string()),
            duration: details.length_seconds.unwrap_or(0),
            author: details.author.unwrap_or_else(|| UNKNOWN.to_string()),
            view_count: details.view_count.unwrap_or(0),
            description: details.short_description.unwrap_or_default(),
            thumbnail,
            formats,
            profile: profile.to_string(),
        }
    }
}

/// Outcome of one negotiation attempt under one profile.
#[derive(Debug)]
pub enum PlayabilityResult {
    /// `OK`: this profile's answer is authoritative.
    Playable(Box<VideoMetadata>),
    /// `UNPLAYABLE`, or no `playabilityStatus` object at all: try the next profile.
    Unplayable(Box<PlayerResponse>),
    /// Any other status (or a status object without one), with the API's reason.
    Rejected {
        /// Status reported by the API.
        status: String,
        /// Reason reported by the API, or `Unknown error`.
        reason: String,
    },
    /// The request failed or the body was not JSON.
    TransportError(TransportError),
}

impl PlayabilityResult {
    /// Classifies a raw response body.
    #[must_use]
    pub fn classify(id: &VideoId, profile: &str, url: &str, body: &str) -> Self {
        let response = match PlayerResponse::from_json(body) {
            Ok(response) => response,
            Err(e) => return Self::TransportError(TransportError::decode(url, e.to_string())),
        };

        // Only a missing `playabilityStatus` object is skipped silently; an
        // object without `status` is a rejection like any other.
        let Some(playability) = response.playability_status.as_ref() else {
            return Self::Unplayable(Box::new(response));
        };
        match playability.status.as_deref() {
            Some("OK") => Self::Playable(Box::new(VideoMetadata::from_response(
                id, &response, profile,
            ))),
            Some("UNPLAYABLE") => Self::Unplayable(Box::new(response)),
            status => Self::Rejected {
                status: status.unwrap_or_default().to_string(),
                reason: response.reason().unwrap_or("Unknown error").to_string(),
            },
        }
    }
}
