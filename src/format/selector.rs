//! Deterministic format selection.
//!
//! Ties always resolve to the earliest record in catalog order, so the
//! normalizer's ordering decides between equally ranked streams.

use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::{debug, instrument, warn};

use super::{FormatRecord, SelectionError};

/// Which resolution to aim for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum QualityTarget {
    /// Highest resolution.
    Best,
    /// Lowest resolution.
    Worst,
    /// A specific vertical resolution; the closest one is used if absent.
    Exact(u32),
}

impl FromStr for QualityTarget {
    type Err = SelectionError;

    /// Accepts `best`, `worst`, `<N>` or `<N>p` (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().to_ascii_lowercase();
        match value.as_str() {
            "best" => Ok(Self::Best),
            "worst" => Ok(Self::Worst),
            other => other
                .strip_suffix('p')
                .unwrap_or(other)
                .parse::<u32>()
                .map(Self::Exact)
                .map_err(|_| SelectionError::invalid_quality(s)),
        }
    }
}

impl fmt::Display for QualityTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Best => f.write_str("best"),
            Self::Worst => f.write_str("worst"),
            Self::Exact(n) => write!(f, "{n}p"),
        }
    }
}

/// What the caller wants downloaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPolicy {
    /// Best single stream carrying both tracks.
    BestMuxed,
    /// Highest-bitrate audio-only stream.
    AudioOnly,
    /// A video stream at the target resolution, merged with audio if needed.
    VideoAtQuality(QualityTarget),
}

/// Outcome of selection: one stream, or a video/audio pair to merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadPlan {
    /// The record already has the needed track combination.
    Single {
        /// The stream to download.
        format: FormatRecord,
        /// Saved with the audio extension when set.
        audio_only: bool,
    },
    /// Separate tracks that the merge tool recombines.
    Merge {
        /// Video-only stream.
        video: FormatRecord,
        /// Audio-only stream.
        audio: FormatRecord,
    },
}

impl DownloadPlan {
    /// The record that defines the output: the single stream or the video track.
    #[must_use]
    pub fn primary(&self) -> &FormatRecord {
        match self {
            Self::Single { format, .. } => format,
            Self::Merge { video, .. } => video,
        }
    }

    /// Whether the plan produces an audio-only file.
    #[must_use]
    pub fn is_audio_only(&self) -> bool {
        matches!(self, Self::Single { audio_only: true, .. })
    }

    /// Whether the plan needs the merge tool.
    #[must_use]
    pub fn needs_merge(&self) -> bool {
        matches!(self, Self::Merge { .. })
    }

    /// Output extension.
    #[must_use]
    pub fn extension(&self) -> &'static str {
        if self.is_audio_only() { "mp3" } else { "mp4" }
    }
}

/// Non-fatal conditions met while selecting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SelectionNotice {
    /// No stream had the requested resolution; the closest one was used.
    ApproximateQuality {
        /// Requested resolution.
        requested: u32,
        /// Quality label of the chosen stream.
        chosen: String,
    },
    /// Merging was requested but no audio-only stream exists.
    NoAudioAvailable {
        /// Itag of the video-only stream used alone.
        itag: u32,
    },
}

impl fmt::Display for SelectionNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApproximateQuality { requested, chosen } => {
                write!(f, "{requested}p not available, using closest match {chosen}")
            }
            Self::NoAudioAvailable { itag } => {
                write!(f, "no audio stream available, itag {itag} will have no sound")
            }
        }
    }
}

/// A plan plus any notices raised while building it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// What to download.
    pub plan: DownloadPlan,
    /// Non-fatal conditions, in the order they were met.
    pub notices: Vec<SelectionNotice>,
}

/// Applies `policy` to `catalog`.
///
/// `merge` only matters for [`SelectionPolicy::VideoAtQuality`]: when the
/// chosen video stream has no audio, the best audio-only stream is paired
/// with it.
///
/// # Errors
///
/// - [`SelectionError::EmptyCatalog`] if `catalog` is empty
/// - [`SelectionError::NoAudioFormat`], [`SelectionError::NoMuxedFormat`] or
///   [`SelectionError::NoVideoFormat`] if the policy's filter matches nothing
#[instrument(skip(catalog), fields(formats = catalog.len()))]
pub fn select(
    catalog: &[FormatRecord],
    policy: &SelectionPolicy,
    merge: bool,
) -> Result<Selection, SelectionError> {
    if catalog.is_empty() {
        return Err(SelectionError::EmptyCatalog);
    }

    let mut notices = Vec::new();
    let plan = match policy {
        SelectionPolicy::AudioOnly => {
            let audio = best_audio(catalog).ok_or(SelectionError::NoAudioFormat)?;
            DownloadPlan::Single {
                format: audio.clone(),
                audio_only: true,
            }
        }
        SelectionPolicy::BestMuxed => {
            let muxed = catalog
                .iter()
                .filter(|r| r.is_muxed())
                .min_by_key(|r| Reverse(r.rank()))
                .ok_or(SelectionError::NoMuxedFormat)?;
            DownloadPlan::Single {
                format: muxed.clone(),
                audio_only: false,
            }
        }
        SelectionPolicy::VideoAtQuality(target) => {
            let video = pick_video(catalog, *target, &mut notices)?;
            if video.has_audio || !merge {
                DownloadPlan::Single {
                    format: video.clone(),
                    audio_only: false,
                }
            } else if let Some(audio) = best_audio(catalog) {
                DownloadPlan::Merge {
                    video: video.clone(),
                    audio: audio.clone(),
                }
            } else {
                notices.push(SelectionNotice::NoAudioAvailable { itag: video.itag });
                DownloadPlan::Single {
                    format: video.clone(),
                    audio_only: false,
                }
            }
        }
    };

    for notice in &notices {
        warn!(%notice, "selection notice");
    }
    debug!(itag = plan.primary().itag, quality = %plan.primary().quality, merge = plan.needs_merge(), "format selected");

    Ok(Selection { plan, notices })
}

fn best_audio(catalog: &[FormatRecord]) -> Option<&FormatRecord> {
    catalog
        .iter()
        .filter(|r| r.is_audio_only())
        .min_by_key(|r| Reverse(r.bitrate_rank()))
}

fn pick_video<'a>(
    catalog: &'a [FormatRecord],
    target: QualityTarget,
    notices: &mut Vec<SelectionNotice>,
) -> Result<&'a FormatRecord, SelectionError> {
    let mut videos = catalog.iter().filter(|r| r.has_video).peekable();
    if videos.peek().is_none() {
        return Err(SelectionError::NoVideoFormat);
    }

    let chosen = match target {
        QualityTarget::Best => videos.min_by_key(|r| Reverse(r.rank())),
        QualityTarget::Worst => videos.min_by_key(|r| r.rank()),
        QualityTarget::Exact(n) => {
            let candidates: Vec<&FormatRecord> = videos.collect();
            match candidates.iter().find(|r| r.resolution() == Some(n)) {
                Some(exact) => Some(*exact),
                None => {
                    let closest = candidates.into_iter().min_by_key(|r| r.rank().abs_diff(n));
                    if let Some(closest) = closest {
                        notices.push(SelectionNotice::ApproximateQuality {
                            requested: n,
                            chosen: closest.quality.clone(),
                        });
                    }
                    closest
                }
            }
        }
    };

    chosen.ok_or(SelectionError::NoVideoFormat)
}
