//! Merges the two stream-list shapes into one catalog.

use tracing::{debug, trace};

use crate::schema::{RawFormat, StreamingData};

use super::FormatRecord;

/// Builds the catalog: combined formats first, then adaptive, each in API order.
///
/// Combined formats always carry both tracks. Adaptive tracks are classified
/// by the MIME type mentioning `audio` or `video`. Formats without a direct
/// URL are dropped here and never reach selection.
#[must_use]
pub fn normalize(streaming: &StreamingData) -> Vec<FormatRecord> {
    let combined = streaming
        .formats
        .iter()
        .filter_map(|raw| to_record(raw, true, true));

    let adaptive = streaming.adaptive_formats.iter().filter_map(|raw| {
        let mime = raw.mime_type.to_ascii_lowercase();
        to_record(raw, mime.contains("audio"), mime.contains("video"))
    });

    let catalog: Vec<FormatRecord> = combined.chain(adaptive).collect();
    debug!(
        combined = streaming.formats.len(),
        adaptive = streaming.adaptive_formats.len(),
        kept = catalog.len(),
        "catalog normalized"
    );
    catalog
}

fn to_record(raw: &RawFormat, has_audio: bool, has_video: bool) -> Option<FormatRecord> {
    let url = raw.url.as_deref().map(str::trim).unwrap_or_default();
    if url.is_empty() {
        trace!(itag = raw.itag, ciphered = raw.signature_cipher.is_some(), "format dropped: no url");
        return None;
    }

    let quality = raw
        .quality_label
        .clone()
        .filter(|label| !label.is_empty())
        .or_else(|| raw.quality.clone())
        .unwrap_or_default();

    Some(FormatRecord {
        itag: raw.itag,
        quality,
        mime_type: raw.mime_type.clone(),
        url: url.to_string(),
        has_audio,
        has_video,
        bitrate: raw.bitrate,
        content_length: raw.content_length,
    })
}
