//! Executes a [`DownloadPlan`]: one stream straight to its final name, or two
//! temporary tracks handed to the merge tool.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::format::{DownloadPlan, FormatRecord};
use crate::resolver::VideoMetadata;

use super::client::StreamClient;
use super::constants::TEMP_SUFFIX;
use super::error::TransferError;
use super::filename::output_filename;
use super::merge::MergeTool;
use super::progress::ProgressReporter;

/// A completed download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferResult {
    /// Always `true`; failures are errors, not results.
    pub success: bool,
    /// Output file name.
    pub filename: String,
    /// Full output path.
    pub path: PathBuf,
    /// Video title as reported by the API.
    pub title: String,
    /// Video id.
    pub video_id: String,
    /// Size of the output file.
    pub bytes: u64,
    /// Whether the merge tool produced the output.
    pub merged: bool,
    /// Itags downloaded: one, or video then audio.
    pub itags: Vec<u32>,
    /// Quality label of the primary stream.
    pub quality: String,
    /// Non-fatal selection notices, filled in by the caller that selected.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<String>,
}

/// Temporary files removed when the guard goes out of scope.
#[derive(Debug)]
struct TempArtifacts {
    paths: Vec<PathBuf>,
}

impl TempArtifacts {
    fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }
}

impl Drop for TempArtifacts {
    fn drop(&mut self) {
        for path in &self.paths {
            match std::fs::remove_file(path) {
                Ok(()) => debug!(path = %path.display(), "temporary file removed"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!(path = %path.display(), error = %e, "could not remove temporary file"),
            }
        }
    }
}

/// Downloads the streams of a plan and merges them when needed.
#[derive(Debug, Clone)]
pub struct StreamFetcher {
    client: StreamClient,
    merger: Arc<dyn MergeTool>,
}

impl StreamFetcher {
    /// Creates a fetcher.
    pub fn new(client: StreamClient, merger: Arc<dyn MergeTool>) -> Self {
        Self { client, merger }
    }

    /// Downloads `plan` into `destination`, creating the directory if needed.
    ///
    /// The output is named `<sanitized-title>_<id>.<ext>`. Either exactly one
    /// complete output file exists afterwards, or none does; temporary track
    /// files never survive the call.
    ///
    /// # Errors
    ///
    /// - [`TransferError::Io`] on directory or file failures, or if the merge
    ///   tool cannot be started
    /// - [`TransferError::Transport`] if a stream request fails
    /// - [`TransferError::MergeFailed`] if the merge tool exits non-zero
    #[instrument(skip(self, plan, metadata, progress), fields(video_id = %metadata.id, merge = plan.needs_merge()))]
    pub async fn fetch(
        &self,
        plan: &DownloadPlan,
        metadata: &VideoMetadata,
        destination: &Path,
        progress: &dyn ProgressReporter,
    ) -> Result<TransferResult, TransferError> {
        tokio::fs::create_dir_all(destination)
            .await
            .map_err(|e| TransferError::io(destination, e))?;

        let filename = output_filename(&metadata.title, metadata.id.as_str(), plan.extension());
        let output = destination.join(&filename);
        info!(title = %metadata.title, quality = %plan.primary().quality, path = %output.display(), "downloading");

        let (bytes, itags) = match plan {
            DownloadPlan::Single { format, .. } => {
                let bytes = self.download(format, &output, "download", progress).await?;
                (bytes, vec![format.itag])
            }
            DownloadPlan::Merge { video, audio } => {
                let bytes = self.download_and_merge(video, audio, &output, progress).await?;
                (bytes, vec![video.itag, audio.itag])
            }
        };

        info!(bytes, path = %output.display(), "download complete");
        Ok(TransferResult {
            success: true,
            filename,
            path: output,
            title: metadata.title.clone(),
            video_id: metadata.id.to_string(),
            bytes,
            merged: plan.needs_merge(),
            itags,
            quality: plan.primary().quality.clone(),
            notices: Vec::new(),
        })
    }

    async fn download(
        &self,
        format: &FormatRecord,
        path: &Path,
        label: &str,
        progress: &dyn ProgressReporter,
    ) -> Result<u64, TransferError> {
        self.client
            .download_to(&format.url, path, label, format.content_length, progress)
            .await
    }

    async fn download_and_merge(
        &self,
        video: &FormatRecord,
        audio: &FormatRecord,
        output: &Path,
        progress: &dyn ProgressReporter,
    ) -> Result<u64, TransferError> {
        let video_path = temp_path(output, "video");
        let audio_path = temp_path(output, "audio");
        let temps = TempArtifacts::new(vec![video_path.clone(), audio_path.clone()]);

        self.download(video, &video_path, "video", progress).await?;
        self.download(audio, &audio_path, "audio", progress).await?;

        if let Err(e) = self.merger.merge(&video_path, &audio_path, output).await {
            let _ = tokio::fs::remove_file(output).await;
            return Err(e);
        }

        let size = tokio::fs::metadata(output)
            .await
            .map_err(|e| TransferError::io(output, e))?
            .len();
        drop(temps);
        Ok(size)
    }
}

/// `<dir>/.<output-name>.<track>.part`
fn temp_path(output: &Path, track: &str) -> PathBuf {
    let name = output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    output.with_file_name(format!(".{name}.{track}.{TEMP_SUFFIX}"))
}
