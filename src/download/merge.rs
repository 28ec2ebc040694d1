//! External merge tool invocation.

use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, instrument, warn};

use super::constants::DEFAULT_MERGE_TOOL;
use super::error::TransferError;

/// Recombines a video track and an audio track into one file.
#[async_trait]
pub trait MergeTool: Send + Sync + Debug {
    /// Writes `output` from the video track of `video` and the audio track of
    /// `audio`, overwriting `output` if it exists.
    async fn merge(&self, video: &Path, audio: &Path, output: &Path) -> Result<(), TransferError>;
}

/// Merges with `ffmpeg`: video copied as-is, audio transcoded to AAC.
#[derive(Debug, Clone)]
pub struct FfmpegMerger {
    program: PathBuf,
}

impl Default for FfmpegMerger {
    fn default() -> Self {
        Self::new(DEFAULT_MERGE_TOOL)
    }
}

impl FfmpegMerger {
    /// Uses `program` instead of `ffmpeg` from `PATH`.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Returns the program that will be run.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments for one merge.
    #[must_use]
    pub fn arguments(video: &Path, audio: &Path, output: &Path) -> Vec<std::ffi::OsString> {
        let mut args: Vec<std::ffi::OsString> = Vec::with_capacity(14);
        args.push("-y".into());
        args.push("-i".into());
        args.push(video.into());
        args.push("-i".into());
        args.push(audio.into());
        for arg in ["-map", "0:v:0", "-map", "1:a:0", "-c:v", "copy", "-c:a", "aac"] {
            args.push(arg.into());
        }
        args.push(output.into());
        args
    }
}

#[async_trait]
impl MergeTool for FfmpegMerger {
    #[instrument(skip(self), fields(program = %self.program.display()))]
    async fn merge(&self, video: &Path, audio: &Path, output: &Path) -> Result<(), TransferError> {
        let result = Command::new(&self.program)
            .args(Self::arguments(video, audio, output))
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| TransferError::io(&self.program, e))?;

        if result.status.success() {
            debug!(output = %output.display(), "merge complete");
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&result.stderr).into_owned();
        warn!(status = ?result.status.code(), "merge tool failed");
        Err(TransferError::merge_failed(stderr))
    }
}
