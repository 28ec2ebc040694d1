//! End-to-end pipeline: id extraction, negotiation, selection, transfer.
//!
//! [`Downloader`] owns one metadata client and one stream fetcher and runs
//! each step to completion before starting the next.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, instrument};

use crate::config::DownloaderConfig;
use crate::download::{FfmpegMerger, MergeTool, ProgressReporter, StreamClient, StreamFetcher, TransferResult};
use crate::error::PipelineError;
use crate::format::{SelectionPolicy, select};
use crate::identity::{HeaderPool, RandomSource, ThreadRandom};
use crate::parser::extract_video_id;
use crate::resolver::{NegotiationClient, VideoMetadata};
use crate::transport::{
    HttpTransport, RetryPolicy, RetryingTransport, Sleeper, TokioSleeper, TransportError,
};

/// What to download and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    /// Selection policy.
    pub policy: SelectionPolicy,
    /// Pair separate video and audio streams when the chosen video is silent.
    pub merge: bool,
    /// Destination directory; created if absent.
    pub output_dir: PathBuf,
}

impl DownloadRequest {
    /// Creates a request with merging enabled.
    #[must_use]
    pub fn new(policy: SelectionPolicy, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            policy,
            merge: true,
            output_dir: output_dir.into(),
        }
    }

    /// Enables or disables merging.
    #[must_use]
    pub fn with_merge(mut self, merge: bool) -> Self {
        self.merge = merge;
        self
    }
}

type MetadataClient = NegotiationClient<RetryingTransport<HttpTransport>>;

/// The composed pipeline.
///
/// # Example
///
/// ```no_run
/// use tubefetch_core::{Downloader, DownloaderConfig, DownloadRequest};
/// use tubefetch_core::download::TracingProgress;
/// use tubefetch_core::format::SelectionPolicy;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let downloader = Downloader::new(DownloaderConfig::default())?;
/// let request = DownloadRequest::new(SelectionPolicy::BestMuxed, "./downloads");
/// let result = downloader
///     .download("https://www.youtube.com/watch?v=dQw4w9WgXcQ", &request, &TracingProgress)
///     .await?;
/// println!("{}", result.path.display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Downloader {
    resolver: MetadataClient,
    fetcher: StreamFetcher,
}

impl Downloader {
    /// Creates a downloader with real sleeps, thread randomness and `ffmpeg`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::ClientBuild`] if an HTTP client cannot be built.
    pub fn new(config: DownloaderConfig) -> Result<Self, TransportError> {
        Self::builder(config).build()
    }

    /// Starts a builder for injecting the sleep, randomness and merge seams.
    #[must_use]
    pub fn builder(config: DownloaderConfig) -> DownloaderBuilder {
        DownloaderBuilder::new(config)
    }

    /// Resolves `input` to metadata without downloading.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Parse`] or [`PipelineError::Resolve`].
    #[instrument(skip(self))]
    pub async fn info(&self, input: &str) -> Result<VideoMetadata, PipelineError> {
        let video_id = extract_video_id(input)?;
        Ok(self.resolver.resolve(&video_id).await?)
    }

    /// Resolves, selects and downloads `input`.
    ///
    /// # Errors
    ///
    /// Returns the first failing stage's error; nothing is retried here.
    #[instrument(skip(self, progress), fields(policy = ?request.policy, merge = request.merge))]
    pub async fn download(
        &self,
        input: &str,
        request: &DownloadRequest,
        progress: &dyn ProgressReporter,
    ) -> Result<TransferResult, PipelineError> {
        let metadata = self.info(input).await?;
        let selection = select(&metadata.formats, &request.policy, request.merge)?;
        info!(
            title = %metadata.title,
            itag = selection.plan.primary().itag,
            quality = %selection.plan.primary().quality,
            "format chosen"
        );

        let mut result = self
            .fetcher
            .fetch(&selection.plan, &metadata, &request.output_dir, progress)
            .await?;
        result.notices = selection.notices.iter().map(ToString::to_string).collect();
        Ok(result)
    }
}

/// Builder for [`Downloader`].
#[derive(Debug)]
pub struct DownloaderBuilder {
    config: DownloaderConfig,
    sleeper: Arc<dyn Sleeper>,
    random: Arc<dyn RandomSource>,
    merger: Option<Arc<dyn MergeTool>>,
}

impl DownloaderBuilder {
    fn new(config: DownloaderConfig) -> Self {
        Self {
            config,
            sleeper: Arc::new(TokioSleeper),
            random: Arc::new(ThreadRandom),
            merger: None,
        }
    }

    /// Sleeper for retry backoff and profile pacing.
    #[must_use]
    pub fn sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Randomness for user agents, jitter and pacing.
    #[must_use]
    pub fn random(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.random = random;
        self
    }

    /// Merge tool; defaults to [`FfmpegMerger`] with the configured program.
    #[must_use]
    pub fn merge_tool(mut self, merger: Arc<dyn MergeTool>) -> Self {
        self.merger = Some(merger);
        self
    }

    /// Builds the downloader.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::ClientBuild`] if an HTTP client cannot be built.
    pub fn build(self) -> Result<Downloader, TransportError> {
        let Self {
            config,
            sleeper,
            random,
            merger,
        } = self;
        let headers = HeaderPool::with_user_agents(config.user_agents.clone());

        let transport = RetryingTransport::new(
            HttpTransport::new()?,
            RetryPolicy::with_max_attempts(config.max_attempts),
            Arc::clone(&sleeper),
            Arc::clone(&random),
        );
        let resolver = NegotiationClient::new(
            transport,
            config.profiles.clone(),
            headers.clone(),
            Arc::clone(&random),
        )
        .with_sleeper(sleeper)
        .with_endpoint(config.endpoint.clone())
        .with_timeout(config.metadata_timeout)
        .with_pacing(config.pacing_base, config.pacing_jitter);

        let client = StreamClient::with_timeouts(
            headers,
            random,
            config.stream_connect_timeout,
            config.stream_read_timeout,
        )?;
        let merger =
            merger.unwrap_or_else(|| Arc::new(FfmpegMerger::new(config.merge_tool.clone())));

        Ok(Downloader {
            resolver,
            fetcher: StreamFetcher::new(client, merger),
        })
    }
}
