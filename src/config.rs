//! Library configuration.

use std::path::PathBuf;
use std::time::Duration;

use crate::download::DEFAULT_MERGE_TOOL;
use crate::identity::{ClientProfile, default_profiles};
use crate::resolver::DEFAULT_PLAYER_ENDPOINT;
use crate::transport::{
    DEFAULT_MAX_ATTEMPTS, METADATA_TIMEOUT, STREAM_CONNECT_TIMEOUT, STREAM_READ_TIMEOUT,
};

/// Everything the [`Downloader`](crate::Downloader) needs besides its seams.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloaderConfig {
    /// Player-metadata endpoint.
    pub endpoint: String,
    /// Client profiles, tried in order.
    pub profiles: Vec<ClientProfile>,
    /// User-agent pool; empty means the built-in pool.
    pub user_agents: Vec<String>,
    /// Deadline for each metadata request.
    pub metadata_timeout: Duration,
    /// Connect deadline for stream requests.
    pub stream_connect_timeout: Duration,
    /// Inactivity deadline for stream reads.
    pub stream_read_timeout: Duration,
    /// Attempts per metadata request, including the first.
    pub max_attempts: u32,
    /// Merge tool program.
    pub merge_tool: PathBuf,
    /// Fixed pause between profiles.
    pub pacing_base: Duration,
    /// Upper bound of the random pause added between profiles.
    pub pacing_jitter: Duration,
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_PLAYER_ENDPOINT.to_string(),
            profiles: default_profiles(),
            user_agents: Vec::new(),
            metadata_timeout: METADATA_TIMEOUT,
            stream_connect_timeout: STREAM_CONNECT_TIMEOUT,
            stream_read_timeout: STREAM_READ_TIMEOUT,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            merge_tool: PathBuf::from(DEFAULT_MERGE_TOOL),
            pacing_base: Duration::from_millis(500),
            pacing_jitter: Duration::from_secs(1),
        }
    }
}
