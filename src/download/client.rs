//! HTTP client for streaming media to disk.
//!
//! Stream URLs are pre-signed and opaque; the client only validates them,
//! attaches browser navigation headers and writes the body in fixed-size
//! chunks while reporting progress.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, instrument};
use url::Url;

use crate::identity::{HeaderPool, RandomSource, RequestPurpose};
use crate::transport::{STREAM_CONNECT_TIMEOUT, STREAM_READ_TIMEOUT, TransportError};

use super::constants::CHUNK_SIZE;
use super::error::TransferError;
use super::progress::ProgressReporter;

/// Streaming download client.
///
/// Created once per download call and reused for both tracks of a merge so
/// the connection pool is shared.
#[derive(Debug, Clone)]
pub struct StreamClient {
    client: Client,
    headers: HeaderPool,
    random: Arc<dyn RandomSource>,
}

impl StreamClient {
    /// Creates a client with the default stream timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::ClientBuild`] if the client cannot be built.
    pub fn new(headers: HeaderPool, random: Arc<dyn RandomSource>) -> Result<Self, TransportError> {
        Self::with_timeouts(headers, random, STREAM_CONNECT_TIMEOUT, STREAM_READ_TIMEOUT)
    }

    /// Creates a client with explicit timeouts.
    ///
    /// `read_timeout` bounds the wait for each read, not the whole transfer.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::ClientBuild`] if the client cannot be built.
    pub fn with_timeouts(
        headers: HeaderPool,
        random: Arc<dyn RandomSource>,
        connect_timeout: Duration,
        read_timeout: Duration,
    ) -> Result<Self, TransportError> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .read_timeout(read_timeout)
            .gzip(true)
            .build()
            .map_err(|source| TransportError::ClientBuild { source })?;
        Ok(Self {
            client,
            headers,
            random,
        })
    }

    /// Streams `url` into `path`, returning the number of bytes written.
    ///
    /// Progress is reported after every [`CHUNK_SIZE`] piece. The total comes
    /// from the response's `Content-Length`, falling back to `declared_length`.
    /// On any failure the partially written file is removed.
    ///
    /// # Errors
    ///
    /// - [`TransferError::InvalidUrl`] if `url` does not parse
    /// - [`TransferError::Transport`] on non-success status or network failure
    /// - [`TransferError::Io`] if the file cannot be created or written
    #[instrument(skip(self, progress), fields(path = %path.display()))]
    pub async fn download_to(
        &self,
        url: &str,
        path: &Path,
        label: &str,
        declared_length: Option<u64>,
        progress: &dyn ProgressReporter,
    ) -> Result<u64, TransferError> {
        Url::parse(url).map_err(|_| TransferError::invalid_url(url))?;

        let mut request = self.client.get(url);
        for (name, value) in self
            .headers
            .next_headers(RequestPurpose::Browse, self.random.as_ref())
        {
            request = request.header(name, value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(url, e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::http_status(url, status.as_u16()).into());
        }

        let total = response.content_length().filter(|n| *n > 0).or(declared_length);
        debug!(status = status.as_u16(), total, "stream response received");

        let mut file = File::create(path)
            .await
            .map_err(|e| TransferError::io(path, e))?;

        progress.on_start(label, total);
        let result = stream_to_file(&mut file, response, url, path, total, progress).await;
        progress.on_finish();
        drop(file);

        if result.is_err() {
            debug!(path = %path.display(), "cleaning up partial file after error");
            let _ = tokio::fs::remove_file(path).await;
        }
        result
    }
}

async fn stream_to_file(
    file: &mut File,
    response: reqwest::Response,
    url: &str,
    path: &Path,
    total: Option<u64>,
    progress: &dyn ProgressReporter,
) -> Result<u64, TransferError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| TransportError::from_reqwest(url, e))?;

        for piece in chunk.chunks(CHUNK_SIZE) {
            writer
                .write_all(piece)
                .await
                .map_err(|e| TransferError::io(path, e))?;
            written += piece.len() as u64;
            progress.on_progress(written, total);
        }
    }

    writer
        .flush()
        .await
        .map_err(|e| TransferError::io(path, e))?;

    Ok(written)
}
