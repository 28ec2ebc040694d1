//! reqwest-backed [`Transport`].

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use super::constants::METADATA_CONNECT_TIMEOUT;
use super::{ApiRequest, Transport, TransportError};

/// HTTP transport for metadata requests.
///
/// Gzip-encoded responses are decompressed by the client before the body is
/// decoded as UTF-8 text. Designed to be created once and reused so the
/// connection pool is shared across profiles.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport with gzip decoding and the metadata connect timeout.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::ClientBuild`] if the client cannot be built.
    pub fn new() -> Result<Self, TransportError> {
        let client = Client::builder()
            .connect_timeout(METADATA_CONNECT_TIMEOUT)
            .gzip(true)
            .build()
            .map_err(|source| TransportError::ClientBuild { source })?;
        Ok(Self::with_client(client))
    }

    /// Wraps an existing reqwest client.
    ///
    /// The client's own decompression settings apply; build it with
    /// `gzip(true)` to accept compressed player responses.
    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, request), fields(url = %request.url, post = request.body.is_some()))]
    async fn send(&self, request: &ApiRequest) -> Result<String, TransportError> {
        let url = request.url.as_str();
        let mut builder = match &request.body {
            Some(body) => self.client.post(url).json(body),
            None => self.client.get(url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder
            .timeout(request.timeout)
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "request rejected");
            return Err(TransportError::http_status(url, status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| TransportError::from_reqwest(url, e))?;
        debug!(bytes = bytes.len(), "response received");

        String::from_utf8(bytes.to_vec())
            .map_err(|e| TransportError::decode(url, format!("response is not UTF-8: {e}")))
    }
}
