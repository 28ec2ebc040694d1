//! Profile negotiation loop against the player endpoint.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use crate::identity::{ClientProfile, HeaderPool, RandomSource, RequestPurpose};
use crate::parser::VideoId;
use crate::schema::PlayerResponse;
use crate::transport::{ApiRequest, METADATA_TIMEOUT, Sleeper, TokioSleeper, Transport};

use super::{PlayabilityResult, ResolveError, VideoMetadata};

/// Production player-metadata endpoint.
pub const DEFAULT_PLAYER_ENDPOINT: &str = "https://www.youtube.com/youtubei/v1/player";

/// Fixed part of the pause between two profiles.
const DEFAULT_PACING_BASE: Duration = Duration::from_millis(500);

/// Upper bound of the random part of the pause between two profiles.
const DEFAULT_PACING_JITTER: Duration = Duration::from_secs(1);

/// Resolves video ids to metadata by trying client profiles in order.
///
/// The transport is expected to carry its own retry policy (see
/// [`RetryingTransport`](crate::transport::RetryingTransport)); this client
/// only decides when to move on to the next profile.
#[derive(Debug)]
pub struct NegotiationClient<T> {
    transport: T,
    profiles: Vec<ClientProfile>,
    headers: HeaderPool,
    random: Arc<dyn RandomSource>,
    sleeper: Arc<dyn Sleeper>,
    endpoint: String,
    timeout: Duration,
    pacing_base: Duration,
    pacing_jitter: Duration,
}

impl<T: Transport> NegotiationClient<T> {
    /// Creates a client for the production endpoint with real sleeps.
    pub fn new(
        transport: T,
        profiles: Vec<ClientProfile>,
        headers: HeaderPool,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        Self {
            transport,
            profiles,
            headers,
            random,
            sleeper: Arc::new(TokioSleeper),
            endpoint: DEFAULT_PLAYER_ENDPOINT.to_string(),
            timeout: METADATA_TIMEOUT,
            pacing_base: DEFAULT_PACING_BASE,
            pacing_jitter: DEFAULT_PACING_JITTER,
        }
    }

    /// Replaces the sleeper used for inter-profile pacing.
    #[must_use]
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Points the client at another endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets the per-request deadline.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the pause between profiles: `base + uniform(0, jitter)`.
    #[must_use]
    pub fn with_pacing(mut self, base: Duration, jitter: Duration) -> Self {
        self.pacing_base = base;
        self.pacing_jitter = jitter;
        self
    }

    /// Returns the profiles in the order they are tried.
    #[must_use]
    pub fn profiles(&self) -> &[ClientProfile] {
        &self.profiles
    }

    /// Resolves `video_id` to metadata.
    ///
    /// Profiles are tried in order, pausing between attempts:
    /// - `OK` ends the loop with that profile's metadata
    /// - `UNPLAYABLE` (or no status) moves on silently
    /// - any other status moves on, except on the last profile
    /// - transport failures move on, except on the last profile
    ///
    /// When the loop runs out on an `UNPLAYABLE` answer, that last parsed
    /// response is used as-is, so the metadata may be sparse.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::VideoUnavailable`] if the last profile is rejected
    /// - [`ResolveError::Transport`] if the last profile's request fails
    /// - [`ResolveError::AllProfilesExhausted`] if there are no profiles
    #[instrument(skip(self), fields(video_id = %video_id, profiles = self.profiles.len()))]
    pub async fn resolve(&self, video_id: &VideoId) -> Result<VideoMetadata, ResolveError> {
        let total = self.profiles.len();
        let mut last_parsed: Option<(Box<PlayerResponse>, &ClientProfile)> = None;

        for (index, profile) in self.profiles.iter().enumerate() {
            let is_last = index + 1 == total;
            if index > 0 {
                self.pace().await;
            }

            match self.attempt(video_id, profile).await {
                PlayabilityResult::Playable(metadata) => {
                    info!(profile = %profile.name, formats = metadata.formats.len(), "metadata resolved");
                    return Ok(*metadata);
                }
                PlayabilityResult::Unplayable(response) => {
                    debug!(profile = %profile.name, "profile unplayable, trying next");
                    last_parsed = Some((response, profile));
                }
                PlayabilityResult::Rejected { status, reason } => {
                    if is_last {
                        return Err(ResolveError::video_unavailable(video_id.as_str(), &reason));
                    }
                    debug!(profile = %profile.name, %status, %reason, "profile rejected, trying next");
                }
                PlayabilityResult::TransportError(error) => {
                    if is_last {
                        return Err(error.into());
                    }
                    warn!(profile = %profile.name, error = %error, "profile request failed, trying next");
                }
            }
        }

        match last_parsed {
            Some((response, profile)) => {
                warn!(profile = %profile.name, "no profile reported OK, using last response");
                Ok(VideoMetadata::from_response(video_id, &response, &profile.name))
            }
            None => Err(ResolveError::all_profiles_exhausted(video_id.as_str(), total)),
        }
    }

    async fn attempt(&self, video_id: &VideoId, profile: &ClientProfile) -> PlayabilityResult {
        let body = serde_json::json!({
            "videoId": video_id.as_str(),
            "context": { "client": profile.client_context() },
        });
        let request = ApiRequest::post_json(&self.endpoint, body, self.timeout).with_headers(
            self.headers
                .next_headers(RequestPurpose::ApiCall(profile), self.random.as_ref()),
        );

        debug!(profile = %profile.name, version = %profile.version, "requesting player metadata");
        match self.transport.send(&request).await {
            Ok(text) => PlayabilityResult::classify(video_id, &profile.name, &self.endpoint, &text),
            Err(error) => PlayabilityResult::TransportError(error),
        }
    }

    async fn pace(&self) {
        let delay = self.pacing_base + self.pacing_jitter.mul_f64(self.random.unit());
        debug!(delay_ms = delay.as_millis(), "pausing before next profile");
        self.sleeper.sleep(delay).await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::identity::{FixedRandom, default_profiles};
    use crate::parser::extract_video_id;
    use crate::transport::{RecordingSleeper, TransportError};

    /// Replays scripted outcomes and records each request body.
    #[derive(Default)]
    struct ScriptedTransport {
        outcomes: Mutex<VecDeque<Result<String, TransportError>>>,
        bodies: Mutex<Vec<serde_json::Value>>,
    }

    impl ScriptedTransport {
        fn new(outcomes: Vec<Result<String, TransportError>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
                bodies: Mutex::default(),
            }
        }

        fn client_names(&self) -> Vec<String> {
            self.bodies
                .lock()
                .unwrap()
                .iter()
                .map(|b| b["context"]["client"]["clientName"].as_str().unwrap().to_string())
                .collect()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn send(&self, request: &ApiRequest) -> Result<String, TransportError> {
            self.bodies
                .lock()
                .unwrap()
                .push(request.body.clone().unwrap_or_default());
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::http_status(&request.url, 500)))
        }
    }

    fn ok(title: &str) -> Result<String, TransportError> {
        Ok(format!(
            r#"{{"playabilityStatus":{{"status":"OK"}},"videoDetails":{{"title":"{title}"}}}}"#
        ))
    }

    fn status(status: &str, reason: &str) -> Result<String, TransportError> {
        Ok(format!(
            r#"{{"playabilityStatus":{{"status":"{status}","reason":"{reason}"}},"videoDetails":{{"title":"from {status}"}}}}"#
        ))
    }

    fn client(
        outcomes: Vec<Result<String, TransportError>>,
    ) -> (NegotiationClient<Arc<ScriptedTransport>>, Arc<ScriptedTransport>, Arc<RecordingSleeper>) {
        let transport = Arc::new(ScriptedTransport::new(outcomes));
        let sleeper = Arc::new(RecordingSleeper::new());
        let client = NegotiationClient::new(
            transport.clone(),
            default_profiles(),
            HeaderPool::default(),
            Arc::new(FixedRandom::new(0, 0.5)),
        )
        .with_sleeper(sleeper.clone());
        (client, transport, sleeper)
    }

    fn video() -> VideoId {
        extract_video_id("dQw4w9WgXcQ").unwrap()
    }

    #[tokio::test]
    async fn test_first_ok_stops_negotiation() {
        let (client, transport, sleeper) = client(vec![ok("Primary")]);
        let metadata = client.resolve(&video()).await.unwrap();
        assert_eq!(metadata.title, "Primary");
        assert_eq!(metadata.profile, "ANDROID");
        assert_eq!(transport.client_names(), ["ANDROID"]);
        assert!(sleeper.sleeps().is_empty());
    }

    #[tokio::test]
    async fn test_unplayable_then_ok_uses_second_profile() {
        let (client, transport, sleeper) = client(vec![status("UNPLAYABLE", "nope"), ok("Second")]);
        let metadata = client.resolve(&video()).await.unwrap();
        assert_eq!(metadata.title, "Second");
        assert_eq!(metadata.profile, "WEB");
        assert_eq!(transport.client_names(), ["ANDROID", "WEB"]);
        assert_eq!(sleeper.sleeps(), vec![Duration::from_secs(1)]);
    }

    #[tokio::test]
    async fn test_request_body_carries_video_id_and_context() {
        let (client, transport, _) = client(vec![ok("x")]);
        client.resolve(&video()).await.unwrap();
        let body = transport.bodies.lock().unwrap()[0].clone();
        assert_eq!(body["videoId"], "dQw4w9WgXcQ");
        assert_eq!(body["context"]["client"]["clientVersion"], "19.09.36");
        assert_eq!(body["context"]["client"]["hl"], "en");
    }

    #[tokio::test]
    async fn test_rejection_on_last_profile_is_video_unavailable() {
        let (client, _, _) = client(vec![
            status("UNPLAYABLE", "first"),
            status("LOGIN_REQUIRED", "second"),
            status("ERROR", "Video unavailable"),
        ]);
        let err = client.resolve(&video()).await.unwrap_err();
        match err {
            ResolveError::VideoUnavailable { reason, .. } => assert_eq!(reason, "Video unavailable"),
            other => panic!("expected VideoUnavailable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_status_object_without_status_on_last_profile_is_video_unavailable() {
        let (client, _, _) = client(vec![
            status("UNPLAYABLE", "first"),
            status("UNPLAYABLE", "second"),
            Ok(r#"{"playabilityStatus":{"reason":"Video unavailable"}}"#.to_string()),
        ]);
        let err = client.resolve(&video()).await.unwrap_err();
        match err {
            ResolveError::VideoUnavailable { reason, .. } => assert_eq!(reason, "Video unavailable"),
            other => panic!("expected VideoUnavailable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_status_object_everywhere_uses_last_response() {
        let (client, _, _) = client(vec![
            Ok("{}".to_string()),
            Ok("{}".to_string()),
            Ok(r#"{"videoDetails":{"title":"bare"}}"#.to_string()),
        ]);
        let metadata = client.resolve(&video()).await.unwrap();
        assert_eq!(metadata.title, "bare");
        assert_eq!(metadata.profile, "IOS");
    }

    #[tokio::test]
    async fn test_rejection_on_earlier_profile_is_swallowed() {
        let (client, _, _) = client(vec![status("LOGIN_REQUIRED", "Sign in"), ok("Web")]);
        let metadata = client.resolve(&video()).await.unwrap();
        assert_eq!(metadata.title, "Web");
    }

    #[tokio::test]
    async fn test_transport_error_on_earlier_profiles_is_swallowed() {
        let (client, transport, _) = client(vec![
            Err(TransportError::http_status("https://x", 403)),
            Err(TransportError::timeout("https://x")),
            ok("Ios"),
        ]);
        let metadata = client.resolve(&video()).await.unwrap();
        assert_eq!(metadata.profile, "IOS");
        assert_eq!(transport.client_names().len(), 3);
    }

    #[tokio::test]
    async fn test_transport_error_on_last_profile_propagates() {
        let (client, _, _) = client(vec![
            status("UNPLAYABLE", ""),
            status("UNPLAYABLE", ""),
            Err(TransportError::http_status("https://x", 404)),
        ]);
        let err = client.resolve(&video()).await.unwrap_err();
        assert!(matches!(err, ResolveError::Transport(e) if e.status() == Some(404)));
    }

    #[tokio::test]
    async fn test_invalid_json_on_last_profile_propagates_as_decode() {
        let (client, _, _) = client(vec![
            status("UNPLAYABLE", ""),
            status("UNPLAYABLE", ""),
            Ok("<html>".to_string()),
        ]);
        let err = client.resolve(&video()).await.unwrap_err();
        assert!(matches!(
            err,
            ResolveError::Transport(TransportError::Decode { .. })
        ));
    }

    #[tokio::test]
    async fn test_all_unplayable_uses_last_response() {
        let (client, transport, sleeper) = client(vec![
            status("UNPLAYABLE", "a"),
            status("UNPLAYABLE", "b"),
            status("UNPLAYABLE", "c"),
        ]);
        let metadata = client.resolve(&video()).await.unwrap();
        assert_eq!(metadata.title, "from UNPLAYABLE");
        assert_eq!(metadata.profile, "IOS");
        assert!(metadata.formats.is_empty());
        assert_eq!(transport.client_names().len(), 3);
        assert_eq!(sleeper.sleeps().len(), 2);
    }

    #[tokio::test]
    async fn test_no_profiles_is_exhausted() {
        let transport = Arc::new(ScriptedTransport::default());
        let client = NegotiationClient::new(
            transport,
            Vec::new(),
            HeaderPool::default(),
            Arc::new(FixedRandom::default()),
        );
        let err = client.resolve(&video()).await.unwrap_err();
        assert!(matches!(err, ResolveError::AllProfilesExhausted { tried: 0, .. }));
    }
}
