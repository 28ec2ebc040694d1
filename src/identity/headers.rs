//! Randomized request headers.

use std::collections::BTreeMap;

use super::profile::ClientProfile;
use super::random::RandomSource;

/// Default browser user agents rotated across requests.
const DEFAULT_USER_AGENTS: [&str; 4] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
];

const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";
const PLATFORM_ORIGIN: &str = "https://www.youtube.com";

/// What a request is for. Determines the header set attached to it.
#[derive(Debug, Clone, Copy)]
pub enum RequestPurpose<'a> {
    /// Page-style navigation, also used for raw stream downloads.
    Browse,
    /// JSON call to the player endpoint under the given client profile.
    ApiCall(&'a ClientProfile),
}

/// Immutable pool of user agents from which each request draws one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderPool {
    user_agents: Vec<String>,
}

impl Default for HeaderPool {
    fn default() -> Self {
        Self {
            user_agents: DEFAULT_USER_AGENTS.iter().map(ToString::to_string).collect(),
        }
    }
}

impl HeaderPool {
    /// Creates a pool from custom user agents. An empty list falls back to the
    /// built-in pool so header generation always has an agent to pick.
    #[must_use]
    pub fn with_user_agents(user_agents: Vec<String>) -> Self {
        if user_agents.is_empty() {
            return Self::default();
        }
        Self { user_agents }
    }

    /// Returns the configured user agents.
    #[must_use]
    pub fn user_agents(&self) -> &[String] {
        &self.user_agents
    }

    /// Builds a fresh header set for one request.
    ///
    /// The user agent is drawn uniformly from the pool via `random`; nothing
    /// is retained between calls.
    #[must_use]
    pub fn next_headers(
        &self,
        purpose: RequestPurpose<'_>,
        random: &dyn RandomSource,
    ) -> BTreeMap<String, String> {
        let index = random.index(self.user_agents.len());
        let user_agent = self
            .user_agents
            .get(index)
            .cloned()
            .unwrap_or_else(|| DEFAULT_USER_AGENTS[0].to_string());

        let mut headers = BTreeMap::new();
        headers.insert("User-Agent".to_string(), user_agent);
        headers.insert("Accept-Language".to_string(), ACCEPT_LANGUAGE.to_string());

        match purpose {
            RequestPurpose::Browse => {
                for (name, value) in [
                    (
                        "Accept",
                        "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
                    ),
                    ("Connection", "keep-alive"),
                    ("Upgrade-Insecure-Requests", "1"),
                    ("Sec-Fetch-Dest", "document"),
                    ("Sec-Fetch-Mode", "navigate"),
                    ("Sec-Fetch-Site", "none"),
                    ("Cache-Control", "max-age=0"),
                ] {
                    headers.insert(name.to_string(), value.to_string());
                }
            }
            RequestPurpose::ApiCall(profile) => {
                headers.insert("Accept".to_string(), "application/json".to_string());
                headers.insert("Content-Type".to_string(), "application/json".to_string());
                headers.insert("Origin".to_string(), PLATFORM_ORIGIN.to_string());
                headers.insert(
                    "X-YouTube-Client-Name".to_string(),
                    profile.name_id.to_string(),
                );
                headers.insert(
                    "X-YouTube-Client-Version".to_string(),
                    profile.version.clone(),
                );
            }
        }

        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::random::{FixedRandom, ThreadRandom};

    #[test]
    fn test_browse_headers_use_navigation_set() {
        let pool = HeaderPool::default();
        let headers = pool.next_headers(RequestPurpose::Browse, &FixedRandom::default());
        assert_eq!(headers["User-Agent"], DEFAULT_USER_AGENTS[0]);
        assert!(headers["Accept"].starts_with("text/html"));
        assert_eq!(headers["Sec-Fetch-Mode"], "navigate");
        assert!(!headers.contains_key("X-YouTube-Client-Name"));
    }

    #[test]
    fn test_api_headers_carry_profile_identity() {
        let pool = HeaderPool::default();
        let profile = ClientProfile::web();
        let headers = pool.next_headers(RequestPurpose::ApiCall(&profile), &FixedRandom::default());
        assert_eq!(headers["Accept"], "application/json");
        assert_eq!(headers["X-YouTube-Client-Name"], "1");
        assert_eq!(headers["X-YouTube-Client-Version"], "2.20240201.00.00");
        assert!(!headers.contains_key("Sec-Fetch-Mode"));
    }

    #[test]
    fn test_user_agent_follows_random_index() {
        let pool = HeaderPool::default();
        let headers = pool.next_headers(RequestPurpose::Browse, &FixedRandom::new(3, 0.0));
        assert_eq!(headers["User-Agent"], DEFAULT_USER_AGENTS[3]);
    }

    #[test]
    fn test_user_agent_always_from_pool() {
        let pool = HeaderPool::with_user_agents(vec!["a".to_string(), "b".to_string()]);
        for _ in 0..50 {
            let headers = pool.next_headers(RequestPurpose::Browse, &ThreadRandom);
            assert!(matches!(headers["User-Agent"].as_str(), "a" | "b"));
        }
    }

    #[test]
    fn test_empty_pool_falls_back_to_defaults() {
        let pool = HeaderPool::with_user_agents(Vec::new());
        assert_eq!(pool.user_agents().len(), DEFAULT_USER_AGENTS.len());
    }
}
