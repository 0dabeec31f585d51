//! Client configuration

use std::time::Duration;

use shared::message::NoticePosition;

use crate::error::{ClientError, ClientResult};
use crate::feed::DEFAULT_FEED_CAPACITY;

/// Durations and placement for notices raised by the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeConfig {
    pub position: NoticePosition,
    /// Confirmations and warnings for the user's own votes
    pub vote_duration: Duration,
    /// Other users' vote activity
    pub activity_duration: Duration,
}

impl Default for NoticeConfig {
    fn default() -> Self {
        Self {
            position: NoticePosition::BottomRight,
            vote_duration: Duration::from_millis(3000),
            activity_duration: Duration::from_millis(4000),
        }
    }
}

/// Client configuration for talking to the hosted backend
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL (e.g., "https://project.example.co")
    pub base_url: String,

    /// Public API key, sent as `apikey` and bearer token
    pub api_key: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Capacity of the in-process change feed
    pub feed_capacity: usize,

    /// Where unauthenticated voters are sent
    pub sign_in_route: String,

    /// Name used for the current user when nobody is signed in
    pub anonymous_name: String,

    pub notices: NoticeConfig,
}

impl ClientConfig {
    /// Create a new configuration for the given backend
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            timeout: 30,
            feed_capacity: DEFAULT_FEED_CAPACITY,
            sign_in_route: "/".to_string(),
            anonymous_name: "Anonymous User".to_string(),
            notices: NoticeConfig::default(),
        }
    }

    /// Load from environment variables.
    ///
    /// `CANTEEN_BASE_URL` is required; `CANTEEN_API_KEY`,
    /// `CANTEEN_TIMEOUT_SECS`, `CANTEEN_FEED_CAPACITY` and
    /// `CANTEEN_SIGN_IN_ROUTE` are optional.
    pub fn from_env() -> ClientResult<Self> {
        let base_url = std::env::var("CANTEEN_BASE_URL")
            .map_err(|_| ClientError::Config("CANTEEN_BASE_URL is not set".into()))?;
        let mut config = Self::new(base_url);

        if let Ok(key) = std::env::var("CANTEEN_API_KEY") {
            config = config.with_api_key(key);
        }
        if let Some(secs) = parse_env::<u64>("CANTEEN_TIMEOUT_SECS")? {
            config = config.with_timeout(secs);
        }
        if let Some(capacity) = parse_env::<usize>("CANTEEN_FEED_CAPACITY")? {
            config = config.with_feed_capacity(capacity);
        }
        if let Ok(route) = std::env::var("CANTEEN_SIGN_IN_ROUTE") {
            config = config.with_sign_in_route(route);
        }
        Ok(config)
    }

    /// Set the API key
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the change feed capacity (minimum 1)
    pub fn with_feed_capacity(mut self, capacity: usize) -> Self {
        self.feed_capacity = capacity.max(1);
        self
    }

    /// Set the sign-in route
    pub fn with_sign_in_route(mut self, route: impl Into<String>) -> Self {
        self.sign_in_route = route.into();
        self
    }

    /// Set notice placement and durations
    pub fn with_notices(mut self, notices: NoticeConfig) -> Self {
        self.notices = notices;
        self
    }

    /// Request timeout as a [`Duration`]
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:54321")
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> ClientResult<Option<T>> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ClientError::Config(format!("{key} has an invalid value: {raw}"))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = ClientConfig::new("https://example.test")
            .with_api_key("anon")
            .with_timeout(5)
            .with_feed_capacity(0)
            .with_sign_in_route("/login");

        assert_eq!(config.api_key.as_deref(), Some("anon"));
        assert_eq!(config.timeout_duration(), Duration::from_secs(5));
        assert_eq!(config.feed_capacity, 1);
        assert_eq!(config.sign_in_route, "/login");
        assert_eq!(config.anonymous_name, "Anonymous User");
    }

    #[test]
    fn test_notice_defaults() {
        let notices = NoticeConfig::default();
        assert_eq!(notices.vote_duration, Duration::from_secs(3));
        assert_eq!(notices.activity_duration, Duration::from_secs(4));
        assert_eq!(notices.position, NoticePosition::BottomRight);
    }
}
