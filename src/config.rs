//! Client configuration.
//!
//! The API base URL and user agent are explicit configuration values handed
//! to the transport at construction time, so tests can point a client at a
//! fake backend without touching process globals.

/// Default base URL of the splits.io v4 API.
pub const API_URL: &str = "https://splits.io/api/v4/";

/// Default `User-Agent` header sent with every request.
pub const USER_AGENT: &str = concat!("splitsio-rs/", env!("CARGO_PKG_VERSION"));

/// Connection settings for a [`crate::Client`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL every endpoint is resolved against.
    pub base_url: String,
    /// Client identifier sent as the `User-Agent` header.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: API_URL.to_string(),
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    /// Create a config pointing at a custom base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Replace the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build a config from the environment, falling back to crate defaults.
    ///
    /// Recognized variables: `SPLITSIO_API_URL`, `SPLITSIO_USER_AGENT`.
    /// Empty values are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("SPLITSIO_API_URL") {
            if !url.is_empty() {
                config.base_url = url;
            }
        }
        if let Ok(agent) = std::env::var("SPLITSIO_USER_AGENT") {
            if !agent.is_empty() {
                config.user_agent = agent;
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_points_at_splitsio() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, API_URL);
        assert!(config.user_agent.starts_with("splitsio-rs/"));
    }

    #[test]
    fn test_custom_base_url_keeps_default_agent() {
        let config = ClientConfig::new("http://localhost:9000/api/v4/");
        assert_eq!(config.base_url, "http://localhost:9000/api/v4/");
        assert_eq!(config.user_agent, USER_AGENT);
    }

    #[test]
    fn test_with_user_agent() {
        let config = ClientConfig::default().with_user_agent("my-bot/2.0");
        assert_eq!(config.user_agent, "my-bot/2.0");
    }

    #[test]
    fn test_from_env_overrides_base_url() {
        std::env::set_var("SPLITSIO_API_URL", "http://localhost:9000/api/v4/");
        let config = ClientConfig::from_env();
        std::env::remove_var("SPLITSIO_API_URL");

        assert_eq!(config.base_url, "http://localhost:9000/api/v4/");
        assert_eq!(config.user_agent, USER_AGENT);
    }
}
