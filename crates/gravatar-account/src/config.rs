//! Client configuration.

use std::time::Duration;

use gravatar_xmlrpc::DEFAULT_TIMEOUT;

/// Gravatar XML-RPC endpoint.
pub const API_ENDPOINT: &str = "https://secure.gravatar.com/xmlrpc";

/// Default `User-Agent` header.
pub const DEFAULT_USER_AGENT: &str = concat!("gravatar-account/", env!("CARGO_PKG_VERSION"));

/// Account client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base endpoint; `?user=<hash>` is appended per account.
    pub endpoint: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// `User-Agent` header sent with each request.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: API_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    /// Creates a configuration builder.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Sets the base endpoint.
    #[must_use]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = endpoint.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Sets the `User-Agent` header.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.endpoint, "https://secure.gravatar.com/xmlrpc");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("gravatar-account/"));
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::builder()
            .endpoint("http://localhost:8080/xmlrpc")
            .timeout(Duration::from_secs(5))
            .user_agent("tests")
            .build();

        assert_eq!(config.endpoint, "http://localhost:8080/xmlrpc");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "tests");
    }
}
