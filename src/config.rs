//! Client configuration: credential, endpoint, and timeout.

use std::time::Duration;

/// Default API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.ipregistry.co";

/// Regional endpoint serving requests from the European Union.
pub const EU_BASE_URL: &str = "https://eu.api.ipregistry.co";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Immutable configuration for an [`IpregistryClient`](crate::IpregistryClient).
///
/// Built once via [`IpregistryConfigBuilder`]; the client never mutates it.
///
/// ```rust
/// # use ipregistry::IpregistryConfig;
/// # use std::time::Duration;
/// let config = IpregistryConfig::builder("my-api-key")
///     .eu_base_url()
///     .timeout(Duration::from_secs(5))
///     .build();
/// assert!(config.base_url.starts_with("https://eu."));
/// ```
#[derive(Debug, Clone)]
pub struct IpregistryConfig {
    /// API key attached to every request as `authorization: ApiKey <key>`.
    pub api_key: String,
    /// Base endpoint URL, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout. Exceeding it triggers the transport adapter's
    /// bounded retry, not an immediate failure.
    pub timeout: Duration,
}

impl IpregistryConfig {
    /// Create a config with default endpoint and timeout.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::builder(api_key).build()
    }

    /// Create a builder for customizing endpoint and timeout.
    pub fn builder(api_key: impl Into<String>) -> IpregistryConfigBuilder {
        IpregistryConfigBuilder::new(api_key)
    }
}

/// Builder producing an [`IpregistryConfig`].
#[derive(Debug, Clone)]
pub struct IpregistryConfigBuilder {
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl IpregistryConfigBuilder {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set a custom base endpoint URL. A trailing slash is stripped.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        let url = base_url.into();
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Use the European Union regional endpoint.
    pub fn eu_base_url(self) -> Self {
        self.base_url(EU_BASE_URL)
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the immutable config.
    pub fn build(self) -> IpregistryConfig {
        IpregistryConfig {
            api_key: self.api_key,
            base_url: self.base_url,
            timeout: self.timeout,
        }
    }
}
