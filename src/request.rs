//! Transport adapter: one logical remote exchange per invocation.
//!
//! [`DefaultRequestHandler`] translates each operation into a single HTTP
//! call, bounded by the configured timeout. Timeouts are retried with
//! exponential backoff up to [`RetryPolicy::max_retries`]; every other
//! failure surfaces immediately. Non-2xx responses are decoded into
//! [`IpregistryError::Api`]; anything that prevents completing the
//! exchange at all becomes [`IpregistryError::Client`].
//!
//! Credit and throttling accounting is extracted from response headers;
//! an absent or non-numeric header yields `None`, never a fabricated
//! zero.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap};
use reqwest::{Method, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::IpregistryConfig;
use crate::error::{IpregistryError, LookupError, Result};
use crate::model::{
    AutonomousSystem, IpInfo, RequesterAutonomousSystem, RequesterIpInfo, UserAgent,
};
use crate::options::LookupOption;
use crate::response::{ApiResponse, BatchResult, Credits, LookupResult, Throttling};
use crate::telemetry;

const USER_AGENT: &str = concat!("Ipregistry/Rust/", env!("CARGO_PKG_VERSION"));

const HEADER_CREDITS_CONSUMED: &str = "ipregistry-credits-consumed";
const HEADER_CREDITS_REMAINING: &str = "ipregistry-credits-remaining";
const HEADER_RATE_LIMIT: &str = "x-rate-limit-limit";
const HEADER_RATE_REMAINING: &str = "x-rate-limit-remaining";
const HEADER_RATE_RESET: &str = "x-rate-limit-reset";

/// Retry behaviour for timed-out exchanges.
///
/// Only timeout-class failures are retried; API rejections and other
/// transport faults never are. Uses exponential backoff capped at a
/// ceiling:
///
/// ```rust
/// # use ipregistry::RetryPolicy;
/// # use std::time::Duration;
/// let policy = RetryPolicy::new()
///     .max_retries(4)
///     .base_delay(Duration::from_millis(100));
/// assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(200));
/// ```
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries beyond the initial attempt. 0 = fail on first timeout.
    /// Default: 2.
    pub max_retries: u32,
    /// Delay before the first retry. Default: 150ms.
    pub base_delay: Duration,
    /// Cap on the computed backoff delay. Default: 5s.
    pub backoff_ceiling: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(150),
            backoff_ceiling: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Create a policy with the default bounds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a policy that fails on the first timeout.
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Set the number of retries beyond the initial attempt.
    pub fn max_retries(mut self, n: u32) -> Self {
        self.max_retries = n;
        self
    }

    /// Set the delay before the first retry.
    pub fn base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Set the cap on the computed backoff delay.
    pub fn backoff_ceiling(mut self, ceiling: Duration) -> Self {
        self.backoff_ceiling = ceiling;
        self
    }

    /// Delay before retry number `attempt` (1-indexed).
    ///
    /// `base_delay * 2^(attempt - 1)`, capped at `backoff_ceiling`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay = self
            .base_delay
            .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)));
        delay.min(self.backoff_ceiling)
    }
}

/// The remote-exchange contract consumed by
/// [`IpregistryClient`](crate::IpregistryClient).
///
/// Each method performs exactly one logical exchange and returns the
/// decoded payload wrapped in header-derived accounting. Batch results
/// preserve submission order, one entry per submitted value.
#[async_trait]
pub trait RequestHandler: Send + Sync {
    async fn lookup_ip(&self, ip: &str, options: &[LookupOption]) -> Result<ApiResponse<IpInfo>>;

    async fn lookup_asn(
        &self,
        asn: u32,
        options: &[LookupOption],
    ) -> Result<ApiResponse<AutonomousSystem>>;

    async fn batch_lookup_ips(
        &self,
        ips: &[&str],
        options: &[LookupOption],
    ) -> Result<ApiResponse<BatchResult<LookupResult<IpInfo>>>>;

    async fn batch_lookup_asns(
        &self,
        asns: &[u32],
        options: &[LookupOption],
    ) -> Result<ApiResponse<BatchResult<LookupResult<AutonomousSystem>>>>;

    async fn origin_lookup_ip(
        &self,
        options: &[LookupOption],
    ) -> Result<ApiResponse<RequesterIpInfo>>;

    async fn origin_lookup_asn(
        &self,
        options: &[LookupOption],
    ) -> Result<ApiResponse<RequesterAutonomousSystem>>;

    async fn parse_user_agents(
        &self,
        user_agents: &[&str],
    ) -> Result<ApiResponse<BatchResult<UserAgent>>>;
}

/// Default [`RequestHandler`] over reqwest.
pub struct DefaultRequestHandler {
    config: IpregistryConfig,
    http: reqwest::Client,
    retry: RetryPolicy,
}

impl DefaultRequestHandler {
    /// Create a handler for the given config with the default retry policy.
    pub fn new(config: IpregistryConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
            retry: RetryPolicy::default(),
        }
    }

    /// Override the retry policy.
    pub fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn build_url(&self, path: &str, options: &[LookupOption]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/{}", self.config.base_url, path))
            .map_err(|e| IpregistryError::client(format!("invalid request URL: {e}")))?;
        if !options.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for option in options {
                pairs.append_pair(&option.name, &option.value);
            }
        }
        Ok(url)
    }

    /// Perform one logical exchange, retrying timeouts with backoff.
    async fn execute<T, B>(
        &self,
        method: Method,
        path: &str,
        options: &[LookupOption],
        body: Option<&B>,
        operation: &'static str,
    ) -> Result<ApiResponse<T>>
    where
        T: DeserializeOwned,
        B: Serialize + Sync + ?Sized,
    {
        let url = self.build_url(path, options)?;
        let mut attempt: u32 = 0;

        loop {
            debug!(operation, %url, attempt, "sending request");
            let mut request = self
                .http
                .request(method.clone(), url.clone())
                .header(
                    header::AUTHORIZATION,
                    format!("ApiKey {}", self.config.api_key),
                )
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::USER_AGENT, USER_AGENT)
                .timeout(self.config.timeout);
            if let Some(body) = body {
                request = request.json(body);
            }

            match request.send().await {
                Ok(response) => {
                    let status = if response.status().is_success() {
                        "ok"
                    } else {
                        "error"
                    };
                    metrics::counter!(telemetry::REQUESTS_TOTAL,
                        "operation" => operation, "status" => status)
                    .increment(1);
                    return build_envelope(response).await;
                }
                Err(e) if e.is_timeout() => {
                    attempt += 1;
                    if attempt > self.retry.max_retries {
                        metrics::counter!(telemetry::REQUESTS_TOTAL,
                            "operation" => operation, "status" => "error")
                        .increment(1);
                        return Err(IpregistryError::client(format!(
                            "request timed out after {} retries",
                            self.retry.max_retries
                        )));
                    }
                    metrics::counter!(telemetry::RETRIES_TOTAL, "operation" => operation)
                        .increment(1);
                    let delay = self.retry.delay_for_attempt(attempt);
                    warn!(
                        operation,
                        attempt,
                        max_retries = self.retry.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        "request timed out, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    metrics::counter!(telemetry::REQUESTS_TOTAL,
                        "operation" => operation, "status" => "error")
                    .increment(1);
                    return Err(IpregistryError::Client(e.to_string()));
                }
            }
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        options: &[LookupOption],
        operation: &'static str,
    ) -> Result<ApiResponse<T>> {
        self.execute(Method::GET, path, options, Option::<&[String]>::None, operation)
            .await
    }

    async fn post<T, B>(
        &self,
        path: &str,
        options: &[LookupOption],
        body: &B,
        operation: &'static str,
    ) -> Result<ApiResponse<T>>
    where
        T: DeserializeOwned,
        B: Serialize + Sync + ?Sized,
    {
        self.execute(Method::POST, path, options, Some(body), operation)
            .await
    }
}

#[async_trait]
impl RequestHandler for DefaultRequestHandler {
    async fn lookup_ip(&self, ip: &str, options: &[LookupOption]) -> Result<ApiResponse<IpInfo>> {
        self.get(ip, options, "lookup_ip").await
    }

    async fn lookup_asn(
        &self,
        asn: u32,
        options: &[LookupOption],
    ) -> Result<ApiResponse<AutonomousSystem>> {
        self.get(&format!("AS{asn}"), options, "lookup_asn").await
    }

    async fn batch_lookup_ips(
        &self,
        ips: &[&str],
        options: &[LookupOption],
    ) -> Result<ApiResponse<BatchResult<LookupResult<IpInfo>>>> {
        self.post("", options, ips, "batch_lookup_ips").await
    }

    async fn batch_lookup_asns(
        &self,
        asns: &[u32],
        options: &[LookupOption],
    ) -> Result<ApiResponse<BatchResult<LookupResult<AutonomousSystem>>>> {
        let rendered: Vec<String> = asns.iter().map(|asn| format!("AS{asn}")).collect();
        self.post("", options, &rendered, "batch_lookup_asns").await
    }

    async fn origin_lookup_ip(
        &self,
        options: &[LookupOption],
    ) -> Result<ApiResponse<RequesterIpInfo>> {
        self.get("", options, "origin_lookup_ip").await
    }

    async fn origin_lookup_asn(
        &self,
        options: &[LookupOption],
    ) -> Result<ApiResponse<RequesterAutonomousSystem>> {
        self.get("AS", options, "origin_lookup_asn").await
    }

    async fn parse_user_agents(
        &self,
        user_agents: &[&str],
    ) -> Result<ApiResponse<BatchResult<UserAgent>>> {
        self.post("user_agent", &[], user_agents, "parse_user_agents")
            .await
    }
}

/// Decode a completed HTTP response into an envelope or a typed error.
async fn build_envelope<T: DeserializeOwned>(response: reqwest::Response) -> Result<ApiResponse<T>> {
    let status = response.status();
    if !status.is_success() {
        // The service describes rejections in the error body.
        let error: LookupError = response.json().await.map_err(|e| {
            IpregistryError::client(format!("undecodable error response (HTTP {status}): {e}"))
        })?;
        return Err(IpregistryError::Api {
            code: error.code,
            message: error.message,
            resolution: error.resolution,
        });
    }

    let consumed = parse_count(response.headers(), HEADER_CREDITS_CONSUMED);
    let remaining = parse_count(response.headers(), HEADER_CREDITS_REMAINING);
    let throttling = Throttling::from_parts(
        parse_count(response.headers(), HEADER_RATE_LIMIT),
        parse_count(response.headers(), HEADER_RATE_REMAINING),
        parse_count(response.headers(), HEADER_RATE_RESET),
    );

    let data = response
        .json()
        .await
        .map_err(|e| IpregistryError::client(format!("failed to decode response body: {e}")))?;

    Ok(ApiResponse {
        credits: Credits {
            consumed,
            remaining,
        },
        data,
        throttling,
    })
}

/// Parse a numeric response header. Absent or non-numeric → `None`.
fn parse_count(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IpregistryConfig;

    fn handler() -> DefaultRequestHandler {
        DefaultRequestHandler::new(IpregistryConfig::new("test-key"))
    }

    #[test]
    fn url_without_options_has_no_query() {
        let url = handler().build_url("8.8.8.8", &[]).unwrap();
        assert_eq!(url.as_str(), "https://api.ipregistry.co/8.8.8.8");
    }

    #[test]
    fn url_appends_options_in_call_order() {
        let options = [
            LookupOption::hostname(true),
            LookupOption::filter("currency"),
        ];
        let url = handler().build_url("8.8.8.8", &options).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.ipregistry.co/8.8.8.8?hostname=true&fields=currency"
        );
    }

    #[test]
    fn url_empty_path_targets_root() {
        let url = handler().build_url("", &[]).unwrap();
        assert_eq!(url.as_str(), "https://api.ipregistry.co/");
    }

    #[test]
    fn backoff_doubles_per_attempt() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(150));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(300));
        assert_eq!(policy.delay_for_attempt(3), Duration::from_millis(600));
    }

    #[test]
    fn backoff_capped_at_ceiling() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for_attempt(12), Duration::from_secs(5));
    }

    #[test]
    fn parse_count_rejects_garbage() {
        let mut headers = HeaderMap::new();
        headers.insert(HEADER_CREDITS_CONSUMED, "not-a-number".parse().unwrap());
        headers.insert(HEADER_CREDITS_REMAINING, "17".parse().unwrap());

        assert_eq!(parse_count(&headers, HEADER_CREDITS_CONSUMED), None);
        assert_eq!(parse_count(&headers, HEADER_CREDITS_REMAINING), Some(17));
        assert_eq!(parse_count(&headers, HEADER_RATE_LIMIT), None);
    }
}
