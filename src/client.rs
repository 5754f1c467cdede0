//! The client: dispatch coordination between cache and transport.
//!
//! Every lookup follows one partition–fetch–reassemble pattern: probe the
//! cache for each requested key, send the misses (and only the misses) to
//! the transport adapter in a single call, then rebuild the result in the
//! caller's order, mixing cached entries, fresh entries, and per-item
//! errors. At most one remote round-trip happens per operation, whatever
//! the batch size.

use std::future::Future;
use std::sync::Arc;

use tracing::debug;

use crate::cache::{Cacheable, LookupCache, NoCache, compose_key};
use crate::config::IpregistryConfig;
use crate::error::{IpregistryError, Result};
use crate::model::{AutonomousSystem, IpInfo, RequesterAutonomousSystem, RequesterIpInfo, UserAgent};
use crate::options::LookupOption;
use crate::request::{DefaultRequestHandler, RequestHandler};
use crate::response::{ApiResponse, BatchResult, LookupResult};
use crate::telemetry;

/// Client for the Ipregistry API.
///
/// Owns its cache and transport adapter for its whole lifetime; neither is
/// shared across client instances. Successful lookups are cached under the
/// requested identifier plus the query options
/// (see [`compose_key`](crate::cache::compose_key)), so the same key looked
/// up with different options occupies distinct entries.
///
/// Payloads are handed out as [`Arc`]s: repeated cache hits return the same
/// allocation, never a copy.
pub struct IpregistryClient {
    config: IpregistryConfig,
    cache: Box<dyn LookupCache>,
    handler: Box<dyn RequestHandler>,
}

impl IpregistryClient {
    /// Create a client with default configuration and no caching.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_config(IpregistryConfig::new(api_key))
    }

    /// Create a client from an explicit config, with no caching.
    ///
    /// Attach a real cache with [`cache_store`](Self::cache_store), e.g.:
    ///
    /// ```rust
    /// # use ipregistry::{DefaultCache, IpregistryClient, IpregistryConfig};
    /// let client = IpregistryClient::with_config(IpregistryConfig::new("my-key"))
    ///     .cache_store(DefaultCache::default());
    /// ```
    pub fn with_config(config: IpregistryConfig) -> Self {
        let handler = DefaultRequestHandler::new(config.clone());
        Self {
            config,
            cache: Box::new(NoCache),
            handler: Box::new(handler),
        }
    }

    /// Replace the cache implementation (default: [`NoCache`]).
    pub fn cache_store(mut self, cache: impl LookupCache + 'static) -> Self {
        self.cache = Box::new(cache);
        self
    }

    /// Replace the transport adapter (default: [`DefaultRequestHandler`]).
    pub fn request_handler(mut self, handler: impl RequestHandler + 'static) -> Self {
        self.handler = Box::new(handler);
        self
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &IpregistryConfig {
        &self.config
    }

    /// The cache backing this client, for explicit invalidation.
    pub fn cache(&self) -> &dyn LookupCache {
        self.cache.as_ref()
    }

    /// Look up intelligence for one IP address.
    ///
    /// Served from cache when a matching entry exists (zero credits
    /// consumed); otherwise fetched remotely and cached.
    pub async fn lookup_ip(
        &self,
        ip: &str,
        options: &[LookupOption],
    ) -> Result<ApiResponse<Arc<IpInfo>>> {
        self.lookup_single(compose_key(ip, options), "lookup_ip", || {
            self.handler.lookup_ip(ip, options)
        })
        .await
    }

    /// Look up one autonomous system by number.
    pub async fn lookup_asn(
        &self,
        asn: u32,
        options: &[LookupOption],
    ) -> Result<ApiResponse<Arc<AutonomousSystem>>> {
        self.lookup_single(compose_key(&asn.to_string(), options), "lookup_asn", || {
            self.handler.lookup_asn(asn, options)
        })
        .await
    }

    /// Look up intelligence for the caller's own address, as seen by the
    /// service.
    ///
    /// The result is cached under a key derived from the options alone.
    /// Callers relying on this across network changes must invalidate
    /// explicitly, e.g. `client.cache().invalidate_all()`.
    pub async fn origin_lookup_ip(
        &self,
        options: &[LookupOption],
    ) -> Result<ApiResponse<Arc<RequesterIpInfo>>> {
        self.lookup_single(compose_key("", options), "origin_lookup_ip", || {
            self.handler.origin_lookup_ip(options)
        })
        .await
    }

    /// Look up the autonomous system announcing the caller's own address.
    ///
    /// Cached like [`origin_lookup_ip`](Self::origin_lookup_ip).
    pub async fn origin_lookup_asn(
        &self,
        options: &[LookupOption],
    ) -> Result<ApiResponse<Arc<RequesterAutonomousSystem>>> {
        self.lookup_single(compose_key("AS", options), "origin_lookup_asn", || {
            self.handler.origin_lookup_asn(options)
        })
        .await
    }

    /// Look up a batch of IP addresses in at most one remote round-trip.
    ///
    /// The output has one slot per input, in input order: a payload for
    /// keys that resolved (from cache or fresh), or a
    /// [`LookupResult::Error`] for keys the service flagged individually.
    /// Duplicate inputs are not deduplicated; two uncached copies of a key
    /// are both submitted remotely.
    ///
    /// Errors are raised only for failures affecting the whole exchange
    /// (bad credential, exhausted retries); per-item problems never abort
    /// the batch.
    pub async fn batch_lookup_ips(
        &self,
        ips: &[&str],
        options: &[LookupOption],
    ) -> Result<ApiResponse<Vec<LookupResult<Arc<IpInfo>>>>> {
        self.lookup_batch(ips, options, "batch_lookup_ips", |misses| async move {
            self.handler.batch_lookup_ips(&misses, options).await
        })
        .await
    }

    /// Look up a batch of autonomous systems in at most one remote
    /// round-trip. Same slot semantics as
    /// [`batch_lookup_ips`](Self::batch_lookup_ips).
    pub async fn batch_lookup_asns(
        &self,
        asns: &[u32],
        options: &[LookupOption],
    ) -> Result<ApiResponse<Vec<LookupResult<Arc<AutonomousSystem>>>>> {
        self.lookup_batch(asns, options, "batch_lookup_asns", |misses| async move {
            self.handler.batch_lookup_asns(&misses, options).await
        })
        .await
    }

    /// Parse one or more raw `User-Agent` header values.
    ///
    /// Stateless pass-through: never cached, one parsed record per input
    /// string in input order. Malformed strings yield a best-effort parse,
    /// not a per-item error. The service rejects an empty input list.
    pub async fn parse_user_agents(
        &self,
        user_agents: &[&str],
    ) -> Result<ApiResponse<Vec<UserAgent>>> {
        let response = self.handler.parse_user_agents(user_agents).await?;
        Ok(response.map(|batch| batch.results))
    }

    /// Single-item pattern: probe, fetch on miss, cache the fresh payload
    /// under the requested key.
    async fn lookup_single<T, F, Fut>(
        &self,
        cache_key: String,
        operation: &'static str,
        fetch: F,
    ) -> Result<ApiResponse<Arc<T>>>
    where
        T: Cacheable,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<ApiResponse<T>>>,
    {
        if let Some(hit) = self.cache.get(&cache_key).and_then(T::from_cached) {
            metrics::counter!(telemetry::CACHE_HITS_TOTAL, "operation" => operation).increment(1);
            debug!(operation, cache_key, "served from cache");
            return Ok(ApiResponse::from_cache(hit));
        }
        metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "operation" => operation).increment(1);

        let response = fetch().await?.map(Arc::new);
        self.cache
            .put(&cache_key, T::into_cached(response.data.clone()));
        Ok(response)
    }

    /// Batch pattern: one cache-probe pass over every input, one remote
    /// call for the misses, one reassembly pass in input order.
    ///
    /// All cache reads happen before any write, so duplicate keys within
    /// one call do not see each other's results.
    async fn lookup_batch<K, T, F, Fut>(
        &self,
        keys: &[K],
        options: &[LookupOption],
        operation: &'static str,
        fetch: F,
    ) -> Result<ApiResponse<Vec<LookupResult<Arc<T>>>>>
    where
        K: Clone + ToString,
        T: Cacheable,
        F: FnOnce(Vec<K>) -> Fut,
        Fut: Future<Output = Result<ApiResponse<BatchResult<LookupResult<T>>>>>,
    {
        let mut slots: Vec<Option<Arc<T>>> = Vec::with_capacity(keys.len());
        let mut misses: Vec<K> = Vec::new();

        for key in keys {
            let cache_key = compose_key(&key.to_string(), options);
            match self.cache.get(&cache_key).and_then(T::from_cached) {
                Some(hit) => {
                    metrics::counter!(telemetry::CACHE_HITS_TOTAL, "operation" => operation)
                        .increment(1);
                    slots.push(Some(hit));
                }
                None => {
                    metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "operation" => operation)
                        .increment(1);
                    misses.push(key.clone());
                    slots.push(None);
                }
            }
        }

        let miss_count = misses.len();
        debug!(
            operation,
            total = keys.len(),
            misses = miss_count,
            "batch partitioned"
        );

        let (accounting, fresh) = if miss_count == 0 {
            (None, Vec::new())
        } else {
            let response = fetch(misses).await?;
            if response.data.results.len() != miss_count {
                return Err(IpregistryError::client(format!(
                    "batch response contained {} results, expected {}",
                    response.data.results.len(),
                    miss_count
                )));
            }
            (
                Some((response.credits, response.throttling)),
                response.data.results,
            )
        };
        let mut fresh = fresh.into_iter();

        let mut results = Vec::with_capacity(slots.len());
        for slot in slots {
            match slot {
                Some(hit) => results.push(LookupResult::Success(hit)),
                None => match fresh.next().expect("one fresh result per miss") {
                    LookupResult::Success(payload) => {
                        let payload = Arc::new(payload);
                        let cache_key = compose_key(&payload.cache_id(), options);
                        self.cache
                            .put(&cache_key, T::into_cached(payload.clone()));
                        results.push(LookupResult::Success(payload));
                    }
                    // Per-item errors are emitted in place, never cached.
                    LookupResult::Error(error) => results.push(LookupResult::Error(error)),
                },
            }
        }

        Ok(match accounting {
            Some((credits, throttling)) => ApiResponse {
                credits,
                data: results,
                throttling,
            },
            None => ApiResponse::from_cache(results),
        })
    }
}
