//! Telemetry metric name constants.
//!
//! Centralised metric names for client operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `ipregistry_` and counters end in
//! `_total`.
//!
//! # Common labels
//!
//! - `operation` — client operation (e.g. "lookup_ip", "batch_lookup_ips")
//! - `status` — outcome: "ok" or "error"

/// Total remote exchanges attempted by the transport adapter.
///
/// Labels: `operation`, `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "ipregistry_requests_total";

/// Total timeout retries (not counting the initial attempt).
///
/// Labels: `operation`.
pub const RETRIES_TOTAL: &str = "ipregistry_retries_total";

/// Total cache hits.
///
/// Labels: `operation`.
pub const CACHE_HITS_TOTAL: &str = "ipregistry_cache_hits_total";

/// Total cache misses.
///
/// Labels: `operation`.
pub const CACHE_MISSES_TOTAL: &str = "ipregistry_cache_misses_total";
