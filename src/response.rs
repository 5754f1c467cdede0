//! Response envelope: payload plus credit and throttling accounting.
//!
//! Every client operation returns an [`ApiResponse`]. For values served
//! from the network the accounting is extracted verbatim from response
//! headers by the transport adapter; for cache hits the envelope is the
//! zero-cost form built by [`ApiResponse::from_cache`].

use serde::{Deserialize, Serialize};

use crate::error::LookupError;

/// Credit accounting for one response.
///
/// Both fields are independently unknown: `remaining` is `None` whenever
/// the value was not served fresh (e.g. from cache), and either header may
/// be absent on a fresh response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Credits {
    /// Credits consumed to produce this response. `Some(0)` for cache hits.
    pub consumed: Option<u64>,
    /// Estimated credits remaining on the account.
    pub remaining: Option<u64>,
}

/// Rate-limit window state reported by the service.
///
/// Absent entirely (`None` on the envelope) unless the service signals a
/// rate-limit state for this call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Throttling {
    /// Requests allowed per time window.
    pub limit: u64,
    /// Requests remaining in the current window.
    pub remaining: u64,
    /// Seconds until the current window resets.
    pub reset: u64,
}

impl Throttling {
    /// Assemble a throttling block from individually-parsed header values.
    ///
    /// Returns `None` only when all three values are absent; if any one is
    /// present the missing ones default to zero.
    pub(crate) fn from_parts(
        limit: Option<u64>,
        remaining: Option<u64>,
        reset: Option<u64>,
    ) -> Option<Self> {
        if limit.is_none() && remaining.is_none() && reset.is_none() {
            return None;
        }
        Some(Self {
            limit: limit.unwrap_or(0),
            remaining: remaining.unwrap_or(0),
            reset: reset.unwrap_or(0),
        })
    }
}

/// Envelope wrapping a result payload with remote-call accounting.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub credits: Credits,
    pub data: T,
    pub throttling: Option<Throttling>,
}

impl<T> ApiResponse<T> {
    /// Zero-cost envelope for a value served from cache: no remote call
    /// occurred, so nothing was consumed and nothing is known about the
    /// remaining balance or rate-limit window.
    pub(crate) fn from_cache(data: T) -> Self {
        Self {
            credits: Credits {
                consumed: Some(0),
                remaining: None,
            },
            data,
            throttling: None,
        }
    }

    /// Replace the payload while keeping the accounting.
    pub(crate) fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse {
            credits: self.credits,
            data: f(self.data),
            throttling: self.throttling,
        }
    }
}

/// One slot of a batch lookup: a payload, or the per-item error the
/// service reported for that specific input.
///
/// On the wire the two shapes are distinguished structurally; the error
/// shape is tried first so a record can never be misread as an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LookupResult<T> {
    Error(LookupError),
    Success(T),
}

impl<T> LookupResult<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, LookupResult::Success(_))
    }

    /// The payload, if this slot succeeded.
    pub fn success(&self) -> Option<&T> {
        match self {
            LookupResult::Success(value) => Some(value),
            LookupResult::Error(_) => None,
        }
    }

    /// The per-item error, if this slot failed.
    pub fn lookup_error(&self) -> Option<&LookupError> {
        match self {
            LookupResult::Error(error) => Some(error),
            LookupResult::Success(_) => None,
        }
    }
}

/// Wire wrapper around batch results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult<T> {
    pub results: Vec<T>,
}
