//! Ipregistry error types

use serde::{Deserialize, Serialize};

/// Ipregistry error types
#[derive(Debug, thiserror::Error)]
pub enum IpregistryError {
    /// The service rejected the request itself (bad key, invalid or
    /// disabled API credential, exhausted quota, …).
    ///
    /// Decoded from the error body of a non-2xx response. Never retried.
    #[error("API error ({code}): {message}")]
    Api {
        /// Machine-readable error code, see [`codes`].
        code: String,
        message: String,
        /// Hint on how to resolve the error.
        resolution: String,
    },

    /// The exchange could not be completed at all: timeout after exhausting
    /// retries, malformed response, or a transport-level fault.
    #[error("client error: {0}")]
    Client(String),
}

impl IpregistryError {
    pub(crate) fn client(message: impl Into<String>) -> Self {
        IpregistryError::Client(message.into())
    }
}

/// Per-item error inside a batch result.
///
/// Unlike [`IpregistryError::Api`], a `LookupError` is data, not a failure:
/// the service flagged one specific input of a batch as erroneous and the
/// rest of the batch is unaffected. See
/// [`LookupResult`](crate::LookupResult).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupError {
    /// Machine-readable error code, see [`codes`].
    pub code: String,
    pub message: String,
    /// Hint on how to resolve the error.
    pub resolution: String,
}

impl std::fmt::Display for LookupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code)
    }
}

/// Well-known error codes returned by the Ipregistry API.
///
/// The service may introduce new codes at any time; match on these
/// constants rather than exhaustively.
pub mod codes {
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
    pub const DISABLED_API_KEY: &str = "DISABLED_API_KEY";
    pub const FORBIDDEN_IP: &str = "FORBIDDEN_IP";
    pub const FORBIDDEN_ORIGIN: &str = "FORBIDDEN_ORIGIN";
    pub const FORBIDDEN_IP_ORIGIN: &str = "FORBIDDEN_IP_ORIGIN";
    pub const INTERNAL: &str = "INTERNAL";
    pub const INSUFFICIENT_CREDITS: &str = "INSUFFICIENT_CREDITS";
    pub const INVALID_API_KEY: &str = "INVALID_API_KEY";
    pub const INVALID_FILTER_SYNTAX: &str = "INVALID_FILTER_SYNTAX";
    pub const INVALID_IP_ADDRESS: &str = "INVALID_IP_ADDRESS";
    pub const MISSING_API_KEY: &str = "MISSING_API_KEY";
    pub const RESERVED_IP_ADDRESS: &str = "RESERVED_IP_ADDRESS";
    pub const TOO_MANY_IPS: &str = "TOO_MANY_IPS";
    pub const TOO_MANY_REQUESTS: &str = "TOO_MANY_REQUESTS";
    pub const TOO_MANY_USER_AGENTS: &str = "TOO_MANY_USER_AGENTS";
}

/// Result type alias for Ipregistry operations
pub type Result<T> = std::result::Result<T, IpregistryError>;
