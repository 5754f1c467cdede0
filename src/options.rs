//! Query options attached to lookup requests.
//!
//! Options are ordered `(name, value)` pairs. They are sent as URL query
//! parameters and participate in cache-key composition, so two lookups
//! with different option sets are distinct cache entries even for the
//! same key. Option order is significant: no sorting or normalization
//! is applied.

/// A single query option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupOption {
    pub name: String,
    pub value: String,
}

impl LookupOption {
    /// Create an option with an arbitrary name and value.
    pub fn from(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Restrict the response to the given fields, e.g. `"location.country"`
    /// or a comma-separated list of field paths.
    pub fn filter(fields: impl Into<String>) -> Self {
        Self::from("fields", fields)
    }

    /// Request reverse-DNS hostname resolution for looked-up addresses.
    /// Slower and may consume additional credits.
    pub fn hostname(enabled: bool) -> Self {
        Self::from("hostname", enabled.to_string())
    }
}
