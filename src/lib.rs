//! Ipregistry - client for the Ipregistry IP intelligence API
//!
//! This crate wraps the Ipregistry REST API behind an async client that
//! caches successful lookups, batches remote calls, and reports the
//! credit/throttling accounting attached to every response.
//!
//! # Lookup Example
//!
//! ```rust,no_run
//! use ipregistry::{DefaultCache, IpregistryClient, LookupOption};
//!
//! #[tokio::main]
//! async fn main() -> ipregistry::Result<()> {
//!     let client = IpregistryClient::new("your-api-key")
//!         .cache_store(DefaultCache::default());
//!
//!     let response = client
//!         .lookup_ip("8.8.4.4", &[LookupOption::hostname(true)])
//!         .await?;
//!
//!     if let Some(location) = &response.data.location {
//!         println!("{:?} {:?}", location.country, location.city);
//!     }
//!     println!("credits consumed: {:?}", response.credits.consumed);
//!     Ok(())
//! }
//! ```
//!
//! # Batch Example
//!
//! A batch lookup makes at most one remote call, whatever the batch size;
//! cached entries are mixed back in at their original positions and
//! per-item failures surface as [`LookupResult::Error`] slots instead of
//! aborting the batch.
//!
//! ```rust,no_run
//! use ipregistry::{IpregistryClient, LookupResult};
//!
//! #[tokio::main]
//! async fn main() -> ipregistry::Result<()> {
//!     let client = IpregistryClient::new("your-api-key");
//!
//!     let response = client
//!         .batch_lookup_ips(&["66.165.2.7", "1.1.1.1", "not-an-ip"], &[])
//!         .await?;
//!
//!     for slot in &response.data {
//!         match slot {
//!             LookupResult::Success(info) => println!("{} resolved", info.ip),
//!             LookupResult::Error(error) => println!("failed: {error}"),
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod options;
pub mod request;
pub mod response;
pub mod telemetry;

// Re-export main types at crate root
pub use cache::{CachedValue, DefaultCache, LookupCache, NoCache, compose_key};
pub use client::IpregistryClient;
pub use config::{IpregistryConfig, IpregistryConfigBuilder};
pub use error::{IpregistryError, LookupError, Result};
pub use options::LookupOption;
pub use request::{DefaultRequestHandler, RequestHandler, RetryPolicy};
pub use response::{ApiResponse, BatchResult, Credits, LookupResult, Throttling};

// Re-export the domain payload types
pub use model::{
    AsType, AutonomousSystem, IpInfo, RegionalInternetRegistry, RequesterAutonomousSystem,
    RequesterIpInfo, UserAgent,
};
