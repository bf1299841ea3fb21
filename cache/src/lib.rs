//! A concurrent read-through caching facade.
//!
//! Callers ask for a value by key; on a miss the supplied loader computes
//! it, the result is written back with a TTL, and every concurrent caller
//! observes a consistent value.
//!
//! # Features
//! - **Pluggable backends**: the engine talks to storage through the
//!   [`Store`] trait; two in-process reference backends ship in the box.
//! - **Request coalescing**: concurrent misses on one key share a single
//!   loader invocation, so no thundering herd reaches the data source.
//! - **Conditional write-back**: per-call `should_cache` and TTL control,
//!   through functional options or a fluent per-call [`Session`].
//! - **Typed end to end**: the loader's result type and the caller's
//!   requested type agree at compile time; the remaining type-erasure
//!   boundaries (coalesced callers, typed in-process storage) fail cleanly.
//! - **Observability**: lock-free counters for hits, misses, loads, and
//!   coalesced waits, plus `tracing` events at the interesting transitions.
//!
//! ```
//! use strata_cache::{BoxError, Cache, MemoryStore};
//! use std::time::Duration;
//!
//! # async fn demo() -> Result<(), BoxError> {
//! let cache = Cache::builder(MemoryStore::new()).build()?;
//!
//! // Misses run the loader once and write the value back for 30 seconds.
//! let name: String = cache
//!   .key("user:42/name")
//!   .ttl(Duration::from_secs(30))
//!   .load_with(|| async { Ok("Ada Lovelace".to_owned()) })
//!   .find()
//!   .await?;
//! # assert_eq!(name, "Ada Lovelace");
//! # Ok(())
//! # }
//! ```

// Public modules that form the API
pub mod builder;
pub mod config;
pub mod encoding;
pub mod error;
pub mod handles;
pub mod metrics;
pub mod runtime;
pub mod session;
pub mod store;

// Internal, crate-only modules
mod flight;
mod shared;

// Re-export the primary user-facing types for convenience
pub use builder::{CacheBuilder, DEFAULT_TTL};
pub use config::{with_should_cache, with_ttl, ConfigOption};
pub use encoding::{Codec, JsonCodec};
pub use error::{BoxError, BuildError, Error};
pub use handles::Cache;
pub use metrics::MetricsSnapshot;
pub use runtime::TaskSpawner;
pub use session::Session;
pub use store::{CacheValue, EncodedStore, MemoryStore, Store, StoreError};

#[cfg(feature = "bincode")]
pub use encoding::BincodeCodec;
#[cfg(feature = "tokio")]
pub use runtime::TokioSpawner;
