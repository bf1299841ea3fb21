//! The backend storage abstraction and the in-process reference backends.
//!
//! The engine talks to storage exclusively through [`Store`]. Backends own
//! their entry representation, their expiry bookkeeping, and (for
//! byte-oriented backends) their serialization format; the engine treats
//! every [`StoreError`] coming out of [`Store::get`] the same way: as a
//! miss to recover from via the loader.

mod encoded;
mod memory;

pub use encoded::EncodedStore;
pub use memory::MemoryStore;

use std::any::Any;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// The bound every cached value satisfies.
///
/// `Clone` lets each coalesced caller walk away with its own copy;
/// `Serialize`/`DeserializeOwned` let byte-oriented backends move the value
/// through a [`Codec`](crate::encoding::Codec); `Any` lets typed in-process
/// backends store values without erasing them to bytes at all.
///
/// Blanket-implemented; never implement it by hand.
pub trait CacheValue: Any + Clone + Serialize + DeserializeOwned + Send + Sync {}

impl<T> CacheValue for T where T: Any + Clone + Serialize + DeserializeOwned + Send + Sync {}

/// Errors a backend can report.
///
/// `Clone` for the same reason as [`Error`](crate::Error): a backend failure
/// observed by a coalesced load is shared with every waiting caller.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
  /// The key is absent, or present but past its deadline. An expired entry
  /// must be indistinguishable from an absent one.
  #[error("key not found")]
  NotFound,

  /// The stored value exists but is not of the requested type.
  #[error("stored value does not match the requested type")]
  TypeMismatch,

  /// Serializing a value for storage failed.
  #[error("encode ({codec}): {source}")]
  Encode {
    codec: &'static str,
    #[source]
    source: Arc<dyn std::error::Error + Send + Sync + 'static>,
  },

  /// Deserializing a stored payload into the requested type failed.
  #[error("decode ({codec}): {source}")]
  Decode {
    codec: &'static str,
    #[source]
    source: Arc<dyn std::error::Error + Send + Sync + 'static>,
  },

  /// Any other backend failure (I/O, connectivity, capacity, ...).
  #[error("backend: {0}")]
  Backend(#[source] Arc<dyn std::error::Error + Send + Sync + 'static>),
}

impl StoreError {
  /// Wraps an arbitrary backend failure.
  pub fn backend(err: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>) -> Self {
    StoreError::Backend(Arc::from(err.into()))
  }
}

/// The capability set the read-through engine requires of a backend.
///
/// Implementations must be safe to share across tasks; one store instance
/// serves every key of an engine for its whole lifetime. The two optional
/// capabilities of some backends (`remove`, `clear`) are deliberately not
/// part of this trait: the read-through path never uses them, and a
/// minimal backend does not have to provide them.
#[async_trait]
pub trait Store: Send + Sync + 'static {
  /// Fetches the value stored under `key`.
  ///
  /// On any error nothing is handed to the caller. Absent and expired keys
  /// are both [`StoreError::NotFound`]; the engine does not distinguish
  /// the failure kinds coming out of this method, so backends are free to
  /// be precise.
  async fn get<T: CacheValue>(&self, key: &str) -> Result<T, StoreError>;

  /// Stores `value` under `key` with the given time-to-live, overwriting
  /// any existing entry unconditionally.
  ///
  /// The TTL arrives uninterpreted from the caller; the backend decides
  /// its semantics. Both reference backends treat a zero TTL as "no
  /// deadline".
  async fn set<T: CacheValue>(&self, key: &str, value: &T, ttl: Duration) -> Result<(), StoreError>;
}

/// Converts a TTL into an absolute deadline, zero meaning "none".
pub(crate) fn deadline_for(ttl: Duration) -> Option<Instant> {
  if ttl.is_zero() {
    None
  } else {
    Some(Instant::now() + ttl)
  }
}
