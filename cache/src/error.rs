use crate::store::StoreError;

use std::sync::Arc;

use thiserror::Error;

/// A type-erased error, the form loaders report their failures in.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors produced by the read-through path.
///
/// Every variant is `Clone`: the outcome of a coalesced load is shared with
/// all callers parked on the same flight, so foreign error sources are held
/// behind an `Arc` rather than boxed per caller.
#[derive(Debug, Clone, Error)]
pub enum Error {
  /// The supplied key was empty. Fatal to the call; the loader is never
  /// invoked.
  #[error("cache key is empty")]
  EmptyKey,

  /// The call ran with `should_cache = false`, so the backend was never
  /// consulted. Surfaced only when no loader was supplied; with a loader
  /// present it is recovered internally by forcing a load.
  #[error("cache condition not met, backend access skipped")]
  ConditionNotMet,

  /// The backend read failed (including "key absent or expired"). Surfaced
  /// only when no loader was supplied; otherwise the engine falls through
  /// to the loader path.
  #[error(transparent)]
  Store(#[from] StoreError),

  /// The value produced by an in-flight load does not have the type this
  /// caller asked for. Happens when concurrent callers coalesce on one key
  /// with disagreeing value types. Nothing is delivered to the mismatched
  /// caller.
  #[error("loaded value does not match the requested type")]
  TypeMismatch,

  /// The loader itself failed. The original error is shared with every
  /// coalesced caller and is reachable through `source()`; the engine never
  /// retries.
  #[error("loader failed: {0}")]
  Loader(#[source] Arc<dyn std::error::Error + Send + Sync + 'static>),

  /// The loader succeeded but writing the value back to the backend failed.
  /// The write error wins over the loaded value for every coalesced caller;
  /// the backend is left as-is and the engine state is unaffected.
  #[error("write-back failed: {0}")]
  WriteBack(#[source] StoreError),

  /// The session's cancellation token fired before the call completed. The
  /// caller's wait is abandoned; an already-spawned load keeps running for
  /// the benefit of other callers.
  #[error("cache call cancelled")]
  Cancelled,
}

/// Errors that can occur when building a cache.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
  /// No `TaskSpawner` was configured and the default `tokio` feature is not
  /// enabled. Loads run as detached tasks, so the engine cannot be built
  /// without a way to spawn them.
  #[error("a load spawner is required; enable the 'tokio' feature or provide one via CacheBuilder::spawner")]
  SpawnerRequired,
}
