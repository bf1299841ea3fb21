use crate::error::BuildError;
use crate::flight::FlightGroup;
use crate::handles::Cache;
use crate::metrics::Metrics;
use crate::runtime::TaskSpawner;
use crate::shared::CacheShared;
use crate::store::Store;

use std::sync::Arc;
use std::time::Duration;

/// The TTL applied when neither the builder nor the call overrides it.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3);

/// A builder for [`Cache`] instances.
///
/// ```
/// # use strata_cache::{Cache, MemoryStore};
/// # use std::time::Duration;
/// # fn demo() -> Result<(), strata_cache::BuildError> {
/// # let _rt = tokio::runtime::Runtime::new().unwrap();
/// # let _guard = _rt.enter();
/// let cache = Cache::builder(MemoryStore::new())
///   .default_ttl(Duration::from_secs(60))
///   .build()?;
/// # let _: Cache<MemoryStore> = cache;
/// # Ok(())
/// # }
/// ```
pub struct CacheBuilder<S> {
  store: S,
  default_ttl: Duration,
  spawner: Option<Arc<dyn TaskSpawner>>,
}

impl<S> std::fmt::Debug for CacheBuilder<S> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("CacheBuilder")
      .field("default_ttl", &self.default_ttl)
      .field("has_spawner", &self.spawner.is_some())
      .finish_non_exhaustive()
  }
}

impl<S: Store> CacheBuilder<S> {
  pub fn new(store: S) -> Self {
    Self {
      store,
      default_ttl: DEFAULT_TTL,
      spawner: None,
    }
  }

  /// Sets the TTL used by calls that do not override it.
  pub fn default_ttl(mut self, ttl: Duration) -> Self {
    self.default_ttl = ttl;
    self
  }

  /// Sets the spawner that hosts detached load tasks. Defaults to the
  /// current Tokio runtime when the `tokio` feature is enabled.
  pub fn spawner(mut self, spawner: Arc<dyn TaskSpawner>) -> Self {
    self.spawner = Some(spawner);
    self
  }

  /// Builds the engine.
  ///
  /// # Errors
  ///
  /// [`BuildError::SpawnerRequired`] if no spawner was provided and the
  /// `tokio` feature is disabled.
  pub fn build(self) -> Result<Cache<S>, BuildError> {
    let spawner: Arc<dyn TaskSpawner> = match self.spawner {
      Some(spawner) => spawner,
      #[cfg(feature = "tokio")]
      None => Arc::new(crate::runtime::TokioSpawner::new()),
      #[cfg(not(feature = "tokio"))]
      None => return Err(BuildError::SpawnerRequired),
    };

    Ok(Cache {
      shared: Arc::new(CacheShared {
        store: self.store,
        default_ttl: self.default_ttl,
        flights: FlightGroup::default(),
        spawner,
        metrics: Metrics::new(),
      }),
    })
  }
}
