use crate::builder::CacheBuilder;
use crate::config::{Config, ConfigOption};
use crate::error::{BoxError, Error};
use crate::flight::FlightRole;
use crate::metrics::MetricsSnapshot;
use crate::session::Session;
use crate::shared::CacheShared;
use crate::store::{CacheValue, Store};

use std::future::Future;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use tracing::debug;

/// The read-through engine handle.
///
/// A `Cache` is a thin `Arc` around shared engine state: clone it freely
/// and call it from any number of tasks. Unrelated keys never serialize on
/// a common lock; the only per-key serialization point is the in-flight
/// table that coalesces concurrent loads.
pub struct Cache<S> {
  pub(crate) shared: Arc<CacheShared<S>>,
}

impl<S> Clone for Cache<S> {
  fn clone(&self) -> Self {
    Self {
      shared: self.shared.clone(),
    }
  }
}

impl<S> std::fmt::Debug for Cache<S> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Cache")
      .field("default_ttl", &self.shared.default_ttl)
      .finish_non_exhaustive()
  }
}

impl<S: Store> Cache<S> {
  /// Starts building an engine over `store`.
  pub fn builder(store: S) -> CacheBuilder<S> {
    CacheBuilder::new(store)
  }

  /// Opens a fluent per-call [`Session`] for `key`.
  pub fn key<T: CacheValue>(&self, key: impl Into<String>) -> Session<'_, S, T> {
    Session::new(self, key.into())
  }

  pub fn metrics(&self) -> MetricsSnapshot {
    self.shared.metrics.snapshot()
  }

  /// Fetches the value under `key` from the backend, without a loader.
  ///
  /// A convenience form of [`get_or_load`](Cache::get_or_load): any backend
  /// failure, including plain absence, surfaces unchanged as
  /// [`Error::Store`].
  pub async fn get<T: CacheValue>(&self, key: &str) -> Result<T, Error> {
    self
      .get_or_load(key, None::<fn() -> std::future::Ready<Result<T, BoxError>>>, &[])
      .await
  }

  /// The read-through operation.
  ///
  /// Tries the backend first; on any miss, runs `loader` through the
  /// per-key flight table so concurrent misses share a single invocation,
  /// writes the loaded value back if the call permits it, and returns each
  /// caller its own copy of the value.
  ///
  /// Behavior contract:
  /// - An empty `key` fails with [`Error::EmptyKey`]; the loader is never
  ///   invoked.
  /// - A backend hit short-circuits everything else, even with a loader
  ///   supplied.
  /// - `with_should_cache(false)` selects bypass mode: the backend is
  ///   neither read nor written, and the loader produces a fresh value
  ///   every call (concurrent bypass calls for one key still coalesce).
  /// - Without a loader, the miss outcome is returned verbatim.
  /// - Every caller coalesced onto one load receives the same outcome; a
  ///   caller whose requested type disagrees with the loaded value gets
  ///   [`Error::TypeMismatch`] and nothing is delivered to it.
  ///
  /// The loader runs as a detached task, so dropping this future (or
  /// cancelling a session wrapping it) abandons only this caller's wait,
  /// never the shared load.
  pub async fn get_or_load<T, F, Fut>(
    &self,
    key: &str,
    loader: Option<F>,
    options: &[ConfigOption],
  ) -> Result<T, Error>
  where
    T: CacheValue,
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, BoxError>> + Send + 'static,
  {
    if key.is_empty() {
      return Err(Error::EmptyKey);
    }
    let config = Config::new(self.shared.default_ttl).apply(options);

    // 1. Try the backend, unless this call bypasses it. Whatever goes
    //    wrong here is uniformly "miss": the loader path recovers it.
    let miss = if config.should_cache {
      match self.shared.store.get::<T>(key).await {
        Ok(value) => {
          self.shared.metrics.hits.fetch_add(1, Ordering::Relaxed);
          return Ok(value);
        }
        Err(err) => {
          self.shared.metrics.misses.fetch_add(1, Ordering::Relaxed);
          debug!(key = %key, error = %err, "cache miss");
          Error::Store(err)
        }
      }
    } else {
      self.shared.metrics.bypasses.fetch_add(1, Ordering::Relaxed);
      Error::ConditionNotMet
    };

    // 2. No loader: the miss outcome is the caller's answer.
    let Some(loader) = loader else {
      return Err(miss);
    };

    // 3. Join the flight for this key. The first caller in leads and
    //    spawns the load; everyone else parks on the shared cell.
    let flight = match self.shared.flights.join(key) {
      FlightRole::Leader(flight) => {
        CacheShared::spawn_load_task(
          self.shared.clone(),
          key.to_owned(),
          config,
          flight.clone(),
          loader,
        );
        flight
      }
      FlightRole::Waiter(flight) => {
        self.shared.metrics.coalesced.fetch_add(1, Ordering::Relaxed);
        flight
      }
    };

    // 4. Wait for the shared outcome and take our own copy of the value.
    match (&*flight).await {
      Ok(value) => match value.downcast::<T>() {
        Ok(value) => Ok((*value).clone()),
        Err(_) => Err(Error::TypeMismatch),
      },
      Err(err) => Err(err),
    }
  }
}
