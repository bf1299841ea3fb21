use crate::config::Config;
use crate::error::{BoxError, Error};
use crate::flight::{FlightFuture, FlightGroup, FlightOutcome};
use crate::metrics::Metrics;
use crate::runtime::TaskSpawner;
use crate::store::{CacheValue, Store};

use std::any::Any;
use std::future::Future;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

/// State shared by every handle, session, and spawned load of one engine.
pub(crate) struct CacheShared<S> {
  pub(crate) store: S,
  pub(crate) default_ttl: Duration,
  pub(crate) flights: FlightGroup,
  pub(crate) spawner: Arc<dyn TaskSpawner>,
  pub(crate) metrics: Metrics,
}

impl<S: Store> CacheShared<S> {
  /// Runs the leader's side of a flight as a detached task: invoke the
  /// loader, write the value back if the call permits it, evict the flight
  /// entry, and complete the cell for every waiter.
  ///
  /// The task owns an `Arc` of the shared state, so it outlives the caller
  /// that spawned it; waiters that get cancelled never strand each other.
  pub(crate) fn spawn_load_task<T, F, Fut>(
    shared: Arc<Self>,
    key: String,
    config: Config,
    flight: Arc<FlightFuture>,
    loader: F,
  ) where
    T: CacheValue,
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, BoxError>> + Send + 'static,
  {
    let spawner = shared.spawner.clone();
    let task = async move {
      shared.metrics.loads.fetch_add(1, Ordering::Relaxed);

      let outcome: FlightOutcome = match loader().await {
        Err(err) => {
          shared.metrics.load_failures.fetch_add(1, Ordering::Relaxed);
          Err(Error::Loader(Arc::from(err)))
        }
        Ok(value) => {
          let erased: Arc<dyn Any + Send + Sync> = Arc::new(value.clone());
          if config.should_cache {
            match shared.store.set(&key, &value, config.ttl).await {
              Ok(()) => {
                shared.metrics.write_backs.fetch_add(1, Ordering::Relaxed);
                debug!(key = %key, ttl = ?config.ttl, "loaded value written back");
                Ok(erased)
              }
              Err(err) => {
                // The loaded value is intact; only the write failed. Policy:
                // the error wins for every caller on this flight.
                shared.metrics.write_back_failures.fetch_add(1, Ordering::Relaxed);
                warn!(key = %key, error = %err, "write-back failed after load");
                Err(Error::WriteBack(err))
              }
            }
          } else {
            Ok(erased)
          }
        }
      };

      // Evict before completing: once waiters wake, a new miss on this key
      // must lead a fresh flight.
      shared.flights.finish(&key);
      flight.complete(outcome);
    };
    spawner.spawn(Box::pin(task));
  }
}
