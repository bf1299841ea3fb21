use crate::config::{with_should_cache, with_ttl};
use crate::error::{BoxError, Error};
use crate::handles::Cache;
use crate::store::{CacheValue, Store};

use std::future::Future;
use std::pin::pin;
use std::time::Duration;

use futures_util::future::{select, BoxFuture, Either};
use futures_util::FutureExt;
use tokio_util::sync::CancellationToken;

type BoxLoader<T> = Box<dyn FnOnce() -> BoxFuture<'static, Result<T, BoxError>> + Send>;

/// A fluent, single-use configuration for one cache call.
///
/// Opened with [`Cache::key`], configured through chained setters, and
/// consumed by the terminal [`find`](Session::find). Every setter takes the
/// session by value, and `find` does too, so a session cannot be shared
/// between tasks or reused for a second call; build a new one per call.
///
/// ```
/// # use strata_cache::{BoxError, Cache, MemoryStore};
/// # use std::time::Duration;
/// # async fn demo(cache: &Cache<MemoryStore>) -> Result<(), BoxError> {
/// let hits: u64 = cache
///   .key("stats:hits")
///   .ttl(Duration::from_secs(30))
///   .load_with(|| async { Ok(42u64) })
///   .find()
///   .await?;
/// # Ok(())
/// # }
/// ```
pub struct Session<'c, S, T> {
  cache: &'c Cache<S>,
  key: String,
  should_cache: bool,
  ttl: Duration,
  loader: Option<BoxLoader<T>>,
  cancel: Option<CancellationToken>,
}

impl<'c, S: Store, T: CacheValue> Session<'c, S, T> {
  pub(crate) fn new(cache: &'c Cache<S>, key: String) -> Self {
    Self {
      cache,
      key,
      should_cache: true,
      ttl: cache.shared.default_ttl,
      loader: None,
      cancel: None,
    }
  }

  /// Whether this call may touch the backend. `false` is bypass mode.
  pub fn should_cache(mut self, should_cache: bool) -> Self {
    self.should_cache = should_cache;
    self
  }

  /// TTL for a value this call writes back.
  pub fn ttl(mut self, ttl: Duration) -> Self {
    self.ttl = ttl;
    self
  }

  /// Supplies the loader invoked on a miss.
  pub fn load_with<F, Fut>(mut self, loader: F) -> Self
  where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, BoxError>> + Send + 'static,
  {
    self.loader = Some(Box::new(move || loader().boxed()));
    self
  }

  /// Attaches a cancellation token. If it fires before the call completes,
  /// `find` returns [`Error::Cancelled`]; a load already in flight keeps
  /// running for any other callers parked on it.
  pub fn cancel_with(mut self, token: CancellationToken) -> Self {
    self.cancel = Some(token);
    self
  }

  /// Executes the call with the accumulated configuration.
  pub async fn find(self) -> Result<T, Error> {
    let Session {
      cache,
      key,
      should_cache,
      ttl,
      loader,
      cancel,
    } = self;
    let options = [with_should_cache(should_cache), with_ttl(ttl)];
    let call = cache.get_or_load(&key, loader, &options);

    match cancel {
      None => call.await,
      Some(token) => {
        let cancelled = pin!(token.cancelled());
        let call = pin!(call);
        match select(cancelled, call).await {
          Either::Left(((), _)) => Err(Error::Cancelled),
          Either::Right((result, _)) => result,
        }
      }
    }
  }
}
