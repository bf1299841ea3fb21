mod common;

use common::{memory_cache, user, user_key, BrokenStore, UserInfo};

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use strata_cache::{Cache, Error, StoreError};
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn fluent_chain_loads_and_caches() {
  let cache = memory_cache();
  let key = user_key(1);

  let found: UserInfo = cache
    .key(&*key)
    .ttl(Duration::from_secs(5))
    .load_with(|| async { Ok(user(1)) })
    .find()
    .await
    .unwrap();
  assert_eq!(found, user(1));

  // A second, loader-less session sees the written-back value.
  let cached: UserInfo = cache.key(&*key).find().await.unwrap();
  assert_eq!(cached, user(1));
}

#[tokio::test]
async fn session_without_loader_misses() {
  let cache = memory_cache();

  let result: Result<UserInfo, Error> = cache.key("absent").find().await;
  assert!(matches!(result, Err(Error::Store(StoreError::NotFound))));
}

#[tokio::test]
async fn session_bypass_gates_the_write() {
  let cache = memory_cache();
  let load_count = Arc::new(AtomicUsize::new(0));

  // Mirrors gating the write on a per-record predicate: records below the
  // threshold cache, the rest stay transient.
  for id in 3..=4u64 {
    let load_count = load_count.clone();
    let found: UserInfo = cache
      .key(user_key(id))
      .should_cache(id < 4)
      .ttl(Duration::from_secs(5))
      .load_with(move || async move {
        load_count.fetch_add(1, Ordering::SeqCst);
        Ok(user(id))
      })
      .find()
      .await
      .unwrap();
    assert_eq!(found, user(id));
  }
  assert_eq!(load_count.load(Ordering::SeqCst), 2);

  // id 3 was cached, id 4 was not.
  assert_eq!(cache.get::<UserInfo>(&user_key(3)).await.unwrap(), user(3));
  assert!(matches!(
    cache.get::<UserInfo>(&user_key(4)).await,
    Err(Error::Store(StoreError::NotFound))
  ));
}

#[tokio::test]
async fn cancelled_session_returns_cancelled() {
  let cache = memory_cache();
  let load_count = Arc::new(AtomicUsize::new(0));
  let token = CancellationToken::new();
  token.cancel();

  let result: Result<UserInfo, Error> = cache
    .key(user_key(8))
    .cancel_with(token)
    .load_with({
      let load_count = load_count.clone();
      move || async move {
        load_count.fetch_add(1, Ordering::SeqCst);
        Ok(user(8))
      }
    })
    .find()
    .await;
  assert!(matches!(result, Err(Error::Cancelled)));
  assert_eq!(
    load_count.load(Ordering::SeqCst),
    0,
    "a pre-cancelled session must not reach the loader"
  );
}

#[tokio::test]
async fn unfired_token_does_not_interfere() {
  let cache = memory_cache();
  let token = CancellationToken::new();

  let found: UserInfo = cache
    .key(user_key(9))
    .cancel_with(token)
    .load_with(|| async { Ok(user(9)) })
    .find()
    .await
    .unwrap();
  assert_eq!(found, user(9));
}

#[tokio::test]
async fn write_back_failure_surfaces_to_the_caller() {
  let cache = Cache::builder(BrokenStore).build().unwrap();
  let load_count = Arc::new(AtomicUsize::new(0));

  let result: Result<UserInfo, Error> = cache
    .key("doomed")
    .load_with({
      let load_count = load_count.clone();
      move || async move {
        load_count.fetch_add(1, Ordering::SeqCst);
        Ok(user(1))
      }
    })
    .find()
    .await;

  assert!(matches!(result, Err(Error::WriteBack(_))));
  assert_eq!(load_count.load(Ordering::SeqCst), 1, "the load itself must have run");
  assert_eq!(cache.metrics().write_back_failures, 1);
}
