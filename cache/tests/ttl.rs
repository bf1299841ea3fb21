mod common;

use common::{memory_cache, user, user_key, UserInfo};

use std::time::Duration;

use strata_cache::{with_ttl, BoxError, Error, StoreError};

#[tokio::test]
async fn entries_expire_after_their_ttl() {
  let cache = memory_cache();
  let key = user_key(11);

  let _: UserInfo = cache
    .get_or_load(
      &key,
      Some(|| async { Ok::<_, BoxError>(user(11)) }),
      &[with_ttl(Duration::from_millis(50))],
    )
    .await
    .unwrap();

  // Fresh: an immediate read hits.
  assert_eq!(cache.get::<UserInfo>(&key).await.unwrap(), user(11));

  tokio::time::sleep(Duration::from_millis(80)).await;

  // Past the deadline: the entry behaves as absent.
  assert!(matches!(
    cache.get::<UserInfo>(&key).await,
    Err(Error::Store(StoreError::NotFound))
  ));
}

#[tokio::test]
async fn expired_entries_reload() {
  let cache = memory_cache();
  let key = user_key(12);

  for generation in 1..=2u64 {
    let value: u64 = cache
      .get_or_load(
        &key,
        Some(move || async move { Ok::<_, BoxError>(generation) }),
        &[with_ttl(Duration::from_millis(40))],
      )
      .await
      .unwrap();
    assert_eq!(value, generation, "an expired entry must trigger a fresh load");
    tokio::time::sleep(Duration::from_millis(70)).await;
  }
}

#[tokio::test]
async fn zero_ttl_never_expires() {
  let cache = memory_cache();
  let key = user_key(14);

  let _: UserInfo = cache
    .get_or_load(
      &key,
      Some(|| async { Ok::<_, BoxError>(user(14)) }),
      &[with_ttl(Duration::ZERO)],
    )
    .await
    .unwrap();

  tokio::time::sleep(Duration::from_millis(60)).await;
  assert_eq!(cache.get::<UserInfo>(&key).await.unwrap(), user(14));
}

#[tokio::test]
async fn engine_default_ttl_applies_when_not_overridden() {
  let cache = strata_cache::Cache::builder(strata_cache::MemoryStore::new())
    .default_ttl(Duration::from_millis(50))
    .build()
    .unwrap();

  let _: u64 = cache
    .get_or_load("counter", Some(|| async { Ok::<_, BoxError>(1u64) }), &[])
    .await
    .unwrap();
  assert_eq!(cache.get::<u64>("counter").await.unwrap(), 1);

  tokio::time::sleep(Duration::from_millis(80)).await;
  assert!(matches!(
    cache.get::<u64>("counter").await,
    Err(Error::Store(StoreError::NotFound))
  ));
}
