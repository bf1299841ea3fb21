mod common;

use common::{user, user_key, UserInfo};

use std::time::Duration;

use strata_cache::{EncodedStore, MemoryStore, Store, StoreError};

const NO_TTL: Duration = Duration::ZERO;

#[tokio::test]
async fn memory_round_trips_structured_values() {
  let store = MemoryStore::new();
  let key = user_key(1);

  store.set(&key, &user(1), Duration::from_secs(60)).await.unwrap();
  let found: UserInfo = store.get(&key).await.unwrap();
  assert_eq!(found, user(1));
}

#[tokio::test]
async fn memory_distinguishes_absent_from_mismatched() {
  let store = MemoryStore::new();

  assert!(matches!(
    store.get::<UserInfo>("absent").await,
    Err(StoreError::NotFound)
  ));

  store.set("number", &7i64, NO_TTL).await.unwrap();
  assert!(matches!(
    store.get::<UserInfo>("number").await,
    Err(StoreError::TypeMismatch)
  ));
}

#[tokio::test]
async fn memory_expires_entries() {
  let store = MemoryStore::new();
  let key = user_key(2);

  store.set(&key, &user(2), Duration::from_millis(40)).await.unwrap();
  assert!(store.get::<UserInfo>(&key).await.is_ok());

  tokio::time::sleep(Duration::from_millis(70)).await;
  assert!(matches!(
    store.get::<UserInfo>(&key).await,
    Err(StoreError::NotFound)
  ));
}

#[tokio::test]
async fn memory_remove_and_clear() {
  let store = MemoryStore::with_shards(4);

  store.set("a", &1u32, NO_TTL).await.unwrap();
  store.set("b", &2u32, NO_TTL).await.unwrap();
  assert_eq!(store.len(), 2);

  store.remove("a");
  assert!(matches!(store.get::<u32>("a").await, Err(StoreError::NotFound)));
  assert_eq!(store.get::<u32>("b").await.unwrap(), 2);

  store.clear();
  assert!(store.is_empty());
}

#[tokio::test]
async fn memory_overwrites_unconditionally() {
  let store = MemoryStore::new();

  store.set("k", &user(1), NO_TTL).await.unwrap();
  store.set("k", &user(2), NO_TTL).await.unwrap();
  let found: UserInfo = store.get("k").await.unwrap();
  assert_eq!(found, user(2));

  // Overwriting may even change the stored type; reads follow suit.
  store.set("k", &3u64, NO_TTL).await.unwrap();
  assert_eq!(store.get::<u64>("k").await.unwrap(), 3);
}

#[tokio::test]
async fn encoded_json_round_trips_and_rejects_foreign_payloads() {
  let store = EncodedStore::json();
  let key = user_key(3);

  store.set(&key, &user(3), Duration::from_secs(60)).await.unwrap();
  let found: UserInfo = store.get(&key).await.unwrap();
  assert_eq!(found, user(3));

  // A JSON object cannot decode into an integer: the payload is foreign to
  // the requested type, not absent.
  assert!(matches!(
    store.get::<i64>(&key).await,
    Err(StoreError::Decode { codec: "json", .. })
  ));
}

#[tokio::test]
async fn encoded_json_expires_entries() {
  let store = EncodedStore::json();

  store.set("t", &42u64, Duration::from_millis(40)).await.unwrap();
  assert_eq!(store.get::<u64>("t").await.unwrap(), 42);

  tokio::time::sleep(Duration::from_millis(70)).await;
  assert!(matches!(store.get::<u64>("t").await, Err(StoreError::NotFound)));
}

#[cfg(feature = "bincode")]
#[tokio::test]
async fn encoded_bincode_round_trips() {
  let store = EncodedStore::bincode();
  let key = user_key(4);

  store.set(&key, &user(4), NO_TTL).await.unwrap();
  let found: UserInfo = store.get(&key).await.unwrap();
  assert_eq!(found, user(4));
}
