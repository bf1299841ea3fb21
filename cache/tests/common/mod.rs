use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strata_cache::{Cache, CacheValue, MemoryStore, Store, StoreError};

/// The structured value used across the integration tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
  pub id: u64,
  pub name: String,
}

pub fn user(id: u64) -> UserInfo {
  UserInfo {
    id,
    name: format!("user-{id}"),
  }
}

pub fn user_key(id: u64) -> String {
  format!("user-info:{id}")
}

/// An engine over the typed in-process backend. Must be called from inside
/// a Tokio runtime (the default spawner binds to the current handle).
pub fn memory_cache() -> Cache<MemoryStore> {
  Cache::builder(MemoryStore::new())
    .build()
    .expect("engine should build inside a runtime")
}

/// A backend whose reads always miss and whose writes always fail, for
/// exercising the write-back error path.
pub struct BrokenStore;

#[async_trait]
impl Store for BrokenStore {
  async fn get<T: CacheValue>(&self, _key: &str) -> Result<T, StoreError> {
    Err(StoreError::NotFound)
  }

  async fn set<T: CacheValue>(&self, _key: &str, _value: &T, _ttl: Duration) -> Result<(), StoreError> {
    Err(StoreError::backend("backend unavailable"))
  }
}
