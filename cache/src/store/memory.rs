use super::{deadline_for, CacheValue, Store, StoreError};

use std::any::Any;
use std::collections::HashMap;
use std::hash::{BuildHasher, Hash, Hasher};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use crossbeam_utils::CachePadded;
use parking_lot::RwLock;

/// A helper function to hash a key using a `BuildHasher`.
#[inline]
fn hash_key<H: BuildHasher>(hasher: &H, key: &str) -> u64 {
  let mut state = hasher.build_hasher();
  key.hash(&mut state);
  state.finish()
}

struct Entry {
  value: Arc<dyn Any + Send + Sync>,
  deadline: Option<Instant>,
}

impl Entry {
  fn is_live(&self, now: Instant) -> bool {
    match self.deadline {
      Some(deadline) => now < deadline,
      None => true,
    }
  }
}

type Shard = RwLock<HashMap<String, Entry, ahash::RandomState>>;

/// The typed in-process reference backend.
///
/// Values are stored as they are, behind `Arc<dyn Any>`, so a hit costs one
/// downcast and one clone, with no serialization. The map is partitioned into
/// independently locked shards so operations on different keys are unlikely
/// to contend for the same lock.
///
/// Expiry is checked on read: an entry past its deadline behaves exactly
/// like an absent one. Dead entries stay allocated until overwritten or
/// removed.
// TODO: reap dead entries on insert into the owning shard instead of
// leaving them until the next overwrite.
pub struct MemoryStore {
  shards: Box<[CachePadded<Shard>]>,
  hasher: ahash::RandomState,
}

impl std::fmt::Debug for MemoryStore {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("MemoryStore")
      .field("num_shards", &self.shards.len())
      .finish()
  }
}

impl Default for MemoryStore {
  fn default() -> Self {
    Self::new()
  }
}

impl MemoryStore {
  const DEFAULT_SHARDS: usize = 16;

  /// Creates a store with the default shard count.
  pub fn new() -> Self {
    Self::with_shards(Self::DEFAULT_SHARDS)
  }

  /// Creates a store with `num_shards` shards, rounded up to the next
  /// power of two so the shard pick stays a mask.
  pub fn with_shards(num_shards: usize) -> Self {
    let num_shards = num_shards.max(1).next_power_of_two();
    let hasher = ahash::RandomState::new();
    let mut shards = Vec::with_capacity(num_shards);
    for _ in 0..num_shards {
      shards.push(CachePadded::new(RwLock::new(HashMap::with_hasher(hasher.clone()))));
    }
    Self {
      shards: shards.into_boxed_slice(),
      hasher,
    }
  }

  #[inline]
  fn shard_for(&self, key: &str) -> &Shard {
    let hash = hash_key(&self.hasher, key);
    let index = hash as usize & (self.shards.len() - 1);
    &self.shards[index]
  }

  /// Removes the entry under `key`, if any.
  pub fn remove(&self, key: &str) {
    self.shard_for(key).write().remove(key);
  }

  /// Drops every entry in the store.
  pub fn clear(&self) {
    for shard in self.shards.iter() {
      shard.write().clear();
    }
  }

  /// Number of entries currently held, live or not.
  pub fn len(&self) -> usize {
    self.shards.iter().map(|shard| shard.read().len()).sum()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

#[async_trait]
impl Store for MemoryStore {
  async fn get<T: CacheValue>(&self, key: &str) -> Result<T, StoreError> {
    let shard = self.shard_for(key);
    let guard = shard.read();
    let entry = guard.get(key).ok_or(StoreError::NotFound)?;
    if !entry.is_live(Instant::now()) {
      return Err(StoreError::NotFound);
    }
    entry
      .value
      .downcast_ref::<T>()
      .cloned()
      .ok_or(StoreError::TypeMismatch)
  }

  async fn set<T: CacheValue>(&self, key: &str, value: &T, ttl: Duration) -> Result<(), StoreError> {
    let entry = Entry {
      value: Arc::new(value.clone()),
      deadline: deadline_for(ttl),
    };
    self.shard_for(key).write().insert(key.to_owned(), entry);
    Ok(())
  }
}
