use super::{deadline_for, CacheValue, Store, StoreError};
use crate::encoding::Codec;
use crate::encoding::JsonCodec;

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::RwLock;

struct Payload {
  bytes: Vec<u8>,
  deadline: Option<Instant>,
}

/// An in-process backend that stores values as encoded bytes.
///
/// Every value crosses a [`Codec`] on the way in and out, which makes this
/// store exercise the exact transfer path a networked backend uses: a
/// stored payload that cannot be decoded into the requested type surfaces
/// as [`StoreError::Decode`], not as garbage.
pub struct EncodedStore<C> {
  codec: C,
  entries: RwLock<HashMap<String, Payload, ahash::RandomState>>,
}

impl<C> std::fmt::Debug for EncodedStore<C> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("EncodedStore")
      .field("entries", &self.entries.read().len())
      .finish()
  }
}

impl EncodedStore<JsonCodec> {
  /// A store that keeps its payloads as JSON.
  pub fn json() -> Self {
    Self::with_codec(JsonCodec)
  }
}

#[cfg(feature = "bincode")]
impl EncodedStore<crate::encoding::BincodeCodec> {
  /// A store that keeps its payloads in the bincode wire format.
  pub fn bincode() -> Self {
    Self::with_codec(crate::encoding::BincodeCodec)
  }
}

impl<C: Codec> EncodedStore<C> {
  pub fn with_codec(codec: C) -> Self {
    Self {
      codec,
      entries: RwLock::new(HashMap::with_hasher(ahash::RandomState::new())),
    }
  }
}

#[async_trait]
impl<C: Codec> Store for EncodedStore<C> {
  async fn get<T: CacheValue>(&self, key: &str) -> Result<T, StoreError> {
    let entries = self.entries.read();
    let payload = entries.get(key).ok_or(StoreError::NotFound)?;
    if let Some(deadline) = payload.deadline {
      if Instant::now() >= deadline {
        return Err(StoreError::NotFound);
      }
    }
    self.codec.decode(&payload.bytes)
  }

  async fn set<T: CacheValue>(&self, key: &str, value: &T, ttl: Duration) -> Result<(), StoreError> {
    let bytes = self.codec.encode(value)?;
    let payload = Payload {
      bytes,
      deadline: deadline_for(ttl),
    };
    self.entries.write().insert(key.to_owned(), payload);
    Ok(())
  }
}
