use super::Codec;
use crate::store::StoreError;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// A [`Codec`] backed by `bincode`. Compact and fast, but not
/// self-describing: decoding into the wrong type may succeed with nonsense
/// rather than fail. Callers of a bincode-backed store must keep the stored
/// and requested types in agreement.
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeCodec;

impl Codec for BincodeCodec {
  fn name(&self) -> &'static str {
    "bincode"
  }

  fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, StoreError> {
    bincode::serialize(value).map_err(|err| StoreError::Encode {
      codec: self.name(),
      source: Arc::new(err),
    })
  }

  fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, StoreError> {
    bincode::deserialize(bytes).map_err(|err| StoreError::Decode {
      codec: self.name(),
      source: Arc::new(err),
    })
  }
}
