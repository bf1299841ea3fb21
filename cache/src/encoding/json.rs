use super::Codec;
use crate::store::StoreError;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// A [`Codec`] backed by `serde_json`. Self-describing, so decoding into a
/// type the payload was not written as fails cleanly instead of producing
/// garbage.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
  fn name(&self) -> &'static str {
    "json"
  }

  fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, StoreError> {
    serde_json::to_vec(value).map_err(|err| StoreError::Encode {
      codec: self.name(),
      source: Arc::new(err),
    })
  }

  fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, StoreError> {
    serde_json::from_slice(bytes).map_err(|err| StoreError::Decode {
      codec: self.name(),
      source: Arc::new(err),
    })
  }
}
