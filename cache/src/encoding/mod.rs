//! Codecs for backends that store values as bytes.
//!
//! The engine never names a codec; a byte-oriented backend picks one at
//! construction time and uses it for every value that crosses its boundary.

mod json;
pub use json::JsonCodec;

#[cfg(feature = "bincode")]
mod bincode;
#[cfg(feature = "bincode")]
pub use self::bincode::BincodeCodec;

use crate::store::StoreError;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// A serialization format for cached values.
///
/// Failures are reported as [`StoreError::Encode`] / [`StoreError::Decode`]
/// carrying the codec name and the underlying error, so a corrupt or
/// foreign payload is distinguishable from an absent key.
pub trait Codec: Send + Sync + 'static {
  /// The short name of this format, used in error reports.
  fn name(&self) -> &'static str;

  fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, StoreError>;

  fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, StoreError>;
}
