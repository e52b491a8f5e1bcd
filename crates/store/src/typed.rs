//! Contains the [TypedStore] extension trait.

use crate::{KeyValueStore, StoreError, StoreKey, StoreResult};
use serde::{de::DeserializeOwned, Serialize};
use tracing::trace;

/// Reads and writes serializable entities under a [StoreKey].
///
/// Implemented for every [KeyValueStore]. Values are encoded as JSON.
pub trait TypedStore {
    /// Reads and decodes the value under `key`, if present.
    fn get_typed<T: DeserializeOwned>(&self, key: StoreKey) -> StoreResult<Option<T>>;

    /// Encodes and writes `value` under `key`.
    fn set_typed<T: Serialize>(&mut self, key: StoreKey, value: &T) -> StoreResult<()>;
}

impl<S> TypedStore for S
where
    S: KeyValueStore + ?Sized,
{
    fn get_typed<T: DeserializeOwned>(&self, key: StoreKey) -> StoreResult<Option<T>> {
        let Some(raw) = self.get(key.into()).map_err(|e| StoreError::Backend(e.to_string()))?
        else {
            return Ok(None);
        };
        serde_json::from_slice(&raw)
            .map(Some)
            .map_err(|e| StoreError::Codec("decode", key.to_string(), e.to_string()))
    }

    fn set_typed<T: Serialize>(&mut self, key: StoreKey, value: &T) -> StoreResult<()> {
        let raw = serde_json::to_vec(value)
            .map_err(|e| StoreError::Codec("encode", key.to_string(), e.to_string()))?;
        trace!(target: "store", "Writing {} bytes under {:?}", raw.len(), key.key_type());
        self.set(key.into(), raw).map_err(|e| StoreError::Backend(e.to_string()))
    }
}
