//! Contains a concrete implementation of the [KeyValueStore] trait that stores data in memory.

use super::KeyValueStore;
use alloy_primitives::B256;
use anyhow::Result;
use std::collections::HashMap;

/// A simple, synchronous key-value store that stores data in memory. This is useful for testing and
/// development purposes.
#[derive(Default, Clone, Debug, Eq, PartialEq)]
pub struct MemoryKeyValueStore {
    store: HashMap<B256, Vec<u8>>,
}

impl MemoryKeyValueStore {
    /// Create a new [MemoryKeyValueStore] with an empty store.
    pub fn new() -> Self {
        Self { store: HashMap::new() }
    }

    /// Returns the number of stored entries.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: B256) -> Result<Option<Vec<u8>>> {
        Ok(self.store.get(&key).cloned())
    }

    fn set(&mut self, key: B256, value: Vec<u8>) -> Result<()> {
        self.store.insert(key, value);
        Ok(())
    }

    fn set_batch(&mut self, batch: Vec<(B256, Vec<u8>)>) -> Result<()> {
        self.store.extend(batch);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_overwrite() {
        let mut kv = MemoryKeyValueStore::new();
        assert!(kv.is_empty());

        kv.set(B256::ZERO, vec![1]).unwrap();
        kv.set(B256::ZERO, vec![2]).unwrap();
        assert_eq!(kv.get(B256::ZERO).unwrap(), Some(vec![2]));
        assert_eq!(kv.len(), 1);
        assert_eq!(kv.get(B256::with_last_byte(1)).unwrap(), None);
    }

    #[test]
    fn test_set_batch() {
        let mut kv = MemoryKeyValueStore::new();
        kv.set(B256::ZERO, vec![1]).unwrap();
        kv.set_batch(vec![(B256::ZERO, vec![2]), (B256::with_last_byte(1), vec![3])]).unwrap();

        assert_eq!(kv.get(B256::ZERO).unwrap(), Some(vec![2]));
        assert_eq!(kv.get(B256::with_last_byte(1)).unwrap(), Some(vec![3]));
    }
}
