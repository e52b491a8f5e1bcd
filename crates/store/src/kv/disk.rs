//! Contains a concrete implementation of the [KeyValueStore] trait that stores data on disk
//! using [rocksdb].

use super::{KeyValueStore, MemoryKeyValueStore};
use alloy_primitives::B256;
use anyhow::{anyhow, Result};
use rocksdb::{Options, WriteBatch, DB};
use std::path::PathBuf;
use tracing::info;

/// A simple, synchronous key-value store that stores data on disk.
///
/// Unlike scratch stores, the database outlives the handle: reopening the same directory resumes
/// the protocol state.
#[derive(Debug)]
pub struct DiskKeyValueStore {
    data_directory: PathBuf,
    db: DB,
}

impl DiskKeyValueStore {
    /// Opens (or creates) a [DiskKeyValueStore] in the given data directory.
    pub fn open(data_directory: PathBuf) -> Result<Self> {
        let db = DB::open(&Self::get_db_options(), data_directory.as_path())
            .map_err(|e| anyhow!("Failed to open database at {data_directory:?}: {e}"))?;
        info!(target: "store", "Opened protocol database at {:?}", data_directory);

        Ok(Self { data_directory, db })
    }

    /// Returns the data directory of the database.
    pub const fn data_directory(&self) -> &PathBuf {
        &self.data_directory
    }

    /// Gets the [Options] for the underlying RocksDB instance.
    fn get_db_options() -> Options {
        let mut options = Options::default();
        options.set_compression_type(rocksdb::DBCompressionType::Snappy);
        options.create_if_missing(true);
        options
    }
}

impl KeyValueStore for DiskKeyValueStore {
    fn get(&self, key: B256) -> Result<Option<Vec<u8>>> {
        self.db.get(*key).map_err(|e| anyhow!("Failed to read key {key}: {e}"))
    }

    fn set(&mut self, key: B256, value: Vec<u8>) -> Result<()> {
        self.db.put(*key, value).map_err(|e| anyhow!("Failed to set key-value pair: {}", e))
    }

    fn set_batch(&mut self, batch: Vec<(B256, Vec<u8>)>) -> Result<()> {
        let mut write_batch = WriteBatch::default();
        for (key, value) in batch {
            write_batch.put(*key, value);
        }
        self.db.write(write_batch).map_err(|e| anyhow!("Failed to write batch: {e}"))
    }
}

impl TryFrom<DiskKeyValueStore> for MemoryKeyValueStore {
    type Error = anyhow::Error;

    fn try_from(disk_store: DiskKeyValueStore) -> Result<Self> {
        let mut memory_store = Self::new();
        let db_iter = disk_store.db.full_iterator(rocksdb::IteratorMode::Start);

        for entry in db_iter {
            let (key, value) = entry.map_err(|e| anyhow!("Failed to iterate database: {e}"))?;
            memory_store.set(
                B256::try_from(key.as_ref())
                    .map_err(|e| anyhow!("Failed to convert slice to B256: {e}"))?,
                value.to_vec(),
            )?;
        }

        Ok(memory_store)
    }
}

#[cfg(test)]
mod test {
    use super::DiskKeyValueStore;
    use crate::kv::{KeyValueStore, MemoryKeyValueStore};
    use proptest::{
        arbitrary::any,
        collection::{hash_map, vec},
        proptest,
    };
    use std::{
        env::temp_dir,
        path::PathBuf,
        sync::atomic::{AtomicU64, Ordering},
    };

    static NEXT_DIR: AtomicU64 = AtomicU64::new(0);

    fn scratch_dir() -> PathBuf {
        let dir = temp_dir().join(format!(
            "verdict-store-{}-{}",
            std::process::id(),
            NEXT_DIR.fetch_add(1, Ordering::Relaxed)
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_reopen_preserves_state() {
        let dir = scratch_dir();
        {
            let mut kv = DiskKeyValueStore::open(dir.clone()).unwrap();
            kv.set([1u8; 32].into(), vec![0xAB]).unwrap();
        }
        let kv = DiskKeyValueStore::open(dir.clone()).unwrap();
        assert_eq!(kv.get([1u8; 32].into()).unwrap(), Some(vec![0xAB]));
        drop(kv);
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_batch_is_written_together() {
        let dir = scratch_dir();
        {
            let mut kv = DiskKeyValueStore::open(dir.clone()).unwrap();
            kv.set_batch(vec![([1u8; 32].into(), vec![1]), ([2u8; 32].into(), vec![2])]).unwrap();
        }
        let kv = DiskKeyValueStore::open(dir.clone()).unwrap();
        assert_eq!(kv.get([1u8; 32].into()).unwrap(), Some(vec![1]));
        assert_eq!(kv.get([2u8; 32].into()).unwrap(), Some(vec![2]));
        drop(kv);
        std::fs::remove_dir_all(dir).unwrap();
    }

    proptest! {
        /// Test that converting from a [DiskKeyValueStore] to a [MemoryKeyValueStore] is lossless.
        #[test]
        fn convert_disk_kv_to_mem_kv(k_v in hash_map(any::<[u8; 32]>(), vec(any::<u8>(), 0..128), 1..128)) {
            let dir = scratch_dir();
            let mut disk_kv = DiskKeyValueStore::open(dir.clone()).unwrap();
            k_v.iter().for_each(|(k, v)| {
                disk_kv.set(k.into(), v.to_vec()).unwrap();
            });

            let mem_kv = MemoryKeyValueStore::try_from(disk_kv).unwrap();
            for (k, v) in k_v {
                assert_eq!(mem_kv.get(k.into()).unwrap(), Some(v.to_vec()));
            }
            std::fs::remove_dir_all(dir).unwrap();
        }
    }
}
