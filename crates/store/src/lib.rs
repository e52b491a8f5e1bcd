#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod kv;
#[cfg(feature = "disk")]
pub use kv::DiskKeyValueStore;
pub use kv::{
    shared, KeyValueStore, MemoryKeyValueStore, SharedKeyValueStore, StagedKeyValueStore,
};

mod key;
pub use key::{KeyType, MetaSlot, StoreKey};

mod typed;
pub use typed::TypedStore;

mod errors;
pub use errors::{StoreError, StoreResult};
