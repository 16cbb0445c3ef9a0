pub mod file_store;
pub mod kv_store;
pub mod memory_store;

pub use file_store::FileKeyValueStore;
pub use kv_store::{KeyValueStore, LocalStore, LocalStoreError, VEHICLE_CACHE_KEY};
pub use memory_store::MemoryKeyValueStore;
