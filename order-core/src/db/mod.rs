pub mod factory;
pub mod memory;
pub mod mirror;
pub mod repository;

pub use factory::{StoreConfig, StoreFactory, StoreRegistry};
pub use memory::{MemoryStore, MemoryStoreFactory};
pub use mirror::{DEFAULT_SNAPSHOT_KEY, DraftStore, PersistenceMirror};
pub use repository::{KeyValueStore, StoreError};
