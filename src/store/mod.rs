pub mod memory;
pub mod record_store;
pub mod snapshot;

pub use memory::{MemoryStore, StoreError};
pub use record_store::{catalogue_order, sort_catalogue, RecordPredicate, RecordStore};
pub use snapshot::StoreSnapshot;
