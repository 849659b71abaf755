pub mod connection;
pub mod entities;
pub mod repositories;
pub mod store;

pub use connection::{connect_and_migrate, connect_to_database, connect_to_memory_database};
pub use repositories::SnapshotRepository;
pub use store::{MemorySnapshotStore, SnapshotKey, SnapshotStore, load_snapshot, save_snapshot};
