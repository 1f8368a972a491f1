pub mod repository;
pub mod sqlite;

pub use repository::{
    ConsentRepository, InMemoryStore, SessionSnapshot, SnapshotRepository, Storage, StorageError,
};
pub use sqlite::{SqliteInitError, SqliteStore};
