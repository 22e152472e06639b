pub mod memory;
pub mod sqlite;
pub mod migrations;
pub mod auto;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use auto::open_store;
