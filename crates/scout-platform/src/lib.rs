//! Native adapters for the `scout-core` ports.

pub mod backend;
pub mod config;
pub mod storage;


pub use backend::HttpChatBackend;
pub use storage::{MemoryStore, SqliteStore, open_store};
