pub mod message;
pub mod entity;
pub mod config;
pub mod error;
pub mod session;


pub use error::ScoutError;
pub type Result<T> = std::result::Result<T, ScoutError>;
