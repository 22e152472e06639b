pub mod http;

pub use http::{HttpChatBackend, parse_reply};
