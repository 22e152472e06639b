pub mod chat;
pub mod explorer;
pub mod notices;
pub mod sessions;
pub mod settings;
