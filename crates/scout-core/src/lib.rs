//! Client-side state engine for TechStack Scout: sessions, chat turns and
//! the two linked entity explorers.

pub mod applied;
pub mod busy;
pub mod chat;
pub mod context;
pub mod event_bus;
pub mod explorer;
pub mod ports;
pub mod selection;
pub mod session;

#[cfg(test)]
mod tests;

pub use applied::Applied;
pub use context::ScoutContext;
