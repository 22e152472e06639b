//! Port traits: the hexagonal architecture boundary.
//!
//! These traits are defined here in `scout-core` (pure Rust).
//! Implementations live in `scout-platform` (HTTP + SQLite adapters).
//! The core never imports platform code; it only depends on these traits.

use async_trait::async_trait;
use serde::Serialize;
use scout_types::{
    Result,
    entity::{EntityId, Organization, Tool},
    message::Message,
    session::Session,
};

// ─── Chat Backend Port ───────────────────────────────────────

/// Body of one chat turn request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatQuery {
    pub user_query: String,
    pub session_id: String,
}

/// Opaque service turning an utterance into a reply.
///
/// Called off the UI thread, hence `Send + Sync`.
#[async_trait]
pub trait ChatBackendPort: Send + Sync {
    /// Send one utterance and return the reply text.
    async fn generate(&self, query: &ChatQuery) -> Result<String>;

    /// Where requests go (for logging/debug)
    fn endpoint(&self) -> &str;
}

// ─── Conversation Store Port ─────────────────────────────────

pub trait ConversationStore {
    /// All sessions, ordered by `created_at` ascending.
    fn list_sessions(&self) -> Result<Vec<Session>>;

    fn create_session(&self, session: &Session) -> Result<()>;

    fn update_session_title(&self, id: &str, title: &str) -> Result<()>;

    /// Messages of one session, ordered by `sequence` ascending.
    fn load_transcript(&self, session_id: &str) -> Result<Vec<Message>>;

    fn append_message(&self, message: &Message) -> Result<()>;

    /// Name of this backend (for logging/debug)
    fn backend_name(&self) -> &str;
}

// ─── Catalog Port ────────────────────────────────────────────

pub trait CatalogPort {
    /// Up to `n` organizations in random order.
    fn random_organizations(&self, n: usize) -> Result<Vec<Organization>>;

    /// Up to `n` tools in random order.
    fn random_tools(&self, n: usize) -> Result<Vec<Tool>>;

    /// Case-insensitive substring match on name, name ascending, at most `limit`.
    fn search_organizations(&self, term: &str, limit: usize) -> Result<Vec<Organization>>;

    /// Case-insensitive substring match on name, name ascending, at most `limit`.
    fn search_tools(&self, term: &str, limit: usize) -> Result<Vec<Tool>>;

    /// Every tool the organization uses. Uncapped.
    fn tools_for_organization(&self, organization_id: EntityId) -> Result<Vec<Tool>>;

    /// Organizations using the tool, name ascending, at most `limit`.
    fn organizations_for_tool(&self, tool_id: EntityId, limit: usize) -> Result<Vec<Organization>>;
}

/// A single backing store serving both the conversation log and the catalog.
pub trait ScoutStore: ConversationStore + CatalogPort {}

impl<T: ConversationStore + CatalogPort + ?Sized> ScoutStore for T {}
