use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Title every session carries until its first human message arrives.
pub const DEFAULT_SESSION_TITLE: &str = "New Session";

/// A persisted conversation thread.
///
/// `id` and `created_at` never change once the session exists; `title` is
/// rewritten exactly once, from the first human message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: DEFAULT_SESSION_TITLE.to_string(),
            created_at: Utc::now(),
        }
    }

    /// A session with a freshly generated v4 UUID.
    pub fn generate() -> Self {
        Self::new(uuid::Uuid::new_v4().to_string())
    }

    pub fn has_default_title(&self) -> bool {
        self.title == DEFAULT_SESSION_TITLE
    }
}
