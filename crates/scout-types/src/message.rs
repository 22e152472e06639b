use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Author of a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Human,
    Assistant,
}

impl Role {
    /// Column value used by the conversation store.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Human => "human",
            Role::Assistant => "assistant",
        }
    }

    /// Parse a stored role. Older rows wrote `ai` / `user`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "human" | "user" => Some(Role::Human),
            "assistant" | "ai" => Some(Role::Assistant),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Human => "You",
            Role::Assistant => "Scout",
        }
    }
}

/// A single transcript entry.
///
/// `sequence` starts at 1 and strictly increases per session in insertion
/// order; transcripts are always read back in `sequence` order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub session_id: String,
    pub sequence: i64,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn human(session_id: impl Into<String>, sequence: i64, content: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            sequence,
            role: Role::Human,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(
        session_id: impl Into<String>,
        sequence: i64,
        content: impl Into<String>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            sequence,
            role: Role::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn is_human(&self) -> bool {
        self.role == Role::Human
    }

    /// Timestamp as shown under each chat bubble.
    pub fn display_time(&self) -> String {
        self.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}
