use serde::{Deserialize, Serialize};

/// Top-level client configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoutConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Full URL the chat turn is POSTed to.
    pub endpoint: String,
    /// `None` leaves the transport's own timeout in place.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_BACKEND_ENDPOINT.to_string(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackendType,
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackendType::Auto,
            database_path: DEFAULT_DATABASE_PATH.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageBackendType {
    /// SQLite when the database opens, memory otherwise
    Auto,
    Memory,
    Sqlite,
}

impl StorageBackendType {
    pub fn all() -> &'static [StorageBackendType] {
        &[
            StorageBackendType::Auto,
            StorageBackendType::Memory,
            StorageBackendType::Sqlite,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            StorageBackendType::Auto => "Auto-detect",
            StorageBackendType::Memory => "Memory",
            StorageBackendType::Sqlite => "SQLite",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            StorageBackendType::Auto => {
                "Opens the SQLite database, falls back to Memory if it cannot be opened."
            }
            StorageBackendType::Memory => "Volatile. Sessions and the catalog are lost on exit.",
            StorageBackendType::Sqlite => {
                "Persistent SQLite file holding sessions, messages and the catalog."
            }
        }
    }
}

pub const DEFAULT_BACKEND_ENDPOINT: &str = "http://127.0.0.1:8000/generate";
pub const DEFAULT_DATABASE_PATH: &str = "techstack_scout.db";
