use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoutError {
    #[error("Chat backend unreachable: {0}")]
    BackendUnreachable(String),

    #[error("Chat backend returned HTTP {status}: {body}")]
    BackendHttp { status: u16, body: String },

    #[error("Chat backend reply malformed: {0}")]
    BackendContract(String),

    #[error("Data access error: {0}")]
    DataAccess(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("{0}")]
    Other(String),
}

impl ScoutError {
    /// True for failures of the chat round-trip itself.
    pub fn is_backend(&self) -> bool {
        matches!(
            self,
            ScoutError::BackendUnreachable(_)
                | ScoutError::BackendHttp { .. }
                | ScoutError::BackendContract(_)
        )
    }
}

impl From<serde_json::Error> for ScoutError {
    fn from(e: serde_json::Error) -> Self {
        ScoutError::Serialization(e.to_string())
    }
}
