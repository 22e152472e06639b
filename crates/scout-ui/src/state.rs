//! UI-level state that drives rendering.
//! Domain state lives in `ScoutContext`; this holds input buffers, inline
//! notices and panel toggles on top of it.

use scout_core::chat::{TurnRejected, TurnReport};
use scout_types::ScoutError;

/// Oldest notices are dropped beyond this many.
pub const MAX_NOTICES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A transient inline message, dismissed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

pub struct UiState {
    /// Chat input field content
    pub input_text: String,
    pub organization_query: String,
    pub tool_query: String,
    /// Failure of the last chat turn, shown under the transcript
    pub chat_error: Option<String>,
    pub notices: Vec<Notice>,
    /// Whether settings panel is open
    pub show_settings: bool,
    /// Status line text
    pub status_text: String,
}

impl UiState {
    pub fn new() -> Self {
        Self {
            input_text: String::new(),
            organization_query: String::new(),
            tool_query: String::new(),
            chat_error: None,
            notices: Vec::new(),
            show_settings: false,
            status_text: "Ready".to_string(),
        }
    }

    pub fn push_notice(&mut self, level: NoticeLevel, text: impl Into<String>) {
        let text = text.into();
        if self.notices.last().is_some_and(|n| n.level == level && n.text == text) {
            return;
        }
        self.notices.push(Notice { level, text });
        if self.notices.len() > MAX_NOTICES {
            self.notices.remove(0);
        }
    }

    pub fn dismiss_notice(&mut self, index: usize) {
        if index < self.notices.len() {
            self.notices.remove(index);
        }
    }

    /// Surface a failed durable write.
    pub fn report_persist_error(&mut self, error: Option<ScoutError>) {
        if let Some(e) = error {
            self.push_notice(NoticeLevel::Warning, format!("Not saved: {}", e));
        }
    }

    pub fn turn_started(&mut self) {
        self.chat_error = None;
        self.status_text = "Waiting for reply...".to_string();
    }

    pub fn turn_rejected(&mut self, reason: TurnRejected) {
        log::debug!("Chat submission rejected: {:?}", reason);
        match reason {
            TurnRejected::EmptyUtterance => {}
            TurnRejected::NoActiveSession => {
                self.push_notice(NoticeLevel::Warning, "Create or select a session first");
            }
            TurnRejected::TurnInFlight => {
                self.status_text = "Still waiting for the previous reply".to_string();
            }
        }
    }

    pub fn turn_finished(&mut self, report: TurnReport) {
        if report.succeeded() {
            self.chat_error = None;
            self.status_text = "Ready".to_string();
        } else if let Some(e) = &report.failure {
            self.chat_error = Some(e.to_string());
            self.status_text = "Reply failed".to_string();
        }
        for e in report.persist_errors {
            self.report_persist_error(Some(e));
        }
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}
