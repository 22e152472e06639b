//! The UI context record: every piece of client state, threaded explicitly
//! through each handler instead of living in globals.

use scout_types::{
    Result,
    entity::{Organization, Tool},
};
use crate::applied::Applied;
use crate::chat::{ChatController, TurnOutcome, TurnRejected, TurnReport, TurnTicket};
use crate::explorer::EntityExplorer;
use crate::ports::ConversationStore;
use crate::session::SessionManager;

pub struct ScoutContext {
    pub sessions: SessionManager,
    pub chat: ChatController,
    pub organizations: EntityExplorer<Organization>,
    pub tools: EntityExplorer<Tool>,
}

impl ScoutContext {
    /// Build the context and activate a session (see [`SessionManager::open`]).
    pub fn open<S: ConversationStore + ?Sized>(store: &S) -> Applied<Self> {
        SessionManager::open(store).map(Self::with_sessions)
    }

    pub fn with_sessions(sessions: SessionManager) -> Self {
        Self {
            sessions,
            chat: ChatController::new(),
            organizations: EntityExplorer::new(),
            tools: EntityExplorer::new(),
        }
    }

    /// Create and activate a session. Refused (`None`) while a turn is in flight.
    pub fn create_session<S: ConversationStore + ?Sized>(
        &mut self,
        store: &S,
    ) -> Option<Applied<String>> {
        if self.chat.is_busy() {
            log::debug!("Session creation refused: chat turn in flight");
            return None;
        }
        Some(self.sessions.create_session(store))
    }

    /// Switch sessions. A no-op (`Ok(false)`) while a turn is in flight.
    pub fn select_session<S: ConversationStore + ?Sized>(
        &mut self,
        id: &str,
        store: &S,
    ) -> Result<bool> {
        if self.chat.is_busy() {
            log::debug!("Session switch refused: chat turn in flight");
            return Ok(false);
        }
        self.sessions.select_session(id, store)
    }

    /// Start a chat turn for the active session.
    pub fn submit<S: ConversationStore + ?Sized>(
        &mut self,
        text: &str,
        store: &S,
    ) -> std::result::Result<Applied<TurnTicket>, TurnRejected> {
        self.chat.begin_turn(&mut self.sessions, store, text)
    }

    /// Apply a finished backend call.
    pub fn apply_outcome<S: ConversationStore + ?Sized>(
        &mut self,
        outcome: TurnOutcome,
        store: &S,
    ) -> TurnReport {
        self.chat.finish_turn(&mut self.sessions, store, outcome)
    }

    /// Hide the active transcript from view.
    pub fn clear_chat_view(&mut self) {
        if let Some(active) = self.sessions.active_mut() {
            active.clear_view();
        }
    }

    /// Open a tool reached from an organization's detail view.
    /// The organization tabs are left untouched.
    pub fn open_related_tool(&mut self, tool: Tool) -> bool {
        self.tools.select(tool)
    }

    /// Open an organization reached from a tool's detail view.
    /// The tool tabs are left untouched.
    pub fn open_related_organization(&mut self, organization: Organization) -> bool {
        self.organizations.select(organization)
    }

    /// Full UI reset of both explorers.
    pub fn reset_exploration(&mut self) {
        self.organizations.reset();
        self.tools.reset();
    }
}
