//! Session manager: the catalog of conversation sessions and the active one.
//!
//! Sessions are kept in creation order. Exactly one session is active at a
//! time (or none, if its transcript could not be loaded); its transcript is
//! held in memory and extended by the chat controller.

use scout_types::{
    Result,
    message::{Message, Role},
    session::Session,
};
use crate::applied::Applied;
use crate::ports::ConversationStore;

/// The active session's in-memory transcript plus its numbering state.
#[derive(Debug, Clone)]
pub struct ActiveSession {
    session_id: String,
    transcript: Vec<Message>,
    /// Sequence the next appended message receives.
    next_sequence: i64,
    /// Human messages in the session's full history, including cleared ones.
    human_messages: usize,
}

impl ActiveSession {
    fn empty(session_id: String) -> Self {
        Self {
            session_id,
            transcript: Vec::new(),
            next_sequence: 1,
            human_messages: 0,
        }
    }

    fn from_transcript(session_id: String, mut transcript: Vec<Message>) -> Self {
        transcript.sort_by_key(|m| m.sequence);
        let next_sequence = transcript.last().map_or(1, |m| m.sequence + 1);
        let human_messages = transcript.iter().filter(|m| m.is_human()).count();
        Self {
            session_id,
            transcript,
            next_sequence,
            human_messages,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Visible messages in `sequence` order.
    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn human_messages(&self) -> usize {
        self.human_messages
    }

    /// Append a message with the next sequence number and return a copy.
    pub(crate) fn push(&mut self, role: Role, content: &str) -> Message {
        let message = match role {
            Role::Human => Message::human(&self.session_id, self.next_sequence, content),
            Role::Assistant => Message::assistant(&self.session_id, self.next_sequence, content),
        };
        self.next_sequence += 1;
        if role == Role::Human {
            self.human_messages += 1;
        }
        self.transcript.push(message.clone());
        message
    }

    /// Hide every message from view. Persisted history and numbering are kept.
    pub fn clear_view(&mut self) {
        self.transcript.clear();
    }
}

/// Owns the session catalog and the active session.
#[derive(Debug, Default)]
pub struct SessionManager {
    sessions: Vec<Session>,
    active: Option<ActiveSession>,
}

impl SessionManager {
    /// Startup: list sessions and activate one.
    ///
    /// - catalog unreachable: a synthesized, unpersisted session is activated
    ///   and the listing error is returned as the warning;
    /// - catalog empty: a session is created implicitly;
    /// - otherwise the most recently created session is selected.
    pub fn open<S: ConversationStore + ?Sized>(store: &S) -> Applied<Self> {
        let mut manager = Self::default();

        let sessions = match store.list_sessions() {
            Ok(sessions) => sessions,
            Err(e) => {
                log::warn!("Session catalog unavailable ({}), using a local session", e);
                let session = Session::generate();
                manager.active = Some(ActiveSession::empty(session.id.clone()));
                manager.sessions.push(session);
                return Applied::with_error(manager, Some(e));
            }
        };

        if sessions.is_empty() {
            let created = manager.create_session(store);
            return created.map(|_| manager);
        }

        manager.sessions = sessions;
        manager.sessions.sort_by_key(|s| s.created_at);

        let latest = manager.sessions.last().map(|s| s.id.clone());
        let mut warning = None;
        if let Some(id) = latest {
            if let Err(e) = manager.select_session(&id, store) {
                log::warn!("Failed to load transcript for {}: {}", id, e);
                warning = Some(e);
            }
        }
        Applied::with_error(manager, warning)
    }

    /// Sessions in creation order.
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn active(&self) -> Option<&ActiveSession> {
        self.active.as_ref()
    }

    pub(crate) fn active_mut(&mut self) -> Option<&mut ActiveSession> {
        self.active.as_mut()
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.session_id.as_str())
    }

    /// Catalog entry of the active session.
    pub fn active_session(&self) -> Option<&Session> {
        let id = self.active_id()?;
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn find(&self, id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    /// Create, persist, append to the catalog and activate a new session.
    ///
    /// The session is kept in memory even if the write fails.
    pub fn create_session<S: ConversationStore + ?Sized>(&mut self, store: &S) -> Applied<String> {
        let session = Session::generate();
        let id = session.id.clone();

        let persist_error = match store.create_session(&session) {
            Ok(()) => None,
            Err(e) => {
                log::error!("Failed to persist session {}: {}", id, e);
                Some(e)
            }
        };

        log::info!("Created session {}", id);
        self.sessions.push(session);
        self.active = Some(ActiveSession::empty(id.clone()));
        Applied::with_error(id, persist_error)
    }

    /// Activate `id`, loading its transcript.
    ///
    /// Returns `Ok(false)` when `id` is already active or unknown. On a load
    /// failure the previously active session stays active.
    pub fn select_session<S: ConversationStore + ?Sized>(
        &mut self,
        id: &str,
        store: &S,
    ) -> Result<bool> {
        if self.active_id() == Some(id) {
            return Ok(false);
        }
        if self.find(id).is_none() {
            log::debug!("Ignoring selection of unknown session {}", id);
            return Ok(false);
        }

        let transcript = store.load_transcript(id)?;
        log::info!("Selected session {} ({} messages)", id, transcript.len());
        self.active = Some(ActiveSession::from_transcript(id.to_string(), transcript));
        Ok(true)
    }

    /// Title the active session after its first human message.
    ///
    /// Fires only when the session's history holds exactly one human
    /// message, so later messages never retitle it. Returns whether it fired.
    pub fn rename_active_on_first_message<S: ConversationStore + ?Sized>(
        &mut self,
        text: &str,
        store: &S,
    ) -> Applied<bool> {
        let id = match self.active.as_ref() {
            Some(active) if active.human_messages() == 1 => active.session_id.clone(),
            _ => return Applied::ok(false),
        };

        let persist_error = store.update_session_title(&id, text).err();
        if let Some(ref e) = persist_error {
            log::error!("Failed to persist title for {}: {}", id, e);
        }

        if let Some(session) = self.sessions.iter_mut().find(|s| s.id == id) {
            session.title = text.to_string();
        }
        log::info!("Renamed session {}", id);
        Applied::with_error(true, persist_error)
    }
}
