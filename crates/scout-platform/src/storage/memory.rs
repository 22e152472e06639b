//! In-memory store.
//! Fast and dependency-free, but everything is lost on exit.

use std::cell::RefCell;

use rand::seq::SliceRandom;

use scout_core::ports::{CatalogPort, ConversationStore};
use scout_types::{
    Result, ScoutError,
    entity::{Entity, EntityId, Organization, Tool},
    message::Message,
    session::Session,
};

#[derive(Default)]
pub struct MemoryStore {
    sessions: RefCell<Vec<Session>>,
    messages: RefCell<Vec<Message>>,
    organizations: RefCell<Vec<Organization>>,
    tools: RefCell<Vec<Tool>>,
    links: RefCell<Vec<(EntityId, EntityId)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_organization(&self, org: Organization) {
        upsert(&mut self.organizations.borrow_mut(), org);
    }

    pub fn insert_tool(&self, tool: Tool) {
        upsert(&mut self.tools.borrow_mut(), tool);
    }

    pub fn link_tool(&self, organization_id: EntityId, tool_id: EntityId) {
        let mut links = self.links.borrow_mut();
        if !links.contains(&(organization_id, tool_id)) {
            links.push((organization_id, tool_id));
        }
    }
}

fn upsert<E: Entity>(items: &mut Vec<E>, entity: E) {
    match items.iter_mut().find(|e| e.id() == entity.id()) {
        Some(existing) => *existing = entity,
        None => items.push(entity),
    }
}

fn sample<E: Entity>(items: &[E], n: usize) -> Vec<E> {
    items
        .choose_multiple(&mut rand::thread_rng(), n)
        .cloned()
        .collect()
}

fn search<E: Entity>(items: &[E], term: &str, limit: usize) -> Vec<E> {
    let needle = term.to_lowercase();
    let mut found: Vec<E> = items
        .iter()
        .filter(|e| e.name().to_lowercase().contains(&needle))
        .cloned()
        .collect();
    found.sort_by(|a, b| a.name().cmp(b.name()));
    found.truncate(limit);
    found
}

impl ConversationStore for MemoryStore {
    fn list_sessions(&self) -> Result<Vec<Session>> {
        let mut sessions = self.sessions.borrow().clone();
        sessions.sort_by_key(|s| s.created_at);
        Ok(sessions)
    }

    fn create_session(&self, session: &Session) -> Result<()> {
        let mut sessions = self.sessions.borrow_mut();
        if sessions.iter().any(|s| s.id == session.id) {
            return Err(ScoutError::DataAccess(format!("Session {} already exists", session.id)));
        }
        sessions.push(session.clone());
        Ok(())
    }

    fn update_session_title(&self, id: &str, title: &str) -> Result<()> {
        let mut sessions = self.sessions.borrow_mut();
        let session = sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| ScoutError::DataAccess(format!("Unknown session {}", id)))?;
        session.title = title.to_string();
        Ok(())
    }

    fn load_transcript(&self, session_id: &str) -> Result<Vec<Message>> {
        let mut transcript: Vec<Message> = self
            .messages
            .borrow()
            .iter()
            .filter(|m| m.session_id == session_id)
            .cloned()
            .collect();
        transcript.sort_by_key(|m| m.sequence);
        Ok(transcript)
    }

    fn append_message(&self, message: &Message) -> Result<()> {
        let mut messages = self.messages.borrow_mut();
        if messages
            .iter()
            .any(|m| m.session_id == message.session_id && m.sequence == message.sequence)
        {
            return Err(ScoutError::DataAccess(format!(
                "Duplicate sequence {} in session {}",
                message.sequence, message.session_id
            )));
        }
        messages.push(message.clone());
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}

impl CatalogPort for MemoryStore {
    fn random_organizations(&self, n: usize) -> Result<Vec<Organization>> {
        Ok(sample(&self.organizations.borrow(), n))
    }

    fn random_tools(&self, n: usize) -> Result<Vec<Tool>> {
        Ok(sample(&self.tools.borrow(), n))
    }

    fn search_organizations(&self, term: &str, limit: usize) -> Result<Vec<Organization>> {
        Ok(search(&self.organizations.borrow(), term, limit))
    }

    fn search_tools(&self, term: &str, limit: usize) -> Result<Vec<Tool>> {
        Ok(search(&self.tools.borrow(), term, limit))
    }

    fn tools_for_organization(&self, organization_id: EntityId) -> Result<Vec<Tool>> {
        let links = self.links.borrow();
        let mut tools: Vec<Tool> = self
            .tools
            .borrow()
            .iter()
            .filter(|t| links.contains(&(organization_id, t.id)))
            .cloned()
            .collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tools)
    }

    fn organizations_for_tool(&self, tool_id: EntityId, limit: usize) -> Result<Vec<Organization>> {
        let links = self.links.borrow();
        let mut orgs: Vec<Organization> = self
            .organizations
            .borrow()
            .iter()
            .filter(|o| links.contains(&(o.id, tool_id)))
            .cloned()
            .collect();
        orgs.sort_by(|a, b| a.name.cmp(&b.name));
        orgs.truncate(limit);
        Ok(orgs)
    }
}
