//! Selection set: the ordered, de-duplicated entities a user has opened as
//! tabs in one explorer.

use scout_types::entity::{Entity, EntityId};

#[derive(Debug, Clone)]
pub struct SelectionSet<E: Entity> {
    entries: Vec<E>,
}

impl<E: Entity> SelectionSet<E> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append `entity` unless its id is already held. Returns whether it was added.
    pub fn add(&mut self, entity: E) -> bool {
        if self.contains(entity.id()) {
            return false;
        }
        self.entries.push(entity);
        true
    }

    /// Drop the entry with `id`. Survivors keep their relative order.
    pub fn remove(&mut self, id: EntityId) -> bool {
        match self.position(id) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Held entities in insertion order, one tab each.
    pub fn values(&self) -> &[E] {
        &self.entries
    }

    pub fn get(&self, id: EntityId) -> Option<&E> {
        self.entries.iter().find(|e| e.id() == id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.position(id).is_some()
    }

    pub fn position(&self, id: EntityId) -> Option<usize> {
        self.entries.iter().position(|e| e.id() == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<E: Entity> Default for SelectionSet<E> {
    fn default() -> Self {
        Self::new()
    }
}
