//! Entity explorer: search, random sampling and tabbed detail views over
//! one catalog kind, generic over [`Explorable`].
//!
//! Catalog calls are synchronous; each one holds the explorer's busy flag
//! for its duration.

use scout_types::{
    Result,
    entity::{Entity, EntityId, Organization, Tool},
};
use crate::busy::BusyFlag;
use crate::ports::CatalogPort;
use crate::selection::SelectionSet;

/// Result cap for name searches.
pub const SEARCH_LIMIT: usize = 10;
/// Default size of a random sample.
pub const DEFAULT_SAMPLE_SIZE: usize = 10;
/// Cap for "organizations using this tool". Tools of an organization are uncapped.
pub const RELATED_ORGANIZATIONS_LIMIT: usize = 10;

/// An entity kind the catalog can search, sample and relate.
pub trait Explorable: Entity {
    /// The kind on the other side of the usage relationship.
    type Related: Entity;

    fn search<C: CatalogPort + ?Sized>(catalog: &C, term: &str, limit: usize) -> Result<Vec<Self>>;

    fn sample<C: CatalogPort + ?Sized>(catalog: &C, n: usize) -> Result<Vec<Self>>;

    fn related<C: CatalogPort + ?Sized>(catalog: &C, id: EntityId) -> Result<Vec<Self::Related>>;
}

impl Explorable for Organization {
    type Related = Tool;

    fn search<C: CatalogPort + ?Sized>(catalog: &C, term: &str, limit: usize) -> Result<Vec<Self>> {
        catalog.search_organizations(term, limit)
    }

    fn sample<C: CatalogPort + ?Sized>(catalog: &C, n: usize) -> Result<Vec<Self>> {
        catalog.random_organizations(n)
    }

    fn related<C: CatalogPort + ?Sized>(catalog: &C, id: EntityId) -> Result<Vec<Tool>> {
        catalog.tools_for_organization(id)
    }
}

impl Explorable for Tool {
    type Related = Organization;

    fn search<C: CatalogPort + ?Sized>(catalog: &C, term: &str, limit: usize) -> Result<Vec<Self>> {
        catalog.search_tools(term, limit)
    }

    fn sample<C: CatalogPort + ?Sized>(catalog: &C, n: usize) -> Result<Vec<Self>> {
        catalog.random_tools(n)
    }

    fn related<C: CatalogPort + ?Sized>(catalog: &C, id: EntityId) -> Result<Vec<Organization>> {
        catalog.organizations_for_tool(id, RELATED_ORGANIZATIONS_LIMIT)
    }
}

/// What the search area shows.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchResults<E> {
    /// No query issued (blank term): neither results nor an error.
    NotSearched,
    Found(Vec<E>),
    /// The query ran and matched nothing.
    NoMatches,
    Failed(String),
}

/// Relationship rows behind the focused tab.
#[derive(Debug, Clone, PartialEq)]
pub enum Detail<R> {
    Loaded(Vec<R>),
    Failed(String),
}

pub struct EntityExplorer<E: Explorable> {
    results: SearchResults<E>,
    sample: Vec<E>,
    sample_error: Option<String>,
    selection: SelectionSet<E>,
    focused: Option<EntityId>,
    detail: Option<Detail<E::Related>>,
    busy: BusyFlag,
}

impl<E: Explorable> EntityExplorer<E> {
    pub fn new() -> Self {
        Self {
            results: SearchResults::NotSearched,
            sample: Vec::new(),
            sample_error: None,
            selection: SelectionSet::new(),
            focused: None,
            detail: None,
            busy: BusyFlag::new(),
        }
    }

    /// Search by name. A blank term issues no query and clears the results.
    ///
    /// Returns whether a query was executed.
    pub fn search<C: CatalogPort + ?Sized>(&mut self, catalog: &C, term: &str) -> bool {
        let term = term.trim();
        if term.is_empty() {
            self.results = SearchResults::NotSearched;
            return false;
        }
        let Some(_guard) = self.busy.try_acquire() else {
            return false;
        };

        self.results = match E::search(catalog, term, SEARCH_LIMIT) {
            Ok(found) if found.is_empty() => SearchResults::NoMatches,
            Ok(found) => SearchResults::Found(found),
            Err(e) => {
                log::warn!("{} search for {:?} failed: {}", E::KIND.label(), term, e);
                SearchResults::Failed(e.to_string())
            }
        };
        true
    }

    /// Draw a fresh random sample of up to `n` entities.
    pub fn sample_random<C: CatalogPort + ?Sized>(&mut self, catalog: &C, n: usize) -> bool {
        let Some(_guard) = self.busy.try_acquire() else {
            return false;
        };

        match E::sample(catalog, n) {
            Ok(sample) => {
                self.sample = sample;
                self.sample_error = None;
            }
            Err(e) => {
                log::warn!("{} sample failed: {}", E::KIND.label(), e);
                self.sample.clear();
                self.sample_error = Some(e.to_string());
            }
        }
        true
    }

    /// Open `entity` as a tab. Already-open entities are left where they are.
    pub fn select(&mut self, entity: E) -> bool {
        let added = self.selection.add(entity);
        if added {
            log::debug!("{} tabs: {}", E::KIND.label(), self.selection.len());
        }
        added
    }

    /// Close the tab for `id`. Closing the focused tab clears its detail.
    pub fn close(&mut self, id: EntityId) -> bool {
        let removed = self.selection.remove(id);
        if removed && self.focused == Some(id) {
            self.focused = None;
            self.detail = None;
        }
        removed
    }

    /// Focus the tab for `id` and (re)load its relationship rows.
    ///
    /// The query is issued on every focus; nothing is cached.
    pub fn focus<C: CatalogPort + ?Sized>(&mut self, catalog: &C, id: EntityId) -> bool {
        if !self.selection.contains(id) {
            return false;
        }
        let Some(_guard) = self.busy.try_acquire() else {
            return false;
        };

        self.focused = Some(id);
        self.detail = Some(match E::related(catalog, id) {
            Ok(rows) => Detail::Loaded(rows),
            Err(e) => {
                log::warn!("Detail load for {} {} failed: {}", E::KIND.label(), id, e);
                Detail::Failed(e.to_string())
            }
        });
        true
    }

    /// Drop results, sample, tabs and detail.
    pub fn reset(&mut self) {
        self.results = SearchResults::NotSearched;
        self.sample.clear();
        self.sample_error = None;
        self.selection.clear();
        self.focused = None;
        self.detail = None;
    }

    pub fn results(&self) -> &SearchResults<E> {
        &self.results
    }

    pub fn sample(&self) -> &[E] {
        &self.sample
    }

    pub fn sample_error(&self) -> Option<&str> {
        self.sample_error.as_deref()
    }

    pub fn selection(&self) -> &SelectionSet<E> {
        &self.selection
    }

    pub fn focused(&self) -> Option<EntityId> {
        self.focused
    }

    pub fn focused_entity(&self) -> Option<&E> {
        self.focused.and_then(|id| self.selection.get(id))
    }

    pub fn detail(&self) -> Option<&Detail<E::Related>> {
        self.detail.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }
}

impl<E: Explorable> Default for EntityExplorer<E> {
    fn default() -> Self {
        Self::new()
    }
}
