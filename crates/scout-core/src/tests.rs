#[cfg(test)]
mod tests {
    use crate::busy::BusyFlag;
    use crate::chat::*;
    use crate::context::ScoutContext;
    use crate::event_bus::{EventBus, ScoutEvent};
    use crate::explorer::*;
    use crate::ports::*;
    use crate::selection::SelectionSet;
    use crate::session::SessionManager;
    use scout_types::entity::*;
    use scout_types::message::*;
    use scout_types::session::*;
    use scout_types::{Result, ScoutError};
    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use futures::executor::block_on;
    use std::cell::{Cell, RefCell};
    use std::sync::Mutex;

    // ─── Mocks ───────────────────────────────────────────────

    #[derive(Default)]
    struct MockStore {
        sessions: RefCell<Vec<Session>>,
        messages: RefCell<Vec<Message>>,
        organizations: Vec<Organization>,
        tools: Vec<Tool>,
        links: Vec<(EntityId, EntityId)>,
        fail_list: Cell<bool>,
        fail_writes: Cell<bool>,
        fail_load: Cell<bool>,
        fail_catalog: Cell<bool>,
        loads: Cell<usize>,
        catalog_queries: Cell<usize>,
        last_limit: Cell<Option<usize>>,
    }

    impl MockStore {
        fn with_catalog() -> Self {
            Self {
                organizations: vec![
                    Organization::new(1, "Acme Corp"),
                    Organization::new(2, "Globex"),
                    Organization::new(3, "Initech"),
                ],
                tools: vec![
                    Tool::new(10, "Salesforce", "CRM"),
                    Tool::new(11, "Slack", "Communication"),
                    Tool::new(12, "HubSpot", "CRM"),
                ],
                links: vec![(1, 10), (1, 11), (2, 11), (3, 12)],
                ..Default::default()
            }
        }

        fn seed_session(&self, id: &str, minutes_ago: i64) {
            let mut session = Session::new(id);
            session.created_at = Utc::now() - Duration::minutes(minutes_ago);
            self.sessions.borrow_mut().push(session);
        }

        fn persisted_messages(&self, session_id: &str) -> Vec<Message> {
            self.messages
                .borrow()
                .iter()
                .filter(|m| m.session_id == session_id)
                .cloned()
                .collect()
        }

        fn persisted_title(&self, session_id: &str) -> Option<String> {
            self.sessions
                .borrow()
                .iter()
                .find(|s| s.id == session_id)
                .map(|s| s.title.clone())
        }

        fn catalog_call(&self, limit: Option<usize>) -> Result<()> {
            self.catalog_queries.set(self.catalog_queries.get() + 1);
            self.last_limit.set(limit);
            if self.fail_catalog.get() {
                return Err(ScoutError::DataAccess("catalog offline".to_string()));
            }
            Ok(())
        }

        fn write_check(&self) -> Result<()> {
            if self.fail_writes.get() {
                return Err(ScoutError::DataAccess("read-only".to_string()));
            }
            Ok(())
        }
    }

    fn matching<E: Entity>(items: &[E], term: &str, limit: usize) -> Vec<E> {
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

    impl ConversationStore for MockStore {
        fn list_sessions(&self) -> Result<Vec<Session>> {
            if self.fail_list.get() {
                return Err(ScoutError::DataAccess("connection refused".to_string()));
            }
            let mut sessions = self.sessions.borrow().clone();
            sessions.sort_by_key(|s| s.created_at);
            Ok(sessions)
        }

        fn create_session(&self, session: &Session) -> Result<()> {
            self.write_check()?;
            self.sessions.borrow_mut().push(session.clone());
            Ok(())
        }

        fn update_session_title(&self, id: &str, title: &str) -> Result<()> {
            self.write_check()?;
            if let Some(s) = self.sessions.borrow_mut().iter_mut().find(|s| s.id == id) {
                s.title = title.to_string();
            }
            Ok(())
        }

        fn load_transcript(&self, session_id: &str) -> Result<Vec<Message>> {
            self.loads.set(self.loads.get() + 1);
            if self.fail_load.get() {
                return Err(ScoutError::DataAccess("timeout".to_string()));
            }
            let mut messages = self.persisted_messages(session_id);
            messages.sort_by_key(|m| m.sequence);
            Ok(messages)
        }

        fn append_message(&self, message: &Message) -> Result<()> {
            self.write_check()?;
            self.messages.borrow_mut().push(message.clone());
            Ok(())
        }

        fn backend_name(&self) -> &str {
            "mock"
        }
    }

    impl CatalogPort for MockStore {
        fn random_organizations(&self, n: usize) -> Result<Vec<Organization>> {
            self.catalog_call(Some(n))?;
            Ok(self.organizations.iter().take(n).cloned().collect())
        }

        fn random_tools(&self, n: usize) -> Result<Vec<Tool>> {
            self.catalog_call(Some(n))?;
            Ok(self.tools.iter().take(n).cloned().collect())
        }

        fn search_organizations(&self, term: &str, limit: usize) -> Result<Vec<Organization>> {
            self.catalog_call(Some(limit))?;
            Ok(matching(&self.organizations, term, limit))
        }

        fn search_tools(&self, term: &str, limit: usize) -> Result<Vec<Tool>> {
            self.catalog_call(Some(limit))?;
            Ok(matching(&self.tools, term, limit))
        }

        fn tools_for_organization(&self, organization_id: EntityId) -> Result<Vec<Tool>> {
            self.catalog_call(None)?;
            Ok(self
                .links
                .iter()
                .filter(|(o, _)| *o == organization_id)
                .filter_map(|(_, t)| self.tools.iter().find(|tool| tool.id == *t).cloned())
                .collect())
        }

        fn organizations_for_tool(
            &self,
            tool_id: EntityId,
            limit: usize,
        ) -> Result<Vec<Organization>> {
            self.catalog_call(Some(limit))?;
            Ok(self
                .links
                .iter()
                .filter(|(_, t)| *t == tool_id)
                .filter_map(|(o, _)| self.organizations.iter().find(|org| org.id == *o).cloned())
                .take(limit)
                .collect())
        }
    }

    struct MockBackend {
        reply: Result<String>,
        received: Mutex<Vec<ChatQuery>>,
    }

    impl MockBackend {
        fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                received: Mutex::new(Vec::new()),
            }
        }

        fn failing(err: ScoutError) -> Self {
            Self {
                reply: Err(err),
                received: Mutex::new(Vec::new()),
            }
        }

        fn received(&self) -> Vec<ChatQuery> {
            self.received.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatBackendPort for MockBackend {
        async fn generate(&self, query: &ChatQuery) -> Result<String> {
            self.received.lock().unwrap().push(query.clone());
            self.reply.clone()
        }

        fn endpoint(&self) -> &str {
            "mock://generate"
        }
    }

    fn open_manager(store: &MockStore) -> SessionManager {
        let opened = SessionManager::open(store);
        assert!(opened.persist_error.is_none());
        opened.value
    }

    // ─── BusyFlag Tests ──────────────────────────────────────

    #[test]
    fn test_busy_flag_single_holder() {
        let flag = BusyFlag::new();
        assert!(!flag.is_busy());

        let guard = flag.try_acquire();
        assert!(guard.is_some());
        assert!(flag.is_busy());
        assert!(flag.try_acquire().is_none());

        drop(guard);
        assert!(!flag.is_busy());
        assert!(flag.try_acquire().is_some());
    }

    #[test]
    fn test_busy_flag_clone_shares_state() {
        let a = BusyFlag::new();
        let b = a.clone();
        let _guard = a.try_acquire().unwrap();
        assert!(b.is_busy());
        assert!(b.try_acquire().is_none());
    }

    // ─── EventBus Tests ──────────────────────────────────────

    #[test]
    fn test_event_bus_new_is_empty() {
        let bus = EventBus::new();
        assert!(!bus.has_pending());
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn test_event_bus_emit_from_thread() {
        let store = MockStore::default();
        let mut manager = open_manager(&store);
        let mut chat = ChatController::new();
        let ticket = chat.begin_turn(&mut manager, &store, "hello").unwrap().value;

        let bus = EventBus::new();
        let remote = bus.clone();
        std::thread::spawn(move || {
            remote.emit(ScoutEvent::TurnFinished(TurnOutcome {
                ticket,
                reply: Ok("hi".to_string()),
            }));
        })
        .join()
        .unwrap();

        assert!(bus.has_pending());
        let events = bus.drain();
        assert_eq!(events.len(), 1);
        assert!(!bus.has_pending());

        let ScoutEvent::TurnFinished(outcome) = events.into_iter().next().unwrap();
        let report = chat.finish_turn(&mut manager, &store, outcome);
        assert!(report.succeeded());
        assert_eq!(manager.active().unwrap().transcript().len(), 2);
    }

    // ─── SessionManager Tests ────────────────────────────────

    #[test]
    fn test_open_empty_catalog_creates_session() {
        let store = MockStore::default();
        let manager = open_manager(&store);

        assert_eq!(manager.sessions().len(), 1);
        let session = manager.active_session().unwrap();
        assert_eq!(session.title, DEFAULT_SESSION_TITLE);
        assert!(manager.active().unwrap().transcript().is_empty());
        assert_eq!(store.sessions.borrow().len(), 1);
    }

    #[test]
    fn test_open_selects_latest_session() {
        let store = MockStore::default();
        store.seed_session("old", 60);
        store.seed_session("new", 5);
        store.messages.borrow_mut().push(Message::human("new", 1, "q"));
        store.messages.borrow_mut().push(Message::assistant("new", 2, "a"));

        let manager = open_manager(&store);
        let ids: Vec<&str> = manager.sessions().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["old", "new"]);
        assert_eq!(manager.active_id(), Some("new"));

        let active = manager.active().unwrap();
        assert_eq!(active.transcript().len(), 2);
        assert_eq!(active.human_messages(), 1);
    }

    #[test]
    fn test_open_degrades_when_catalog_unreachable() {
        let store = MockStore::default();
        store.fail_list.set(true);

        let opened = SessionManager::open(&store);
        assert!(matches!(opened.persist_error, Some(ScoutError::DataAccess(_))));

        let manager = opened.value;
        assert_eq!(manager.sessions().len(), 1);
        assert_eq!(manager.active_session().unwrap().title, DEFAULT_SESSION_TITLE);
        assert!(store.sessions.borrow().is_empty(), "synthesized session must not be persisted");
    }

    #[test]
    fn test_open_transcript_failure_leaves_no_active_session() {
        let store = MockStore::default();
        store.seed_session("s1", 1);
        store.fail_load.set(true);

        let opened = SessionManager::open(&store);
        assert!(opened.persist_error.is_some());
        assert!(opened.value.active().is_none());
        assert_eq!(opened.value.sessions().len(), 1);
    }

    #[test]
    fn test_create_session_appends_in_creation_order() {
        let store = MockStore::default();
        let mut manager = open_manager(&store);
        let first = manager.active_id().unwrap().to_string();

        let created = manager.create_session(&store);
        assert!(created.persist_error.is_none());
        let second = created.value;

        let ids: Vec<&str> = manager.sessions().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec![first.as_str(), second.as_str()]);
        assert_eq!(manager.active_id(), Some(second.as_str()));
        assert!(manager.active().unwrap().transcript().is_empty());
        assert_eq!(manager.active_session().unwrap().title, "New Session");
    }

    #[test]
    fn test_create_session_persist_failure_keeps_session() {
        let store = MockStore::default();
        let mut manager = open_manager(&store);
        store.fail_writes.set(true);

        let created = manager.create_session(&store);
        assert!(created.persist_error.is_some());
        assert_eq!(manager.sessions().len(), 2);
        assert_eq!(manager.active_id(), Some(created.value.as_str()));
    }

    #[test]
    fn test_select_active_session_is_noop() {
        let store = MockStore::default();
        let mut manager = open_manager(&store);
        let id = manager.active_id().unwrap().to_string();
        let loads = store.loads.get();

        assert!(!manager.select_session(&id, &store).unwrap());
        assert_eq!(store.loads.get(), loads);
    }

    #[test]
    fn test_select_unknown_session_is_noop() {
        let store = MockStore::default();
        let mut manager = open_manager(&store);
        let id = manager.active_id().unwrap().to_string();

        assert!(!manager.select_session("missing", &store).unwrap());
        assert_eq!(manager.active_id(), Some(id.as_str()));
    }

    #[test]
    fn test_select_loads_transcript_in_sequence_order() {
        let store = MockStore::default();
        store.seed_session("a", 10);
        store.seed_session("b", 5);
        {
            let mut messages = store.messages.borrow_mut();
            messages.push(Message::assistant("a", 2, "second"));
            messages.push(Message::human("a", 1, "first"));
            messages.push(Message::human("a", 3, "third"));
        }

        let mut manager = open_manager(&store);
        assert_eq!(manager.active_id(), Some("b"));
        assert!(manager.select_session("a", &store).unwrap());

        let sequences: Vec<i64> = manager
            .active()
            .unwrap()
            .transcript()
            .iter()
            .map(|m| m.sequence)
            .collect();
        assert_eq!(sequences, vec![1, 2, 3]);
    }

    #[test]
    fn test_select_failure_keeps_previous_session() {
        let store = MockStore::default();
        store.seed_session("a", 10);
        store.seed_session("b", 5);
        let mut manager = open_manager(&store);

        store.fail_load.set(true);
        assert!(manager.select_session("a", &store).is_err());
        assert_eq!(manager.active_id(), Some("b"));
    }

    #[test]
    fn test_rename_requires_exactly_one_human_message() {
        let store = MockStore::default();
        let mut manager = open_manager(&store);

        // No human message yet
        let fired = manager.rename_active_on_first_message("x", &store);
        assert!(!fired.value);
        assert_eq!(manager.active_session().unwrap().title, DEFAULT_SESSION_TITLE);
    }

    // ─── ChatController Tests ────────────────────────────────

    #[test]
    fn test_chat_initial_state() {
        let chat = ChatController::new();
        assert_eq!(chat.phase(), ChatPhase::Idle);
        assert!(!chat.is_busy());
    }

    #[test]
    fn test_chat_turn_success_and_title() {
        let store = MockStore::default();
        let mut manager = open_manager(&store);
        let id = manager.active_id().unwrap().to_string();
        let mut chat = ChatController::new();
        let backend = MockBackend::replying("hi there");

        let report = block_on(chat.run_turn(&mut manager, &store, &backend, "hello")).unwrap();
        assert_eq!(report, TurnReport::default());
        assert_eq!(chat.phase(), ChatPhase::Idle);
        assert!(!chat.is_busy());

        let transcript = manager.active().unwrap().transcript();
        assert_eq!(transcript.len(), 2);
        let rows: Vec<(i64, Role, &str)> = transcript
            .iter()
            .map(|m| (m.sequence, m.role, m.content.as_str()))
            .collect();
        assert_eq!(rows, vec![(1, Role::Human, "hello"), (2, Role::Assistant, "hi there")]);

        assert_eq!(manager.active_session().unwrap().title, "hello");
        assert_eq!(store.persisted_title(&id).as_deref(), Some("hello"));
        assert_eq!(store.persisted_messages(&id).len(), 2);

        let sent = backend.received();
        assert_eq!(sent, vec![ChatQuery { user_query: "hello".to_string(), session_id: id }]);
    }

    #[test]
    fn test_chat_second_message_keeps_title() {
        let store = MockStore::default();
        let mut manager = open_manager(&store);
        let id = manager.active_id().unwrap().to_string();
        let mut chat = ChatController::new();
        let backend = MockBackend::replying("ok");

        block_on(chat.run_turn(&mut manager, &store, &backend, "first question")).unwrap();
        block_on(chat.run_turn(&mut manager, &store, &backend, "second question")).unwrap();

        assert_eq!(manager.active_session().unwrap().title, "first question");
        assert_eq!(store.persisted_title(&id).as_deref(), Some("first question"));
        let sequences: Vec<i64> =
            store.persisted_messages(&id).iter().map(|m| m.sequence).collect();
        assert_eq!(sequences, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_chat_title_set_before_reply_arrives() {
        let store = MockStore::default();
        let mut manager = open_manager(&store);
        let mut chat = ChatController::new();

        let ticket = chat.begin_turn(&mut manager, &store, "hello").unwrap();
        assert_eq!(chat.phase(), ChatPhase::Sending);
        assert!(chat.is_busy());
        assert_eq!(manager.active_session().unwrap().title, "hello");
        assert_eq!(manager.active().unwrap().transcript().len(), 1);

        chat.mark_dispatched(&ticket.value);
        assert_eq!(chat.phase(), ChatPhase::AwaitingReply);
    }

    #[test]
    fn test_chat_backend_failure_keeps_human_message() {
        let store = MockStore::default();
        let mut manager = open_manager(&store);
        let mut chat = ChatController::new();
        let reset = ScoutError::BackendUnreachable("connection reset".to_string());
        let backend = MockBackend::failing(reset);

        let report = block_on(chat.run_turn(&mut manager, &store, &backend, "ping")).unwrap();
        assert!(matches!(report.failure, Some(ScoutError::BackendUnreachable(_))));
        assert_eq!(chat.phase(), ChatPhase::Idle);
        assert!(!chat.is_busy());

        let transcript = manager.active().unwrap().transcript();
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript[0].sequence, 1);
        assert_eq!(transcript[0].content, "ping");

        // A new utterance is accepted straight away
        let retry = MockBackend::replying("pong");
        let report = block_on(chat.run_turn(&mut manager, &store, &retry, "ping again")).unwrap();
        assert!(report.succeeded());
        assert_eq!(manager.active().unwrap().transcript().len(), 3);
    }

    #[test]
    fn test_chat_contract_violation_is_a_failure() {
        let store = MockStore::default();
        let mut manager = open_manager(&store);
        let mut chat = ChatController::new();
        let violation = ScoutError::BackendContract("missing `response`".to_string());
        let backend = MockBackend::failing(violation);

        let report = block_on(chat.run_turn(&mut manager, &store, &backend, "hi")).unwrap();
        assert!(report.failure.unwrap().is_backend());
        assert_eq!(manager.active().unwrap().transcript().len(), 1);
    }

    #[test]
    fn test_chat_rejects_blank_utterance() {
        let store = MockStore::default();
        let mut manager = open_manager(&store);
        let mut chat = ChatController::new();

        assert_eq!(
            chat.begin_turn(&mut manager, &store, "   ").unwrap_err(),
            TurnRejected::EmptyUtterance
        );
        assert!(manager.active().unwrap().transcript().is_empty());
        assert!(!chat.is_busy());
    }

    #[test]
    fn test_chat_rejects_without_active_session() {
        let store = MockStore::default();
        let mut manager = SessionManager::default();
        let mut chat = ChatController::new();

        assert_eq!(
            chat.begin_turn(&mut manager, &store, "hello").unwrap_err(),
            TurnRejected::NoActiveSession
        );
        assert!(store.messages.borrow().is_empty());
        assert_eq!(chat.phase(), ChatPhase::Idle);
    }

    #[test]
    fn test_chat_rejects_second_turn_in_flight() {
        let store = MockStore::default();
        let mut manager = open_manager(&store);
        let mut chat = ChatController::new();

        let ticket = chat.begin_turn(&mut manager, &store, "one").unwrap().value;
        assert_eq!(
            chat.begin_turn(&mut manager, &store, "two").unwrap_err(),
            TurnRejected::TurnInFlight
        );
        assert_eq!(manager.active().unwrap().transcript().len(), 1);

        let outcome = TurnOutcome { ticket, reply: Ok("done".to_string()) };
        let _ = chat.finish_turn(&mut manager, &store, outcome);
        assert!(chat.begin_turn(&mut manager, &store, "two").is_ok());
    }

    #[test]
    fn test_chat_dropped_ticket_releases_turn() {
        let store = MockStore::default();
        let mut manager = open_manager(&store);
        let mut chat = ChatController::new();

        let ticket = chat.begin_turn(&mut manager, &store, "lost").unwrap();
        assert!(chat.is_busy());
        assert_eq!(chat.phase(), ChatPhase::Sending);
        drop(ticket);
        assert!(!chat.is_busy());
        assert_eq!(chat.phase(), ChatPhase::Idle);
    }

    #[test]
    fn test_chat_persist_failure_keeps_transcript() {
        let store = MockStore::default();
        let mut manager = open_manager(&store);
        let mut chat = ChatController::new();
        let backend = MockBackend::replying("noted");
        store.fail_writes.set(true);

        let report = block_on(chat.run_turn(&mut manager, &store, &backend, "remember")).unwrap();
        assert!(report.succeeded());
        assert_eq!(report.persist_errors.len(), 2);
        assert_eq!(manager.active().unwrap().transcript().len(), 2);
        assert_eq!(manager.active_session().unwrap().title, "remember");
    }

    #[test]
    fn test_chat_reply_for_inactive_session_is_dropped() {
        let store = MockStore::default();
        let mut manager = open_manager(&store);
        let mut chat = ChatController::new();

        let ticket = chat.begin_turn(&mut manager, &store, "hello").unwrap().value;
        let _ = manager.create_session(&store);

        let outcome = TurnOutcome {
            ticket,
            reply: Ok("late".to_string()),
        };
        let report = chat.finish_turn(&mut manager, &store, outcome);
        assert!(report.succeeded());
        assert!(manager.active().unwrap().transcript().is_empty());
    }

    #[test]
    fn test_clear_view_keeps_numbering_and_title() {
        let store = MockStore::default();
        let mut ctx = ScoutContext::open(&store).value;
        let backend = MockBackend::replying("r");

        block_on(ctx.chat.run_turn(&mut ctx.sessions, &store, &backend, "first")).unwrap();
        ctx.clear_chat_view();
        assert!(ctx.sessions.active().unwrap().transcript().is_empty());

        block_on(ctx.chat.run_turn(&mut ctx.sessions, &store, &backend, "second")).unwrap();
        let active = ctx.sessions.active().unwrap();
        assert_eq!(active.transcript()[0].sequence, 3);
        assert_eq!(ctx.sessions.active_session().unwrap().title, "first");
    }

    // ─── SelectionSet Tests ──────────────────────────────────

    #[test]
    fn test_selection_add_is_idempotent() {
        let mut set = SelectionSet::new();
        assert!(set.add(Organization::new(1, "A")));
        assert!(!set.add(Organization::new(1, "A")));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_selection_remove_preserves_order() {
        let mut set = SelectionSet::new();
        set.add(Organization::new(1, "A"));
        set.add(Organization::new(2, "B"));
        set.add(Organization::new(3, "C"));

        assert!(set.remove(1));
        let names: Vec<&str> = set.values().iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["B", "C"]);

        set.add(Organization::new(1, "A"));
        let names: Vec<&str> = set.values().iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["B", "C", "A"]);
    }

    #[test]
    fn test_selection_remove_missing_is_noop() {
        let mut set: SelectionSet<Tool> = SelectionSet::new();
        set.add(Tool::new(1, "Slack", "Chat"));
        assert!(!set.remove(99));
        assert_eq!(set.len(), 1);
    }

    // ─── EntityExplorer Tests ────────────────────────────────

    #[test]
    fn test_blank_search_issues_no_query() {
        let store = MockStore::with_catalog();
        let mut explorer: EntityExplorer<Organization> = EntityExplorer::new();

        assert!(!explorer.search(&store, ""));
        assert!(!explorer.search(&store, "   \t"));
        assert_eq!(store.catalog_queries.get(), 0);
        assert_eq!(explorer.results(), &SearchResults::NotSearched);
    }

    #[test]
    fn test_search_no_matches_is_distinct_state() {
        let store = MockStore::with_catalog();
        let mut explorer: EntityExplorer<Organization> = EntityExplorer::new();

        assert!(explorer.search(&store, "zzzznomatch"));
        assert_eq!(explorer.results(), &SearchResults::NoMatches);
    }

    #[test]
    fn test_search_results_use_fixed_limit() {
        let store = MockStore::with_catalog();
        let mut explorer: EntityExplorer<Tool> = EntityExplorer::new();

        assert!(explorer.search(&store, "  s "));
        assert_eq!(store.last_limit.get(), Some(SEARCH_LIMIT));
        match explorer.results() {
            SearchResults::Found(tools) => {
                let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
                assert_eq!(names, vec!["HubSpot", "Salesforce", "Slack"]);
            }
            other => panic!("unexpected results: {:?}", other),
        }
    }

    #[test]
    fn test_blank_search_clears_previous_results() {
        let store = MockStore::with_catalog();
        let mut explorer: EntityExplorer<Organization> = EntityExplorer::new();

        explorer.search(&store, "acme");
        assert!(matches!(explorer.results(), SearchResults::Found(_)));
        explorer.search(&store, " ");
        assert_eq!(explorer.results(), &SearchResults::NotSearched);
    }

    #[test]
    fn test_search_failure_is_reported_inline() {
        let store = MockStore::with_catalog();
        store.fail_catalog.set(true);
        let mut explorer: EntityExplorer<Organization> = EntityExplorer::new();

        assert!(explorer.search(&store, "acme"));
        assert!(matches!(
            explorer.results(),
            SearchResults::Failed(msg) if msg.contains("catalog offline")
        ));
        assert!(!explorer.is_busy());
    }

    #[test]
    fn test_sample_is_redrawn_on_each_call() {
        let store = MockStore::with_catalog();
        let mut explorer: EntityExplorer<Organization> = EntityExplorer::new();

        assert!(explorer.sample_random(&store, DEFAULT_SAMPLE_SIZE));
        assert!(explorer.sample_random(&store, 2));
        assert_eq!(store.catalog_queries.get(), 2);
        assert_eq!(explorer.sample().len(), 2);
        assert!(explorer.sample_error().is_none());
    }

    #[test]
    fn test_sample_failure_clears_sample() {
        let store = MockStore::with_catalog();
        let mut explorer: EntityExplorer<Tool> = EntityExplorer::new();
        explorer.sample_random(&store, 10);
        assert_eq!(explorer.sample().len(), 3);

        store.fail_catalog.set(true);
        explorer.sample_random(&store, 10);
        assert!(explorer.sample().is_empty());
        assert!(explorer.sample_error().is_some());
    }

    #[test]
    fn test_select_from_results_opens_tab() {
        let store = MockStore::with_catalog();
        let mut explorer: EntityExplorer<Organization> = EntityExplorer::new();
        explorer.search(&store, "glo");

        let SearchResults::Found(found) = explorer.results().clone() else {
            panic!("expected results");
        };
        assert!(explorer.select(found[0].clone()));
        assert!(!explorer.select(found[0].clone()));
        assert_eq!(explorer.selection().len(), 1);
        assert_eq!(explorer.selection().values()[0].name, "Globex");
    }

    #[test]
    fn test_focus_reloads_detail_every_time() {
        let store = MockStore::with_catalog();
        let mut explorer: EntityExplorer<Organization> = EntityExplorer::new();
        explorer.select(Organization::new(1, "Acme Corp"));

        assert!(explorer.focus(&store, 1));
        assert!(explorer.focus(&store, 1));
        assert_eq!(store.catalog_queries.get(), 2);
        assert_eq!(store.last_limit.get(), None);

        match explorer.detail() {
            Some(Detail::Loaded(tools)) => assert_eq!(tools.len(), 2),
            other => panic!("unexpected detail: {:?}", other),
        }
        assert_eq!(explorer.focused_entity().map(|o| o.id), Some(1));
    }

    #[test]
    fn test_tool_detail_caps_organizations() {
        let store = MockStore::with_catalog();
        let mut explorer: EntityExplorer<Tool> = EntityExplorer::new();
        explorer.select(Tool::new(11, "Slack", "Communication"));

        assert!(explorer.focus(&store, 11));
        assert_eq!(store.last_limit.get(), Some(RELATED_ORGANIZATIONS_LIMIT));
        match explorer.detail() {
            Some(Detail::Loaded(orgs)) => assert_eq!(orgs.len(), 2),
            other => panic!("unexpected detail: {:?}", other),
        }
    }

    #[test]
    fn test_focus_unselected_is_noop() {
        let store = MockStore::with_catalog();
        let mut explorer: EntityExplorer<Organization> = EntityExplorer::new();
        assert!(!explorer.focus(&store, 1));
        assert_eq!(store.catalog_queries.get(), 0);
        assert!(explorer.detail().is_none());
    }

    #[test]
    fn test_detail_failure_is_reported_inline() {
        let store = MockStore::with_catalog();
        store.fail_catalog.set(true);
        let mut explorer: EntityExplorer<Organization> = EntityExplorer::new();
        explorer.select(Organization::new(2, "Globex"));

        explorer.focus(&store, 2);
        assert!(matches!(explorer.detail(), Some(Detail::Failed(_))));
    }

    #[test]
    fn test_close_focused_tab_clears_detail() {
        let store = MockStore::with_catalog();
        let mut explorer: EntityExplorer<Organization> = EntityExplorer::new();
        explorer.select(Organization::new(1, "Acme Corp"));
        explorer.select(Organization::new(2, "Globex"));
        explorer.focus(&store, 1);

        assert!(explorer.close(1));
        assert!(explorer.focused().is_none());
        assert!(explorer.detail().is_none());
        assert!(!explorer.close(1));
        assert_eq!(explorer.selection().len(), 1);
    }

    // ─── ScoutContext Tests ──────────────────────────────────

    #[test]
    fn test_cross_navigation_leaves_source_selection_alone() {
        let store = MockStore::with_catalog();
        let mut ctx = ScoutContext::open(&store).value;
        ctx.organizations.select(Organization::new(1, "Acme Corp"));
        ctx.organizations.select(Organization::new(2, "Globex"));
        ctx.organizations.focus(&store, 1);

        let Some(Detail::Loaded(tools)) = ctx.organizations.detail().cloned() else {
            panic!("expected detail");
        };
        assert!(ctx.open_related_tool(tools[0].clone()));

        assert_eq!(ctx.tools.selection().len(), 1);
        assert_eq!(ctx.tools.selection().values()[0].id, tools[0].id);
        let org_ids: Vec<EntityId> =
            ctx.organizations.selection().values().iter().map(|o| o.id).collect();
        assert_eq!(org_ids, vec![1, 2]);
        assert_eq!(ctx.organizations.focused(), Some(1));
    }

    #[test]
    fn test_open_related_organization() {
        let store = MockStore::with_catalog();
        let mut ctx = ScoutContext::open(&store).value;
        ctx.tools.select(Tool::new(12, "HubSpot", "CRM"));

        assert!(ctx.open_related_organization(Organization::new(3, "Initech")));
        assert!(!ctx.open_related_organization(Organization::new(3, "Initech")));
        assert_eq!(ctx.organizations.selection().len(), 1);
        assert_eq!(ctx.tools.selection().len(), 1);
    }

    #[test]
    fn test_session_changes_refused_during_turn() {
        let store = MockStore::default();
        store.seed_session("a", 10);
        store.seed_session("b", 5);
        let mut ctx = ScoutContext::open(&store).value;

        let ticket = ctx.submit("hello", &store).unwrap().value;
        assert!(ctx.create_session(&store).is_none());
        assert!(!ctx.select_session("a", &store).unwrap());
        assert_eq!(ctx.sessions.active_id(), Some("b"));

        let report = ctx.apply_outcome(TurnOutcome { ticket, reply: Ok("hi".to_string()) }, &store);
        assert!(report.succeeded());
        assert!(ctx.select_session("a", &store).unwrap());
        assert!(ctx.create_session(&store).is_some());
    }

    #[test]
    fn test_reset_exploration() {
        let store = MockStore::with_catalog();
        let mut ctx = ScoutContext::open(&store).value;
        ctx.organizations.search(&store, "acme");
        ctx.organizations.select(Organization::new(1, "Acme Corp"));
        ctx.tools.sample_random(&store, 5);
        ctx.tools.select(Tool::new(10, "Salesforce", "CRM"));

        ctx.reset_exploration();
        assert!(ctx.organizations.selection().is_empty());
        assert!(ctx.tools.selection().is_empty());
        assert_eq!(ctx.organizations.results(), &SearchResults::NotSearched);
        assert!(ctx.tools.sample().is_empty());
    }
}
