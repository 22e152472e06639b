//! Chat interaction controller: one request/response turn at a time.
//!
//! Phases: `Idle → Sending → AwaitingReply → Idle`. A failed turn also
//! lands back in `Idle`; the failure travels in the [`TurnReport`].
//!
//! A turn is split in three so the backend call can run off the UI thread:
//! 1. [`ChatController::begin_turn`] appends the human message optimistically,
//!    persists it and retitles a fresh session (`Idle → Sending`);
//! 2. [`ChatController::dispatch`] performs the backend call and borrows
//!    nothing from the controller (`Sending → AwaitingReply`);
//! 3. [`ChatController::finish_turn`] appends the reply or reports the
//!    failure (`AwaitingReply → Idle`).
//!
//! The turn's [`BusyGuard`] rides inside the [`TurnTicket`], so no second
//! turn can start until the outcome has been applied or the ticket dropped.

use scout_types::{Result, ScoutError, message::Role};
use crate::applied::Applied;
use crate::busy::{BusyFlag, BusyGuard};
use crate::ports::{ChatBackendPort, ChatQuery, ConversationStore};
use crate::session::SessionManager;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatPhase {
    Idle,
    Sending,
    AwaitingReply,
}

/// Why an utterance was not turned into a chat turn. Always a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRejected {
    EmptyUtterance,
    NoActiveSession,
    TurnInFlight,
}

/// An outstanding chat turn.
#[derive(Debug)]
pub struct TurnTicket {
    turn_id: u64,
    query: ChatQuery,
    _guard: BusyGuard,
}

impl TurnTicket {
    pub fn turn_id(&self) -> u64 {
        self.turn_id
    }

    pub fn session_id(&self) -> &str {
        &self.query.session_id
    }

    pub fn query(&self) -> &ChatQuery {
        &self.query
    }
}

/// A finished backend call waiting to be applied.
#[derive(Debug)]
pub struct TurnOutcome {
    pub ticket: TurnTicket,
    pub reply: Result<String>,
}

/// What the caller should surface once a turn has been applied.
#[derive(Debug, Default, PartialEq)]
pub struct TurnReport {
    /// Backend failure, shown inline. The human message stays in place.
    pub failure: Option<ScoutError>,
    /// Store writes that did not go through.
    pub persist_errors: Vec<ScoutError>,
}

impl TurnReport {
    pub fn succeeded(&self) -> bool {
        self.failure.is_none()
    }
}

pub struct ChatController {
    phase: ChatPhase,
    busy: BusyFlag,
    turn_counter: u64,
}

impl ChatController {
    pub fn new() -> Self {
        Self {
            phase: ChatPhase::Idle,
            busy: BusyFlag::new(),
            turn_counter: 0,
        }
    }

    /// Current phase. `Idle` once the turn's ticket is gone, even if its
    /// outcome was never applied.
    pub fn phase(&self) -> ChatPhase {
        if self.busy.is_busy() {
            self.phase
        } else {
            ChatPhase::Idle
        }
    }

    /// A turn is outstanding; input must stay disabled.
    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    /// `Idle → Sending`: append the human message and hand out a ticket.
    pub fn begin_turn<S: ConversationStore + ?Sized>(
        &mut self,
        sessions: &mut SessionManager,
        store: &S,
        text: &str,
    ) -> std::result::Result<Applied<TurnTicket>, TurnRejected> {
        if text.trim().is_empty() {
            return Err(TurnRejected::EmptyUtterance);
        }
        let active = sessions.active_mut().ok_or(TurnRejected::NoActiveSession)?;
        let guard = self.busy.try_acquire().ok_or(TurnRejected::TurnInFlight)?;

        self.turn_counter += 1;
        self.phase = ChatPhase::Sending;

        let message = active.push(Role::Human, text);
        let session_id = message.session_id.clone();
        log::info!(
            "Turn {} started for session {} (sequence {})",
            self.turn_counter,
            session_id,
            message.sequence
        );

        let mut persist_error = store.append_message(&message).err();
        if let Some(ref e) = persist_error {
            log::error!("Failed to persist human message: {}", e);
        }

        let (_, rename_error) = sessions.rename_active_on_first_message(text, store).into_parts();
        if persist_error.is_none() {
            persist_error = rename_error;
        }

        let ticket = TurnTicket {
            turn_id: self.turn_counter,
            query: ChatQuery {
                user_query: text.to_string(),
                session_id,
            },
            _guard: guard,
        };
        Ok(Applied::with_error(ticket, persist_error))
    }

    /// `Sending → AwaitingReply`, once the request has left.
    pub fn mark_dispatched(&mut self, ticket: &TurnTicket) {
        if self.phase == ChatPhase::Sending {
            log::debug!("Turn {} awaiting reply", ticket.turn_id);
            self.phase = ChatPhase::AwaitingReply;
        }
    }

    /// Perform the backend call for a ticket.
    pub async fn dispatch(ticket: TurnTicket, backend: &dyn ChatBackendPort) -> TurnOutcome {
        let reply = backend.generate(&ticket.query).await;
        TurnOutcome { ticket, reply }
    }

    /// `AwaitingReply → Idle`: apply a finished call.
    ///
    /// Failures are not rolled back and not retried.
    pub fn finish_turn<S: ConversationStore + ?Sized>(
        &mut self,
        sessions: &mut SessionManager,
        store: &S,
        outcome: TurnOutcome,
    ) -> TurnReport {
        let TurnOutcome { ticket, reply } = outcome;
        let mut report = TurnReport::default();

        self.phase = ChatPhase::Idle;
        match reply {
            Err(e) => {
                log::warn!("Turn {} failed: {}", ticket.turn_id, e);
                report.failure = Some(e);
            }
            Ok(text) => {
                match sessions.active_mut() {
                    Some(active) if active.session_id() == ticket.session_id() => {
                        let message = active.push(Role::Assistant, &text);
                        if let Err(e) = store.append_message(&message) {
                            log::error!("Failed to persist reply: {}", e);
                            report.persist_errors.push(e);
                        }
                        log::info!(
                            "Turn {} completed (sequence {})",
                            ticket.turn_id,
                            message.sequence
                        );
                    }
                    _ => {
                        log::warn!(
                            "Dropping reply for turn {}: session {} is no longer active",
                            ticket.turn_id,
                            ticket.session_id()
                        );
                    }
                }
            }
        }

        drop(ticket);
        report
    }

    /// Run a whole turn in place: begin, dispatch, finish.
    pub async fn run_turn<S: ConversationStore + ?Sized>(
        &mut self,
        sessions: &mut SessionManager,
        store: &S,
        backend: &dyn ChatBackendPort,
        text: &str,
    ) -> std::result::Result<TurnReport, TurnRejected> {
        let (ticket, begin_error) = self.begin_turn(sessions, store, text)?.into_parts();
        self.mark_dispatched(&ticket);
        let outcome = Self::dispatch(ticket, backend).await;
        let mut report = self.finish_turn(sessions, store, outcome);
        if let Some(e) = begin_error {
            report.persist_errors.insert(0, e);
        }
        Ok(report)
    }
}

impl Default for ChatController {
    fn default() -> Self {
        Self::new()
    }
}
