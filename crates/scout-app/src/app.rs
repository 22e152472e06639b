//! Main egui application. Composes the panels and applies their actions
//! to the `ScoutContext`.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use egui::{self, CentralPanel, RichText, ScrollArea, SidePanel, TopBottomPanel};

use scout_core::ScoutContext;
use scout_core::chat::ChatController;
use scout_core::event_bus::{EventBus, ScoutEvent};
use scout_core::explorer::{DEFAULT_SAMPLE_SIZE, EntityExplorer, Explorable};
use scout_core::ports::{ChatBackendPort, ConversationStore, ScoutStore};
use scout_platform::config;
use scout_platform::{HttpChatBackend, MemoryStore, open_store};
use scout_types::config::ScoutConfig;
use scout_types::entity::Entity;
use scout_ui::panels::chat::{self, ChatAction};
use scout_ui::panels::explorer::{ExplorerAction, explorer_panel};
use scout_ui::panels::notices::notices_bar;
use scout_ui::panels::sessions::{SessionAction, sessions_panel};
use scout_ui::panels::settings::{self, SaveFeedback, SettingsAction};
use scout_ui::state::{NoticeLevel, UiState};
use scout_ui::theme;

pub struct ScoutApp {
    ui_state: UiState,
    config: ScoutConfig,
    config_path: PathBuf,
    save_feedback: Option<SaveFeedback>,
    store: Box<dyn ScoutStore>,
    context: ScoutContext,
    backend: Option<Arc<dyn ChatBackendPort>>,
    event_bus: EventBus,
    runtime: tokio::runtime::Runtime,
    first_frame: bool,
}

impl ScoutApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;

        let config = config::load_config();
        let mut ui_state = UiState::new();

        let store: Box<dyn ScoutStore> = match open_store(&config.storage) {
            Ok(store) => store,
            Err(e) => {
                log::error!("Failed to open store ({}), using memory", e);
                ui_state.push_notice(
                    NoticeLevel::Error,
                    format!("Database unavailable, nothing will be kept: {}", e),
                );
                Box::new(MemoryStore::new())
            }
        };

        let (mut context, warning) = ScoutContext::open(store.as_ref()).into_parts();
        if let Some(e) = warning {
            ui_state.push_notice(NoticeLevel::Warning, e.to_string());
        }
        context.organizations.sample_random(store.as_ref(), DEFAULT_SAMPLE_SIZE);
        context.tools.sample_random(store.as_ref(), DEFAULT_SAMPLE_SIZE);

        let mut app = Self {
            ui_state,
            config,
            config_path: config::config_path(),
            save_feedback: None,
            store,
            context,
            backend: None,
            event_bus: EventBus::new(),
            runtime,
            first_frame: true,
        };
        app.rebuild_backend();
        Ok(app)
    }

    fn rebuild_backend(&mut self) {
        self.backend = match HttpChatBackend::new(&self.config.backend) {
            Ok(backend) => {
                log::info!("Chat backend: {}", backend.endpoint());
                Some(Arc::new(backend) as Arc<dyn ChatBackendPort>)
            }
            Err(e) => {
                log::warn!("Chat backend unavailable: {}", e);
                None
            }
        };
    }

    /// Apply finished chat turns delivered by background tasks.
    fn drain_events(&mut self, ctx: &egui::Context) {
        if !self.event_bus.has_pending() {
            return;
        }
        for event in self.event_bus.drain() {
            match event {
                ScoutEvent::TurnFinished(outcome) => {
                    let report = self.context.apply_outcome(outcome, self.store.as_ref());
                    self.ui_state.turn_finished(report);
                }
            }
        }
        ctx.request_repaint();
    }

    /// Begin a chat turn and run the backend call on the runtime.
    fn submit(&mut self, text: String, ctx: &egui::Context) {
        let Some(backend) = self.backend.clone() else {
            self.ui_state.push_notice(
                NoticeLevel::Error,
                "Chat backend is not configured; set an endpoint in Settings",
            );
            self.ui_state.input_text = text;
            return;
        };

        let (ticket, persist_error) = match self.context.submit(&text, self.store.as_ref()) {
            Ok(applied) => applied.into_parts(),
            Err(rejected) => {
                self.ui_state.turn_rejected(rejected);
                return;
            }
        };
        self.ui_state.report_persist_error(persist_error);
        self.ui_state.turn_started();
        self.context.chat.mark_dispatched(&ticket);

        let bus = self.event_bus.clone();
        let ctx = ctx.clone();
        self.runtime.spawn(async move {
            let outcome = ChatController::dispatch(ticket, backend.as_ref()).await;
            bus.emit(ScoutEvent::TurnFinished(outcome));
            ctx.request_repaint();
        });
    }

    fn handle_chat(&mut self, action: ChatAction, ctx: &egui::Context) {
        match action {
            ChatAction::Submit(text) => self.submit(text, ctx),
            ChatAction::ClearView => {
                self.context.clear_chat_view();
                self.ui_state.chat_error = None;
            }
        }
    }

    fn handle_session(&mut self, action: SessionAction) {
        match action {
            SessionAction::Create => match self.context.create_session(self.store.as_ref()) {
                Some(created) => {
                    let (_, persist_error) = created.into_parts();
                    self.ui_state.report_persist_error(persist_error);
                    self.ui_state.chat_error = None;
                }
                None => self.ui_state.push_notice(
                    NoticeLevel::Info,
                    "Wait for the current reply before changing sessions",
                ),
            },
            SessionAction::Select(id) => {
                match self.context.select_session(&id, self.store.as_ref()) {
                    Ok(true) => self.ui_state.chat_error = None,
                    Ok(false) => {}
                    Err(e) => self
                        .ui_state
                        .push_notice(NoticeLevel::Error, format!("Could not load session: {}", e)),
                }
            }
        }
    }

    fn handle_settings(&mut self, action: SettingsAction) {
        match action {
            SettingsAction::None => {}
            SettingsAction::Changed => {
                self.save_feedback = None;
                self.rebuild_backend();
            }
            SettingsAction::SaveClicked => {
                self.rebuild_backend();
                let feedback = match config::save_config(&self.config_path, &self.config) {
                    Ok(()) => SaveFeedback {
                        message: format!("Saved to {}", self.config_path.display()),
                        success: true,
                    },
                    Err(e) => SaveFeedback {
                        message: e.to_string(),
                        success: false,
                    },
                };
                self.save_feedback = Some(feedback);
            }
        }
    }

    fn reset_exploration(&mut self) {
        self.context.reset_exploration();
        self.ui_state.organization_query.clear();
        self.ui_state.tool_query.clear();
    }
}

/// Apply an explorer action. Returns a related entity to open in the
/// other explorer, if one was picked.
fn apply_explorer_action<E: Explorable>(
    explorer: &mut EntityExplorer<E>,
    store: &dyn ScoutStore,
    action: ExplorerAction<E, E::Related>,
) -> Option<E::Related> {
    match action {
        ExplorerAction::Search(term) => {
            explorer.search(store, &term);
        }
        ExplorerAction::RefreshSample => {
            explorer.sample_random(store, DEFAULT_SAMPLE_SIZE);
        }
        ExplorerAction::Open(entity) => {
            let id = entity.id();
            explorer.select(entity);
            explorer.focus(store, id);
        }
        ExplorerAction::Focus(id) => {
            explorer.focus(store, id);
        }
        ExplorerAction::Close(id) => {
            explorer.close(id);
        }
        ExplorerAction::OpenRelated(related) => return Some(related),
    }
    None
}

impl eframe::App for ScoutApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.first_frame {
            theme::apply_theme(ctx);
            self.first_frame = false;
        }

        self.drain_events(ctx);

        let busy = self.context.chat.is_busy();
        if busy {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        // ── Top bar ──────────────────────────────────────────
        let mut reset_clicked = false;
        TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new("TechStack Scout")
                        .strong()
                        .color(theme::ACCENT)
                        .size(16.0),
                );
                ui.separator();
                let endpoint = self
                    .backend
                    .as_ref()
                    .map(|b| b.endpoint().to_string())
                    .unwrap_or_else(|| "not configured".to_string());
                ui.label(
                    RichText::new(format!(
                        "Backend: {} | Storage: {}",
                        endpoint,
                        self.store.backend_name()
                    ))
                    .color(theme::TEXT_SECONDARY)
                    .small(),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .add(egui::Button::new("Settings").selected(self.ui_state.show_settings))
                        .clicked()
                    {
                        self.ui_state.show_settings = !self.ui_state.show_settings;
                    }
                    if ui.button("Reset exploration").clicked() {
                        reset_clicked = true;
                    }
                });
            });
        });
        if reset_clicked {
            self.reset_exploration();
        }

        if !self.ui_state.notices.is_empty() {
            TopBottomPanel::top("notices").show(ctx, |ui| {
                notices_bar(ui, &mut self.ui_state);
            });
        }

        // ── Settings side panel ──────────────────────────────
        if self.ui_state.show_settings {
            let mut settings_action = SettingsAction::None;
            SidePanel::right("settings_panel")
                .min_width(280.0)
                .max_width(350.0)
                .show(ctx, |ui| {
                    settings_action =
                        settings::settings_panel(ui, &mut self.config, self.save_feedback.as_ref());
                });
            self.handle_settings(settings_action);
        }

        // ── Sessions sidebar ─────────────────────────────────
        let mut session_action = None;
        SidePanel::left("sessions_panel")
            .exact_width(theme::SIDEBAR_WIDTH)
            .show(ctx, |ui| {
                session_action = sessions_panel(ui, &self.context.sessions, busy);
            });
        if let Some(action) = session_action {
            self.handle_session(action);
        }

        // ── Main content ─────────────────────────────────────
        let mut chat_action = None;
        let mut organization_action = None;
        let mut tool_action = None;
        CentralPanel::default().show(ctx, |ui| {
            ui.columns(2, |columns| {
                let transcript = self
                    .context
                    .sessions
                    .active()
                    .map(|active| active.transcript())
                    .unwrap_or(&[]);
                let phase = self.context.chat.phase();
                chat_action =
                    chat::chat_panel(&mut columns[0], &mut self.ui_state, transcript, phase);

                ScrollArea::vertical()
                    .id_salt("explorers")
                    .auto_shrink([false, false])
                    .show(&mut columns[1], |ui| {
                        organization_action = explorer_panel(
                            ui,
                            &mut self.ui_state.organization_query,
                            &self.context.organizations,
                        );
                        ui.add_space(8.0);
                        tool_action =
                            explorer_panel(ui, &mut self.ui_state.tool_query, &self.context.tools);
                    });
            });
        });

        if let Some(action) = chat_action {
            self.handle_chat(action, ctx);
        }

        let store = self.store.as_ref();
        if let Some(action) = organization_action {
            let organizations = &mut self.context.organizations;
            if let Some(tool) = apply_explorer_action(organizations, store, action) {
                let id = tool.id;
                if !self.context.open_related_tool(tool) {
                    log::debug!("Tool {} already open", id);
                }
                self.context.tools.focus(store, id);
            }
        }
        if let Some(action) = tool_action {
            let tools = &mut self.context.tools;
            if let Some(organization) = apply_explorer_action(tools, store, action) {
                let id = organization.id;
                if !self.context.open_related_organization(organization) {
                    log::debug!("Organization {} already open", id);
                }
                self.context.organizations.focus(store, id);
            }
        }
    }
}
