//! Sessions sidebar: product blurb, session selector and creation.

use egui::{self, RichText, Vec2};
use scout_core::session::SessionManager;
use crate::theme::*;

pub enum SessionAction {
    Create,
    Select(String),
}

/// Render the sidebar. Session changes are disabled while `busy`.
pub fn sessions_panel(
    ui: &mut egui::Ui,
    sessions: &SessionManager,
    busy: bool,
) -> Option<SessionAction> {
    let mut action = None;

    ui.add_space(8.0);
    ui.heading(RichText::new("TechStack Scout").color(TEXT_PRIMARY).strong());
    ui.label(
        RichText::new(
            "Explore which organizations use which tools, and ask the assistant about them.",
        )
        .color(TEXT_SECONDARY)
        .small(),
    );

    ui.add_space(12.0);
    ui.separator();
    ui.label(RichText::new("Sessions").color(ACCENT).strong());
    ui.add_space(2.0);

    let selected_title = sessions
        .active_session()
        .map(|s| s.title.as_str())
        .unwrap_or("(none)");

    ui.add_enabled_ui(!busy, |ui| {
        egui::ComboBox::from_id_salt("session_selector")
            .selected_text(truncate(selected_title, 28))
            .width(ui.available_width())
            .show_ui(ui, |ui| {
                for session in sessions.sessions() {
                    let is_active = sessions.active_id() == Some(session.id.as_str());
                    let mut title = RichText::new(truncate(&session.title, 40));
                    if session.has_default_title() {
                        title = title.italics();
                    }
                    if ui
                        .add(egui::Button::new(title).selected(is_active))
                        .on_hover_text(session.created_at.format("%Y-%m-%d %H:%M").to_string())
                        .clicked()
                        && !is_active
                    {
                        action = Some(SessionAction::Select(session.id.clone()));
                    }
                }
            });

        ui.add_space(4.0);
        let create = ui.add(
            egui::Button::new(RichText::new("Create New Session").color(TEXT_PRIMARY))
                .fill(ACCENT)
                .corner_radius(PANEL_ROUNDING)
                .min_size(Vec2::new(ui.available_width(), 28.0)),
        );
        if create.clicked() {
            action = Some(SessionAction::Create);
        }
    });

    ui.add_space(8.0);
    if let Some(id) = sessions.active_id() {
        ui.label(RichText::new("Active session").color(TEXT_SECONDARY).small());
        ui.label(RichText::new(id).monospace().small().color(TEXT_SECONDARY));
    }

    action
}

/// Shorten `text` to at most `max` characters, marking the cut.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept)
}
