//! Settings panel: chat backend endpoint and storage selection,
//! with an explicit Save button and inline feedback.

use egui::{self, RichText, Vec2};
use scout_types::config::{ScoutConfig, StorageBackendType};
use crate::theme::*;

/// Longest request timeout offered in the panel, in seconds.
const MAX_TIMEOUT_SECS: u64 = 600;

/// What the caller should do after rendering the settings panel
#[derive(Debug, PartialEq, Eq)]
pub enum SettingsAction {
    None,
    /// A field was edited; the backend adapter should be rebuilt
    Changed,
    SaveClicked,
}

/// Save feedback passed in from the app layer
#[derive(Clone)]
pub struct SaveFeedback {
    pub message: String,
    pub success: bool,
}

pub fn settings_panel(
    ui: &mut egui::Ui,
    config: &mut ScoutConfig,
    save_feedback: Option<&SaveFeedback>,
) -> SettingsAction {
    let mut changed = false;
    let mut save_clicked = false;

    egui::Frame::default()
        .fill(BG_SECONDARY)
        .inner_margin(PANEL_PADDING)
        .corner_radius(PANEL_ROUNDING)
        .show(ui, |ui| {
            ui.heading(RichText::new("Settings").color(TEXT_PRIMARY));
            ui.separator();

            // ── Chat backend ─────────────────────────────────
            ui.label(RichText::new("Chat backend").color(ACCENT).strong());
            ui.add_space(2.0);

            ui.label(RichText::new("Endpoint").color(TEXT_SECONDARY).small());
            if ui
                .add(
                    egui::TextEdit::singleline(&mut config.backend.endpoint)
                        .hint_text(scout_types::config::DEFAULT_BACKEND_ENDPOINT),
                )
                .changed()
            {
                changed = true;
            }

            ui.add_space(4.0);
            let mut has_timeout = config.backend.timeout_secs.is_some();
            ui.horizontal(|ui| {
                if ui.checkbox(&mut has_timeout, "Request timeout").changed() {
                    config.backend.timeout_secs = has_timeout.then_some(60);
                    changed = true;
                }
                if let Some(secs) = config.backend.timeout_secs.as_mut() {
                    if ui
                        .add(egui::DragValue::new(secs).range(1..=MAX_TIMEOUT_SECS).suffix(" s"))
                        .changed()
                    {
                        changed = true;
                    }
                }
            });

            ui.add_space(12.0);
            ui.separator();
            ui.add_space(4.0);

            // ── Storage ──────────────────────────────────────
            ui.label(RichText::new("Storage").color(ACCENT).strong());
            ui.add_space(2.0);

            ui.label(RichText::new("Backend").color(TEXT_SECONDARY).small());
            egui::ComboBox::from_id_salt("storage_backend")
                .selected_text(config.storage.backend.label())
                .show_ui(ui, |ui| {
                    for backend in StorageBackendType::all() {
                        let current = &mut config.storage.backend;
                        if ui
                            .selectable_value(current, backend.clone(), backend.label())
                            .changed()
                        {
                            changed = true;
                        }
                    }
                });

            ui.add_space(4.0);
            ui.label(
                RichText::new(config.storage.backend.description())
                    .color(TEXT_SECONDARY)
                    .small()
                    .italics(),
            );

            ui.add_space(4.0);
            ui.label(RichText::new("Database file").color(TEXT_SECONDARY).small());
            if ui
                .add_enabled(
                    config.storage.backend != StorageBackendType::Memory,
                    egui::TextEdit::singleline(&mut config.storage.database_path),
                )
                .changed()
            {
                changed = true;
            }
            ui.label(
                RichText::new("Storage changes apply on next start.")
                    .color(TEXT_SECONDARY)
                    .small(),
            );

            // ── Save ─────────────────────────────────────────
            ui.add_space(16.0);
            ui.separator();
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                let btn = ui.add(
                    egui::Button::new(RichText::new("Save Settings").color(TEXT_PRIMARY).strong())
                        .fill(ACCENT)
                        .corner_radius(PANEL_ROUNDING)
                        .min_size(Vec2::new(120.0, 28.0)),
                );
                if btn.clicked() {
                    save_clicked = true;
                }

                if let Some(fb) = save_feedback {
                    let color = if fb.success { SUCCESS } else { ERROR };
                    ui.label(RichText::new(&fb.message).color(color).small());
                }
            });
        });

    if save_clicked {
        SettingsAction::SaveClicked
    } else if changed {
        SettingsAction::Changed
    } else {
        SettingsAction::None
    }
}
