//! Chat panel: the active transcript and the input field.

use egui::{self, Align, Layout, RichText, ScrollArea, Vec2};
use scout_core::chat::ChatPhase;
use scout_types::message::{Message, Role};
use crate::state::UiState;
use crate::theme::*;

pub enum ChatAction {
    Submit(String),
    ClearView,
}

/// Render the chat panel. Input is disabled unless the turn is `Idle`.
pub fn chat_panel(
    ui: &mut egui::Ui,
    state: &mut UiState,
    transcript: &[Message],
    phase: ChatPhase,
) -> Option<ChatAction> {
    let mut action = None;
    let busy = phase != ChatPhase::Idle;

    egui::Frame::default()
        .fill(BG_PRIMARY)
        .inner_margin(PANEL_PADDING)
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.heading(RichText::new("Ask Scout").color(TEXT_PRIMARY).strong());
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    let can_clear = !busy && !transcript.is_empty();
                    if ui.add_enabled(can_clear, egui::Button::new("Clear chat")).clicked() {
                        action = Some(ChatAction::ClearView);
                    }
                    let status_color = if busy { WARNING } else { SUCCESS };
                    ui.label(RichText::new(&state.status_text).color(status_color).small());
                });
            });

            ui.separator();

            let available_height = ui.available_height() - 60.0;
            ScrollArea::vertical()
                .id_salt("transcript")
                .max_height(available_height)
                .auto_shrink([false, false])
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    for message in transcript {
                        render_message(ui, message);
                        ui.add_space(4.0);
                    }
                    if let Some(waiting) = phase_caption(phase) {
                        ui.horizontal(|ui| {
                            ui.spinner();
                            ui.label(RichText::new(waiting).color(TEXT_SECONDARY));
                        });
                    }
                    if let Some(error) = &state.chat_error {
                        egui::Frame::default()
                            .fill(ERROR_BG)
                            .corner_radius(PANEL_ROUNDING)
                            .inner_margin(8.0)
                            .show(ui, |ui| {
                                ui.label(RichText::new(error).color(ERROR));
                            });
                    }
                });

            ui.add_space(8.0);

            ui.horizontal(|ui| {
                let input = egui::TextEdit::singleline(&mut state.input_text)
                    .hint_text("Ask about organizations and their tools...")
                    .desired_width(ui.available_width() - 70.0)
                    .font(egui::FontId::proportional(14.0));
                let response = ui.add_enabled(!busy, input);

                let send_enabled = !busy && !state.input_text.trim().is_empty();
                let send_btn = ui.add_enabled(
                    send_enabled,
                    egui::Button::new(RichText::new("Send").color(TEXT_PRIMARY))
                        .fill(if send_enabled { ACCENT } else { BG_SURFACE })
                        .corner_radius(PANEL_ROUNDING)
                        .min_size(Vec2::new(60.0, 0.0)),
                );

                let entered =
                    response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if send_enabled && (entered || send_btn.clicked()) {
                    let text = state.input_text.trim().to_string();
                    state.input_text.clear();
                    action = Some(ChatAction::Submit(text));
                    response.request_focus();
                }
            });
        });

    action
}

fn render_message(ui: &mut egui::Ui, message: &Message) {
    let (label_color, bg) = match message.role {
        Role::Human => (ACCENT, BG_SECONDARY),
        Role::Assistant => (SUCCESS, BG_SURFACE),
    };

    egui::Frame::default()
        .fill(bg)
        .corner_radius(PANEL_ROUNDING)
        .inner_margin(8.0)
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new(message.role.label()).color(label_color).strong().small());
                ui.label(RichText::new(message.display_time()).color(TEXT_SECONDARY).small());
            });
            ui.label(RichText::new(&message.content).color(TEXT_PRIMARY));
        });
}

/// Caption shown next to the spinner while a turn is outstanding.
pub fn phase_caption(phase: ChatPhase) -> Option<&'static str> {
    match phase {
        ChatPhase::Idle => None,
        ChatPhase::Sending => Some("Sending..."),
        ChatPhase::AwaitingReply => Some("Scout is thinking..."),
    }
}
