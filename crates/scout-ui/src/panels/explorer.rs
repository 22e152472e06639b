//! Entity explorer panel, shared by organizations and tools.
//!
//! Layout top to bottom: search, random sample, one tab per selected
//! entity, and the focused tab's detail with its related entities.

use egui::{self, Align, Layout, RichText, ScrollArea, Vec2};
use scout_core::explorer::{Detail, EntityExplorer, Explorable, SearchResults};
use scout_types::entity::{Entity, EntityId};
use crate::theme::*;

pub enum ExplorerAction<E, R> {
    Search(String),
    RefreshSample,
    /// Open a search or sample hit as a tab.
    Open(E),
    Focus(EntityId),
    Close(EntityId),
    /// Open a related entity in the other explorer.
    OpenRelated(R),
}

pub fn explorer_panel<E: Explorable>(
    ui: &mut egui::Ui,
    query: &mut String,
    explorer: &EntityExplorer<E>,
) -> Option<ExplorerAction<E, E::Related>> {
    let mut action = None;
    let kind = E::KIND;

    ui.push_id(kind.label(), |ui| {
        egui::Frame::default()
            .fill(BG_PRIMARY)
            .inner_margin(PANEL_PADDING)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.heading(RichText::new(kind.plural()).color(TEXT_PRIMARY).strong());
                    if explorer.is_busy() {
                        ui.spinner();
                    }
                });
                ui.separator();

                // ── Search ───────────────────────────────────
                ui.horizontal(|ui| {
                    let response = ui.add(
                        egui::TextEdit::singleline(query)
                            .hint_text(format!("Search {} by name", kind.plural().to_lowercase()))
                            .desired_width(ui.available_width() - 80.0),
                    );
                    let entered =
                        response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    if ui.button("Search").clicked() || entered {
                        action = Some(ExplorerAction::Search(query.clone()));
                    }
                });

                match explorer.results() {
                    SearchResults::NotSearched => {}
                    SearchResults::NoMatches => {
                        ui.label(RichText::new("No matches").color(TEXT_SECONDARY).italics());
                    }
                    SearchResults::Failed(error) => {
                        ui.label(RichText::new(format!("Search failed: {}", error)).color(ERROR));
                    }
                    SearchResults::Found(found) => {
                        ScrollArea::vertical()
                            .id_salt("results")
                            .max_height(160.0)
                            .show(ui, |ui| {
                                for entity in found {
                                    let open = explorer.selection().contains(entity.id());
                                    if entity_row(ui, entity, open) {
                                        action = Some(ExplorerAction::Open(entity.clone()));
                                    }
                                }
                            });
                    }
                }

                // ── Random sample ────────────────────────────
                ui.add_space(6.0);
                egui::CollapsingHeader::new(format!("Random {}", kind.plural().to_lowercase()))
                    .default_open(true)
                    .show(ui, |ui| {
                        if ui.small_button("Refresh").clicked() {
                            action = Some(ExplorerAction::RefreshSample);
                        }
                        if let Some(error) = explorer.sample_error() {
                            ui.label(RichText::new(error).color(ERROR).small());
                        }
                        ScrollArea::vertical()
                            .id_salt("sample")
                            .max_height(160.0)
                            .show(ui, |ui| {
                                for entity in explorer.sample() {
                                    let open = explorer.selection().contains(entity.id());
                                    if entity_row(ui, entity, open) {
                                        action = Some(ExplorerAction::Open(entity.clone()));
                                    }
                                }
                            });
                    });

                // ── Tabs ─────────────────────────────────────
                ui.add_space(6.0);
                ui.separator();
                if explorer.selection().is_empty() {
                    let hint = format!("Open a {} to inspect it", kind.label().to_lowercase());
                    ui.label(RichText::new(hint).color(TEXT_SECONDARY).small());
                    return;
                }

                ui.horizontal_wrapped(|ui| {
                    for entity in explorer.selection().values() {
                        let focused = explorer.focused() == Some(entity.id());
                        let tab = ui.add(egui::Button::new(entity.name()).selected(focused));
                        if tab.clicked() {
                            action = Some(ExplorerAction::Focus(entity.id()));
                        }
                        if ui.small_button("×").on_hover_text("Close").clicked() {
                            action = Some(ExplorerAction::Close(entity.id()));
                        }
                        ui.add_space(4.0);
                    }
                });

                if let Some(entity) = explorer.focused_entity() {
                    if let Some(related) = detail_view(ui, entity, explorer.detail()) {
                        action = Some(ExplorerAction::OpenRelated(related));
                    }
                }
            });
    });

    action
}

/// One result line. Returns whether "Open" was clicked.
fn entity_row<T: Entity>(ui: &mut egui::Ui, entity: &T, already_open: bool) -> bool {
    let mut clicked = false;
    ui.horizontal(|ui| {
        ui.label(RichText::new(entity.name()).color(TEXT_PRIMARY));
        if let Some(caption) = entity.caption() {
            ui.label(RichText::new(caption).color(TEXT_SECONDARY).small());
        }
        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            let label = if already_open { "Opened" } else { "Open" };
            clicked = ui
                .add_enabled(!already_open, egui::Button::new(label).min_size(Vec2::new(56.0, 0.0)))
                .clicked();
        });
    });
    clicked
}

fn detail_view<E: Explorable>(
    ui: &mut egui::Ui,
    entity: &E,
    detail: Option<&Detail<E::Related>>,
) -> Option<E::Related> {
    let mut opened = None;

    egui::Frame::default()
        .fill(BG_SECONDARY)
        .corner_radius(PANEL_ROUNDING)
        .inner_margin(8.0)
        .show(ui, |ui| {
            ui.label(RichText::new(entity.name()).color(ACCENT_ALT).strong());
            for (label, value) in entity.details() {
                ui.horizontal_wrapped(|ui| {
                    ui.label(RichText::new(label).color(TEXT_SECONDARY).small());
                    ui.label(RichText::new(value).color(TEXT_PRIMARY).small());
                });
            }

            ui.add_space(6.0);
            let related_kind = E::KIND.other();
            match detail {
                None => {
                    ui.spinner();
                }
                Some(Detail::Failed(error)) => {
                    let text = format!(
                        "Could not load {}: {}",
                        related_kind.plural().to_lowercase(),
                        error
                    );
                    ui.label(RichText::new(text).color(ERROR));
                }
                Some(Detail::Loaded(rows)) if rows.is_empty() => {
                    let empty = format!("No related {}", related_kind.plural().to_lowercase());
                    ui.label(RichText::new(empty).color(TEXT_SECONDARY).italics());
                }
                Some(Detail::Loaded(rows)) => {
                    let heading = format!("Related {}", related_kind.plural());
                    ui.label(RichText::new(heading).color(ACCENT).small());
                    ScrollArea::vertical()
                        .id_salt("detail")
                        .max_height(220.0)
                        .show(ui, |ui| {
                            for row in rows {
                                if entity_row(ui, row, false) {
                                    opened = Some(row.clone());
                                }
                            }
                        });
                }
            }
        });

    opened
}
