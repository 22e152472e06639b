//! Inline notice strip shown above the main panels.

use egui::{self, RichText};
use crate::state::{NoticeLevel, UiState};
use crate::theme::*;

pub fn notices_bar(ui: &mut egui::Ui, state: &mut UiState) {
    let mut dismissed = None;

    for (index, notice) in state.notices.iter().enumerate() {
        let color = match notice.level {
            NoticeLevel::Info => ACCENT,
            NoticeLevel::Warning => WARNING,
            NoticeLevel::Error => ERROR,
        };
        ui.horizontal(|ui| {
            ui.label(RichText::new(&notice.text).color(color).small());
            if ui.small_button("Dismiss").clicked() {
                dismissed = Some(index);
            }
        });
    }

    if let Some(index) = dismissed {
        state.dismiss_notice(index);
    }
}
