//! Colors and spacing shared by the panels

use egui::{Color32, CornerRadius, Stroke, Vec2};

pub const BG_PRIMARY: Color32 = Color32::from_rgb(22, 24, 29);
pub const BG_SECONDARY: Color32 = Color32::from_rgb(34, 37, 44);
pub const BG_SURFACE: Color32 = Color32::from_rgb(48, 52, 61);
pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(229, 231, 235);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(156, 163, 175);
pub const ACCENT: Color32 = Color32::from_rgb(14, 165, 233);
pub const ACCENT_ALT: Color32 = Color32::from_rgb(168, 85, 247);
pub const SUCCESS: Color32 = Color32::from_rgb(34, 197, 94);
pub const ERROR: Color32 = Color32::from_rgb(239, 68, 68);
pub const WARNING: Color32 = Color32::from_rgb(234, 179, 8);
pub const ERROR_BG: Color32 = Color32::from_rgb(56, 22, 24);

pub const PANEL_ROUNDING: CornerRadius = CornerRadius::same(6);
pub const PANEL_PADDING: Vec2 = Vec2::new(12.0, 8.0);
pub const SIDEBAR_WIDTH: f32 = 260.0;

/// Apply the dark theme to an egui context
pub fn apply_theme(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();

    style.visuals.dark_mode = true;
    style.visuals.panel_fill = BG_PRIMARY;
    style.visuals.window_fill = BG_SECONDARY;
    style.visuals.extreme_bg_color = BG_SECONDARY;

    let widgets = &mut style.visuals.widgets;
    widgets.inactive.bg_fill = BG_SURFACE;
    widgets.inactive.weak_bg_fill = BG_SURFACE;
    widgets.inactive.fg_stroke = Stroke::new(1.0, TEXT_SECONDARY);
    widgets.hovered.bg_fill = BG_SURFACE;
    widgets.hovered.fg_stroke = Stroke::new(1.0, TEXT_PRIMARY);
    widgets.active.bg_fill = ACCENT;
    widgets.active.fg_stroke = Stroke::new(1.0, TEXT_PRIMARY);

    style.visuals.selection.bg_fill = ACCENT.linear_multiply(0.35);
    style.visuals.selection.stroke = Stroke::new(1.0, ACCENT);

    style.spacing.item_spacing = Vec2::new(8.0, 6.0);

    ctx.set_style(style);
}
