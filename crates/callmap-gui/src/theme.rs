//! Callmap Theme and UI Polish
//!
//! Consistent styling across the viewer, powered by catppuccin-egui.

use eframe::egui::{self, Color32, Vec2};
use egui_phosphor::regular as ph;

use crate::settings::ThemeMode;

/// Spacing constants
pub mod spacing {
    pub const PANEL_PADDING_I8: i8 = 12;
    pub const ITEM_SPACING: f32 = 8.0;
    pub const SECTION_SPACING: f32 = 16.0;
    pub const BUTTON_PADDING: f32 = 8.0;
    pub const MENU_INDENT: f32 = 14.0;
}

/// Border radius constants
pub mod radius {
    use eframe::egui::CornerRadius;

    pub const MEDIUM: CornerRadius = CornerRadius::same(4);
    pub const LARGE: CornerRadius = CornerRadius::same(8);
    pub const PILL: CornerRadius = CornerRadius::same(255);
}

/// Application theme configuration
#[derive(Debug, Clone)]
pub struct Theme {
    pub flavor: catppuccin_egui::Theme,
    pub font_size_base: f32,
    pub font_size_small: f32,
    pub font_size_heading: f32,
}

impl Theme {
    pub fn new(mode: ThemeMode, font_size: f32) -> Self {
        let flavor = match mode {
            ThemeMode::Latte => catppuccin_egui::LATTE,
            ThemeMode::Frappe => catppuccin_egui::FRAPPE,
            ThemeMode::Macchiato => catppuccin_egui::MACCHIATO,
            ThemeMode::Mocha => catppuccin_egui::MOCHA,
        };

        Self {
            flavor,
            font_size_base: font_size,
            font_size_small: font_size * 0.85,
            font_size_heading: font_size * 1.25,
        }
    }

    /// Apply theme to egui context
    pub fn apply(&self, ctx: &egui::Context) {
        catppuccin_egui::set_theme(ctx, self.flavor);
        self.setup_fonts(ctx);
    }

    fn setup_fonts(&self, ctx: &egui::Context) {
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        ctx.set_fonts(fonts);

        let mut style = (*ctx.style()).clone();

        use egui::FontFamily::{Monospace, Proportional};
        use egui::FontId;
        use egui::TextStyle::{Body, Button, Heading, Small};

        style.text_styles = [
            (Heading, FontId::new(self.font_size_heading, Proportional)),
            (Body, FontId::new(self.font_size_base, Proportional)),
            (
                egui::TextStyle::Monospace,
                FontId::new(self.font_size_base, Monospace),
            ),
            (Button, FontId::new(self.font_size_base, Proportional)),
            (Small, FontId::new(self.font_size_small, Proportional)),
        ]
        .into();

        style.spacing.item_spacing = Vec2::new(spacing::ITEM_SPACING, spacing::ITEM_SPACING / 2.0);
        style.spacing.button_padding =
            Vec2::new(spacing::BUTTON_PADDING, spacing::BUTTON_PADDING / 2.0);
        style.spacing.window_margin = egui::Margin::same(spacing::PANEL_PADDING_I8);

        ctx.set_style(style);
    }
}

// Helpers using current Context/Ui visuals

pub fn to_egui_color(color: callmap_graph::Color) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

/// Styled primary action button
pub fn primary_button(ui: &egui::Ui, text: &str) -> egui::Button<'static> {
    let color = ui.visuals().selection.bg_fill;
    let text_color = ui.visuals().strong_text_color();
    egui::Button::new(egui::RichText::new(text).color(text_color)).fill(color)
}

/// Create a styled separator with label
pub fn labeled_separator(ui: &mut egui::Ui, label: &str) {
    ui.horizontal(|ui| {
        ui.separator();
        ui.label(
            egui::RichText::new(label)
                .small()
                .color(ui.visuals().weak_text_color()),
        );
        ui.separator();
    });
}

/// Badge component for counts or status
pub fn badge(ui: &mut egui::Ui, text: &str, color: Color32) {
    let frame = egui::Frame::default()
        .fill(color)
        .corner_radius(radius::PILL)
        .inner_margin(egui::Margin::symmetric(6, 2));

    frame.show(ui, |ui| {
        ui.label(
            egui::RichText::new(text)
                .small()
                .color(ui.visuals().strong_text_color()),
        );
    });
}

/// Card container - theme-aware
pub fn card(ui: &mut egui::Ui, add_contents: impl FnOnce(&mut egui::Ui)) {
    let frame = egui::Frame::default()
        .fill(ui.visuals().window_fill)
        .corner_radius(radius::LARGE)
        .inner_margin(egui::Margin::same(spacing::PANEL_PADDING_I8))
        .stroke(ui.visuals().window_stroke);

    frame.show(ui, |ui| {
        add_contents(ui);
    });
}

/// Info box with icon
pub fn info_box(ui: &mut egui::Ui, message: &str) {
    let bg = ui.visuals().selection.bg_fill.gamma_multiply(0.2);
    let fg = ui.visuals().selection.bg_fill;

    let frame = egui::Frame::default()
        .fill(bg)
        .corner_radius(radius::MEDIUM)
        .inner_margin(egui::Margin::same(8));

    frame.show(ui, |ui| {
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(ph::INFO).color(fg));
            ui.label(message);
        });
    });
}

/// Error box with icon
pub fn error_box(ui: &mut egui::Ui, message: &str) {
    let fg = ui.visuals().error_fg_color;
    let bg = fg.gamma_multiply(0.2);

    let frame = egui::Frame::default()
        .fill(bg)
        .corner_radius(radius::MEDIUM)
        .inner_margin(egui::Margin::same(8));

    frame.show(ui, |ui| {
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(ph::X_CIRCLE).color(fg));
            ui.label(message);
        });
    });
}

/// Empty state placeholder
pub fn empty_state(ui: &mut egui::Ui, icon: &str, title: &str, message: &str) {
    ui.vertical_centered(|ui| {
        ui.add_space(spacing::SECTION_SPACING);
        ui.label(
            egui::RichText::new(icon)
                .size(48.0)
                .color(ui.visuals().weak_text_color()),
        );
        ui.add_space(spacing::ITEM_SPACING);
        ui.label(egui::RichText::new(title).strong());
        ui.label(egui::RichText::new(message).color(ui.visuals().text_color()));
        ui.add_space(spacing::SECTION_SPACING);
    });
}
