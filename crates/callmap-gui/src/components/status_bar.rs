use crate::theme::badge;
use eframe::egui;
use std::time::Duration;
use egui_phosphor::regular as ph;

/// Counters shown along the bottom edge.
#[derive(Debug, Clone, Default)]
pub struct StatusInfo {
    pub source: String,
    pub folders: usize,
    pub functions: usize,
    pub edges: usize,
    pub ticks: u64,
    /// Time until the layout freezes; `None` once it has.
    pub layout_remaining: Option<Duration>,
}

pub struct StatusBar {
    message: String,
}

impl StatusBar {
    pub fn new() -> Self {
        Self {
            message: String::new(),
        }
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }

    pub fn ui(&self, ui: &mut egui::Ui, info: &StatusInfo) {
        ui.horizontal(|ui| {
            if let Some(remaining) = info.layout_remaining {
                ui.add(egui::Spinner::new());
                ui.label(
                    egui::RichText::new(format!("Laying out... {:.1}s", remaining.as_secs_f32()))
                        .color(ui.visuals().warn_fg_color),
                );
            } else {
                badge(ui, "Ready", egui::Color32::LIGHT_GREEN);
            }

            ui.separator();
            ui.label(format!("{} {}", ph::FILE, info.source));
            if !self.message.is_empty() {
                ui.separator();
                ui.label(egui::RichText::new(&self.message).color(ui.visuals().text_color()));
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let muted = ui.visuals().window_fill;
                let accent = ui.visuals().selection.bg_fill;
                badge(ui, &format!("{} ticks", info.ticks), muted);
                ui.separator();
                badge(ui, &format!("{} edges", info.edges), muted);
                ui.separator();
                badge(
                    ui,
                    &format!("{} folders / {} functions", info.folders, info.functions),
                    accent,
                );
            });
        });
    }
}
