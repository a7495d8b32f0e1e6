use crate::settings::{AppSettings, ThemeMode};
use callmap_graph::ForceConfig;
use eframe::egui;
use std::ops::RangeInclusive;

/// One editable force parameter: label, field, slider range, log scale.
type ForceSlider<'a> = (&'static str, &'a mut f32, RangeInclusive<f32>, bool);

/// Every `ForceConfig` tunable with its slider range.
fn force_sliders(forces: &mut ForceConfig) -> [ForceSlider<'_>; 7] {
    [
        ("Link distance", &mut forces.link_distance, 10.0..=500.0, false),
        ("Charge", &mut forces.charge_strength, -2000.0..=0.0, false),
        ("Collision radius", &mut forces.collide_radius, 0.0..=200.0, false),
        ("Barnes-Hut theta", &mut forces.theta, 0.1..=2.0, false),
        ("Velocity decay", &mut forces.velocity_decay, 0.05..=0.95, false),
        ("Alpha min", &mut forces.alpha_min, 0.0001..=0.1, true),
        ("Alpha decay", &mut forces.alpha_decay, 0.001..=0.2, true),
    ]
}

/// Edits a copy of the settings; "Apply" writes it back and saves.
/// Layout changes apply to the next mapping loaded (File > Open...); a
/// running layout is left alone.
pub struct PreferencesDialog {
    pub open: bool,
    temp_settings: AppSettings,
}

impl PreferencesDialog {
    pub fn new(current_settings: &AppSettings) -> Self {
        Self {
            open: false,
            temp_settings: current_settings.clone(),
        }
    }

    pub fn open(&mut self, settings: &AppSettings) {
        self.temp_settings = settings.clone();
        self.open = true;
    }

    /// Returns true when new settings were applied.
    pub fn show(&mut self, ctx: &egui::Context, settings: &mut AppSettings) -> bool {
        let mut open = self.open;
        if !open {
            return false;
        }

        let mut applied = false;
        let mut should_close = false;
        egui::Window::new("Preferences")
            .open(&mut open)
            .resizable(false)
            .collapsible(false)
            .show(ctx, |ui| {
                ui.heading("General");
                ui.group(|ui| {
                    ui.horizontal(|ui| {
                        ui.label("Theme:");
                        ui.radio_value(&mut self.temp_settings.theme, ThemeMode::Latte, "Latte");
                        ui.radio_value(&mut self.temp_settings.theme, ThemeMode::Frappe, "Frappé");
                        ui.radio_value(
                            &mut self.temp_settings.theme,
                            ThemeMode::Macchiato,
                            "Macchiato",
                        );
                        ui.radio_value(&mut self.temp_settings.theme, ThemeMode::Mocha, "Mocha");
                    });

                    ui.add(
                        egui::Slider::new(&mut self.temp_settings.ui_scale, 0.5..=2.0)
                            .text("UI Scale"),
                    );
                    ui.add(
                        egui::Slider::new(&mut self.temp_settings.font_size, 8.0..=24.0)
                            .text("Font Size"),
                    );
                });

                ui.add_space(10.0);
                ui.heading("Layout");
                ui.group(|ui| {
                    let layout = &mut self.temp_settings.layout;
                    ui.add(
                        egui::Slider::new(&mut layout.auto_stop_secs, 0.5..=30.0)
                            .text("Stop after")
                            .suffix("s"),
                    );
                    for (label, value, range, logarithmic) in force_sliders(&mut layout.forces) {
                        ui.add(
                            egui::Slider::new(value, range)
                                .logarithmic(logarithmic)
                                .text(label),
                        );
                    }
                    if ui.button("Reset layout defaults").clicked() {
                        layout.forces = ForceConfig::default();
                    }
                });

                ui.add_space(20.0);
                ui.horizontal(|ui| {
                    if ui.button("Apply").clicked() {
                        *settings = self.temp_settings.clone();
                        settings.save();
                        applied = true;
                    }
                    if ui.button("Close").clicked() {
                        should_close = true;
                    }
                });
            });

        if should_close {
            open = false;
        }
        self.open = open;
        applied
    }
}
