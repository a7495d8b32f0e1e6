use crate::theme::{self, labeled_separator, spacing};
use callmap_graph::{DetailContent, FunctionDoc, NO_CALLS, NO_DOCUMENTATION, Parameters};
use eframe::egui;
use egui_phosphor::regular as ph;

/// Modal overlay with one function's documentation and callees.
///
/// Created on first use and reused afterwards; opening it again replaces
/// the content.
pub struct DetailPanel {
    content: Option<DetailContent>,
    open: bool,
}

impl DetailPanel {
    pub fn new() -> Self {
        Self {
            content: None,
            open: false,
        }
    }

    pub fn show(&mut self, content: DetailContent) {
        self.content = Some(content);
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Returns true when the user asked to close it (button, Escape or a
    /// click on the backdrop).
    pub fn ui(&mut self, ctx: &egui::Context) -> bool {
        if !self.open {
            return false;
        }
        let Some(content) = &self.content else {
            return false;
        };

        let mut close_clicked = false;
        let modal = egui::Modal::new(egui::Id::new("function_detail")).show(ctx, |ui| {
            ui.set_max_width(560.0);
            ui.heading(
                egui::RichText::new(format!("{} {}", ph::FUNCTION, content.function_name))
                    .color(ui.visuals().selection.bg_fill),
            );
            ui.add_space(spacing::ITEM_SPACING);

            egui::ScrollArea::vertical()
                .id_salt("detail_body")
                .max_height(420.0)
                .show(ui, |ui| {
                    match &content.documentation {
                        Some(doc) => documentation_ui(ui, doc),
                        None => theme::info_box(ui, NO_DOCUMENTATION),
                    }

                    ui.add_space(spacing::SECTION_SPACING);
                    labeled_separator(ui, "Calls");
                    if content.calls.is_empty() {
                        ui.label(NO_CALLS);
                    } else {
                        for call in &content.calls {
                            ui.label(format!("{} {call}", ph::ARROW_RIGHT));
                        }
                    }
                });

            ui.add_space(spacing::ITEM_SPACING);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.add(theme::primary_button(ui, "Close")).clicked() {
                    close_clicked = true;
                }
            });
        });

        close_clicked || modal.should_close()
    }
}

/// One bullet per listed parameter, or the placeholder line.
fn parameter_rows(parameters: &Parameters) -> Vec<String> {
    match parameters {
        Parameters::Listed(lines) => lines.iter().map(|line| format!("• {line}")).collect(),
        Parameters::Missing => vec![Parameters::placeholder().to_string()],
    }
}

fn documentation_ui(ui: &mut egui::Ui, doc: &FunctionDoc) {
    labeled_separator(ui, "Description");
    ui.label(&doc.description);

    ui.add_space(spacing::ITEM_SPACING);
    labeled_separator(ui, "Parameters");
    for row in parameter_rows(&doc.parameters) {
        ui.label(row);
    }

    ui.add_space(spacing::ITEM_SPACING);
    labeled_separator(ui, "Return Value");
    ui.label(&doc.return_value);

    ui.add_space(spacing::ITEM_SPACING);
    labeled_separator(ui, "Pseudocode");
    theme::card(ui, |ui| {
        ui.label(egui::RichText::new(&doc.pseudocode).monospace());
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use callmap_core::FunctionRecord;

    #[test]
    fn test_parameters_render_as_bullets() {
        let record = FunctionRecord::default()
            .documented("## Parameters\nsrc: source buffer\n\n  len: byte count\n");
        let content = DetailContent::from_record("copy", &record);
        let doc = content.documentation.unwrap();
        assert_eq!(
            parameter_rows(&doc.parameters),
            vec!["• src: source buffer", "• len: byte count"]
        );
    }

    #[test]
    fn test_missing_parameters_show_placeholder() {
        assert_eq!(
            parameter_rows(&Parameters::Missing),
            vec!["No parameters listed."]
        );
    }

    #[test]
    fn test_show_replaces_content_and_close_only_hides() {
        let mut panel = DetailPanel::new();
        assert!(!panel.is_open());
        panel.show(DetailContent::from_record("a", &FunctionRecord::default()));
        panel.close();
        assert!(!panel.is_open());
        panel.show(DetailContent::from_record("b", &FunctionRecord::default()));
        assert!(panel.is_open());
        assert_eq!(panel.content.as_ref().unwrap().function_name, "b");
    }
}
