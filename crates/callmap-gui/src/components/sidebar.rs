use crate::theme::{empty_state, spacing};
use callmap_events::{ActivationOrigin, Event, EventBus};
use callmap_graph::{MenuActivation, MenuEntryId, MenuTree};
use eframe::egui;
use egui_phosphor::regular as ph;

/// Folder/function menu with a search box.
///
/// Folder rows toggle their child list and recenter the graph on the folder.
/// Function rows recenter on the function and open its details.
pub struct Sidebar {
    query: String,
}

impl Sidebar {
    pub fn new() -> Self {
        Self {
            query: String::new(),
        }
    }

    pub fn ui(&mut self, ui: &mut egui::Ui, menu: &mut MenuTree, bus: &EventBus) {
        ui.vertical(|ui| {
            ui.horizontal(|ui| {
                ui.label(ph::MAGNIFYING_GLASS);
                let response = ui.add(
                    egui::TextEdit::singleline(&mut self.query)
                        .hint_text("Search folders and functions")
                        .desired_width(f32::INFINITY),
                );
                if response.changed() {
                    bus.publish(Event::SearchChanged {
                        query: self.query.clone(),
                    });
                }
            });
            ui.separator();

            if menu.is_empty() {
                empty_state(ui, ph::TREE_STRUCTURE, "Empty", "No folders in this mapping");
                return;
            }

            let mut clicked: Option<MenuEntryId> = None;
            egui::ScrollArea::vertical()
                .id_salt("sidebar_menu")
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    for id in menu.rendered_rows() {
                        let Some(entry) = menu.get(id) else {
                            continue;
                        };
                        let icon = match (entry.is_folder(), entry.expanded) {
                            (true, true) => ph::FOLDER_OPEN,
                            (true, false) => ph::FOLDER,
                            (false, _) => ph::FUNCTION,
                        };
                        ui.horizontal(|ui| {
                            ui.add_space(entry.depth as f32 * spacing::MENU_INDENT);
                            let text = format!("{icon} {}", entry.label);
                            if ui.selectable_label(false, text).clicked() {
                                clicked = Some(id);
                            }
                        });
                    }
                });

            if let Some(id) = clicked {
                match menu.activate(id) {
                    Some(MenuActivation::RecenterFolder(node_id)) => {
                        bus.publish(Event::RecenterNode {
                            id: node_id,
                            origin: ActivationOrigin::Sidebar,
                        });
                    }
                    Some(MenuActivation::RecenterFunction {
                        node_id,
                        folder,
                        name,
                    }) => {
                        bus.publish(Event::RecenterNode {
                            id: node_id,
                            origin: ActivationOrigin::Sidebar,
                        });
                        bus.publish(Event::ShowFunctionDetail { folder, name });
                    }
                    None => {}
                }
            }
        });
    }
}
