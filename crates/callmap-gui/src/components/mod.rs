pub mod detail_panel;
pub mod graph_canvas;
pub mod preferences;
pub mod sidebar;
pub mod status_bar;
