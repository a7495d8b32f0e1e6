pub mod calls;
pub mod docs;
pub mod driver;
pub mod graph;
pub mod menu;
mod quadtree;
pub mod simulation;
pub mod style;
pub mod tree;
pub mod view;

pub use calls::CallIndex;
pub use docs::{
    DetailContent, FunctionDoc, NO_CALLS, NO_DOCUMENTATION, Parameters, Section, extract_section,
    parse_documentation, unique_calls,
};
pub use driver::LayoutDriver;
pub use graph::{CodeGraph, EdgeIndex, NodeIndex, Vec2};
pub use menu::{MenuActivation, MenuEntry, MenuEntryId, MenuTarget, MenuTree};
pub use simulation::{ForceConfig, ForceSimulation};
pub use style::{Color, EdgeStyle, GroupPalette, NodeStyle, get_edge_style, get_node_style};
pub use tree::build_graph;
pub use view::{Recentered, ViewController, ViewTransform, ease_cubic_in_out};
