//! Graph View Style System
//!
//! Node and edge appearance for the structure view. Folders share one fill;
//! functions are coloured per group by an ordinal palette.

use callmap_core::{GraphNode, NodeKind};
use indexmap::IndexMap;

/// RGB color representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn from_hex(hex: u32) -> Self {
        Self::rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }
}

// ============================================================================
// Color Constants
// ============================================================================

pub const COLOR_FOLDER_FILL: Color = Color::from_hex(0x69b3a2);
pub const COLOR_NODE_STROKE: Color = Color::rgb(255, 255, 255);
pub const COLOR_SELECTED_STROKE: Color = Color::rgb(255, 0, 0);
pub const COLOR_LABEL: Color = Color::rgb(51, 51, 51);

pub const COLOR_EDGE: Color = Color::rgba(153, 153, 153, 153);
pub const COLOR_EDGE_EMPHASIZED: Color = Color::rgb(255, 140, 0);

/// Ten-colour categorical scheme used for function groups.
pub const CATEGORY10: [Color; 10] = [
    Color::from_hex(0x1f77b4),
    Color::from_hex(0xff7f0e),
    Color::from_hex(0x2ca02c),
    Color::from_hex(0xd62728),
    Color::from_hex(0x9467bd),
    Color::from_hex(0x8c564b),
    Color::from_hex(0xe377c2),
    Color::from_hex(0x7f7f7f),
    Color::from_hex(0xbcbd22),
    Color::from_hex(0x17becf),
];

pub const FOLDER_RADIUS: f32 = 20.0;
pub const FUNCTION_RADIUS: f32 = 10.0;
/// Label anchor relative to the node centre, in world units.
pub const LABEL_OFFSET: (f32, f32) = (15.0, 5.0);

// ============================================================================
// Palette
// ============================================================================

/// Ordinal colour scale: each new key takes the next palette slot, cycling
/// after ten.
#[derive(Debug, Clone, Default)]
pub struct GroupPalette {
    assigned: IndexMap<String, Color>,
}

impl GroupPalette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign colours to every function in `nodes` order, keyed on the
    /// node's group (or its id when it has none).
    pub fn for_nodes<'a>(nodes: impl IntoIterator<Item = &'a GraphNode>) -> Self {
        let mut palette = Self::new();
        for node in nodes {
            if node.kind.is_function() {
                palette.color_for(Self::key(node));
            }
        }
        palette
    }

    fn key(node: &GraphNode) -> &str {
        node.group.as_deref().unwrap_or(node.id.as_str())
    }

    pub fn color_for(&mut self, key: &str) -> Color {
        if let Some(color) = self.assigned.get(key) {
            return *color;
        }
        let color = CATEGORY10[self.assigned.len() % CATEGORY10.len()];
        self.assigned.insert(key.to_string(), color);
        color
    }

    pub fn get(&self, key: &str) -> Option<Color> {
        self.assigned.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }
}

// ============================================================================
// Style Functions
// ============================================================================

/// Complete style for a graph node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeStyle {
    pub radius: f32,
    pub fill: Color,
    pub stroke: Color,
    pub stroke_width: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeStyle {
    pub color: Color,
    pub width: f32,
}

pub fn node_radius(kind: NodeKind) -> f32 {
    match kind {
        NodeKind::Folder => FOLDER_RADIUS,
        NodeKind::Function => FUNCTION_RADIUS,
    }
}

pub fn get_node_style(node: &GraphNode, palette: &GroupPalette, selected: bool) -> NodeStyle {
    let fill = match node.kind {
        NodeKind::Folder => COLOR_FOLDER_FILL,
        NodeKind::Function => palette
            .get(GroupPalette::key(node))
            .unwrap_or(CATEGORY10[0]),
    };
    let (stroke, stroke_width) = if selected {
        (COLOR_SELECTED_STROKE, 2.0)
    } else {
        (COLOR_NODE_STROKE, 1.5)
    };
    NodeStyle {
        radius: node_radius(node.kind),
        fill,
        stroke,
        stroke_width,
    }
}

pub fn get_edge_style(emphasized: bool) -> EdgeStyle {
    if emphasized {
        EdgeStyle {
            color: COLOR_EDGE_EMPHASIZED,
            width: 3.0,
        }
    } else {
        EdgeStyle {
            color: COLOR_EDGE,
            width: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_colors() {
        assert_eq!(COLOR_FOLDER_FILL, Color::rgb(0x69, 0xb3, 0xa2));
        assert_eq!(CATEGORY10[0], Color::rgba(0x1f, 0x77, 0xb4, 255));
    }

    #[test]
    fn test_palette_assigns_in_first_seen_order_and_cycles() {
        let mut palette = GroupPalette::new();
        assert_eq!(palette.color_for("a"), CATEGORY10[0]);
        assert_eq!(palette.color_for("b"), CATEGORY10[1]);
        assert_eq!(palette.color_for("a"), CATEGORY10[0]);
        for i in 0..9 {
            palette.color_for(&format!("g{i}"));
        }
        assert_eq!(palette.get("g8"), Some(CATEGORY10[0]));
    }

    #[test]
    fn test_functions_in_same_group_share_color() {
        let nodes = vec![
            GraphNode::folder("a", "a", 0),
            GraphNode::function("a", "f", 1),
            GraphNode::function("b", "g", 1),
            GraphNode::function("a", "h", 1),
        ];
        let palette = GroupPalette::for_nodes(&nodes);
        assert_eq!(palette.len(), 2);
        let f = get_node_style(&nodes[1], &palette, false);
        let h = get_node_style(&nodes[3], &palette, false);
        let g = get_node_style(&nodes[2], &palette, false);
        assert_eq!(f.fill, h.fill);
        assert_ne!(f.fill, g.fill);
        assert_eq!(f.radius, FUNCTION_RADIUS);
    }

    #[test]
    fn test_folder_and_selection_styles() {
        let folder = GraphNode::folder("a", "a", 0);
        let style = get_node_style(&folder, &GroupPalette::new(), true);
        assert_eq!(style.fill, COLOR_FOLDER_FILL);
        assert_eq!(style.radius, FOLDER_RADIUS);
        assert_eq!(style.stroke, COLOR_SELECTED_STROKE);
        assert_eq!(style.stroke_width, 2.0);
    }

    #[test]
    fn test_emphasized_edges_are_stronger() {
        assert!(get_edge_style(true).width > get_edge_style(false).width);
    }
}
