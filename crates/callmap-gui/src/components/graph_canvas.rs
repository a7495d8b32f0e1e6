//! Painter-based rendering of the force layout.
//!
//! Screen coordinates are local to the canvas rect; the view transform maps
//! world positions into that space.

use crate::theme::to_egui_color;
use callmap_events::{ActivationOrigin, Event, EventBus};
use callmap_graph::style::{COLOR_LABEL, LABEL_OFFSET};
use callmap_graph::{
    CodeGraph, GroupPalette, NodeIndex, Vec2, ViewController, get_edge_style, get_node_style,
};
use eframe::egui;

/// Wheel delta to zoom factor, per point scrolled.
const WHEEL_ZOOM_SPEED: f32 = 0.002;
/// Labels smaller than this are skipped.
const MIN_LABEL_PX: f32 = 3.0;
const LABEL_FONT_SIZE: f32 = 12.0;

pub struct GraphCanvas {
    hovered: Option<NodeIndex>,
}

fn to_vec2(v: egui::Vec2) -> Vec2 {
    Vec2::new(v.x, v.y)
}

fn to_pos(origin: egui::Pos2, v: Vec2) -> egui::Pos2 {
    origin + egui::vec2(v.x, v.y)
}

impl GraphCanvas {
    pub fn new() -> Self {
        Self { hovered: None }
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        graph: &CodeGraph,
        positions: &[Vec2],
        palette: &GroupPalette,
        view: &mut ViewController,
        bus: &EventBus,
    ) {
        let rect = ui.available_rect_before_wrap();
        let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, ui.visuals().extreme_bg_color);

        let viewport = to_vec2(rect.size());
        if viewport != view.viewport() {
            bus.publish(Event::ViewportResized {
                width: viewport.x,
                height: viewport.y,
            });
        }

        let origin = rect.min;
        let pointer = response.hover_pos().map(|p| to_vec2(p - origin));

        if response.hovered() {
            let (scroll, pinch) = ui.input(|i| (i.smooth_scroll_delta.y, i.zoom_delta()));
            let factor = (scroll * WHEEL_ZOOM_SPEED).exp() * pinch;
            if (factor - 1.0).abs() > f32::EPSILON
                && let Some(anchor) = pointer
            {
                view.zoom_about(anchor, factor);
            }
        }

        if response.dragged() {
            view.pan_by(to_vec2(response.drag_delta()));
        }

        let hovered = pointer.and_then(|p| view.node_at(graph, positions, p));
        if hovered != self.hovered {
            match hovered {
                Some(index) => bus.publish(Event::HighlightNode {
                    id: graph[index].id.clone(),
                }),
                None => bus.publish(Event::ResetHighlight),
            }
            self.hovered = hovered;
        }
        if response.clicked()
            && let Some(index) = hovered
        {
            bus.publish(Event::RecenterNode {
                id: graph[index].id.clone(),
                origin: ActivationOrigin::Graph,
            });
        }

        let transform = view.transform();
        let screen = |world: Vec2| to_pos(origin, transform.apply(world));

        for &edge in view.edge_order() {
            let Some((source, target)) = graph.edge_endpoints(edge) else {
                continue;
            };
            let (Some(a), Some(b)) = (positions.get(source.0), positions.get(target.0)) else {
                continue;
            };
            let style = get_edge_style(view.is_emphasized(edge));
            painter.line_segment(
                [screen(*a), screen(*b)],
                egui::Stroke::new(style.width, to_egui_color(style.color)),
            );
        }

        let font = egui::FontId::proportional(LABEL_FONT_SIZE * transform.scale);
        let label_color = to_egui_color(COLOR_LABEL);
        for &index in view.node_order() {
            let Some(&world) = positions.get(index.0) else {
                continue;
            };
            let node = &graph[index];
            let style = get_node_style(node, palette, view.selected() == Some(index));
            let center = screen(world);
            let radius = style.radius * transform.scale;
            if !rect.expand(radius).contains(center) {
                continue;
            }

            painter.circle(
                center,
                radius,
                to_egui_color(style.fill),
                egui::Stroke::new(style.stroke_width, to_egui_color(style.stroke)),
            );

            if font.size >= MIN_LABEL_PX {
                let anchor = screen(world + Vec2::new(LABEL_OFFSET.0, LABEL_OFFSET.1));
                painter.text(
                    anchor,
                    egui::Align2::LEFT_BOTTOM,
                    &node.name,
                    font.clone(),
                    label_color,
                );
            }
        }

        if let Some(index) = hovered {
            response.on_hover_text(graph[index].id.as_str());
        }
    }
}
