//! Pan/zoom transform, hover emphasis and animated recentering.

use crate::graph::{CodeGraph, EdgeIndex, NodeIndex, Vec2};
use crate::style::node_radius;
use callmap_core::NodeId;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Screen = world * scale + translate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub translate: Vec2,
    pub scale: f32,
}

impl ViewTransform {
    pub const INITIAL_SCALE: f32 = 0.06;
    pub const MIN_SCALE: f32 = 0.01;
    pub const MAX_SCALE: f32 = 8.0;

    /// Starting view: origin at the viewport centre, zoomed far out.
    pub fn initial(viewport: Vec2) -> Self {
        Self {
            translate: viewport / 2.0,
            scale: Self::INITIAL_SCALE,
        }
    }

    /// Transform that puts `world` at the centre of `viewport` at `scale`.
    pub fn centered_on(world: Vec2, viewport: Vec2, scale: f32) -> Self {
        Self {
            translate: viewport / 2.0 - world * scale,
            scale,
        }
    }

    pub fn apply(&self, world: Vec2) -> Vec2 {
        world * self.scale + self.translate
    }

    pub fn invert(&self, screen: Vec2) -> Vec2 {
        (screen - self.translate) / self.scale
    }

    fn interpolate(self, to: ViewTransform, t: f32) -> ViewTransform {
        ViewTransform {
            translate: self.translate.lerp(to.translate, t),
            scale: self.scale + (to.scale - self.scale) * t,
        }
    }
}

/// Symmetric cubic ease: slow start, fast middle, slow end.
pub fn ease_cubic_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

#[derive(Debug, Clone, Copy)]
struct Transition {
    from: ViewTransform,
    to: ViewTransform,
    started_at: Instant,
    duration: Duration,
}

impl Transition {
    fn progress(&self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.started_at);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }
}

/// Outcome of a successful recenter request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recentered {
    pub node: NodeId,
    /// `(folder, function)` when the target is a function node, for the
    /// detail overlay.
    pub detail: Option<(String, String)>,
}

/// Interaction state layered over a laid-out graph.
#[derive(Debug, Clone)]
pub struct ViewController {
    viewport: Vec2,
    transform: ViewTransform,
    transition: Option<Transition>,
    emphasized: Vec<bool>,
    edge_order: Vec<EdgeIndex>,
    node_order: Vec<NodeIndex>,
    highlighted: Option<NodeIndex>,
    selected: Option<NodeIndex>,
    /// No pan, zoom or recenter yet; the initial transform tracks the viewport.
    untouched: bool,
}

impl ViewController {
    pub const RECENTER_DURATION: Duration = Duration::from_millis(750);
    pub const RECENTER_SCALE: f32 = 1.0;

    pub fn new(graph: &CodeGraph, viewport: Vec2) -> Self {
        Self {
            viewport,
            transform: ViewTransform::initial(viewport),
            transition: None,
            emphasized: vec![false; graph.edge_count()],
            edge_order: graph.edge_indices().collect(),
            node_order: graph.node_indices().collect(),
            highlighted: None,
            selected: None,
            untouched: true,
        }
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// Record the canvas size. Until the view is first moved, the initial
    /// transform is recomputed for the new size.
    pub fn set_viewport(&mut self, viewport: Vec2) {
        self.viewport = viewport;
        if self.untouched {
            self.transform = ViewTransform::initial(viewport);
        }
    }

    /// Current transform without advancing any running transition.
    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    /// Advance the recenter animation to `now` and return the transform to draw.
    pub fn transform_at(&mut self, now: Instant) -> ViewTransform {
        if let Some(transition) = self.transition {
            let t = transition.progress(now);
            self.transform = transition
                .from
                .interpolate(transition.to, ease_cubic_in_out(t));
            if t >= 1.0 {
                self.transform = transition.to;
                self.transition = None;
            }
        }
        self.transform
    }

    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// Drag pan by a screen-space delta. Cancels any running transition.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.transition = None;
        self.untouched = false;
        self.transform.translate += delta;
    }

    /// Zoom by `factor` keeping the world point under `anchor` fixed.
    pub fn zoom_about(&mut self, anchor: Vec2, factor: f32) {
        self.transition = None;
        self.untouched = false;
        let world = self.transform.invert(anchor);
        let scale = (self.transform.scale * factor)
            .clamp(ViewTransform::MIN_SCALE, ViewTransform::MAX_SCALE);
        self.transform = ViewTransform {
            translate: anchor - world * scale,
            scale,
        };
    }

    /// Emphasize every edge touching `id` and raise them and the node to the
    /// top of the draw order. Unknown ids are ignored.
    pub fn highlight(&mut self, graph: &CodeGraph, id: &NodeId) -> bool {
        let Some(index) = graph.index_of(id) else {
            return false;
        };
        self.emphasized.iter_mut().for_each(|flag| *flag = false);
        for edge in graph.incident_edges(id) {
            self.emphasized[edge.0] = true;
        }

        let (mut raised, rest): (Vec<EdgeIndex>, Vec<EdgeIndex>) = self
            .edge_order
            .iter()
            .copied()
            .partition(|edge| !self.emphasized[edge.0]);
        raised.extend(rest);
        self.edge_order = raised;

        self.node_order.retain(|&n| n != index);
        self.node_order.push(index);
        self.highlighted = Some(index);
        true
    }

    /// Drop all emphasis. Draw order stays as it is.
    pub fn reset_highlight(&mut self) {
        self.emphasized.iter_mut().for_each(|flag| *flag = false);
        self.highlighted = None;
    }

    /// Start a transition that centres `id` at 1:1 zoom, and mark it
    /// selected. Returns `None` for ids not in the graph.
    pub fn recenter(
        &mut self,
        graph: &CodeGraph,
        positions: &[Vec2],
        id: &NodeId,
        now: Instant,
    ) -> Option<Recentered> {
        let index = graph.index_of(id)?;
        let world = positions.get(index.0).copied()?;

        let from = self.transform_at(now);
        let to = ViewTransform::centered_on(world, self.viewport, Self::RECENTER_SCALE);
        self.transition = Some(Transition {
            from,
            to,
            started_at: now,
            duration: Self::RECENTER_DURATION,
        });
        self.selected = Some(index);
        self.untouched = false;

        let node = &graph[index];
        tracing::debug!("Recentering on {}", node.id);
        let detail = match (&node.group, node.kind.is_function()) {
            (Some(folder), true) => Some((folder.clone(), node.name.clone())),
            _ => None,
        };
        Some(Recentered {
            node: node.id.clone(),
            detail,
        })
    }

    pub fn is_emphasized(&self, edge: EdgeIndex) -> bool {
        self.emphasized.get(edge.0).copied().unwrap_or(false)
    }

    pub fn edge_order(&self) -> &[EdgeIndex] {
        &self.edge_order
    }

    pub fn node_order(&self) -> &[NodeIndex] {
        &self.node_order
    }

    pub fn highlighted(&self) -> Option<NodeIndex> {
        self.highlighted
    }

    pub fn selected(&self) -> Option<NodeIndex> {
        self.selected
    }

    /// Topmost node whose circle contains the screen point.
    pub fn node_at(&self, graph: &CodeGraph, positions: &[Vec2], screen: Vec2) -> Option<NodeIndex> {
        let world = self.transform.invert(screen);
        self.node_order.iter().rev().copied().find(|&index| {
            positions.get(index.0).is_some_and(|&p| {
                let radius = node_radius(graph[index].kind);
                (p - world).length_sq() <= radius * radius
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::build_graph;
    use callmap_core::{EntityMapping, FunctionRecord};

    fn sample() -> (CodeGraph, Vec<Vec2>) {
        let mut mapping = EntityMapping::new();
        mapping.insert_function("a", "f", FunctionRecord::default());
        mapping.insert_function("a/b", "g", FunctionRecord::default());
        let graph = build_graph(&mapping);
        // a, a/f, a/b, a/b/g
        let positions = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(100.0, 0.0),
            Vec2::new(0.0, 100.0),
            Vec2::new(50.0, 200.0),
        ];
        (graph, positions)
    }

    fn viewport() -> Vec2 {
        Vec2::new(800.0, 600.0)
    }

    #[test]
    fn test_easing_endpoints_and_midpoint() {
        assert_eq!(ease_cubic_in_out(0.0), 0.0);
        assert_eq!(ease_cubic_in_out(0.5), 0.5);
        assert_eq!(ease_cubic_in_out(1.0), 1.0);
        assert!(ease_cubic_in_out(0.25) < 0.25);
        assert!(ease_cubic_in_out(0.75) > 0.75);
    }

    #[test]
    fn test_initial_transform() {
        let (graph, _) = sample();
        let view = ViewController::new(&graph, viewport());
        assert_eq!(view.transform().translate, Vec2::new(400.0, 300.0));
        assert_eq!(view.transform().scale, 0.06);
    }

    #[test]
    fn test_resize_before_interaction_recenters_initial_view() {
        let (graph, _) = sample();
        let mut view = ViewController::new(&graph, viewport());
        view.set_viewport(Vec2::new(520.0, 600.0));
        assert_eq!(view.transform(), ViewTransform::initial(Vec2::new(520.0, 600.0)));

        view.pan_by(Vec2::new(5.0, 5.0));
        let panned = view.transform();
        view.set_viewport(Vec2::new(900.0, 700.0));
        assert_eq!(view.transform(), panned);
        assert_eq!(view.viewport(), Vec2::new(900.0, 700.0));
    }

    #[test]
    fn test_highlight_emphasizes_incident_edges_and_raises() {
        let (graph, _) = sample();
        let mut view = ViewController::new(&graph, viewport());
        let id = NodeId::from("a/b");
        assert!(view.highlight(&graph, &id));

        let emphasized: Vec<_> = graph
            .edge_indices()
            .filter(|&e| view.is_emphasized(e))
            .collect();
        assert_eq!(emphasized.len(), 2);
        let order = view.edge_order();
        assert_eq!(&order[order.len() - 2..], emphasized.as_slice());
        assert_eq!(view.node_order().last(), graph.index_of(&id).as_ref());

        view.reset_highlight();
        assert!(graph.edge_indices().all(|e| !view.is_emphasized(e)));
        assert_eq!(view.node_order().last(), graph.index_of(&id).as_ref());
    }

    #[test]
    fn test_recenter_animates_to_node_at_unit_zoom() {
        let (graph, positions) = sample();
        let mut view = ViewController::new(&graph, viewport());
        let t0 = Instant::now();
        let done = view
            .recenter(&graph, &positions, &NodeId::from("a/b/g"), t0)
            .unwrap();
        assert_eq!(done.detail, Some(("a/b".to_string(), "g".to_string())));
        assert!(view.is_animating());

        let mid = view.transform_at(t0 + Duration::from_millis(375));
        assert!(mid.translate != Vec2::new(400.0, 300.0));

        let end = view.transform_at(t0 + Duration::from_millis(750));
        assert!(!view.is_animating());
        assert_eq!(end.scale, 1.0);
        assert_eq!(end.translate, Vec2::new(350.0, 100.0));
        let on_screen = end.apply(positions[3]);
        assert!((on_screen - Vec2::new(400.0, 300.0)).length() < 1e-3);
        assert_eq!(view.selected(), Some(NodeIndex(3)));
    }

    #[test]
    fn test_recenter_from_zoomed_in_view_returns_to_unit_scale() {
        let (graph, positions) = sample();
        let mut view = ViewController::new(&graph, viewport());
        view.zoom_about(Vec2::new(400.0, 300.0), 50.0);
        let t0 = Instant::now();
        view.recenter(&graph, &positions, &NodeId::from("a/f"), t0);

        let mid = view.transform_at(t0 + Duration::from_millis(375));
        assert!(mid.scale < 3.0 && mid.scale > 1.0);
        let end = view.transform_at(t0 + ViewController::RECENTER_DURATION);
        assert_eq!(end.scale, 1.0);
        assert_eq!(end.translate, Vec2::new(300.0, 300.0));
    }

    #[test]
    fn test_recenter_on_folder_has_no_detail() {
        let (graph, positions) = sample();
        let mut view = ViewController::new(&graph, viewport());
        let done = view
            .recenter(&graph, &positions, &NodeId::from("a"), Instant::now())
            .unwrap();
        assert_eq!(done.detail, None);
    }

    #[test]
    fn test_recenter_unknown_id_is_noop() {
        let (graph, positions) = sample();
        let mut view = ViewController::new(&graph, viewport());
        let before = view.transform();
        assert!(
            view.recenter(&graph, &positions, &NodeId::from("nope"), Instant::now())
                .is_none()
        );
        assert!(!view.is_animating());
        assert_eq!(view.transform(), before);
        assert_eq!(view.selected(), None);
    }

    #[test]
    fn test_zoom_keeps_anchor_fixed() {
        let (graph, _) = sample();
        let mut view = ViewController::new(&graph, viewport());
        let anchor = Vec2::new(120.0, 80.0);
        let world = view.transform().invert(anchor);
        view.zoom_about(anchor, 2.0);
        assert!((view.transform().apply(world) - anchor).length() < 1e-3);
        assert!((view.transform().scale - 0.12).abs() < 1e-6);
    }

    #[test]
    fn test_pan_cancels_transition() {
        let (graph, positions) = sample();
        let mut view = ViewController::new(&graph, viewport());
        view.recenter(&graph, &positions, &NodeId::from("a/f"), Instant::now());
        view.pan_by(Vec2::new(10.0, 0.0));
        assert!(!view.is_animating());
    }

    #[test]
    fn test_node_at_uses_world_radius() {
        let (graph, positions) = sample();
        let mut view = ViewController::new(&graph, viewport());
        view.zoom_about(Vec2::new(400.0, 300.0), 1.0 / 0.06);
        let screen = view.transform().apply(Vec2::new(105.0, 0.0));
        assert_eq!(view.node_at(&graph, &positions, screen), Some(NodeIndex(1)));
        let miss = view.transform().apply(Vec2::new(100.0, 50.0));
        assert_eq!(view.node_at(&graph, &positions, miss), None);
    }
}
