use crate::components::detail_panel::DetailPanel;
use crate::components::status_bar::StatusInfo;
use crate::settings::LayoutSettings;
use callmap_core::EntityMapping;
use callmap_events::{ActivationOrigin, Event, EventBus, EventListener};
use callmap_graph::{
    CodeGraph, DetailContent, ForceSimulation, GroupPalette, LayoutDriver, MenuTree, Vec2,
    ViewController, build_graph,
};
use std::time::Instant;

/// Everything derived from one loaded mapping.
pub struct Session {
    pub mapping: EntityMapping,
    pub graph: CodeGraph,
    pub palette: GroupPalette,
    pub menu: MenuTree,
    pub driver: LayoutDriver,
    pub view: ViewController,
    detail: Option<DetailPanel>,
}

impl Session {
    pub fn new(mapping: EntityMapping, layout: &LayoutSettings, viewport: Vec2, now: Instant) -> Self {
        let graph = build_graph(&mapping);
        let palette = GroupPalette::for_nodes(graph.nodes());
        let menu = MenuTree::build(&mapping);
        let simulation = ForceSimulation::new(&graph, layout.forces, viewport / 2.0);
        let driver = LayoutDriver::start(simulation, layout.auto_stop(), now);
        let view = ViewController::new(&graph, viewport);

        Self {
            mapping,
            graph,
            palette,
            menu,
            driver,
            view,
            detail: None,
        }
    }

    /// Tick the layout and the view animation for the frame at `now`.
    /// Returns whether another frame is needed.
    pub fn advance(&mut self, now: Instant, bus: &EventBus) -> bool {
        let was_stopped = self.driver.is_stopped();
        self.driver.step(now);
        if !was_stopped && self.driver.is_stopped() {
            bus.publish(Event::LayoutStopped {
                ticks: self.driver.simulation().ticks(),
            });
        }
        self.view.transform_at(now);
        !self.driver.is_stopped() || self.view.is_animating()
    }

    pub fn detail(&self) -> Option<&DetailPanel> {
        self.detail.as_ref()
    }

    pub fn detail_mut(&mut self) -> &mut DetailPanel {
        self.detail.get_or_insert_with(DetailPanel::new)
    }

    fn open_detail(&mut self, folder: &str, name: &str) {
        let Some(record) = self.mapping.record(folder, name) else {
            tracing::warn!("No record for {}/{}", folder, name);
            return;
        };
        let content = DetailContent::from_record(name, record);
        self.detail_mut().show(content);
    }

    pub fn status_info(&self, source: &str, now: Instant) -> StatusInfo {
        StatusInfo {
            source: source.to_string(),
            folders: self.graph.folder_count(),
            functions: self.graph.function_count(),
            edges: self.graph.edge_count(),
            ticks: self.driver.simulation().ticks(),
            layout_remaining: (!self.driver.is_stopped()).then(|| self.driver.remaining(now)),
        }
    }
}

impl EventListener for Session {
    fn handle_event(&mut self, event: &Event) {
        match event {
            Event::HighlightNode { id } => {
                self.view.highlight(&self.graph, id);
            }
            Event::ResetHighlight => self.view.reset_highlight(),
            Event::RecenterNode { id, origin } => {
                let recentered =
                    self.view
                        .recenter(&self.graph, self.driver.positions(), id, Instant::now());
                // Menu clicks send their own detail request with the menu's folder.
                if *origin == ActivationOrigin::Graph
                    && let Some((folder, name)) = recentered.and_then(|r| r.detail)
                {
                    self.open_detail(&folder, &name);
                }
            }
            Event::ShowFunctionDetail { folder, name } => self.open_detail(folder, name),
            Event::CloseDetail => {
                if let Some(detail) = self.detail.as_mut() {
                    detail.close();
                }
            }
            Event::SearchChanged { query } => self.menu.apply_filter(query),
            Event::ViewportResized { width, height } => {
                let viewport = Vec2::new(*width, *height);
                self.driver.resize(viewport);
                self.view.set_viewport(viewport);
            }
            Event::LayoutStopped { ticks } => {
                tracing::debug!("Layout frozen after {} ticks", ticks);
            }
            Event::MappingLoaded { .. } | Event::MappingFailed { .. } => {}
        }
    }
}
