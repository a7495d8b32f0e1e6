use callmap_core::{EntityMapping, MappingError};
use callmap_events::{Event, EventBus, EventListener};
use callmap_graph::Vec2;
use crossbeam_channel::{Receiver, bounded};
use eframe::egui;
use egui_phosphor::regular as ph;
use std::path::PathBuf;
use std::time::Instant;

use crate::components::{
    graph_canvas::GraphCanvas, preferences::PreferencesDialog, sidebar::Sidebar,
    status_bar::StatusBar, status_bar::StatusInfo,
};
use crate::session::Session;
use crate::settings::AppSettings;
use crate::theme::{self, Theme, empty_state, spacing};

enum LoadState {
    Loading(Receiver<Result<EntityMapping, MappingError>>),
    Failed {
        message: &'static str,
        acknowledged: bool,
    },
    Ready(Box<Session>),
}

pub struct CallmapApp {
    input: PathBuf,
    state: LoadState,
    event_bus: EventBus,
    settings: AppSettings,
    theme: Theme,

    sidebar: Sidebar,
    canvas: GraphCanvas,
    status_bar: StatusBar,
    preferences: PreferencesDialog,
}

impl CallmapApp {
    pub fn new(cc: &eframe::CreationContext<'_>, input: PathBuf, settings: AppSettings) -> Self {
        let theme = Theme::new(settings.theme, settings.font_size);
        tracing::info!(
            "Applying initial theme mode: {:?} with scale {}",
            settings.theme,
            settings.ui_scale
        );
        theme.apply(&cc.egui_ctx);
        cc.egui_ctx.set_pixels_per_point(settings.ui_scale);

        Self {
            preferences: PreferencesDialog::new(&settings),
            state: LoadState::Loading(Self::spawn_loader(input.clone(), cc.egui_ctx.clone())),
            input,
            event_bus: EventBus::new(),
            settings,
            theme,
            sidebar: Sidebar::new(),
            canvas: GraphCanvas::new(),
            status_bar: StatusBar::new(),
        }
    }

    /// Read and parse the mapping off the UI thread.
    fn spawn_loader(
        path: PathBuf,
        ctx: egui::Context,
    ) -> Receiver<Result<EntityMapping, MappingError>> {
        let (tx, rx) = bounded(1);
        std::thread::spawn(move || {
            let started = Instant::now();
            let result = EntityMapping::from_path(&path);
            tracing::info!("Loaded {} in {:?}", path.display(), started.elapsed());
            let _ = tx.send(result);
            ctx.request_repaint();
        });
        rx
    }

    fn poll_loader(&mut self, ctx: &egui::Context) {
        let LoadState::Loading(rx) = &self.state else {
            return;
        };
        let Ok(result) = rx.try_recv() else {
            return;
        };

        self.state = match result {
            Ok(mapping) => {
                let viewport = ctx.screen_rect().size();
                let session = Session::new(
                    mapping,
                    &self.settings.layout,
                    Vec2::new(viewport.x, viewport.y),
                    Instant::now(),
                );
                self.event_bus.publish(Event::MappingLoaded {
                    nodes: session.graph.node_count(),
                    edges: session.graph.edge_count(),
                });
                LoadState::Ready(Box::new(session))
            }
            Err(e) => {
                tracing::error!("Failed to load {}: {}", self.input.display(), e);
                self.event_bus.publish(Event::MappingFailed {
                    error: e.to_string(),
                });
                LoadState::Failed {
                    message: e.user_message(),
                    acknowledged: false,
                }
            }
        };
    }

    fn dispatch_events(&mut self) {
        let rx = self.event_bus.receiver();
        while let Ok(event) = rx.try_recv() {
            match &event {
                Event::MappingLoaded { nodes, edges } => {
                    self.status_bar
                        .set_message(format!("Loaded {} nodes, {} edges", nodes, edges));
                }
                Event::MappingFailed { error } => self.status_bar.set_message(error.clone()),
                _ => {}
            }
            if let LoadState::Ready(session) = &mut self.state {
                session.handle_event(&event);
            }
        }
    }

    /// Drop the current graph and load `path` in the background.
    fn open(&mut self, path: PathBuf, ctx: &egui::Context) {
        tracing::info!("Opening {}", path.display());
        self.state = LoadState::Loading(Self::spawn_loader(path.clone(), ctx.clone()));
        self.input = path;
        self.sidebar = Sidebar::new();
        self.canvas = GraphCanvas::new();
    }

    fn source_label(&self) -> String {
        self.input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.input.display().to_string())
    }
}

impl eframe::App for CallmapApp {
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.settings.save();
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.preferences.show(ctx, &mut self.settings) {
            self.theme = Theme::new(self.settings.theme, self.settings.font_size);
            self.theme.apply(ctx);
            ctx.set_pixels_per_point(self.settings.ui_scale);
        }

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.menu_button("File", |ui| {
                    if ui.button(format!("{} Open...", ph::FOLDER_OPEN)).clicked() {
                        ui.close();
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("JSON", &["json"])
                            .pick_file()
                        {
                            self.open(path, ctx);
                        }
                    }
                });
                ui.menu_button("View", |ui| {
                    if ui.button(format!("{} Preferences...", ph::GEAR)).clicked() {
                        self.preferences.open(&self.settings);
                        ui.close();
                    }
                });
            });
        });

        self.poll_loader(ctx);
        self.dispatch_events();

        let now = Instant::now();
        let source = self.source_label();

        match &mut self.state {
            LoadState::Loading(_) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.centered_and_justified(|ui| {
                        ui.add(egui::Spinner::new().size(48.0));
                    });
                });
            }
            LoadState::Failed {
                message,
                acknowledged,
            } => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    empty_state(ui, ph::WARNING_CIRCLE, "Nothing to show", &source);
                });
                if !*acknowledged {
                    let modal = egui::Modal::new(egui::Id::new("load_failed")).show(ctx, |ui| {
                        ui.set_max_width(420.0);
                        theme::error_box(ui, *message);
                        ui.add_space(spacing::ITEM_SPACING);
                        ui.vertical_centered(|ui| ui.add(theme::primary_button(ui, "OK")).clicked())
                            .inner
                    });
                    if modal.inner {
                        *acknowledged = true;
                    }
                }
            }
            LoadState::Ready(session) => {
                if session.advance(now, &self.event_bus) {
                    ctx.request_repaint();
                }

                egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
                    let info: StatusInfo = session.status_info(&source, now);
                    self.status_bar.ui(ui, &info);
                });

                egui::SidePanel::left("menu")
                    .default_width(self.settings.sidebar_width)
                    .resizable(true)
                    .show(ctx, |ui| {
                        self.sidebar.ui(ui, &mut session.menu, &self.event_bus);
                    });

                egui::CentralPanel::default()
                    .frame(egui::Frame::NONE)
                    .show(ctx, |ui| {
                        let session = session.as_mut();
                        self.canvas.show(
                            ui,
                            &session.graph,
                            session.driver.positions(),
                            &session.palette,
                            &mut session.view,
                            &self.event_bus,
                        );
                        if !session.driver.is_stopped() {
                            let rect = ui.max_rect();
                            egui::Area::new(egui::Id::new("layout_loader"))
                                .fixed_pos(rect.center() - egui::vec2(16.0, 16.0))
                                .show(ctx, |ui| {
                                    ui.add(egui::Spinner::new().size(32.0));
                                });
                        }
                    });

                if session.detail().is_some_and(|d| d.is_open())
                    && session.detail_mut().ui(ctx)
                {
                    self.event_bus.publish(Event::CloseDetail);
                }
            }
        }
    }
}
