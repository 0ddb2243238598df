//! Application shell and eframe integration.
//!
//! Polls the background dataset load, shows explicit loading/failure
//! states, dispatches scene changes from the store to the renderers, and
//! debounces resizes before re-deriving scatter scale state.

use crate::cards::CardsView;
use crate::controls;
use crate::galaxy::GalaxyView;
use crate::loader::{self, DataSource};
use crate::scatter::{self, ScatterView};
use crate::scene::{SceneDescriptor, SceneFilter, ViewSpec};
use crate::scenes::build_scenes;
use crate::sidebar;
use crate::state::{Datasets, SceneStore};
use eframe::egui;
use std::cell::Cell;
use std::rc::Rc;
use std::sync::mpsc;

/// Trailing-edge resize debounce; redraw storms must not thrash the scales.
const RESIZE_SETTLE_SECS: f64 = 0.18;

enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

pub struct App {
    store: SceneStore,
    load: LoadState,
    load_rx: Option<mpsc::Receiver<Result<Datasets, String>>>,
    scene_changed: Rc<Cell<bool>>,

    galaxy: GalaxyView,
    scatter: ScatterView,
    cards: CardsView,
    filtered_planets: Vec<usize>,
    filtered_systems: Vec<usize>,

    clock: f64,
    central_size: egui::Vec2,
    resize_pending_since: Option<f64>,
}

impl App {
    pub fn new(cc: &eframe::CreationContext<'_>, source: DataSource) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        let mut store = SceneStore::new(build_scenes());
        let scene_changed = Rc::new(Cell::new(false));
        let flag = scene_changed.clone();
        store.subscribe(move |_| flag.set(true));

        Self {
            store,
            load: LoadState::Loading,
            load_rx: Some(loader::spawn_load(source)),
            scene_changed,
            galaxy: GalaxyView::new(),
            scatter: ScatterView::new(),
            cards: CardsView::new(),
            filtered_planets: Vec::new(),
            filtered_systems: Vec::new(),
            clock: 0.0,
            central_size: egui::vec2(600.0, 400.0),
            resize_pending_since: None,
        }
    }

    fn poll_load(&mut self) {
        let Some(rx) = &self.load_rx else { return };
        match rx.try_recv() {
            Ok(Ok(datasets)) => {
                self.load_rx = None;
                self.store.set_datasets(datasets);
                self.load = LoadState::Ready;
                self.store.go_to(0);
            }
            Ok(Err(message)) => {
                self.load_rx = None;
                self.load = LoadState::Failed(message);
            }
            Err(mpsc::TryRecvError::Empty) => {}
            Err(mpsc::TryRecvError::Disconnected) => {
                self.load_rx = None;
                self.load = LoadState::Failed("dataset loader disappeared".to_string());
            }
        }
    }

    /// Re-derive the filtered slice and hand the new scene to the views.
    fn apply_scene(&mut self) {
        let scene: SceneDescriptor = *self.store.current_scene();

        self.filtered_planets.clear();
        self.filtered_systems.clear();
        match scene.filter {
            SceneFilter::Planets(keep) => {
                let planets = &self.store.datasets.planets;
                self.filtered_planets
                    .extend((0..planets.len()).filter(|&i| keep(&planets[i])));
            }
            SceneFilter::Systems(keep) => {
                let systems = &self.store.datasets.systems;
                self.filtered_systems
                    .extend((0..systems.len()).filter(|&i| keep(&systems[i])));
            }
        }

        match scene.view {
            ViewSpec::Galaxy(spec) => {
                self.galaxy.set_scene(&spec);
            }
            ViewSpec::Scatter(spec) => {
                self.galaxy.stop();
                self.scatter.update(
                    &self.store.datasets.planets,
                    &self.filtered_planets,
                    &spec,
                    scene.id,
                    scatter::inner_size(self.central_size),
                    self.clock,
                );
            }
            ViewSpec::Transition => {
                self.galaxy.stop();
                self.cards
                    .update(&self.store.datasets.systems, &self.filtered_systems);
            }
        }
    }

    fn loading_screen(ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(ui.available_height() * 0.4);
                ui.spinner();
                ui.label("Loading exoplanet catalog…");
            });
        });
        ctx.request_repaint();
    }

    fn failure_screen(ctx: &egui::Context, message: &str) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(ui.available_height() * 0.4);
                ui.label(
                    egui::RichText::new("Failed to load the exoplanet data")
                        .strong()
                        .size(18.0)
                        .color(egui::Color32::from_rgb(0xf9, 0x73, 0x73)),
                );
                ui.add_space(6.0);
                ui.label(message);
                ui.add_space(6.0);
                ui.label(
                    egui::RichText::new(
                        "Run the preprocess step first, or point the app at a \
                         directory containing planets.json and systems.json.",
                    )
                    .weak(),
                );
            });
        });
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.clock += ctx.input(|i| i.stable_dt) as f64;
        self.poll_load();

        match &self.load {
            LoadState::Loading => {
                Self::loading_screen(ctx);
                return;
            }
            LoadState::Failed(message) => {
                let message = message.clone();
                Self::failure_screen(ctx, &message);
                return;
            }
            LoadState::Ready => {}
        }

        if ctx.input(|i| i.key_pressed(egui::Key::ArrowRight)) {
            self.store.next_scene();
        }
        if ctx.input(|i| i.key_pressed(egui::Key::ArrowLeft)) {
            self.store.prev_scene();
        }

        let index = self.store.current_index();
        let count = self.store.scene_count();
        let scene: SceneDescriptor = *self.store.current_scene();

        let nav = Cell::new(0isize);
        egui::SidePanel::left("story_sidebar")
            .resizable(false)
            .default_width(280.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    sidebar::show(ui, &scene);
                    ui.add_space(12.0);
                    controls::show(ui, index, count, || nav.set(-1), || nav.set(1));
                    ui.add_space(8.0);
                });
            });
        match nav.get() {
            -1 => self.store.prev_scene(),
            1 => self.store.next_scene(),
            _ => {}
        }

        if self.scene_changed.take() {
            self.apply_scene();
        }
        let scene: SceneDescriptor = *self.store.current_scene();

        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            if (available - self.central_size).length() > 1.0 {
                self.central_size = available;
                self.resize_pending_since = Some(self.clock);
                ctx.request_repaint();
            }

            match scene.view {
                ViewSpec::Galaxy(spec) => {
                    let systems = &self.store.datasets.systems;
                    let slice: Vec<&crate::data::SystemRecord> = self
                        .filtered_systems
                        .iter()
                        .map(|&i| &systems[i])
                        .collect();
                    self.galaxy.draw(ui, &slice, &spec, self.clock);
                }
                ViewSpec::Scatter(spec) => {
                    self.scatter
                        .draw(ui, &self.store.datasets.planets, &spec, self.clock);
                }
                ViewSpec::Transition => {
                    self.cards
                        .draw(ui, &self.store.datasets.systems, self.clock);
                }
            }
        });

        // trailing edge of a resize burst: rebuild size-dependent scale state
        if let Some(since) = self.resize_pending_since {
            if self.clock - since >= RESIZE_SETTLE_SECS {
                self.resize_pending_since = None;
                self.apply_scene();
            }
        }
    }
}
