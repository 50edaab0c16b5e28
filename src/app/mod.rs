use std::sync::Arc;

use eframe::egui::{self, Context};
use tracing::info;

use crate::graph::{Category, FilterCriteria, FilteredView, GraphSnapshot};
use crate::layout::{LayoutConfig, LayoutEngine, SelectionEvent, Viewport, ZoomBounds};

mod graph;
mod render_utils;
mod ui;

pub struct KnowledgeGraphApp {
    model: Box<ViewModel>,
}

pub struct ViewerOptions {
    pub layout: LayoutConfig,
    pub zoom_bounds: ZoomBounds,
    /// Raw TTF/OTF bytes installed ahead of the default fonts.
    pub font: Option<Vec<u8>>,
}

struct ViewModel {
    snapshot: Arc<GraphSnapshot>,
    engine: LayoutEngine,
    viewport: Viewport,
    search: String,
    category: Option<Category>,
    categories: Vec<Category>,
    selection: Option<SelectionEvent>,
    show_help: bool,
    last_frame_secs: Option<f64>,
}

impl KnowledgeGraphApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        snapshot: GraphSnapshot,
        mut options: ViewerOptions,
    ) -> Self {
        configure_style(&cc.egui_ctx);
        if let Some(font) = options.font.take() {
            install_font(&cc.egui_ctx, font);
        }

        Self {
            model: Box::new(ViewModel::new(Arc::new(snapshot), options)),
        }
    }
}

impl ViewModel {
    fn new(snapshot: Arc<GraphSnapshot>, options: ViewerOptions) -> Self {
        let categories = snapshot.categories();
        let view = FilteredView::unfiltered(Arc::clone(&snapshot));
        let engine = LayoutEngine::new(view, options.layout);

        Self {
            snapshot,
            engine,
            viewport: Viewport::new(options.zoom_bounds),
            search: String::new(),
            category: None,
            categories,
            selection: None,
            show_help: true,
            last_frame_secs: None,
        }
    }

    /// Rebuilds the filtered view when the search or category changed.
    fn apply_filter(&mut self) {
        let criteria = FilterCriteria::new(self.search.trim(), self.category);
        if self.engine.view().criteria() == &criteria {
            return;
        }

        let view = FilteredView::compute(Arc::clone(&self.snapshot), criteria);
        self.engine.set_filtered_view(view);
        if let Some(selection) = &self.selection {
            // Keep the panel open; the engine re-resolves the index if the node survived.
            let id = selection.node.id.clone();
            self.selection = self.engine.select(&id);
        }
    }

    fn select_node(&mut self, id: &str) {
        self.selection = self.engine.select(id);
    }

    fn close_selection(&mut self) {
        self.selection = None;
        self.engine.clear_selection();
    }
}

impl eframe::App for KnowledgeGraphApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.model.show(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.model.engine.stop();
        info!("viewer closed");
    }
}

fn install_font(ctx: &Context, bytes: Vec<u8>) {
    const FONT_NAME: &str = "graph-label";

    let mut fonts = egui::FontDefinitions::default();
    fonts.font_data.insert(
        FONT_NAME.to_owned(),
        Arc::new(egui::FontData::from_owned(bytes)),
    );
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        fonts
            .families
            .entry(family)
            .or_default()
            .insert(0, FONT_NAME.to_owned());
    }
    ctx.set_fonts(fonts);
    info!("custom font installed");
}

fn configure_style(ctx: &Context) {
    let mut visuals = egui::Visuals::light();
    visuals.panel_fill = egui::Color32::from_rgb(0xfd, 0xf8, 0xf0);
    visuals.window_fill = egui::Color32::from_rgb(0xfd, 0xf8, 0xf0);
    visuals.override_text_color = Some(render_utils::PANEL_TEXT_COLOR);
    ctx.set_visuals(visuals);
}
