mod app;
mod graph;
mod layout;
mod util;

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, ensure};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::app::{KnowledgeGraphApp, ViewerOptions};
use crate::graph::{GraphSnapshot, load_graph_file, sample_graph};
use crate::layout::{LayoutConfig, ZoomBounds};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Graph JSON with `nodes` and `links`; the built-in sample is shown when omitted.
    #[arg(long)]
    data: Option<PathBuf>,
    /// Font file used for labels, e.g. a CJK-capable TTF.
    #[arg(long)]
    font: Option<PathBuf>,
    /// Seconds of simulation before every node is pinned.
    #[arg(long, default_value_t = 3.0)]
    stabilize_secs: f32,
    #[arg(long)]
    min_zoom: Option<f32>,
    #[arg(long)]
    max_zoom: Option<f32>,
    /// Keep positions of nodes that survive a filter change.
    #[arg(long)]
    inherit_positions: bool,
}

impl Args {
    fn layout_config(&self) -> Result<LayoutConfig> {
        ensure!(
            self.stabilize_secs.is_finite() && self.stabilize_secs >= 0.0,
            "--stabilize-secs must be a non-negative number"
        );

        Ok(LayoutConfig {
            stabilize_after: Duration::from_secs_f32(self.stabilize_secs),
            inherit_positions: self.inherit_positions,
            ..LayoutConfig::default()
        })
    }

    fn zoom_bounds(&self) -> Result<ZoomBounds> {
        for (flag, value) in [("--min-zoom", self.min_zoom), ("--max-zoom", self.max_zoom)] {
            if let Some(value) = value {
                ensure!(value.is_finite() && value > 0.0, "{flag} must be positive");
            }
        }
        if let (Some(min), Some(max)) = (self.min_zoom, self.max_zoom) {
            ensure!(min <= max, "--min-zoom must not exceed --max-zoom");
        }

        Ok(ZoomBounds {
            min: self.min_zoom,
            max: self.max_zoom,
        })
    }

    fn load_graph(&self) -> Result<GraphSnapshot> {
        match &self.data {
            Some(path) => load_graph_file(path),
            None => Ok(sample_graph()),
        }
    }

    fn load_font(&self) -> Result<Option<Vec<u8>>> {
        self.font
            .as_ref()
            .map(|path| {
                fs::read(path).with_context(|| format!("failed to read font {}", path.display()))
            })
            .transpose()
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let layout = args.layout_config()?;
    let zoom_bounds = args.zoom_bounds()?;
    let graph = args.load_graph()?;
    let font = args.load_font()?;
    let source = args
        .data
        .as_ref()
        .map_or_else(|| "built-in sample".to_owned(), |path| path.display().to_string());
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        source = %source,
        "graph loaded"
    );

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1280.0, 820.0]),
        ..Default::default()
    };
    let viewer = ViewerOptions {
        layout,
        zoom_bounds,
        font,
    };

    eframe::run_native(
        "knowledge-graph-viewer",
        options,
        Box::new(move |cc| Ok(Box::new(KnowledgeGraphApp::new(cc, graph, viewer)))),
    )
    .map_err(|error| anyhow!("failed to start viewer: {error}"))
}
