use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

use super::model::{Category, DEFAULT_NODE_COLOR, Edge, GraphSnapshot, Node, Rgb};

#[derive(Clone, Debug, Deserialize)]
struct RawGraph {
    #[serde(default)]
    nodes: Vec<RawNode>,
    #[serde(default, alias = "edges")]
    links: Vec<RawLink>,
}

#[derive(Clone, Debug, Deserialize)]
struct RawNode {
    id: String,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    color: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
struct RawLink {
    source: String,
    target: String,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    strength: Option<f32>,
}

pub fn parse_graph_json(raw: &str) -> Result<GraphSnapshot> {
    let parsed: RawGraph = serde_json::from_str(raw).context("invalid graph JSON")?;
    if parsed.nodes.is_empty() {
        return Err(anyhow!("graph JSON contains no nodes"));
    }

    let nodes = parsed
        .nodes
        .into_iter()
        .map(|raw| Node {
            label: raw
                .label
                .filter(|label| !label.is_empty())
                .unwrap_or_else(|| raw.id.clone()),
            id: raw.id,
            category: raw
                .category
                .as_deref()
                .map(Category::from_name)
                .unwrap_or(Category::Other),
            color: raw
                .color
                .as_deref()
                .and_then(Rgb::from_hex)
                .unwrap_or(DEFAULT_NODE_COLOR),
            description: raw.description.filter(|text| !text.is_empty()),
        })
        .collect();

    let edges = parsed
        .links
        .into_iter()
        .map(|raw| Edge::new(&raw.source, &raw.target, raw.label.as_deref(), raw.strength))
        .collect();

    Ok(GraphSnapshot::new(nodes, edges))
}

pub fn load_graph_file(path: &Path) -> Result<GraphSnapshot> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read graph data from {}", path.display()))?;
    parse_graph_json(&raw).with_context(|| format!("failed to parse {}", path.display()))
}
