use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

pub const DEFAULT_NODE_COLOR: Rgb = Rgb::new(0xe8, 0xa8, 0x7c);
pub const DEFAULT_EDGE_STRENGTH: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Place,
    Time,
    Activity,
    Emotion,
    Element,
    Other,
}

impl Category {
    pub const ALL: [Self; 6] = [
        Self::Place,
        Self::Time,
        Self::Activity,
        Self::Emotion,
        Self::Element,
        Self::Other,
    ];

    /// Unknown names fall into [`Category::Other`].
    pub fn from_name(name: &str) -> Self {
        let name = name.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.name() == name)
            .unwrap_or(Self::Other)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Place => "place",
            Self::Time => "time",
            Self::Activity => "activity",
            Self::Emotion => "emotion",
            Self::Element => "element",
            Self::Other => "other",
        }
    }

    pub fn display_label(self) -> &'static str {
        match self {
            Self::Place => "地点",
            Self::Time => "时间",
            Self::Activity => "活动",
            Self::Emotion => "情感",
            Self::Element => "元素",
            Self::Other => "其他",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb` or `#rgb`.
    pub fn from_hex(value: &str) -> Option<Self> {
        let digits = value.trim().strip_prefix('#').unwrap_or(value.trim());
        if !digits.is_ascii() {
            return None;
        }

        match digits.len() {
            6 => {
                let channel = |range: std::ops::Range<usize>| {
                    u8::from_str_radix(&digits[range], 16).ok()
                };
                Some(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
            }
            3 => {
                let channel = |index: usize| {
                    u8::from_str_radix(&digits[index..index + 1], 16)
                        .ok()
                        .map(|nibble| nibble * 17)
                };
                Some(Self::new(channel(0)?, channel(1)?, channel(2)?))
            }
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub id: String,
    pub label: String,
    pub category: Category,
    pub color: Rgb,
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    pub source_id: String,
    pub target_id: String,
    pub label: Option<String>,
    pub strength: f32,
}

impl Edge {
    pub fn new(
        source_id: &str,
        target_id: &str,
        label: Option<&str>,
        strength: Option<f32>,
    ) -> Self {
        Self {
            source_id: source_id.to_owned(),
            target_id: target_id.to_owned(),
            label: label.map(str::to_owned),
            strength: normalize_strength(strength),
        }
    }

    pub fn touches(&self, id: &str) -> bool {
        self.source_id == id || self.target_id == id
    }
}

/// Missing, zero, negative and non-finite strengths all fall back to the default.
pub fn normalize_strength(strength: Option<f32>) -> f32 {
    match strength {
        Some(value) if value.is_finite() && value > 0.0 => value.min(1.0),
        _ => DEFAULT_EDGE_STRENGTH,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelationDirection {
    Outgoing,
    Incoming,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Relation {
    pub other_id: String,
    pub other_label: String,
    pub label: Option<String>,
    pub direction: RelationDirection,
}

#[derive(Clone, Debug, Default)]
pub struct GraphSnapshot {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    index_by_id: HashMap<String, usize>,
}

impl GraphSnapshot {
    /// Builds a snapshot, dropping edges whose endpoints are unknown.
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        let mut unique_nodes = Vec::with_capacity(nodes.len());
        let mut index_by_id = HashMap::with_capacity(nodes.len());
        for node in nodes {
            if index_by_id.contains_key(&node.id) {
                warn!(id = %node.id, "duplicate node id, keeping first occurrence");
                continue;
            }
            index_by_id.insert(node.id.clone(), unique_nodes.len());
            unique_nodes.push(node);
        }

        let edge_total = edges.len();
        let edges = edges
            .into_iter()
            .filter(|edge| {
                let valid = index_by_id.contains_key(&edge.source_id)
                    && index_by_id.contains_key(&edge.target_id);
                if !valid {
                    debug!(
                        source = %edge.source_id,
                        target = %edge.target_id,
                        "dropping edge with unknown endpoint"
                    );
                }
                valid
            })
            .collect::<Vec<_>>();

        if edges.len() < edge_total {
            debug!(
                dropped = edge_total - edges.len(),
                kept = edges.len(),
                "graph snapshot built with malformed edges removed"
            );
        }

        Self {
            nodes: unique_nodes,
            edges,
            index_by_id,
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.node_index(id).map(|index| &self.nodes[index])
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<Category> {
        let mut seen = HashSet::new();
        self.nodes
            .iter()
            .filter_map(|node| seen.insert(node.category).then_some(node.category))
            .collect()
    }

    /// Every edge of the full graph touching `id`, seen from that node.
    pub fn relations_of(&self, id: &str) -> Vec<Relation> {
        self.edges
            .iter()
            .filter(|edge| edge.touches(id) && edge.source_id != edge.target_id)
            .filter_map(|edge| {
                let (other_id, direction) = if edge.source_id == id {
                    (&edge.target_id, RelationDirection::Outgoing)
                } else {
                    (&edge.source_id, RelationDirection::Incoming)
                };
                let other = self.node(other_id)?;
                Some(Relation {
                    other_id: other.id.clone(),
                    other_label: other.label.clone(),
                    label: edge.label.clone(),
                    direction,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, category: Category) -> Node {
        Node {
            id: id.to_owned(),
            label: id.to_owned(),
            category,
            color: DEFAULT_NODE_COLOR,
            description: None,
        }
    }

    #[test]
    fn drops_edges_with_unknown_endpoints() {
        let snapshot = GraphSnapshot::new(
            vec![node("a", Category::Place), node("b", Category::Time)],
            vec![
                Edge::new("a", "b", None, Some(0.8)),
                Edge::new("a", "ghost", None, None),
                Edge::new("ghost", "b", None, None),
            ],
        );

        assert_eq!(snapshot.edge_count(), 1);
        assert_eq!(snapshot.edges()[0].target_id, "b");
    }

    #[test]
    fn duplicate_ids_keep_first_node() {
        let mut second = node("a", Category::Emotion);
        second.label = "shadow".to_owned();
        let snapshot = GraphSnapshot::new(vec![node("a", Category::Place), second], Vec::new());

        assert_eq!(snapshot.node_count(), 1);
        assert_eq!(snapshot.node("a").map(|node| node.category), Some(Category::Place));
    }

    #[test]
    fn strength_defaults_and_clamps() {
        assert_eq!(Edge::new("a", "b", None, None).strength, DEFAULT_EDGE_STRENGTH);
        assert_eq!(Edge::new("a", "b", None, Some(1.7)).strength, 1.0);
        assert_eq!(Edge::new("a", "b", None, Some(0.3)).strength, 0.3);
        assert_eq!(Edge::new("a", "b", None, Some(-0.2)).strength, DEFAULT_EDGE_STRENGTH);
        assert_eq!(Edge::new("a", "b", None, Some(f32::NAN)).strength, DEFAULT_EDGE_STRENGTH);
    }

    #[test]
    fn zero_strength_edge_keeps_default_spring() {
        let edge = Edge::new("a", "b", Some("weak"), Some(0.0));
        assert_eq!(edge.strength, DEFAULT_EDGE_STRENGTH);
    }

    #[test]
    fn parses_hex_colors() {
        assert_eq!(Rgb::from_hex("#e8a87c"), Some(Rgb::new(0xe8, 0xa8, 0x7c)));
        assert_eq!(Rgb::from_hex("#fff"), Some(Rgb::new(255, 255, 255)));
        assert_eq!(Rgb::from_hex("e8a87c"), Some(Rgb::new(0xe8, 0xa8, 0x7c)));
        assert_eq!(Rgb::from_hex("#e8a87"), None);
        assert_eq!(Rgb::from_hex("#zzzzzz"), None);
    }

    #[test]
    fn unknown_category_is_other() {
        assert_eq!(Category::from_name("Place"), Category::Place);
        assert_eq!(Category::from_name("weather"), Category::Other);
    }

    #[test]
    fn relations_report_direction() {
        let snapshot = GraphSnapshot::new(
            vec![node("a", Category::Place), node("b", Category::Time), node("c", Category::Time)],
            vec![
                Edge::new("a", "b", Some("part_of"), None),
                Edge::new("c", "a", Some("during"), None),
            ],
        );

        let relations = snapshot.relations_of("a");
        assert_eq!(relations.len(), 2);
        assert_eq!(relations[0].other_id, "b");
        assert_eq!(relations[0].direction, RelationDirection::Outgoing);
        assert_eq!(relations[1].other_id, "c");
        assert_eq!(relations[1].direction, RelationDirection::Incoming);
        assert_eq!(relations[1].label.as_deref(), Some("during"));
    }

    #[test]
    fn categories_in_first_seen_order() {
        let snapshot = GraphSnapshot::new(
            vec![
                node("a", Category::Time),
                node("b", Category::Place),
                node("c", Category::Time),
            ],
            Vec::new(),
        );
        assert_eq!(snapshot.categories(), vec![Category::Time, Category::Place]);
    }
}
