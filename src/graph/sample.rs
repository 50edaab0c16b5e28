use super::model::{Category, Edge, GraphSnapshot, Node, Rgb};

const NODES: &[(&str, &str, Category, &str)] = &[
    ("小学", "童年的学校生活", Category::Place, "#e8a87c"),
    ("小时候", "美好的童年时光", Category::Time, "#d4b5e8"),
    ("这个地方", "承载回忆的地点", Category::Place, "#e8a87c"),
    ("小花园", "放学后的活动场所", Category::Place, "#c4a57b"),
    ("打羽毛球", "童年的运动回忆", Category::Activity, "#8b6f47"),
    ("放学", "自由时光的开始", Category::Time, "#d4b5e8"),
    ("巷子", "探险的地方", Category::Place, "#c4a57b"),
    ("闲逛", "无目的的漫步", Category::Activity, "#8b6f47"),
    ("不开心", "情绪的低谷", Category::Emotion, "#c84c3c"),
    ("天光", "自然的光线", Category::Element, "#f5e6d3"),
    ("治愈", "心灵的抚慰", Category::Emotion, "#e8a87c"),
];

const LINKS: &[(&str, &str, &str, f32)] = &[
    ("小学", "小时候", "associated_with", 0.8),
    ("小学", "这个地方", "part_of", 0.9),
    ("小花园", "这个地方", "part_of", 0.9),
    ("打羽毛球", "小花园", "located_in", 0.85),
    ("打羽毛球", "放学", "during", 0.8),
    ("巷子", "这个地方", "part_of", 0.9),
    ("闲逛", "巷子", "located_in", 0.85),
    ("不开心", "闲逛", "triggers", 0.7),
    ("天光", "治愈", "evokes", 0.95),
    ("小花园", "天光", "contains", 0.8),
    ("巷子", "天光", "contains", 0.75),
];

/// The childhood-memories graph shown when no data file is given.
pub fn sample_graph() -> GraphSnapshot {
    let nodes = NODES
        .iter()
        .map(|&(id, description, category, color)| Node {
            id: id.to_owned(),
            label: id.to_owned(),
            category,
            color: Rgb::from_hex(color).unwrap_or(super::model::DEFAULT_NODE_COLOR),
            description: Some(description.to_owned()),
        })
        .collect();

    let edges = LINKS
        .iter()
        .map(|&(source, target, label, strength)| {
            Edge::new(source, target, Some(label), Some(strength))
        })
        .collect();

    GraphSnapshot::new(nodes, edges)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_is_fully_connected_data() {
        let graph = sample_graph();
        assert_eq!(graph.node_count(), 11);
        assert_eq!(graph.edge_count(), 11);
    }

    #[test]
    fn sample_light_node_relations() {
        let graph = sample_graph();
        let node = graph.node("天光").expect("sample node");
        assert_eq!(node.description.as_deref(), Some("自然的光线"));
        assert_eq!(node.category, Category::Element);

        let others = graph
            .relations_of("天光")
            .into_iter()
            .map(|relation| relation.other_id)
            .collect::<Vec<_>>();
        assert_eq!(others, vec!["治愈", "小花园", "巷子"]);
    }
}
