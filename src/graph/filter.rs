use std::sync::Arc;

use super::model::{Category, Edge, GraphSnapshot, Node};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub search: String,
    pub category: Option<Category>,
}

impl FilterCriteria {
    pub fn new(search: &str, category: Option<Category>) -> Self {
        Self {
            search: search.to_owned(),
            category,
        }
    }

    fn matches_search(&self, needle: &str, node: &Node) -> bool {
        needle.is_empty() || node.label.to_lowercase().contains(needle)
    }

    fn matches_category(&self, node: &Node) -> bool {
        self.category.is_none_or(|category| node.category == category)
    }
}

/// Subset of a [`GraphSnapshot`] addressed by index into the snapshot.
///
/// Edges are kept when either endpoint matches the search and either
/// endpoint matches the category, so an edge can outlive one of its
/// endpoints in the node list.
#[derive(Clone, Debug)]
pub struct FilteredView {
    snapshot: Arc<GraphSnapshot>,
    criteria: FilterCriteria,
    node_indices: Vec<usize>,
    edge_indices: Vec<usize>,
}

impl FilteredView {
    pub fn compute(snapshot: Arc<GraphSnapshot>, criteria: FilterCriteria) -> Self {
        let needle = criteria.search.to_lowercase();

        let node_indices = snapshot
            .nodes()
            .iter()
            .enumerate()
            .filter(|(_, node)| {
                criteria.matches_search(&needle, node) && criteria.matches_category(node)
            })
            .map(|(index, _)| index)
            .collect();

        let edge_indices = snapshot
            .edges()
            .iter()
            .enumerate()
            .filter(|(_, edge)| {
                let (Some(source), Some(target)) =
                    (snapshot.node(&edge.source_id), snapshot.node(&edge.target_id))
                else {
                    return false;
                };

                let search_hit = criteria.matches_search(&needle, source)
                    || criteria.matches_search(&needle, target);
                let category_hit =
                    criteria.matches_category(source) || criteria.matches_category(target);
                search_hit && category_hit
            })
            .map(|(index, _)| index)
            .collect();

        Self {
            snapshot,
            criteria,
            node_indices,
            edge_indices,
        }
    }

    pub fn unfiltered(snapshot: Arc<GraphSnapshot>) -> Self {
        Self::compute(snapshot, FilterCriteria::default())
    }

    pub fn snapshot(&self) -> &Arc<GraphSnapshot> {
        &self.snapshot
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn nodes(&self) -> impl ExactSizeIterator<Item = &Node> + '_ {
        self.node_indices
            .iter()
            .map(|&index| &self.snapshot.nodes()[index])
    }

    pub fn edges(&self) -> impl ExactSizeIterator<Item = &Edge> + '_ {
        self.edge_indices
            .iter()
            .map(|&index| &self.snapshot.edges()[index])
    }

    pub fn node_at(&self, position: usize) -> Option<&Node> {
        self.node_indices
            .get(position)
            .map(|&index| &self.snapshot.nodes()[index])
    }

    pub fn node_count(&self) -> usize {
        self.node_indices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_indices.is_empty()
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes().any(|node| node.id == id)
    }

    /// Edges of this view touching `id`, dangling ones included.
    pub fn connection_count(&self, id: &str) -> usize {
        self.edges().filter(|edge| edge.touches(id)).count()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::graph::model::{DEFAULT_NODE_COLOR, Edge};
    use crate::graph::sample::sample_graph;

    fn ids(view: &FilteredView) -> Vec<&str> {
        view.nodes().map(|node| node.id.as_str()).collect()
    }

    #[test]
    fn place_filter_on_sample() {
        let view = FilteredView::compute(
            Arc::new(sample_graph()),
            FilterCriteria::new("", Some(Category::Place)),
        );
        assert_eq!(ids(&view), vec!["小学", "这个地方", "小花园", "巷子"]);

        let places = ["小学", "这个地方", "小花园", "巷子"];
        let expected = view
            .snapshot()
            .edges()
            .iter()
            .filter(|edge| {
                places.contains(&edge.source_id.as_str())
                    || places.contains(&edge.target_id.as_str())
            })
            .count();
        assert_eq!(view.edge_count(), expected);
        assert_eq!(view.edge_count(), 8);
        assert!(view.edges().all(|edge| {
            places.contains(&edge.source_id.as_str()) || places.contains(&edge.target_id.as_str())
        }));
    }

    #[test]
    fn edge_with_one_matching_endpoint_survives() {
        let view = FilteredView::compute(Arc::new(sample_graph()), FilterCriteria::new("天光", None));
        assert_eq!(ids(&view), vec!["天光"]);
        assert_eq!(view.edge_count(), 3);
        assert!(view.edges().all(|edge| edge.touches("天光")));
    }

    #[test]
    fn search_is_case_insensitive() {
        let snapshot = GraphSnapshot::new(
            vec![
                Node {
                    id: "g".to_owned(),
                    label: "Garden".to_owned(),
                    category: Category::Place,
                    color: DEFAULT_NODE_COLOR,
                    description: None,
                },
                Node {
                    id: "s".to_owned(),
                    label: "School".to_owned(),
                    category: Category::Place,
                    color: DEFAULT_NODE_COLOR,
                    description: None,
                },
            ],
            vec![Edge::new("g", "s", None, None)],
        );
        let view = FilteredView::compute(Arc::new(snapshot), FilterCriteria::new("gARD", None));
        assert_eq!(ids(&view), vec!["g"]);
        assert_eq!(view.connection_count("g"), 1);
    }

    #[test]
    fn empty_result_is_not_an_error() {
        let view =
            FilteredView::compute(Arc::new(sample_graph()), FilterCriteria::new("nothing", None));
        assert!(view.is_empty());
        assert_eq!(view.edge_count(), 0);
    }

    fn category_strategy() -> impl Strategy<Value = Option<Category>> {
        prop_oneof![
            Just(None),
            proptest::sample::select(Category::ALL.to_vec()).prop_map(Some),
        ]
    }

    proptest! {
        #[test]
        fn filtered_nodes_always_match(
            search in proptest::sample::select(vec!["", "小", "花", "天光", "子", "x", "学"]),
            category in category_strategy(),
        ) {
            let view = FilteredView::compute(
                Arc::new(sample_graph()),
                FilterCriteria::new(search, category),
            );
            for node in view.nodes() {
                prop_assert!(node.label.to_lowercase().contains(&search.to_lowercase()));
                if let Some(category) = category {
                    prop_assert_eq!(node.category, category);
                }
            }

            let included = view.node_count();
            let expected = view
                .snapshot()
                .nodes()
                .iter()
                .filter(|node| {
                    node.label.contains(search) && category.is_none_or(|c| node.category == c)
                })
                .count();
            prop_assert_eq!(included, expected);
        }
    }
}
