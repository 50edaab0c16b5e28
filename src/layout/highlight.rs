use std::collections::HashSet;

use super::simulation::Link;

/// Nodes and links one edge away from a focus node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(super) struct Neighborhood {
    pub(super) nodes: HashSet<usize>,
    pub(super) links: HashSet<usize>,
}

impl Neighborhood {
    pub(super) fn around(links: &[Link], focus: usize) -> Self {
        let mut nodes = HashSet::from([focus]);
        let mut touching = HashSet::new();

        for (index, link) in links.iter().enumerate() {
            if link.source == focus {
                nodes.insert(link.target);
            } else if link.target == focus {
                nodes.insert(link.source);
            } else {
                continue;
            }
            touching.insert(index);
        }

        Self {
            nodes,
            links: touching,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(source: usize, target: usize) -> Link {
        Link {
            source,
            target,
            rest_length: 120.0,
            stiffness: 0.25,
            bias: 0.5,
            strength: 0.5,
        }
    }

    #[test]
    fn collects_both_directions_one_hop() {
        let links = [link(0, 1), link(2, 0), link(1, 3), link(3, 4)];
        let neighborhood = Neighborhood::around(&links, 0);

        assert_eq!(neighborhood.nodes, HashSet::from([0, 1, 2]));
        assert_eq!(neighborhood.links, HashSet::from([0, 1]));
    }

    #[test]
    fn isolated_focus_is_alone() {
        let neighborhood = Neighborhood::around(&[link(1, 2)], 0);
        assert_eq!(neighborhood.nodes, HashSet::from([0]));
        assert!(neighborhood.links.is_empty());
    }
}
