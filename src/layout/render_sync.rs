use eframe::egui::Vec2;

use super::highlight::Neighborhood;
use super::interaction::Interaction;
use super::simulation::{Body, Link};

pub const NODE_OPACITY: f32 = 0.9;
pub const NODE_OPACITY_FOCUSED: f32 = 1.0;
pub const NODE_OPACITY_DIMMED: f32 = 0.3;
pub const EDGE_OPACITY: f32 = 0.5;
pub const EDGE_OPACITY_FOCUSED: f32 = 0.8;
pub const EDGE_OPACITY_DIMMED: f32 = 0.2;
pub const HOVER_RADIUS_BOOST: f32 = 8.0;
pub const NODE_STROKE: f32 = 2.5;
pub const NODE_STROKE_HOVERED: f32 = 3.0;

pub fn edge_width(strength: f32) -> f32 {
    1.5 + strength * 2.0
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeVisual {
    pub index: usize,
    pub position: Vec2,
    pub radius: f32,
    pub opacity: f32,
    pub stroke_width: f32,
    pub hovered: bool,
    pub selected: bool,
    pub pinned: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeVisual {
    pub source: usize,
    pub target: usize,
    pub from: Vec2,
    pub to: Vec2,
    pub width: f32,
    pub opacity: f32,
    pub highlighted: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderFrame {
    pub edges: Vec<EdgeVisual>,
    pub nodes: Vec<NodeVisual>,
}

/// Visual attributes for the current positions and hover target.
pub(super) fn compose(bodies: &[Body], links: &[Link], interaction: &Interaction) -> RenderFrame {
    let hovered = interaction.hovered.filter(|&index| index < bodies.len());
    let focus = hovered.map(|index| Neighborhood::around(links, index));

    let edges = links
        .iter()
        .enumerate()
        .map(|(index, link)| {
            let touching = focus
                .as_ref()
                .map(|neighborhood| neighborhood.links.contains(&index));
            let base_width = edge_width(link.strength);
            let (width, opacity) = match touching {
                None => (base_width, EDGE_OPACITY),
                Some(true) => (base_width + 1.0, EDGE_OPACITY_FOCUSED),
                Some(false) => (base_width, EDGE_OPACITY_DIMMED),
            };

            EdgeVisual {
                source: link.source,
                target: link.target,
                from: bodies[link.source].position,
                to: bodies[link.target].position,
                width,
                opacity,
                highlighted: touching == Some(true),
            }
        })
        .collect();

    let nodes = bodies
        .iter()
        .enumerate()
        .map(|(index, body)| {
            let is_hovered = hovered == Some(index);
            let opacity = match &focus {
                None => NODE_OPACITY,
                Some(neighborhood) if neighborhood.nodes.contains(&index) => NODE_OPACITY_FOCUSED,
                Some(_) => NODE_OPACITY_DIMMED,
            };

            NodeVisual {
                index,
                position: body.position,
                radius: if is_hovered {
                    body.radius + HOVER_RADIUS_BOOST
                } else {
                    body.radius
                },
                opacity,
                stroke_width: if is_hovered {
                    NODE_STROKE_HOVERED
                } else {
                    NODE_STROKE
                },
                hovered: is_hovered,
                selected: interaction.selected == Some(index),
                pinned: body.pinned,
            }
        })
        .collect();

    RenderFrame { edges, nodes }
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::*;

    fn body(x: f32, radius: f32) -> Body {
        Body {
            position: vec2(x, 0.0),
            velocity: Vec2::ZERO,
            fixed: None,
            pinned: false,
            radius,
            jitter: Vec2::ZERO,
        }
    }

    fn link(source: usize, target: usize, strength: f32) -> Link {
        Link {
            source,
            target,
            rest_length: 120.0,
            stiffness: strength * 0.5,
            bias: 0.5,
            strength,
        }
    }

    fn fixture() -> (Vec<Body>, Vec<Link>) {
        (
            vec![body(0.0, 35.0), body(100.0, 22.0), body(200.0, 24.0), body(300.0, 20.0)],
            vec![link(0, 1, 0.9), link(1, 2, 0.5), link(2, 3, 0.0)],
        )
    }

    #[test]
    fn baseline_without_hover() {
        let (bodies, links) = fixture();
        let frame = compose(&bodies, &links, &Interaction::default());

        assert!(frame.nodes.iter().all(|node| node.opacity == NODE_OPACITY));
        assert!(frame.edges.iter().all(|edge| edge.opacity == EDGE_OPACITY));
        assert_eq!(frame.nodes[0].radius, 35.0);
        assert!((frame.edges[0].width - 3.3).abs() < 1e-6);
        assert_eq!(frame.edges[2].width, 1.5);
    }

    #[test]
    fn hover_scopes_opacity_to_neighborhood() {
        let (bodies, links) = fixture();
        let interaction = Interaction {
            hovered: Some(1),
            ..Interaction::default()
        };
        let frame = compose(&bodies, &links, &interaction);

        let node_opacity = frame.nodes.iter().map(|node| node.opacity).collect::<Vec<_>>();
        assert_eq!(
            node_opacity,
            vec![
                NODE_OPACITY_FOCUSED,
                NODE_OPACITY_FOCUSED,
                NODE_OPACITY_FOCUSED,
                NODE_OPACITY_DIMMED
            ]
        );
        let edge_opacity = frame.edges.iter().map(|edge| edge.opacity).collect::<Vec<_>>();
        assert_eq!(
            edge_opacity,
            vec![EDGE_OPACITY_FOCUSED, EDGE_OPACITY_FOCUSED, EDGE_OPACITY_DIMMED]
        );

        assert_eq!(frame.nodes[1].radius, 22.0 + HOVER_RADIUS_BOOST);
        assert_eq!(frame.nodes[1].stroke_width, NODE_STROKE_HOVERED);
        assert!((frame.edges[1].width - 3.5).abs() < 1e-6);
        assert_eq!(frame.edges[2].width, 1.5);
    }

    #[test]
    fn compose_is_idempotent() {
        let (bodies, links) = fixture();
        let interaction = Interaction {
            hovered: Some(3),
            ..Interaction::default()
        };
        let first = compose(&bodies, &links, &interaction);
        let second = compose(&bodies, &links, &interaction);
        assert_eq!(first, second);
        assert_eq!(
            compose(&bodies, &links, &Interaction::default()),
            compose(&bodies, &links, &Interaction::default())
        );
    }
}
