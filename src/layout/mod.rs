//! Force-directed layout and the interaction protocol around it.
//!
//! Everything here works in simulation space. The egui shell converts to
//! screen space through [`Viewport`] and only ever reads positions.

mod engine;
mod highlight;
mod interaction;
mod render_sync;
mod simulation;
mod stabilize;
mod viewport;

use std::time::Duration;

use eframe::egui::Vec2;

use crate::graph::Category;

pub use engine::{LayoutEngine, SelectionEvent};
pub use viewport::{Viewport, ZoomBounds};

pub const PLACE_BASE_RADIUS: f32 = 35.0;
pub const DEFAULT_BASE_RADIUS: f32 = 20.0;
pub const RADIUS_PER_CONNECTION: f32 = 2.0;

/// Draw and collision radius before hover enlargement.
pub fn node_radius(category: Category, connections: usize) -> f32 {
    let base = match category {
        Category::Place => PLACE_BASE_RADIUS,
        _ => DEFAULT_BASE_RADIUS,
    };
    base + connections as f32 * RADIUS_PER_CONNECTION
}

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
    pub center: Vec2,
    /// Many-body strength; negative values repel.
    pub charge: f32,
    pub barnes_hut_theta: f32,
    /// Rest length of a full-strength link.
    pub link_distance: f32,
    /// Extra rest length added as strength falls to zero.
    pub link_distance_span: f32,
    pub link_stiffness: f32,
    pub center_strength: f32,
    pub collision_padding: f32,
    pub collision_strength: f32,
    pub velocity_decay: f32,
    pub alpha_decay: f32,
    pub alpha_min: f32,
    pub drag_alpha: f32,
    pub stabilize_after: Duration,
    /// Seed nodes that survive a re-filter at their previous position.
    pub inherit_positions: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            center: Vec2::ZERO,
            charge: -400.0,
            barnes_hut_theta: 0.9,
            link_distance: 120.0,
            link_distance_span: 80.0,
            link_stiffness: 0.5,
            center_strength: 0.1,
            collision_padding: 10.0,
            collision_strength: 1.0,
            velocity_decay: 0.4,
            alpha_decay: 0.02,
            alpha_min: 0.001,
            drag_alpha: 0.3,
            stabilize_after: Duration::from_secs(3),
            inherit_positions: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn place_nodes_start_larger() {
        assert_eq!(node_radius(Category::Place, 0), 35.0);
        assert_eq!(node_radius(Category::Emotion, 0), 20.0);
        assert_eq!(node_radius(Category::Place, 3), 41.0);
    }

    proptest! {
        #[test]
        fn radius_grows_with_each_connection(
            category in proptest::sample::select(Category::ALL.to_vec()),
            connections in 0usize..200,
        ) {
            let radius = node_radius(category, connections);
            let base = if category == Category::Place { 35.0 } else { 20.0 };
            prop_assert_eq!(radius, base + 2.0 * connections as f32);
            prop_assert!(node_radius(category, connections + 1) > radius);
        }
    }
}
