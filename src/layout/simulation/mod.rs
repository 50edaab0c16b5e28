mod forces;
mod quadtree;

use std::collections::HashMap;

use eframe::egui::{Vec2, vec2};

use crate::util::stable_pair;

use super::LayoutConfig;
use forces::{apply_centering, apply_collisions, apply_links, apply_repulsion};
use quadtree::Quadtree;

/// Golden-angle increment used for the initial spiral.
const SPIRAL_ANGLE: f32 = std::f32::consts::PI * 0.763_932;
const SPIRAL_RADIUS: f32 = 10.0;

/// Per-node simulation state, stored apart from the graph records.
#[derive(Clone, Debug)]
pub(super) struct Body {
    pub(super) position: Vec2,
    pub(super) velocity: Vec2,
    pub(super) fixed: Option<Vec2>,
    pub(super) pinned: bool,
    pub(super) radius: f32,
    pub(super) jitter: Vec2,
}

/// An edge resolved to body indices.
#[derive(Clone, Debug)]
pub(super) struct Link {
    pub(super) source: usize,
    pub(super) target: usize,
    pub(super) rest_length: f32,
    pub(super) stiffness: f32,
    pub(super) bias: f32,
    pub(super) strength: f32,
}

/// Body seed handed to [`Simulation::new`].
pub(super) struct Seed<'a> {
    pub(super) id: &'a str,
    pub(super) radius: f32,
    pub(super) position: Option<Vec2>,
}

pub(super) struct Simulation {
    bodies: Vec<Body>,
    links: Vec<Link>,
    alpha: f32,
    alpha_target: f32,
    positions_scratch: Vec<Vec2>,
}

impl Simulation {
    pub(super) fn new(
        seeds: &[Seed<'_>],
        edges: &[(usize, usize, f32)],
        config: &LayoutConfig,
    ) -> Self {
        let bodies = seeds
            .iter()
            .enumerate()
            .map(|(index, seed)| {
                let (jx, jy) = stable_pair(seed.id);
                Body {
                    position: seed
                        .position
                        .unwrap_or_else(|| config.center + spiral_offset(index)),
                    velocity: Vec2::ZERO,
                    fixed: None,
                    pinned: false,
                    radius: seed.radius,
                    jitter: vec2(jx, jy),
                }
            })
            .collect::<Vec<_>>();

        let mut degree = vec![0usize; bodies.len()];
        for &(source, target, _) in edges {
            degree[source] += 1;
            degree[target] += 1;
        }

        let links = edges
            .iter()
            .filter(|(source, target, _)| source != target)
            .map(|&(source, target, strength)| Link {
                source,
                target,
                rest_length: config.link_distance + (1.0 - strength) * config.link_distance_span,
                stiffness: strength * config.link_stiffness,
                bias: degree[source] as f32 / (degree[source] + degree[target]) as f32,
                strength,
            })
            .collect();

        Self {
            bodies,
            links,
            alpha: 1.0,
            alpha_target: 0.0,
            positions_scratch: Vec::new(),
        }
    }

    pub(super) fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub(super) fn links(&self) -> &[Link] {
        &self.links
    }

    pub(super) fn alpha(&self) -> f32 {
        self.alpha
    }

    pub(super) fn is_settled(&self, config: &LayoutConfig) -> bool {
        self.alpha < config.alpha_min && self.alpha_target < config.alpha_min
    }

    pub(super) fn has_free_body(&self) -> bool {
        self.bodies.iter().any(|body| body.fixed.is_none())
    }

    /// Raises the temperature to at least `alpha`.
    pub(super) fn reheat(&mut self, alpha: f32) {
        self.alpha = self.alpha.max(alpha);
    }

    /// Level alpha decays toward; non-zero keeps the simulation warm.
    pub(super) fn set_alpha_target(&mut self, target: f32) {
        self.alpha_target = target;
    }

    /// One integration step; returns the largest displacement of any body.
    pub(super) fn tick(&mut self, config: &LayoutConfig) -> f32 {
        if self.bodies.is_empty() {
            return 0.0;
        }

        self.alpha += (self.alpha_target - self.alpha) * config.alpha_decay;
        let alpha = self.alpha;

        apply_links(&mut self.bodies, &self.links, alpha);

        self.positions_scratch.clear();
        self.positions_scratch
            .extend(self.bodies.iter().map(|body| body.position));
        if let Some(tree) = Quadtree::build(&self.positions_scratch) {
            apply_repulsion(
                &mut self.bodies,
                &self.positions_scratch,
                &tree,
                config.charge,
                config.barnes_hut_theta,
                alpha,
            );
        }

        apply_centering(&mut self.bodies, config.center, config.center_strength * alpha);
        apply_collisions(
            &mut self.bodies,
            config.collision_padding,
            config.collision_strength,
        );

        let retain = 1.0 - config.velocity_decay;
        let mut max_step = 0.0_f32;
        for body in &mut self.bodies {
            let before = body.position;
            if let Some(fixed) = body.fixed {
                body.position = fixed;
                body.velocity = Vec2::ZERO;
            } else {
                body.velocity *= retain;
                body.position += body.velocity;
            }
            max_step = max_step.max((body.position - before).length());
        }
        max_step
    }

    pub(super) fn fix(&mut self, index: usize, position: Vec2) {
        if let Some(body) = self.bodies.get_mut(index) {
            body.fixed = Some(position);
            body.position = position;
            body.velocity = Vec2::ZERO;
        }
    }

    pub(super) fn pin(&mut self, index: usize) {
        if let Some(body) = self.bodies.get_mut(index) {
            body.pinned = true;
            body.fixed = Some(body.position);
            body.velocity = Vec2::ZERO;
        }
    }

    pub(super) fn pin_all(&mut self) {
        for index in 0..self.bodies.len() {
            self.pin(index);
        }
        self.alpha = 0.0;
    }

    pub(super) fn release(&mut self, index: usize) {
        if let Some(body) = self.bodies.get_mut(index) {
            body.pinned = false;
            body.fixed = None;
        }
    }

    pub(super) fn positions_by_id<'a>(
        &self,
        ids: impl Iterator<Item = &'a str>,
    ) -> HashMap<String, Vec2> {
        ids.zip(&self.bodies)
            .map(|(id, body)| (id.to_owned(), body.position))
            .collect()
    }
}

fn spiral_offset(index: usize) -> Vec2 {
    let radius = SPIRAL_RADIUS * (0.5 + index as f32).sqrt();
    let angle = index as f32 * SPIRAL_ANGLE;
    vec2(angle.cos(), angle.sin()) * radius
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeds(count: usize) -> Vec<String> {
        (0..count).map(|index| format!("n{index}")).collect()
    }

    fn build(ids: &[String], edges: &[(usize, usize, f32)]) -> Simulation {
        let seeds = ids
            .iter()
            .map(|id| Seed {
                id: id.as_str(),
                radius: 20.0,
                position: None,
            })
            .collect::<Vec<_>>();
        Simulation::new(&seeds, edges, &LayoutConfig::default())
    }

    #[test]
    fn spiral_seeds_are_distinct() {
        let ids = seeds(12);
        let sim = build(&ids, &[]);
        for (i, a) in sim.bodies().iter().enumerate() {
            for b in &sim.bodies()[i + 1..] {
                assert!((a.position - b.position).length() > 1.0);
            }
        }
    }

    #[test]
    fn link_rest_length_and_stiffness_follow_strength() {
        let ids = seeds(3);
        let sim = build(&ids, &[(0, 1, 0.9), (1, 2, 0.5)]);
        let links = sim.links();
        assert!((links[0].rest_length - 128.0).abs() < 1e-4);
        assert!((links[0].stiffness - 0.45).abs() < 1e-6);
        assert!((links[1].rest_length - 160.0).abs() < 1e-4);
        assert!((links[0].bias - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn alpha_decays_geometrically() {
        let ids = seeds(2);
        let config = LayoutConfig::default();
        let mut sim = build(&ids, &[]);
        sim.tick(&config);
        assert!((sim.alpha() - 0.98).abs() < 1e-6);
        sim.tick(&config);
        assert!((sim.alpha() - 0.9604).abs() < 1e-5);
    }

    #[test]
    fn settles_without_drag() {
        let ids = seeds(4);
        let config = LayoutConfig::default();
        let mut sim = build(&ids, &[(0, 1, 0.8), (2, 3, 0.4)]);
        let mut ticks = 0;
        while !sim.is_settled(&config) {
            sim.tick(&config);
            ticks += 1;
            assert!(ticks < 1_000);
        }
        assert!(ticks > 300);
    }

    #[test]
    fn connected_pair_ends_near_rest_length() {
        let ids = seeds(2);
        let config = LayoutConfig::default();
        let mut sim = build(&ids, &[(0, 1, 1.0)]);
        for _ in 0..400 {
            sim.tick(&config);
        }
        let distance = (sim.bodies()[0].position - sim.bodies()[1].position).length();
        assert!(distance > 60.0, "too close: {distance}");
        assert!(distance < 400.0, "too far: {distance}");
    }

    #[test]
    fn fixed_body_ignores_forces() {
        let ids = seeds(3);
        let config = LayoutConfig::default();
        let mut sim = build(&ids, &[(0, 1, 0.8), (0, 2, 0.8)]);
        sim.fix(0, vec2(250.0, -40.0));
        for _ in 0..50 {
            sim.tick(&config);
            assert_eq!(sim.bodies()[0].position, vec2(250.0, -40.0));
        }
    }

    #[test]
    fn pin_all_freezes_positions() {
        let ids = seeds(5);
        let config = LayoutConfig::default();
        let mut sim = build(&ids, &[(0, 1, 0.8), (1, 2, 0.3), (3, 4, 0.5)]);
        for _ in 0..10 {
            sim.tick(&config);
        }
        sim.pin_all();
        let before = sim.bodies().iter().map(|body| body.position).collect::<Vec<_>>();
        for _ in 0..10 {
            assert_eq!(sim.tick(&config), 0.0);
        }
        let after = sim.bodies().iter().map(|body| body.position).collect::<Vec<_>>();
        assert_eq!(before, after);
        assert!(sim.bodies().iter().all(|body| body.pinned));
    }

    #[test]
    fn isolated_nodes_drift_apart_without_collapse() {
        let ids = seeds(6);
        let config = LayoutConfig::default();
        let mut sim = build(&ids, &[]);
        for _ in 0..200 {
            sim.tick(&config);
        }
        let bodies = sim.bodies();
        for (i, a) in bodies.iter().enumerate() {
            for b in &bodies[i + 1..] {
                let gap = (a.position - b.position).length();
                assert!(gap > a.radius + b.radius, "overlap: {gap}");
            }
        }
    }
}
