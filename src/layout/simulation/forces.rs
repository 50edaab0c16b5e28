use eframe::egui::{Vec2, vec2};

use super::quadtree::{Cell, Quadtree};
use super::{Body, Link};

const MIN_DISTANCE_SQ: f32 = 1.0;

/// Separation direction for two bodies that sit on top of each other.
fn jiggle(bodies: &[Body], a: usize, b: usize) -> Vec2 {
    let spread = bodies[a].jitter - bodies[b].jitter;
    if spread.length_sq() > 1e-6 {
        return spread.normalized() * 1e-3;
    }
    let angle = ((a as f32) * 0.618_034 + (b as f32) * 0.414_214) * std::f32::consts::TAU;
    vec2(angle.cos(), angle.sin()) * 1e-3
}

pub(super) fn apply_links(bodies: &mut [Body], links: &[Link], alpha: f32) {
    for link in links {
        let (source, target) = (link.source, link.target);
        let mut delta = (bodies[target].position + bodies[target].velocity)
            - (bodies[source].position + bodies[source].velocity);
        if delta == Vec2::ZERO {
            delta = jiggle(bodies, target, source);
        }

        let distance = delta.length();
        let scale = (distance - link.rest_length) / distance * alpha * link.stiffness;
        let correction = delta * scale;

        bodies[target].velocity -= correction * link.bias;
        bodies[source].velocity += correction * (1.0 - link.bias);
    }
}

pub(super) fn apply_repulsion(
    bodies: &mut [Body],
    positions: &[Vec2],
    tree: &Quadtree,
    charge: f32,
    theta: f32,
    alpha: f32,
) {
    let Some(root) = tree.root() else {
        return;
    };
    let theta_sq = theta * theta;

    for index in 0..bodies.len() {
        let mut delta_velocity = Vec2::ZERO;
        accumulate_charge(
            tree,
            root,
            index,
            positions,
            bodies,
            charge * alpha,
            theta_sq,
            &mut delta_velocity,
        );
        bodies[index].velocity += delta_velocity;
    }
}

#[allow(clippy::too_many_arguments)]
fn accumulate_charge(
    tree: &Quadtree,
    cell: &Cell,
    index: usize,
    positions: &[Vec2],
    bodies: &[Body],
    scaled_charge: f32,
    theta_sq: f32,
    out: &mut Vec2,
) {
    let point = positions[index];

    if cell.is_leaf() {
        for &other in &cell.members {
            if other == index {
                continue;
            }
            let mut delta = positions[other] - point;
            if delta == Vec2::ZERO {
                delta = jiggle(bodies, other, index);
            }
            let mut distance_sq = delta.length_sq();
            if distance_sq < MIN_DISTANCE_SQ {
                distance_sq = (MIN_DISTANCE_SQ * distance_sq).sqrt();
            }
            *out += delta * (scaled_charge / distance_sq);
        }
        return;
    }

    let delta = cell.centroid - point;
    let distance_sq = delta.length_sq().max(MIN_DISTANCE_SQ);
    let far_enough = !cell.bounds.contains(point)
        && (cell.bounds.side() * cell.bounds.side()) / theta_sq < distance_sq;
    if far_enough {
        *out += delta * (scaled_charge * cell.weight / distance_sq);
        return;
    }

    for child in cell.children.iter().flatten() {
        accumulate_charge(
            tree,
            tree.cell(*child),
            index,
            positions,
            bodies,
            scaled_charge,
            theta_sq,
            out,
        );
    }
}

/// Moves free bodies so the centroid approaches `center`.
pub(super) fn apply_centering(bodies: &mut [Body], center: Vec2, strength: f32) {
    if bodies.is_empty() || strength <= 0.0 {
        return;
    }

    let centroid = bodies
        .iter()
        .fold(Vec2::ZERO, |sum, body| sum + body.position)
        / bodies.len() as f32;
    let shift = (center - centroid) * strength.min(1.0);
    if shift.length_sq() <= 1e-12 {
        return;
    }

    for body in bodies.iter_mut().filter(|body| body.fixed.is_none()) {
        body.position += shift;
    }
}

pub(super) fn apply_collisions(bodies: &mut [Body], padding: f32, strength: f32) {
    let count = bodies.len();
    for first in 0..count {
        for second in (first + 1)..count {
            let reach = bodies[first].radius + bodies[second].radius + padding * 2.0;
            let mut delta = (bodies[first].position + bodies[first].velocity)
                - (bodies[second].position + bodies[second].velocity);
            let mut distance_sq = delta.length_sq();
            if distance_sq >= reach * reach {
                continue;
            }
            if distance_sq <= 1e-12 {
                delta = jiggle(bodies, first, second);
                distance_sq = delta.length_sq();
            }

            let distance = distance_sq.sqrt();
            let push = delta * ((reach - distance) / distance * strength);
            let first_weight = (bodies[first].radius + padding).powi(2);
            let second_weight = (bodies[second].radius + padding).powi(2);
            let share = second_weight / (first_weight + second_weight);

            bodies[first].velocity += push * share;
            bodies[second].velocity -= push * (1.0 - share);
        }
    }
}
