use std::collections::HashMap;
use std::time::Duration;

use eframe::egui::Vec2;
use tracing::{debug, info};

use crate::graph::{FilteredView, Node, Relation};

use super::interaction::{Drag, Interaction, NodeState, hit_test};
use super::render_sync::{RenderFrame, compose};
use super::simulation::{Seed, Simulation};
use super::stabilize::Stabilizer;
use super::{LayoutConfig, node_radius};

#[derive(Clone, Debug, PartialEq)]
pub struct NodePosition {
    pub id: String,
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeSegment {
    pub source_id: String,
    pub target_id: String,
    pub source_x: f32,
    pub source_y: f32,
    pub target_x: f32,
    pub target_y: f32,
}

/// Output of one tick, in simulation coordinates.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PositionsSnapshot {
    pub nodes: Vec<NodePosition>,
    pub edges: Vec<EdgeSegment>,
    pub hovered_id: Option<String>,
}

#[cfg(test)]
impl PositionsSnapshot {
    pub fn node(&self, id: &str) -> Option<&NodePosition> {
        self.nodes.iter().find(|node| node.id == id)
    }
}

/// Fired when a node is clicked; carries the full record for the info panel.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectionEvent {
    pub node: Node,
    pub relations: Vec<Relation>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HoverChange {
    pub previous: Option<String>,
    pub current: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineStatus {
    Running,
    Settled,
    Frozen,
    Stopped,
}

impl EngineStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Settled => "settled",
            Self::Frozen => "pinned",
            Self::Stopped => "stopped",
        }
    }
}

pub struct LayoutEngine {
    config: LayoutConfig,
    view: FilteredView,
    index_by_id: HashMap<String, usize>,
    simulation: Simulation,
    stabilizer: Stabilizer,
    interaction: Interaction,
    running: bool,
}

impl LayoutEngine {
    pub fn new(view: FilteredView, config: LayoutConfig) -> Self {
        let (index_by_id, simulation) = Self::build_simulation(&view, &config, None);
        let stabilizer = Stabilizer::new(config.stabilize_after);
        info!(
            nodes = view.node_count(),
            edges = view.edge_count(),
            "layout engine started"
        );

        Self {
            config,
            view,
            index_by_id,
            simulation,
            stabilizer,
            interaction: Interaction::default(),
            running: true,
        }
    }

    fn build_simulation(
        view: &FilteredView,
        config: &LayoutConfig,
        prior: Option<&HashMap<String, Vec2>>,
    ) -> (HashMap<String, usize>, Simulation) {
        let mut connections: HashMap<&str, usize> = HashMap::new();
        for edge in view.edges() {
            *connections.entry(edge.source_id.as_str()).or_default() += 1;
            if edge.target_id != edge.source_id {
                *connections.entry(edge.target_id.as_str()).or_default() += 1;
            }
        }

        let index_by_id = view
            .nodes()
            .enumerate()
            .map(|(index, node)| (node.id.clone(), index))
            .collect::<HashMap<_, _>>();

        let seeds = view
            .nodes()
            .map(|node| Seed {
                id: node.id.as_str(),
                radius: node_radius(
                    node.category,
                    connections.get(node.id.as_str()).copied().unwrap_or(0),
                ),
                position: prior.and_then(|positions| positions.get(&node.id).copied()),
            })
            .collect::<Vec<_>>();

        // Edges whose other end was filtered out still size the radius but
        // take no part in the physics.
        let links = view
            .edges()
            .filter_map(|edge| {
                let source = *index_by_id.get(&edge.source_id)?;
                let target = *index_by_id.get(&edge.target_id)?;
                Some((source, target, edge.strength))
            })
            .collect::<Vec<_>>();

        let simulation = Simulation::new(&seeds, &links, config);
        (index_by_id, simulation)
    }

    /// Replaces the working set and restarts simulation and stabilization.
    pub fn set_filtered_view(&mut self, view: FilteredView) {
        let prior = self.config.inherit_positions.then(|| {
            self.simulation
                .positions_by_id(self.view.nodes().map(|node| node.id.as_str()))
        });

        let (index_by_id, simulation) =
            Self::build_simulation(&view, &self.config, prior.as_ref());
        info!(
            nodes = view.node_count(),
            edges = view.edge_count(),
            links = simulation.links().len(),
            search = %view.criteria().search,
            category = ?view.criteria().category,
            "filtered view applied"
        );

        self.view = view;
        self.index_by_id = index_by_id;
        self.simulation = simulation;
        self.interaction.reset();
        self.stabilizer.restart();
        self.running = true;
    }

    pub fn view(&self) -> &FilteredView {
        &self.view
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Runs one tick and reports where everything ended up.
    pub fn advance(&mut self, dt: Duration) -> PositionsSnapshot {
        if !self.running {
            return self.positions();
        }

        let dragging = self.interaction.drag;
        if dragging.is_some() || !self.simulation.is_settled(&self.config) {
            self.simulation.tick(&self.config);
        }

        // The pointer wins over physics for the dragged node.
        if let Some(drag) = dragging {
            self.simulation.fix(drag.index, drag.pointer);
        }

        if self.stabilizer.advance(dt) {
            self.simulation.pin_all();
            info!(
                nodes = self.simulation.bodies().len(),
                elapsed_ms = self.stabilizer.elapsed().as_millis() as u64,
                "layout stabilized, all nodes pinned"
            );
        }

        self.positions()
    }

    pub fn positions(&self) -> PositionsSnapshot {
        let bodies = self.simulation.bodies();
        let nodes = self
            .view
            .nodes()
            .zip(bodies)
            .map(|(node, body)| NodePosition {
                id: node.id.clone(),
                x: body.position.x,
                y: body.position.y,
            })
            .collect::<Vec<_>>();

        let edges = self
            .simulation
            .links()
            .iter()
            .map(|link| {
                let source = bodies[link.source].position;
                let target = bodies[link.target].position;
                EdgeSegment {
                    source_id: nodes[link.source].id.clone(),
                    target_id: nodes[link.target].id.clone(),
                    source_x: source.x,
                    source_y: source.y,
                    target_x: target.x,
                    target_y: target.y,
                }
            })
            .collect();

        PositionsSnapshot {
            nodes,
            edges,
            hovered_id: self.hovered_id().map(str::to_owned),
        }
    }

    pub fn frame(&self) -> RenderFrame {
        compose(
            self.simulation.bodies(),
            self.simulation.links(),
            &self.interaction,
        )
    }

    pub fn position_of(&self, id: &str) -> Option<Vec2> {
        let index = self.index_of(id)?;
        Some(self.simulation.bodies()[index].position)
    }

    #[cfg(test)]
    pub fn radius_of(&self, id: &str) -> Option<f32> {
        let index = self.index_of(id)?;
        Some(self.simulation.bodies()[index].radius)
    }

    pub fn is_pinned(&self, id: &str) -> bool {
        self.index_of(id)
            .is_some_and(|index| self.simulation.bodies()[index].pinned)
    }

    pub fn alpha(&self) -> f32 {
        self.simulation.alpha()
    }

    /// Time left before every node is pinned.
    pub fn stabilize_remaining(&self) -> Duration {
        self.stabilizer.remaining()
    }

    /// Free bodies under a non-zero alpha still move after the freeze.
    fn is_moving(&self) -> bool {
        self.interaction.drag.is_some()
            || (!self.simulation.is_settled(&self.config) && self.simulation.has_free_body())
    }

    pub fn status(&self) -> EngineStatus {
        if !self.running {
            EngineStatus::Stopped
        } else if self.is_moving() {
            EngineStatus::Running
        } else if self.stabilizer.is_frozen() {
            EngineStatus::Frozen
        } else {
            EngineStatus::Settled
        }
    }

    /// Whether the host should keep scheduling frames.
    ///
    /// Stays true until the stabilization budget has run out, even when the
    /// layout settled early.
    pub fn is_active(&self) -> bool {
        self.running && (!self.stabilizer.is_frozen() || self.is_moving())
    }

    /// Stops tick scheduling; later calls to `advance` leave positions alone.
    pub fn stop(&mut self) {
        if self.running {
            info!("layout engine stopped");
        }
        self.running = false;
        self.interaction.drag = None;
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    fn id_at(&self, index: usize) -> Option<&str> {
        self.view.node_at(index).map(|node| node.id.as_str())
    }

    pub fn hit_test(&self, point: Vec2) -> Option<&str> {
        let index = hit_test(
            point,
            self.simulation
                .bodies()
                .iter()
                .map(|body| (body.position, body.radius)),
        )?;
        self.id_at(index)
    }

    pub fn hovered_id(&self) -> Option<&str> {
        self.interaction.hovered.and_then(|index| self.id_at(index))
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.interaction.selected.and_then(|index| self.id_at(index))
    }

    pub fn is_dragging(&self) -> bool {
        self.interaction.drag.is_some()
    }

    pub fn node_state(&self, id: &str) -> NodeState {
        let Some(index) = self.index_of(id) else {
            return NodeState::default();
        };
        NodeState {
            hovered: self.interaction.hovered == Some(index),
            selected: self.interaction.selected == Some(index),
            dragging: self.interaction.dragged() == Some(index),
        }
    }

    /// Pointer moved to `point`, or left the canvas when `None`.
    pub fn hover(&mut self, point: Option<Vec2>) -> Option<HoverChange> {
        let target = point
            .and_then(|point| self.hit_test(point))
            .map(str::to_owned);
        self.hover_node(target.as_deref())
    }

    pub fn hover_node(&mut self, id: Option<&str>) -> Option<HoverChange> {
        let index = id.and_then(|id| self.index_of(id));
        let previous = self.interaction.set_hovered(index)?;
        Some(HoverChange {
            previous: previous.and_then(|index| self.id_at(index)).map(str::to_owned),
            current: self.hovered_id().map(str::to_owned),
        })
    }

    /// Click at `point`; background clicks return `None` and keep the selection.
    pub fn click(&mut self, point: Vec2) -> Option<SelectionEvent> {
        let id = self.hit_test(point)?.to_owned();
        self.select(&id)
    }

    /// Selects by id; works for nodes outside the current view too.
    pub fn select(&mut self, id: &str) -> Option<SelectionEvent> {
        let snapshot = self.view.snapshot();
        let node = snapshot.node(id)?.clone();
        let relations = snapshot.relations_of(id);
        self.interaction.selected = self.index_of(id);
        debug!(id, relations = relations.len(), "node selected");
        Some(SelectionEvent { node, relations })
    }

    pub fn clear_selection(&mut self) {
        self.interaction.selected = None;
    }

    pub fn drag_start(&mut self, id: &str, pointer: Vec2) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };

        self.interaction.drag = Some(Drag { index, pointer });
        self.simulation.fix(index, pointer);
        self.simulation.set_alpha_target(self.config.drag_alpha);
        self.simulation.reheat(self.config.drag_alpha);
        debug!(id, x = pointer.x, y = pointer.y, "drag started");
        true
    }

    pub fn drag_move(&mut self, pointer: Vec2) {
        if let Some(drag) = self.interaction.drag.as_mut() {
            drag.pointer = pointer;
            let index = drag.index;
            self.simulation.fix(index, pointer);
        }
    }

    /// Ends the drag; the node stays pinned where it was released.
    pub fn drag_end(&mut self) {
        let Some(drag) = self.interaction.drag.take() else {
            return;
        };
        self.simulation.fix(drag.index, drag.pointer);
        self.simulation.pin(drag.index);
        self.simulation.set_alpha_target(0.0);
        debug!(
            id = self.id_at(drag.index).unwrap_or_default(),
            x = drag.pointer.x,
            y = drag.pointer.y,
            "drag ended, node pinned"
        );
    }

    /// Returns a pinned node to free physics.
    pub fn release(&mut self, id: &str) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        if self.interaction.dragged() == Some(index) {
            return false;
        }

        self.simulation.release(index);
        self.simulation.reheat(self.config.drag_alpha);
        debug!(id, "node released");
        true
    }
}
