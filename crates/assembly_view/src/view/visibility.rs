//! Tri-state node visibility
//!
//! Every node of a mapped entity carries a [`TriState`]. Setting a node
//! cascades its binary state down the subtree, toggles the mapped renderables
//! and re-aggregates every ancestor up to the entity root. `Mixed` only ever
//! results from aggregation.

use super::selection::{SelectionBridge, SelectionChanged, SelectionModel};
use super::synchronizer::GraphicsSynchronizer;
use crate::assembly::AssemblyPayload;
use crate::scene::GraphicsScene;
use crate::tree::{Tree, TreeNodeId, NULL_NODE};
use std::collections::HashMap;

/// Visibility of a node and its subtree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriState {
    /// Node and whole subtree shown
    Visible,
    /// Node and whole subtree hidden
    Hidden,
    /// Some descendants shown, some hidden
    Mixed,
}

impl TriState {
    /// Binary state
    pub fn from_visible(visible: bool) -> Self {
        if visible {
            Self::Visible
        } else {
            Self::Hidden
        }
    }

    fn aggregate(children: impl IntoIterator<Item = Self>) -> Option<Self> {
        let mut result = None;
        for state in children {
            result = match result {
                None => Some(state),
                Some(current) if current == state => Some(current),
                Some(_) => return Some(Self::Mixed),
            };
        }
        result
    }
}

/// Outcome of one [`VisibilityCoordinator::set_node_visible`] call
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityChange {
    /// Every node whose state changed, with its new state
    pub nodes: Vec<(TreeNodeId, TriState)>,
    /// Selection update caused by the change
    pub selection: Option<SelectionChanged>,
}

impl VisibilityChange {
    /// New state of `id`, if it changed
    pub fn state_of(&self, id: TreeNodeId) -> Option<TriState> {
        self.nodes
            .iter()
            .find_map(|&(node, state)| (node == id).then_some(state))
    }
}

/// Per-node visibility records of the mapped entities
#[derive(Debug, Clone, Default)]
pub struct VisibilityCoordinator {
    states: HashMap<TreeNodeId, TriState>,
    entity_nodes: HashMap<TreeNodeId, Vec<TreeNodeId>>,
}

impl VisibilityCoordinator {
    /// Create an empty coordinator
    pub fn new() -> Self {
        Self::default()
    }

    /// Record every node of an entity as visible
    pub fn register_entity<P>(&mut self, tree: &Tree<P>, entity: TreeNodeId) {
        if self.entity_nodes.contains_key(&entity) {
            return;
        }
        let nodes: Vec<_> = tree.pre_order(entity).collect();
        for &node in &nodes {
            self.states.insert(node, TriState::Visible);
        }
        log::trace!("Registered visibility of {} nodes for entity {}", nodes.len(), entity);
        self.entity_nodes.insert(entity, nodes);
    }

    /// Drop the records of an entity
    ///
    /// Works from the node list captured at registration, so the entity may
    /// already be gone from the tree.
    pub fn unregister_entity(&mut self, entity: TreeNodeId) -> bool {
        let Some(nodes) = self.entity_nodes.remove(&entity) else {
            return false;
        };
        for node in nodes {
            self.states.remove(&node);
        }
        true
    }

    /// Nodes recorded for an entity
    pub fn entity_nodes(&self, entity: TreeNodeId) -> &[TreeNodeId] {
        self.entity_nodes.get(&entity).map_or(&[], Vec::as_slice)
    }

    /// Visibility of a node, `Hidden` for unknown ids
    pub fn node_visible_state(&self, id: TreeNodeId) -> TriState {
        self.states.get(&id).copied().unwrap_or(TriState::Hidden)
    }

    /// Whether `id` has a record
    pub fn contains(&self, id: TreeNodeId) -> bool {
        self.states.contains_key(&id)
    }

    /// Number of node records
    pub fn record_count(&self) -> usize {
        self.states.len()
    }

    /// Show or hide a node and its subtree
    ///
    /// The cascade, the scene toggle and the ancestor aggregation complete
    /// before the selection is reconciled. `None` if `id` is unknown or
    /// already in the requested state.
    pub fn set_node_visible<P: AssemblyPayload>(
        &mut self,
        tree: &Tree<P>,
        graphics: &GraphicsSynchronizer<P>,
        scene: &mut dyn GraphicsScene,
        bridge: &SelectionBridge,
        model: &mut SelectionModel,
        id: TreeNodeId,
        on: bool,
    ) -> Option<VisibilityChange> {
        let target = TriState::from_visible(on);
        match self.states.get(&id) {
            None => {
                log::debug!("set_node_visible: unknown node {}", id);
                return None;
            }
            Some(&state) if state == target => return None,
            Some(_) => {}
        }

        let mut nodes = Vec::new();
        for node in tree.pre_order(id) {
            if let Some(state) = self.states.get_mut(&node) {
                if *state != target {
                    *state = target;
                    nodes.push((node, target));
                }
            }
        }

        for object in graphics.graphics_objects_under(tree, id) {
            scene.set_object_visible(object, on);
        }

        let mut parent = tree.parent(id);
        while parent != NULL_NODE {
            let aggregated = TriState::aggregate(
                tree.children(parent)
                    .filter_map(|child| self.states.get(&child).copied()),
            );
            if let (Some(aggregated), Some(state)) = (aggregated, self.states.get_mut(&parent)) {
                if *state != aggregated {
                    *state = aggregated;
                    nodes.push((parent, aggregated));
                }
            }
            parent = tree.parent(parent);
        }

        let selection = bridge.on_node_visibility_changed(id, on, tree, graphics, scene, model);
        scene.redraw();
        log::debug!("Node {} set {:?}: {} state changes", id, target, nodes.len());
        Some(VisibilityChange { nodes, selection })
    }
}
