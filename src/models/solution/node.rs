#[cfg(test)]
#[path = "../../../tests/unit/models/solution/node_test.rs"]
mod node_test;

use crate::evaluation::{Cost, Evaluation, LabelHolder, Resource};
use crate::models::problem::{Edge, Instance, Vertex, VertexId};
use std::sync::Arc;

/// A positioned occurrence of a vertex inside a route. Holds the vertex reference together with
/// the current forward and backward resource labels.
#[derive(Clone)]
pub struct Node {
    vertex: Arc<Vertex>,
    forward_label: LabelHolder,
    backward_label: LabelHolder,
}

impl Node {
    /// Creates a new node.
    pub fn new(vertex: Arc<Vertex>, forward_label: LabelHolder, backward_label: LabelHolder) -> Self {
        Self { vertex, forward_label, backward_label }
    }

    /// Returns the referenced vertex.
    pub fn vertex(&self) -> &Vertex {
        &self.vertex
    }

    /// Returns the id of the referenced vertex.
    pub fn vertex_id(&self) -> VertexId {
        self.vertex.id
    }

    /// Returns the current forward label.
    pub fn forward_label(&self) -> &LabelHolder {
        &self.forward_label
    }

    /// Returns the current backward label.
    pub fn backward_label(&self) -> &LabelHolder {
        &self.backward_label
    }

    /// Replaces both labels with freshly initialized ones from the given evaluation function.
    pub fn reset_labels(&mut self, evaluation: &dyn Evaluation) {
        self.forward_label = evaluation.create_forward_label(&self.vertex);
        self.backward_label = evaluation.create_backward_label(&self.vertex);
    }

    /// Recomputes the forward label from the predecessor node.
    pub fn update_forward(&mut self, evaluation: &dyn Evaluation, pred_node: &Node, edge: &Edge) {
        self.forward_label =
            evaluation.propagate_forward(&pred_node.forward_label, pred_node.vertex(), &self.vertex, edge);
    }

    /// Recomputes the backward label from the successor node.
    pub fn update_backward(&mut self, evaluation: &dyn Evaluation, succ_node: &Node, edge: &Edge) {
        self.backward_label =
            evaluation.propagate_backward(&succ_node.backward_label, succ_node.vertex(), &self.vertex, edge);
    }

    /// Returns the realized cost at this node's forward label.
    pub fn cost(&self, evaluation: &dyn Evaluation) -> Cost {
        evaluation.compute_cost(&self.forward_label)
    }

    /// Returns the per-dimension cost breakdown at this node's forward label.
    pub fn cost_components(&self, evaluation: &dyn Evaluation) -> Vec<Resource> {
        evaluation.cost_components(&self.forward_label)
    }

    /// Returns true if the prefix ending at this node is feasible.
    pub fn feasible(&self, evaluation: &dyn Evaluation) -> bool {
        evaluation.is_feasible(&self.forward_label)
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.vertex.str_id)
    }
}

/// Creates a node with freshly initialized labels for the given vertex.
pub fn create_node(evaluation: &dyn Evaluation, vertex: Arc<Vertex>) -> Node {
    let forward_label = evaluation.create_forward_label(&vertex);
    let backward_label = evaluation.create_backward_label(&vertex);
    Node::new(vertex, forward_label, backward_label)
}

/// Creates a node with freshly initialized labels for the vertex with the given id.
pub fn create_node_for(evaluation: &dyn Evaluation, instance: &Instance, vertex_id: VertexId) -> Node {
    create_node(evaluation, instance.vertex(vertex_id).clone())
}
