#[cfg(test)]
#[path = "../../tests/unit/evaluation/cvrp_test.rs"]
mod cvrp_test;

use crate::evaluation::{ConcatenationEvaluation, Cost, Resource, SegmentEvaluation};
use crate::models::problem::Vertex;

/// A vertex payload for the capacitated evaluation: the demand collected at the vertex.
pub struct CvrpVertexData {
    /// Demand collected at the vertex.
    pub demand: Resource,
}

/// An edge payload for the capacitated evaluation: the travel distance.
pub struct CvrpEdgeData {
    /// Travel distance along the edge.
    pub distance: Resource,
}

/// A resource label of the capacitated evaluation. Forward and backward labels share the same
/// shape: accumulated distance and collected load.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CvrpLabel {
    /// Accumulated distance.
    pub distance: Resource,
    /// Accumulated load.
    pub load: Resource,
}

/// A capacitated, distance-minimizing evaluation function. With a capacity no route can reach,
/// this doubles as the plain distance-only evaluation.
pub struct CvrpEvaluation {
    storage_capacity: Resource,
    overload_penalty_factor: f64,
}

impl CvrpEvaluation {
    /// Creates a new instance of `CvrpEvaluation` with the given vehicle storage capacity.
    pub fn new(storage_capacity: Resource) -> Self {
        Self { storage_capacity, overload_penalty_factor: 1. }
    }

    /// Returns the penalty factors indexed by cost component: distance first, overload second.
    pub fn penalty_factors(&self) -> [f64; 2] {
        [1., self.overload_penalty_factor]
    }

    /// Sets the overload penalty factor. The distance weight stays fixed at 1.
    pub fn set_penalty_factors(&mut self, factors: [f64; 2]) {
        self.overload_penalty_factor = factors[1];
    }

    fn cost_of(&self, distance: Resource, overload: Resource) -> Cost {
        distance as Cost + overload as Cost * self.overload_penalty_factor
    }

    fn overload(&self, load: Resource) -> Resource {
        (load - self.storage_capacity).max(0)
    }
}

impl SegmentEvaluation for CvrpEvaluation {
    type FwdLabel = CvrpLabel;
    type BwdLabel = CvrpLabel;
    type VertexData = CvrpVertexData;
    type EdgeData = CvrpEdgeData;

    fn create_forward_label(&self, _vertex: &Vertex, data: &Self::VertexData) -> Self::FwdLabel {
        CvrpLabel { distance: 0, load: data.demand }
    }

    fn create_backward_label(&self, _vertex: &Vertex, data: &Self::VertexData) -> Self::BwdLabel {
        CvrpLabel { distance: 0, load: data.demand }
    }

    fn propagate_forward(
        &self,
        pred_label: &Self::FwdLabel,
        _pred_vertex: &Vertex,
        _pred_data: &Self::VertexData,
        _vertex: &Vertex,
        data: &Self::VertexData,
        edge: &Self::EdgeData,
    ) -> Self::FwdLabel {
        CvrpLabel { distance: pred_label.distance + edge.distance, load: pred_label.load + data.demand }
    }

    fn propagate_backward(
        &self,
        succ_label: &Self::BwdLabel,
        _succ_vertex: &Vertex,
        _succ_data: &Self::VertexData,
        _vertex: &Vertex,
        data: &Self::VertexData,
        edge: &Self::EdgeData,
    ) -> Self::BwdLabel {
        CvrpLabel { distance: succ_label.distance + edge.distance, load: succ_label.load + data.demand }
    }

    fn compute_cost(&self, label: &Self::FwdLabel) -> Cost {
        self.cost_of(label.distance, self.overload(label.load))
    }

    fn is_feasible(&self, label: &Self::FwdLabel) -> bool {
        label.load <= self.storage_capacity
    }

    fn cost_components(&self, label: &Self::FwdLabel) -> Vec<Resource> {
        vec![label.distance, self.overload(label.load)]
    }
}

impl ConcatenationEvaluation for CvrpEvaluation {
    fn concatenate(&self, fwd: &Self::FwdLabel, bwd: &Self::BwdLabel, _vertex: &Vertex, data: &Self::VertexData) -> Cost {
        // The junction vertex demand is contained in both labels.
        self.cost_of(fwd.distance + bwd.distance, self.overload(fwd.load + bwd.load - data.demand))
    }
}
