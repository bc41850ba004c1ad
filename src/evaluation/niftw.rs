#[cfg(test)]
#[path = "../../tests/unit/evaluation/niftw_test.rs"]
mod niftw_test;

use crate::evaluation::{ConcatenationEvaluation, Cost, Resource, SegmentEvaluation};
use crate::models::problem::Vertex;

/// A vertex payload for the non-interleaved full-recharge time-window evaluation.
pub struct NiftwVertexData {
    /// X coordinate of the vertex.
    pub x_coord: f64,
    /// Y coordinate of the vertex.
    pub y_coord: f64,
    /// Demand collected at the vertex.
    pub demand: Resource,
    /// Opening of the arrival time window.
    pub earliest_arrival_time: Resource,
    /// Closing of the arrival time window.
    pub latest_arrival_time: Resource,
    /// Service duration at the vertex. Zero for stations.
    pub service_time: Resource,
}

/// An edge payload for the non-interleaved full-recharge time-window evaluation.
pub struct NiftwEdgeData {
    /// Cost of traversing the edge.
    pub cost: Resource,
    /// Energy consumption along the edge, expressed in recharge time.
    pub consumption: Resource,
    /// Travel duration along the edge.
    pub duration: Resource,
}

/// The resource state shared by forward and backward NIFTW labels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NiftwResourceState {
    /// Earliest possible arrival time.
    pub earliest_arrival: Resource,
    /// Earliest arrival shifted into the time window where feasible.
    pub shifted_earliest_arrival: Resource,
    /// Residual charge expressed in recharge time.
    pub residual_charge_in_time: Resource,
    /// Accumulated distance.
    pub cum_distance: Resource,
    /// Accumulated load.
    pub cum_load: Resource,
    /// Accumulated time window violation.
    pub cum_time_shift: Resource,
    /// Accumulated energy deficit.
    pub cum_overcharge: Resource,
}

/// A forward NIFTW label.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NiftwForwardLabel {
    /// The shared resource state.
    pub state: NiftwResourceState,
    /// Time shift accumulated before this vertex.
    pub prev_time_shift: Resource,
    /// Overcharge accumulated before this vertex.
    pub prev_overcharge: Resource,
}

/// A backward NIFTW label.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NiftwBackwardLabel {
    /// The shared resource state.
    pub state: NiftwResourceState,
}

/// An evaluation function for the electric VRP with time windows where every station visit
/// replenishes the full battery in a fixed replenishment time.
pub struct NiftwEvaluation {
    battery_capacity: Resource,
    storage_capacity: Resource,
    replenishment_time: Resource,
    overload_penalty_factor: f64,
    time_shift_penalty_factor: f64,
    overcharge_penalty_factor: f64,
}

impl NiftwEvaluation {
    /// Creates a new instance of `NiftwEvaluation`.
    pub fn new(battery_capacity: Resource, storage_capacity: Resource, replenishment_time: Resource) -> Self {
        Self {
            battery_capacity,
            storage_capacity,
            replenishment_time,
            overload_penalty_factor: 1.,
            time_shift_penalty_factor: 1.,
            overcharge_penalty_factor: 1.,
        }
    }

    /// Returns the penalty factors indexed as the cost component vector. Distance is fixed at 1.
    pub fn penalty_factors(&self) -> [f64; 4] {
        [1., self.overload_penalty_factor, self.overcharge_penalty_factor, self.time_shift_penalty_factor]
    }

    /// Sets the adjustable penalty factors; the distance entry is ignored.
    pub fn set_penalty_factors(&mut self, factors: [f64; 4]) {
        self.overload_penalty_factor = factors[1];
        self.overcharge_penalty_factor = factors[2];
        self.time_shift_penalty_factor = factors[3];
    }

    fn cost_of(&self, distance: Resource, overload: Resource, overcharge: Resource, time_shift: Resource) -> Cost {
        distance as Cost
            + overload as Cost * self.overload_penalty_factor
            + time_shift as Cost * self.time_shift_penalty_factor
            + overcharge as Cost * self.overcharge_penalty_factor
    }
}

impl SegmentEvaluation for NiftwEvaluation {
    type FwdLabel = NiftwForwardLabel;
    type BwdLabel = NiftwBackwardLabel;
    type VertexData = NiftwVertexData;
    type EdgeData = NiftwEdgeData;

    fn create_forward_label(&self, _vertex: &Vertex, data: &Self::VertexData) -> Self::FwdLabel {
        let time = data.earliest_arrival_time;
        NiftwForwardLabel {
            state: NiftwResourceState {
                earliest_arrival: time,
                shifted_earliest_arrival: time,
                ..NiftwResourceState::default()
            },
            prev_time_shift: 0,
            prev_overcharge: 0,
        }
    }

    fn create_backward_label(&self, _vertex: &Vertex, data: &Self::VertexData) -> Self::BwdLabel {
        let time = data.latest_arrival_time;
        NiftwBackwardLabel {
            state: NiftwResourceState {
                earliest_arrival: time,
                shifted_earliest_arrival: time,
                ..NiftwResourceState::default()
            },
        }
    }

    fn propagate_forward(
        &self,
        pred_label: &Self::FwdLabel,
        pred_vertex: &Vertex,
        pred_data: &Self::VertexData,
        _vertex: &Vertex,
        data: &Self::VertexData,
        edge: &Self::EdgeData,
    ) -> Self::FwdLabel {
        let pred = &pred_label.state;
        let t_ij = edge.duration + pred_data.service_time;
        let q_ij = edge.consumption;
        let c_ij = edge.cost;

        let mut state = NiftwResourceState {
            cum_distance: pred.cum_distance + c_ij,
            cum_load: pred.cum_load + data.demand,
            ..NiftwResourceState::default()
        };

        if pred_vertex.is_station {
            state.earliest_arrival =
                data.earliest_arrival_time.max(pred.shifted_earliest_arrival + t_ij) + self.replenishment_time;
            state.residual_charge_in_time = q_ij;
        } else {
            state.earliest_arrival = data.earliest_arrival_time.max(pred.shifted_earliest_arrival + t_ij);
            state.residual_charge_in_time = pred.residual_charge_in_time.min(self.battery_capacity) + q_ij;
        }

        state.shifted_earliest_arrival = state.earliest_arrival.min(data.latest_arrival_time);

        state.cum_time_shift = pred.cum_time_shift + (state.earliest_arrival - data.latest_arrival_time).max(0);
        state.cum_overcharge =
            pred.cum_overcharge + (state.residual_charge_in_time - self.battery_capacity).max(0);

        NiftwForwardLabel { state, prev_time_shift: pred.cum_time_shift, prev_overcharge: pred.cum_overcharge }
    }

    fn propagate_backward(
        &self,
        succ_label: &Self::BwdLabel,
        succ_vertex: &Vertex,
        _succ_data: &Self::VertexData,
        _vertex: &Vertex,
        data: &Self::VertexData,
        edge: &Self::EdgeData,
    ) -> Self::BwdLabel {
        let succ = &succ_label.state;
        let t_ij = edge.duration + data.service_time;
        let q_ij = edge.consumption;
        let c_ij = edge.cost;

        let mut state = NiftwResourceState {
            cum_distance: succ.cum_distance + c_ij,
            cum_load: succ.cum_load + data.demand,
            ..NiftwResourceState::default()
        };

        if succ_vertex.is_station {
            state.earliest_arrival =
                data.latest_arrival_time.min(succ.shifted_earliest_arrival - t_ij - self.replenishment_time);
            state.residual_charge_in_time = q_ij;
        } else {
            state.earliest_arrival = data.latest_arrival_time.min(succ.shifted_earliest_arrival - t_ij);
            state.residual_charge_in_time = succ.residual_charge_in_time.min(self.battery_capacity) + q_ij;
        }

        state.shifted_earliest_arrival = state.earliest_arrival.max(data.earliest_arrival_time);

        state.cum_time_shift =
            succ.cum_time_shift + (data.earliest_arrival_time - state.earliest_arrival).max(0);
        state.cum_overcharge =
            succ.cum_overcharge + (state.residual_charge_in_time - self.battery_capacity).max(0);

        NiftwBackwardLabel { state }
    }

    fn compute_cost(&self, label: &Self::FwdLabel) -> Cost {
        let state = &label.state;
        self.cost_of(
            state.cum_distance,
            (state.cum_load - self.storage_capacity).max(0),
            state.cum_overcharge,
            state.cum_time_shift,
        )
    }

    fn is_feasible(&self, label: &Self::FwdLabel) -> bool {
        let state = &label.state;
        state.cum_overcharge == 0 && state.cum_time_shift == 0 && state.cum_load <= self.storage_capacity
    }

    fn cost_components(&self, label: &Self::FwdLabel) -> Vec<Resource> {
        let state = &label.state;
        vec![
            state.cum_distance,
            (state.cum_load - self.storage_capacity).max(0),
            state.cum_overcharge,
            state.cum_time_shift,
        ]
    }
}

impl ConcatenationEvaluation for NiftwEvaluation {
    fn concatenate(&self, fwd: &Self::FwdLabel, bwd: &Self::BwdLabel, vertex: &Vertex, data: &Self::VertexData) -> Cost {
        let f = &fwd.state;
        let b = &bwd.state;

        let distance = f.cum_distance + b.cum_distance;
        // The junction vertex demand is contained in both labels.
        let overload = (f.cum_load + b.cum_load - data.demand - self.storage_capacity).max(0);

        let additional_time_shift = (f.shifted_earliest_arrival - b.shifted_earliest_arrival).max(0);

        let additional_overcharge = if vertex.is_station {
            (f.residual_charge_in_time - self.battery_capacity).max(0)
        } else {
            (f.residual_charge_in_time + b.residual_charge_in_time.min(self.battery_capacity)
                - self.battery_capacity)
                .max(0)
        };

        let time_shift = f.cum_time_shift + b.cum_time_shift + additional_time_shift;
        let overcharge = fwd.prev_overcharge + b.cum_overcharge + additional_overcharge;

        self.cost_of(distance, overload, overcharge, time_shift)
    }
}
