#[cfg(test)]
#[path = "../../tests/unit/evaluation/adptw_test.rs"]
mod adptw_test;

use crate::evaluation::{ConcatenationEvaluation, Cost, Resource, SegmentEvaluation};
use crate::models::problem::Vertex;

/// A vertex payload for the arrival-dependent partial-recharge time-window evaluation.
pub struct AdptwVertexData {
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

/// An edge payload for the arrival-dependent partial-recharge time-window evaluation.
pub struct AdptwEdgeData {
    /// Cost of traversing the edge.
    pub cost: Resource,
    /// Energy consumption along the edge, expressed in recharge time.
    pub consumption: Resource,
    /// Travel duration along the edge.
    pub duration: Resource,
}

/// The resource state shared by forward and backward ADPTW labels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AdptwResourceState {
    /// Earliest possible arrival time.
    pub earliest_arrival: Resource,
    /// Latest useful arrival time.
    pub latest_arrival: Resource,
    /// Earliest arrival shifted back into the time window where feasible.
    pub shifted_earliest_arrival: Resource,
    /// Latest arrival shifted into the time window.
    pub shifted_latest_arrival: Resource,
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

/// A forward ADPTW label. Tracks, in addition to the shared state, the penalties accumulated
/// strictly before the label's vertex, which the concatenation formula builds upon.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AdptwForwardLabel {
    /// The shared resource state.
    pub state: AdptwResourceState,
    /// Time shift accumulated before this vertex.
    pub prev_time_shift: Resource,
    /// Overcharge accumulated before this vertex.
    pub prev_overcharge: Resource,
}

/// A backward ADPTW label.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AdptwBackwardLabel {
    /// The shared resource state.
    pub state: AdptwResourceState,
}

impl AdptwForwardLabel {
    fn new(depot_data: &AdptwVertexData) -> Self {
        let time = depot_data.earliest_arrival_time;
        Self {
            state: AdptwResourceState {
                earliest_arrival: time,
                latest_arrival: time,
                shifted_earliest_arrival: time,
                shifted_latest_arrival: time,
                ..AdptwResourceState::default()
            },
            prev_time_shift: 0,
            prev_overcharge: 0,
        }
    }
}

impl AdptwBackwardLabel {
    fn new(depot_data: &AdptwVertexData) -> Self {
        let time = depot_data.latest_arrival_time;
        Self {
            state: AdptwResourceState {
                earliest_arrival: time,
                latest_arrival: time,
                shifted_earliest_arrival: time,
                shifted_latest_arrival: time,
                ..AdptwResourceState::default()
            },
        }
    }
}

/// An evaluation function for the electric VRP with time windows and arrival-dependent partial
/// recharging. Charge is tracked in units of recharge time; stations replenish it up to the
/// battery capacity, producing overcharge when the replenishment window would be violated.
pub struct AdptwEvaluation {
    battery_capacity: Resource,
    storage_capacity: Resource,
    overload_penalty_factor: f64,
    time_shift_penalty_factor: f64,
    overcharge_penalty_factor: f64,
}

/// Indices into the ADPTW cost component vector.
pub mod adptw_cost_components {
    /// Index of the distance component.
    pub const DISTANCE: usize = 0;
    /// Index of the overload component.
    pub const OVERLOAD: usize = 1;
    /// Index of the overcharge component.
    pub const OVERCHARGE: usize = 2;
    /// Index of the time shift component.
    pub const TIME_SHIFT: usize = 3;
}

impl AdptwEvaluation {
    /// Creates a new instance of `AdptwEvaluation`.
    pub fn new(battery_capacity: Resource, storage_capacity: Resource) -> Self {
        Self {
            battery_capacity,
            storage_capacity,
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
        self.overload_penalty_factor = factors[adptw_cost_components::OVERLOAD];
        self.overcharge_penalty_factor = factors[adptw_cost_components::OVERCHARGE];
        self.time_shift_penalty_factor = factors[adptw_cost_components::TIME_SHIFT];
    }

    fn cost_of(&self, distance: Resource, overload: Resource, overcharge: Resource, time_shift: Resource) -> Cost {
        distance as Cost
            + overload as Cost * self.overload_penalty_factor
            + time_shift as Cost * self.time_shift_penalty_factor
            + overcharge as Cost * self.overcharge_penalty_factor
    }
}

impl SegmentEvaluation for AdptwEvaluation {
    type FwdLabel = AdptwForwardLabel;
    type BwdLabel = AdptwBackwardLabel;
    type VertexData = AdptwVertexData;
    type EdgeData = AdptwEdgeData;

    fn create_forward_label(&self, _vertex: &Vertex, data: &Self::VertexData) -> Self::FwdLabel {
        AdptwForwardLabel::new(data)
    }

    fn create_backward_label(&self, _vertex: &Vertex, data: &Self::VertexData) -> Self::BwdLabel {
        AdptwBackwardLabel::new(data)
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
        let t_ij = edge.duration;
        let q_ij = edge.consumption;
        let c_ij = edge.cost;
        let e_j = data.earliest_arrival_time;
        let l_j = data.latest_arrival_time;
        let s_i = pred_data.service_time;

        let mut state = AdptwResourceState {
            cum_distance: pred.cum_distance + c_ij,
            cum_load: pred.cum_load + data.demand,
            ..AdptwResourceState::default()
        };

        let slack = (e_j - pred.shifted_earliest_arrival - t_ij - s_i).max(0);
        let add;
        if pred_vertex.is_station {
            let charged = (pred.residual_charge_in_time - slack).max(0) + q_ij;
            state.residual_charge_in_time = charged.min(self.battery_capacity);
            add = (charged - self.battery_capacity).max(0);
            state.latest_arrival = e_j.max(pred.shifted_earliest_arrival + pred.residual_charge_in_time + t_ij + s_i);
        } else {
            let waiting = slack.min(pred.shifted_latest_arrival - pred.shifted_earliest_arrival);
            let charged = (pred.residual_charge_in_time - waiting).max(0) + q_ij;
            state.residual_charge_in_time = charged.min(self.battery_capacity);
            add = (charged - self.battery_capacity).max(0);
            state.latest_arrival = e_j.max(pred.shifted_latest_arrival + t_ij + s_i);
        }

        state.earliest_arrival = e_j.max(pred.shifted_earliest_arrival + t_ij + s_i) + add;
        state.shifted_earliest_arrival = state.earliest_arrival.min(state.latest_arrival.min(l_j));
        state.shifted_latest_arrival = l_j.min(state.latest_arrival);

        state.cum_time_shift = pred.cum_time_shift + (state.earliest_arrival.min(state.latest_arrival) - l_j).max(0);
        state.cum_overcharge = pred.cum_overcharge + (state.earliest_arrival - state.latest_arrival).max(0);

        AdptwForwardLabel { state, prev_time_shift: pred.cum_time_shift, prev_overcharge: pred.cum_overcharge }
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
        let e_i = data.earliest_arrival_time;
        let l_i = data.latest_arrival_time;

        let mut state = AdptwResourceState {
            cum_distance: succ.cum_distance + c_ij,
            cum_load: succ.cum_load + data.demand,
            ..AdptwResourceState::default()
        };

        let slack = (succ.shifted_earliest_arrival - t_ij - l_i).max(0);
        let add;
        if succ_vertex.is_station {
            let charged = (succ.residual_charge_in_time - slack).max(0) + q_ij;
            state.residual_charge_in_time = charged.min(self.battery_capacity);
            add = (charged - self.battery_capacity).max(0);
            state.latest_arrival = l_i.min(succ.shifted_earliest_arrival - t_ij - state.residual_charge_in_time);
        } else {
            let waiting = slack.min(succ.shifted_earliest_arrival - succ.shifted_latest_arrival);
            let charged = (succ.residual_charge_in_time - waiting).max(0) + q_ij;
            state.residual_charge_in_time = charged.min(self.battery_capacity);
            add = (charged - self.battery_capacity).max(0);
            state.latest_arrival = l_i.min(succ.shifted_latest_arrival - t_ij);
        }

        state.earliest_arrival = l_i.min(succ.shifted_earliest_arrival - t_ij) - add;
        state.shifted_earliest_arrival = state.earliest_arrival.max(state.latest_arrival.max(e_i));
        state.shifted_latest_arrival = e_i.max(state.latest_arrival);

        state.cum_time_shift =
            succ.cum_time_shift + (e_i - state.latest_arrival.max(state.earliest_arrival)).max(0);
        state.cum_overcharge = succ.cum_overcharge + (state.latest_arrival - state.earliest_arrival).max(0);

        AdptwBackwardLabel { state }
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

impl ConcatenationEvaluation for AdptwEvaluation {
    fn concatenate(&self, fwd: &Self::FwdLabel, bwd: &Self::BwdLabel, vertex: &Vertex, data: &Self::VertexData) -> Cost {
        let f = &fwd.state;
        let b = &bwd.state;

        let distance = f.cum_distance + b.cum_distance;
        // The junction vertex demand is contained in both labels.
        let overload = (f.cum_load + b.cum_load - data.demand - self.storage_capacity).max(0);

        let additional_time_shift = (f.earliest_arrival
            - data.latest_arrival_time
            - (f.earliest_arrival - f.latest_arrival).max(0))
        .max(0)
            + (data.latest_arrival_time.min(data.earliest_arrival_time.max(f.earliest_arrival))
                - b.earliest_arrival
                - (b.latest_arrival - b.earliest_arrival).max(0))
            .max(0);

        let junction_charge = if vertex.is_station {
            f.residual_charge_in_time
                .min((b.earliest_arrival - f.earliest_arrival - (f.latest_arrival - b.latest_arrival).max(0)).max(0))
                .min((f.earliest_arrival - b.latest_arrival).max(0))
        } else {
            self.battery_capacity.min(
                (b.earliest_arrival - f.earliest_arrival)
                    .max(0)
                    .min((f.latest_arrival - f.earliest_arrival).max(0) + (b.earliest_arrival - b.latest_arrival).max(0)),
            )
        };

        let additional_overcharge = (f.earliest_arrival - f.latest_arrival).max(0)
            + (f.residual_charge_in_time + b.residual_charge_in_time - self.battery_capacity - junction_charge).max(0);

        let time_shift = fwd.prev_time_shift + b.cum_time_shift + additional_time_shift;
        let overcharge = fwd.prev_overcharge + b.cum_overcharge + additional_overcharge;

        self.cost_of(distance, overload, overcharge, time_shift)
    }
}
