#[cfg(test)]
#[path = "../../tests/unit/frvcp/adptw_test.rs"]
mod adptw_test;

use crate::algorithms::structures::BitVec;
use crate::evaluation::{AdptwEdgeData, AdptwVertexData, Resource};
use crate::frvcp::{DpLabel, Propagator};
use crate::models::problem::{Edge, Instance, Vertex, VertexId};
use std::sync::Arc;

/// A DP label of the ADPTW station-insertion problem. Tracks visited vertices to forbid
/// cycles, the reachable arrival-time interval, and the residual charge expressed in time.
#[derive(Clone, Debug)]
pub struct AdptwLabel {
    visited_vertices: BitVec,
    predecessor: Option<usize>,
    vertex_id: VertexId,
    /// Accumulated edge cost.
    pub cost: Resource,
    /// Earliest possible arrival time.
    pub t_min: Resource,
    /// Latest useful arrival time.
    pub t_max: Resource,
    /// Maximum residual charge, expressed in recharge time.
    pub rt_max: Resource,
    /// Amount of station visits along the path.
    pub num_stations: usize,
}

impl AdptwLabel {
    fn new(number_of_vertices: usize) -> Self {
        Self {
            visited_vertices: BitVec::new(number_of_vertices),
            predecessor: None,
            vertex_id: 0,
            cost: 0,
            t_min: 0,
            t_max: 0,
            rt_max: 0,
            num_stations: 0,
        }
    }

    fn extended(&self, pred_slot: usize, vertex_id: VertexId) -> Self {
        Self {
            visited_vertices: self.visited_vertices.clone(),
            predecessor: Some(pred_slot),
            vertex_id,
            cost: self.cost,
            t_min: self.t_min,
            t_max: self.t_max,
            rt_max: self.rt_max,
            num_stations: self.num_stations,
        }
    }

    /// Returns true if the given vertex was visited since the last customer.
    pub fn visited(&self, vertex_id: VertexId) -> bool {
        self.visited_vertices.test(vertex_id)
    }

    /// Returns true if any station was visited along the path.
    pub fn visited_station(&self) -> bool {
        self.num_stations > 0
    }

    fn clear_visits(&mut self) {
        self.visited_vertices.reset();
    }

    fn visit_vertex(&mut self, vertex_id: VertexId, is_station: bool) {
        self.visited_vertices.set(vertex_id, true);
        self.num_stations += usize::from(is_station);
    }
}

impl DpLabel for AdptwLabel {
    fn vertex_id(&self) -> VertexId {
        self.vertex_id
    }

    fn predecessor(&self) -> Option<usize> {
        self.predecessor
    }
}

/// The ADPTW propagator of the station-insertion DP.
pub struct AdptwPropagator {
    instance: Arc<Instance>,
    battery_capacity: Resource,
}

impl AdptwPropagator {
    /// Creates a new instance of `AdptwPropagator`.
    pub fn new(instance: Arc<Instance>, battery_capacity: Resource) -> Self {
        Self { instance, battery_capacity }
    }
}

impl Propagator for AdptwPropagator {
    type Label = AdptwLabel;

    fn prepare(&mut self, _route: &[VertexId]) {}

    fn create_root_label(&self) -> Self::Label {
        AdptwLabel::new(self.instance.number_of_vertices())
    }

    fn propagate(
        &self,
        pred_label: &Self::Label,
        pred_slot: usize,
        origin: &Vertex,
        target: &Vertex,
        edge: &Edge,
    ) -> Option<Self::Label> {
        let origin_data = origin.data::<AdptwVertexData>();
        let target_data = target.data::<AdptwVertexData>();
        let edge_data = edge.data::<AdptwEdgeData>();

        let battery_capacity = self.battery_capacity;
        let e_j = target_data.earliest_arrival_time;
        let l_j = target_data.latest_arrival_time;
        let t_ij = edge_data.duration + origin_data.service_time;
        let q_ij = edge_data.consumption;

        // Avoid cycling.
        if pred_label.visited(target.id) {
            return None;
        }

        let mut label = pred_label.extended(pred_slot, target.id);

        // Reset visited stations when reaching a customer.
        if target.is_customer() {
            label.clear_visits();
        }
        label.visit_vertex(target.id, target.is_station);

        label.cost += edge_data.cost;

        let slack;
        if origin.is_station {
            slack = (e_j - (pred_label.t_min + t_ij)).min(pred_label.rt_max).max(0);
            label.t_max = l_j.min(e_j.max(pred_label.t_min + pred_label.rt_max + t_ij));
        } else {
            slack = (e_j - (pred_label.t_min + t_ij)).min(pred_label.t_max - pred_label.t_min).max(0);
            label.t_max = l_j.min(e_j.max(pred_label.t_max + t_ij));
        }

        if !pred_label.visited_station() {
            label.t_min = e_j.max(pred_label.t_min + t_ij);
            label.rt_max = pred_label.rt_max + q_ij;
        } else {
            let recharge_delay = ((pred_label.rt_max - slack).max(0) + q_ij - battery_capacity).max(0);
            label.t_min = e_j.max(pred_label.t_min + t_ij) + recharge_delay;
            label.rt_max = battery_capacity.min((pred_label.rt_max + slack + q_ij).max(0));
        }

        if label.t_min > l_j || label.t_min > label.t_max || label.rt_max > battery_capacity {
            return None;
        }

        Some(label)
    }

    fn dominates(&self, label: &Self::Label, other: &Self::Label) -> bool {
        label.cost <= other.cost
            && label.t_min <= other.t_min
            && label.rt_max - (label.t_max - label.t_min) <= other.rt_max - (other.t_max - other.t_min)
            && label.rt_max + label.t_min <= other.rt_max + other.t_min
    }

    fn cheaper_than(&self, label: &Self::Label, other: &Self::Label) -> bool {
        if label.cost == other.cost {
            return label.num_stations < other.num_stations;
        }
        label.cost < other.cost
    }

    fn should_order_before(&self, label: &Self::Label, other: &Self::Label) -> bool {
        label.t_min < other.t_min
    }

    fn is_final_label(&self, label: &Self::Label) -> bool {
        label.vertex_id == self.instance.depot().id && label.predecessor.is_some()
    }
}
