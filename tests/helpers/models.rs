use crate::evaluation::{
    AdptwEdgeData, AdptwEvaluation, AdptwVertexData, ConcatenationBased, CvrpEdgeData, CvrpEvaluation, CvrpVertexData,
    Evaluation, Resource,
};
use crate::models::problem::{Edge, Instance, Vertex, VertexId};
use crate::models::solution::{Route, Solution};
use std::sync::Arc;

/// Creates an instance with a depot and customers only, `demands[0]` belonging to the depot.
pub fn create_cvrp_instance(demands: &[Resource], distances: &[&[Resource]], fleet_size: usize) -> Arc<Instance> {
    let vertices = demands
        .iter()
        .enumerate()
        .map(|(id, &demand)| Vertex::new(id, format!("v{id}"), false, id == 0, Arc::new(CvrpVertexData { demand })))
        .collect();
    let edges = distances
        .iter()
        .map(|row| row.iter().map(|&distance| Edge::new(Arc::new(CvrpEdgeData { distance }))).collect())
        .collect();

    Arc::new(Instance::new(vertices, edges, fleet_size).unwrap())
}

/// Creates a concatenation based capacitated evaluation.
pub fn create_cvrp_evaluation(storage_capacity: Resource) -> Arc<dyn Evaluation> {
    Arc::new(ConcatenationBased::new(CvrpEvaluation::new(storage_capacity)))
}

/// Vertex attributes of the electric time-window fixtures.
pub struct AdptwVertexSpec {
    /// Demand collected at the vertex.
    pub demand: Resource,
    /// Opening of the arrival time window.
    pub earliest: Resource,
    /// Closing of the arrival time window.
    pub latest: Resource,
    /// Service duration at the vertex.
    pub service: Resource,
}

impl AdptwVertexSpec {
    /// A customer with a wide time window and no service time.
    pub fn relaxed() -> Self {
        Self { demand: 0, earliest: 0, latest: 10_000, service: 0 }
    }
}

/// Creates an instance whose last `number_of_stations` vertices are stations. Edge cost and
/// duration both equal the distance; consumption is the distance scaled by
/// `consumption_factor`.
pub fn create_adptw_instance(
    specs: &[AdptwVertexSpec],
    number_of_stations: usize,
    distances: &[&[Resource]],
    consumption_factor: Resource,
    fleet_size: usize,
) -> Arc<Instance> {
    let first_station = specs.len() - number_of_stations;
    let vertices = specs
        .iter()
        .enumerate()
        .map(|(id, spec)| {
            Vertex::new(
                id,
                format!("v{id}"),
                id >= first_station,
                id == 0,
                Arc::new(AdptwVertexData {
                    x_coord: 0.,
                    y_coord: 0.,
                    demand: spec.demand,
                    earliest_arrival_time: spec.earliest,
                    latest_arrival_time: spec.latest,
                    service_time: spec.service,
                }),
            )
        })
        .collect();
    let edges = distances
        .iter()
        .map(|row| {
            row.iter()
                .map(|&distance| {
                    Edge::new(Arc::new(AdptwEdgeData {
                        cost: distance,
                        consumption: distance * consumption_factor,
                        duration: distance,
                    }))
                })
                .collect()
        })
        .collect();

    Arc::new(Instance::new(vertices, edges, fleet_size).unwrap())
}

/// Creates a concatenation based electric time-window evaluation.
pub fn create_adptw_evaluation(battery_capacity: Resource, storage_capacity: Resource) -> Arc<dyn Evaluation> {
    Arc::new(ConcatenationBased::new(AdptwEvaluation::new(battery_capacity, storage_capacity)))
}

/// Creates a solution visiting the given vertex sequences, one route per sequence.
pub fn create_solution(evaluation: Arc<dyn Evaluation>, instance: Arc<Instance>, routes: &[&[VertexId]]) -> Solution {
    let routes = routes
        .iter()
        .map(|vertices| Route::new_with_vertices(evaluation.clone(), instance.clone(), vertices))
        .collect();
    Solution::new_with_routes(evaluation, instance, routes)
}

/// Returns the vertex id sequences of all routes including the depot sentinels.
pub fn route_vertex_ids(solution: &Solution) -> Vec<Vec<VertexId>> {
    solution.routes().iter().map(|route| route.vertex_ids()).collect()
}
