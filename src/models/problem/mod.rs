//! Problem definition models.

mod builder;
pub use self::builder::InstanceBuilder;

#[cfg(test)]
#[path = "../../../tests/unit/models/problem/instance_test.rs"]
mod instance_test;

use crate::utils::{GenericError, GenericResult};
use std::any::Any;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// A dense vertex identifier, unique and contiguous within an instance.
pub type VertexId = usize;

/// An opaque, problem-specific payload attached to vertices and edges. Concrete evaluation
/// functions downcast it to their own data types.
pub type UserData = Arc<dyn Any + Send + Sync>;

/// An addressable point in the problem graph: the depot, a customer, or a recharging station.
/// Constructed with the instance and immutable thereafter.
#[derive(Clone)]
pub struct Vertex {
    /// A dense vertex id.
    pub id: VertexId,
    /// A human readable vertex id.
    pub str_id: String,
    /// True if the vertex is a recharging station.
    pub is_station: bool,
    /// True if the vertex is the depot.
    pub is_depot: bool,
    data: UserData,
}

impl Vertex {
    /// Creates a new vertex.
    pub fn new(id: VertexId, str_id: String, is_station: bool, is_depot: bool, data: UserData) -> Self {
        assert!(!(is_station && is_depot), "a vertex cannot be both depot and station");
        Self { id, str_id, is_station, is_depot, data }
    }

    /// True if the vertex is neither the depot nor a station.
    pub fn is_customer(&self) -> bool {
        !self.is_station && !self.is_depot
    }

    /// Returns the payload downcast to the requested type.
    pub fn data<T: Any>(&self) -> &T {
        self.data.downcast_ref::<T>().expect("vertex payload type mismatch")
    }
}

impl Debug for Vertex {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vertex")
            .field("id", &self.id)
            .field("str_id", &self.str_id)
            .field("is_station", &self.is_station)
            .field("is_depot", &self.is_depot)
            .finish_non_exhaustive()
    }
}

/// A directed relationship between an ordered pair of vertices. Carries an opaque
/// problem-specific payload, e.g. distance, travel time and energy consumption.
#[derive(Clone)]
pub struct Edge {
    data: UserData,
}

impl Edge {
    /// Creates a new edge with the given payload.
    pub fn new(data: UserData) -> Self {
        Self { data }
    }

    /// Returns the payload downcast to the requested type.
    pub fn data<T: Any>(&self) -> &T {
        self.data.downcast_ref::<T>().expect("edge payload type mismatch")
    }
}

/// Owns all vertices and the full `N x N` edge table of a problem. Vertices are laid out as
/// `[depot, customer_1, .., customer_n, station_1, .., station_m]` with contiguous ids.
/// Immutable after construction.
pub struct Instance {
    vertices: Vec<Arc<Vertex>>,
    edges: Vec<Edge>,
    number_of_customers: usize,
    number_of_stations: usize,
    fleet_size: usize,
}

impl Instance {
    /// Creates a new instance from vertices laid out as depot, customers, stations, a complete
    /// `N x N` edge table (row-major, `edges[i][j]` describes the arc from `i` to `j`) and a
    /// fleet size. Returns an error when the layout or the table shape is violated.
    pub fn new(vertices: Vec<Vertex>, edges: Vec<Vec<Edge>>, fleet_size: usize) -> GenericResult<Self> {
        if vertices.is_empty() {
            return Err("an instance requires at least a depot vertex".into())
        }

        if fleet_size == 0 {
            return Err("fleet size must be greater than 0".into())
        }

        let depot = &vertices[0];
        if !depot.is_depot || depot.id != 0 {
            return Err("depot is not the first vertex".into())
        }

        let mut next_vertex_id = 1;
        while next_vertex_id < vertices.len() && !vertices[next_vertex_id].is_station {
            let vertex = &vertices[next_vertex_id];
            if vertex.is_depot || vertex.id != next_vertex_id {
                return Err(GenericError::from(format!(
                    "wrong vertex ordering: expected customer with id {next_vertex_id}, got '{}'",
                    vertex.str_id
                )))
            }
            next_vertex_id += 1;
        }

        let number_of_customers = next_vertex_id - 1;

        for vertex in vertices.iter().skip(next_vertex_id) {
            if !vertex.is_station || vertex.id != next_vertex_id {
                return Err(GenericError::from(format!(
                    "wrong vertex ordering: expected station with id {next_vertex_id}, got '{}'",
                    vertex.str_id
                )))
            }
            next_vertex_id += 1;
        }

        let number_of_stations = vertices.len() - 1 - number_of_customers;

        let dimension = vertices.len();
        if edges.len() != dimension || edges.iter().any(|row| row.len() != dimension) {
            return Err(GenericError::from(format!("edge table must have shape {dimension}x{dimension}")))
        }

        Ok(Self {
            vertices: vertices.into_iter().map(Arc::new).collect(),
            edges: edges.into_iter().flatten().collect(),
            number_of_customers,
            number_of_stations,
            fleet_size,
        })
    }

    /// Returns the vertex with the given id.
    pub fn vertex(&self, id: VertexId) -> &Arc<Vertex> {
        &self.vertices[id]
    }

    /// Returns the customer with the given zero-based customer index.
    pub fn customer(&self, index: usize) -> &Arc<Vertex> {
        assert!(index < self.number_of_customers);
        &self.vertices[1 + index]
    }

    /// Returns the station with the given zero-based station index.
    pub fn station(&self, index: usize) -> &Arc<Vertex> {
        assert!(index < self.number_of_stations);
        &self.vertices[1 + self.number_of_customers + index]
    }

    /// Returns the edge from vertex `i` to vertex `j`.
    pub fn edge(&self, i: VertexId, j: VertexId) -> &Edge {
        &self.edges[i * self.vertices.len() + j]
    }

    /// Returns the depot vertex.
    pub fn depot(&self) -> &Arc<Vertex> {
        &self.vertices[0]
    }

    /// Returns the total amount of vertices.
    pub fn number_of_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the amount of customers.
    pub fn number_of_customers(&self) -> usize {
        self.number_of_customers
    }

    /// Returns the amount of stations.
    pub fn number_of_stations(&self) -> usize {
        self.number_of_stations
    }

    /// Returns the fleet size.
    pub fn fleet_size(&self) -> usize {
        self.fleet_size
    }

    /// Iterates over customer vertices.
    pub fn customers(&self) -> impl Iterator<Item = &Arc<Vertex>> + '_ {
        self.vertices.iter().skip(1).take(self.number_of_customers)
    }

    /// Iterates over station vertices.
    pub fn stations(&self) -> impl Iterator<Item = &Arc<Vertex>> + '_ {
        self.vertices.iter().skip(1 + self.number_of_customers)
    }

    /// Iterates over all vertices.
    pub fn vertices(&self) -> impl Iterator<Item = &Arc<Vertex>> + '_ {
        self.vertices.iter()
    }
}
