#[cfg(test)]
#[path = "../../../tests/unit/models/problem/builder_test.rs"]
mod builder_test;

use crate::models::problem::{Edge, Instance, UserData, Vertex};
use crate::utils::{GenericError, GenericResult};
use hashbrown::HashMap;

/// Assembles an [`Instance`] from separately supplied depot, customers and stations. The builder
/// assigns dense ids in the required depot-customers-stations order and checks that an edge
/// payload is registered for every ordered vertex pair.
#[derive(Default)]
pub struct InstanceBuilder {
    depot: Option<(String, UserData)>,
    duplicate_depot: bool,
    customers: Vec<(String, UserData)>,
    stations: Vec<(String, UserData)>,
    edges: HashMap<(String, String), UserData>,
    fleet_size: usize,
}

impl InstanceBuilder {
    /// Creates a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the depot vertex. Fails on build when called twice.
    pub fn set_depot(&mut self, str_id: &str, data: UserData) -> &mut Self {
        self.duplicate_depot |= self.depot.is_some();
        self.depot = Some((str_id.to_string(), data));
        self
    }

    /// Adds a customer vertex.
    pub fn add_customer(&mut self, str_id: &str, data: UserData) -> &mut Self {
        self.customers.push((str_id.to_string(), data));
        self
    }

    /// Adds a station vertex.
    pub fn add_station(&mut self, str_id: &str, data: UserData) -> &mut Self {
        self.stations.push((str_id.to_string(), data));
        self
    }

    /// Registers the payload of the directed edge between two vertices addressed by name.
    pub fn add_edge(&mut self, from: &str, to: &str, data: UserData) -> &mut Self {
        self.edges.insert((from.to_string(), to.to_string()), data);
        self
    }

    /// Sets the fleet size.
    pub fn set_fleet_size(&mut self, fleet_size: usize) -> &mut Self {
        self.fleet_size = fleet_size;
        self
    }

    /// Removes all collected data from the builder.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Builds the instance.
    pub fn build(&self) -> GenericResult<Instance> {
        let (depot_id, depot_data) = self.depot.as_ref().ok_or(GenericError::from("instance requires a depot"))?;
        if self.duplicate_depot {
            return Err("instance already has a depot".into());
        }
        if self.customers.is_empty() {
            return Err("instance requires at least one customer".into());
        }

        let mut vertices = vec![Vertex::new(0, depot_id.clone(), false, true, depot_data.clone())];
        vertices.extend(
            self.customers
                .iter()
                .enumerate()
                .map(|(index, (str_id, data))| Vertex::new(1 + index, str_id.clone(), false, false, data.clone())),
        );
        let station_offset = vertices.len();
        vertices.extend(self.stations.iter().enumerate().map(|(index, (str_id, data))| {
            Vertex::new(station_offset + index, str_id.clone(), true, false, data.clone())
        }));

        let edges = vertices
            .iter()
            .map(|origin| {
                vertices
                    .iter()
                    .map(|destination| {
                        self.edges
                            .get(&(origin.str_id.clone(), destination.str_id.clone()))
                            .map(|data| Edge::new(data.clone()))
                            .ok_or_else(|| {
                                GenericError::from(format!(
                                    "instance requires an edge between '{}' and '{}'",
                                    origin.str_id, destination.str_id
                                ))
                            })
                    })
                    .collect::<GenericResult<Vec<_>>>()
            })
            .collect::<GenericResult<Vec<_>>>()?;

        Instance::new(vertices, edges, self.fleet_size)
    }
}
