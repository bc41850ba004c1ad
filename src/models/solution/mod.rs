//! Solution representation models.

mod node;
pub use self::node::{create_node, create_node_for, Node};

mod route;
pub use self::route::{evaluate_insertion, number_of_nodes_in_route, Route};

#[allow(clippy::module_inception)]
mod solution;
pub use self::solution::{number_of_nodes, NodeLocation, Solution};
