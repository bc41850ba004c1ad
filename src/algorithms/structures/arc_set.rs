#[cfg(test)]
#[path = "../../../tests/unit/algorithms/structures/arc_set_test.rs"]
mod arc_set_test;

use crate::algorithms::structures::BitVec;
use crate::models::problem::VertexId;

/// A compact set over all `N x N` ordered vertex pairs of an instance. Freshly created sets
/// include every arc; individual arcs can be forbidden and re-included in constant time.
/// Used to filter generator arcs during neighborhood exploration.
#[derive(Clone, Debug)]
pub struct ArcSet {
    bits: BitVec,
    number_of_vertices: usize,
}

impl ArcSet {
    /// Creates a new arc set over the given amount of vertices with all arcs included.
    pub fn new(number_of_vertices: usize) -> Self {
        let mut bits = BitVec::new(number_of_vertices * number_of_vertices);
        bits.fill(true);

        Self { bits, number_of_vertices }
    }

    /// Excludes the arc from the set.
    pub fn forbid_arc(&mut self, from: VertexId, to: VertexId) {
        self.bits.set(from * self.number_of_vertices + to, false);
    }

    /// Includes the arc into the set.
    pub fn include_arc(&mut self, from: VertexId, to: VertexId) {
        self.bits.set(from * self.number_of_vertices + to, true);
    }

    /// Checks whether the arc belongs to the set.
    pub fn includes_arc(&self, from: VertexId, to: VertexId) -> bool {
        self.bits.test(from * self.number_of_vertices + to)
    }
}
