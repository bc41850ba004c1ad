//! A label-setting dynamic program which embeds recharging stations into a fixed customer
//! sequence (the fixed-route vehicle charging problem).
//!
//! The DP operates on an expanded graph: the customer skeleton of the input sequence plus one
//! DP vertex per station before every customer, with station-to-station edges within a layer.
//! Labels are allocated from a slab owned by the engine; predecessor links are slab indices
//! and stay valid until the next optimization run.

mod adptw;
pub use self::adptw::{AdptwLabel, AdptwPropagator};

#[cfg(test)]
#[path = "../../tests/unit/frvcp/frvcp_test.rs"]
mod frvcp_test;

use crate::models::problem::{Edge, Instance, Vertex, VertexId};
use std::sync::Arc;

/// An identifier of a vertex in the expanded DP graph.
pub type DpVertexId = usize;

/// A vertex of the expanded DP graph referencing an original instance vertex.
pub struct DpVertex {
    /// The DP vertex id.
    pub id: DpVertexId,
    /// The referenced instance vertex.
    pub vertex: Arc<Vertex>,
}

/// The expanded DP graph: vertices with adjacency lists.
#[derive(Default)]
pub struct DpGraph {
    vertices: Vec<DpVertex>,
    successors: Vec<Vec<DpVertexId>>,
}

impl DpGraph {
    /// Returns the amount of DP vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Checks whether the graph has no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Returns the DP vertex with the given id.
    pub fn vertex(&self, id: DpVertexId) -> &DpVertex {
        &self.vertices[id]
    }

    /// Returns the successor list of the given DP vertex.
    pub fn successors(&self, of: DpVertexId) -> &[DpVertexId] {
        &self.successors[of]
    }

    /// Removes all vertices and edges.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.successors.clear();
    }

    /// Adds a DP vertex referencing the given instance vertex and returns its id.
    pub fn add_vertex(&mut self, vertex: Arc<Vertex>) -> DpVertexId {
        let next_id = self.vertices.len();
        self.vertices.push(DpVertex { id: next_id, vertex });
        self.successors.push(Vec::new());
        next_id
    }

    /// Adds a directed edge between two DP vertices.
    pub fn add_edge(&mut self, from: DpVertexId, to: DpVertexId) {
        self.successors[from].push(to);
    }
}

/// The part of a DP label the engine needs to reconstruct paths: the referenced instance
/// vertex and the predecessor slab slot.
pub trait DpLabel {
    /// Returns the id of the instance vertex the label sits on.
    fn vertex_id(&self) -> VertexId;

    /// Returns the slab slot of the predecessor label, or `None` for the root label.
    fn predecessor(&self) -> Option<usize>;
}

/// The problem-specific part of the DP: label creation, propagation along DP edges, dominance,
/// and the orderings driving extraction.
pub trait Propagator {
    /// The label type of this propagator.
    type Label: DpLabel;

    /// Called once per optimization run with the input sequence.
    fn prepare(&mut self, route: &[VertexId]);

    /// Creates the root label at the start depot.
    fn create_root_label(&self) -> Self::Label;

    /// Propagates a label along a DP edge, or returns `None` when a resource constraint is
    /// violated. `pred_slot` is the slab slot of the predecessor label.
    fn propagate(
        &self,
        pred_label: &Self::Label,
        pred_slot: usize,
        origin: &Vertex,
        target: &Vertex,
        edge: &Edge,
    ) -> Option<Self::Label>;

    /// Returns true if `label` is no worse than `other` in every monitored resource and at
    /// least as cheap.
    fn dominates(&self, label: &Self::Label, other: &Self::Label) -> bool;

    /// The extraction order: true if `label` should be extracted before `other`.
    fn cheaper_than(&self, label: &Self::Label, other: &Self::Label) -> bool;

    /// The settled-bucket order. The dominator scan short-circuits as soon as this ordering
    /// key rules out further dominators.
    fn should_order_before(&self, label: &Self::Label, other: &Self::Label) -> bool;

    /// Returns true if the label completes a path: the depot is reached and the label is not
    /// the root.
    fn is_final_label(&self, label: &Self::Label) -> bool;
}

/// A per-DP-vertex bucket of labels: settled labels kept sorted by the propagator's ordering
/// key and unsettled labels kept in a binary heap under the extraction order. Both store slab
/// slots.
#[derive(Default)]
struct LabelBucket {
    settled: Vec<usize>,
    unsettled: Vec<usize>,
}

impl LabelBucket {
    fn is_empty(&self) -> bool {
        self.unsettled.is_empty()
    }

    fn top(&self) -> usize {
        self.unsettled[0]
    }
}

/// The label-setting DP engine, generic over the problem-supplied [`Propagator`].
pub struct Frvcp<P: Propagator> {
    instance: Arc<Instance>,
    propagator: P,
    graph: DpGraph,
    buckets: Vec<LabelBucket>,
    queue: Vec<DpVertexId>,
    slab: Vec<P::Label>,
}

impl<P: Propagator> Frvcp<P> {
    /// Creates a new instance of `Frvcp`.
    pub fn new(instance: Arc<Instance>, propagator: P) -> Self {
        Self { instance, propagator, graph: DpGraph::default(), buckets: Vec::new(), queue: Vec::new(), slab: Vec::new() }
    }

    /// Discards the state of the previous optimization run.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.buckets.clear();
        self.graph.clear();
        self.slab.clear();
    }

    /// Finds a minimum-cost embedding of station visits into the given customer sequence. The
    /// sequence must start and end at the depot; contained stations are dropped and re-decided.
    /// Returns the input sequence unchanged when no feasible embedding exists.
    pub fn optimize(&mut self, route: &[VertexId]) -> Vec<VertexId> {
        let depot_id = self.instance.depot().id;
        assert!(route.len() >= 2, "a route consists of at least the two depot sentinels");
        assert!(
            route.first() == Some(&depot_id) && route.last() == Some(&depot_id),
            "a route starts and ends at the depot"
        );

        self.propagator.prepare(route);
        self.clear();
        self.build_graph(route);
        self.buckets = (0..self.graph.len()).map(|_| LabelBucket::default()).collect();

        let root_label = self.propagator.create_root_label();
        self.slab.push(root_label);
        bucket_add(&mut self.buckets[0], &self.slab, &self.propagator, 0);
        self.queue.push(0);

        while !self.queue.is_empty() {
            let (label_slot, origin_dp_id) = self.extract_next_label();

            if self.propagator.is_final_label(&self.slab[label_slot]) {
                return self.extract_path(label_slot);
            }

            let origin_vertex = self.graph.vertex(origin_dp_id).vertex.clone();
            let successor_count = self.graph.successors(origin_dp_id).len();
            for successor_index in 0..successor_count {
                let target_dp_id = self.graph.successors(origin_dp_id)[successor_index];
                let target_vertex = self.graph.vertex(target_dp_id).vertex.clone();
                let edge = self.instance.edge(origin_vertex.id, target_vertex.id);

                if let Some(label) =
                    self.propagator.propagate(&self.slab[label_slot], label_slot, &origin_vertex, &target_vertex, edge)
                {
                    let slot = self.slab.len();
                    self.slab.push(label);
                    if bucket_add(&mut self.buckets[target_dp_id], &self.slab, &self.propagator, slot) {
                        queue_update(&mut self.queue, target_dp_id);
                    }
                }
            }
        }

        route.to_vec()
    }

    fn extract_next_label(&mut self) -> (usize, DpVertexId) {
        let Self { propagator, buckets, queue, slab, .. } = self;

        let queue_index = (0..queue.len())
            .min_by(|&a, &b| {
                let a_top = &slab[buckets[queue[a]].top()];
                let b_top = &slab[buckets[queue[b]].top()];
                if propagator.cheaper_than(a_top, b_top) {
                    std::cmp::Ordering::Less
                } else {
                    std::cmp::Ordering::Greater
                }
            })
            .expect("the queue cannot be empty");
        let origin_dp_id = queue.swap_remove(queue_index);

        let label_slot = bucket_extract_cheapest(&mut buckets[origin_dp_id], slab, propagator);

        // Re-insert the vertex into the queue if labels remain.
        if !buckets[origin_dp_id].is_empty() {
            queue_update(queue, origin_dp_id);
        }

        (label_slot, origin_dp_id)
    }

    fn extract_path(&self, sink_slot: usize) -> Vec<VertexId> {
        let mut path = Vec::new();
        let mut next_slot = Some(sink_slot);
        while let Some(slot) = next_slot {
            path.push(self.slab[slot].vertex_id());
            next_slot = self.slab[slot].predecessor();
        }
        path.reverse();
        path
    }

    fn build_graph(&mut self, route: &[VertexId]) {
        let Self { instance, graph, .. } = self;
        assert!(graph.is_empty());

        let mut prev_dp_id = graph.add_vertex(instance.vertex(route[0]).clone());

        for &vertex_id in &route[1..] {
            let vertex = instance.vertex(vertex_id);
            if vertex.is_station {
                continue;
            }

            let customer_dp_id = graph.add_vertex(vertex.clone());
            graph.add_edge(prev_dp_id, customer_dp_id);

            // A full station layer before the customer, interconnected to allow chains.
            let station_layer: Vec<DpVertexId> =
                instance.stations().map(|station| graph.add_vertex(station.clone())).collect();
            for &station_i in &station_layer {
                graph.add_edge(prev_dp_id, station_i);
                graph.add_edge(station_i, customer_dp_id);
                for &station_j in &station_layer {
                    if station_i != station_j {
                        graph.add_edge(station_i, station_j);
                    }
                }
            }

            prev_dp_id = customer_dp_id;
        }
    }
}

/// Scans the settled labels in their established order for a dominator of `label`,
/// short-circuiting as soon as the ordering key rules out further dominators.
fn has_dominator<P: Propagator>(settled: &[usize], slab: &[P::Label], propagator: &P, label: &P::Label) -> bool {
    for &settled_slot in settled {
        if propagator.should_order_before(label, &slab[settled_slot]) {
            return false;
        }
        if propagator.dominates(&slab[settled_slot], label) {
            return true;
        }
    }
    false
}

/// Inserts an unsettled label into the bucket. Dominance is only checked when the label would
/// become the new top: a label buried in the heap is checked once it surfaces.
fn bucket_add<P: Propagator>(bucket: &mut LabelBucket, slab: &[P::Label], propagator: &P, label_slot: usize) -> bool {
    let label = &slab[label_slot];

    let needs_dominance_check = match bucket.unsettled.first() {
        None => true,
        Some(&top_slot) => propagator.cheaper_than(label, &slab[top_slot]),
    };
    if needs_dominance_check && has_dominator(&bucket.settled, slab, propagator, label) {
        return false;
    }

    heap_push(&mut bucket.unsettled, label_slot, |a, b| propagator.cheaper_than(&slab[a], &slab[b]));
    true
}

/// Moves the cheapest unsettled label of the bucket into the settled list and purges newly
/// dominated unsettled tops.
fn bucket_extract_cheapest<P: Propagator>(bucket: &mut LabelBucket, slab: &[P::Label], propagator: &P) -> usize {
    let extracted_slot = heap_pop(&mut bucket.unsettled, |a, b| propagator.cheaper_than(&slab[a], &slab[b]))
        .expect("cannot extract from an empty bucket");

    let insertion_point = bucket
        .settled
        .partition_point(|&settled_slot| !propagator.should_order_before(&slab[extracted_slot], &slab[settled_slot]));
    bucket.settled.insert(insertion_point, extracted_slot);

    // The new top may be dominated by an already settled label.
    while let Some(&top_slot) = bucket.unsettled.first() {
        if has_dominator(&bucket.settled, slab, propagator, &slab[top_slot]) {
            heap_pop(&mut bucket.unsettled, |a, b| propagator.cheaper_than(&slab[a], &slab[b]));
        } else {
            break;
        }
    }

    extracted_slot
}

fn queue_update(queue: &mut Vec<DpVertexId>, vertex_id: DpVertexId) {
    if !queue.contains(&vertex_id) {
        queue.push(vertex_id);
    }
}

fn heap_push(heap: &mut Vec<usize>, value: usize, less: impl Fn(usize, usize) -> bool) {
    heap.push(value);
    let mut child = heap.len() - 1;
    while child > 0 {
        let parent = (child - 1) / 2;
        if less(heap[child], heap[parent]) {
            heap.swap(child, parent);
            child = parent;
        } else {
            break;
        }
    }
}

fn heap_pop(heap: &mut Vec<usize>, less: impl Fn(usize, usize) -> bool) -> Option<usize> {
    if heap.is_empty() {
        return None;
    }

    let last = heap.len() - 1;
    heap.swap(0, last);
    let top = heap.pop();

    let mut parent = 0;
    loop {
        let left = 2 * parent + 1;
        let right = left + 1;
        let mut smallest = parent;
        if left < heap.len() && less(heap[left], heap[smallest]) {
            smallest = left;
        }
        if right < heap.len() && less(heap[right], heap[smallest]) {
            smallest = right;
        }
        if smallest == parent {
            break;
        }
        heap.swap(parent, smallest);
        parent = smallest;
    }

    top
}
