//! The evaluation kernel: resource labels, their propagation along routes, and pricing of
//! arbitrary segment concatenations.
//!
//! Concrete cost functions implement the typed [`SegmentEvaluation`] trait (or
//! [`ConcatenationEvaluation`] when a closed-form junction formula exists) and are erased into
//! the object-safe [`Evaluation`] trait through the [`ConcatenationBased`] or [`ForwardBased`]
//! adapters. Routes and solutions only ever see [`Evaluation`] and [`LabelHolder`] values, so
//! the search engine stays independent of any concrete VRP variant.

mod adptw;
pub use self::adptw::{AdptwBackwardLabel, AdptwEdgeData, AdptwEvaluation, AdptwForwardLabel, AdptwVertexData};

mod cvrp;
pub use self::cvrp::{CvrpEdgeData, CvrpEvaluation, CvrpLabel, CvrpVertexData};

mod niftw;
pub use self::niftw::{NiftwBackwardLabel, NiftwEdgeData, NiftwEvaluation, NiftwForwardLabel, NiftwVertexData};

#[cfg(test)]
#[path = "../../tests/unit/evaluation/evaluation_test.rs"]
mod evaluation_test;

use crate::models::problem::{Edge, Instance, Vertex};
use crate::models::solution::Node;
use std::any::Any;
use std::sync::Arc;

/// Represents a cost value: distance plus weighted penalties.
pub type Cost = f64;

/// Represents a single resource dimension value, e.g. distance, load, or a time shift.
pub type Resource = i64;

/// A type-erased resource label attached to a node. Labels are immutable values; propagation
/// produces new labels.
#[derive(Clone)]
pub struct LabelHolder(Arc<dyn Any + Send + Sync>);

impl LabelHolder {
    /// Wraps a concrete label.
    pub fn new<T: Any + Send + Sync>(label: T) -> Self {
        Self(Arc::new(label))
    }

    /// Returns the label downcast to the requested type.
    pub fn get<T: Any>(&self) -> &T {
        self.0.downcast_ref::<T>().expect("label type mismatch")
    }
}

/// A contiguous slice of nodes within a single route, carrying valid labels at its boundaries.
pub type RouteSegment<'a> = &'a [Node];

/// An evaluation function polymorphic over two opaque label types. Prices the cost and
/// feasibility of routes and of arbitrary concatenations of route segments.
pub trait Evaluation {
    /// Creates the initial forward label at a route start.
    fn create_forward_label(&self, vertex: &Vertex) -> LabelHolder;

    /// Creates the initial backward label at a route end.
    fn create_backward_label(&self, vertex: &Vertex) -> LabelHolder;

    /// Produces the forward label at `vertex` given its predecessor's forward label.
    fn propagate_forward(&self, pred_label: &LabelHolder, pred_vertex: &Vertex, vertex: &Vertex, edge: &Edge)
        -> LabelHolder;

    /// Produces the backward label at `vertex` given its successor's backward label.
    fn propagate_backward(&self, succ_label: &LabelHolder, succ_vertex: &Vertex, vertex: &Vertex, edge: &Edge)
        -> LabelHolder;

    /// Returns the realized cost at a forward label.
    fn compute_cost(&self, label: &LabelHolder) -> Cost;

    /// Returns true iff no penalty component of the label is non-zero.
    fn is_feasible(&self, label: &LabelHolder) -> bool;

    /// Returns the per-dimension cost breakdown of a forward label.
    fn cost_components(&self, label: &LabelHolder) -> Vec<Resource>;

    /// Prices the route formed by concatenating the given segments end to end. Requires at
    /// least two segments; the first and the last segment must be non-empty, interior segments
    /// may be empty.
    fn evaluate(&self, instance: &Instance, segments: &[RouteSegment]) -> Cost;
}

/// A typed evaluation function: resource labels, their propagation semantics, and the realized
/// cost of a forward label. Vertex and edge payloads are downcast to the associated data types.
pub trait SegmentEvaluation: Send + Sync {
    /// A problem specific forward label.
    type FwdLabel: Any + Send + Sync;
    /// A problem specific backward label.
    type BwdLabel: Any + Send + Sync;
    /// A problem specific vertex payload.
    type VertexData: Any + Send + Sync;
    /// A problem specific edge payload.
    type EdgeData: Any + Send + Sync;

    /// Creates the initial forward label, typically encoding zero accumulated resources.
    fn create_forward_label(&self, vertex: &Vertex, data: &Self::VertexData) -> Self::FwdLabel;

    /// Creates the initial backward label.
    fn create_backward_label(&self, vertex: &Vertex, data: &Self::VertexData) -> Self::BwdLabel;

    /// Propagates a forward label along the edge from `pred_vertex` to `vertex`.
    #[allow(clippy::too_many_arguments)]
    fn propagate_forward(
        &self,
        pred_label: &Self::FwdLabel,
        pred_vertex: &Vertex,
        pred_data: &Self::VertexData,
        vertex: &Vertex,
        data: &Self::VertexData,
        edge: &Self::EdgeData,
    ) -> Self::FwdLabel;

    /// Propagates a backward label along the edge from `vertex` to `succ_vertex`.
    #[allow(clippy::too_many_arguments)]
    fn propagate_backward(
        &self,
        succ_label: &Self::BwdLabel,
        succ_vertex: &Vertex,
        succ_data: &Self::VertexData,
        vertex: &Vertex,
        data: &Self::VertexData,
        edge: &Self::EdgeData,
    ) -> Self::BwdLabel;

    /// Returns the realized cost at a forward label.
    fn compute_cost(&self, label: &Self::FwdLabel) -> Cost;

    /// Returns true iff no penalty component of the label is non-zero.
    fn is_feasible(&self, label: &Self::FwdLabel) -> bool;

    /// Returns the per-dimension cost breakdown.
    fn cost_components(&self, label: &Self::FwdLabel) -> Vec<Resource>;
}

/// A typed evaluation function which additionally provides 2EVAL: a closed-form formula for the
/// cost of joining a forward and a backward label at a junction vertex (cf. Vidal 2014,
/// <https://doi.org/10.1016/j.ejor.2013.09.045>).
pub trait ConcatenationEvaluation: SegmentEvaluation {
    /// Returns the cost of the route obtained by gluing the prefix priced by `fwd` to the
    /// suffix priced by `bwd` at the given junction vertex.
    fn concatenate(&self, fwd: &Self::FwdLabel, bwd: &Self::BwdLabel, vertex: &Vertex, data: &Self::VertexData)
        -> Cost;
}

/// Erases a [`ConcatenationEvaluation`] into the object-safe [`Evaluation`] trait. The default
/// `evaluate` propagates a forward label across all but the last segment and then applies the
/// junction formula with the backward label at the first node of the final segment, which
/// prices a concatenation in time proportional to the interior segment lengths only.
pub struct ConcatenationBased<T>(T);

/// Erases a [`SegmentEvaluation`] into [`Evaluation`] for cost functions without a closed-form
/// junction formula. `evaluate` propagates a forward label across the entire concatenation.
pub struct ForwardBased<T>(T);

impl<T> ConcatenationBased<T> {
    /// Wraps the given typed evaluation function.
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    /// Returns a reference to the wrapped evaluation function.
    pub fn inner(&self) -> &T {
        &self.0
    }

    /// Returns a mutable reference to the wrapped evaluation function.
    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

impl<T> ForwardBased<T> {
    /// Wraps the given typed evaluation function.
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    /// Returns a reference to the wrapped evaluation function.
    pub fn inner(&self) -> &T {
        &self.0
    }

    /// Returns a mutable reference to the wrapped evaluation function.
    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

fn propagate_forward_typed<T: SegmentEvaluation>(
    inner: &T,
    pred_label: &LabelHolder,
    pred_vertex: &Vertex,
    vertex: &Vertex,
    edge: &Edge,
) -> LabelHolder {
    LabelHolder::new(inner.propagate_forward(
        pred_label.get::<T::FwdLabel>(),
        pred_vertex,
        pred_vertex.data::<T::VertexData>(),
        vertex,
        vertex.data::<T::VertexData>(),
        edge.data::<T::EdgeData>(),
    ))
}

fn propagate_backward_typed<T: SegmentEvaluation>(
    inner: &T,
    succ_label: &LabelHolder,
    succ_vertex: &Vertex,
    vertex: &Vertex,
    edge: &Edge,
) -> LabelHolder {
    LabelHolder::new(inner.propagate_backward(
        succ_label.get::<T::BwdLabel>(),
        succ_vertex,
        succ_vertex.data::<T::VertexData>(),
        vertex,
        vertex.data::<T::VertexData>(),
        edge.data::<T::EdgeData>(),
    ))
}

/// Propagates the forward label of the first segment's last node across the interior segments,
/// returning the label at the last visited node together with that node's index pair.
fn propagate_across<'a>(
    evaluation: &dyn Evaluation,
    instance: &Instance,
    segments: &[RouteSegment<'a>],
) -> (LabelHolder, &'a Node) {
    let mut pred_node = segments[0].last().expect("the first segment must not be empty");
    let mut fwd_label = pred_node.forward_label().clone();

    for segment in &segments[1..segments.len() - 1] {
        for next_node in segment.iter() {
            fwd_label = evaluation.propagate_forward(
                &fwd_label,
                pred_node.vertex(),
                next_node.vertex(),
                instance.edge(pred_node.vertex_id(), next_node.vertex_id()),
            );
            pred_node = next_node;
        }
    }

    (fwd_label, pred_node)
}

impl<T: ConcatenationEvaluation> Evaluation for ConcatenationBased<T> {
    fn create_forward_label(&self, vertex: &Vertex) -> LabelHolder {
        LabelHolder::new(self.0.create_forward_label(vertex, vertex.data::<T::VertexData>()))
    }

    fn create_backward_label(&self, vertex: &Vertex) -> LabelHolder {
        LabelHolder::new(self.0.create_backward_label(vertex, vertex.data::<T::VertexData>()))
    }

    fn propagate_forward(
        &self,
        pred_label: &LabelHolder,
        pred_vertex: &Vertex,
        vertex: &Vertex,
        edge: &Edge,
    ) -> LabelHolder {
        propagate_forward_typed(&self.0, pred_label, pred_vertex, vertex, edge)
    }

    fn propagate_backward(
        &self,
        succ_label: &LabelHolder,
        succ_vertex: &Vertex,
        vertex: &Vertex,
        edge: &Edge,
    ) -> LabelHolder {
        propagate_backward_typed(&self.0, succ_label, succ_vertex, vertex, edge)
    }

    fn compute_cost(&self, label: &LabelHolder) -> Cost {
        self.0.compute_cost(label.get::<T::FwdLabel>())
    }

    fn is_feasible(&self, label: &LabelHolder) -> bool {
        self.0.is_feasible(label.get::<T::FwdLabel>())
    }

    fn cost_components(&self, label: &LabelHolder) -> Vec<Resource> {
        self.0.cost_components(label.get::<T::FwdLabel>())
    }

    fn evaluate(&self, instance: &Instance, segments: &[RouteSegment]) -> Cost {
        assert!(segments.len() >= 2, "concatenation requires at least two segments");

        let (fwd_label, pred_node) = propagate_across(self, instance, segments);

        let junction = segments.last().unwrap().first().expect("the last segment must not be empty");
        let fwd_label = self.propagate_forward(
            &fwd_label,
            pred_node.vertex(),
            junction.vertex(),
            instance.edge(pred_node.vertex_id(), junction.vertex_id()),
        );

        self.0.concatenate(
            fwd_label.get::<T::FwdLabel>(),
            junction.backward_label().get::<T::BwdLabel>(),
            junction.vertex(),
            junction.vertex().data::<T::VertexData>(),
        )
    }
}

impl<T: SegmentEvaluation> Evaluation for ForwardBased<T> {
    fn create_forward_label(&self, vertex: &Vertex) -> LabelHolder {
        LabelHolder::new(self.0.create_forward_label(vertex, vertex.data::<T::VertexData>()))
    }

    fn create_backward_label(&self, vertex: &Vertex) -> LabelHolder {
        LabelHolder::new(self.0.create_backward_label(vertex, vertex.data::<T::VertexData>()))
    }

    fn propagate_forward(
        &self,
        pred_label: &LabelHolder,
        pred_vertex: &Vertex,
        vertex: &Vertex,
        edge: &Edge,
    ) -> LabelHolder {
        propagate_forward_typed(&self.0, pred_label, pred_vertex, vertex, edge)
    }

    fn propagate_backward(
        &self,
        succ_label: &LabelHolder,
        succ_vertex: &Vertex,
        vertex: &Vertex,
        edge: &Edge,
    ) -> LabelHolder {
        propagate_backward_typed(&self.0, succ_label, succ_vertex, vertex, edge)
    }

    fn compute_cost(&self, label: &LabelHolder) -> Cost {
        self.0.compute_cost(label.get::<T::FwdLabel>())
    }

    fn is_feasible(&self, label: &LabelHolder) -> bool {
        self.0.is_feasible(label.get::<T::FwdLabel>())
    }

    fn cost_components(&self, label: &LabelHolder) -> Vec<Resource> {
        self.0.cost_components(label.get::<T::FwdLabel>())
    }

    fn evaluate(&self, instance: &Instance, segments: &[RouteSegment]) -> Cost {
        assert!(segments.len() >= 2, "concatenation requires at least two segments");

        let mut pred_node = segments[0].last().expect("the first segment must not be empty");
        let mut fwd_label = pred_node.forward_label().clone();

        for segment in &segments[1..] {
            for next_node in segment.iter() {
                fwd_label = self.propagate_forward(
                    &fwd_label,
                    pred_node.vertex(),
                    next_node.vertex(),
                    instance.edge(pred_node.vertex_id(), next_node.vertex_id()),
                );
                pred_node = next_node;
            }
        }

        self.compute_cost(&fwd_label)
    }
}
