//! This module re-exports commonly used types for a convenient import.

pub use crate::models::problem::{Edge, Instance, InstanceBuilder, UserData, Vertex, VertexId};
pub use crate::models::solution::{
    create_node, evaluate_insertion, number_of_nodes, Node, NodeLocation, Route, Solution,
};

pub use crate::evaluation::{
    AdptwEvaluation, ConcatenationBased, ConcatenationEvaluation, Cost, CvrpEvaluation, Evaluation, ForwardBased,
    LabelHolder, NiftwEvaluation, Resource, RouteSegment, SegmentEvaluation,
};

pub use crate::search::operators::{
    InsertStationOperator, InterRouteTwoOptOperator, RemoveStationOperator, SwapOperator,
};
pub use crate::search::{
    BestImprovement, FirstImprovement, KBestImprovement, LocalSearch, Move, Operator, PivotingRule,
};

pub use crate::frvcp::{AdptwPropagator, Frvcp, Propagator};
pub use crate::lns::{
    AdaptiveLargeNeighborhood, BestInsertion, DestroyOperator, RandomInsertion, RandomRemoval, RepairOperator,
    WorstRemoval,
};

pub use crate::algorithms::structures::ArcSet;
pub use crate::utils::{DefaultRandom, Environment, GenericError, GenericResult, Random};
