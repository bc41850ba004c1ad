//! This crate contains the core building blocks for constructing heuristics and metaheuristics
//! to solve rich [`Vehicle Routing Problems`](https://en.wikipedia.org/wiki/Vehicle_routing_problem).
//!
//! # Key points
//!
//! The crate does not commit to a concrete VRP variant. Instead, it defines a small set of domain
//! models (instance, route, solution) together with an evaluation interface which prices the
//! concatenation of route segments in amortized constant time. Everything else - neighborhood
//! search, adaptive large neighborhood search, station insertion - is expressed on top of that
//! interface, so the same engine solves capacitated, time-windowed and electric variants by
//! swapping the evaluation function.
//!
//! # Modeling
//!
//! Model definitions are split into two groups:
//!
//! - [`models::problem`] contains problem definition models: vertex, edge, instance
//! - [`models::solution`] contains models which represent a solution: node, route, solution
//!
//! # Evaluation
//!
//! The [`evaluation`] module defines the label propagation and concatenation interfaces together
//! with reference implementations for capacitated (CVRP), time-windowed electric (ADPTW), and
//! full-recharge time-windowed (NIFTW) problems.
//!
//! # Search
//!
//! The [`search`] module implements a local search engine driven by pluggable neighborhood
//! operators and pivoting rules, the [`lns`] module an adaptive large neighborhood layer, and
//! the [`frvcp`] module a label-setting dynamic program which inserts recharging stations into
//! a fixed customer sequence.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

#[cfg(test)]
#[path = "../tests/helpers/mod.rs"]
#[macro_use]
pub mod helpers;

pub mod prelude;

pub mod algorithms;
pub mod evaluation;
pub mod frvcp;
pub mod lns;
pub mod models;
pub mod search;
pub mod utils;
