// src/dag/mod.rs

//! DAG representation over task dependencies.
//!
//! [`graph`] holds a simple directed-acyclic graph keyed by task name. Cycle
//! and missing-reference validation happens earlier, in
//! [`crate::config::validate`], so this module only keeps adjacency
//! information for admission and cascading-failure bookkeeping.

pub mod graph;

pub use graph::DagGraph;
