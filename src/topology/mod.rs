//! Topology Module
//!
//! Constructs the fixed neighbor graph the simulation gossips over: a ring
//! augmented with cross-links between opposite nodes, realized as bounded
//! in-memory channel pairs instead of sockets. The graph is built once before
//! any node starts and never changes afterwards.

pub mod builder;
pub mod types;
