//! Gossip Heartbeat Cluster Simulator
//!
//! This library crate defines the core modules of the simulated cluster.
//! It serves as the foundation for the binary executable (`main.rs`).
//!
//! ## Architecture Modules
//! The simulation is composed of four loosely coupled subsystems:
//!
//! - **`heartbeat`**: The per-node liveness table and its merge algorithm.
//!   Counters only ever move forward at an observer, which keeps gossip
//!   idempotent and order-independent.
//! - **`topology`**: Construction of the fixed gossip graph (a ring plus
//!   cross-links) out of bounded in-memory channel pairs.
//! - **`node`**: The per-node engine: one event loop multiplexing heartbeat
//!   ticks, snapshot broadcasts, incoming merges, failure detection, and
//!   fault injection.
//! - **`sim`**: The driver that builds the cluster, runs every engine as its
//!   own task, observes their tables, and stops the run deterministically.

pub mod heartbeat;
pub mod node;
pub mod sim;
pub mod topology;
