//! Simulation Driver Module
//!
//! The outer collaborator of the gossip core: builds the topology, launches
//! one engine task per node, watches their published table snapshots for
//! periodic cluster stats, and stops the whole run deterministically after a
//! fixed duration.

pub mod driver;

#[cfg(test)]
mod tests;
