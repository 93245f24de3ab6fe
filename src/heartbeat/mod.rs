//! Heartbeat Table Module
//!
//! The per-node liveness state: every node owns one `HeartbeatTable` mapping
//! each known member to its latest heartbeat counter. Tables converge across
//! the cluster through anti-entropy exchange: full snapshots travel between
//! neighbors and merge record by record under a "highest counter wins" rule.
//!
//! ## Core Mechanisms
//! - **Self-Tick**: a node proves its own liveness by incrementing its counter.
//! - **Merge**: a per-record max keeps every observer's view monotone and
//!   makes gossip idempotent and order-independent.
//! - **Staleness Ladder**: members missing updates are first flagged failing
//!   (suspected), then evicted once the eviction window passes.

pub mod table;
pub mod types;
