use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

/// Identifies a member of the simulated cluster.
///
/// Ids are dense integers in `[0, num_nodes)`, assigned once by the topology
/// builder and stable for the lifetime of the simulation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberId(pub usize);

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Counter value for a member that has never been observed.
pub const NEVER_OBSERVED: i64 = -1;

/// Liveness record for a single cluster member.
///
/// `counter` only moves forward at any given observer: locally through
/// self-ticks, remotely when a merge accepts a higher value. `last_update` is
/// the local wall-clock time of the last mutation and drives staleness
/// detection; it is observer-local state and never travels with the record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeartbeatRecord {
    pub id: MemberId,
    pub counter: i64,

    #[serde(skip)]
    pub last_update: Option<Instant>,

    /// Observer-side suspicion flag: set once a member stays silent past the
    /// failure timeout, cleared when a higher counter refutes it.
    pub failing: bool,
}

/// Full copy of one node's heartbeat table, exchanged over neighbor links.
pub type TableSnapshot = Vec<HeartbeatRecord>;
