use std::time::Duration;

/// Default interval between increments of a node's own heartbeat counter.
pub const DEFAULT_HEART_RATE: Duration = Duration::from_secs(1);
/// Default interval between snapshot broadcasts to all neighbors.
pub const DEFAULT_SEND_INTERVAL: Duration = Duration::from_millis(500);
/// Default silence threshold after which a member is suspected of failing.
pub const DEFAULT_FAILURE_TIMEOUT: Duration = Duration::from_secs(5);
/// Default cadence of the fault-injection lottery.
pub const DEFAULT_FAIL_TOGGLE_INTERVAL: Duration = Duration::from_secs(10);

/// Timing and sizing knobs for one node engine.
#[derive(Debug, Clone)]
pub struct GossipConfig {
    /// Size of the member id space, fixed at topology construction.
    pub num_nodes: usize,
    pub heart_rate: Duration,
    pub send_interval: Duration,
    pub failure_timeout: Duration,
    pub fail_toggle_interval: Duration,
}

impl GossipConfig {
    pub fn new(num_nodes: usize) -> Self {
        Self {
            num_nodes,
            heart_rate: DEFAULT_HEART_RATE,
            send_interval: DEFAULT_SEND_INTERVAL,
            failure_timeout: DEFAULT_FAILURE_TIMEOUT,
            fail_toggle_interval: DEFAULT_FAIL_TOGGLE_INTERVAL,
        }
    }

    /// Window after which a silent member is dropped from the table, twice
    /// the suspicion threshold.
    pub fn eviction_timeout(&self) -> Duration {
        2 * self.failure_timeout
    }
}
