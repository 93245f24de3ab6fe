//! Simulation Driver Tests
//!
//! End-to-end runs over the in-memory cluster, under paused time so gossip
//! rounds execute deterministically and fast.

#[cfg(test)]
mod tests {
    use crate::heartbeat::types::MemberId;
    use crate::node::config::GossipConfig;
    use crate::sim::driver::run_simulation;
    use std::time::Duration;

    /// One-second gossip cadence with fault injection and staleness pushed
    /// out of the run window.
    fn quiet_config(num_nodes: usize) -> GossipConfig {
        let mut config = GossipConfig::new(num_nodes);
        config.heart_rate = Duration::from_secs(1);
        config.send_interval = Duration::from_secs(1);
        config.fail_toggle_interval = Duration::from_secs(3600);
        config.failure_timeout = Duration::from_secs(3600);
        config
    }

    // ============================================================
    // CONSTRUCTION ERRORS
    // ============================================================

    #[tokio::test]
    async fn test_rejects_degenerate_cluster() {
        let result = run_simulation(quiet_config(1), Duration::from_millis(10)).await;
        assert!(result.is_err());
    }

    // ============================================================
    // CONVERGENCE
    // ============================================================

    #[tokio::test(start_paused = true)]
    async fn test_three_node_ring_converges() {
        let tables = run_simulation(quiet_config(3), Duration::from_millis(6500))
            .await
            .expect("simulation should run");

        assert_eq!(tables.len(), 3);
        for table in &tables {
            assert_eq!(table.len(), 3, "node {} lost members", table.own_id());
            for id in 0..3 {
                let record = table
                    .get(MemberId(id))
                    .expect("every member must appear in every table");
                assert!(
                    record.counter >= 4,
                    "node {} sees member {} at counter {}",
                    table.own_id(),
                    id,
                    record.counter
                );
            }
        }
    }

    // ============================================================
    // SHUTDOWN
    // ============================================================

    #[tokio::test(start_paused = true)]
    async fn test_run_completes_and_returns_all_tables() {
        let tables = run_simulation(quiet_config(8), Duration::from_millis(2500))
            .await
            .expect("simulation should run");

        assert_eq!(tables.len(), 8);
        for (i, table) in tables.iter().enumerate() {
            assert_eq!(table.own_id(), MemberId(i));
        }
    }
}
