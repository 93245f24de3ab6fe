//! Node Engine Tests
//!
//! Validates the per-node control loop.
//!
//! ## Test Scopes
//! - **Failure Injection**: toggling of the self-failing state.
//! - **Broadcast Policy**: suppression while self-failing, delivery otherwise.
//! - **Merge Path**: incoming snapshots reach the table even while failing.
//! - **Lifecycle**: cancellation ends the loop and yields the final table.

#[cfg(test)]
mod tests {
    use crate::heartbeat::types::{HeartbeatRecord, MemberId};
    use crate::node::config::GossipConfig;
    use crate::node::engine::NodeEngine;
    use crate::topology::builder::build_topology;
    use crate::topology::types::Neighborhood;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    /// Config with the lottery and the staleness passes pushed far out of the
    /// test window.
    fn test_config(num_nodes: usize) -> GossipConfig {
        let mut config = GossipConfig::new(num_nodes);
        config.fail_toggle_interval = Duration::from_secs(3600);
        config.failure_timeout = Duration::from_secs(3600);
        config
    }

    /// Node 0 of a 2-node cluster, plus node 1's untouched neighborhood.
    fn engine_with_peer() -> (NodeEngine, Neighborhood) {
        let mut neighborhoods = build_topology(2).expect("topology should build");
        let peer = neighborhoods.remove(1);
        let own = neighborhoods.remove(0);
        let engine = NodeEngine::new(MemberId(0), own, test_config(2), CancellationToken::new());
        (engine, peer)
    }

    // ============================================================
    // FAILURE INJECTION
    // ============================================================

    #[test]
    fn test_fail_toggle_flips_on_own_draw() {
        let mut neighborhoods = build_topology(2).expect("topology should build");
        // a single-member id space makes the lottery always land on node 0
        let mut engine = NodeEngine::new(
            MemberId(0),
            neighborhoods.remove(0),
            test_config(1),
            CancellationToken::new(),
        );

        assert!(!engine.self_failing);
        engine.fail_toggle_check();
        assert!(engine.self_failing);
        engine.fail_toggle_check();
        assert!(!engine.self_failing);
    }

    // ============================================================
    // BROADCAST POLICY
    // ============================================================

    #[tokio::test]
    async fn test_self_failing_suppresses_broadcast() {
        let (mut engine, mut peer) = engine_with_peer();

        engine.self_failing = true;
        engine.broadcast();

        for link in &mut peer.links {
            assert!(
                link.incoming.try_recv().is_err(),
                "no snapshot may arrive while self-failing"
            );
        }
    }

    #[tokio::test]
    async fn test_healthy_broadcast_reaches_all_neighbors() {
        let (mut engine, mut peer) = engine_with_peer();

        engine.broadcast();

        for link in &mut peer.links {
            let snapshot = link
                .incoming
                .try_recv()
                .expect("snapshot should arrive on every link");
            assert_eq!(snapshot.len(), 2);
        }
    }

    // ============================================================
    // MERGE PATH
    // ============================================================

    #[tokio::test]
    async fn test_incoming_snapshot_merges_even_while_self_failing() {
        let (mut engine, _peer) = engine_with_peer();

        engine.self_failing = true;
        engine.receive(
            0,
            vec![HeartbeatRecord {
                id: MemberId(1),
                counter: 12,
                last_update: None,
                failing: false,
            }],
        );

        assert_eq!(engine.table.get(MemberId(1)).unwrap().counter, 12);
    }

    // ============================================================
    // LIFECYCLE
    // ============================================================

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_yields_final_table() {
        let mut neighborhoods = build_topology(2).expect("topology should build");
        let shutdown = CancellationToken::new();
        let engine = NodeEngine::new(
            MemberId(0),
            neighborhoods.remove(0),
            test_config(2),
            shutdown.child_token(),
        );

        let handle = tokio::spawn(engine.run());
        tokio::time::sleep(Duration::from_millis(10)).await;
        shutdown.cancel();

        let table = handle.await.expect("engine task should not panic");
        assert_eq!(table.own_id(), MemberId(0));
        assert_eq!(table.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_observer_sees_ticked_snapshots() {
        let mut neighborhoods = build_topology(2).expect("topology should build");
        let shutdown = CancellationToken::new();
        let engine = NodeEngine::new(
            MemberId(0),
            neighborhoods.remove(0),
            test_config(2),
            shutdown.child_token(),
        );
        let snapshots = engine.subscribe();

        let handle = tokio::spawn(engine.run());
        tokio::time::sleep(Duration::from_millis(1500)).await;
        shutdown.cancel();
        handle.await.expect("engine task should not panic");

        let own = snapshots
            .borrow()
            .iter()
            .find(|rec| rec.id == MemberId(0))
            .cloned()
            .expect("own record must be published");
        assert!(own.counter >= 1, "heartbeat should have ticked at least once");
    }
}
