use anyhow::Result;
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::heartbeat::table::HeartbeatTable;
use crate::heartbeat::types::{MemberId, TableSnapshot};
use crate::node::config::GossipConfig;
use crate::node::engine::NodeEngine;
use crate::topology::builder::build_topology;

/// Cadence of the cluster stats report.
const REPORT_INTERVAL: Duration = Duration::from_secs(5);

/// Runs the whole cluster for `run_for`, then cancels every node and returns
/// their final tables in node order.
pub async fn run_simulation(
    config: GossipConfig,
    run_for: Duration,
) -> Result<Vec<HeartbeatTable>> {
    let neighborhoods = build_topology(config.num_nodes)?;
    let shutdown = CancellationToken::new();

    let mut handles = Vec::with_capacity(config.num_nodes);
    let mut observers = Vec::with_capacity(config.num_nodes);

    for (i, neighborhood) in neighborhoods.into_iter().enumerate() {
        let engine = NodeEngine::new(
            MemberId(i),
            neighborhood,
            config.clone(),
            shutdown.child_token(),
        );
        observers.push((engine.id(), engine.subscribe()));
        handles.push(tokio::spawn(engine.run()));
    }

    let reporter = tokio::spawn(report_cluster_stats(observers, shutdown.child_token()));

    tokio::time::sleep(run_for).await;
    tracing::info!("run duration elapsed, stopping {} nodes", config.num_nodes);
    shutdown.cancel();

    let mut tables = Vec::with_capacity(handles.len());
    for handle in handles {
        tables.push(handle.await?);
    }
    reporter.await?;

    Ok(tables)
}

/// Periodically logs every node's view of the cluster. Pure observer: it only
/// ever reads the snapshots the engines publish.
async fn report_cluster_stats(
    observers: Vec<(MemberId, watch::Receiver<TableSnapshot>)>,
    shutdown: CancellationToken,
) {
    let mut interval = tokio::time::interval(REPORT_INTERVAL);

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = interval.tick() => {
                for (id, snapshots) in &observers {
                    let snapshot = snapshots.borrow().clone();
                    match serde_json::to_string(&snapshot) {
                        Ok(view) => {
                            tracing::info!("node {} view ({} members): {}", id, snapshot.len(), view);
                        }
                        Err(e) => {
                            tracing::error!("failed to serialize node {} view: {}", id, e);
                        }
                    }
                }
            }
        }
    }
}
