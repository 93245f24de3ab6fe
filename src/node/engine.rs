//! The per-node control loop.
//!
//! Each simulated node runs one `NodeEngine` as an independent task that owns
//! its heartbeat table outright; all cross-node influence flows through the
//! neighbor links. The loop multiplexes its timers and incoming snapshots in
//! a single `select!`, so an idle node sleeps instead of spinning.
//!
//! ## Responsibilities
//! - **Fault Injection**: periodically draw a random member id and flip the
//!   own failure state when the draw lands on this node.
//! - **Broadcast**: ship full table snapshots to every neighbor, unless the
//!   node is currently simulating a silent failure.
//! - **Receive/Merge**: fold neighbor snapshots into the local table.
//! - **Self-Tick**: advance the own heartbeat counter every heart-rate tick.
//! - **Failure Detection**: suspect and eventually evict silent members.

use rand::Rng;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, watch};
use tokio::time::interval_at;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::{StreamExt, StreamMap};
use tokio_util::sync::CancellationToken;

use super::config::GossipConfig;
use crate::heartbeat::table::HeartbeatTable;
use crate::heartbeat::types::{MemberId, TableSnapshot};
use crate::topology::types::Neighborhood;

/// Cadence of the staleness pass over the table.
const FAILURE_DETECTION_INTERVAL: Duration = Duration::from_secs(2);

pub struct NodeEngine {
    id: MemberId,
    config: GossipConfig,
    pub(crate) table: HeartbeatTable,
    outgoing: Vec<(MemberId, mpsc::Sender<TableSnapshot>)>,
    incoming: StreamMap<usize, ReceiverStream<TableSnapshot>>,
    pub(crate) self_failing: bool,
    shutdown: CancellationToken,
    snapshot_tx: watch::Sender<TableSnapshot>,
}

impl NodeEngine {
    pub fn new(
        id: MemberId,
        neighborhood: Neighborhood,
        config: GossipConfig,
        shutdown: CancellationToken,
    ) -> Self {
        let table = HeartbeatTable::new(id, &neighborhood.neighbor_ids());

        let mut outgoing = Vec::with_capacity(neighborhood.links.len());
        let mut incoming = StreamMap::new();
        // tiny clusters carry several links to the same neighbor, so streams
        // are keyed by link index rather than neighbor id
        for (index, link) in neighborhood.links.into_iter().enumerate() {
            outgoing.push((link.neighbor_id, link.outgoing));
            incoming.insert(index, ReceiverStream::new(link.incoming));
        }

        let (snapshot_tx, _) = watch::channel(table.snapshot());

        Self {
            id,
            config,
            table,
            outgoing,
            incoming,
            self_failing: false,
            shutdown,
            snapshot_tx,
        }
    }

    pub fn id(&self) -> MemberId {
        self.id
    }

    /// Observer handle on this node's table; a fresh snapshot is published
    /// after every loop iteration.
    pub fn subscribe(&self) -> watch::Receiver<TableSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Runs the engine until the shutdown token fires, then hands back the
    /// final table so callers can inspect the converged view.
    pub async fn run(mut self) -> HeartbeatTable {
        tracing::info!(
            "node {}: starting with {} neighbor links",
            self.id,
            self.outgoing.len()
        );

        let start = tokio::time::Instant::now();
        let mut toggle = interval_at(
            start + self.config.fail_toggle_interval,
            self.config.fail_toggle_interval,
        );
        let mut send = interval_at(start + self.config.send_interval, self.config.send_interval);
        let mut heart = interval_at(start + self.config.heart_rate, self.config.heart_rate);
        let mut detect = interval_at(start + FAILURE_DETECTION_INTERVAL, FAILURE_DETECTION_INTERVAL);

        loop {
            tokio::select! {
                biased;

                _ = self.shutdown.cancelled() => break,
                _ = toggle.tick() => self.fail_toggle_check(),
                _ = send.tick() => self.broadcast(),
                Some((link_index, snapshot)) = self.incoming.next() => {
                    self.receive(link_index, snapshot);
                }
                _ = heart.tick() => self.self_tick(),
                _ = detect.tick() => self.detect_failures(),
            }

            self.snapshot_tx.send_replace(self.table.snapshot());
        }

        tracing::info!(
            "node {}: shutting down, final view holds {} members",
            self.id,
            self.table.len()
        );
        self.table
    }

    /// Fault-injection lottery: draw a random member id; when it lands on
    /// this node, flip between healthy and self-failing.
    pub(crate) fn fail_toggle_check(&mut self) {
        let drawn = rand::thread_rng().gen_range(0..self.config.num_nodes);
        if drawn != self.id.0 {
            return;
        }

        self.self_failing = !self.self_failing;
        if self.self_failing {
            tracing::info!("node {}: failure injected, broadcasts suppressed", self.id);
        } else {
            tracing::info!("node {}: recovered, broadcasts resume", self.id);
        }
    }

    /// Sends the full table to every neighbor. A link whose buffer is full
    /// drops the snapshot; gossip tolerates lost rounds.
    pub(crate) fn broadcast(&mut self) {
        if self.self_failing {
            tracing::debug!("node {}: self-failing, skipping broadcast", self.id);
            return;
        }

        let snapshot = self.table.snapshot();
        for (neighbor_id, link) in &self.outgoing {
            if link.try_send(snapshot.clone()).is_err() {
                tracing::debug!("node {}: dropped snapshot for node {}", self.id, neighbor_id);
            }
        }
    }

    pub(crate) fn receive(&mut self, link_index: usize, snapshot: TableSnapshot) {
        // links are indexed identically in `outgoing` and `incoming`
        let from = self.outgoing[link_index].0;
        let accepted = self.table.merge_snapshot(snapshot, Instant::now());
        if accepted > 0 {
            tracing::debug!(
                "node {}: merged {} newer records from node {}",
                self.id,
                accepted,
                from
            );
        }
    }

    pub(crate) fn self_tick(&mut self) {
        let counter = self.table.tick_self(Instant::now());
        tracing::trace!("node {}: heartbeat {}", self.id, counter);
    }

    /// Staleness pass: suspect members silent past the failure timeout and
    /// evict those silent past the eviction window.
    pub(crate) fn detect_failures(&mut self) {
        let now = Instant::now();

        for id in self.table.mark_stale(now, self.config.failure_timeout) {
            tracing::warn!(
                "node {}: suspects node {} (no update within {:?})",
                self.id,
                id,
                self.config.failure_timeout
            );
        }

        for id in self.table.evict_stale(now, self.config.eviction_timeout()) {
            tracing::info!("node {}: evicted node {} as dead", self.id, id);
        }
    }
}
