use std::collections::HashMap;
use std::time::{Duration, Instant};

use super::types::{HeartbeatRecord, MemberId, TableSnapshot, NEVER_OBSERVED};

/// Per-node liveness table: one record per known cluster member.
///
/// Owned exclusively by a single node engine; other nodes influence it only
/// through snapshots passed over neighbor links and merged here. The merge
/// rule is a per-record max on the counter, which makes gossip idempotent and
/// order-independent and keeps every observed counter monotone.
#[derive(Debug)]
pub struct HeartbeatTable {
    own_id: MemberId,
    records: HashMap<MemberId, HeartbeatRecord>,
}

impl HeartbeatTable {
    /// Creates the initial table: the node's own record at counter 0 plus a
    /// sentinel record per direct neighbor.
    pub fn new(own_id: MemberId, neighbor_ids: &[MemberId]) -> Self {
        let now = Instant::now();
        let mut records = HashMap::with_capacity(neighbor_ids.len() + 1);

        records.insert(
            own_id,
            HeartbeatRecord {
                id: own_id,
                counter: 0,
                last_update: Some(now),
                failing: false,
            },
        );

        for &id in neighbor_ids {
            records.entry(id).or_insert(HeartbeatRecord {
                id,
                counter: NEVER_OBSERVED,
                last_update: Some(now),
                failing: false,
            });
        }

        Self { own_id, records }
    }

    pub fn own_id(&self) -> MemberId {
        self.own_id
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: MemberId) -> Option<&HeartbeatRecord> {
        self.records.get(&id)
    }

    pub fn members(&self) -> impl Iterator<Item = &HeartbeatRecord> {
        self.records.values()
    }

    /// Advances this node's own heartbeat counter and returns the new value.
    pub fn tick_self(&mut self, now: Instant) -> i64 {
        let record = self
            .records
            .entry(self.own_id)
            .or_insert(HeartbeatRecord {
                id: self.own_id,
                counter: NEVER_OBSERVED,
                last_update: None,
                failing: false,
            });

        record.counter += 1;
        record.last_update = Some(now);
        record.counter
    }

    /// Applies one incoming record: highest counter wins, ties and lower
    /// values are discarded, unknown members are inserted. An accepted record
    /// replaces the local one and refreshes `last_update` to the merge time.
    /// Returns true when the incoming record was accepted.
    pub fn merge_record(&mut self, incoming: HeartbeatRecord, now: Instant) -> bool {
        match self.records.get_mut(&incoming.id) {
            Some(existing) if existing.counter < incoming.counter => {
                existing.counter = incoming.counter;
                existing.failing = incoming.failing;
                existing.last_update = Some(now);
                true
            }
            Some(_) => false,
            None => {
                self.records.insert(
                    incoming.id,
                    HeartbeatRecord {
                        last_update: Some(now),
                        ..incoming
                    },
                );
                true
            }
        }
    }

    /// Merges a full snapshot record by record; returns how many records were
    /// accepted.
    pub fn merge_snapshot(&mut self, snapshot: TableSnapshot, now: Instant) -> usize {
        let mut accepted = 0;
        for record in snapshot {
            if self.merge_record(record, now) {
                accepted += 1;
            }
        }
        accepted
    }

    /// Flags members (never the own record) without an update for longer than
    /// `failure_timeout` as failing. Returns the newly suspected members.
    pub fn mark_stale(&mut self, now: Instant, failure_timeout: Duration) -> Vec<MemberId> {
        let mut suspected = Vec::new();

        for record in self.records.values_mut() {
            if record.id == self.own_id || record.failing {
                continue;
            }

            match record.last_update {
                Some(last) if now.saturating_duration_since(last) > failure_timeout => {
                    record.failing = true;
                    suspected.push(record.id);
                }
                Some(_) => {}
                None => record.last_update = Some(now),
            }
        }

        suspected
    }

    /// Drops members (never the own record) without an update for longer than
    /// `eviction_timeout`, signaling they are considered definitively down.
    /// Returns the evicted members.
    pub fn evict_stale(&mut self, now: Instant, eviction_timeout: Duration) -> Vec<MemberId> {
        let own_id = self.own_id;
        let mut evicted = Vec::new();

        self.records.retain(|&id, record| {
            if id == own_id {
                return true;
            }
            match record.last_update {
                Some(last) if now.saturating_duration_since(last) > eviction_timeout => {
                    evicted.push(id);
                    false
                }
                _ => true,
            }
        });

        evicted
    }

    /// Full copy handed to neighbors and observers.
    pub fn snapshot(&self) -> TableSnapshot {
        self.records.values().cloned().collect()
    }
}
