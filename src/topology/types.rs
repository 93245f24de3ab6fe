use tokio::sync::mpsc;

use crate::heartbeat::types::{MemberId, TableSnapshot};

/// Buffered capacity of each direction of a neighbor link. A full buffer
/// causes sends to be dropped rather than block the sending node.
pub const LINK_CAPACITY: usize = 100;

/// One node's handle on the bidirectional channel pair shared with a single
/// directly connected neighbor. The `outgoing` sender on one end feeds the
/// `incoming` receiver on the other.
#[derive(Debug)]
pub struct NeighborLink {
    pub neighbor_id: MemberId,
    pub outgoing: mpsc::Sender<TableSnapshot>,
    pub incoming: mpsc::Receiver<TableSnapshot>,
}

/// The ordered set of links one node gossips over.
#[derive(Debug, Default)]
pub struct Neighborhood {
    pub links: Vec<NeighborLink>,
}

impl Neighborhood {
    pub fn neighbor_ids(&self) -> Vec<MemberId> {
        self.links.iter().map(|link| link.neighbor_id).collect()
    }
}
