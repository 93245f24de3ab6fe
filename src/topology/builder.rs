use anyhow::Result;
use tokio::sync::mpsc;

use super::types::{NeighborLink, Neighborhood, LINK_CAPACITY};
use crate::heartbeat::types::MemberId;

/// Builds the fixed gossip graph: a ring `i -> (i + 1) mod n` over all nodes,
/// plus a cross-link `i -> i + n/2` for the first half of the id space. Every
/// node ends up with 2-3 neighbors and the cross-links halve the graph
/// diameter, bounding gossip convergence time.
pub fn build_topology(num_nodes: usize) -> Result<Vec<Neighborhood>> {
    anyhow::ensure!(
        num_nodes >= 2,
        "cluster needs at least 2 nodes to form a ring, got {}",
        num_nodes
    );

    let mut neighborhoods: Vec<Neighborhood> =
        (0..num_nodes).map(|_| Neighborhood::default()).collect();

    for i in 0..num_nodes {
        let next = (i + 1) % num_nodes;
        let (forward, reverse) = connect(MemberId(i), MemberId(next));
        neighborhoods[i].links.push(forward);
        neighborhoods[next].links.push(reverse);
    }

    for i in 0..num_nodes / 2 {
        let opposite = i + num_nodes / 2;
        let (forward, reverse) = connect(MemberId(i), MemberId(opposite));
        neighborhoods[i].links.push(forward);
        neighborhoods[opposite].links.push(reverse);
    }

    Ok(neighborhoods)
}

/// Creates the channel pair between two adjacent nodes and returns each
/// endpoint's link.
fn connect(a: MemberId, b: MemberId) -> (NeighborLink, NeighborLink) {
    let (a_to_b, from_a) = mpsc::channel(LINK_CAPACITY);
    let (b_to_a, from_b) = mpsc::channel(LINK_CAPACITY);

    let a_side = NeighborLink {
        neighbor_id: b,
        outgoing: a_to_b,
        incoming: from_b,
    };
    let b_side = NeighborLink {
        neighbor_id: a,
        outgoing: b_to_a,
        incoming: from_a,
    };

    (a_side, b_side)
}
