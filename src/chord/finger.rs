use std::fmt::Display;

#[cfg(feature = "derive")]
use serde::{Deserialize, Serialize};

use super::Chord;
use super::identifier::{Identifier, IdentifierSpace, in_interval};
use super::topology::NodeIndex;
use crate::Error;

/// FingerEntry is one row of a finger table
///
/// * `start` - (n + 2^(i-1)) mod 2^m for the i-th entry of node n
/// * `end` - last identifier covered by this entry (inclusive), one less than the start of the next entry
/// * `successor` - node responsible for `start`, i.e. the first node clockwise from `start`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "derive", derive(Serialize, Deserialize))]
pub struct FingerEntry {
    pub start: Identifier,
    pub end: Identifier,
    pub successor: NodeIndex,
}

impl FingerEntry {
    /// Returns true if `key` lies within [start, end] of this entry.
    pub fn contains(&self, key: Identifier) -> bool {
        in_interval(key, self.start, self.end)
    }
}

impl Display for FingerEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}] -> #{}", self.start, self.end, self.successor)
    }
}

impl<S> Chord<S> {
    /// Build the finger table (routing table) of every node.
    ///
    /// The i-th entry (i = 1..=m) of node n starts at (n + 2^(i-1)) mod 2^m and ends right before the start of
    /// entry i + 1, the last entry wraps around to the start of the first one. Its successor is the first node
    /// with an identifier >= start, or the node with the smallest identifier if there is none.
    ///
    /// Requires `build_overlay_network` to have run, returns `Error::RoutingTableNotReady` otherwise.
    /// Building again on an unchanged ring produces the same tables.
    pub fn build_finger_table(&mut self) -> Result<(), Error> {
        let space = self.space;
        let topology = match self.topology.as_mut() {
            Some(topology) if !topology.is_empty() => topology,
            _ => return Err(Error::EmptyTopology),
        };

        let ring = topology.sorted_by_id()?;

        for &(id, index) in ring.iter() {
            let routing_table = finger_table(space, id, &ring);

            if let Some(node) = topology.node_mut(index) {
                tracing::debug!("finger table of {} @{id}: {routing_table:?}", node.name());
                node.set_routing_table(routing_table);
            }
        }

        tracing::info!(nodes = ring.len(), fingers = space.bits(), "finger tables built");

        Ok(())
    }
}

/// all m finger entries of the node with identifier `id`
fn finger_table(
    space: IdentifierSpace,
    id: Identifier,
    ring: &[(Identifier, NodeIndex)],
) -> Vec<FingerEntry> {
    let starts: Vec<Identifier> = (1..=space.bits()).map(|i| space.finger_start(id, i)).collect();

    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let next_start = starts[(i + 1) % starts.len()];
            FingerEntry {
                start,
                end: space.sub(next_start, 1),
                successor: successor_of(start, ring),
            }
        })
        .collect()
}

/// first node on `ring` (sorted by identifier) with an identifier >= `key`, wrapping around to the first node
fn successor_of(key: Identifier, ring: &[(Identifier, NodeIndex)]) -> NodeIndex {
    let n = match ring.binary_search_by(|(id, _)| id.cmp(&key)) {
        Err(n) => n,
        Ok(n) => n,
    };

    ring[n % ring.len()].1
}
