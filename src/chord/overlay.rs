use std::collections::HashMap;
use std::hash::BuildHasher;

use super::Chord;
use super::identifier::Identifier;
use super::topology::NodeIndex;
use crate::Error;

impl<S> Chord<S>
where
    S: BuildHasher,
{
    /// Place all nodes of the topology on the ring.
    ///
    /// Every node gets the hash of its name as identifier. Afterwards the nodes are sorted by identifier and
    /// each node registers the next one (the last node wraps around to the first) as its successor.
    /// Running it again on the same topology replaces all previously registered neighbors.
    ///
    /// Returns `Error::EmptyTopology` if there is nothing to place and `Error::IdentifierCollision`
    /// if two names hash to the same identifier. The topology is not modified in both cases.
    pub fn build_overlay_network(&mut self) -> Result<(), Error> {
        let space = self.space;
        let hash_builder = &self.hash_builder;
        let topology = match self.topology.as_mut() {
            Some(topology) if !topology.is_empty() => topology,
            _ => return Err(Error::EmptyTopology),
        };

        let mut owners: HashMap<Identifier, NodeIndex> = HashMap::with_capacity(topology.len());
        let mut ids = Vec::with_capacity(topology.len());

        for (index, node) in topology.iter() {
            let id = space.reduce(hash_builder.hash_one(node.name()));

            if let Some(owner) = owners.insert(id, index) {
                return Err(Error::IdentifierCollision {
                    id,
                    first: topology[owner].name().to_string(),
                    second: node.name().to_string(),
                });
            }

            ids.push((index, id));
        }

        for (index, id) in ids {
            if let Some(node) = topology.node_mut(index) {
                node.set_id(id);
                node.clear_neighbors();
            }
        }

        let ring = topology.sorted_by_id()?;

        for (position, &(id, index)) in ring.iter().enumerate() {
            let (successor_id, successor) = ring[(position + 1) % ring.len()];
            let successor_name = topology[successor].name().to_string();

            tracing::debug!(
                "link node {} @{id} to successor {successor_name} @{successor_id}",
                topology[index].name()
            );

            if let Some(node) = topology.node_mut(index) {
                node.add_neighbor(successor_name, successor);
            }
        }

        tracing::info!(nodes = ring.len(), bits = space.bits(), "overlay network built");

        Ok(())
    }
}
