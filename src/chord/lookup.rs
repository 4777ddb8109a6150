use std::collections::{BTreeMap, HashSet};

#[cfg(feature = "derive")]
use serde::{Deserialize, Serialize};

use super::Chord;
use super::identifier::{Identifier, in_interval};
use super::topology::{Node, NodeIndex, Topology};
use crate::Error;

/// LookupResponse describes how a key was resolved
///
/// * `route` - names of all nodes visited during the lookup, in the order they were visited first, without duplicates
/// * `node_id` - identifier of the node responsible for the key
/// * `node_name` - name of the node responsible for the key
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "derive", derive(Serialize, Deserialize))]
pub struct LookupResponse {
    pub route: Vec<String>,
    pub node_id: Identifier,
    pub node_name: String,
}

// nodes visited by one lookup, keeps the order of the first visit
#[derive(Debug, Default)]
struct Route {
    visited: Vec<String>,
    seen: HashSet<NodeIndex>,
}

impl Route {
    fn visit(&mut self, index: NodeIndex, node: &Node) {
        if self.seen.insert(index) {
            self.visited.push(node.name().to_string());
        }
    }

    fn len(&self) -> usize {
        self.visited.len()
    }

    fn resolve(self, owner: &Node, owner_id: Identifier) -> LookupResponse {
        LookupResponse {
            route: self.visited,
            node_id: owner_id,
            node_name: owner.name().to_string(),
        }
    }
}

impl<S> Chord<S> {
    /// Find the node responsible for `key_index`, starting at the first node of the topology.
    ///
    /// Hashing a key name is up to the caller, see `Chord::hash`.
    ///
    /// Returns `Ok(None)` if the lookup had to be abandoned because it visited more than `len() + 2` nodes,
    /// which means the ring is misconfigured.
    ///
    /// # Errors
    ///
    /// * `Error::NotInitialized` - no topology set or the topology is empty
    /// * `Error::KeyOutOfRange` - `key_index` is not within [0, 2^m)
    /// * `Error::MissingSuccessor` - the overlay network was not built
    /// * `Error::EmptyRoutingTable` - the finger tables were not built
    /// * `Error::DanglingFinger` - a finger points to a node that is not part of the topology
    pub fn look_up(&self, key_index: Identifier) -> Result<Option<LookupResponse>, Error> {
        let topology = self.initialized_topology()?;

        self.traverse(topology, 0, key_index)
    }

    /// Same as `look_up`, but the lookup starts at the node called `name`.
    pub fn look_up_from(&self, name: &str, key_index: Identifier) -> Result<Option<LookupResponse>, Error> {
        let topology = self.initialized_topology()?;
        let start = topology
            .index_of(name)
            .ok_or_else(|| Error::UnknownNode(name.to_string()))?;

        self.traverse(topology, start, key_index)
    }

    /// Look up every key registered with `set_keys`, by key name.
    pub fn look_up_keys(&self) -> Result<BTreeMap<String, Option<LookupResponse>>, Error> {
        let mut resolved = BTreeMap::new();
        for (name, &key_index) in self.keys.iter() {
            resolved.insert(name.clone(), self.look_up(key_index)?);
        }

        Ok(resolved)
    }

    fn initialized_topology(&self) -> Result<&Topology, Error> {
        self.topology
            .as_ref()
            .filter(|topology| !topology.is_empty())
            .ok_or(Error::NotInitialized)
    }

    fn traverse(
        &self,
        topology: &Topology,
        start: NodeIndex,
        key_index: Identifier,
    ) -> Result<Option<LookupResponse>, Error> {
        if !self.space.contains(key_index) {
            return Err(Error::KeyOutOfRange {
                key: key_index,
                size: self.space.size(),
            });
        }

        let limit = topology.len() + 2;
        let id_of = |node: &Node| {
            node.id()
                .ok_or_else(|| Error::RoutingTableNotReady(node.name().to_string()))
        };

        let mut route = Route::default();
        let mut current = start;
        let mut node = topology.get(start).ok_or(Error::NotInitialized)?;
        let mut hops = 0;
        route.visit(current, node);

        loop {
            let current_id = id_of(node)?;

            if key_index == current_id {
                return Ok(Some(route.resolve(node, current_id)));
            }

            // a successor outside of the topology breaks the ring just like a missing one
            let (successor, successor_node) = node
                .successor()
                .and_then(|successor| Some((successor, topology.get(successor)?)))
                .ok_or_else(|| Error::MissingSuccessor(node.name().to_string()))?;
            let successor_id = id_of(successor_node)?;

            // a node that is its own successor owns the whole circle
            if successor == current || in_interval(key_index, current_id, successor_id) {
                route.visit(successor, successor_node);
                return Ok(Some(route.resolve(successor_node, successor_id)));
            }

            if node.routing_table().is_empty() {
                return Err(Error::EmptyRoutingTable(node.name().to_string()));
            }

            let (mut next, mut next_node) = (successor, successor_node);
            for finger in node.routing_table().iter().rev() {
                if finger.successor == current {
                    continue;
                }

                let finger_node = topology.get(finger.successor).ok_or_else(|| Error::DanglingFinger {
                    node: node.name().to_string(),
                    index: finger.successor,
                })?;

                if in_interval(id_of(finger_node)?, current_id, key_index) {
                    (next, next_node) = (finger.successor, finger_node);
                    break;
                }
            }

            tracing::trace!(
                "lookup {key_index}: hop from {} @{current_id} to {}",
                node.name(),
                next_node.name()
            );

            route.visit(next, next_node);
            current = next;
            node = next_node;
            hops += 1;

            if route.len() > limit || hops > limit {
                tracing::warn!(
                    key = key_index,
                    hops,
                    visited = route.len(),
                    "lookup abandoned, the ring might be misconfigured"
                );
                return Ok(None);
            }
        }
    }
}
