use std::collections::HashMap;
use std::ops::Index;

use super::finger::FingerEntry;
use super::identifier::Identifier;
use crate::Error;

/// position of a node within the `Topology` arena
pub type NodeIndex = usize;

/// Node is a simulated Chord peer
///
/// * `name` - unique name, hashed to obtain the identifier
/// * `id` - position on the identifier circle, set by the overlay builder
/// * `neighbors` - registered neighbors in registration order, the most recently registered one is the ring successor
/// * `routing_table` - finger table with m entries, set by the finger table builder
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    name: String,
    id: Option<Identifier>,
    neighbors: Vec<(String, NodeIndex)>,
    routing_table: Vec<FingerEntry>,
}

impl Node {
    fn new(name: String) -> Node {
        Node {
            name,
            id: None,
            neighbors: vec![],
            routing_table: vec![],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// identifier on the circle, `None` until the overlay network was built
    pub fn id(&self) -> Option<Identifier> {
        self.id
    }

    pub fn set_id(&mut self, id: Identifier) {
        self.id = Some(id);
    }

    /// register `neighbor` under `name`, it becomes the ring successor of this node
    /// registering a name again replaces the earlier registration
    pub fn add_neighbor(&mut self, name: String, neighbor: NodeIndex) {
        self.neighbors.retain(|(registered, _)| *registered != name);
        self.neighbors.push((name, neighbor));
    }

    /// forget all registered neighbors, including the successor
    pub fn clear_neighbors(&mut self) {
        self.neighbors.clear();
    }

    pub fn neighbors(&self) -> &[(String, NodeIndex)] {
        &self.neighbors
    }

    /// the next node clockwise on the ring, i.e. the most recently registered neighbor
    pub fn successor(&self) -> Option<NodeIndex> {
        self.neighbors.last().map(|(_, neighbor)| *neighbor)
    }

    /// finger entries ordered by index, entry i of the Chord paper is stored at position i - 1
    pub fn routing_table(&self) -> &[FingerEntry] {
        &self.routing_table
    }

    pub fn set_routing_table(&mut self, routing_table: Vec<FingerEntry>) {
        self.routing_table = routing_table;
    }
}

/// Topology stores all nodes of one simulation in an arena
/// Nodes refer to each other by `NodeIndex`, never by reference
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Topology {
    nodes: Vec<Node>,
    names: HashMap<String, NodeIndex>,
}

impl Topology {
    pub fn new() -> Topology {
        Topology::default()
    }

    /// Create a topology with one node per name.
    /// Returns `Error::DuplicateNode` if a name shows up twice
    pub fn from_names<I, N>(names: I) -> Result<Topology, Error>
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        let mut topology = Topology::new();
        for name in names {
            topology.add(name)?;
        }

        Ok(topology)
    }

    /// Add a node called `name`, returns its index.
    pub fn add<N: Into<String>>(&mut self, name: N) -> Result<NodeIndex, Error> {
        let name = name.into();
        if self.names.contains_key(&name) {
            return Err(Error::DuplicateNode(name));
        }

        let index = self.nodes.len();
        self.names.insert(name.clone(), index);
        self.nodes.push(Node::new(name));

        Ok(index)
    }

    /// Get the number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the topology has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<NodeIndex> {
        self.names.get(name).copied()
    }

    pub fn node(&self, name: &str) -> Option<&Node> {
        self.index_of(name).map(|index| &self.nodes[index])
    }

    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn node_mut(&mut self, index: NodeIndex) -> Option<&mut Node> {
        self.nodes.get_mut(index)
    }

    /// all nodes in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, &Node)> {
        self.nodes.iter().enumerate()
    }

    /// all (id, index) pairs sorted by id
    /// Returns `Error::RoutingTableNotReady` if any node has no identifier yet
    pub fn sorted_by_id(&self) -> Result<Vec<(Identifier, NodeIndex)>, Error> {
        let mut ring = self
            .iter()
            .map(|(index, node)| {
                node.id()
                    .map(|id| (id, index))
                    .ok_or_else(|| Error::RoutingTableNotReady(node.name.clone()))
            })
            .collect::<Result<Vec<_>, Error>>()?;

        ring.sort();

        Ok(ring)
    }
}

impl Index<NodeIndex> for Topology {
    type Output = Node;

    fn index(&self, index: NodeIndex) -> &Self::Output {
        &self.nodes[index]
    }
}
