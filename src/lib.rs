//! A small simulator of the Chord overlay network
//! Nodes are placed on an identifier circle of size 2^m using consistent hashing of their names
//! Every node links to its successor on the circle and keeps a finger table with m shortcuts
//! Lookups start at any node and follow successor and finger links until the node responsible for a key is found
//!
//! The simulation is static: the node set is fixed, there is no join, leave or stabilization
//!
//! Phases:
//!     1. `Chord::build_overlay_network` hashes every node name and links each node to its successor
//!     2. `Chord::build_finger_table` computes the m finger entries of every node
//!     3. `Chord::look_up` resolves identifiers, read only, as often as needed
//!
//! # Examples
//!
//! ```
//! use chord_simulator::{Chord, Config, Topology};
//!
//! let mut chord = Chord::new(Config { bits: 32 }).unwrap();
//! chord.set_topology(Topology::from_names(["node-a", "node-b", "node-c"]).unwrap());
//!
//! chord.build_overlay_network().unwrap();
//! chord.build_finger_table().unwrap();
//!
//! let key = chord.hash("some key");
//! let response = chord.look_up(key).unwrap().expect("a healthy ring always resolves");
//! assert!(!response.route.is_empty());
//! ```

#[cfg(feature = "derive")]
use serde::{Deserialize, Serialize};

mod chord;

pub use chord::finger::FingerEntry;
pub use chord::identifier::{Identifier, IdentifierSpace, in_interval};
pub use chord::iterator::RingIterator;
pub use chord::lookup::LookupResponse;
pub use chord::topology::{Node, NodeIndex, Topology};
pub use chord::{Chord, DefaultHashBuilder};

/// Simulation wide settings
///
/// * `bits` - length m of identifiers, the identifier circle holds 2^m positions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "derive", derive(Serialize, Deserialize))]
pub struct Config {
    pub bits: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config { bits: 10 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// m is zero or too large to do modular arithmetic in `u64`
    #[error("identifier length must be between 1 and {max} bits, got {0}", max = IdentifierSpace::MAX_BITS)]
    InvalidIdentifierBits(u32),

    /// the overlay cannot be built without nodes
    #[error("topology is empty")]
    EmptyTopology,

    /// a node has no identifier yet, the overlay network needs to be built first
    #[error("node {0} has no identifier, build the overlay network first")]
    RoutingTableNotReady(String),

    /// two node names hash to the same position on the circle
    #[error("nodes {first} and {second} both hash to identifier {id}")]
    IdentifierCollision {
        id: Identifier,
        first: String,
        second: String,
    },

    #[error("node {0} is already part of the topology")]
    DuplicateNode(String),

    #[error("node {0} is not part of the topology")]
    UnknownNode(String),

    /// lookups need a non empty topology
    #[error("no topology set or topology is empty")]
    NotInitialized,

    /// the ring is broken at this node
    #[error("node {0} has no successor")]
    MissingSuccessor(String),

    /// fingers were never built for this node
    #[error("node {0} has an empty routing table")]
    EmptyRoutingTable(String),

    /// a finger table entry refers to a node index that does not exist
    #[error("node {node} has a finger pointing to index {index}, which is not part of the topology")]
    DanglingFinger { node: String, index: NodeIndex },

    #[error("key {key} is outside of the identifier space [0, {size})")]
    KeyOutOfRange { key: Identifier, size: u64 },
}
