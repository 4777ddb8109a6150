use siphasher::sip::SipHasher;
use std::collections::HashMap;
use std::hash::BuildHasher;

use crate::{Config, Error};

pub mod finger;
pub mod identifier;
pub mod iterator;
pub mod lookup;
mod overlay;
pub mod topology;

use identifier::{Identifier, IdentifierSpace};
use topology::Topology;

#[derive(Clone, PartialEq, Debug)]
pub struct DefaultHashBuilder;

impl BuildHasher for DefaultHashBuilder {
    type Hasher = SipHasher;

    fn build_hasher(&self) -> Self::Hasher {
        SipHasher::new()
    }
}

/// Chord simulates one static Chord overlay
/// Chord places the nodes of a `Topology` on the identifier circle, builds their finger tables and resolves lookups
///
/// The phases need to run in order: `build_overlay_network`, `build_finger_table`, then any number of `look_up` calls
#[derive(Clone, PartialEq, Debug)]
pub struct Chord<S = DefaultHashBuilder> {
    hash_builder: S,
    space: IdentifierSpace,
    topology: Option<Topology>,
    keys: HashMap<String, Identifier>,
}

impl Chord {
    /// Create a new `Chord` simulation that hashes names with SipHash.
    ///
    /// # Arguments
    ///
    /// * `config` - `config.bits` is the identifier length m, it needs to be within 1..=63
    pub fn new(config: Config) -> Result<Chord, Error> {
        Chord::with_hasher(config, DefaultHashBuilder)
    }
}

impl<S> Chord<S> {
    /// Create a new `Chord` simulation which will use the given hash builder to place nodes and keys.
    ///
    /// # Arguments
    ///
    /// * `config` - `config.bits` is the identifier length m, it needs to be within 1..=63
    /// * `hash_builder` - implementation of BuildHasher, its hashes are reduced modulo 2^m
    ///
    /// # Examples
    ///
    /// ```
    /// use chord_simulator::{Chord, Config};
    /// use siphasher::sip::SipHasher;
    /// use std::hash::BuildHasher;
    ///
    /// #[derive(Clone, PartialEq, Debug)]
    /// pub struct KeyedHashBuilder(u64);
    ///
    /// impl BuildHasher for KeyedHashBuilder {
    ///     type Hasher = SipHasher;
    ///
    ///     fn build_hasher(&self) -> Self::Hasher {
    ///         SipHasher::new_with_keys(self.0, 0)
    ///     }
    /// }
    ///
    /// let chord = Chord::with_hasher(Config { bits: 16 }, KeyedHashBuilder(42)).unwrap();
    /// assert!(chord.hash("node-1") < 1 << 16);
    /// ```
    pub fn with_hasher(config: Config, hash_builder: S) -> Result<Chord<S>, Error> {
        Ok(Chord {
            hash_builder,
            space: IdentifierSpace::new(config.bits)?,
            topology: None,
            keys: HashMap::new(),
        })
    }

    pub fn space(&self) -> IdentifierSpace {
        self.space
    }

    /// bind the nodes to simulate, replaces any previous topology
    pub fn set_topology(&mut self, topology: Topology) {
        self.topology = Some(topology);
    }

    pub fn topology(&self) -> Option<&Topology> {
        self.topology.as_ref()
    }

    /// Get the number of nodes in the simulation.
    pub fn len(&self) -> usize {
        self.topology.as_ref().map_or(0, Topology::len)
    }

    /// Returns true if there are no nodes to simulate.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// key names and their identifiers, used by `look_up_keys`
    /// Returns `Error::KeyOutOfRange` and keeps the previous keys if any identifier is not within [0, 2^m)
    pub fn set_keys(&mut self, keys: HashMap<String, Identifier>) -> Result<(), Error> {
        if let Some(&key) = keys.values().find(|key| !self.space.contains(**key)) {
            return Err(Error::KeyOutOfRange {
                key,
                size: self.space.size(),
            });
        }

        self.keys = keys;

        Ok(())
    }

    pub fn keys(&self) -> &HashMap<String, Identifier> {
        &self.keys
    }
}

impl<S> Chord<S>
where
    S: BuildHasher,
{
    /// position of `name` on the identifier circle
    pub fn hash(&self, name: &str) -> Identifier {
        self.space.reduce(self.hash_builder.hash_one(name))
    }
}
