use std::hash::{BuildHasher, Hasher};

use chord_simulator::{Chord, Config, Error, Identifier, Topology};
use pretty_assertions::assert_eq;
use rand::{Rng, SeedableRng, distr::Alphanumeric, rngs::StdRng};

/// hashes a name to the number spelled by its digits, "node-13" becomes 13
#[derive(Clone, Debug, PartialEq)]
struct DigitBuildHasher;

impl BuildHasher for DigitBuildHasher {
    type Hasher = DigitHasher;

    fn build_hasher(&self) -> Self::Hasher {
        DigitHasher { hash: 0 }
    }
}

struct DigitHasher {
    hash: u64,
}

impl Hasher for DigitHasher {
    fn finish(&self) -> u64 {
        self.hash
    }

    fn write(&mut self, bytes: &[u8]) {
        for byte in bytes.iter().filter(|b| b.is_ascii_digit()) {
            self.hash = self.hash * 10 + u64::from(byte - b'0');
        }
    }
}

/// a simulation of randomly named nodes, with both phases built
fn random_chord(rng: &mut StdRng, bits: u32, nodes: usize) -> Chord {
    loop {
        let names: Vec<String> = (0..nodes)
            .map(|_| (0..7).map(|_| char::from(rng.sample(Alphanumeric))).collect())
            .collect();

        let Ok(topology) = Topology::from_names(names) else {
            continue;
        };

        let mut chord = Chord::new(Config { bits }).unwrap();
        chord.set_topology(topology);

        match chord.build_overlay_network() {
            Ok(()) => (),
            Err(Error::IdentifierCollision { .. }) => continue,
            Err(e) => panic!("unexpected error {e}"),
        }

        chord.build_finger_table().unwrap();
        return chord;
    }
}

/// first identifier >= key, the smallest identifier if there is none
fn oracle<S>(chord: &Chord<S>, key: Identifier) -> Identifier {
    let mut ids: Vec<Identifier> = chord
        .topology()
        .unwrap()
        .iter()
        .map(|(_, node)| node.id().unwrap())
        .collect();
    ids.sort();

    for id in ids.iter() {
        if *id >= key {
            return *id;
        }
    }

    ids[0]
}

#[test]
fn lookup_matches_linear_scan() {
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..20 {
        let bits = rng.random_range(8..=16);
        let nodes = rng.random_range(1..=12);
        let chord = random_chord(&mut rng, bits, nodes);

        for _ in 0..50 {
            let key = rng.random_range(0..chord.space().size());
            let start = rng.random_range(0..chord.len());
            let start = chord.topology().unwrap()[start].name().to_string();

            let response = chord
                .look_up_from(&start, key)
                .unwrap()
                .expect("a healthy ring always resolves");

            assert_eq!(oracle(&chord, key), response.node_id, "key {key} from {start}");
            assert!(response.route.len() <= chord.len() + 2);
            assert_eq!(response.route[0], start);
            assert!(response.route.contains(&response.node_name));
        }
    }
}

#[test]
fn every_key_of_a_small_circle() {
    let mut rng = StdRng::seed_from_u64(42);
    let chord = random_chord(&mut rng, 6, 9);

    for key in 0..64 {
        for (_, node) in chord.topology().unwrap().iter() {
            let response = chord.look_up_from(node.name(), key).unwrap().unwrap();
            assert_eq!(oracle(&chord, key), response.node_id);
        }
    }
}

#[test]
fn route_has_no_duplicates() {
    let mut rng = StdRng::seed_from_u64(3);
    let chord = random_chord(&mut rng, 10, 30);

    for key in (0..1024).step_by(7) {
        let response = chord.look_up(key).unwrap().unwrap();
        let mut route = response.route.clone();
        route.sort();
        route.dedup();

        assert_eq!(route.len(), response.route.len());
    }
}

#[test]
fn ring_closure() {
    let mut rng = StdRng::seed_from_u64(11);
    let chord = random_chord(&mut rng, 12, 25);

    let ids: Vec<Identifier> = chord.ring().map(|node| node.id().unwrap()).collect();

    assert_eq!(ids.len(), 25);
    assert!(ids.windows(2).all(|w| w[0] < w[1]));

    let topology = chord.topology().unwrap();
    for (start, _) in topology.iter() {
        let mut current = start;
        for _ in 0..topology.len() {
            current = topology[current].successor().unwrap();
        }
        assert_eq!(current, start);
    }
}

#[test]
fn scenario_with_four_nodes() {
    let mut chord = Chord::with_hasher(Config { bits: 3 }, DigitBuildHasher).unwrap();
    chord.set_topology(Topology::from_names(["node-5", "node-2", "node-3", "node-1"]).unwrap());
    chord.build_overlay_network().unwrap();
    chord.build_finger_table().unwrap();

    for start in ["node-1", "node-2", "node-3", "node-5"] {
        let id = |key| chord.look_up_from(start, key).unwrap().unwrap().node_id;

        assert_eq!(id(4), 5);
        assert_eq!(id(6), 1);
        assert_eq!(id(3), 3);
    }

    let topology = chord.topology().unwrap();
    let fingers: Vec<(Identifier, &str)> = topology
        .node("node-3")
        .unwrap()
        .routing_table()
        .iter()
        .map(|f| (f.start, topology[f.successor].name()))
        .collect();

    assert_eq!(fingers, vec![(4, "node-5"), (5, "node-5"), (7, "node-1")]);
}

#[test]
fn keys_hashed_by_the_driver() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut chord = random_chord(&mut rng, 16, 10);

    let keys = ["alpha", "beta", "gamma", "delta"]
        .into_iter()
        .map(|name| (name.to_string(), chord.hash(name)))
        .collect();
    chord.set_keys(keys).unwrap();

    let resolved = chord.look_up_keys().unwrap();

    assert_eq!(resolved.len(), 4);
    for (name, response) in resolved {
        let key = chord.keys()[&name];
        assert_eq!(Some(oracle(&chord, key)), response.map(|r| r.node_id));
    }
}
