//! basic example to showcase the three phases of a Chord simulation

use chord_simulator::{Chord, Config, Topology};

fn main() {
    let mut chord = Chord::new(Config { bits: 32 }).unwrap();
    chord.set_topology(Topology::from_names(["Node 1", "Node 2", "Node 3", "Node 4"]).unwrap());

    // hash all node names and link every node to its successor
    chord.build_overlay_network().unwrap();

    // compute the m finger entries of every node
    chord.build_finger_table().unwrap();

    let topology = chord.topology().unwrap();
    for node in chord.ring() {
        println!("{} @{:?}", node.name(), node.id());

        for (i, finger) in node.routing_table().iter().enumerate() {
            println!(
                "    finger {}: [{}, {}] -> {}",
                i + 1,
                finger.start,
                finger.end,
                topology[finger.successor].name()
            );
        }
    }

    // hashing the key is up to the caller, the lookup only sees its identifier
    let key = chord.hash("foo");
    println!("lookup for key foo @{key}: {:?}", chord.look_up(key).unwrap());
}
