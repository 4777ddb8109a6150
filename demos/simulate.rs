//! brief example how a Chord simulation can be driven
//! - seed a network with randomly named nodes
//! - place keys on the identifier circle
//! - resolve all keys and report how many hops were needed
//!
//! set RUST_LOG=chord_simulator=debug to follow the construction of the ring

use std::collections::HashMap;

use chord_simulator::{Chord, Config, Error, Topology};
use rand::{Rng, distr::Alphanumeric};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // length of identifiers, the circle has 2^bits positions
    let bits = 16;

    // amount of nodes to place on the ring
    let num_nodes = 64;

    let mut chord = Chord::new(Config { bits })?;

    // random names can hash to the same identifier, try again with a fresh set of names
    loop {
        let names: Vec<String> = (0..num_nodes).map(|_| random_string()).collect();
        chord.set_topology(Topology::from_names(names)?);

        match chord.build_overlay_network() {
            Ok(()) => break,
            Err(Error::IdentifierCollision { id, first, second }) => {
                println!("{first} and {second} collide @{id}, reseeding the network");
            }
            Err(e) => return Err(e),
        }
    }

    chord.build_finger_table()?;

    // keys are hashed by the driver, the simulation only sees identifiers
    let keys: HashMap<String, u64> = (0..1000)
        .map(|_| {
            let key = format!("key_{}", random_string());
            let index = chord.hash(&key);
            (key, index)
        })
        .collect();
    chord.set_keys(keys)?;

    let mut hops = vec![0; num_nodes + 1];
    let mut failed = 0;

    for (key, response) in chord.look_up_keys()? {
        match response {
            Some(response) => hops[response.route.len() - 1] += 1,
            None => {
                println!("error: lookup for {key} was abandoned");
                failed += 1;
            }
        }
    }

    println!("\n# nodes visited per lookup ({num_nodes} nodes, {bits} bit identifiers)");
    for (visited, count) in hops.iter().enumerate().filter(|(_, count)| **count > 0) {
        println!("{:>3} nodes: {count} lookups", visited + 1);
    }

    if failed > 0 {
        println!("\n{failed} lookups failed, the ring seems to be misconfigured");
    }

    Ok(())
}

/// generate a random String to name nodes and keys
fn random_string() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(7)
        .map(char::from)
        .collect()
}
