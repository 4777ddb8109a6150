use super::Chord;
use super::topology::{Node, NodeIndex, Topology};

/// RingIterator walks the ring clockwise along successor links, starting at the node with the smallest identifier
/// it stops once it is back at the start, and after `len()` nodes at the latest
pub struct RingIterator<'a> {
    topology: Option<&'a Topology>,
    start: NodeIndex,
    next: Option<NodeIndex>,
    remaining: usize,
}

impl<'a> Iterator for RingIterator<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let node = self.topology?.get(self.next?)?;
        self.remaining -= 1;
        self.next = node.successor().filter(|successor| *successor != self.start);

        Some(node)
    }
}

impl<S> Chord<S> {
    /// iterate the nodes in ring order
    /// yields nothing until the overlay network was built
    pub fn ring(&self) -> RingIterator<'_> {
        let topology = self.topology.as_ref();
        let start = topology
            .and_then(|topology| topology.sorted_by_id().ok())
            .and_then(|ring| ring.first().map(|(_, index)| *index));

        RingIterator {
            topology,
            start: start.unwrap_or_default(),
            next: start,
            remaining: topology.map_or(0, Topology::len),
        }
    }
}

impl<'a, S> IntoIterator for &'a Chord<S> {
    type Item = &'a Node;

    type IntoIter = RingIterator<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.ring()
    }
}
