use crate::Error;

/// position on the identifier circle, always within [0, 2^m)
pub type Identifier = u64;

/// IdentifierSpace describes the circle of 2^m identifiers nodes and keys are placed on
/// all arithmetic wraps around modulo 2^m
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IdentifierSpace {
    bits: u32,
}

impl IdentifierSpace {
    /// 2^63 is the largest circle where the sum of two identifiers still fits into `u64`
    pub const MAX_BITS: u32 = 63;

    pub fn new(bits: u32) -> Result<IdentifierSpace, Error> {
        if bits == 0 || bits > Self::MAX_BITS {
            return Err(Error::InvalidIdentifierBits(bits));
        }

        Ok(IdentifierSpace { bits })
    }

    /// m, the number of bits of an identifier and the number of entries of every finger table
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// number of positions on the circle (2^m)
    pub fn size(&self) -> u64 {
        1 << self.bits
    }

    /// Returns true if `id` is a valid position on the circle.
    pub fn contains(&self, id: Identifier) -> bool {
        id < self.size()
    }

    /// maps an arbitrary hash onto the circle
    pub fn reduce(&self, hash: u64) -> Identifier {
        hash & (self.size() - 1)
    }

    /// (a + b) mod 2^m
    pub fn add(&self, a: Identifier, b: u64) -> Identifier {
        self.reduce(self.reduce(a) + self.reduce(b))
    }

    /// (a - b) mod 2^m
    pub fn sub(&self, a: Identifier, b: u64) -> Identifier {
        self.reduce(self.reduce(a) + self.size() - self.reduce(b))
    }

    /// start of the i-th finger of node `id`: (id + 2^(i-1)) mod 2^m
    ///
    /// # Arguments
    ///
    /// * `id` - identifier of the node owning the finger table
    /// * `i` - finger index, counting from 1 up to m
    pub fn finger_start(&self, id: Identifier, i: u32) -> Identifier {
        debug_assert!((1..=self.bits).contains(&i));
        self.add(id, 1 << (i - 1))
    }
}

/// Cyclic interval test on the identifier circle, both bounds are inclusive
///
/// If `start <= end` the interval does not wrap and `key` has to lie in `start..=end`.
/// Otherwise the interval wraps around zero and covers `start..` as well as `..=end`.
pub fn in_interval(key: Identifier, start: Identifier, end: Identifier) -> bool {
    if start <= end {
        start <= key && key <= end
    } else {
        key >= start || key <= end
    }
}

#[cfg(test)]
mod tests {
    use super::{IdentifierSpace, in_interval};

    #[test]
    fn modular_arithmetic() {
        let space = IdentifierSpace::new(3).unwrap();

        assert_eq!(space.size(), 8);
        assert_eq!(space.bits(), 3);

        assert_eq!(space.add(5, 3), 0);
        assert_eq!(space.add(7, 7), 6);
        assert_eq!(space.sub(0, 1), 7);
        assert_eq!(space.sub(4, 1), 3);
        assert_eq!(space.reduce(13), 5);

        assert!(space.contains(7));
        assert!(!space.contains(8));
    }

    #[test]
    fn widest_space_does_not_overflow() {
        let space = IdentifierSpace::new(IdentifierSpace::MAX_BITS).unwrap();
        let last = space.size() - 1;

        assert_eq!(space.add(last, last), last - 1);
        assert_eq!(space.sub(0, 1), last);
        assert_eq!(space.finger_start(last, 63), (1 << 62) - 1);
    }

    #[test]
    fn finger_starts() {
        let space = IdentifierSpace::new(3).unwrap();

        let starts: Vec<u64> = (1..=3).map(|i| space.finger_start(3, i)).collect();
        assert_eq!(starts, vec![4, 5, 7]);

        let starts: Vec<u64> = (1..=3).map(|i| space.finger_start(5, i)).collect();
        assert_eq!(starts, vec![6, 7, 1]);
    }

    #[test]
    fn interval_without_wraparound() {
        assert!(in_interval(3, 1, 5));
        assert!(in_interval(1, 1, 5));
        assert!(in_interval(5, 1, 5));
        assert!(!in_interval(0, 1, 5));
        assert!(!in_interval(6, 1, 5));

        assert!(in_interval(4, 4, 4));
        assert!(!in_interval(3, 4, 4));
    }

    #[test]
    fn interval_with_wraparound() {
        assert!(in_interval(7, 5, 1));
        assert!(in_interval(0, 5, 1));
        assert!(in_interval(1, 5, 1));
        assert!(in_interval(5, 5, 1));
        assert!(!in_interval(3, 5, 1));
        assert!(!in_interval(2, 5, 1));
    }
}
