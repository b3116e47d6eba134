//! Computer memory.

use std::collections::BTreeMap;
use std::iter;

/// How far past the end of the dense region a write may land and still grow
/// the dense region instead of spilling into the sparse map.
const DENSE_SLACK: usize = 4096;

/// An unbounded address space where every address starts out as zero.
///
/// The program image and anything written close to it lives in a vector.
/// Writes to far away addresses are kept in a map so that a program poking
/// at a huge address does not allocate everything in between.
#[derive(Debug, Clone, Default)]
pub struct Memory {
    dense: Vec<i64>,
    sparse: BTreeMap<usize, i64>,
}

/// Memories are equal when every address holds the same value, however the
/// values happen to be stored.
impl PartialEq for Memory {
    fn eq(&self, other: &Self) -> bool {
        let written = |(_, value): &(usize, i64)| *value != 0;
        self.iter().filter(written).eq(other.iter().filter(written))
    }
}

impl Eq for Memory {}

impl Memory {
    /// Construct memory containing a copy of the given program.
    pub fn new(program: &[i64]) -> Self {
        Self {
            dense: program.to_vec(),
            sparse: BTreeMap::new(),
        }
    }

    /// Returns the value at the given address, or zero if it was never
    /// written.
    pub fn get(&self, addr: usize) -> i64 {
        match self.dense.get(addr) {
            Some(value) => *value,
            None => self.sparse.get(&addr).copied().unwrap_or(0),
        }
    }

    /// Sets the value at the given address.
    pub fn set(&mut self, addr: usize, value: i64) {
        *self.get_mut(addr) = value;
    }

    /// Returns a mutable reference to the value at the given address,
    /// allocating it if necessary.
    pub fn get_mut(&mut self, addr: usize) -> &mut i64 {
        if addr >= self.dense.len() && addr - self.dense.len() < DENSE_SLACK {
            self.grow(addr + 1);
        }
        match self.dense.get_mut(addr) {
            Some(value) => value,
            None => self.sparse.entry(addr).or_insert(0),
        }
    }

    /// One past the highest address that has been allocated.
    pub fn len(&self) -> usize {
        let sparse = self.sparse.keys().next_back().map_or(0, |addr| addr + 1);
        self.dense.len().max(sparse)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The contiguous region of memory starting at address zero.
    ///
    /// Addresses that were spilled into the sparse map are not included.
    pub fn as_slice(&self) -> &[i64] {
        &self.dense
    }

    /// Iterate over every allocated address and its value in address order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, i64)> + '_ {
        self.dense
            .iter()
            .copied()
            .enumerate()
            .chain(self.sparse.iter().map(|(addr, value)| (*addr, *value)))
    }

    /// Copy out `len` values starting at `start`, zero-filling anything that
    /// was never written.
    pub fn range(&self, start: usize, len: usize) -> Vec<i64> {
        (start..start + len).map(|addr| self.get(addr)).collect()
    }

    fn grow(&mut self, new_len: usize) {
        // Pull in any sparse values that the dense region now covers.
        let start = self.dense.len();
        self.dense.extend(iter::repeat(0).take(new_len - start));
        let moved: Vec<_> = self.sparse.range(start..new_len).map(|(a, v)| (*a, *v)).collect();
        for (addr, value) in moved {
            self.sparse.remove(&addr);
            self.dense[addr] = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn unwritten_addresses_are_zero() {
        let mem = Memory::new(&[1, 2, 3]);
        assert_eq!(mem.get(2), 3);
        assert_eq!(mem.get(3), 0);
        assert_eq!(mem.get(1_000_000_000), 0);
    }

    #[test]
    fn writes_near_the_end_grow_dense() {
        let mut mem = Memory::new(&[1, 2, 3]);
        mem.set(10, 7);
        assert_eq!(mem.as_slice().len(), 11);
        assert_eq!(mem.get(10), 7);
        assert_eq!(mem.get(9), 0);
        assert_eq!(mem.len(), 11);
    }

    #[test]
    fn writes_far_away_are_sparse() {
        let mut mem = Memory::new(&[1, 2, 3]);
        mem.set(1 << 40, -5);
        assert_eq!(mem.as_slice(), &[1, 2, 3]);
        assert_eq!(mem.get(1 << 40), -5);
        assert_eq!(mem.len(), (1 << 40) + 1);
        assert_eq!(mem.iter().last(), Some((1 << 40, -5)));
    }

    #[test]
    fn sparse_values_move_when_dense_grows() {
        let mut mem = Memory::new(&[]);
        mem.set(DENSE_SLACK + 10, 42);
        assert_eq!(mem.as_slice().len(), 0);
        mem.set(DENSE_SLACK - 1, 1);
        mem.set(DENSE_SLACK + 20, 2);
        assert_eq!(mem.as_slice().len(), DENSE_SLACK + 21);
        assert_eq!(mem.get(DENSE_SLACK + 10), 42);
        assert_eq!(mem.iter().filter(|(_, v)| *v != 0).count(), 3);
    }

    #[test]
    fn construction_copies_the_program() {
        let mut program = vec![1, 2, 3];
        let mem = Memory::new(&program);
        program[0] = 99;
        assert_eq!(mem.get(0), 1);
    }

    #[test]
    fn equality_ignores_storage() {
        let mut a = Memory::new(&[1, 2]);
        a.set(DENSE_SLACK + 100, 3);
        let mut b = Memory::new(&[1, 2, 0, 0]);
        b.set(DENSE_SLACK + 50, 0);
        b.set(DENSE_SLACK + 100, 3);
        assert_ne!(a.as_slice().len(), b.as_slice().len());
        assert_eq!(a, b);
        b.set(0, 7);
        assert_ne!(a, b);
    }

    #[test]
    fn range_zero_fills() {
        let mem = Memory::new(&[4, 5]);
        assert_eq!(mem.range(1, 3), vec![5, 0, 0]);
    }
}
