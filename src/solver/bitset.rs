use bitvec::vec::BitVec;
use std::fmt;

use crate::catalog::module::ModuleId;

/// Fixed-size bitset over the module ids of one catalog
///
/// Backs both cell domains and the catalog's per-direction support sets.
/// Provides O(1) membership testing and word-wise set operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleBitset {
    bits: BitVec,
    capacity: usize,
}

impl ModuleBitset {
    /// Create a bitset with no modules present
    pub fn new(capacity: usize) -> Self {
        Self {
            bits: BitVec::repeat(false, capacity),
            capacity,
        }
    }

    /// Create a bitset containing every module id below `capacity`
    pub fn all(capacity: usize) -> Self {
        Self {
            bits: BitVec::repeat(true, capacity),
            capacity,
        }
    }

    /// Create a bitset holding exactly one module id
    pub fn single(capacity: usize, module: ModuleId) -> Self {
        let mut set = Self::new(capacity);
        set.insert(module);
        set
    }

    /// Number of ids this set can hold
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Insert a module id; ids at or above capacity are ignored
    pub fn insert(&mut self, module: ModuleId) {
        if module < self.capacity {
            self.bits.set(module, true);
        }
    }

    /// Remove a module id
    pub fn remove(&mut self, module: ModuleId) {
        if module < self.capacity {
            self.bits.set(module, false);
        }
    }

    /// Test module membership
    pub fn contains(&self, module: ModuleId) -> bool {
        self.bits.get(module).as_deref() == Some(&true)
    }

    /// Intersect this set with another in place
    pub fn intersect_with(&mut self, other: &Self) {
        self.bits &= &other.bits;
    }

    /// Add every member of `other` to this set
    pub fn union_with(&mut self, other: &Self) {
        self.bits |= &other.bits;
    }

    /// Remove every member of `other` from this set
    pub fn subtract(&mut self, other: &Self) {
        for module in other.bits.iter_ones() {
            if module < self.capacity {
                self.bits.set(module, false);
            }
        }
    }

    /// Create a new set containing the intersection
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.intersect_with(other);
        result
    }

    /// Test if no modules are present
    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    /// Count modules in the set
    pub fn len(&self) -> usize {
        self.bits.count_ones()
    }

    /// Smallest module id in the set, if any
    pub fn first(&self) -> Option<ModuleId> {
        self.bits.first_one()
    }

    /// Iterate member ids in ascending order
    pub fn ones(&self) -> impl Iterator<Item = ModuleId> + '_ {
        self.bits.iter_ones()
    }

    /// Extract all member ids as a vector
    pub fn to_vec(&self) -> Vec<ModuleId> {
        self.bits.iter_ones().collect()
    }
}

impl fmt::Display for ModuleBitset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ModuleBitset({} modules: {:?})", self.len(), self.to_vec())
    }
}
