use bitvec::vec::BitVec;

use crate::solver::bitset::ModuleBitset;
use crate::spatial::grid::DomainGrid;

/// Undo record for one collapse-and-propagate step
///
/// Captures the pre-collapse domain of the decided cell, the module ids
/// already tried and failed at that cell within the current backtrack
/// episode, and the pre-change domain of every other cell this step's
/// propagation altered. Rollback replays the side effects in reverse; the
/// whole grid is never cloned.
#[derive(Clone, Debug)]
pub struct StepRecord {
    /// Flat index of the collapsed cell
    pub cell: usize,
    /// Domain of the collapsed cell before the choice was made
    pub domain_before: ModuleBitset,
    /// Choices already attempted at this cell, excluded from retries
    pub tried: ModuleBitset,
    /// `(cell, prior domain)` snapshots in the order propagation shrank them
    pub side_effects: Vec<(usize, ModuleBitset)>,
    touched: BitVec,
}

impl StepRecord {
    /// Start a record for a collapse at `cell`
    pub fn new(cell: usize, domain_before: ModuleBitset, cell_count: usize) -> Self {
        let tried = ModuleBitset::new(domain_before.capacity());
        Self {
            cell,
            domain_before,
            tried,
            side_effects: Vec::new(),
            touched: BitVec::repeat(false, cell_count),
        }
    }

    /// Snapshot a cell's domain before propagation changes it
    ///
    /// Only the first change per cell is kept; later shrinks within the same
    /// step restore through the earliest snapshot.
    pub fn record_side_effect(&mut self, cell: usize, prior: &ModuleBitset) {
        if self.touched.get(cell).as_deref() == Some(&true) {
            return;
        }
        if let Some(mut bit) = self.touched.get_mut(cell) {
            *bit = true;
        }
        self.side_effects.push((cell, prior.clone()));
    }

    /// Restore the grid to the state captured by this record
    ///
    /// Side effects are undone in reverse order, then the collapsed cell gets
    /// its pre-collapse domain back (it may itself appear among the side
    /// effects when propagation looped around to it).
    pub fn undo(&self, grid: &mut DomainGrid) {
        for (cell, prior) in self.side_effects.iter().rev() {
            if let Some(domain) = grid.domain_at_mut(*cell) {
                *domain = prior.clone();
            }
        }
        if let Some(domain) = grid.domain_at_mut(self.cell) {
            *domain = self.domain_before.clone();
        }
    }

    /// Candidates not yet attempted at this cell
    pub fn remaining(&self) -> ModuleBitset {
        let mut remaining = self.domain_before.clone();
        remaining.subtract(&self.tried);
        remaining
    }

    /// Clear propagation snapshots so the record can back a retry
    ///
    /// The tried set is kept; only side effects (already undone) are dropped.
    pub fn reset_for_retry(&mut self) {
        self.side_effects.clear();
        self.touched.fill(false);
    }
}

/// Step records of the current attempt, newest last
///
/// Discarded wholesale after a successful solve or at every restart.
#[derive(Clone, Debug, Default)]
pub struct History {
    records: Vec<StepRecord>,
}

impl History {
    /// Create an empty history
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Push a completed step
    pub fn push(&mut self, record: StepRecord) {
        self.records.push(record);
    }

    /// Pop the most recent step, if any
    pub fn pop(&mut self) -> Option<StepRecord> {
        self.records.pop()
    }

    /// Number of recorded steps
    pub const fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no steps are recorded
    pub const fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
