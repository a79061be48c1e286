use bitvec::vec::BitVec;

use crate::catalog::builder::ModuleCatalog;
use crate::solver::bitset::ModuleBitset;
use crate::solver::history::StepRecord;
use crate::spatial::grid::{ALL_DIRECTIONS, DomainGrid};

/// Empty domain reached at a pinned cell; propagation stopped immediately
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Contradiction {
    /// Flat index of the contradicted pinned cell
    pub cell: usize,
}

/// LIFO worklist of cells whose neighbors need re-checking
///
/// Membership is tracked bitwise so a cell is queued at most once at a time;
/// processing order affects performance, not the converged result.
#[derive(Clone, Debug)]
pub struct Worklist {
    stack: Vec<usize>,
    queued: BitVec,
}

impl Worklist {
    /// Create an empty worklist for a grid of `cell_count` cells
    pub fn new(cell_count: usize) -> Self {
        Self {
            stack: Vec::new(),
            queued: BitVec::repeat(false, cell_count),
        }
    }

    /// Queue a cell unless it is already waiting
    pub fn push(&mut self, cell: usize) {
        if self.queued.get(cell).as_deref() == Some(&true) {
            return;
        }
        if let Some(mut bit) = self.queued.get_mut(cell) {
            *bit = true;
        }
        self.stack.push(cell);
    }

    /// Take the most recently queued cell
    pub fn pop(&mut self) -> Option<usize> {
        let cell = self.stack.pop()?;
        if let Some(mut bit) = self.queued.get_mut(cell) {
            *bit = false;
        }
        Some(cell)
    }

    /// Drop all queued cells
    pub fn clear(&mut self) {
        self.stack.clear();
        self.queued.fill(false);
    }

    /// Whether no cells are queued
    pub const fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}

/// Restore arc-consistency outward from the cells already in `worklist`
///
/// For each popped cell and each in-bounds direction, the neighbor's domain
/// is intersected with the union of the catalog's precomputed support sets
/// over the source domain (exclusions were subtracted at catalog build; face
/// compatibility is never re-derived here). A strict shrink is snapshotted
/// into `record` when one is supplied, and the neighbor is requeued. An
/// emptied domain becomes the single air fallback, unless the cell is pinned,
/// which stops propagation immediately with a contradiction.
///
/// Terminates because every requeue corresponds to a strict domain shrink and
/// domain sizes are bounded below by one.
///
/// # Errors
///
/// Returns the contradicted pinned cell when its domain would become empty.
pub fn propagate(
    grid: &mut DomainGrid,
    catalog: &ModuleCatalog,
    worklist: &mut Worklist,
    mut record: Option<&mut StepRecord>,
) -> Result<(), Contradiction> {
    let volume = grid.volume();

    while let Some(cell) = worklist.pop() {
        let coordinate = volume.coordinate_of(cell);
        for direction in ALL_DIRECTIONS {
            let Some(next_coordinate) = volume.neighbor(coordinate, direction) else {
                continue;
            };

            let mut support = ModuleBitset::new(catalog.len());
            if let Some(domain) = grid.domain(coordinate) {
                for module in domain.ones() {
                    if let Some(allowed) = catalog.supported(module, direction) {
                        support.union_with(allowed);
                    }
                }
            }

            let next_cell = volume.flat_index(next_coordinate);
            let pinned = grid.is_pinned(next_cell);
            let Some(next_domain) = grid.domain_mut(next_coordinate) else {
                continue;
            };
            let filtered = next_domain.intersection(&support);
            if filtered.len() == next_domain.len() {
                continue;
            }

            if filtered.is_empty() && pinned {
                return Err(Contradiction { cell: next_cell });
            }

            if let Some(record) = record.as_deref_mut() {
                record.record_side_effect(next_cell, next_domain);
            }

            if filtered.is_empty() {
                *next_domain = ModuleBitset::single(catalog.len(), catalog.air());
            } else {
                *next_domain = filtered;
            }
            worklist.push(next_cell);
        }
    }

    Ok(())
}
