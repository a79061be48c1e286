use rand::{Rng, rngs::StdRng};

use crate::catalog::builder::ModuleCatalog;
use crate::catalog::module::ModuleId;
use crate::solver::bitset::ModuleBitset;
use crate::spatial::grid::{Coordinate, DomainGrid};

/// Scan the grid for an undecided cell with the fewest remaining candidates
///
/// Every call scans the whole grid; no entropy cache is kept across steps.
/// All cells tied at the minimum are collected and one is picked uniformly
/// at random so generation is not biased toward scan order. Returns `None`
/// when every cell is decided, which is the solver's success condition.
pub fn select_min_entropy_cell(grid: &DomainGrid, rng: &mut StdRng) -> Option<Coordinate> {
    let mut min = usize::MAX;
    let mut tied: Vec<Coordinate> = Vec::new();

    for coordinate in grid.volume().coordinates() {
        let Some(domain) = grid.domain(coordinate) else {
            continue;
        };
        let size = domain.len();
        if size <= 1 {
            continue;
        }
        if size < min {
            min = size;
            tied.clear();
            tied.push(coordinate);
        } else if size == min {
            tied.push(coordinate);
        }
    }

    if tied.is_empty() {
        return None;
    }
    let selection = rng.random_range(0..tied.len());
    tied.get(selection).copied()
}

/// Choose one module id from `candidates` proportionally to catalog weight
///
/// Cumulative-sum sampling: a single draw in `[0, total)` selects the first
/// candidate whose running weight sum exceeds it. A non-positive total still
/// yields the first candidate; weights are not validated here, that is the
/// catalog's responsibility.
pub fn weighted_choice(
    candidates: &ModuleBitset,
    catalog: &ModuleCatalog,
    rng: &mut StdRng,
) -> Option<ModuleId> {
    let first = candidates.first()?;
    let total: f64 = candidates.ones().map(|module| catalog.weight(module)).sum();
    if total <= 0.0 {
        return Some(first);
    }

    let mut rand_val = rng.random::<f64>() * total;
    let mut last = first;
    for module in candidates.ones() {
        rand_val -= catalog.weight(module);
        if rand_val <= 0.0 {
            return Some(module);
        }
        last = module;
    }
    Some(last)
}
