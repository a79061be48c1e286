//! Validates minimum-entropy cell selection and weighted module choice

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};
    use std::collections::HashSet;
    use voxelwave::catalog::builder::ModuleCatalog;
    use voxelwave::catalog::faces::FaceSignature;
    use voxelwave::catalog::module::{MeshId, ModulePrototype};
    use voxelwave::solver::bitset::ModuleBitset;
    use voxelwave::solver::selection::{select_min_entropy_cell, weighted_choice};
    use voxelwave::spatial::grid::{DomainGrid, GridVolume};

    fn two_module_catalog(block_weight: f64) -> ModuleCatalog {
        let h0 = FaceSignature::horizontal_symmetric(0);
        let h1 = FaceSignature::horizontal_symmetric(1);
        let v0 = FaceSignature::vertical_invariant(0);
        let v1 = FaceSignature::vertical_invariant(1);
        let prototypes = vec![
            ModulePrototype::new("air", [h0, h0, h0, h0, v0, v0]),
            ModulePrototype::new("block", [h1, h1, h1, h1, v1, v1])
                .with_mesh(MeshId(1))
                .with_weight(block_weight),
        ];
        ModuleCatalog::build(&prototypes).unwrap()
    }

    // The cell with the smallest multi-candidate domain wins
    #[test]
    fn test_selects_smallest_undecided_domain() {
        let volume = GridVolume::new(3, 1, 1);
        let mut grid = DomainGrid::full(volume, 4);
        if let Some(domain) = grid.domain_mut([1, 0, 0]) {
            domain.remove(0);
            domain.remove(1);
        }
        if let Some(domain) = grid.domain_mut([2, 0, 0]) {
            domain.remove(0);
        }

        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(select_min_entropy_cell(&grid, &mut rng), Some([1, 0, 0]));
    }

    // Decided cells are invisible to selection; a fully decided grid yields
    // None, the solver's success condition
    #[test]
    fn test_returns_none_when_all_decided() {
        let volume = GridVolume::new(2, 1, 2);
        let mut grid = DomainGrid::full(volume, 3);
        for coordinate in volume.coordinates() {
            if let Some(domain) = grid.domain_mut(coordinate) {
                *domain = ModuleBitset::single(3, 1);
            }
        }

        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(select_min_entropy_cell(&grid, &mut rng), None);
    }

    // Ties are broken at random, not by scan order
    #[test]
    fn test_tie_break_reaches_every_candidate() {
        let volume = GridVolume::new(2, 1, 1);
        let grid = DomainGrid::full(volume, 3);

        let mut picked = HashSet::new();
        for seed in 0..64 {
            let mut rng = StdRng::seed_from_u64(seed);
            if let Some(coordinate) = select_min_entropy_cell(&grid, &mut rng) {
                picked.insert(coordinate);
            }
        }
        assert_eq!(picked.len(), 2, "both tied cells should be selectable");
    }

    // Over many draws a weight-3 candidate wins roughly three times as often
    // as a weight-1 candidate
    #[test]
    fn test_weighted_choice_follows_weights() {
        let catalog = two_module_catalog(3.0);
        let candidates = ModuleBitset::all(catalog.len());
        let block = catalog.resolve("block").unwrap();

        let mut rng = StdRng::seed_from_u64(77);
        let trials = 20_000;
        let mut block_wins = 0;
        for _ in 0..trials {
            if weighted_choice(&candidates, &catalog, &mut rng) == Some(block) {
                block_wins += 1;
            }
        }

        let fraction = f64::from(block_wins) / f64::from(trials);
        assert!(
            (0.72..=0.78).contains(&fraction),
            "weight-3 candidate won {fraction} of draws, expected about 0.75"
        );
    }

    #[test]
    fn test_single_candidate_always_wins() {
        let catalog = two_module_catalog(1.0);
        let only = ModuleBitset::single(catalog.len(), 1);

        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..10 {
            assert_eq!(weighted_choice(&only, &catalog, &mut rng), Some(1));
        }
    }

    #[test]
    fn test_empty_candidates_yield_none() {
        let catalog = two_module_catalog(1.0);
        let none = ModuleBitset::new(catalog.len());

        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(weighted_choice(&none, &catalog, &mut rng), None);
    }
}
