//! Validates rotation expansion, adjacency derivation, and catalog validation

#[cfg(test)]
mod tests {
    use voxelwave::GenerationError;
    use voxelwave::catalog::builder::ModuleCatalog;
    use voxelwave::catalog::faces::FaceSignature;
    use voxelwave::catalog::module::{MeshId, ModulePrototype};
    use voxelwave::spatial::grid::{ALL_DIRECTIONS, Direction};

    fn air() -> ModulePrototype {
        let h = FaceSignature::horizontal_symmetric(0);
        let v = FaceSignature::vertical_invariant(0);
        ModulePrototype::new("air", [h, h, h, h, v, v])
    }

    // Fully symmetric prototypes expand to one variant, two-fold symmetric to
    // two, and asymmetric ones to four
    #[test]
    fn test_rotation_expansion_counts() {
        let h0 = FaceSignature::horizontal_symmetric(0);
        let h1 = FaceSignature::horizontal_symmetric(1);
        let v = FaceSignature::vertical_invariant(0);

        let prototypes = vec![
            air(),
            ModulePrototype::new("straight", [h1, h0, h1, h0, v, v]).with_mesh(MeshId(1)),
            ModulePrototype::new("corner", [h1, h1, h0, h0, v, v]).with_mesh(MeshId(2)),
        ];
        let catalog = ModuleCatalog::build(&prototypes).unwrap();

        let count_of = |name: &str| {
            catalog
                .variants()
                .iter()
                .filter(|v| v.name.starts_with(name))
                .count()
        };
        assert_eq!(count_of("air"), 1);
        assert_eq!(count_of("straight"), 2);
        assert_eq!(count_of("corner"), 4);
        assert_eq!(catalog.len(), 7);
    }

    // Rotation moves horizontal faces between slots: the corner's two open
    // sides walk around the module as the rotation index grows
    #[test]
    fn test_rotation_moves_horizontal_faces() {
        let h0 = FaceSignature::horizontal_symmetric(0);
        let h1 = FaceSignature::horizontal_symmetric(1);
        let v = FaceSignature::vertical_invariant(0);

        let prototypes = vec![
            air(),
            ModulePrototype::new("corner", [h1, h1, h0, h0, v, v]).with_mesh(MeshId(1)),
        ];
        let catalog = ModuleCatalog::build(&prototypes).unwrap();

        let corner_1 = catalog.resolve("corner_1").unwrap();
        let variant = catalog.variant(corner_1).unwrap();
        // Slot i of rotation 1 holds base face (i + 1) % 4
        assert_eq!(variant.face(Direction::Left), Some(&h1));
        assert_eq!(variant.face(Direction::Back), Some(&h0));
        assert_eq!(variant.face(Direction::Right), Some(&h0));
        assert_eq!(variant.face(Direction::Forward), Some(&h1));
    }

    // Non-invariant vertical faces advance their rotation index per variant
    #[test]
    fn test_rotation_advances_vertical_faces() {
        let h0 = FaceSignature::horizontal_symmetric(0);
        let h1 = FaceSignature::horizontal_symmetric(1);
        let v = FaceSignature::vertical_invariant(0);
        let v_keyed = FaceSignature::vertical(1, 0);

        let prototypes = vec![
            air(),
            ModulePrototype::new("ramp", [h1, h0, h0, h0, v, v_keyed]).with_mesh(MeshId(1)),
        ];
        let catalog = ModuleCatalog::build(&prototypes).unwrap();

        let ramp_2 = catalog.resolve("ramp_2").unwrap();
        let variant = catalog.variant(ramp_2).unwrap();
        assert_eq!(variant.face(Direction::Up), Some(&FaceSignature::vertical(1, 2)));
        assert_eq!(variant.face(Direction::Down), Some(&v));
    }

    // The support table is symmetric: b supports a from the opposite side
    // whenever a supports b
    #[test]
    fn test_adjacency_is_mutual() {
        let h0 = FaceSignature::horizontal_symmetric(0);
        let h1 = FaceSignature::horizontal_symmetric(1);
        let v = FaceSignature::vertical_invariant(0);

        let prototypes = vec![
            air(),
            ModulePrototype::new("straight", [h1, h0, h1, h0, v, v]).with_mesh(MeshId(1)),
            ModulePrototype::new("corner", [h1, h1, h0, h0, v, v]).with_mesh(MeshId(2)),
        ];
        let catalog = ModuleCatalog::build(&prototypes).unwrap();

        for a in 0..catalog.len() {
            for direction in ALL_DIRECTIONS {
                let supported = catalog.supported(a, direction).unwrap();
                for b in supported.ones() {
                    let reverse = catalog.supported(b, direction.opposite()).unwrap();
                    assert!(
                        reverse.contains(a),
                        "{a} supports {b} in {direction:?} but not vice versa"
                    );
                }
            }
        }
    }

    // Air supports air on every side; a straight pipe's open end never
    // accepts air
    #[test]
    fn test_adjacency_follows_connectors() {
        let h0 = FaceSignature::horizontal_symmetric(0);
        let h1 = FaceSignature::horizontal_symmetric(1);
        let v = FaceSignature::vertical_invariant(0);

        let prototypes = vec![
            air(),
            ModulePrototype::new("straight", [h1, h0, h1, h0, v, v]).with_mesh(MeshId(1)),
        ];
        let catalog = ModuleCatalog::build(&prototypes).unwrap();
        let air_id = catalog.air();
        let straight = catalog.resolve("straight_0").unwrap();

        for direction in ALL_DIRECTIONS {
            assert!(catalog.supported(air_id, direction).unwrap().contains(air_id));
        }
        // straight_0 opens Left and Right (connector 1): air is no neighbor
        assert!(
            !catalog
                .supported(straight, Direction::Left)
                .unwrap()
                .contains(air_id)
        );
        assert!(
            catalog
                .supported(straight, Direction::Back)
                .unwrap()
                .contains(air_id)
        );
    }

    // Exclusions subtract from both sides of the support table
    #[test]
    fn test_exclusions_are_symmetric() {
        let h0 = FaceSignature::horizontal_symmetric(0);
        let v = FaceSignature::vertical_invariant(0);

        let prototypes = vec![
            air(),
            ModulePrototype::new("slab", [h0, h0, h0, h0, v, v])
                .with_mesh(MeshId(1))
                .with_excluded(Direction::Right, "slab"),
        ];
        let catalog = ModuleCatalog::build(&prototypes).unwrap();
        let slab = catalog.resolve("slab_0").unwrap();

        assert!(
            !catalog
                .supported(slab, Direction::Right)
                .unwrap()
                .contains(slab)
        );
        assert!(
            !catalog
                .supported(slab, Direction::Left)
                .unwrap()
                .contains(slab)
        );
        // Air neighbors are untouched
        assert!(
            catalog
                .supported(slab, Direction::Right)
                .unwrap()
                .contains(catalog.air())
        );
    }

    #[test]
    fn test_build_rejects_empty_prototypes() {
        assert!(matches!(
            ModuleCatalog::build(&[]),
            Err(GenerationError::EmptyCatalog)
        ));
    }

    #[test]
    fn test_build_rejects_non_positive_weight() {
        let bad = vec![air().with_weight(0.0)];
        assert!(matches!(
            ModuleCatalog::build(&bad),
            Err(GenerationError::NonPositiveWeight { .. })
        ));
    }

    #[test]
    fn test_build_requires_air_fallback() {
        let h1 = FaceSignature::horizontal_symmetric(1);
        let v = FaceSignature::vertical_invariant(0);
        let solid_only = vec![
            ModulePrototype::new("solid", [h1, h1, h1, h1, v, v]).with_mesh(MeshId(1)),
        ];
        assert!(matches!(
            ModuleCatalog::build(&solid_only),
            Err(GenerationError::MissingAirModule)
        ));
    }

    #[test]
    fn test_build_rejects_unknown_exclusion() {
        let bad = vec![air().with_excluded(Direction::Up, "ghost")];
        assert!(matches!(
            ModuleCatalog::build(&bad),
            Err(GenerationError::UnknownModule { .. })
        ));
    }

    // Prototype names resolve to their rotation-0 variant, exact variant
    // names take precedence
    #[test]
    fn test_resolve_names() {
        let h0 = FaceSignature::horizontal_symmetric(0);
        let h1 = FaceSignature::horizontal_symmetric(1);
        let v = FaceSignature::vertical_invariant(0);

        let prototypes = vec![
            air(),
            ModulePrototype::new("corner", [h1, h1, h0, h0, v, v]).with_mesh(MeshId(1)),
        ];
        let catalog = ModuleCatalog::build(&prototypes).unwrap();

        let by_prototype = catalog.resolve("corner").unwrap();
        let by_variant = catalog.resolve("corner_0").unwrap();
        assert_eq!(by_prototype, by_variant);

        let rotated = catalog.resolve("corner_2").unwrap();
        assert_ne!(by_prototype, rotated);
        assert_eq!(catalog.resolve("ghost"), None);
    }
}
