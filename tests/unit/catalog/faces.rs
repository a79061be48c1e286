//! Validates the face compatibility relation between opposing faces

#[cfg(test)]
mod tests {
    use voxelwave::catalog::faces::FaceSignature;

    #[test]
    fn test_symmetric_pair_matches() {
        let a = FaceSignature::horizontal_symmetric(1);
        let b = FaceSignature::horizontal_symmetric(1);
        assert!(a.compatible(b));
    }

    // Asymmetric horizontal faces match only when exactly one is flipped
    #[test]
    fn test_flipped_pairing() {
        let plain = FaceSignature::horizontal(2, false);
        let flipped = FaceSignature::horizontal(2, true);

        assert!(plain.compatible(flipped));
        assert!(flipped.compatible(plain));
        assert!(!plain.compatible(plain));
        assert!(!flipped.compatible(flipped));
    }

    // A symmetric face never pairs with an asymmetric one of the same connector
    #[test]
    fn test_symmetric_does_not_match_asymmetric() {
        let symmetric = FaceSignature::horizontal_symmetric(2);
        let flipped = FaceSignature::horizontal(2, true);
        assert!(symmetric.compatible(flipped), "one flipped side matches");

        let plain = FaceSignature::horizontal(2, false);
        assert!(!symmetric.compatible(plain));
    }

    #[test]
    fn test_differing_connectors_never_match() {
        let a = FaceSignature::horizontal_symmetric(1);
        let b = FaceSignature::horizontal_symmetric(2);
        assert!(!a.compatible(b));

        let c = FaceSignature::vertical_invariant(1);
        let d = FaceSignature::vertical_invariant(2);
        assert!(!c.compatible(d));
    }

    #[test]
    fn test_vertical_invariant_pair_matches() {
        let a = FaceSignature::vertical_invariant(3);
        let b = FaceSignature::vertical_invariant(3);
        assert!(a.compatible(b));
    }

    // Non-invariant vertical faces need equal rotation indices
    #[test]
    fn test_vertical_rotation_must_agree() {
        let rot0 = FaceSignature::vertical(3, 0);
        let rot1 = FaceSignature::vertical(3, 1);
        let other_rot0 = FaceSignature::vertical(3, 0);

        assert!(rot0.compatible(other_rot0));
        assert!(!rot0.compatible(rot1));
    }

    // Mixing invariant with non-invariant never matches
    #[test]
    fn test_invariant_does_not_match_variant() {
        let invariant = FaceSignature::vertical_invariant(3);
        let variant = FaceSignature::vertical(3, 0);
        assert!(!invariant.compatible(variant));
        assert!(!variant.compatible(invariant));
    }

    // The horizontal and vertical clauses of the rule are disjoint
    #[test]
    fn test_horizontal_never_matches_vertical() {
        let horizontal = FaceSignature::horizontal_symmetric(0);
        let vertical = FaceSignature::vertical_invariant(0);
        assert!(!horizontal.compatible(vertical));
        assert!(!vertical.compatible(horizontal));
    }

    // Quarter turns advance only non-invariant vertical rotation indices
    #[test]
    fn test_rotation_advances_variant_faces_only() {
        let variant = FaceSignature::vertical(2, 1);
        assert_eq!(variant.rotated(2), FaceSignature::vertical(2, 3));
        assert_eq!(variant.rotated(3), FaceSignature::vertical(2, 0));

        let invariant = FaceSignature::vertical_invariant(2);
        assert_eq!(invariant.rotated(3), invariant);

        let horizontal = FaceSignature::horizontal_symmetric(2);
        assert_eq!(horizontal.rotated(1), horizontal);
    }
}
