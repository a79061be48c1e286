//! Catalog building: rotation expansion, adjacency derivation, validation
//!
//! Building happens once, offline from the solver's point of view. Prototypes
//! are expanded into distinct rotation variants, every variant/direction pair
//! gets its set of compatible neighbors from the face relation, and exclusion
//! lists are subtracted here so the solver only ever intersects finished sets.

use ndarray::Array2;

use crate::catalog::faces::FaceSignature;
use crate::catalog::module::{ModuleId, ModulePrototype, ModuleVariant};
use crate::io::error::{GenerationError, Result};
use crate::solver::bitset::ModuleBitset;
use crate::spatial::grid::{ALL_DIRECTIONS, Direction};

/// Immutable set of module variants with precomputed adjacency
///
/// Shared read-only by every cell of every run; cheap to clone behind an
/// `Arc` for concurrent independent runs. The solver never mutates it.
#[derive(Clone, Debug)]
pub struct ModuleCatalog {
    variants: Vec<ModuleVariant>,
    /// `supported[[variant, direction]]` holds every variant allowed adjacent
    /// in that direction, exclusions already subtracted
    supported: Array2<ModuleBitset>,
    air: ModuleId,
}

impl ModuleCatalog {
    /// Build a catalog from prototypes
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The prototype list is empty
    /// - Any prototype has a non-positive weight
    /// - No prototype qualifies as the air fallback (meshless, connector 0,
    ///   symmetric/invariant on all six faces)
    /// - An exclusion names a prototype that does not exist
    pub fn build(prototypes: &[ModulePrototype]) -> Result<Self> {
        if prototypes.is_empty() {
            return Err(GenerationError::EmptyCatalog);
        }
        for prototype in prototypes {
            if prototype.weight <= 0.0 {
                return Err(GenerationError::NonPositiveWeight {
                    prototype: prototype.name.clone(),
                    weight: prototype.weight,
                });
            }
        }

        let variants = expand_prototypes(prototypes);
        let air = variants
            .iter()
            .find(|variant| is_air(variant))
            .map(|variant| variant.id)
            .ok_or(GenerationError::MissingAirModule)?;

        let mut supported = derive_adjacency(&variants);
        apply_exclusions(prototypes, &variants, &mut supported)?;

        Ok(Self {
            variants,
            supported,
            air,
        })
    }

    /// All variants in id order
    pub fn variants(&self) -> &[ModuleVariant] {
        &self.variants
    }

    /// Number of variants
    pub const fn len(&self) -> usize {
        self.variants.len()
    }

    /// Whether the catalog holds no variants (never true once built)
    pub const fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Variant with the given id
    pub fn variant(&self, id: ModuleId) -> Option<&ModuleVariant> {
        self.variants.get(id)
    }

    /// Sampling weight of a variant, zero for unknown ids
    pub fn weight(&self, id: ModuleId) -> f64 {
        self.variants.get(id).map_or(0.0, |variant| variant.weight)
    }

    /// Id of the designated air fallback variant
    pub const fn air(&self) -> ModuleId {
        self.air
    }

    /// Variants allowed adjacent to `module` in `direction`
    pub fn supported(&self, module: ModuleId, direction: Direction) -> Option<&ModuleBitset> {
        self.supported.get([module, direction.index()])
    }

    /// Resolve a name to a variant id
    ///
    /// Matches an exact variant name (`corner_1`) first, then falls back to
    /// the rotation-0 variant of a prototype with that name.
    pub fn resolve(&self, name: &str) -> Option<ModuleId> {
        let rotation_zero = format!("{name}_0");
        self.variants
            .iter()
            .find(|variant| variant.name == name)
            .or_else(|| {
                self.variants
                    .iter()
                    .find(|variant| variant.name == rotation_zero)
            })
            .map(|variant| variant.id)
    }
}

/// Expand each prototype into its distinct rotation variants
///
/// Rotation `r` places the base horizontal face `(slot + r) % 4` at `slot`
/// and advances non-invariant vertical rotation indices by `r`. Rotations
/// whose six faces duplicate an already-kept variant of the same prototype
/// are skipped, so fully symmetric modules expand to a single variant.
fn expand_prototypes(prototypes: &[ModulePrototype]) -> Vec<ModuleVariant> {
    let mut variants = Vec::new();
    for (index, prototype) in prototypes.iter().enumerate() {
        let mut kept: Vec<[FaceSignature; 6]> = Vec::new();
        for rotation in 0..4u8 {
            let faces = rotated_faces(&prototype.faces, rotation);
            if kept.contains(&faces) {
                continue;
            }
            kept.push(faces);
            variants.push(ModuleVariant {
                id: variants.len(),
                prototype: index,
                name: format!("{}_{rotation}", prototype.name),
                mesh: prototype.mesh,
                rotation,
                faces,
                weight: prototype.weight,
                to_tags: prototype.to_tags.clone(),
                from_tags: prototype.from_tags.clone(),
            });
        }
    }
    variants
}

fn rotated_faces(faces: &[FaceSignature; 6], rotation: u8) -> [FaceSignature; 6] {
    let fallback = FaceSignature::horizontal_symmetric(0);
    std::array::from_fn(|slot| {
        if slot < 4 {
            let source = (slot + rotation as usize) % 4;
            faces.get(source).copied().unwrap_or(fallback)
        } else {
            faces
                .get(slot)
                .map(|face| face.rotated(rotation))
                .unwrap_or(fallback)
        }
    })
}

fn is_air(variant: &ModuleVariant) -> bool {
    variant.mesh.is_none()
        && variant.faces.iter().all(|face| match *face {
            FaceSignature::Horizontal {
                connector,
                symmetric,
                ..
            } => connector == 0 && symmetric,
            FaceSignature::Vertical {
                connector,
                invariant,
                ..
            } => connector == 0 && invariant,
        })
}

/// Fill `supported[[a, d]]` with every variant whose opposing face matches
fn derive_adjacency(variants: &[ModuleVariant]) -> Array2<ModuleBitset> {
    let count = variants.len();
    let mut supported = Array2::from_elem((count, 6), ModuleBitset::new(count));
    for variant in variants {
        for direction in ALL_DIRECTIONS {
            let Some(face) = variant.face(direction) else {
                continue;
            };
            let Some(set) = supported.get_mut([variant.id, direction.index()]) else {
                continue;
            };
            for other in variants {
                let matches = other
                    .face(direction.opposite())
                    .is_some_and(|opposing| face.compatible(*opposing));
                if matches {
                    set.insert(other.id);
                }
            }
        }
    }
    supported
}

/// Subtract exclusion lists from the support table
///
/// Exclusions are applied symmetrically: forbidding `b` next to `a` in `d`
/// also removes `a` from `b`'s set in the opposite direction, otherwise
/// propagation from one side would fail to prune the other.
fn apply_exclusions(
    prototypes: &[ModulePrototype],
    variants: &[ModuleVariant],
    supported: &mut Array2<ModuleBitset>,
) -> Result<()> {
    for (index, prototype) in prototypes.iter().enumerate() {
        for direction in ALL_DIRECTIONS {
            let Some(names) = prototype.excluded.get(direction.index()) else {
                continue;
            };
            for name in names {
                let excluded_index = prototypes
                    .iter()
                    .position(|other| &other.name == name)
                    .ok_or_else(|| GenerationError::UnknownModule { name: name.clone() })?;
                let from: Vec<ModuleId> = variants
                    .iter()
                    .filter(|variant| variant.prototype == index)
                    .map(|variant| variant.id)
                    .collect();
                let to: Vec<ModuleId> = variants
                    .iter()
                    .filter(|variant| variant.prototype == excluded_index)
                    .map(|variant| variant.id)
                    .collect();
                for &a in &from {
                    for &b in &to {
                        if let Some(set) = supported.get_mut([a, direction.index()]) {
                            set.remove(b);
                        }
                        if let Some(set) = supported.get_mut([b, direction.opposite().index()]) {
                            set.remove(a);
                        }
                    }
                }
            }
        }
    }
    Ok(())
}
