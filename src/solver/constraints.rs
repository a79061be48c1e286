use crate::catalog::builder::ModuleCatalog;
use crate::catalog::module::{FROM_BOTTOM_TAG, ModuleId, ModuleVariant, TO_TOP_TAG};
use crate::catalog::faces::FaceSignature;
use crate::solver::bitset::ModuleBitset;
use crate::solver::propagation::Contradiction;
use crate::spatial::grid::{Coordinate, Direction, DomainGrid, GridVolume};

/// A coordinate whose module is fixed before solving
///
/// Pins are decorative or structural anchors: the cell is forced to exactly
/// this module, and an empty domain reached there later is a hard
/// contradiction instead of an air fallback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pin {
    /// Cell to force
    pub coordinate: Coordinate,
    /// Module the cell must hold in any successful solve
    pub module: ModuleId,
}

/// Force every pinned cell to its single module and mark it pinned
///
/// Returns the flat indices of cells whose domain actually changed, to seed
/// propagation. Re-applying to an already pinned grid changes nothing.
pub fn apply_pins(grid: &mut DomainGrid, pins: &[Pin]) -> Vec<usize> {
    let volume = grid.volume();
    let mut touched = Vec::new();
    for pin in pins {
        grid.set_pinned(pin.coordinate);
        let index = volume.flat_index(pin.coordinate);
        let Some(domain) = grid.domain_mut(pin.coordinate) else {
            continue;
        };
        let forced = ModuleBitset::single(domain.capacity(), pin.module);
        if *domain != forced {
            *domain = forced;
            touched.push(index);
        }
    }
    touched
}

/// Remove position-rule violators from every cell of the grid
///
/// One pass, idempotent: bottom-layer cells keep modules exposing an
/// invariant connector-0 Down face or carrying the from-bottom tag, top-layer
/// cells the mirror rule with the to-top tag, and cells on a side boundary
/// keep modules whose outward face is symmetric connector 0. A domain emptied
/// by these rules falls back to air; at a pinned cell that is a contradiction
/// and the pass stops. Returns the flat indices of changed cells.
///
/// # Errors
///
/// Returns the contradicted cell when a pinned module violates the rules.
pub fn apply_boundary_rules(
    grid: &mut DomainGrid,
    catalog: &ModuleCatalog,
) -> Result<Vec<usize>, Contradiction> {
    let volume = grid.volume();
    let mut touched = Vec::new();

    for coordinate in volume.coordinates() {
        let index = volume.flat_index(coordinate);
        let pinned = grid.is_pinned(index);
        let Some(domain) = grid.domain_mut(coordinate) else {
            continue;
        };

        let mut retained = ModuleBitset::new(domain.capacity());
        for module in domain.ones() {
            let allowed = catalog
                .variant(module)
                .is_some_and(|variant| satisfies_position_rules(variant, coordinate, volume));
            if allowed {
                retained.insert(module);
            }
        }
        if retained.len() == domain.len() {
            continue;
        }

        if retained.is_empty() {
            if pinned {
                return Err(Contradiction { cell: index });
            }
            retained = ModuleBitset::single(domain.capacity(), catalog.air());
        }
        if *domain != retained {
            *domain = retained;
            touched.push(index);
        }
    }

    Ok(touched)
}

/// Whether a variant may occupy `coordinate` under the position rules
fn satisfies_position_rules(
    variant: &ModuleVariant,
    coordinate: Coordinate,
    volume: GridVolume,
) -> bool {
    if coordinate[1] == 0 {
        let face_ok = variant
            .face(Direction::Down)
            .is_some_and(|face| is_closed_vertical(*face));
        if !face_ok && !variant.has_from_tag(FROM_BOTTOM_TAG) {
            return false;
        }
    }
    if coordinate[1] + 1 == volume.size_y {
        let face_ok = variant
            .face(Direction::Up)
            .is_some_and(|face| is_closed_vertical(*face));
        if !face_ok && !variant.has_to_tag(TO_TOP_TAG) {
            return false;
        }
    }

    let outward: [(bool, Direction); 4] = [
        (coordinate[0] == 0, Direction::Left),
        (coordinate[0] + 1 == volume.size_x, Direction::Right),
        (coordinate[2] == 0, Direction::Back),
        (coordinate[2] + 1 == volume.size_z, Direction::Forward),
    ];
    for (on_boundary, direction) in outward {
        let closed = variant
            .face(direction)
            .is_some_and(|face| is_closed_horizontal(*face));
        if on_boundary && !closed {
            return false;
        }
    }
    true
}

const fn is_closed_vertical(face: FaceSignature) -> bool {
    matches!(
        face,
        FaceSignature::Vertical {
            connector: 0,
            invariant: true,
            ..
        }
    )
}

const fn is_closed_horizontal(face: FaceSignature) -> bool {
    matches!(
        face,
        FaceSignature::Horizontal {
            connector: 0,
            symmetric: true,
            ..
        }
    )
}
