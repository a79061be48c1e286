//! Built-in demo catalogs
//!
//! Small prototype sets constructed in code so the CLI and tests can run a
//! full solve without any external asset pipeline. Each preset pairs its
//! prototypes with one RGBA color per prototype for image export.

use crate::catalog::faces::FaceSignature;
use crate::catalog::module::{MeshId, ModulePrototype, TO_TOP_TAG};

/// Names of all built-in presets
pub const PRESET_NAMES: [&str; 2] = ["pipes", "columns"];

/// A named prototype set with per-prototype export colors
#[derive(Clone, Debug)]
pub struct Preset {
    /// Preset name as accepted by the CLI
    pub name: &'static str,
    /// Prototypes to build the catalog from
    pub prototypes: Vec<ModulePrototype>,
    /// RGBA color per prototype, in prototype order
    pub colors: Vec<[u8; 4]>,
}

/// Look up a built-in preset by name
pub fn preset(name: &str) -> Option<Preset> {
    match name {
        "pipes" => Some(pipes()),
        "columns" => Some(columns()),
        _ => None,
    }
}

/// Horizontal pipe network: segments connect through connector 1 openings
/// and must close before the grid boundary.
fn pipes() -> Preset {
    let h_open = FaceSignature::horizontal_symmetric(1);
    let h_flat = FaceSignature::horizontal_symmetric(0);
    let v_flat = FaceSignature::vertical_invariant(0);

    let prototypes = vec![
        ModulePrototype::new("air", [h_flat, h_flat, h_flat, h_flat, v_flat, v_flat])
            .with_weight(3.0),
        ModulePrototype::new("straight", [h_open, h_flat, h_open, h_flat, v_flat, v_flat])
            .with_mesh(MeshId(1))
            .with_weight(3.0),
        ModulePrototype::new("corner", [h_open, h_open, h_flat, h_flat, v_flat, v_flat])
            .with_mesh(MeshId(2))
            .with_weight(2.0),
        ModulePrototype::new("tee", [h_open, h_open, h_open, h_flat, v_flat, v_flat])
            .with_mesh(MeshId(3)),
        ModulePrototype::new("cross", [h_open, h_open, h_open, h_open, v_flat, v_flat])
            .with_mesh(MeshId(4))
            .with_weight(0.5),
        ModulePrototype::new("cap", [h_open, h_flat, h_flat, h_flat, v_flat, v_flat])
            .with_mesh(MeshId(5)),
    ];

    Preset {
        name: "pipes",
        prototypes,
        colors: vec![
            [0, 0, 0, 0],
            [66, 135, 245, 255],
            [52, 168, 83, 255],
            [251, 188, 5, 255],
            [234, 67, 53, 255],
            [154, 160, 166, 255],
        ],
    }
}

/// Vertical columns: base, shaft, and capital stack through connector 1
/// vertical faces; spires may reach the top layer through their tag.
fn columns() -> Preset {
    let h_flat = FaceSignature::horizontal_symmetric(0);
    let v_flat = FaceSignature::vertical_invariant(0);
    let v_core = FaceSignature::vertical_invariant(1);

    let prototypes = vec![
        ModulePrototype::new("air", [h_flat, h_flat, h_flat, h_flat, v_flat, v_flat])
            .with_weight(6.0),
        ModulePrototype::new("base", [h_flat, h_flat, h_flat, h_flat, v_flat, v_core])
            .with_mesh(MeshId(1))
            .with_weight(2.0),
        ModulePrototype::new("shaft", [h_flat, h_flat, h_flat, h_flat, v_core, v_core])
            .with_mesh(MeshId(2))
            .with_weight(2.0),
        ModulePrototype::new("capital", [h_flat, h_flat, h_flat, h_flat, v_core, v_flat])
            .with_mesh(MeshId(3))
            .with_weight(2.0),
        ModulePrototype::new("spire", [h_flat, h_flat, h_flat, h_flat, v_core, v_core])
            .with_mesh(MeshId(4))
            .with_weight(0.5)
            .with_to_tag(TO_TOP_TAG),
    ];

    Preset {
        name: "columns",
        prototypes,
        colors: vec![
            [0, 0, 0, 0],
            [95, 99, 104, 255],
            [222, 184, 135, 255],
            [241, 243, 244, 255],
            [103, 58, 183, 255],
        ],
    }
}
