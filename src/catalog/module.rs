//! Module prototypes and their expanded rotation variants

use crate::catalog::faces::FaceSignature;
use crate::spatial::grid::Direction;

/// Index of a module variant inside its catalog
pub type ModuleId = usize;

/// Opaque handle to a renderable mesh owned by the embedding application
///
/// The solver never looks inside; `None` marks an empty (air) module that
/// geometry instantiation skips.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeshId(pub u32);

/// Tag allowing a module to sit on the bottom layer regardless of its Down face
pub const FROM_BOTTOM_TAG: &str = "from-bottom";
/// Tag allowing a module to sit on the top layer regardless of its Up face
pub const TO_TOP_TAG: &str = "to-top";

/// One tile module as authored, before rotation expansion
///
/// Faces are listed in the order Left, Back, Right, Forward, Down, Up.
#[derive(Clone, Debug)]
pub struct ModulePrototype {
    /// Display name, also used to resolve pins and exclusions
    pub name: String,
    /// Mesh handle, or `None` for the empty module
    pub mesh: Option<MeshId>,
    /// Face signatures in slot order
    pub faces: [FaceSignature; 6],
    /// Sampling weight of every variant of this prototype
    pub weight: f64,
    /// Placement tags consumed by the top-layer boundary rule
    pub to_tags: Vec<String>,
    /// Placement tags consumed by the bottom-layer boundary rule
    pub from_tags: Vec<String>,
    /// Per-direction prototype names whose variants may never neighbor this
    /// one, even when their faces would otherwise match
    pub excluded: [Vec<String>; 6],
}

impl ModulePrototype {
    /// Create a prototype with default weight and no tags or exclusions
    pub fn new(name: impl Into<String>, faces: [FaceSignature; 6]) -> Self {
        Self {
            name: name.into(),
            mesh: None,
            faces,
            weight: 1.0,
            to_tags: Vec::new(),
            from_tags: Vec::new(),
            excluded: [const { Vec::new() }; 6],
        }
    }

    /// Attach a mesh handle
    #[must_use]
    pub const fn with_mesh(mut self, mesh: MeshId) -> Self {
        self.mesh = Some(mesh);
        self
    }

    /// Set the sampling weight
    #[must_use]
    pub const fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Add a tag consumed by the top-layer rule
    #[must_use]
    pub fn with_to_tag(mut self, tag: impl Into<String>) -> Self {
        self.to_tags.push(tag.into());
        self
    }

    /// Add a tag consumed by the bottom-layer rule
    #[must_use]
    pub fn with_from_tag(mut self, tag: impl Into<String>) -> Self {
        self.from_tags.push(tag.into());
        self
    }

    /// Forbid all variants of `other` as neighbors in `direction`
    #[must_use]
    pub fn with_excluded(mut self, direction: Direction, other: impl Into<String>) -> Self {
        if let Some(list) = self.excluded.get_mut(direction.index()) {
            list.push(other.into());
        }
        self
    }
}

/// One rotation variant of a prototype, immutable once the catalog is built
#[derive(Clone, Debug)]
pub struct ModuleVariant {
    /// Position of this variant in the catalog
    pub id: ModuleId,
    /// Index of the prototype this variant was expanded from
    pub prototype: usize,
    /// Prototype name suffixed with the rotation index
    pub name: String,
    /// Mesh handle inherited from the prototype
    pub mesh: Option<MeshId>,
    /// Quarter turns (0..4) about the vertical axis
    pub rotation: u8,
    /// Face signatures after rotation
    pub faces: [FaceSignature; 6],
    /// Sampling weight inherited from the prototype
    pub weight: f64,
    /// Tags consumed by the top-layer rule
    pub to_tags: Vec<String>,
    /// Tags consumed by the bottom-layer rule
    pub from_tags: Vec<String>,
}

impl ModuleVariant {
    /// Face signature on the side facing `direction`
    pub fn face(&self, direction: Direction) -> Option<&FaceSignature> {
        self.faces.get(direction.index())
    }

    /// Whether the variant carries the given bottom-layer tag
    pub fn has_from_tag(&self, tag: &str) -> bool {
        self.from_tags.iter().any(|t| t == tag)
    }

    /// Whether the variant carries the given top-layer tag
    pub fn has_to_tag(&self, tag: &str) -> bool {
        self.to_tags.iter().any(|t| t == tag)
    }
}
