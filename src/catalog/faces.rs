//! Face signatures and the compatibility relation between opposing faces
//!
//! A face signature describes one of the six faces of a module after the
//! upstream geometry pass has canonicalized it: a connector id grouping faces
//! with the same boundary shape, plus mirror attributes for horizontal faces
//! or rotation attributes for vertical faces. Compatibility is decided from
//! these attributes alone, never from raw geometry.

/// Integer key grouping faces with matching boundary shape
pub type ConnectorId = u32;

/// Canonicalized description of one module face
///
/// Horizontal and vertical faces carry different attributes and are never
/// compared against each other; a horizontal face only ever opposes another
/// horizontal face, and likewise for vertical.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaceSignature {
    /// A face in the horizontal plane (Left, Back, Right, Forward)
    Horizontal {
        /// Boundary shape key
        connector: ConnectorId,
        /// The face equals its own mirror image
        symmetric: bool,
        /// The face is the mirrored counterpart of the unflipped connector
        flipped: bool,
    },
    /// A face on the vertical axis (Down, Up)
    Vertical {
        /// Boundary shape key
        connector: ConnectorId,
        /// The face is unchanged by quarter turns about the vertical axis
        invariant: bool,
        /// Quarter-turn index (0..4) distinguishing non-invariant variants
        rotation: u8,
    },
}

impl FaceSignature {
    /// A symmetric horizontal face
    pub const fn horizontal_symmetric(connector: ConnectorId) -> Self {
        Self::Horizontal {
            connector,
            symmetric: true,
            flipped: false,
        }
    }

    /// An asymmetric horizontal face, unflipped or flipped
    pub const fn horizontal(connector: ConnectorId, flipped: bool) -> Self {
        Self::Horizontal {
            connector,
            symmetric: false,
            flipped,
        }
    }

    /// A rotation-invariant vertical face
    pub const fn vertical_invariant(connector: ConnectorId) -> Self {
        Self::Vertical {
            connector,
            invariant: true,
            rotation: 0,
        }
    }

    /// A rotation-dependent vertical face at the given quarter-turn index
    pub const fn vertical(connector: ConnectorId, rotation: u8) -> Self {
        Self::Vertical {
            connector,
            invariant: false,
            rotation: rotation % 4,
        }
    }

    /// Boundary shape key of this face
    pub const fn connector(self) -> ConnectorId {
        match self {
            Self::Horizontal { connector, .. } | Self::Vertical { connector, .. } => connector,
        }
    }

    /// Whether this face may sit against `opposing` on the shared boundary
    ///
    /// Both faces must carry the same connector id. Horizontal faces match
    /// when both are symmetric or exactly one is flipped; vertical faces
    /// match when both are invariant or neither is and their rotation
    /// indices agree. A horizontal face never matches a vertical one.
    pub const fn compatible(self, opposing: Self) -> bool {
        match (self, opposing) {
            (
                Self::Horizontal {
                    connector,
                    symmetric,
                    flipped,
                },
                Self::Horizontal {
                    connector: other_connector,
                    symmetric: other_symmetric,
                    flipped: other_flipped,
                },
            ) => {
                connector == other_connector
                    && ((symmetric && other_symmetric) || (flipped != other_flipped))
            }
            (
                Self::Vertical {
                    connector,
                    invariant,
                    rotation,
                },
                Self::Vertical {
                    connector: other_connector,
                    invariant: other_invariant,
                    rotation: other_rotation,
                },
            ) => {
                connector == other_connector
                    && ((invariant && other_invariant)
                        || (!invariant && !other_invariant && rotation == other_rotation))
            }
            _ => false,
        }
    }

    /// This face after the module is turned `quarter_turns` about the
    /// vertical axis
    ///
    /// Horizontal faces are unchanged (rotation moves them to another slot
    /// instead); non-invariant vertical faces advance their rotation index.
    #[must_use]
    pub const fn rotated(self, quarter_turns: u8) -> Self {
        match self {
            Self::Vertical {
                connector,
                invariant: false,
                rotation,
            } => Self::Vertical {
                connector,
                invariant: false,
                rotation: (rotation + quarter_turns) % 4,
            },
            other => other,
        }
    }
}
