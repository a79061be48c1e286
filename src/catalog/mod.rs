//! Module catalog construction and adjacency derivation
//!
//! A catalog is built offline from module prototypes: each prototype is
//! expanded into its distinct rotation variants, and every variant gets a
//! per-direction set of compatible neighbors derived from face signatures.
//! The solver consumes the finished catalog as immutable, precomputed data
//! and never re-derives geometric compatibility itself.

/// Catalog building from prototypes: expansion, adjacency, validation
pub mod builder;
/// Face signatures and the face compatibility relation
pub mod faces;
/// Module prototypes and expanded rotation variants
pub mod module;
/// Built-in demo catalogs for the CLI and tests
pub mod presets;

pub use builder::ModuleCatalog;
pub use faces::{ConnectorId, FaceSignature};
pub use module::{MeshId, ModuleId, ModulePrototype, ModuleVariant};
