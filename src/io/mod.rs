//! Input/output operations and error handling
//!
//! Everything outward-facing lives here: the CLI, error types, defaults,
//! progress display, and image export of solved grids.

/// Command-line interface and solve driver
pub mod cli;
/// Solver constants and runtime configuration defaults
pub mod configuration;
/// Error types and the crate-wide Result alias
pub mod error;
/// PNG export of solved grids
pub mod image;
/// Progress display for solve attempts
pub mod progress;
/// Collapse event capture and GIF export
pub mod visualization;
