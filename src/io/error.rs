//! Error types for catalog building, solving, and output

use std::fmt;
use std::path::PathBuf;

/// Main error type for all generation operations
///
/// Contradictions and per-attempt budget overruns are recovered internally by
/// backtracking and restarts; only terminal outcomes surface here.
#[derive(Debug)]
pub enum GenerationError {
    /// Grid dimensions are zero or exceed the supported maximum
    InvalidDimensions {
        /// Requested cell count along x
        size_x: usize,
        /// Requested cell count along y
        size_y: usize,
        /// Requested cell count along z
        size_z: usize,
    },

    /// The catalog was built from an empty prototype list
    EmptyCatalog,

    /// A prototype carries a weight that is zero or negative
    NonPositiveWeight {
        /// Name of the offending prototype
        prototype: String,
        /// The rejected weight
        weight: f64,
    },

    /// No prototype qualifies as the air fallback
    ///
    /// The fallback must be meshless with connector-0 symmetric/invariant
    /// faces on all six sides.
    MissingAirModule,

    /// A name did not resolve to any catalog module
    UnknownModule {
        /// The unresolved name
        name: String,
    },

    /// A pin coordinate lies outside the grid
    PinOutOfBounds {
        /// The offending coordinate
        coordinate: [usize; 3],
        /// Grid dimensions the coordinate was checked against
        dimensions: (usize, usize, usize),
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Every recovery path was exhausted without a full solve
    ///
    /// Reported after the configured number of restarts each ran out of
    /// backtracks or iterations; carries the totals for diagnostics.
    BudgetExhausted {
        /// Solve attempts that were started
        attempts: usize,
        /// Backtracks summed over all attempts
        backtracks: usize,
        /// Collapse steps summed over all attempts
        iterations: usize,
    },

    /// The caller cancelled the run between steps
    Cancelled,

    /// Failed to save generated output to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimensions {
                size_x,
                size_y,
                size_z,
            } => {
                write!(f, "Invalid grid dimensions {size_x}x{size_y}x{size_z}")
            }
            Self::EmptyCatalog => {
                write!(f, "Module catalog has no prototypes")
            }
            Self::NonPositiveWeight { prototype, weight } => {
                write!(f, "Prototype '{prototype}' has non-positive weight {weight}")
            }
            Self::MissingAirModule => {
                write!(
                    f,
                    "No prototype qualifies as the air fallback \
                     (meshless, connector 0 on all faces)"
                )
            }
            Self::UnknownModule { name } => {
                write!(f, "No catalog module named '{name}'")
            }
            Self::PinOutOfBounds {
                coordinate,
                dimensions,
            } => {
                write!(
                    f,
                    "Pin at {coordinate:?} lies outside the {}x{}x{} grid",
                    dimensions.0, dimensions.1, dimensions.2
                )
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::BudgetExhausted {
                attempts,
                backtracks,
                iterations,
            } => {
                write!(
                    f,
                    "Generation failed after {attempts} attempts \
                     ({backtracks} backtracks, {iterations} collapse steps)"
                )
            }
            Self::Cancelled => {
                write!(f, "Generation cancelled by the caller")
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for GenerationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for generation results
pub type Result<T> = std::result::Result<T, GenerationError>;

impl From<std::io::Error> for GenerationError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> GenerationError {
    GenerationError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
