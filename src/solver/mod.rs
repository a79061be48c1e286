/// Efficient bitset implementation for module id sets
pub mod bitset;
/// One-shot boundary, tag, and pin constraints
pub mod constraints;
/// Solve orchestration: attempts, budgets, and cancellation
pub mod executor;
/// Undo log for collapse steps and backtracking
pub mod history;
/// Worklist constraint propagation
pub mod propagation;
/// Entropy-based cell selection and weighted collapse
pub mod selection;

pub use constraints::Pin;
pub use executor::{CancelToken, SolvedGrid, Solver, SolverConfig};
