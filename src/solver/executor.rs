use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use ndarray::Array3;
use rand::{SeedableRng, rngs::StdRng};

use crate::catalog::builder::ModuleCatalog;
use crate::catalog::module::{MeshId, ModuleId, ModuleVariant};
use crate::io::configuration::{
    BLOCK_SIZE, DEFAULT_MAX_BACKTRACKS, DEFAULT_MAX_ITERATIONS, DEFAULT_MAX_RESTARTS,
    MAX_GRID_DIMENSION,
};
use crate::io::error::{GenerationError, Result, invalid_parameter};
use crate::io::progress::SolveProgress;
use crate::io::visualization::CollapseCapture;
use crate::solver::bitset::ModuleBitset;
use crate::solver::constraints::{self, Pin};
use crate::solver::history::{History, StepRecord};
use crate::solver::propagation::{Worklist, propagate};
use crate::solver::selection::{select_min_entropy_cell, weighted_choice};
use crate::spatial::grid::{Coordinate, DomainGrid, GridVolume};

/// Budgets and seeding for one solver
#[derive(Clone, Copy, Debug)]
pub struct SolverConfig {
    /// Seed for reproducible runs; `None` draws one from the OS
    pub seed: Option<u64>,
    /// Maximum collapse steps per attempt
    pub max_iterations: usize,
    /// Maximum backtracks per attempt
    pub max_backtracks: usize,
    /// Maximum solve attempts before reporting failure
    pub max_restarts: usize,
    /// Whether the position rules of the constraint applicator run
    ///
    /// Pins are always applied; this only gates the boundary/tag pass.
    pub boundary_rules: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            seed: None,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            max_backtracks: DEFAULT_MAX_BACKTRACKS,
            max_restarts: DEFAULT_MAX_RESTARTS,
            boundary_rules: true,
        }
    }
}

/// Cooperative cancellation flag shared between the caller and a running solve
///
/// Checked at the top of the main loop, never mid-propagation. A cancelled
/// run discards its grid; no partial state is observable.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a token in the not-cancelled state
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of the run holding this token
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Counters accumulated over all attempts of one solve
#[derive(Clone, Copy, Debug, Default)]
pub struct SolveStats {
    /// Solve attempts started
    pub attempts: usize,
    /// Backtracks summed over all attempts
    pub backtracks: usize,
    /// Collapse steps summed over all attempts
    pub iterations: usize,
}

/// A decided cell mapped to world space, ready for geometry instantiation
#[derive(Clone, Debug, PartialEq)]
pub struct Placement {
    /// Cell coordinate
    pub coordinate: Coordinate,
    /// Decided module variant id
    pub module: ModuleId,
    /// Prototype index of the variant
    pub prototype: usize,
    /// Quarter turns about the vertical axis
    pub rotation: u8,
    /// Mesh handle of the variant
    pub mesh: MeshId,
    /// `coordinate * BLOCK_SIZE` in world units
    pub world_position: [f64; 3],
    /// `90 * rotation`, the spawn rotation about the vertical axis
    pub rotation_degrees: u16,
}

/// A fully decided grid: exactly one module variant per cell
#[derive(Clone, Debug)]
pub struct SolvedGrid {
    volume: GridVolume,
    modules: Array3<ModuleId>,
    catalog: Arc<ModuleCatalog>,
}

impl SolvedGrid {
    fn from_domains(grid: &DomainGrid, catalog: Arc<ModuleCatalog>) -> Self {
        let volume = grid.volume();
        let air = catalog.air();
        let modules = Array3::from_shape_fn(
            (volume.size_x, volume.size_y, volume.size_z),
            |(x, y, z)| {
                grid.domain([x, y, z])
                    .and_then(ModuleBitset::first)
                    .unwrap_or(air)
            },
        );
        Self {
            volume,
            modules,
            catalog,
        }
    }

    /// Dimensions of the solved volume
    pub const fn volume(&self) -> GridVolume {
        self.volume
    }

    /// Decided module id at `coordinate`
    pub fn module_id(&self, coordinate: Coordinate) -> Option<ModuleId> {
        self.modules.get(coordinate).copied()
    }

    /// Decided variant at `coordinate`
    pub fn variant(&self, coordinate: Coordinate) -> Option<&ModuleVariant> {
        self.module_id(coordinate)
            .and_then(|id| self.catalog.variant(id))
    }

    /// Catalog the grid was solved against
    pub fn catalog(&self) -> &ModuleCatalog {
        &self.catalog
    }

    /// Iterate placement records for every cell with a mesh
    ///
    /// Cells decided to meshless modules (air) are skipped; everything else
    /// maps to a mesh instance at `coordinate * BLOCK_SIZE`, rotated
    /// `90° * rotation` about the vertical axis.
    pub fn placements(&self) -> impl Iterator<Item = Placement> + '_ {
        self.volume.coordinates().filter_map(|coordinate| {
            let variant = self.variant(coordinate)?;
            let mesh = variant.mesh?;
            Some(Placement {
                coordinate,
                module: variant.id,
                prototype: variant.prototype,
                rotation: variant.rotation,
                mesh,
                world_position: [
                    coordinate[0] as f64 * BLOCK_SIZE,
                    coordinate[1] as f64 * BLOCK_SIZE,
                    coordinate[2] as f64 * BLOCK_SIZE,
                ],
                rotation_degrees: u16::from(variant.rotation) * 90,
            })
        })
    }
}

/// Wave function collapse solver for one grid volume
///
/// Owns the mutable domain grid exclusively while running. The catalog is
/// shared read-only; independent solvers over clones of the same catalog may
/// run concurrently.
pub struct Solver {
    catalog: Arc<ModuleCatalog>,
    volume: GridVolume,
    pins: Vec<Pin>,
    config: SolverConfig,
    rng: StdRng,
    stats: SolveStats,
    /// Optional collapse event capture for visualization
    pub capture: Option<CollapseCapture>,
    /// Optional progress display
    pub progress: Option<SolveProgress>,
}

impl Solver {
    /// Create a solver for the given catalog, volume, and budgets
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Any grid dimension is zero or exceeds the supported maximum
    /// - Any budget is zero
    pub fn new(catalog: Arc<ModuleCatalog>, volume: GridVolume, config: SolverConfig) -> Result<Self> {
        let dims = [volume.size_x, volume.size_y, volume.size_z];
        if dims.contains(&0) || dims.iter().any(|&d| d > MAX_GRID_DIMENSION) {
            return Err(GenerationError::InvalidDimensions {
                size_x: volume.size_x,
                size_y: volume.size_y,
                size_z: volume.size_z,
            });
        }
        if config.max_iterations == 0 {
            return Err(invalid_parameter(
                "max_iterations",
                &0,
                &"iteration budget must be positive",
            ));
        }
        if config.max_backtracks == 0 {
            return Err(invalid_parameter(
                "max_backtracks",
                &0,
                &"backtrack budget must be positive",
            ));
        }
        if config.max_restarts == 0 {
            return Err(invalid_parameter(
                "max_restarts",
                &0,
                &"restart budget must be positive",
            ));
        }

        let rng = config
            .seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);

        Ok(Self {
            catalog,
            volume,
            pins: Vec::new(),
            config,
            rng,
            stats: SolveStats::default(),
            capture: None,
            progress: None,
        })
    }

    /// Force a cell to a single module before solving
    ///
    /// # Errors
    ///
    /// Returns an error if the coordinate lies outside the grid or the module
    /// id is not in the catalog.
    pub fn add_pin(&mut self, pin: Pin) -> Result<()> {
        if !self.volume.contains(pin.coordinate) {
            return Err(GenerationError::PinOutOfBounds {
                coordinate: pin.coordinate,
                dimensions: (self.volume.size_x, self.volume.size_y, self.volume.size_z),
            });
        }
        if self.catalog.variant(pin.module).is_none() {
            return Err(GenerationError::UnknownModule {
                name: format!("#{}", pin.module),
            });
        }
        self.pins.push(pin);
        Ok(())
    }

    /// Catalog this solver generates against
    pub fn catalog(&self) -> &ModuleCatalog {
        &self.catalog
    }

    /// Counters accumulated so far
    pub const fn stats(&self) -> SolveStats {
        self.stats
    }

    /// Enable collapse event recording for GIF export
    pub fn enable_capture(&mut self, colors: Vec<[u8; 4]>) {
        self.capture = Some(CollapseCapture::new(self.volume, colors));
    }

    /// Run the solve to completion or terminal failure
    ///
    /// # Errors
    ///
    /// Returns `BudgetExhausted` when every attempt ran out of backtracks or
    /// iterations, or an input-validation error bubbled up from constraint
    /// seeding.
    pub fn solve(&mut self) -> Result<SolvedGrid> {
        self.solve_with_cancel(&CancelToken::new())
    }

    /// Run the solve, checking `cancel` between collapse steps
    ///
    /// # Errors
    ///
    /// As [`Self::solve`], plus `Cancelled` when the token fires; the partial
    /// grid is discarded in that case.
    pub fn solve_with_cancel(&mut self, cancel: &CancelToken) -> Result<SolvedGrid> {
        for attempt in 1..=self.config.max_restarts {
            self.stats.attempts = attempt;
            if let Some(progress) = &self.progress {
                progress.start_attempt(attempt);
            }

            match self.run_attempt(cancel)? {
                Some(solved) => {
                    if let Some(progress) = &self.progress {
                        progress.finish(true);
                    }
                    return Ok(solved);
                }
                None => {
                    if let Some(capture) = &mut self.capture {
                        capture.record_reset(self.stats.iterations);
                    }
                }
            }
        }

        if let Some(progress) = &self.progress {
            progress.finish(false);
        }
        Err(GenerationError::BudgetExhausted {
            attempts: self.stats.attempts,
            backtracks: self.stats.backtracks,
            iterations: self.stats.iterations,
        })
    }

    /// One attempt: constraint seeding, then the collapse/propagate loop
    ///
    /// `Ok(None)` means the attempt exhausted its budget or its history and a
    /// restart may follow; only cancellation is a hard error here.
    fn run_attempt(&mut self, cancel: &CancelToken) -> Result<Option<SolvedGrid>> {
        let catalog = Arc::clone(&self.catalog);
        let cell_count = self.volume.cell_count();
        let mut grid = DomainGrid::full(self.volume, catalog.len());
        let mut worklist = Worklist::new(cell_count);

        // Constraint applicator: pins first, then position rules
        for cell in constraints::apply_pins(&mut grid, &self.pins) {
            worklist.push(cell);
        }
        if self.config.boundary_rules {
            let seeds = match constraints::apply_boundary_rules(&mut grid, &catalog) {
                Ok(seeds) => seeds,
                // A pin that violates the position rules can never survive
                Err(_) => return Ok(None),
            };
            for cell in seeds {
                worklist.push(cell);
            }
        }
        if propagate(&mut grid, &catalog, &mut worklist, None).is_err() {
            // Contradiction with no history to unwind
            return Ok(None);
        }

        let mut history = History::new();
        let mut retry: Option<StepRecord> = None;
        let mut backtracks = 0;
        let mut iterations = 0;

        loop {
            if cancel.is_cancelled() {
                return Err(GenerationError::Cancelled);
            }

            let mut record = match retry.take() {
                Some(record) => record,
                None => match select_min_entropy_cell(&grid, &mut self.rng) {
                    None => {
                        return Ok(Some(SolvedGrid::from_domains(&grid, catalog)));
                    }
                    Some(coordinate) => {
                        let cell = self.volume.flat_index(coordinate);
                        let Some(domain) = grid.domain(coordinate) else {
                            return Ok(None);
                        };
                        StepRecord::new(cell, domain.clone(), cell_count)
                    }
                },
            };

            // A collapse is about to happen; only now does it count against
            // the iteration budget
            iterations += 1;
            self.stats.iterations += 1;
            if iterations > self.config.max_iterations {
                return Ok(None);
            }

            let coordinate = self.volume.coordinate_of(record.cell);
            let candidates = record.remaining();
            let Some(chosen) = weighted_choice(&candidates, &catalog, &mut self.rng) else {
                return Ok(None);
            };
            record.tried.insert(chosen);
            if let Some(domain) = grid.domain_mut(coordinate) {
                *domain = ModuleBitset::single(catalog.len(), chosen);
            }

            worklist.clear();
            worklist.push(record.cell);
            match propagate(&mut grid, &catalog, &mut worklist, Some(&mut record)) {
                Ok(()) => {
                    if let Some(capture) = &mut self.capture {
                        record_step_placements(capture, &grid, &catalog, &record, iterations);
                    }
                    history.push(record);
                    if let Some(progress) = &self.progress {
                        progress.set_decided(cell_count - grid.undecided_count());
                    }
                }
                Err(_) => {
                    match self.unwind(&mut grid, &mut history, record, &mut backtracks, iterations)
                    {
                        Some(retry_record) => retry = Some(retry_record),
                        // Backtrack budget or history exhausted
                        None => return Ok(None),
                    }
                }
            }
        }
    }

    /// Roll back after a contradiction until a cell with untried candidates
    /// remains
    ///
    /// The failed step is undone first; if its cell has no candidates left,
    /// older steps are popped and undone in turn. Every undo counts against
    /// the backtrack budget. Returns the record to retry from, or `None` when
    /// the budget or the history is exhausted.
    fn unwind(
        &mut self,
        grid: &mut DomainGrid,
        history: &mut History,
        failed: StepRecord,
        backtracks: &mut usize,
        iteration: usize,
    ) -> Option<StepRecord> {
        let mut current = failed;
        loop {
            *backtracks += 1;
            self.stats.backtracks += 1;
            if *backtracks > self.config.max_backtracks {
                return None;
            }

            if let Some(capture) = &mut self.capture {
                record_step_retractions(capture, grid, &current, iteration);
            }
            current.undo(grid);
            current.reset_for_retry();

            if !current.remaining().is_empty() {
                return Some(current);
            }
            current = history.pop()?;
        }
    }
}

/// Record placement events for the collapsed cell and every cell its
/// propagation decided
fn record_step_placements(
    capture: &mut CollapseCapture,
    grid: &DomainGrid,
    catalog: &ModuleCatalog,
    record: &StepRecord,
    iteration: usize,
) {
    let volume = grid.volume();
    let cells = std::iter::once(record.cell)
        .chain(record.side_effects.iter().map(|(cell, _)| *cell));
    for cell in cells {
        let decided = grid
            .domain_at(cell)
            .filter(|domain| domain.len() == 1)
            .and_then(ModuleBitset::first);
        if let Some(module) = decided {
            if let Some(variant) = catalog.variant(module) {
                capture.record_placement(volume.coordinate_of(cell), variant.prototype, iteration);
            }
        }
    }
}

/// Record retraction events for the cells a step had decided, before undoing
fn record_step_retractions(
    capture: &mut CollapseCapture,
    grid: &DomainGrid,
    record: &StepRecord,
    iteration: usize,
) {
    let volume = grid.volume();
    let cells = std::iter::once(record.cell)
        .chain(record.side_effects.iter().map(|(cell, _)| *cell));
    for cell in cells {
        let decided = grid
            .domain_at(cell)
            .is_some_and(|domain| domain.len() == 1);
        if decided {
            capture.record_retraction(volume.coordinate_of(cell), iteration);
        }
    }
}
