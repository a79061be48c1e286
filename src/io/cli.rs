//! Command-line interface for solving built-in catalogs into image output

use crate::catalog::builder::ModuleCatalog;
use crate::catalog::presets::{PRESET_NAMES, preset};
use crate::io::configuration::{
    DEFAULT_MAX_BACKTRACKS, DEFAULT_MAX_ITERATIONS, DEFAULT_MAX_RESTARTS, DEFAULT_SEED,
    GIF_FRAME_DELAY_MS,
};
use crate::io::error::{Result, invalid_parameter};
use crate::io::image::export_layers_png;
use crate::io::progress::SolveProgress;
use crate::solver::constraints::Pin;
use crate::solver::executor::{Solver, SolverConfig};
use crate::spatial::grid::GridVolume;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "voxelwave")]
#[command(
    author,
    version,
    about = "Generate 3D module grids with wave function collapse"
)]
/// Command-line arguments for the grid generation tool
pub struct Cli {
    /// Output PNG file for the solved layer maps
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Built-in catalog preset to solve
    #[arg(short, long, default_value = "pipes")]
    pub preset: String,

    /// Cell count along x
    #[arg(long, default_value_t = 8)]
    pub size_x: usize,

    /// Cell count along y (vertical)
    #[arg(long, default_value_t = 3)]
    pub size_y: usize,

    /// Cell count along z
    #[arg(long, default_value_t = 8)]
    pub size_z: usize,

    /// Random seed for reproducible generation
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Maximum collapse steps per attempt
    #[arg(short, long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    pub iterations: usize,

    /// Maximum backtracks per attempt
    #[arg(short, long, default_value_t = DEFAULT_MAX_BACKTRACKS)]
    pub backtracks: usize,

    /// Maximum solve attempts before giving up
    #[arg(short, long, default_value_t = DEFAULT_MAX_RESTARTS)]
    pub restarts: usize,

    /// Pin a cell to a module before solving (repeatable)
    #[arg(long = "pin", value_name = "X,Y,Z=NAME")]
    pub pins: Vec<String>,

    /// Record the collapse as an animated GIF next to the output
    #[arg(short, long)]
    pub visualize: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }
}

/// Drives one solve from CLI arguments to image output
pub struct SolveRunner {
    cli: Cli,
}

impl SolveRunner {
    /// Create a runner for the given CLI arguments
    pub const fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Build the catalog, solve, and export the requested outputs
    ///
    /// # Errors
    ///
    /// Returns an error if the preset is unknown, a pin fails to parse or
    /// resolve, generation exhausts its budgets, or an export fails.
    pub fn run(&self) -> Result<()> {
        let preset_data = preset(&self.cli.preset).ok_or_else(|| {
            invalid_parameter(
                "preset",
                &self.cli.preset,
                &format!("expected one of {PRESET_NAMES:?}"),
            )
        })?;
        let catalog = Arc::new(ModuleCatalog::build(&preset_data.prototypes)?);
        let volume = GridVolume::new(self.cli.size_x, self.cli.size_y, self.cli.size_z);
        let config = SolverConfig {
            seed: Some(self.cli.seed),
            max_iterations: self.cli.iterations,
            max_backtracks: self.cli.backtracks,
            max_restarts: self.cli.restarts,
            boundary_rules: true,
        };

        let mut solver = Solver::new(Arc::clone(&catalog), volume, config)?;
        for spec in &self.cli.pins {
            solver.add_pin(parse_pin(spec, &catalog)?)?;
        }
        if self.cli.visualize {
            solver.enable_capture(preset_data.colors.clone());
        }
        if self.cli.should_show_progress() {
            solver.progress = Some(SolveProgress::new(
                self.cli.restarts,
                volume.cell_count(),
            ));
        }

        let solved = solver.solve()?;

        let output_path = self
            .cli
            .output
            .to_str()
            .ok_or_else(|| invalid_parameter("output", &"<non-utf8>", &"invalid output path"))?;
        export_layers_png(&solved, &preset_data.colors, output_path)?;

        if self.cli.visualize {
            if let Some(capture) = &solver.capture {
                let viz_path = Self::get_visualization_path(&self.cli.output);
                let viz_str = viz_path.to_str().ok_or_else(|| {
                    invalid_parameter("output", &"<non-utf8>", &"invalid visualization path")
                })?;
                capture.export_gif(viz_str, GIF_FRAME_DELAY_MS)?;
            }
        }

        Ok(())
    }

    fn get_visualization_path(output_path: &Path) -> PathBuf {
        let stem = output_path.file_stem().unwrap_or_default();
        let viz_name = format!("{}_collapse.gif", stem.to_string_lossy());

        if let Some(parent) = output_path.parent() {
            parent.join(viz_name)
        } else {
            PathBuf::from(viz_name)
        }
    }
}

/// Parse a pin argument of the form `x,y,z=NAME`
///
/// The name may be a variant name (`corner_1`) or a prototype name, which
/// resolves to its rotation-0 variant.
///
/// # Errors
///
/// Returns an error if the coordinate triple does not parse or the name does
/// not resolve against the catalog.
pub fn parse_pin(spec: &str, catalog: &ModuleCatalog) -> Result<Pin> {
    let (coords, name) = spec
        .split_once('=')
        .ok_or_else(|| invalid_parameter("pin", &spec, &"expected x,y,z=NAME"))?;

    let parts: Vec<usize> = coords
        .split(',')
        .map(|part| part.trim().parse::<usize>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|_parse_error| {
            invalid_parameter("pin", &spec, &"coordinates must be three integers")
        })?;
    let [x, y, z] = parts.as_slice() else {
        return Err(invalid_parameter(
            "pin",
            &spec,
            &"expected exactly three coordinates",
        ));
    };

    let module = catalog
        .resolve(name.trim())
        .ok_or_else(|| crate::io::error::GenerationError::UnknownModule {
            name: name.trim().to_string(),
        })?;

    Ok(Pin {
        coordinate: [*x, *y, *z],
        module,
    })
}
