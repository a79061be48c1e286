//! Solver constants and runtime configuration defaults

/// Edge length of one module block in world units
pub const BLOCK_SIZE: f64 = 4.0;

// Safety limit to prevent excessive memory allocation
/// Maximum allowed cell count along any grid axis
pub const MAX_GRID_DIMENSION: usize = 256;

// Default values for configurable parameters
/// Fixed seed for reproducible generation
pub const DEFAULT_SEED: u64 = 42;

/// Default maximum collapse steps per solve attempt
pub const DEFAULT_MAX_ITERATIONS: usize = 100_000;

/// Default maximum backtracks per solve attempt
pub const DEFAULT_MAX_BACKTRACKS: usize = 256;

/// Default maximum solve attempts before reporting failure
pub const DEFAULT_MAX_RESTARTS: usize = 10;

// Progress bar display settings
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 50;

// Output settings
/// Delay between GIF animation frames
pub const GIF_FRAME_DELAY_MS: u32 = 5;
/// Minimum frame delay that viewers reliably support (in milliseconds)
pub const VIEWER_MIN_FRAME_DELAY_MS: u32 = 50;
/// Pixel gap between layer maps in the exported PNG
pub const LAYER_GAP_PX: u32 = 1;
