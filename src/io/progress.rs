//! Progress display for solve attempts

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::LazyLock;

static CELLS_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("{msg} [{bar:30.cyan/blue}] {pos}/{len} cells")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static ATTEMPTS_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] Attempts: [{bar:40.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
});

/// Coordinates progress display for one solve
///
/// Shows a bar of decided cells for the running attempt above a bar counting
/// attempts against the restart budget. Backtracking makes the cell bar move
/// backwards; a restart resets it.
pub struct SolveProgress {
    multi_progress: MultiProgress,
    attempts_bar: ProgressBar,
    cells_bar: ProgressBar,
}

impl SolveProgress {
    /// Create progress bars for a solve with the given budgets
    pub fn new(max_attempts: usize, total_cells: usize) -> Self {
        let multi_progress = MultiProgress::new();

        let cells_bar = multi_progress.add(ProgressBar::new(total_cells as u64));
        cells_bar.set_style(CELLS_STYLE.clone());

        let attempts_bar = multi_progress.add(ProgressBar::new(max_attempts as u64));
        attempts_bar.set_style(ATTEMPTS_STYLE.clone());

        Self {
            multi_progress,
            attempts_bar,
            cells_bar,
        }
    }

    /// Reset the cell bar for a new attempt
    pub fn start_attempt(&self, attempt: usize) {
        self.attempts_bar.set_position(attempt.saturating_sub(1) as u64);
        self.cells_bar.set_position(0);
        self.cells_bar.set_message(format!("attempt {attempt}"));
    }

    /// Report the number of decided cells in the running attempt
    pub fn set_decided(&self, decided: usize) {
        self.cells_bar.set_position(decided as u64);
    }

    /// Clean up all progress displays
    pub fn finish(&self, success: bool) {
        if success {
            self.cells_bar.finish_with_message("solved");
        } else {
            self.cells_bar.abandon_with_message("failed");
        }
        self.attempts_bar.finish();
        let _ = self.multi_progress.clear();
    }
}
