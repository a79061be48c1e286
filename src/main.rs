//! CLI entry point for the wave function collapse grid generator

use clap::Parser;
use voxelwave::io::cli::{Cli, SolveRunner};

fn main() -> voxelwave::Result<()> {
    let cli = Cli::parse();
    let runner = SolveRunner::new(cli);
    runner.run()
}
