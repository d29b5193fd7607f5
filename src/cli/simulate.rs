//! Simulate command handler
//!
//! Monte Carlo realisations of the residual background.

use crate::cli::{emit, load_config, GlobalArgs};
use crate::error::Result;
use crate::estimate::simulate;
use crate::format::{FormatOptions, Report, ReportBody};
use clap::Args;
use tracing::info;

/// Simulate command arguments
#[derive(Args)]
pub struct SimulateArgs {
    /// Point sources brighter than this are excluded (erg cm^-2 s^-1)
    pub flux_limit: f64,

    /// Region area in deg^2
    pub area: f64,

    /// Number of realisations
    pub iterations: usize,

    /// Seed for a reproducible run
    #[arg(long, short = 's')]
    pub seed: Option<u64>,

    /// Print the histogram of simulated fluxes
    #[arg(long)]
    pub histogram: bool,
}

/// Run the simulate command
pub fn run(args: SimulateArgs, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;

    let mut sim_config = config.simulation_config(args.flux_limit, args.area, args.iterations);
    if let Some(seed) = args.seed {
        sim_config = sim_config.with_seed(seed);
    }

    info!(
        iterations = sim_config.iterations,
        seed = ?sim_config.seed,
        "starting simulation"
    );
    let summary = simulate(&config.model(), &sim_config)?;

    let options = FormatOptions {
        histogram: args.histogram,
        ..FormatOptions::default()
    };
    emit(&config, &Report::new(ReportBody::Simulation(summary)), &options)
}
