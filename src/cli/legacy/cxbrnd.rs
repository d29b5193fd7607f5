//! `cxbrnd <flux limit> <area> <niter> [--histogram]`

use crate::error::Result;
use crate::estimate::{simulate, SimulationConfig};
use crate::format::text::TextFormatter;
use crate::format::{FormatOptions, OutputFormatter, Report, ReportBody};
use crate::model::LogNLogS;
use clap::Parser;

pub const USAGE: &str = "Error: illegal input on command line.CXBrnd is a program to calculate the remaining Cosmic X-ray Background
flux after the exclusion of point sources up to a certain limit through
Monte Carlo simulations.

  Usage:
    ./cxbrnd <flux limit> <area> <niter>

  Example:
    ./cxbrnd 3.E-15 0.0549 1000

";

#[derive(Parser)]
#[command(allow_negative_numbers = true)]
pub struct Args {
    flux_limit: f64,
    area: f64,
    #[arg(value_parser = parse_iterations)]
    iterations: usize,

    /// Also print the histogram of simulated fluxes
    #[arg(long)]
    histogram: bool,
}

/// Iteration count written as any float ("1000.", "1e3"), truncated
fn parse_iterations(value: &str) -> std::result::Result<usize, String> {
    let count: f64 = value
        .parse()
        .map_err(|_| format!("invalid iteration count: {}", value))?;
    if !count.is_finite() || count < 1.0 {
        return Err(format!("iteration count must be at least 1, got {}", value));
    }
    Ok(count.trunc() as usize)
}

pub fn run(args: Args) -> Result<String> {
    let config = SimulationConfig::new(args.flux_limit, args.area, args.iterations);
    let summary = simulate(&LogNLogS::lehmer2012(), &config)?;

    let options = FormatOptions {
        histogram: args.histogram,
        ..FormatOptions::default()
    };
    TextFormatter.format(&Report::new(ReportBody::Simulation(summary)), &options)
}
