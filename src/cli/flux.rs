//! Flux command handler
//!
//! Analytic residual background below a flux limit.

use crate::cli::{emit, load_config, GlobalArgs};
use crate::error::Result;
use crate::estimate::residual_flux;
use crate::format::{FormatOptions, Report, ReportBody};
use clap::Args;

/// Flux command arguments
#[derive(Args)]
pub struct FluxArgs {
    /// Point sources brighter than this are excluded (erg cm^-2 s^-1)
    pub flux_limit: f64,

    /// Region area in deg^2
    pub area: f64,
}

/// Run the flux command
pub fn run(args: FluxArgs, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;
    let estimate = residual_flux(&config.model(), args.flux_limit, args.area)?;

    emit(
        &config,
        &Report::new(ReportBody::Flux(estimate)),
        &FormatOptions::default(),
    )
}
