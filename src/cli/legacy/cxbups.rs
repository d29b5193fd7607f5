//! `cxbups <flux limit> <area>`

use crate::error::{Error, Result};
use crate::estimate::residual_flux;
use crate::format::text::TextFormatter;
use crate::format::{FormatOptions, OutputFormatter, Report, ReportBody};
use crate::model::LogNLogS;
use clap::Parser;

pub const USAGE: &str = "CXBups is a program to calculate the remaining Cosmic X-ray Background
flux after the exclusion of point sources up to a certain limit.

  Usage:
    ./cxbups <flux limit> <area>

  Example:
    ./cxbups 3.E-15 0.0549

";

#[derive(Parser)]
#[command(allow_negative_numbers = true)]
pub struct Args {
    flux_limit: f64,
    area: f64,
}

pub fn run(args: Args) -> Result<String> {
    if args.flux_limit == 0.0 {
        return Err(Error::Argument("flux limit must be non-zero".to_string()));
    }

    let estimate = residual_flux(&LogNLogS::lehmer2012(), args.flux_limit, args.area)?;
    TextFormatter.format(
        &Report::new(ReportBody::Flux(estimate)),
        &FormatOptions::default(),
    )
}
