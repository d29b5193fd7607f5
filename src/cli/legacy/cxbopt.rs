//! `cxbopt <source cnts> <backg counts> <region>`

use crate::error::Result;
use crate::estimate::optimize::{optimize, CountConversion, GridSpec, PsfProfile};
use crate::estimate::OptimizeInput;
use crate::format::text::TextFormatter;
use crate::format::{FormatOptions, OutputFormatter, Report, ReportBody};
use crate::model::LogNLogS;
use clap::Parser;

pub const USAGE: &str = "CXBopt is a program to calculate optimal source extraction radius
and flux cut for a certain annulus.

  Usage:
    ./cxbopt <source cnts> <backg counts> <region>

  Example:
    ./cxbopt 10000. 15000. 0.0549

The <region> area is in square degrees.

";

#[derive(Parser)]
#[command(allow_negative_numbers = true)]
pub struct Args {
    source_counts: f64,
    background_counts: f64,
    area: f64,
}

pub fn run(args: Args) -> Result<String> {
    let result = optimize(
        &LogNLogS::lehmer2012(),
        OptimizeInput::new(args.source_counts, args.background_counts, args.area),
        GridSpec::default(),
        CountConversion::default(),
        PsfProfile::default(),
    )?;

    TextFormatter.format(
        &Report::new(ReportBody::Optimize(result)),
        &FormatOptions::default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::legacy::{execute, Outcome};

    #[test]
    fn test_published_example() {
        let outcome = execute(["cxbopt", "10000.", "15000.", "0.0549"], run);
        assert_eq!(
            outcome,
            Outcome::Output(
                "Amount of sources in FOV: 61.743276\n\
                 Optimal radius:   12.000000\n\
                 Optimal flux cut: 2.187762e-15\n"
                    .to_string()
            )
        );
        assert_eq!(outcome.exit_code(), 0);
    }

    #[test]
    fn test_wrong_argument_count_prints_usage() {
        let outcome = execute(["cxbopt", "10000.", "15000."], run);
        assert_eq!(outcome, Outcome::Usage);
        assert_eq!(outcome.exit_code(), 3);
        assert_eq!(execute(["cxbopt"], run), Outcome::Usage);
    }

    #[test]
    fn test_zero_area_fails() {
        let outcome = execute(["cxbopt", "10000.", "15000.", "0"], run);
        assert!(matches!(outcome, Outcome::Failed(_)));
    }
}
