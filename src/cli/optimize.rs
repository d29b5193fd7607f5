//! Optimize command handler
//!
//! Searches extraction radius and flux cut, optionally writing the SNR map.

use crate::cli::{emit, load_config, GlobalArgs};
use crate::error::Result;
use crate::estimate::optimize::{optimize, Optimization, PsfProfile, SnrGrid};
use crate::estimate::OptimizeInput;
use crate::format::{FormatOptions, Report, ReportBody};
use clap::Args;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Optimize command arguments
#[derive(Args)]
pub struct OptimizeArgs {
    /// Source counts in the region
    pub source_counts: f64,

    /// Instrumental background counts in the region
    pub background_counts: f64,

    /// Region area in deg^2
    pub area: f64,

    /// Write the SNR grid and contour levels to this file as JSON
    #[arg(long)]
    pub grid_out: Option<PathBuf>,

    /// Include the SNR grid in the printed report
    #[arg(long)]
    pub grid: bool,
}

/// SNR map as written by `--grid-out`
#[derive(Serialize)]
struct GridExport<'a> {
    min: Option<f64>,
    max: Option<f64>,
    contour_levels: Vec<f64>,
    #[serde(flatten)]
    grid: &'a SnrGrid,
}

/// Run the optimize command
pub fn run(args: OptimizeArgs, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;

    let result = optimize(
        &config.model(),
        OptimizeInput::new(args.source_counts, args.background_counts, args.area),
        config.grid_spec(),
        config.count_conversion(),
        PsfProfile::default(),
    )?;

    if let Some(path) = &args.grid_out {
        write_grid(&result, path)?;
        eprintln!("SNR grid written to {}", path.display());
    }

    let options = FormatOptions {
        grid: args.grid,
        ..FormatOptions::default()
    };
    emit(&config, &Report::new(ReportBody::Optimize(result)), &options)
}

fn write_grid(result: &Optimization, path: &Path) -> Result<()> {
    let export = GridExport {
        min: result.grid.min(),
        max: result.grid.max(),
        contour_levels: result.grid.contour_levels(),
        grid: &result.grid,
    };
    std::fs::write(path, serde_json::to_string_pretty(&export)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimate::optimize::{CountConversion, GridSpec};
    use crate::model::LogNLogS;
    use tempfile::TempDir;

    #[test]
    fn test_write_grid() {
        let spec = GridSpec {
            flux_steps: 5,
            radius_steps: 4,
            ..GridSpec::default()
        };
        let result = optimize(
            &LogNLogS::lehmer2012(),
            OptimizeInput::new(10000.0, 15000.0, 0.0549),
            spec,
            CountConversion::default(),
            PsfProfile::default(),
        )
        .unwrap();

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("grid.json");
        write_grid(&result, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed["cells"].as_array().unwrap().len(), 5);
        assert_eq!(parsed["cells"][0].as_array().unwrap().len(), 4);
        assert_eq!(parsed["contour_levels"].as_array().unwrap().len(), 20);
        assert_eq!(parsed["spec"]["flux_steps"], 5);
    }
}
