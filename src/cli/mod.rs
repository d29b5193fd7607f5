//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod config;
pub mod flux;
pub mod legacy;
pub mod optimize;
pub mod simulate;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::format::{get_formatter, FormatOptions, Report};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Residual Cosmic X-ray Background estimates from the Lehmer log N - log S
#[derive(Parser)]
#[command(name = "cxb-explore")]
#[command(version, about, long_about = None)]
#[command(allow_negative_numbers = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by all subcommands
#[derive(Args, Default)]
pub struct GlobalArgs {
    /// Output format (text, json)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<String>,

    /// Reject fluxes below the detection limit instead of clamping them
    #[arg(long, global = true)]
    pub strict_floor: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Find the extraction radius and flux cut with the best SNR
    Optimize(optimize::OptimizeArgs),

    /// Residual background flux below a flux limit
    Flux(flux::FluxArgs),

    /// Monte Carlo scatter of the residual background flux
    Simulate(simulate::SimulateArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

/// Install the stderr log subscriber; `RUST_LOG` overrides the default level
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Commands::Optimize(args) => optimize::run(args, &cli.global),
        Commands::Flux(args) => flux::run(args, &cli.global),
        Commands::Simulate(args) => simulate::run(args, &cli.global),
        Commands::Config(args) => config::run(args),
    }
}

/// Load the config file and apply the global flag overrides
pub(crate) fn load_config(global: &GlobalArgs) -> Result<Config> {
    let mut config = Config::load()?;
    if global.strict_floor {
        config.engine.strict_floor = true;
    }
    if let Some(format) = &global.format {
        config.output.format = format.clone();
    }
    Ok(config)
}

/// Render a report in the configured format and print it to stdout
pub(crate) fn emit(config: &Config, report: &Report, options: &FormatOptions) -> Result<()> {
    let format = &config.output.format;
    let formatter = get_formatter(format)
        .ok_or_else(|| Error::Config(format!("Unknown format: {}", format)))?;
    let output = formatter.format(report, options)?;
    print!("{}", output);
    if !output.ends_with('\n') {
        println!();
    }
    Ok(())
}
