//! Output formatters
//!
//! Provides trait-based output formatting for estimator reports.

pub mod json;
pub mod text;

use crate::error::Result;
use crate::estimate::analytic::FluxEstimate;
use crate::estimate::montecarlo::SimulationSummary;
use crate::estimate::optimize::Optimization;
use serde::{Deserialize, Serialize};

/// Result of one estimator run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportBody {
    Optimize(Optimization),
    Flux(FluxEstimate),
    Simulation(SimulationSummary),
}

/// A report with identifying metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Unique ID for this run
    pub id: String,
    /// When the report was produced (RFC 3339)
    pub timestamp: String,
    #[serde(flatten)]
    pub body: ReportBody,
}

impl Report {
    pub fn new(body: ReportBody) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            body,
        }
    }
}

/// Optional sections of a report
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatOptions {
    /// Include the Monte Carlo histogram
    pub histogram: bool,
    /// Include the full SNR grid
    pub grid: bool,
}

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Get the format name
    fn name(&self) -> &str;

    /// Get the format description
    fn description(&self) -> &str;

    /// Format a report
    fn format(&self, report: &Report, options: &FormatOptions) -> Result<String>;
}

/// Get a formatter by name
pub fn get_formatter(name: &str) -> Option<Box<dyn OutputFormatter>> {
    match name.to_lowercase().as_str() {
        "json" => Some(Box::new(json::JsonFormatter)),
        "text" => Some(Box::new(text::TextFormatter)),
        _ => None,
    }
}

/// Format like C's `%e`: six decimals and a signed, two-digit exponent
pub fn c_exp(value: f64) -> String {
    let formatted = format!("{:.6e}", value);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => match exponent.parse::<i32>() {
            Ok(exp) => format!(
                "{}e{}{:02}",
                mantissa,
                if exp < 0 { '-' } else { '+' },
                exp.abs()
            ),
            Err(_) => formatted,
        },
        None => formatted,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::estimate::analytic::residual_flux;
    use crate::estimate::montecarlo::{simulate, SimulationConfig};
    use crate::model::LogNLogS;

    pub fn flux_report() -> Report {
        let estimate = residual_flux(&LogNLogS::lehmer2012(), 3e-15, 0.0549).unwrap();
        Report::new(ReportBody::Flux(estimate))
    }

    pub fn simulation_report() -> Report {
        let config = SimulationConfig::new(3e-15, 0.001, 20).with_seed(1);
        let summary = simulate(&LogNLogS::lehmer2012(), &config).unwrap();
        Report::new(ReportBody::Simulation(summary))
    }
}
