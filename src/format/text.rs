//! Plain text output formatter
//!
//! Line layout matches the output of the original cxbopt, cxbups and cxbrnd
//! tools so existing scripts can parse it.

use crate::error::Result;
use crate::format::{c_exp, FormatOptions, OutputFormatter, Report, ReportBody};

/// Text formatter
pub struct TextFormatter;

impl OutputFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Plain text, as printed by the cxb tools"
    }

    fn format(&self, report: &Report, options: &FormatOptions) -> Result<String> {
        let mut output = String::new();

        match &report.body {
            ReportBody::Optimize(result) => {
                output.push_str(&format!(
                    "Amount of sources in FOV: {:.6}\n",
                    result.typical_sources
                ));
                output.push_str(&format!(
                    "Optimal radius:   {:.6}\n",
                    result.optimum.radius_arcsec
                ));
                output.push_str(&format!(
                    "Optimal flux cut: {}\n",
                    c_exp(result.optimum.flux_cut)
                ));

                if options.grid {
                    output.push_str("\n# flux_cut radius snr\n");
                    for (row, cols) in result.grid.cells.iter().enumerate() {
                        for (col, snr) in cols.iter().enumerate() {
                            if let Some(snr) = snr {
                                output.push_str(&format!(
                                    "{} {:.6} {:.6}\n",
                                    c_exp(result.grid.spec.flux_cut(row)),
                                    result.grid.spec.radius(col),
                                    snr
                                ));
                            }
                        }
                    }
                }
            }
            ReportBody::Flux(estimate) => {
                let (flux_si, sigma_si) = estimate.to_si();
                output.push_str(&format!(
                    "2-8 keV Flux (cgs):  {} +/- {}  erg/cm2/s \n",
                    c_exp(estimate.flux),
                    c_exp(estimate.sigma)
                ));
                output.push_str(&format!(
                    "2-8 keV Flux (SI) :  {} +/- {}  W/m2 \n",
                    c_exp(flux_si),
                    c_exp(sigma_si)
                ));
            }
            ReportBody::Simulation(summary) => {
                output.push_str(&format!(
                    "{} {} {}\n",
                    c_exp(summary.flux_limit),
                    c_exp(summary.mean),
                    c_exp(summary.std_dev)
                ));

                if options.histogram {
                    for bin in summary.histogram.bins() {
                        let count = bin.count as f64;
                        output.push_str(&format!(
                            "{}  {:.6}  {:.6}\n",
                            c_exp(bin.center),
                            count,
                            count.sqrt()
                        ));
                    }
                }
            }
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::test_support::{flux_report, simulation_report};

    #[test]
    fn test_flux_text_matches_legacy_layout() {
        let output = TextFormatter
            .format(&flux_report(), &FormatOptions::default())
            .unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "2-8 keV Flux (cgs):  3.701745e-13 +/- 1.152947e-14  erg/cm2/s "
        );
        assert_eq!(
            lines[1],
            "2-8 keV Flux (SI) :  3.701745e-16 +/- 1.152947e-17  W/m2 "
        );
    }

    #[test]
    fn test_simulation_text() {
        let report = simulation_report();

        let plain = TextFormatter.format(&report, &FormatOptions::default()).unwrap();
        assert_eq!(plain.lines().count(), 1);
        assert!(plain.starts_with("3.000000e-15 "));

        let options = FormatOptions {
            histogram: true,
            ..FormatOptions::default()
        };
        let with_histogram = TextFormatter.format(&report, &options).unwrap();
        assert_eq!(with_histogram.lines().count(), 31);
    }

    #[test]
    fn test_text_formatter_info() {
        let formatter = TextFormatter;
        assert_eq!(formatter.name(), "text");
        assert!(!formatter.description().is_empty());
    }
}
