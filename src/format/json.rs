//! JSON output formatter

use crate::error::Result;
use crate::format::{FormatOptions, OutputFormatter, Report};

/// JSON formatter - outputs the report as pretty-printed JSON
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Full JSON report"
    }

    fn format(&self, report: &Report, options: &FormatOptions) -> Result<String> {
        let mut value = serde_json::to_value(report)?;

        if let Some(object) = value.as_object_mut() {
            if !options.grid {
                object.remove("grid");
            }
            if !options.histogram {
                object.remove("histogram");
            }
        }

        Ok(serde_json::to_string_pretty(&value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::test_support::{flux_report, simulation_report};

    #[test]
    fn test_json_format() {
        let output = JsonFormatter
            .format(&flux_report(), &FormatOptions::default())
            .unwrap();

        // Verify it's valid JSON
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert!(parsed.get("id").is_some());
        assert!(parsed.get("timestamp").is_some());
        assert_eq!(parsed["kind"], "flux");
        assert!(parsed.get("sigma").is_some());
    }

    #[test]
    fn test_histogram_optional() {
        let report = simulation_report();

        let without = JsonFormatter.format(&report, &FormatOptions::default()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&without).unwrap();
        assert_eq!(parsed["kind"], "simulation");
        assert!(parsed.get("histogram").is_none());

        let options = FormatOptions {
            histogram: true,
            ..FormatOptions::default()
        };
        let with = JsonFormatter.format(&report, &options).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&with).unwrap();
        assert_eq!(parsed["histogram"]["counts"].as_array().unwrap().len(), 30);
    }

    #[test]
    fn test_json_formatter_info() {
        let formatter = JsonFormatter;
        assert_eq!(formatter.name(), "json");
        assert!(!formatter.description().is_empty());
    }
}
