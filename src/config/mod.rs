//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/cxb-explore/config.toml

pub mod defaults;

use crate::error::{Error, Result};
use crate::estimate::montecarlo::SimulationConfig;
use crate::estimate::optimize::{CountConversion, GridSpec};
use crate::model::{FloorPolicy, LogNLogS};
use defaults::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Log N - log S engine behavior
    #[serde(default)]
    pub engine: EngineConfig,

    /// Extraction radius search grid and count conversion
    #[serde(default)]
    pub optimize: OptimizeConfig,

    /// Monte Carlo settings
    #[serde(default)]
    pub simulation: SimulationSettings,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Reject flux queries below the detection floor instead of clamping
    #[serde(default = "default_strict_floor")]
    pub strict_floor: bool,
}

/// Radius search settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeConfig {
    #[serde(default = "default_flux_log_start")]
    pub flux_log_start: f64,

    #[serde(default = "default_flux_log_step")]
    pub flux_log_step: f64,

    #[serde(default = "default_flux_steps")]
    pub flux_steps: usize,

    /// Arcsec
    #[serde(default = "default_radius_start")]
    pub radius_start: f64,

    /// Arcsec
    #[serde(default = "default_radius_step")]
    pub radius_step: f64,

    #[serde(default = "default_radius_steps")]
    pub radius_steps: usize,

    /// Exposure time in seconds
    #[serde(default = "default_exposure")]
    pub exposure: f64,

    /// Effective area in cm^2
    #[serde(default = "default_effective_area")]
    pub effective_area: f64,
}

/// Monte Carlo settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationSettings {
    /// Rejection-sampling attempts allowed per source
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u64,

    #[serde(default = "default_histogram_bins")]
    pub histogram_bins: usize,

    /// Fixed seed for reproducible runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format
    #[serde(default = "default_format")]
    pub format: String,
}

// Default value functions for serde
fn default_strict_floor() -> bool {
    DEFAULT_STRICT_FLOOR
}
fn default_flux_log_start() -> f64 {
    DEFAULT_FLUX_LOG_START
}
fn default_flux_log_step() -> f64 {
    DEFAULT_FLUX_LOG_STEP
}
fn default_flux_steps() -> usize {
    DEFAULT_FLUX_STEPS
}
fn default_radius_start() -> f64 {
    DEFAULT_RADIUS_START
}
fn default_radius_step() -> f64 {
    DEFAULT_RADIUS_STEP
}
fn default_radius_steps() -> usize {
    DEFAULT_RADIUS_STEPS
}
fn default_exposure() -> f64 {
    crate::constants::instrument::EXPOSURE_SECONDS
}
fn default_effective_area() -> f64 {
    crate::constants::instrument::EFFECTIVE_AREA_CM2
}
fn default_max_attempts() -> u64 {
    DEFAULT_MAX_ATTEMPTS
}
fn default_histogram_bins() -> usize {
    DEFAULT_HISTOGRAM_BINS
}
fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strict_floor: default_strict_floor(),
        }
    }
}

impl Default for OptimizeConfig {
    fn default() -> Self {
        Self {
            flux_log_start: default_flux_log_start(),
            flux_log_step: default_flux_log_step(),
            flux_steps: default_flux_steps(),
            radius_start: default_radius_start(),
            radius_step: default_radius_step(),
            radius_steps: default_radius_steps(),
            exposure: default_exposure(),
            effective_area: default_effective_area(),
        }
    }
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            histogram_bins: default_histogram_bins(),
            seed: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, writing defaults there if missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

            toml::from_str(&content)
                .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["engine", "strict_floor"] => Some(self.engine.strict_floor.to_string()),

            ["optimize", "flux_log_start"] => Some(self.optimize.flux_log_start.to_string()),
            ["optimize", "flux_log_step"] => Some(self.optimize.flux_log_step.to_string()),
            ["optimize", "flux_steps"] => Some(self.optimize.flux_steps.to_string()),
            ["optimize", "radius_start"] => Some(self.optimize.radius_start.to_string()),
            ["optimize", "radius_step"] => Some(self.optimize.radius_step.to_string()),
            ["optimize", "radius_steps"] => Some(self.optimize.radius_steps.to_string()),
            ["optimize", "exposure"] => Some(self.optimize.exposure.to_string()),
            ["optimize", "effective_area"] => Some(self.optimize.effective_area.to_string()),

            ["simulation", "max_attempts"] => Some(self.simulation.max_attempts.to_string()),
            ["simulation", "histogram_bins"] => Some(self.simulation.histogram_bins.to_string()),
            ["simulation", "seed"] => Some(
                self.simulation
                    .seed
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "none".to_string()),
            ),

            ["output", "format"] => Some(self.output.format.clone()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["engine", "strict_floor"] => self.engine.strict_floor = parse_value(key, value)?,

            ["optimize", "flux_log_start"] => self.optimize.flux_log_start = parse_value(key, value)?,
            ["optimize", "flux_log_step"] => self.optimize.flux_log_step = parse_value(key, value)?,
            ["optimize", "flux_steps"] => self.optimize.flux_steps = parse_value(key, value)?,
            ["optimize", "radius_start"] => self.optimize.radius_start = parse_value(key, value)?,
            ["optimize", "radius_step"] => self.optimize.radius_step = parse_value(key, value)?,
            ["optimize", "radius_steps"] => self.optimize.radius_steps = parse_value(key, value)?,
            ["optimize", "exposure"] => self.optimize.exposure = parse_value(key, value)?,
            ["optimize", "effective_area"] => self.optimize.effective_area = parse_value(key, value)?,

            ["simulation", "max_attempts"] => self.simulation.max_attempts = parse_value(key, value)?,
            ["simulation", "histogram_bins"] => {
                self.simulation.histogram_bins = parse_value(key, value)?
            }
            ["simulation", "seed"] => {
                self.simulation.seed = match value {
                    "" | "none" => None,
                    _ => Some(parse_value(key, value)?),
                }
            }

            ["output", "format"] => {
                if crate::format::get_formatter(value).is_none() {
                    return Err(Error::Config(format!("Unknown output format: {}", value)));
                }
                self.output.format = value.to_lowercase();
            }

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "engine.strict_floor",
            "optimize.flux_log_start",
            "optimize.flux_log_step",
            "optimize.flux_steps",
            "optimize.radius_start",
            "optimize.radius_step",
            "optimize.radius_steps",
            "optimize.exposure",
            "optimize.effective_area",
            "simulation.max_attempts",
            "simulation.histogram_bins",
            "simulation.seed",
            "output.format",
        ]
    }

    /// Engine with the configured floor policy
    pub fn model(&self) -> LogNLogS {
        let policy = if self.engine.strict_floor {
            FloorPolicy::Strict
        } else {
            FloorPolicy::Lenient
        };
        LogNLogS::lehmer2012().with_floor_policy(policy)
    }

    pub fn grid_spec(&self) -> GridSpec {
        GridSpec {
            flux_log_start: self.optimize.flux_log_start,
            flux_log_step: self.optimize.flux_log_step,
            flux_steps: self.optimize.flux_steps,
            radius_start: self.optimize.radius_start,
            radius_step: self.optimize.radius_step,
            radius_steps: self.optimize.radius_steps,
        }
    }

    pub fn count_conversion(&self) -> CountConversion {
        CountConversion {
            exposure: self.optimize.exposure,
            effective_area: self.optimize.effective_area,
            ..CountConversion::default()
        }
    }

    /// Monte Carlo parameters for one run
    pub fn simulation_config(&self, flux_limit: f64, area: f64, iterations: usize) -> SimulationConfig {
        SimulationConfig {
            max_attempts_per_source: self.simulation.max_attempts,
            histogram_bins: self.simulation.histogram_bins,
            seed: self.simulation.seed,
            ..SimulationConfig::new(flux_limit, area, iterations)
        }
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("Invalid value for {}: {}", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(!config.engine.strict_floor);
        assert_eq!(config.optimize.flux_steps, 150);
        assert_eq!(config.optimize.radius_steps, 100);
        assert_eq!(config.simulation.histogram_bins, 30);
        assert_eq!(config.simulation.seed, None);
        assert_eq!(config.output.format, "text");
    }

    #[test]
    fn test_get_set() {
        let mut config = Config::default();

        assert_eq!(config.get("engine.strict_floor"), Some("false".to_string()));

        config.set("engine.strict_floor", "true").unwrap();
        assert_eq!(config.get("engine.strict_floor"), Some("true".to_string()));
        assert_eq!(config.model().floor_policy(), FloorPolicy::Strict);

        config.set("optimize.radius_step", "0.25").unwrap();
        assert_eq!(config.optimize.radius_step, 0.25);
        assert_eq!(config.grid_spec().radius_step, 0.25);

        config.set("simulation.seed", "1234").unwrap();
        assert_eq!(config.simulation_config(3e-15, 0.05, 10).seed, Some(1234));
        config.set("simulation.seed", "none").unwrap();
        assert_eq!(config.get("simulation.seed"), Some("none".to_string()));
    }

    #[test]
    fn test_get_invalid_key() {
        let config = Config::default();
        assert_eq!(config.get("invalid.key"), None);
    }

    #[test]
    fn test_set_invalid_key() {
        let mut config = Config::default();
        let result = config.set("invalid.key", "value");
        assert!(result.is_err());
    }

    #[test]
    fn test_set_invalid_value() {
        let mut config = Config::default();
        assert!(config.set("optimize.flux_steps", "not_a_number").is_err());
        assert!(config.set("engine.strict_floor", "maybe").is_err());
        assert!(config.set("output.format", "xml").is_err());
    }

    #[test]
    fn test_simulation_config_from_settings() {
        let mut config = Config::default();
        config.simulation.max_attempts = 500;
        config.simulation.histogram_bins = 12;

        let sim = config.simulation_config(3e-15, 0.0549, 100);
        assert_eq!(sim.max_attempts_per_source, 500);
        assert_eq!(sim.histogram_bins, 12);
        assert_eq!(sim.iterations, 100);
        assert_eq!(sim.flux_limit, 3e-15);
    }

    #[test]
    fn test_load_creates_default() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join(CONFIG_FILE_NAME);

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.optimize.flux_steps, 150);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);

        let mut config = Config::default();
        config.engine.strict_floor = true;
        config.simulation.seed = Some(7);
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert!(loaded.engine.strict_floor);
        assert_eq!(loaded.simulation.seed, Some(7));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[engine]\nstrict_floor = true\n").unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert!(loaded.engine.strict_floor);
        assert_eq!(loaded.optimize.radius_start, 0.5);
        assert_eq!(loaded.output.format, "text");
    }

    #[test]
    fn test_serialization_format() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();

        // Check that key sections exist
        assert!(toml.contains("[engine]"));
        assert!(toml.contains("[optimize]"));
        assert!(toml.contains("[simulation]"));
        assert!(toml.contains("[output]"));
        assert!(!toml.contains("seed"));
    }

    #[test]
    fn test_available_keys() {
        let config = Config::default();
        for key in Config::available_keys() {
            assert!(config.get(key).is_some(), "key {} not readable", key);
        }
    }
}
