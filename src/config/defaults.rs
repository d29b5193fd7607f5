//! Default configuration values
//!
//! Named constants for all tunable parameters

/// Reject flux queries below the detection floor instead of clamping
pub const DEFAULT_STRICT_FLOOR: bool = false;

/// log10 of the faintest flux cut in the radius search
pub const DEFAULT_FLUX_LOG_START: f64 = -15.5;

/// Flux cut step in dex
pub const DEFAULT_FLUX_LOG_STEP: f64 = 0.03;

/// Number of flux cuts
pub const DEFAULT_FLUX_STEPS: usize = 150;

/// Smallest extraction radius in arcsec
pub const DEFAULT_RADIUS_START: f64 = 0.5;

/// Extraction radius step in arcsec
pub const DEFAULT_RADIUS_STEP: f64 = 0.5;

/// Number of extraction radii
pub const DEFAULT_RADIUS_STEPS: usize = 100;

/// Cap on rejection-sampling attempts per simulated source
pub const DEFAULT_MAX_ATTEMPTS: u64 = crate::estimate::montecarlo::DEFAULT_MAX_ATTEMPTS;

/// Histogram bins for Monte Carlo diagnostics
pub const DEFAULT_HISTOGRAM_BINS: usize = crate::estimate::montecarlo::DEFAULT_HISTOGRAM_BINS;

/// Default output format
pub const DEFAULT_FORMAT: &str = "text";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "cxb-explore";
