//! Lehmer log N - log S model
//!
//! This module handles:
//! - Fixed population parameter sets (AGN, galaxies, stars)
//! - Closed-form integration of single power-law segments
//! - Cumulative source counts, cumulative flux and dN/dS over the
//!   combined populations

pub mod engine;
pub mod population;
pub mod segment;

pub use engine::{FloorPolicy, FluxIntegral, LogNLogS};
pub use population::{PopulationParameters, PopulationTable};

use crate::error::{Error, Result};

/// A flux interval [min, max] in erg cm^-2 s^-1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluxInterval {
    pub min: f64,
    pub max: f64,
}

impl FluxInterval {
    /// Create a new interval without validation
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Validate ordering and sign
    ///
    /// Both bounds must be finite and non-negative, and min <= max.
    pub fn validate(&self) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(Error::Domain(format!(
                "Flux interval [{:e}, {:e}] is not finite",
                self.min, self.max
            )));
        }
        if self.min < 0.0 || self.max < 0.0 {
            return Err(Error::Domain(format!(
                "Flux interval [{:e}, {:e}] contains negative flux",
                self.min, self.max
            )));
        }
        if self.min > self.max {
            return Err(Error::Domain(format!(
                "Flux interval lower bound {:e} exceeds upper bound {:e}",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_ordering() {
        assert!(FluxInterval::new(1e-15, 1e-14).validate().is_ok());
        assert!(FluxInterval::new(1e-15, 1e-15).validate().is_ok());
        assert!(FluxInterval::new(1e-14, 1e-15).validate().is_err());
    }

    #[test]
    fn test_validate_sign_and_finite() {
        assert!(FluxInterval::new(-1e-15, 1e-14).validate().is_err());
        assert!(FluxInterval::new(1e-15, f64::NAN).validate().is_err());
        assert!(FluxInterval::new(1e-15, f64::INFINITY).validate().is_err());
        assert!(FluxInterval::new(0.0, 1e-14).validate().is_ok());
    }
}
