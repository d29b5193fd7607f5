//! Closed-form integrals of a single power-law segment
//!
//! For dN/dS proportional to S^(-beta) over [low, high]:
//! - flux:  integral of S^(1-beta) dS = [high^(2-beta) - low^(2-beta)] / (2-beta)
//! - count: integral of S^(-beta) dS  = [high^(1-beta) - low^(1-beta)] / (1-beta)

use crate::error::{Error, Result};

/// Indices closer than this to a singular exponent are rejected
const SINGULAR_TOLERANCE: f64 = 1e-12;

/// Flux-weighted integral of S^(-beta) over [low, high]
pub fn int_flux(low: f64, high: f64, beta: f64) -> Result<f64> {
    antiderivative(low, high, 2.0 - beta)
}

/// Source-count integral of S^(-beta) over [low, high]
pub fn int_count(low: f64, high: f64, beta: f64) -> Result<f64> {
    antiderivative(low, high, 1.0 - beta)
}

/// [high^p - low^p] / p
fn antiderivative(low: f64, high: f64, exponent: f64) -> Result<f64> {
    if !(low.is_finite() && high.is_finite()) || low <= 0.0 {
        return Err(Error::Domain(format!(
            "Segment bounds [{:e}, {:e}] must be finite with a positive lower bound",
            low, high
        )));
    }
    if low > high {
        return Err(Error::Domain(format!(
            "Segment lower bound {:e} exceeds upper bound {:e}",
            low, high
        )));
    }
    if exponent.abs() < SINGULAR_TOLERANCE {
        return Err(Error::Domain(
            "Power-law index makes the antiderivative logarithmic".to_string(),
        ));
    }

    Ok((high.powf(exponent) - low.powf(exponent)) / exponent)
}
