//! Analytic residual CXB flux
//!
//! Integrates the model up to the flux limit (resolved sources above it are
//! excised) and propagates the Poisson error on the number of sources
//! between the detection floor and the limit.

use crate::constants::model::{DETECTION_FLOOR, UNRESOLVED_BACKGROUND_FLUX};
use crate::constants::units::CGS_TO_SI;
use crate::error::{Error, Result};
use crate::model::{FloorPolicy, LogNLogS};
use serde::{Deserialize, Serialize};

/// Residual flux in a region and its 1-sigma uncertainty
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FluxEstimate {
    /// Flux limit used for excision, erg cm^-2 s^-1
    pub flux_limit: f64,
    /// Region area in deg^2
    pub area: f64,
    /// Residual flux including the unresolved background
    pub flux: f64,
    /// Poisson uncertainty on `flux`
    pub sigma: f64,
    /// Expected number of sources between the floor and the limit
    pub sources: f64,
}

impl FluxEstimate {
    /// (flux, sigma) in W m^-2
    pub fn to_si(&self) -> (f64, f64) {
        (self.flux * CGS_TO_SI, self.sigma * CGS_TO_SI)
    }
}

/// Residual flux below `flux_limit` in a region of `area` square degrees
pub fn residual_flux(model: &LogNLogS, flux_limit: f64, area: f64) -> Result<FluxEstimate> {
    if !(flux_limit.is_finite() && flux_limit > 0.0) {
        return Err(Error::Domain(format!(
            "Flux limit must be positive, got {:e}",
            flux_limit
        )));
    }
    if !(area.is_finite() && area > 0.0) {
        return Err(Error::Domain(format!("Area must be positive, got {}", area)));
    }

    let total = match model.floor_policy() {
        FloorPolicy::Lenient => model.cumulative_flux(0.0, flux_limit)?.flux,
        FloorPolicy::Strict => {
            model.cumulative_flux(DETECTION_FLOOR, flux_limit)?.flux + UNRESOLVED_BACKGROUND_FLUX
        }
    };

    let resolved = model.cumulative_flux(DETECTION_FLOOR, flux_limit)?.flux * area;
    let sources = model.cumulative_count(DETECTION_FLOOR, flux_limit)? * area;
    if sources <= 0.0 {
        return Err(Error::Domain(format!(
            "No sources expected between {:e} and {:e}",
            DETECTION_FLOOR, flux_limit
        )));
    }

    Ok(FluxEstimate {
        flux_limit,
        area,
        flux: total * area,
        sigma: sources.sqrt() * resolved / sources,
        sources,
    })
}
