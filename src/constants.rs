//! Centralized constants for the cxb-explore crate
//!
//! Physical reference values shared by the log N - log S engine and the
//! estimators built on top of it. All fluxes are 2-8 keV, erg cm^-2 s^-1.

/// Reference values of the Lehmer et al. (2012) source-count model
pub mod model {
    /// Normalization pivot shared by every population and integral
    pub const REFERENCE_FLUX: f64 = 1.0e-14;

    /// Deepest survey detection limit (Hickox & Markevitch 2006, sect. 3.2).
    /// The model is undefined below this flux.
    pub const DETECTION_FLOOR: f64 = 1.4e-16;

    /// Permanently unresolved background, erg cm^-2 s^-1 deg^-2
    pub const UNRESOLVED_BACKGROUND_FLUX: f64 = 3.4e-12;

    /// Numerical-conditioning divisor applied to dN/dS so that the density
    /// over the sampled flux range sits below 1 and can be compared against
    /// a uniform deviate. Not a physical quantity.
    pub const DENSITY_SCALE: f64 = 1.0e20;
}

/// Instrument and survey assumptions used by the estimators
pub mod instrument {
    /// Upper flux limit for source integrals in the extraction radius search
    pub const MAX_SOURCE_FLUX: f64 = 1.0e-11;

    /// Upper flux of the Monte Carlo proposal distribution
    pub const SIMULATION_MAX_FLUX: f64 = 1.0e-13;

    /// Exposure time in seconds used to convert flux to counts
    pub const EXPOSURE_SECONDS: f64 = 1.0e5;

    /// Effective area in cm^2 used to convert flux to counts
    pub const EFFECTIVE_AREA_CM2: f64 = 1.0e3;

    /// Mean photon energy in erg (about 4 keV)
    pub const PHOTON_ENERGY_ERG: f64 = 6.408e-9;

    /// PSF encircled-energy core radius in arcsec
    pub const PSF_CORE_RADIUS: f64 = 4.18;

    /// PSF encircled-energy power-law slope
    pub const PSF_SLOPE: f64 = 1.4;

    /// Radius in arcsec at which the encircled energy is normalized to 1
    pub const PSF_OUTER_RADIUS: f64 = 300.0;

    /// Flux band used to quote the typical number of sources in a field
    pub const TYPICAL_BAND: (f64, f64) = (1.0e-15, 3.0e-15);
}

/// Unit conversions
pub mod units {
    /// erg cm^-2 s^-1 to W m^-2
    pub const CGS_TO_SI: f64 = 1.0e-3;

    pub const ARCSEC_PER_DEGREE: f64 = 3600.0;
}
