//! Log N - log S evaluation engine
//!
//! Combines the population table with the segment integrals to produce
//! cumulative source counts and cumulative flux over a flux interval, and
//! the pointwise differential density dN/dS.
//!
//! Broken populations are split at their break flux. Above the break the
//! amplitude is rescaled by (fb / S_ref)^(beta2 - beta1) so the power law is
//! continuous at fb.

use crate::constants::model::{
    DENSITY_SCALE, DETECTION_FLOOR, REFERENCE_FLUX, UNRESOLVED_BACKGROUND_FLUX,
};
use crate::error::{Error, Result};
use crate::model::population::{PopulationParameters, PopulationTable};
use crate::model::segment::{int_count, int_flux};
use crate::model::FluxInterval;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How flux queries treat a lower bound below the detection floor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloorPolicy {
    /// Clamp the lower bound to the floor and add the unresolved background
    #[default]
    Lenient,
    /// Reject the query with a domain error
    Strict,
}

/// Result of a cumulative flux query
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FluxIntegral {
    /// Integrated flux per square degree, erg cm^-2 s^-1 deg^-2
    pub flux: f64,
    /// True when the lower bound was clamped to the detection floor and the
    /// unresolved background was added to `flux`
    pub floor_substituted: bool,
}

/// The combined AGN + galaxy + star source-count model
#[derive(Debug, Clone, Default)]
pub struct LogNLogS {
    populations: PopulationTable,
    floor_policy: FloorPolicy,
}

impl LogNLogS {
    /// Create an engine over an arbitrary population table
    pub fn new(populations: PopulationTable, floor_policy: FloorPolicy) -> Self {
        Self {
            populations,
            floor_policy,
        }
    }

    /// The Lehmer et al. (2012) model with lenient floor handling
    pub fn lehmer2012() -> Self {
        Self::default()
    }

    /// Same populations, different floor handling
    pub fn with_floor_policy(mut self, floor_policy: FloorPolicy) -> Self {
        self.floor_policy = floor_policy;
        self
    }

    pub fn populations(&self) -> &PopulationTable {
        &self.populations
    }

    pub fn floor_policy(&self) -> FloorPolicy {
        self.floor_policy
    }

    /// Integrated flux of all sources with fmin <= S <= fmax
    ///
    /// A lower bound below the detection floor is clamped to the floor and
    /// seeds the result with the unresolved background, unless the engine
    /// uses [`FloorPolicy::Strict`].
    pub fn cumulative_flux(&self, fmin: f64, fmax: f64) -> Result<FluxIntegral> {
        let mut interval = FluxInterval::new(fmin, fmax);
        interval.validate()?;

        let mut flux = 0.0;
        let floor_substituted = interval.min < DETECTION_FLOOR;
        if floor_substituted {
            if self.floor_policy == FloorPolicy::Strict {
                return Err(below_floor(interval.min));
            }
            debug!(
                fmin = interval.min,
                "flux query below detection floor, clamping and adding unresolved background"
            );
            interval.min = DETECTION_FLOOR;
            flux = UNRESOLVED_BACKGROUND_FLUX;
        }
        interval.validate()?;

        flux += self.integrate(interval, int_flux)?;

        Ok(FluxIntegral {
            flux,
            floor_substituted,
        })
    }

    /// Number of sources per square degree with fmin <= S <= fmax
    ///
    /// The count model has no unresolved component, so fmin below the
    /// detection floor is always a domain error.
    pub fn cumulative_count(&self, fmin: f64, fmax: f64) -> Result<f64> {
        let interval = FluxInterval::new(fmin, fmax);
        interval.validate()?;
        if interval.min < DETECTION_FLOOR {
            return Err(below_floor(interval.min));
        }

        self.integrate(interval, int_count)
    }

    /// dN/dS at flux `s`, divided by [`DENSITY_SCALE`]
    pub fn differential_density(&self, s: f64) -> Result<f64> {
        if !s.is_finite() || s <= 0.0 {
            return Err(Error::Domain(format!(
                "Differential density requires a positive finite flux, got {:e}",
                s
            )));
        }

        let density: f64 = self
            .populations
            .iter()
            .map(|population| match population.break_flux {
                Some(fb) if s > fb => {
                    continuity_factor(population, fb)
                        * (s / REFERENCE_FLUX).powf(-population.index_above_break)
                }
                _ => {
                    population.normalization
                        * (s / REFERENCE_FLUX).powf(-population.index_below_break)
                }
            })
            .sum();

        Ok(density / DENSITY_SCALE)
    }

    /// Sum `kernel` over every population, splitting at break fluxes
    fn integrate(
        &self,
        interval: FluxInterval,
        kernel: fn(f64, f64, f64) -> Result<f64>,
    ) -> Result<f64> {
        let mut total = 0.0;

        for population in self.populations.iter() {
            let beta1 = population.index_below_break;
            let below_amplitude = population.normalization * REFERENCE_FLUX.powf(beta1);

            match population.break_flux {
                None => {
                    total += below_amplitude * kernel(interval.min, interval.max, beta1)?;
                }
                Some(fb) => {
                    if interval.min <= fb {
                        total += below_amplitude * kernel(interval.min, interval.max.min(fb), beta1)?;
                    }
                    if interval.max > fb {
                        let beta2 = population.index_above_break;
                        let above_amplitude =
                            continuity_factor(population, fb) * REFERENCE_FLUX.powf(beta2);
                        total += above_amplitude * kernel(interval.min.max(fb), interval.max, beta2)?;
                    }
                }
            }
        }

        Ok(total)
    }
}

/// Amplitude above the break that keeps dN/dS continuous at `fb`
fn continuity_factor(population: &PopulationParameters, fb: f64) -> f64 {
    population.normalization
        * (fb / REFERENCE_FLUX).powf(population.index_above_break - population.index_below_break)
}

fn below_floor(fmin: f64) -> Error {
    Error::Domain(format!(
        "Flux limit {:e} is below the detection limit of {:e}",
        fmin, DETECTION_FLOOR
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const BREAK: f64 = 6.4e-15;

    fn engine() -> LogNLogS {
        LogNLogS::lehmer2012()
    }

    #[test]
    fn test_continuity_at_break() {
        let model = engine();
        let below = model.differential_density(BREAK).unwrap();
        let above = model.differential_density(BREAK * (1.0 + 1e-12)).unwrap();
        assert_relative_eq!(below, above, max_relative = 1e-9);
        assert_relative_eq!(below, 1.0374680412386433e-3, max_relative = 1e-9);
    }

    #[test]
    fn test_density_reference_values() {
        let model = engine();
        assert_relative_eq!(
            model.differential_density(1.4e-16).unwrap(),
            0.1811448451356695,
            max_relative = 1e-9
        );
        assert_relative_eq!(
            model.differential_density(1e-13).unwrap(),
            9.48962769544698e-7,
            max_relative = 1e-9
        );
    }

    #[test]
    fn test_density_decreasing() {
        let model = engine();
        let mut previous = f64::INFINITY;
        for i in 0..50 {
            let s = 10f64.powf(-15.8 + 0.06 * i as f64);
            let density = model.differential_density(s).unwrap();
            assert!(density < previous, "dN/dS not decreasing at {:e}", s);
            previous = density;
        }
    }

    #[test]
    fn test_density_rejects_non_positive() {
        let model = engine();
        assert!(model.differential_density(0.0).is_err());
        assert!(model.differential_density(-1e-15).is_err());
        assert!(model.differential_density(f64::NAN).is_err());
    }

    #[test]
    fn test_reference_count_and_flux() {
        let model = engine();
        assert_relative_eq!(
            model.cumulative_count(1.4e-16, 1e-13).unwrap(),
            5608.083785848635,
            max_relative = 1e-9
        );
        let integral = model.cumulative_flux(1.4e-16, 1e-13).unwrap();
        assert!(!integral.floor_substituted);
        assert_relative_eq!(integral.flux, 1.1904770517139271e-11, max_relative = 1e-9);
    }

    #[test]
    fn test_interval_entirely_above_break() {
        let model = engine();
        assert_relative_eq!(
            model.cumulative_count(1e-14, 1e-13).unwrap(),
            209.03016726558064,
            max_relative = 1e-9
        );
        assert_relative_eq!(
            model.cumulative_flux(1e-14, 1e-13).unwrap().flux,
            4.3597196928894954e-12,
            max_relative = 1e-9
        );
    }

    #[test]
    fn test_flux_additivity() {
        let model = engine();
        // straddles the break and the split point sits on either side of it
        for mid in [1e-15, BREAK, 2e-14] {
            let whole = model.cumulative_flux(1.4e-16, 1e-13).unwrap().flux;
            let left = model.cumulative_flux(1.4e-16, mid).unwrap().flux;
            let right = model.cumulative_flux(mid, 1e-13).unwrap().flux;
            assert_relative_eq!(whole, left + right, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_flux_additivity_counts_background_once() {
        let model = engine();
        let whole = model.cumulative_flux(0.0, 1e-13).unwrap();
        let left = model.cumulative_flux(0.0, 3e-15).unwrap();
        let right = model.cumulative_flux(3e-15, 1e-13).unwrap();
        assert!(whole.floor_substituted && left.floor_substituted);
        assert!(!right.floor_substituted);
        assert_relative_eq!(whole.flux, left.flux + right.flux, max_relative = 1e-12);
    }

    #[test]
    fn test_count_additivity() {
        let model = engine();
        let whole = model.cumulative_count(2e-16, 5e-14).unwrap();
        let left = model.cumulative_count(2e-16, BREAK).unwrap();
        let right = model.cumulative_count(BREAK, 5e-14).unwrap();
        assert_relative_eq!(whole, left + right, max_relative = 1e-12);
    }

    #[test]
    fn test_monotonicity() {
        let model = engine();
        let fixed_min = 2e-16;
        let fixed_max = 1e-12;
        let mut last_count = 0.0;
        let mut last_flux = 0.0;
        let mut last_count_rev = f64::INFINITY;
        let mut last_flux_rev = f64::INFINITY;

        for i in 0..40 {
            let f = 10f64.powf(-15.6 + 0.09 * i as f64);

            let count = model.cumulative_count(fixed_min, f).unwrap();
            let flux = model.cumulative_flux(fixed_min, f).unwrap().flux;
            assert!(count >= last_count && flux >= last_flux);
            last_count = count;
            last_flux = flux;

            let count_rev = model.cumulative_count(f, fixed_max).unwrap();
            let flux_rev = model.cumulative_flux(f, fixed_max).unwrap().flux;
            assert!(count_rev <= last_count_rev && flux_rev <= last_flux_rev);
            last_count_rev = count_rev;
            last_flux_rev = flux_rev;
        }
    }

    #[test]
    fn test_degenerate_interval() {
        let model = engine();
        for f in [3e-15, BREAK, 5e-14] {
            assert_eq!(model.cumulative_count(f, f).unwrap(), 0.0);
            assert_eq!(model.cumulative_flux(f, f).unwrap().flux, 0.0);
        }
        // at the floor the seed is the only contribution
        let seeded = model.cumulative_flux(1e-16, 1.4e-16).unwrap();
        assert_relative_eq!(seeded.flux, UNRESOLVED_BACKGROUND_FLUX, max_relative = 1e-12);
    }

    #[test]
    fn test_count_below_floor_is_error() {
        let model = engine();
        assert!(matches!(model.cumulative_count(1e-16, 1e-13), Err(Error::Domain(_))));
        assert!(matches!(model.cumulative_count(0.0, 1e-13), Err(Error::Domain(_))));
        assert!(model.cumulative_count(DETECTION_FLOOR, 1e-13).is_ok());
    }

    #[test]
    fn test_flux_below_floor_substitutes() {
        let model = engine();
        let clamped = model.cumulative_flux(1e-16, 3e-15).unwrap();
        let at_floor = model.cumulative_flux(DETECTION_FLOOR, 3e-15).unwrap();

        assert!(clamped.floor_substituted);
        assert!(!at_floor.floor_substituted);
        assert_relative_eq!(
            clamped.flux,
            at_floor.flux + UNRESOLVED_BACKGROUND_FLUX,
            max_relative = 1e-12
        );
        assert_relative_eq!(at_floor.flux, 3.342704687012949e-12, max_relative = 1e-9);
    }

    #[test]
    fn test_strict_floor_rejects_flux_query() {
        let model = engine().with_floor_policy(FloorPolicy::Strict);
        assert_eq!(model.floor_policy(), FloorPolicy::Strict);
        assert!(matches!(model.cumulative_flux(0.0, 3e-15), Err(Error::Domain(_))));
        assert!(model.cumulative_flux(DETECTION_FLOOR, 3e-15).is_ok());
    }

    #[test]
    fn test_invalid_intervals() {
        let model = engine();
        assert!(model.cumulative_flux(1e-14, 1e-15).is_err());
        assert!(model.cumulative_count(1e-14, 1e-15).is_err());
        assert!(model.cumulative_flux(-1.0, 1e-15).is_err());
        // clamped lower bound above the upper bound
        assert!(model.cumulative_flux(0.0, 1e-16).is_err());
    }

    #[test]
    fn test_injected_population_table() {
        let single = PopulationParameters::single(1.0e14, 1.5);
        let table = PopulationTable {
            agn: single,
            galaxies: single,
            stars: single,
        };
        let model = LogNLogS::new(table, FloorPolicy::Lenient);
        let expected = 3.0 * 1.0e14 * REFERENCE_FLUX.powf(1.5) * int_count(1e-15, 1e-14, 1.5).unwrap();
        assert_relative_eq!(
            model.cumulative_count(1e-15, 1e-14).unwrap(),
            expected,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_singular_index_propagates() {
        let singular = PopulationParameters::single(1.0e14, 2.0);
        let table = PopulationTable {
            galaxies: singular,
            ..PopulationTable::default()
        };
        let model = LogNLogS::new(table, FloorPolicy::Lenient);
        assert!(matches!(model.cumulative_flux(1e-15, 1e-14), Err(Error::Domain(_))));
        assert!(model.cumulative_count(1e-15, 1e-14).is_ok());
    }
}
