//! Source population parameters
//!
//! Fits of Lehmer et al. (2012), Table 1, for the 2-8 keV band.

use serde::{Deserialize, Serialize};

/// Power-law parameters of one source population
///
/// dN/dS = k (S / S_ref)^(-beta1) below the break and continues with slope
/// beta2 above it. Populations without a break integrate with beta1 over
/// the whole flux range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PopulationParameters {
    /// Amplitude k at the reference flux
    pub normalization: f64,
    /// Slope below the break
    pub index_below_break: f64,
    /// Slope above the break (unused without a break)
    pub index_above_break: f64,
    /// Flux where the slope changes; `None` means no break applies
    pub break_flux: Option<f64>,
}

impl PopulationParameters {
    /// A single power law
    pub const fn single(normalization: f64, index: f64) -> Self {
        Self {
            normalization,
            index_below_break: index,
            index_above_break: index,
            break_flux: None,
        }
    }

    /// A broken power law
    pub const fn broken(
        normalization: f64,
        index_below_break: f64,
        index_above_break: f64,
        break_flux: f64,
    ) -> Self {
        Self {
            normalization,
            index_below_break,
            index_above_break,
            break_flux: Some(break_flux),
        }
    }
}

/// AGN: broken power law, break at 6.4e-15
pub const AGN: PopulationParameters = PopulationParameters::broken(5.7313e16, 1.32, 2.55, 6.4e-15);

/// Normal galaxies
pub const GALAXIES: PopulationParameters = PopulationParameters::single(1.10e14, 2.29);

/// Galactic stars
pub const STARS: PopulationParameters = PopulationParameters::single(0.64e14, 1.79);

/// The three populations summed by the model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PopulationTable {
    pub agn: PopulationParameters,
    pub galaxies: PopulationParameters,
    pub stars: PopulationParameters,
}

impl PopulationTable {
    /// Lehmer et al. (2012) 2-8 keV fit
    pub const fn lehmer2012() -> Self {
        Self {
            agn: AGN,
            galaxies: GALAXIES,
            stars: STARS,
        }
    }

    /// Iterate over the populations in summation order
    pub fn iter(&self) -> impl Iterator<Item = &PopulationParameters> {
        [&self.agn, &self.galaxies, &self.stars].into_iter()
    }
}

impl Default for PopulationTable {
    fn default() -> Self {
        Self::lehmer2012()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lehmer_table() {
        let table = PopulationTable::default();
        assert_eq!(table.agn.break_flux, Some(6.4e-15));
        assert_eq!(table.galaxies.break_flux, None);
        assert_eq!(table.stars.break_flux, None);
        assert_eq!(table.iter().count(), 3);
    }

    #[test]
    fn test_single_has_equal_indices() {
        assert_eq!(GALAXIES.index_below_break, GALAXIES.index_above_break);
        assert_eq!(STARS.index_below_break, 1.79);
    }
}
