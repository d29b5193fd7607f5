//! Optimal extraction radius and flux cut
//!
//! Scans a grid of flux cuts (rows, log-spaced) and point-source extraction
//! radii (columns, linear) and evaluates the signal-to-noise ratio of the
//! diffuse emission left in the region:
//!
//! ```text
//! usable = area * (1 - N(>S) * pi * (r / 3600)^2)
//! snr    = sqrt(usable) * C_src / sqrt(C_src + C_bkg + C_faint + (1 - EEF(r)) * C_bright)
//! ```
//!
//! where C_faint are the counts of unresolved sources below the cut and
//! C_bright the counts of excised sources whose PSF wings leak outside the
//! extraction radius. Cells where the excised circles cover more than the
//! whole region are undefined.

use crate::constants::instrument::{
    EFFECTIVE_AREA_CM2, EXPOSURE_SECONDS, MAX_SOURCE_FLUX, PHOTON_ENERGY_ERG, PSF_CORE_RADIUS,
    PSF_OUTER_RADIUS, PSF_SLOPE, TYPICAL_BAND,
};
use crate::constants::model::DETECTION_FLOOR;
use crate::constants::units::ARCSEC_PER_DEGREE;
use crate::error::{Error, Result};
use crate::model::LogNLogS;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::debug;

/// Number of contour levels reported for the SNR map
pub const CONTOUR_LEVELS: usize = 20;

/// Observed counts and region size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimizeInput {
    /// Source (diffuse emission) counts in the region
    pub source_counts: f64,
    /// Instrumental background counts in the region
    pub background_counts: f64,
    /// Region area in deg^2
    pub area: f64,
}

impl OptimizeInput {
    pub fn new(source_counts: f64, background_counts: f64, area: f64) -> Self {
        Self {
            source_counts,
            background_counts,
            area,
        }
    }

    fn validate(&self) -> Result<()> {
        if !(self.source_counts.is_finite() && self.source_counts >= 0.0) {
            return Err(Error::Domain(format!(
                "Source counts must be non-negative, got {}",
                self.source_counts
            )));
        }
        if !(self.background_counts.is_finite() && self.background_counts >= 0.0) {
            return Err(Error::Domain(format!(
                "Background counts must be non-negative, got {}",
                self.background_counts
            )));
        }
        if !(self.area.is_finite() && self.area > 0.0) {
            return Err(Error::Domain(format!(
                "Region area must be positive, got {}",
                self.area
            )));
        }
        Ok(())
    }
}

/// Layout of the flux-cut x radius search grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    /// log10 of the first flux cut
    pub flux_log_start: f64,
    /// Flux cut step in dex
    pub flux_log_step: f64,
    /// Number of flux cuts (rows)
    pub flux_steps: usize,
    /// First extraction radius in arcsec
    pub radius_start: f64,
    /// Radius step in arcsec
    pub radius_step: f64,
    /// Number of radii (columns)
    pub radius_steps: usize,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            flux_log_start: -15.5,
            flux_log_step: 0.03,
            flux_steps: 150,
            radius_start: 0.5,
            radius_step: 0.5,
            radius_steps: 100,
        }
    }
}

impl GridSpec {
    /// Flux cut of a grid row
    pub fn flux_cut(&self, row: usize) -> f64 {
        10f64.powf(self.flux_log_start + self.flux_log_step * row as f64)
    }

    /// Extraction radius of a grid column, arcsec
    pub fn radius(&self, col: usize) -> f64 {
        self.radius_start + self.radius_step * col as f64
    }

    fn validate(&self) -> Result<()> {
        if self.flux_steps == 0 || self.radius_steps == 0 {
            return Err(Error::Domain("Search grid has no cells".to_string()));
        }
        if self.flux_cut(0) < DETECTION_FLOOR {
            return Err(Error::Domain(format!(
                "Lowest flux cut {:e} is below the detection limit of {:e}",
                self.flux_cut(0),
                DETECTION_FLOOR
            )));
        }
        if self.flux_cut(self.flux_steps - 1) > MAX_SOURCE_FLUX {
            return Err(Error::Domain(format!(
                "Highest flux cut {:e} exceeds the maximum source flux {:e}",
                self.flux_cut(self.flux_steps - 1),
                MAX_SOURCE_FLUX
            )));
        }
        if self.radius_start < 0.0 || self.radius_step < 0.0 {
            return Err(Error::Domain("Extraction radii must be non-negative".to_string()));
        }
        Ok(())
    }
}

/// Conversion from flux per deg^2 to detected counts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CountConversion {
    pub exposure: f64,
    pub effective_area: f64,
    pub photon_energy: f64,
}

impl Default for CountConversion {
    fn default() -> Self {
        Self {
            exposure: EXPOSURE_SECONDS,
            effective_area: EFFECTIVE_AREA_CM2,
            photon_energy: PHOTON_ENERGY_ERG,
        }
    }
}

impl CountConversion {
    /// Counts from `flux` (erg cm^-2 s^-1 deg^-2) over `area` deg^2
    pub fn counts(&self, flux: f64, area: f64) -> f64 {
        flux * area * self.exposure * self.effective_area / self.photon_energy
    }
}

/// King-like PSF encircled energy, normalized at an outer radius
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PsfProfile {
    pub core_radius: f64,
    pub slope: f64,
    pub outer_radius: f64,
}

impl Default for PsfProfile {
    fn default() -> Self {
        Self {
            core_radius: PSF_CORE_RADIUS,
            slope: PSF_SLOPE,
            outer_radius: PSF_OUTER_RADIUS,
        }
    }
}

impl PsfProfile {
    /// Fraction of a point source's counts within `radius` arcsec
    pub fn encircled_energy(&self, radius: f64) -> f64 {
        let profile = |r: f64| 1.0 - (1.0 + (r / self.core_radius).powi(2)).powf(1.0 - self.slope);
        profile(radius) / profile(self.outer_radius)
    }
}

/// The best cell of an SNR grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimalCut {
    /// Extraction radius in arcsec
    pub radius_arcsec: f64,
    /// Flux cut in erg cm^-2 s^-1
    pub flux_cut: f64,
    pub snr: f64,
    pub row: usize,
    pub col: usize,
}

/// Signal-to-noise ratio over the search grid
///
/// `cells[row][col]`: row indexes the flux cut, col the radius. `None` marks
/// cells where the excised area exceeds the region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnrGrid {
    pub spec: GridSpec,
    pub cells: Vec<Vec<Option<f64>>>,
}

impl SnrGrid {
    fn defined(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, cols)| {
            cols.iter()
                .enumerate()
                .filter_map(move |(col, snr)| snr.map(|value| (row, col, value)))
        })
    }

    /// Cell with the highest SNR; ties keep the first in row-major order
    pub fn best(&self) -> Option<OptimalCut> {
        let mut best: Option<OptimalCut> = None;

        for (row, col, snr) in self.defined() {
            let dominated = best.as_ref().is_some_and(|b| b.snr >= snr);
            if !dominated {
                best = Some(OptimalCut {
                    radius_arcsec: self.spec.radius(col),
                    flux_cut: self.spec.flux_cut(row),
                    snr,
                    row,
                    col,
                });
            }
        }

        best
    }

    pub fn min(&self) -> Option<f64> {
        self.defined().map(|(_, _, snr)| snr).reduce(f64::min)
    }

    pub fn max(&self) -> Option<f64> {
        self.defined().map(|(_, _, snr)| snr).reduce(f64::max)
    }

    /// Evenly spaced SNR levels starting at the minimum, 5% of the range apart
    pub fn contour_levels(&self) -> Vec<f64> {
        match (self.min(), self.max()) {
            (Some(min), Some(max)) => (0..CONTOUR_LEVELS)
                .map(|i| min + 0.05 * (max - min) * i as f64)
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Outcome of the radius and flux-cut search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Optimization {
    pub input: OptimizeInput,
    /// Sources in the region between 1e-15 and 3e-15 erg cm^-2 s^-1
    pub typical_sources: f64,
    pub optimum: OptimalCut,
    pub grid: SnrGrid,
}

/// Search the grid for the extraction radius and flux cut with the best SNR
pub fn optimize(
    model: &LogNLogS,
    input: OptimizeInput,
    spec: GridSpec,
    conversion: CountConversion,
    psf: PsfProfile,
) -> Result<Optimization> {
    input.validate()?;
    spec.validate()?;

    let radius_terms: Vec<(f64, f64)> = (0..spec.radius_steps)
        .map(|col| {
            let radius = spec.radius(col);
            (radius, 1.0 - psf.encircled_energy(radius))
        })
        .collect();

    let mut cells = Vec::with_capacity(spec.flux_steps);
    for row in 0..spec.flux_steps {
        let cut = spec.flux_cut(row);

        let bright_sources = model.cumulative_count(cut, MAX_SOURCE_FLUX)?;
        let faint_counts =
            conversion.counts(model.cumulative_flux(DETECTION_FLOOR, cut)?.flux, input.area);
        let bright_counts =
            conversion.counts(model.cumulative_flux(cut, MAX_SOURCE_FLUX)?.flux, input.area);

        let noise_base = input.source_counts + input.background_counts + faint_counts;
        let row_cells: Vec<Option<f64>> = radius_terms
            .iter()
            .map(|&(radius, leakage)| {
                let excised = bright_sources * PI * (radius / ARCSEC_PER_DEGREE).powi(2);
                let usable = input.area * (1.0 - excised);
                (usable >= 0.0).then(|| {
                    usable.sqrt() * input.source_counts
                        / (noise_base + leakage * bright_counts).sqrt()
                })
            })
            .collect();

        debug!(row, cut, bright_sources, "evaluated flux cut");
        cells.push(row_cells);
    }

    let grid = SnrGrid { spec, cells };
    let optimum = grid
        .best()
        .ok_or_else(|| Error::Domain("No grid cell leaves any usable area".to_string()))?;

    let (band_low, band_high) = TYPICAL_BAND;
    let typical_sources = model.cumulative_count(band_low, band_high)? * input.area;

    Ok(Optimization {
        input,
        typical_sources,
        optimum,
        grid,
    })
}
