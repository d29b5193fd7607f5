//! Uniform-bin histogram for Monte Carlo diagnostics
//!
//! Bin i covers [lower + i * width, lower + (i + 1) * width). Values outside
//! [lower, upper) are not counted.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A fixed-range histogram with equally sized bins
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Histogram {
    pub lower: f64,
    pub upper: f64,
    pub counts: Vec<u64>,
}

/// One histogram bin as reported to the user
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bin {
    pub center: f64,
    pub count: u64,
}

impl Histogram {
    /// Create an empty histogram with `bins` bins spanning [lower, upper)
    pub fn uniform(bins: usize, lower: f64, upper: f64) -> Result<Self> {
        if bins == 0 {
            return Err(Error::Domain("Histogram needs at least one bin".to_string()));
        }
        if !(lower.is_finite() && upper.is_finite()) || upper <= lower {
            return Err(Error::Domain(format!(
                "Invalid histogram range [{:e}, {:e})",
                lower, upper
            )));
        }

        Ok(Self {
            lower,
            upper,
            counts: vec![0; bins],
        })
    }

    pub fn bin_width(&self) -> f64 {
        (self.upper - self.lower) / self.counts.len() as f64
    }

    /// Count a value; returns false when it falls outside the range
    pub fn add(&mut self, value: f64) -> bool {
        if !(value >= self.lower && value < self.upper) {
            return false;
        }
        let index = ((value - self.lower) / self.bin_width()) as usize;
        // rounding can push values just below `upper` into a phantom bin
        let index = index.min(self.counts.len() - 1);
        self.counts[index] += 1;
        true
    }

    /// Bin centers and counts, lowest flux first
    pub fn bins(&self) -> Vec<Bin> {
        let width = self.bin_width();
        self.counts
            .iter()
            .enumerate()
            .map(|(i, &count)| Bin {
                center: self.lower + (i as f64 + 0.5) * width,
                count,
            })
            .collect()
    }

    /// Number of values that landed in a bin
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}
