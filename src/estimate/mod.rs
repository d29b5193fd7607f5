//! Estimators built on the log N - log S engine
//!
//! - Optimal extraction radius and flux cut (SNR grid search)
//! - Analytic residual flux with Poisson uncertainty
//! - Monte Carlo residual flux with rejection sampling

pub mod analytic;
pub mod histogram;
pub mod montecarlo;
pub mod optimize;

pub use analytic::{residual_flux, FluxEstimate};
pub use histogram::Histogram;
pub use montecarlo::{simulate, SimulationConfig, SimulationSummary};
pub use optimize::{optimize, GridSpec, OptimalCut, OptimizeInput, SnrGrid};
