//! Emission-spectrum analysis for Hexel duty-cycle sweeps.
//!
//! Each spectrometer trace is cut to the analysis window, cleared of its
//! noise floor, normalized and reduced to weighted mean wavelength, standard
//! deviation, skewness and kurtosis. Samples of one emitter are then combined
//! into thermal drift, continuous-wave wavelength and a wavelength-vs-duty-cycle
//! fit.

pub mod analysis;
pub mod config;
pub mod data;
pub mod error;
pub mod report;

pub use analysis::{DutyCycleSample, EmitterSweep, SweepCollection};
pub use config::AnalysisConfig;
pub use data::model::SpectrumTrace;
pub use error::AnalysisError;
