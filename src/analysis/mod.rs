//! Spectral reduction and sweep aggregation.
//!
//! Data flows one way: a restricted [`SpectrumTrace`](crate::data::model::SpectrumTrace)
//! becomes a [`DutyCycleSample`] with four moments, samples are gathered into an
//! [`EmitterSweep`] for cross-duty-cycle metrics, and a [`SweepCollection`] holds
//! the sweeps of one test run.

pub mod collection;
pub mod moments;
pub mod sample;
pub mod sweep;

pub use collection::SweepCollection;
pub use moments::{LinearFit, SpectralMoments};
pub use sample::{DutyCycleSample, PeakAnalysis, SampleAnalysis, Unreliability};
pub use sweep::{EmitterSweep, MomentKind};
