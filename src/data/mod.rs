/// Data layer: the trace container and the file adapters that feed it.
///
/// Architecture:
/// ```text
///  <run>/emitter-N/dc-<value>.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse table → SpectrumTrace, file name → duty cycle
///   └──────────┘
///        │
///        ▼
///   ┌───────────────┐
///   │ SpectrumTrace  │  paired wavelength / intensity arrays
///   └───────────────┘
///        │
///        ▼
///    analysis::{DutyCycleSample, EmitterSweep, SweepCollection}
/// ```

pub mod loader;
pub mod model;
