use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

// ---------------------------------------------------------------------------
// Calibration defaults
// ---------------------------------------------------------------------------

/// Lower edge of the analysis window (nm). First sample strictly above is kept.
pub const DEFAULT_WINDOW_LOWER_NM: f64 = 425.0;
/// Upper edge of the analysis window (nm). First sample strictly above is dropped.
pub const DEFAULT_WINDOW_UPPER_NM: f64 = 460.0;
/// Half-width of the region around the maximum excluded from the floor estimate.
pub const DEFAULT_PEAK_HALF_WIDTH_NM: f64 = 10.0;
/// Floor-subtracted values below this are clamped to zero.
pub const DEFAULT_FLOOR_CLIP_COUNTS: f64 = 50.0;
/// Minimum `max - min` intensity span for a trace to be trusted.
pub const DEFAULT_RELIABILITY_SPAN_COUNTS: f64 = 200.0;
/// Duty-cycle-to-thermal-delta calibration of the Hexel hardware.
pub const DEFAULT_THERMAL_DRIFT_FACTOR: f64 = 0.06;
pub const DEFAULT_THERMAL_LOW_DUTY_CYCLE: f64 = 10.0;
pub const DEFAULT_THERMAL_HIGH_DUTY_CYCLE: f64 = 90.0;
/// Duty cycles probed, in order, for the continuous-wave wavelength.
pub const DEFAULT_CONTINUOUS_WAVE_DUTY_CYCLES: [f64; 2] = [99.0, 100.0];

// ---------------------------------------------------------------------------
// AnalysisConfig
// ---------------------------------------------------------------------------

/// Tunable constants of the reduction pipeline and sweep metrics.
///
/// Every field has a default; a JSON file only needs the fields it overrides:
///
/// ```json
/// { "window_lower_nm": 435.0, "window_upper_nm": 455.0 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub window_lower_nm: f64,
    pub window_upper_nm: f64,
    pub peak_half_width_nm: f64,
    pub floor_clip_counts: f64,
    pub reliability_span_counts: f64,
    pub thermal_drift_factor: f64,
    pub thermal_low_duty_cycle: f64,
    pub thermal_high_duty_cycle: f64,
    pub continuous_wave_duty_cycles: Vec<f64>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window_lower_nm: DEFAULT_WINDOW_LOWER_NM,
            window_upper_nm: DEFAULT_WINDOW_UPPER_NM,
            peak_half_width_nm: DEFAULT_PEAK_HALF_WIDTH_NM,
            floor_clip_counts: DEFAULT_FLOOR_CLIP_COUNTS,
            reliability_span_counts: DEFAULT_RELIABILITY_SPAN_COUNTS,
            thermal_drift_factor: DEFAULT_THERMAL_DRIFT_FACTOR,
            thermal_low_duty_cycle: DEFAULT_THERMAL_LOW_DUTY_CYCLE,
            thermal_high_duty_cycle: DEFAULT_THERMAL_HIGH_DUTY_CYCLE,
            continuous_wave_duty_cycles: DEFAULT_CONTINUOUS_WAVE_DUTY_CYCLES.to_vec(),
        }
    }
}

impl AnalysisConfig {
    /// Read a (possibly partial) JSON config and validate it.
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: AnalysisConfig = serde_json::from_str(&text).context("parsing config JSON")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.window_lower_nm < self.window_upper_nm) {
            return Err(AnalysisError::Config(format!(
                "window lower bound {} must be below upper bound {}",
                self.window_lower_nm, self.window_upper_nm
            )));
        }
        if !(self.peak_half_width_nm > 0.0) {
            return Err(AnalysisError::Config(format!(
                "peak half-width must be positive, got {}",
                self.peak_half_width_nm
            )));
        }
        if !(self.thermal_drift_factor > 0.0) {
            return Err(AnalysisError::Config(format!(
                "thermal drift factor must be positive, got {}",
                self.thermal_drift_factor
            )));
        }
        Ok(())
    }
}
