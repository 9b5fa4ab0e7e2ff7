use crate::analysis::moments::{self, LinearFit, SpectralMoments};
use crate::analysis::sample::DutyCycleSample;
use crate::config::AnalysisConfig;
use crate::data::model::SpectrumTrace;
use crate::error::{AnalysisError, Result};

/// Which statistic to pull out of each reliable sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MomentKind {
    WeightedMean,
    StdDev,
    Skewness,
    Kurtosis,
}

impl MomentKind {
    fn pick(self, m: &SpectralMoments) -> Option<f64> {
        match self {
            MomentKind::WeightedMean => Some(m.weighted_mean),
            MomentKind::StdDev => Some(m.std_dev),
            MomentKind::Skewness => m.skewness,
            MomentKind::Kurtosis => m.kurtosis,
        }
    }
}

// ---------------------------------------------------------------------------
// EmitterSweep
// ---------------------------------------------------------------------------

/// All duty-cycle samples measured on one emitter, kept sorted by duty cycle.
#[derive(Debug, Clone)]
pub struct EmitterSweep {
    label: String,
    hexel_id: String,
    config: AnalysisConfig,
    samples: Vec<DutyCycleSample>,
}

impl EmitterSweep {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            hexel_id: String::new(),
            config: AnalysisConfig::default(),
            samples: Vec::new(),
        }
    }

    /// Empty sweep analyzed with `config`, which is validated first.
    pub fn with_config(label: impl Into<String>, config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new(label)
        })
    }

    pub fn with_hexel_id(mut self, hexel_id: impl Into<String>) -> Self {
        self.hexel_id = hexel_id.into();
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn hexel_id(&self) -> &str {
        &self.hexel_id
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Emitter number: the part of the label after its last `-`.
    pub fn emitter_number(&self) -> &str {
        self.label.rsplit('-').next().unwrap_or(&self.label)
    }

    /// Samples in ascending duty-cycle order.
    pub fn samples(&self) -> &[DutyCycleSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Analyze every `(trace, duty cycle)` pair and merge them into the sweep.
    ///
    /// All-or-nothing: if any pair fails to analyze or repeats a duty cycle,
    /// the error is returned and the sweep is left untouched.
    pub fn load_samples<'a, I>(&mut self, traces: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'a SpectrumTrace, f64)>,
    {
        let mut merged = self.samples.clone();
        for (trace, duty_cycle) in traces {
            let sample = DutyCycleSample::with_config(duty_cycle, trace, &self.config)?;
            insert_sorted(&mut merged, sample)?;
        }
        self.samples = merged;
        Ok(())
    }

    /// Insert an analyzed sample at its duty-cycle position.
    pub fn add_sample(&mut self, sample: DutyCycleSample) -> Result<()> {
        insert_sorted(&mut self.samples, sample)
    }

    /// Exact duty-cycle lookup. Missing duty cycles are common in partial runs.
    pub fn find_by_duty_cycle(&self, duty_cycle: f64) -> Option<&DutyCycleSample> {
        self.samples.iter().find(|s| s.duty_cycle() == duty_cycle)
    }

    fn reliable_mean(&self, duty_cycle: f64) -> Option<f64> {
        self.find_by_duty_cycle(duty_cycle)?.weighted_mean().ok()
    }

    /// `(mean(high) - mean(low)) / factor` using the 10 % and 90 % samples.
    ///
    /// `None` unless both samples exist and are reliable and the result is finite.
    pub fn thermal_drift(&self) -> Option<f64> {
        let low = self.reliable_mean(self.config.thermal_low_duty_cycle)?;
        let high = self.reliable_mean(self.config.thermal_high_duty_cycle)?;
        Some((high - low) / self.config.thermal_drift_factor).filter(|d| d.is_finite())
    }

    /// Weighted mean of the first reliable continuous-wave candidate (99 %, then 100 %).
    pub fn continuous_wave_wavelength(&self) -> Option<f64> {
        self.config
            .continuous_wave_duty_cycles
            .iter()
            .find_map(|&dc| self.reliable_mean(dc))
    }

    /// `(duty cycle, statistic)` pairs over reliable samples where the statistic is defined.
    pub fn moment_series(&self, kind: MomentKind) -> Vec<(f64, f64)> {
        self.samples
            .iter()
            .filter_map(|s| {
                let m = s.moments().ok()?;
                Some((s.duty_cycle(), kind.pick(&m)?))
            })
            .collect()
    }

    /// Straight-line fit of weighted-mean wavelength against duty cycle.
    pub fn wavelength_fit(&self) -> Option<LinearFit> {
        moments::linear_fit(&self.moment_series(MomentKind::WeightedMean))
    }
}

fn insert_sorted(samples: &mut Vec<DutyCycleSample>, sample: DutyCycleSample) -> Result<()> {
    let dc = sample.duty_cycle();
    if samples.iter().any(|s| s.duty_cycle() == dc) {
        return Err(AnalysisError::DuplicateDutyCycle(dc));
    }
    let at = samples.partition_point(|s| s.duty_cycle() < dc);
    samples.insert(at, sample);
    Ok(())
}
