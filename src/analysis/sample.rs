use crate::analysis::moments::{self, SpectralMoments};
use crate::config::AnalysisConfig;
use crate::data::model::SpectrumTrace;
use crate::error::{AnalysisError, Result};

// ---------------------------------------------------------------------------
// Analysis outcome
// ---------------------------------------------------------------------------

/// Why a sample produced no statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Unreliability {
    /// Peak-to-floor span below the reliability threshold.
    InsufficientSpan { span: f64 },
    /// Nothing survived floor subtraction and clipping.
    EmptyPeak,
}

/// Intermediate vectors and final moments of a reliable sample.
#[derive(Debug, Clone, PartialEq)]
pub struct PeakAnalysis {
    /// Index of the intensity maximum within the restricted trace.
    pub peak_index: usize,
    /// Mean intensity outside the peak exclusion window.
    pub floor: f64,
    /// Intensity minus floor, clamped to zero below the clip level.
    pub floor_subtracted: Vec<f64>,
    /// `floor_subtracted` scaled to unit sum.
    pub normalized: Vec<f64>,
    pub moments: SpectralMoments,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SampleAnalysis {
    Reliable(PeakAnalysis),
    Unreliable(Unreliability),
}

// ---------------------------------------------------------------------------
// DutyCycleSample
// ---------------------------------------------------------------------------

/// One spectrometer trace at one duty cycle, reduced to peak statistics.
///
/// The pipeline runs once at construction:
///
/// 1. restrict the trace to the analysis window
/// 2. reject traces whose `max - min` span is below the reliability threshold
/// 3. locate the peak and average the intensity outside ±half-width as floor
/// 4. subtract the floor, clamping small residues to zero
/// 5. normalize to unit sum
/// 6. take weighted mean, standard deviation, skewness and kurtosis
#[derive(Debug, Clone, PartialEq)]
pub struct DutyCycleSample {
    duty_cycle: f64,
    trace: SpectrumTrace,
    analysis: SampleAnalysis,
}

impl DutyCycleSample {
    /// Analyze `raw` with the default calibration.
    pub fn new(duty_cycle: f64, raw: &SpectrumTrace) -> Result<Self> {
        Self::with_config(duty_cycle, raw, &AnalysisConfig::default())
    }

    /// Analyze `raw` with `config`, which is validated first.
    pub fn with_config(
        duty_cycle: f64,
        raw: &SpectrumTrace,
        config: &AnalysisConfig,
    ) -> Result<Self> {
        config.validate()?;
        validate_duty_cycle(duty_cycle)?;
        let trace = raw.restrict(config.window_lower_nm, config.window_upper_nm)?;
        let analysis = analyze(&trace, config);
        match &analysis {
            SampleAnalysis::Reliable(peak) => log::debug!(
                "dc {duty_cycle}%: floor {:.1}, peak index {}, mean {:.4} nm",
                peak.floor,
                peak.peak_index,
                peak.moments.weighted_mean
            ),
            SampleAnalysis::Unreliable(reason) => {
                log::debug!("dc {duty_cycle}%: unreliable ({reason:?})")
            }
        }
        Ok(Self {
            duty_cycle,
            trace,
            analysis,
        })
    }

    /// Build the trace from raw arrays and analyze it.
    pub fn from_arrays(
        duty_cycle: f64,
        wavelengths: Vec<f64>,
        intensities: Vec<f64>,
    ) -> Result<Self> {
        let raw = SpectrumTrace::new(wavelengths, intensities)?;
        Self::new(duty_cycle, &raw)
    }

    /// Replace the raw data and re-run the pipeline. On error the sample is left unchanged.
    pub fn reload(&mut self, raw: &SpectrumTrace, config: &AnalysisConfig) -> Result<()> {
        *self = Self::with_config(self.duty_cycle, raw, config)?;
        Ok(())
    }

    pub fn duty_cycle(&self) -> f64 {
        self.duty_cycle
    }

    pub fn is_continuous_wave(&self) -> bool {
        self.duty_cycle == 100.0
    }

    /// The trace restricted to the analysis window.
    pub fn trace(&self) -> &SpectrumTrace {
        &self.trace
    }

    pub fn analysis(&self) -> &SampleAnalysis {
        &self.analysis
    }

    pub fn is_reliable(&self) -> bool {
        matches!(self.analysis, SampleAnalysis::Reliable(_))
    }

    pub fn unreliability(&self) -> Option<Unreliability> {
        match self.analysis {
            SampleAnalysis::Reliable(_) => None,
            SampleAnalysis::Unreliable(reason) => Some(reason),
        }
    }

    pub fn peak(&self) -> Result<&PeakAnalysis> {
        match &self.analysis {
            SampleAnalysis::Reliable(peak) => Ok(peak),
            SampleAnalysis::Unreliable(_) => Err(AnalysisError::NotReliable {
                duty_cycle: self.duty_cycle,
            }),
        }
    }

    pub fn moments(&self) -> Result<SpectralMoments> {
        self.peak().map(|p| p.moments)
    }

    pub fn weighted_mean(&self) -> Result<f64> {
        self.moments().map(|m| m.weighted_mean)
    }

    pub fn std_dev(&self) -> Result<f64> {
        self.moments().map(|m| m.std_dev)
    }

    /// Fails with `ZeroSpread` when the peak occupies a single bin.
    pub fn skewness(&self) -> Result<f64> {
        self.moments()?.skewness.ok_or(AnalysisError::ZeroSpread {
            duty_cycle: self.duty_cycle,
        })
    }

    /// Fails with `ZeroSpread` when the peak occupies a single bin.
    pub fn kurtosis(&self) -> Result<f64> {
        self.moments()?.kurtosis.ok_or(AnalysisError::ZeroSpread {
            duty_cycle: self.duty_cycle,
        })
    }

    /// Normalized weights, only present for reliable samples.
    pub fn normalized(&self) -> Option<&[f64]> {
        self.peak().ok().map(|p| p.normalized.as_slice())
    }
}

fn validate_duty_cycle(duty_cycle: f64) -> Result<()> {
    if duty_cycle.is_finite() && (0.0..=100.0).contains(&duty_cycle) {
        Ok(())
    } else {
        Err(AnalysisError::InvalidDutyCycle(duty_cycle))
    }
}

/// Steps 2–6 on an already restricted trace.
fn analyze(trace: &SpectrumTrace, config: &AnalysisConfig) -> SampleAnalysis {
    let x = trace.wavelengths();
    let y = trace.intensities();

    let span = trace.span();
    if span < config.reliability_span_counts {
        return SampleAnalysis::Unreliable(Unreliability::InsufficientSpan { span });
    }

    let Some(peak_index) = moments::peak_index(y) else {
        return SampleAnalysis::Unreliable(Unreliability::EmptyPeak);
    };
    let (lo, hi) = match moments::local_spacing(x, peak_index) {
        Some(spacing) => {
            moments::exclusion_window(y.len(), peak_index, config.peak_half_width_nm, spacing)
        }
        None => (0, y.len()),
    };
    let floor = moments::floor_estimate(y, lo, hi);
    let floor_subtracted = moments::subtract_floor(y, floor, config.floor_clip_counts);

    let Some(normalized) = moments::normalize(&floor_subtracted) else {
        return SampleAnalysis::Unreliable(Unreliability::EmptyPeak);
    };
    let moments = moments::weighted_moments(x, &normalized);

    SampleAnalysis::Reliable(PeakAnalysis {
        peak_index,
        floor,
        floor_subtracted,
        normalized,
        moments,
    })
}
