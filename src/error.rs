use thiserror::Error;

/// Errors raised by the spectral reduction pipeline and sweep bookkeeping.
///
/// A missing duty cycle in a sweep is not an error: lookups return `None`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// Wavelength and intensity arrays do not form a usable trace.
    #[error("malformed trace: {0}")]
    Shape(String),

    /// The trace does not reach into the analysis window.
    #[error("no samples inside the {lower} – {upper} nm analysis window")]
    RangeNotFound { lower: f64, upper: f64 },

    /// Statistics were requested from a sample flagged unreliable.
    #[error("duty cycle {duty_cycle}% is not reliable")]
    NotReliable { duty_cycle: f64 },

    /// Skewness or kurtosis requested from a peak with zero standard deviation.
    #[error("duty cycle {duty_cycle}% has a single-bin peak, shape moments undefined")]
    ZeroSpread { duty_cycle: f64 },

    /// A sweep already holds a sample at this duty cycle.
    #[error("duty cycle {0}% already present in sweep")]
    DuplicateDutyCycle(f64),

    /// Duty cycle is not a finite percentage in 0–100.
    #[error("invalid duty cycle {0}, expected a percentage in 0–100")]
    InvalidDutyCycle(f64),

    /// Configuration values that cannot drive the pipeline.
    #[error("invalid analysis config: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
