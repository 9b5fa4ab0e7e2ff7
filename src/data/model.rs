use crate::error::{AnalysisError, Result};

// ---------------------------------------------------------------------------
// SpectrumTrace – one spectrometer measurement
// ---------------------------------------------------------------------------

/// A single spectrometer trace: positionally paired wavelength/intensity arrays.
///
/// Construction guarantees both arrays are non-empty, equally long, finite,
/// and that wavelengths are strictly increasing.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumTrace {
    /// Wavelength axis in nm.
    wavelengths: Vec<f64>,
    /// Intensity in counts – same length as `wavelengths`.
    intensities: Vec<f64>,
}

impl SpectrumTrace {
    pub fn new(wavelengths: Vec<f64>, intensities: Vec<f64>) -> Result<Self> {
        if wavelengths.len() != intensities.len() {
            return Err(AnalysisError::Shape(format!(
                "{} wavelengths but {} intensities",
                wavelengths.len(),
                intensities.len()
            )));
        }
        if wavelengths.is_empty() {
            return Err(AnalysisError::Shape("trace is empty".into()));
        }
        if let Some(i) = wavelengths
            .iter()
            .chain(intensities.iter())
            .position(|v| !v.is_finite())
        {
            return Err(AnalysisError::Shape(format!("non-finite value at position {i}")));
        }
        if let Some(i) = wavelengths.windows(2).position(|w| w[1] <= w[0]) {
            return Err(AnalysisError::Shape(format!(
                "wavelengths not strictly increasing at index {}",
                i + 1
            )));
        }
        Ok(Self {
            wavelengths,
            intensities,
        })
    }

    pub fn wavelengths(&self) -> &[f64] {
        &self.wavelengths
    }

    pub fn intensities(&self) -> &[f64] {
        &self.intensities
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.wavelengths.len()
    }

    /// Always false for a constructed trace; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.wavelengths.is_empty()
    }

    /// `max - min` of the intensities.
    pub fn span(&self) -> f64 {
        let (min, max) = self
            .intensities
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        max - min
    }

    /// Restrict to `[start, end)` where `start` is the first index with a
    /// wavelength strictly above `lower` and `end` the first strictly above
    /// `upper`. A trace that stops before `upper` keeps its tail.
    pub fn restrict(&self, lower: f64, upper: f64) -> Result<SpectrumTrace> {
        let start = self
            .wavelengths
            .iter()
            .position(|&w| w > lower)
            .ok_or(AnalysisError::RangeNotFound { lower, upper })?;
        let end = match self.wavelengths.iter().position(|&w| w > upper) {
            Some(end) => end,
            None => {
                log::warn!(
                    "trace ends at {:.3} nm, below the {upper} nm window edge",
                    self.wavelengths[self.len() - 1]
                );
                self.len()
            }
        };
        if end <= start {
            return Err(AnalysisError::RangeNotFound { lower, upper });
        }
        Ok(SpectrumTrace {
            wavelengths: self.wavelengths[start..end].to_vec(),
            intensities: self.intensities[start..end].to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(start: f64, step: f64, n: usize) -> Vec<f64> {
        (0..n).map(|i| start + i as f64 * step).collect()
    }

    #[test]
    fn length_mismatch_is_shape_error() {
        let err = SpectrumTrace::new(vec![1.0, 2.0], vec![1.0]).unwrap_err();
        assert!(matches!(err, AnalysisError::Shape(_)));
    }

    #[test]
    fn empty_and_unsorted_are_rejected() {
        assert!(matches!(
            SpectrumTrace::new(vec![], vec![]),
            Err(AnalysisError::Shape(_))
        ));
        assert!(matches!(
            SpectrumTrace::new(vec![1.0, 1.0], vec![0.0, 0.0]),
            Err(AnalysisError::Shape(_))
        ));
        assert!(matches!(
            SpectrumTrace::new(vec![1.0, f64::NAN], vec![0.0, 0.0]),
            Err(AnalysisError::Shape(_))
        ));
    }

    #[test]
    fn restrict_uses_first_index_strictly_above_bounds() {
        // 420, 421, ..., 470
        let x = ramp(420.0, 1.0, 51);
        let y = vec![0.0; 51];
        let trace = SpectrumTrace::new(x, y).unwrap();
        let cut = trace.restrict(425.0, 460.0).unwrap();
        // 425 itself is excluded, 460 is kept, 461 is the exclusive end.
        assert_eq!(cut.wavelengths().first(), Some(&426.0));
        assert_eq!(cut.wavelengths().last(), Some(&460.0));
        assert_eq!(cut.len(), 35);
    }

    #[test]
    fn restrict_below_window_is_range_not_found() {
        let trace = SpectrumTrace::new(ramp(400.0, 1.0, 20), vec![0.0; 20]).unwrap();
        assert_eq!(
            trace.restrict(425.0, 460.0).unwrap_err(),
            AnalysisError::RangeNotFound {
                lower: 425.0,
                upper: 460.0
            }
        );
    }

    #[test]
    fn restrict_keeps_tail_of_truncated_trace() {
        let trace = SpectrumTrace::new(ramp(430.0, 1.0, 10), vec![0.0; 10]).unwrap();
        let cut = trace.restrict(425.0, 460.0).unwrap();
        assert_eq!(cut.len(), 10);
    }

    #[test]
    fn span_is_max_minus_min() {
        let trace = SpectrumTrace::new(ramp(0.0, 1.0, 4), vec![3.0, -1.0, 7.0, 2.0]).unwrap();
        assert_eq!(trace.span(), 8.0);
    }
}
