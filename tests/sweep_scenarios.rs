use hexel_spectra::analysis::{DutyCycleSample, EmitterSweep, Unreliability};
use hexel_spectra::{AnalysisError, SpectrumTrace};

/// 400–500 nm in 0.1 nm steps at 100 counts, plus an optional Gaussian bump.
fn trace(bump: Option<(f64, f64)>) -> SpectrumTrace {
    let x: Vec<f64> = (0..=1000).map(|i| 400.0 + i as f64 * 0.1).collect();
    let y = x
        .iter()
        .map(|&w| match bump {
            Some((center, height)) => {
                100.0 + height * (-(w - center).powi(2) / (2.0 * 2.0 * 2.0)).exp()
            }
            None => 100.0,
        })
        .collect();
    SpectrumTrace::new(x, y).unwrap()
}

fn flat(level: f64) -> SpectrumTrace {
    let x: Vec<f64> = (0..=1000).map(|i| 400.0 + i as f64 * 0.1).collect();
    let y = vec![level; x.len()];
    SpectrumTrace::new(x, y).unwrap()
}

#[test]
fn gaussian_bump_at_443_is_reliable() {
    let sample = DutyCycleSample::new(50.0, &trace(Some((443.0, 5000.0)))).unwrap();
    assert!(sample.is_reliable());
    let mean = sample.weighted_mean().unwrap();
    assert!((mean - 443.0).abs() < 0.5, "mean {mean}");
    assert!(sample.std_dev().unwrap() >= 0.0);
}

#[test]
fn flat_trace_has_no_statistics() {
    let sample = DutyCycleSample::new(10.0, &flat(1000.0)).unwrap();
    assert!(!sample.is_reliable());
    assert!(matches!(
        sample.unreliability(),
        Some(Unreliability::InsufficientSpan { .. })
    ));
    for stat in [
        sample.weighted_mean(),
        sample.std_dev(),
        sample.skewness(),
        sample.kurtosis(),
    ] {
        assert_eq!(stat, Err(AnalysisError::NotReliable { duty_cycle: 10.0 }));
    }
}

#[test]
fn partial_sweep_without_continuous_wave() {
    let (a, b, c) = (
        trace(Some((442.0, 5000.0))),
        trace(Some((442.5, 5000.0))),
        trace(Some((443.0, 5000.0))),
    );
    let mut sweep = EmitterSweep::new("emitter-0");
    sweep.load_samples([(&a, 10.0), (&b, 50.0), (&c, 90.0)]).unwrap();

    assert_eq!(sweep.continuous_wave_wavelength(), None);
    let drift = sweep.thermal_drift().unwrap();
    assert!((drift - 1.0 / 0.06).abs() < 1.0, "drift {drift}");
}

#[test]
fn unreliable_endpoint_blocks_thermal_drift() {
    let (low, high) = (flat(1000.0), trace(Some((443.0, 5000.0))));
    let mut sweep = EmitterSweep::new("emitter-6");
    sweep.load_samples([(&low, 10.0), (&high, 90.0)]).unwrap();

    assert!(sweep.find_by_duty_cycle(90.0).unwrap().is_reliable());
    assert_eq!(sweep.thermal_drift(), None);
}

#[test]
fn shape_error_aborts_load_without_partial_state() {
    let good = trace(Some((443.0, 5000.0)));
    let mut sweep = EmitterSweep::new("emitter-1");
    sweep.load_samples([(&good, 10.0)]).unwrap();

    let short = SpectrumTrace::new(vec![300.0, 301.0], vec![1.0, 2.0]).unwrap();
    let err = sweep.load_samples([(&good, 50.0), (&short, 90.0)]).unwrap_err();
    assert!(matches!(err, AnalysisError::RangeNotFound { .. }));
    assert_eq!(sweep.len(), 1);

    assert!(matches!(
        SpectrumTrace::new(vec![440.0, 441.0], vec![1.0]),
        Err(AnalysisError::Shape(_))
    ));
}
