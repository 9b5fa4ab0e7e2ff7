use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::analysis::collection::SweepCollection;
use crate::analysis::sample::DutyCycleSample;
use crate::analysis::sweep::EmitterSweep;

// ---------------------------------------------------------------------------
// Flat records for downstream consumers
// ---------------------------------------------------------------------------

/// Per-sample statistics. Unreliable samples carry `None` for every statistic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleRecord {
    pub emitter: String,
    pub duty_cycle: f64,
    pub reliable: bool,
    pub weighted_mean: Option<f64>,
    pub std_dev: Option<f64>,
    pub skewness: Option<f64>,
    pub kurtosis: Option<f64>,
}

impl SampleRecord {
    pub fn new(emitter: &str, sample: &DutyCycleSample) -> Self {
        let m = sample.moments().ok();
        Self {
            emitter: emitter.to_string(),
            duty_cycle: sample.duty_cycle(),
            reliable: sample.is_reliable(),
            weighted_mean: m.map(|m| m.weighted_mean),
            std_dev: m.map(|m| m.std_dev),
            skewness: m.and_then(|m| m.skewness),
            kurtosis: m.and_then(|m| m.kurtosis),
        }
    }

    pub fn from_sweep(sweep: &EmitterSweep) -> Vec<Self> {
        sweep
            .samples()
            .iter()
            .map(|s| Self::new(sweep.label(), s))
            .collect()
    }
}

/// Per-sweep derived metrics; `None` marks "not available".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepRecord {
    pub emitter: String,
    pub hexel_id: String,
    pub thermal_drift: Option<f64>,
    pub continuous_wave_wavelength: Option<f64>,
    pub fit_slope: Option<f64>,
    pub fit_intercept: Option<f64>,
    pub fit_r_squared: Option<f64>,
}

impl SweepRecord {
    pub fn from_sweep(sweep: &EmitterSweep) -> Self {
        let fit = sweep.wavelength_fit();
        Self {
            emitter: sweep.label().to_string(),
            hexel_id: sweep.hexel_id().to_string(),
            thermal_drift: sweep.thermal_drift(),
            continuous_wave_wavelength: sweep.continuous_wave_wavelength(),
            fit_slope: fit.map(|f| f.slope),
            fit_intercept: fit.map(|f| f.intercept),
            fit_r_squared: fit.map(|f| f.r_squared),
        }
    }
}

#[derive(Debug, Serialize)]
struct RunSummary<'a> {
    run: &'a str,
    sweeps: Vec<SweepRecord>,
    samples: Vec<SampleRecord>,
}

// ---------------------------------------------------------------------------
// Writers
// ---------------------------------------------------------------------------

/// Write rows as CSV with a header line. `None` fields become empty cells.
pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for (i, row) in rows.iter().enumerate() {
        writer
            .serialize(row)
            .with_context(|| format!("writing CSV row {i}"))?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

/// Write the sweep and sample records of a run as one pretty-printed JSON document.
pub fn write_json(path: &Path, run: &SweepCollection) -> Result<()> {
    let summary = RunSummary {
        run: &run.run_label,
        sweeps: run.sweep_records(),
        samples: run.sample_records(),
    };
    let text = serde_json::to_string_pretty(&summary).context("serializing summary")?;
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

fn fmt_opt(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{v:.6} {unit}"),
        None => "N/A".to_string(),
    }
}

fn fmt_shape(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{v:.4}"))
}

/// Human-readable per-emitter summary.
pub fn summary_text(run: &SweepCollection) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", run.run_label);
    for sweep in run.sweeps() {
        let _ = writeln!(out, "...{}", sweep.label());
        let _ = writeln!(out, "......dT = {}", fmt_opt(sweep.thermal_drift(), "nm/C"));
        let _ = writeln!(
            out,
            "......CW WL = {}",
            fmt_opt(sweep.continuous_wave_wavelength(), "nm")
        );
        match sweep.wavelength_fit() {
            Some(fit) => {
                let _ = writeln!(
                    out,
                    "......fit: {:.6} nm/% + {:.4} nm (R² {:.4})",
                    fit.slope, fit.intercept, fit.r_squared
                );
            }
            None => {
                let _ = writeln!(out, "......fit: N/A");
            }
        }
        for sample in sweep.samples() {
            match sample.moments() {
                Ok(m) => {
                    let _ = writeln!(
                        out,
                        ".........{:>5.1}%  mean {:.4} nm  sdev {:.4}  skew {}  kurt {}",
                        sample.duty_cycle(),
                        m.weighted_mean,
                        m.std_dev,
                        fmt_shape(m.skewness),
                        fmt_shape(m.kurtosis)
                    );
                }
                Err(_) => {
                    let _ = writeln!(out, ".........{:>5.1}%  unreliable", sample.duty_cycle());
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::SpectrumTrace;

    fn sweep() -> EmitterSweep {
        let x: Vec<f64> = (0..=1000).map(|i| 400.0 + i as f64 * 0.1).collect();
        let peak: Vec<f64> = x
            .iter()
            .map(|&w| 100.0 + 5000.0 * (-(w - 443.0).powi(2) / 8.0).exp())
            .collect();
        let good = SpectrumTrace::new(x.clone(), peak).unwrap();
        let flat = SpectrumTrace::new(x.clone(), vec![1000.0; x.len()]).unwrap();
        let mut sweep = EmitterSweep::new("emitter-2").with_hexel_id("Hexel42");
        sweep.load_samples([(&flat, 10.0), (&good, 90.0)]).unwrap();
        sweep
    }

    #[test]
    fn unreliable_sample_has_empty_statistics() {
        let rows = SampleRecord::from_sweep(&sweep());
        assert_eq!(rows.len(), 2);
        assert!(!rows[0].reliable);
        assert_eq!(rows[0].weighted_mean, None);
        assert!(rows[1].reliable);
        assert!(rows[1].kurtosis.is_some());
    }

    #[test]
    fn sweep_record_marks_missing_metrics() {
        let rec = SweepRecord::from_sweep(&sweep());
        assert_eq!(rec.hexel_id, "Hexel42");
        assert_eq!(rec.thermal_drift, None);
        assert_eq!(rec.continuous_wave_wavelength, None);
        assert_eq!(rec.fit_slope, None);
    }

    #[test]
    fn csv_and_json_outputs() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut run = SweepCollection::new("Hexel42-run");
        run.push(sweep());

        let csv_path = dir.path().join("samples.csv");
        write_csv(&csv_path, &run.sample_records()).unwrap();
        let text = std::fs::read_to_string(&csv_path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("emitter,duty_cycle,reliable,weighted_mean,std_dev,skewness,kurtosis")
        );
        assert_eq!(lines.next(), Some("emitter-2,10.0,false,,,,"));

        let json_path = dir.path().join("summary.json");
        write_json(&json_path, &run).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(value["run"], "Hexel42-run");
        assert!(value["sweeps"][0]["thermal_drift"].is_null());
        assert_eq!(value["samples"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn single_bin_spike_row_keeps_mean() {
        let x: Vec<f64> = (0..=1000).map(|i| 400.0 + i as f64 * 0.1).collect();
        let y: Vec<f64> = (0..=1000).map(|i| if i == 430 { 1300.0 } else { 1000.0 }).collect();
        let mut spiky = EmitterSweep::new("emitter-5");
        spiky
            .load_samples([(&SpectrumTrace::new(x, y).unwrap(), 20.0)])
            .unwrap();
        let rows = SampleRecord::from_sweep(&spiky);
        assert!(rows[0].reliable);
        assert_eq!(rows[0].std_dev, Some(0.0));
        assert!(rows[0].weighted_mean.is_some());
        assert_eq!(rows[0].skewness, None);

        let mut run = SweepCollection::new("Hexel42-run");
        run.push(spiky);
        assert!(summary_text(&run).contains("skew N/A  kurt N/A"));
    }

    #[test]
    fn summary_reports_na() {
        let mut run = SweepCollection::new("Hexel42-run");
        run.push(sweep());
        let text = summary_text(&run);
        assert!(text.contains("dT = N/A"));
        assert!(text.contains("unreliable"));
    }
}
