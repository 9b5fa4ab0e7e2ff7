use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use super::model::SpectrumTrace;
use crate::analysis::collection::SweepCollection;
use crate::analysis::sample::DutyCycleSample;
use crate::analysis::sweep::EmitterSweep;
use crate::config::AnalysisConfig;

// ---------------------------------------------------------------------------
// Two-column trace tables
// ---------------------------------------------------------------------------

/// Load a spectrometer table: no header, `wavelength,intensity` per row.
///
/// ```text
/// 400.0,102.3
/// 400.1,99.8
/// ...
/// ```
///
/// Columns past the second are ignored.
pub fn load_trace(path: &Path) -> Result<SpectrumTrace> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let mut wavelengths = Vec::new();
    let mut intensities = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        if record.iter().all(|f| f.is_empty()) {
            continue;
        }
        if record.len() < 2 {
            bail!("Row {row_no}: expected 2 columns, found {}", record.len());
        }
        wavelengths.push(parse_cell(&record[0], row_no, "wavelength")?);
        intensities.push(parse_cell(&record[1], row_no, "intensity")?);
    }

    SpectrumTrace::new(wavelengths, intensities)
        .with_context(|| format!("building trace from {}", path.display()))
}

fn parse_cell(s: &str, row: usize, col: &str) -> Result<f64> {
    s.parse::<f64>()
        .with_context(|| format!("Row {row}, {col}: '{s}' is not a number"))
}

/// Write a trace in the format read by [`load_trace`].
pub fn save_trace(path: &Path, trace: &SpectrumTrace) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for (w, i) in trace.wavelengths().iter().zip(trace.intensities()) {
        writer.serialize((w, i)).context("writing trace row")?;
    }
    writer.flush().context("flushing trace")?;
    Ok(())
}

/// `dc-<value>.csv` → `value`.
pub fn parse_duty_cycle(file_name: &str) -> Option<f64> {
    file_name
        .strip_prefix("dc-")?
        .strip_suffix(".csv")?
        .parse::<f64>()
        .ok()
}

// ---------------------------------------------------------------------------
// Folder layout
// ---------------------------------------------------------------------------

/// A file in an emitter folder that could not become a sample.
#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of loading one emitter folder.
#[derive(Debug, Clone)]
pub struct SweepLoad {
    pub sweep: EmitterSweep,
    pub skipped: Vec<SkippedFile>,
}

fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("listing {}", dir.display()))?
        .map(|e| e.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("reading entries of {}", dir.display()))?;
    entries.sort();
    Ok(entries)
}

/// Load every `dc-*.csv` in an emitter folder.
///
/// The folder name is the sweep label and its parent folder name the hexel id
/// (`<run>/<hexel>/emitter-3/dc-10.csv`). Files that fail to load or analyze
/// are skipped with a warning and listed in [`SweepLoad::skipped`].
pub fn load_emitter_folder(path: &Path, config: &AnalysisConfig) -> Result<SweepLoad> {
    let label = file_name(path)
        .with_context(|| format!("no folder name in {}", path.display()))?
        .to_string();
    let hexel_id = path
        .parent()
        .and_then(file_name)
        .unwrap_or_default()
        .to_string();

    let mut sweep = EmitterSweep::with_config(label, config.clone())?.with_hexel_id(hexel_id);
    let mut skipped = Vec::new();

    for file in sorted_entries(path)? {
        let Some(duty_cycle) = file_name(&file).and_then(parse_duty_cycle) else {
            log::debug!("ignoring {}", file.display());
            continue;
        };
        let outcome = load_trace(&file).and_then(|trace| {
            let sample = DutyCycleSample::with_config(duty_cycle, &trace, config)?;
            sweep.add_sample(sample)?;
            Ok(())
        });
        if let Err(err) = outcome {
            log::warn!("skipping {}: {err:#}", file.display());
            skipped.push(SkippedFile {
                path: file,
                reason: format!("{err:#}"),
            });
        }
    }

    log::info!(
        "{}: {} samples, {} skipped",
        sweep.label(),
        sweep.len(),
        skipped.len()
    );
    Ok(SweepLoad { sweep, skipped })
}

/// Load every emitter folder of a test run, except those named in `ignore`.
///
/// Emitter folders are the sub-folders whose name contains `emitter`,
/// visited in name order.
pub fn load_run(
    path: &Path,
    config: &AnalysisConfig,
    ignore: &[String],
) -> Result<SweepCollection> {
    let run_label = file_name(path).unwrap_or_default().to_string();
    let mut run = SweepCollection::new(run_label);

    for dir in sorted_entries(path)? {
        if !dir.is_dir() {
            continue;
        }
        let Some(name) = file_name(&dir) else {
            continue;
        };
        if !name.contains("emitter") {
            continue;
        }
        if ignore.iter().any(|i| i == name) {
            log::info!("ignoring {name}");
            continue;
        }
        let loaded = load_emitter_folder(&dir, config)?;
        run.push(loaded.sweep);
    }

    if run.is_empty() {
        log::warn!("no emitter folders found in {}", path.display());
    }
    Ok(run)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duty_cycle_from_file_name() {
        assert_eq!(parse_duty_cycle("dc-10.csv"), Some(10.0));
        assert_eq!(parse_duty_cycle("dc-99.5.csv"), Some(99.5));
        assert_eq!(parse_duty_cycle("wavelengths.csv"), None);
        assert_eq!(parse_duty_cycle("dc-ten.csv"), None);
        assert_eq!(parse_duty_cycle("dc-10.txt"), None);
    }

    #[test]
    fn trace_table_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("dc-50.csv");
        let trace = SpectrumTrace::new(vec![440.0, 440.5, 441.0], vec![10.0, 20.5, 30.0]).unwrap();
        save_trace(&path, &trace).unwrap();
        assert_eq!(load_trace(&path).unwrap(), trace);
    }

    #[test]
    fn non_numeric_cell_is_reported() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("dc-50.csv");
        std::fs::write(&path, "440.0,10\n440.1,abc\n").unwrap();
        let err = load_trace(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Row 1"));
    }

    #[test]
    fn single_column_row_is_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("dc-50.csv");
        std::fs::write(&path, "440.0,10\n440.1\n").unwrap();
        assert!(load_trace(&path).is_err());
    }
}
