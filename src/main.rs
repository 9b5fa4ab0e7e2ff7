use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use hexel_spectra::config::AnalysisConfig;
use hexel_spectra::data::loader;
use hexel_spectra::report;

/// Analyze the emitter sweeps of one Hexel test run.
#[derive(Parser)]
#[command(name = "hexel-report", version, about, long_about = None)]
struct Cli {
    /// Test-run folder containing `emitter-*` sub-folders
    run: PathBuf,

    /// JSON file overriding analysis constants
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Emitter folder to leave out (repeatable)
    #[arg(short, long)]
    ignore: Vec<String>,

    /// Directory for samples.csv, sweeps.csv and summary.json
    #[arg(short, long)]
    out: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AnalysisConfig::from_json_file(path)?,
        None => AnalysisConfig::default(),
    };

    let run = loader::load_run(&cli.run, &config, &cli.ignore)?;
    print!("{}", report::summary_text(&run));

    if let Some(out) = &cli.out {
        std::fs::create_dir_all(out).with_context(|| format!("creating {}", out.display()))?;
        report::write_csv(&out.join("samples.csv"), &run.sample_records())?;
        report::write_csv(&out.join("sweeps.csv"), &run.sweep_records())?;
        report::write_json(&out.join("summary.json"), &run)?;
        log::info!("wrote reports to {}", out.display());
    }

    Ok(())
}
